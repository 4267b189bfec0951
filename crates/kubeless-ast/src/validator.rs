//! Structural validation of a parsed source unit against a [`HandlerContract`]

use tracing::debug;

use crate::contract::{HandlerContract, HandlerParam};
use crate::error::ValidationError;
use crate::model::{MethodDeclaration, SourceUnit, TypeDeclaration, Visibility};

/// Check `unit` declares a convertible handler class named `expected_type`.
///
/// Checks run in order and stop at the first failure: package, class
/// presence, class visibility, handler method.
pub fn validate(
    unit: &SourceUnit,
    expected_type: &str,
    contract: &HandlerContract,
) -> Result<(), ValidationError> {
    validate_handler(unit, expected_type, contract).map(|_| ())
}

/// Same checks as [`validate`], returning the first matching handler method
pub fn validate_handler<'u>(
    unit: &'u SourceUnit,
    expected_type: &str,
    contract: &HandlerContract,
) -> Result<&'u MethodDeclaration, ValidationError> {
    if unit.package_name() != Some(contract.package()) {
        return Err(ValidationError::WrongPackage {
            expected: contract.package().to_string(),
            found: unit.package_name().map(str::to_string),
        });
    }

    let class = unit
        .find_class(expected_type)
        .ok_or_else(|| ValidationError::TypeNotFound {
            name: expected_type.to_string(),
        })?;

    let visibility = class.visibility();
    if matches!(visibility, Visibility::Private | Visibility::Protected) {
        return Err(ValidationError::NotPublic {
            name: expected_type.to_string(),
            visibility,
        });
    }

    let handler = find_handler(class, contract).ok_or_else(|| ValidationError::NoHandlerMethod {
        name: expected_type.to_string(),
        event: contract.param(HandlerParam::Event).qualified().to_string(),
        context: contract.param(HandlerParam::Context).qualified().to_string(),
        returns: contract.returns().simple().to_string(),
    })?;

    debug!("Handler method found in {}: {}", expected_type, handler.describe());
    Ok(handler)
}

/// First method of `decl` with the handler shape
pub fn find_handler<'t>(
    decl: &'t TypeDeclaration,
    contract: &HandlerContract,
) -> Option<&'t MethodDeclaration> {
    decl.methods()
        .iter()
        .find(|method| is_handler_method(method, contract))
}

/// Public, returns the contract's string type, takes exactly the event and
/// context parameters in that order
pub fn is_handler_method(method: &MethodDeclaration, contract: &HandlerContract) -> bool {
    if !method.has_modifier("public") {
        return false;
    }
    if method.has_array_dimensions() || !contract.returns().accepts(method.return_type()) {
        return false;
    }

    let params = method.parameters();
    if params.len() != HandlerParam::ALL.len() {
        return false;
    }

    HandlerParam::ALL.iter().all(|slot| {
        params.get(slot.position()).is_some_and(|param| {
            !param.is_varargs() && contract.param(*slot).accepts(param.type_name())
        })
    })
}
