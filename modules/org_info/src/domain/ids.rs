use uuid::Uuid;

use crate::domain::error::DomainError;

/// Parse a caller-supplied identifier.
///
/// Anything that is not a hyphenated/simple UUID, and the nil UUID, is
/// rejected with `InvalidInput` naming `field`.
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, DomainError> {
    let id = Uuid::parse_str(raw)
        .map_err(|_| DomainError::invalid_input(field, format!("malformed identifier '{raw}'")))?;
    ensure_well_formed(field, id)?;
    Ok(id)
}

/// Reject the nil UUID, which no record ever carries.
pub fn ensure_well_formed(field: &str, id: Uuid) -> Result<(), DomainError> {
    if id.is_nil() {
        return Err(DomainError::invalid_input(field, "identifier must not be nil"));
    }
    Ok(())
}
