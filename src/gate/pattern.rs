//! Names that look like test data or probing.

use super::GateError;
use crate::config::GateLimits;

const SUSPICIOUS_PREFIXES: [&str; 9] = [
    "test",
    "prueba",
    "123",
    "abc",
    "admin",
    "administrator",
    "root",
    "user",
    "usuario",
];

pub fn check_name(name: &str, limits: &GateLimits) -> Result<(), GateError> {
    let name = name.trim().to_lowercase();

    if SUSPICIOUS_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return Err(GateError::SuspiciousName);
    }
    if name.chars().count() < limits.min_name_chars {
        return Err(GateError::NameTooShort {
            min: limits.min_name_chars,
        });
    }
    if name
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '-' || c == '_')
    {
        return Err(GateError::NameWithoutLetters);
    }
    Ok(())
}
