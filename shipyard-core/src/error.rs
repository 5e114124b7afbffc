//! Error types for Shipyard core.

use std::{error::Error, fmt};

/// A ship field that can be rejected by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Ship name.
    Name,
    /// Home planet.
    Planet,
    /// Ship class.
    ShipType,
    /// Production date.
    ProdDate,
    /// Maximum speed.
    Speed,
    /// Crew size.
    CrewSize,
}

impl Field {
    /// Wire name of the field, as used in JSON payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Planet => "planet",
            Self::ShipType => "shipType",
            Self::ProdDate => "prodDate",
            Self::Speed => "speed",
            Self::CrewSize => "crewSize",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for Shipyard core operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipyardError {
    /// A supplied field is missing or out of bounds; nothing was written.
    InvalidField(Field),
    /// No ship exists with the identifier.
    NotFound(i64),
    /// The identifier is not a positive integer.
    MalformedIdentifier(String),
    /// The storage collaborator failed.
    Storage(String),
}

impl fmt::Display for ShipyardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidField(field) => write!(f, "invalid field: {field}"),
            Self::NotFound(id) => write!(f, "ship {id} not found"),
            Self::MalformedIdentifier(raw) => write!(f, "malformed ship id: {raw:?}"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for ShipyardError {}

/// Convenience result type for Shipyard core.
pub type Result<T> = std::result::Result<T, ShipyardError>;

#[cfg(test)]
mod tests {
    use super::{Field, ShipyardError};

    #[test]
    fn invalid_field_names_the_field() {
        let error = ShipyardError::InvalidField(Field::CrewSize);
        assert_eq!(format!("{error}"), "invalid field: crewSize");
    }

    #[test]
    fn not_found_formats_identifier() {
        let error = ShipyardError::NotFound(42);
        assert_eq!(format!("{error}"), "ship 42 not found");
    }

    #[test]
    fn malformed_identifier_quotes_input() {
        let error = ShipyardError::MalformedIdentifier("abc".to_string());
        assert_eq!(format!("{error}"), "malformed ship id: \"abc\"");
    }

    #[test]
    fn storage_error_formats_message() {
        let error = ShipyardError::Storage("pool exhausted".to_string());
        assert_eq!(format!("{error}"), "storage error: pool exhausted");
    }
}
