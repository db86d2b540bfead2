//! Error types for hizone.

use hizone_types::entity::EntityId;
use std::fmt;

pub type Result<T> = std::result::Result<T, HizError>;

/// Operations that can name an offending entity in an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CountIntersections,
    CountCrossTable,
    NearestDistance,
    BuildZones,
    Coverage,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::CountIntersections => "count_intersections_same_table",
            Operation::CountCrossTable => "count_intersections_cross_table",
            Operation::NearestDistance => "min_nearest_distance",
            Operation::BuildZones => "build_zones",
            Operation::Coverage => "footprint_union",
        };
        f.write_str(name)
    }
}

/// Identifier mismatches between tables, or inside one table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlignmentError {
    #[error("subject identifier '{id}' has no match in the object table")]
    MissingIdentifier { id: EntityId },

    #[error("duplicate identifier '{id}'")]
    DuplicateIdentifier { id: EntityId },
}

#[derive(Debug, thiserror::Error)]
pub enum HizError {
    #[error("Alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    #[error("Invalid geometry for entity '{id}' in {operation}: {reason}")]
    InvalidGeometry {
        id: EntityId,
        operation: Operation,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HizError {
    /// Identifier of the entity the error is about, if any.
    pub fn entity_id(&self) -> Option<&EntityId> {
        match self {
            HizError::Alignment(AlignmentError::MissingIdentifier { id })
            | HizError::Alignment(AlignmentError::DuplicateIdentifier { id })
            | HizError::InvalidGeometry { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HizError {
    fn from(err: serde_json::Error) -> Self {
        HizError::Serialization(err.to_string())
    }
}
