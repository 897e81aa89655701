//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};

/// A required collaborator was not wired into the environment, or it does
/// not know the requested data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("VisionOracle not available")]
    VisionNotAvailable,

    #[error("CatalogOracle not available")]
    CatalogNotAvailable,

    #[error("FloorOracle not available")]
    FloorsNotAvailable,

    #[error("actor template '{0}' not found")]
    ActorTemplateNotFound(String),

    #[error("item template '{0}' not found")]
    ItemTemplateNotFound(String),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::VisionNotAvailable | Self::CatalogNotAvailable | Self::FloorsNotAvailable => {
                ErrorSeverity::Fatal
            }
            Self::ActorTemplateNotFound(_) | Self::ItemTemplateNotFound(_) => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::VisionNotAvailable => "ORACLE_VISION_NOT_AVAILABLE",
            Self::CatalogNotAvailable => "ORACLE_CATALOG_NOT_AVAILABLE",
            Self::FloorsNotAvailable => "ORACLE_FLOORS_NOT_AVAILABLE",
            Self::ActorTemplateNotFound(_) => "ORACLE_ACTOR_TEMPLATE_NOT_FOUND",
            Self::ItemTemplateNotFound(_) => "ORACLE_ITEM_TEMPLATE_NOT_FOUND",
        }
    }
}
