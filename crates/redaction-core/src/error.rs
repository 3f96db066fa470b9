use redaction_types::SchemaError;
use thiserror::Error;

/// Form input that must be fixed before anything is sent to the server
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select a field to restrict")]
    MissingTarget,

    #[error("Draw an area on the document before submitting")]
    MissingArea,

    #[error("The selected area has no size")]
    EmptyArea,

    #[error("The selected area extends beyond the page")]
    AreaOutOfBounds,

    #[error("Wait for the page image to load before drawing an area")]
    ImageNotLoaded,

    #[error("Select the collaborator this restriction applies to")]
    MissingCollaborator,

    #[error("A reason is required")]
    MissingReason,
}

/// Every failure the restriction panel can report.
///
/// All of them are recoverable: the panel stays usable and the previous
/// restriction list is kept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RestrictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The restriction is gone, usually deleted by someone else
    #[error("Restriction not found: {0}")]
    NotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("No document is open")]
    NoDocument,

    #[error("You do not have permission to manage restrictions")]
    Forbidden,

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Server rejected the request: {0}")]
    Rejected(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl RestrictionError {
    /// Validation problems never reach the network
    pub fn is_validation(&self) -> bool {
        matches!(self, RestrictionError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RestrictionError::NotFound(_))
    }

    /// Text for the transient error banner
    pub fn user_message(&self) -> String {
        match self {
            RestrictionError::Validation(e) => e.to_string(),
            RestrictionError::NotFound(_) => {
                "This restriction was already removed.".to_string()
            }
            RestrictionError::DocumentNotFound(_) => {
                "This document could not be found.".to_string()
            }
            RestrictionError::NoDocument => "Open a document first.".to_string(),
            RestrictionError::Forbidden => self.to_string(),
            RestrictionError::Rejected(msg) => msg.clone(),
            RestrictionError::Network(_)
            | RestrictionError::Server { .. }
            | RestrictionError::Decode(_)
            | RestrictionError::Schema(_) => {
                "Could not reach the document service. Please try again.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RestrictionError>;
