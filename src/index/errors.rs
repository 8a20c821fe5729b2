//! Index declaration error types
//!
//! Error codes:
//! - IDX_PROPERTY_DIRECTION_AND_MODE (REJECT)
//! - IDX_DEFINITION_INVALID (REJECT)
//! - IDX_DEFINITION_PARSE (REJECT)

use std::fmt;

/// Severity levels for index declaration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Declaration rejected, nothing was loaded
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Index declaration error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorCode {
    /// A property carries both a sort direction and a mode
    IdxPropertyDirectionAndMode,
    /// Structurally invalid definition (empty kind, empty property name)
    IdxDefinitionInvalid,
    /// Declaration document is not valid JSON for the expected shape
    IdxDefinitionParse,
}

impl IndexErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexErrorCode::IdxPropertyDirectionAndMode => "IDX_PROPERTY_DIRECTION_AND_MODE",
            IndexErrorCode::IdxDefinitionInvalid => "IDX_DEFINITION_INVALID",
            IndexErrorCode::IdxDefinitionParse => "IDX_DEFINITION_PARSE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for IndexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Index declaration error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexError {
    code: IndexErrorCode,
    message: String,
    property: Option<String>,
}

impl IndexError {
    /// Create a direction-and-mode conflict error
    pub fn direction_and_mode(property: impl Into<String>) -> Self {
        let p = property.into();
        Self {
            code: IndexErrorCode::IdxPropertyDirectionAndMode,
            message: format!("Property '{}' sets both a direction and a mode", p),
            property: Some(p),
        }
    }

    /// Create an invalid definition error
    pub fn invalid_definition(reason: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::IdxDefinitionInvalid,
            message: reason.into(),
            property: None,
        }
    }

    /// Create a parse error
    pub fn parse(reason: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::IdxDefinitionParse,
            message: reason.into(),
            property: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> IndexErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending property name if applicable
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for IndexError {}

impl From<serde_json::Error> for IndexError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse(e.to_string())
    }
}

/// Result type for index declaration operations
pub type IndexResult<T> = Result<T, IndexError>;
