//! Planner error types
//!
//! Every planner error is an invariant violation: the query should have
//! been rejected before it reached requirement derivation.
//!
//! Error codes:
//! - IDX_FILTER_ARITY (FATAL)
//! - IDX_MULTI_VALUED_IN (FATAL)
//! - IDX_MULTIPLE_INEQUALITY (FATAL)
//! - IDX_INEQUALITY_SORT_MISMATCH (FATAL)
//! - IDX_GEO_UNSATISFIABLE (FATAL)

use std::fmt;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Invalid query reached the engine; not retryable
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Filter does not reference exactly one property
    IdxFilterArity,
    /// IN filter with more than one value
    IdxMultiValuedIn,
    /// Inequality filters on more than one property
    IdxMultipleInequality,
    /// First sort order is not on the inequality property
    IdxInequalitySortMismatch,
    /// Geospatial filter combined with an unsupported query shape
    IdxGeoUnsatisfiable,
}

impl PlannerErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::IdxFilterArity => "IDX_FILTER_ARITY",
            PlannerErrorCode::IdxMultiValuedIn => "IDX_MULTI_VALUED_IN",
            PlannerErrorCode::IdxMultipleInequality => "IDX_MULTIPLE_INEQUALITY",
            PlannerErrorCode::IdxInequalitySortMismatch => "IDX_INEQUALITY_SORT_MISMATCH",
            PlannerErrorCode::IdxGeoUnsatisfiable => "IDX_GEO_UNSATISFIABLE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error type with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerError {
    /// Error code
    code: PlannerErrorCode,
    /// Human-readable message
    message: String,
    /// Property name if applicable
    property: Option<String>,
}

impl PlannerError {
    /// Create a filter arity error
    pub fn filter_arity(op: &str, count: usize) -> Self {
        Self {
            code: PlannerErrorCode::IdxFilterArity,
            message: format!("{} filter has {} properties, expected 1", op, count),
            property: None,
        }
    }

    /// Create a multi-valued IN error
    pub fn multi_valued_in(property: impl Into<String>, values: usize) -> Self {
        let p = property.into();
        Self {
            code: PlannerErrorCode::IdxMultiValuedIn,
            message: format!(
                "IN filter on '{}' has {} values; expand it before planning",
                p, values
            ),
            property: Some(p),
        }
    }

    /// Create a multiple inequality error
    pub fn multiple_inequality(first: &str, second: impl Into<String>) -> Self {
        let p = second.into();
        Self {
            code: PlannerErrorCode::IdxMultipleInequality,
            message: format!(
                "Inequality filters on '{}' and '{}'; only one property may be ranged",
                first, p
            ),
            property: Some(p),
        }
    }

    /// Create an inequality/sort mismatch error
    pub fn inequality_sort_mismatch(inequality: impl Into<String>, first_order: &str) -> Self {
        let p = inequality.into();
        Self {
            code: PlannerErrorCode::IdxInequalitySortMismatch,
            message: format!(
                "Inequality on '{}' requires the first sort order on it, found '{}'",
                p, first_order
            ),
            property: Some(p),
        }
    }

    /// Create an unsatisfiable geospatial query error
    pub fn geo_unsatisfiable(reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::IdxGeoUnsatisfiable,
            message: reason.into(),
            property: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Planner errors always indicate an invalid query and are never retried
    pub fn is_fatal(&self) -> bool {
        true
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the property name if applicable
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }
}

impl fmt::Display for PlannerError {
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

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PlannerErrorCode::IdxFilterArity.code(), "IDX_FILTER_ARITY");
        assert_eq!(PlannerErrorCode::IdxMultiValuedIn.code(), "IDX_MULTI_VALUED_IN");
        assert_eq!(
            PlannerErrorCode::IdxMultipleInequality.code(),
            "IDX_MULTIPLE_INEQUALITY"
        );
        assert_eq!(
            PlannerErrorCode::IdxInequalitySortMismatch.code(),
            "IDX_INEQUALITY_SORT_MISMATCH"
        );
        assert_eq!(
            PlannerErrorCode::IdxGeoUnsatisfiable.code(),
            "IDX_GEO_UNSATISFIABLE"
        );
    }

    #[test]
    fn test_all_errors_are_fatal() {
        let err = PlannerError::multiple_inequality("age", "height");
        assert!(err.is_fatal());
        assert_eq!(err.severity(), Severity::Fatal);
        assert_eq!(err.property(), Some("height"));
    }

    #[test]
    fn test_error_display() {
        let err = PlannerError::multiple_inequality("age", "height");
        let display = format!("{}", err);
        assert!(display.contains("FATAL"));
        assert!(display.contains("IDX_MULTIPLE_INEQUALITY"));
        assert!(display.contains("age"));
        assert!(display.contains("height"));
    }
}
