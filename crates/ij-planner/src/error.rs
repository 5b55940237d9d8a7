use derive_more::From;
use orion_error::{ErrorCode, StructError, UvsReason};

// ---------------------------------------------------------------------------
// RuleError — raised by individual join rules
// ---------------------------------------------------------------------------

/// Failure of a join rule's match or transform step.
///
/// A join that simply does not have the rule's shape is not an error: the
/// match predicate returns `Ok(false)` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The query is malformed in a way the user can fix by rewriting it.
    #[error("validation error: {0}")]
    Validation(String),
    /// An upstream planning invariant was violated, or a hint is malformed.
    #[error("planning error: {0}")]
    Planning(String),
    /// A contract between planner components was broken.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type RuleResult<T> = Result<T, RuleError>;

impl RuleError {
    pub fn reason(&self) -> PlannerReason {
        match self {
            Self::Validation(_) => PlannerReason::Validation,
            Self::Planning(_) => PlannerReason::Planning,
            Self::Internal(_) => PlannerReason::Internal,
        }
    }

    /// Lift into the planner-level structured error, keeping the message as
    /// detail.
    pub fn into_planner_error(self) -> PlannerError {
        StructError::from(self.reason()).with_detail(self.to_string())
    }
}

// ---------------------------------------------------------------------------
// PlannerReason — structured planner errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error, From)]
pub enum PlannerReason {
    #[error("query validation error")]
    Validation,
    #[error("planning error")]
    Planning,
    #[error("internal planner error")]
    Internal,
    #[error("{0}")]
    Uvs(UvsReason),
}

impl ErrorCode for PlannerReason {
    fn error_code(&self) -> i32 {
        match self {
            Self::Validation => 3001,
            Self::Planning => 3002,
            Self::Internal => 3003,
            Self::Uvs(u) => u.error_code(),
        }
    }
}

pub type PlannerError = StructError<PlannerReason>;
pub type PlannerResult<T> = Result<T, PlannerError>;
