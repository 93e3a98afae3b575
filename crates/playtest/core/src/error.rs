//! Error infrastructure for playtest-core.
//!
//! Scoring never fails: malformed tables degrade to zero weights. The errors
//! here cover the two places where failure is meaningful to the caller, an
//! invalid configuration and a navigation query that produced no route.

use crate::state::Vec3;

/// Severity level of an error, used to pick a recovery strategy.
///
/// - **Recoverable**: may succeed on retry or with an alternative (fallback target)
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistency
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all playtest-core errors.
pub trait PlaytestError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier of the variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Failure reported by a navigation-mesh query or a remembered-path search.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavigationError {
    /// The navmesh has no connected route between the two points.
    #[error("no path from {from} to {to}")]
    NoPath { from: Vec3, to: Vec3 },

    /// One of the endpoints lies outside the walkable area.
    #[error("point {0} is outside the navigable area")]
    OffMesh(Vec3),

    /// The search gave up before reaching the goal.
    #[error("path search exceeded {limit} expansions")]
    SearchExhausted { limit: usize },
}

impl PlaytestError for NavigationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            NavigationError::NoPath { .. } | NavigationError::SearchExhausted { .. } => {
                ErrorSeverity::Recoverable
            }
            NavigationError::OffMesh(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            NavigationError::NoPath { .. } => "NAV_NO_PATH",
            NavigationError::OffMesh(_) => "NAV_OFF_MESH",
            NavigationError::SearchExhausted { .. } => "NAV_SEARCH_EXHAUSTED",
        }
    }
}

/// Rejected simulation tunables.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field}: min {min} exceeds max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} = {value} is outside its allowed range")]
    OutOfRange { field: &'static str, value: f32 },
}

impl PlaytestError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvertedRange { .. } => "CONFIG_INVERTED_RANGE",
            ConfigError::NonPositive { .. } => "CONFIG_NON_POSITIVE",
            ConfigError::OutOfRange { .. } => "CONFIG_OUT_OF_RANGE",
        }
    }
}
