//! Diagnostic test result states.
//!
//! A subject's reported test result must progress monotonically: once a
//! definitive result (negative or positive) is reported, later assessments
//! may only repeat it or report nothing. An empty report is always legal
//! and never regresses the tracked state.

use serde::{Deserialize, Serialize};

/// Reported diagnostic test result, ordered by progression.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// No result reported.
    #[default]
    Unset,
    /// Test taken, result pending.
    Waiting,
    Negative,
    Positive,
}

impl TestResult {
    /// Parse the raw survey value. Returns `None` for labels outside the
    /// fixed vocabulary, which callers treat as schema drift.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "" => Some(Self::Unset),
            "waiting" => Some(Self::Waiting),
            "no" => Some(Self::Negative),
            "yes" => Some(Self::Positive),
            _ => None,
        }
    }

    /// Canonical output label, the inverse of [`parse`](Self::parse).
    pub fn label(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Waiting => "waiting",
            Self::Negative => "no",
            Self::Positive => "yes",
        }
    }

    /// Whether `next` may legally follow a tracked state of `self`.
    pub fn allows(self, next: Self) -> bool {
        match self {
            Self::Unset | Self::Waiting => true,
            Self::Negative => matches!(next, Self::Unset | Self::Negative),
            Self::Positive => matches!(next, Self::Unset | Self::Positive),
        }
    }

    /// Whether `next` advances the tracked state. Terminal states never
    /// upgrade.
    pub fn upgrades_to(self, next: Self) -> bool {
        match self {
            Self::Unset => next != Self::Unset,
            Self::Waiting => matches!(next, Self::Negative | Self::Positive),
            Self::Negative | Self::Positive => false,
        }
    }
}
