//! Typed view over the result written by the reference engine
//!
//! `run` returns the result file verbatim; callers that know the engine
//! follows the `{meta, summary, tests}` layout can convert it here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub meta: ReportMeta,
    pub summary: Summary,
    pub tests: Vec<CaseResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub framework: String,
    pub version: String,
    /// ISO-8601, as written by the engine
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    pub status: CaseStatus,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl RunReport {
    /// Interpret a parsed result value
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the value does not have the report layout
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.tests
            .iter()
            .filter(|case| case.status == CaseStatus::Failed)
    }
}
