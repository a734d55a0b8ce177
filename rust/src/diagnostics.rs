//! Structured warnings returned alongside a plan.

use pyo3::prelude::*;
use serde::Serialize;

/// What a diagnostic is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An approved id names no catalog course; it was ignored.
    UnknownApprovedCourse,
    /// The user configuration file could not be read.
    ConfigUnreadable,
    /// The user configuration file is not valid JSON of the expected shape.
    ConfigMalformed,
    /// A course could not be placed in any term.
    Unassigned,
    /// The search-node budget ran out; remaining courses were not attempted.
    SearchBudgetExhausted,
    /// Courses were pending but none could be placed.
    NothingAssigned,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownApprovedCourse => "unknown_approved_course",
            Self::ConfigUnreadable => "config_unreadable",
            Self::ConfigMalformed => "config_malformed",
            Self::Unassigned => "unassigned",
            Self::SearchBudgetExhausted => "search_budget_exhausted",
            Self::NothingAssigned => "nothing_assigned",
        }
    }
}

/// One warning raised while loading inputs or planning.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    #[pyo3(get)]
    pub course_id: Option<String>,
    #[pyo3(get)]
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            course_id: None,
            message: message.into(),
        }
    }

    pub fn for_course(kind: DiagnosticKind, course_id: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            course_id: Some(course_id.to_string()),
            message: message.into(),
        }
    }
}

#[pymethods]
impl Diagnostic {
    #[getter(kind)]
    fn py_kind(&self) -> &'static str {
        self.kind.as_str()
    }

    fn __repr__(&self) -> String {
        format!("Diagnostic(kind={:?}, message={:?})", self.kind.as_str(), self.message)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)
    }
}
