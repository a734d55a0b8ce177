//! Configuration types for the planning system.

use pyo3::prelude::*;
use rustc_hash::FxHashSet;
use std::str::FromStr;

use crate::conflict::TimeInterval;

/// Workload cap applied when no preference is given.
pub const DEFAULT_MAX_HOURS_PER_TERM: f64 = 384.0;

/// Search-node budget applied when no limit is given.
pub const DEFAULT_MAX_SEARCH_NODES: u64 = 1_000_000;

/// Build a two-semester-per-year horizon: "2025C1", "2025C2", ... "<last>C2".
pub fn semester_terms(first_year: i32, last_year: i32) -> Vec<String> {
    (first_year..=last_year)
        .flat_map(|year| [format!("{}C1", year), format!("{}C2", year)])
        .collect()
}

/// Check a workload cap: finite and positive.
pub fn check_max_hours(cap: f64) -> Result<(), String> {
    if cap.is_finite() && cap > 0.0 {
        Ok(())
    } else {
        Err(format!("max_hours_per_term must be positive, got {}", cap))
    }
}

/// Check a term sequence: non-empty, no label twice.
pub fn check_terms(terms: &[String]) -> Result<(), String> {
    if terms.is_empty() {
        return Err("term sequence is empty".to_string());
    }
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for term in terms {
        if !seen.insert(term.as_str()) {
            return Err(format!("term {:?} appears twice", term));
        }
    }
    Ok(())
}

/// Planner configuration: horizon, workload cap and timetable preference.
#[pyclass]
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    /// Ordered term labels making up the planning horizon.
    #[pyo3(get, set)]
    pub terms: Vec<String>,
    /// Maximum sum of course hours allowed in a single term.
    #[pyo3(get, set)]
    pub max_hours_per_term: f64,
    /// Preferred meeting window: "any", "morning", "afternoon", "evening"/"night" or "day".
    #[pyo3(get, set)]
    pub preferred_time: String,
    /// Maximum number of search nodes before the planner gives up (None = unlimited).
    #[pyo3(get, set)]
    pub max_search_nodes: Option<u64>,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            terms: semester_terms(2025, 2040),
            max_hours_per_term: DEFAULT_MAX_HOURS_PER_TERM,
            preferred_time: "any".to_string(),
            max_search_nodes: Some(DEFAULT_MAX_SEARCH_NODES),
            verbosity: 0,
        }
    }
}

#[pymethods]
impl PlannerConfig {
    #[new]
    #[pyo3(signature = (
        terms=None,
        max_hours_per_term=None,
        preferred_time=None,
        max_search_nodes=Some(DEFAULT_MAX_SEARCH_NODES),
        verbosity=0
    ))]
    fn new(
        terms: Option<Vec<String>>,
        max_hours_per_term: Option<f64>,
        preferred_time: Option<String>,
        max_search_nodes: Option<u64>,
        verbosity: u8,
    ) -> Self {
        let defaults = Self::default();
        Self {
            terms: terms.unwrap_or(defaults.terms),
            max_hours_per_term: max_hours_per_term.unwrap_or(defaults.max_hours_per_term),
            preferred_time: preferred_time.unwrap_or(defaults.preferred_time),
            max_search_nodes,
            verbosity,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "PlannerConfig(terms={}, max_hours_per_term={}, preferred_time={:?})",
            self.terms.len(),
            self.max_hours_per_term,
            self.preferred_time
        )
    }
}

/// Time-of-day window a student prefers to attend.
///
/// Windows are judged by the start of a meeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreferredTime {
    Any,
    /// Starts before 12:00.
    Morning,
    /// Starts between 12:00 and 18:00.
    Afternoon,
    /// Starts at or after 18:00.
    Evening,
    /// Starts before 18:00.
    Day,
}

impl PreferredTime {
    /// True if a meeting over `interval` falls in this window.
    pub fn admits(&self, interval: &TimeInterval) -> bool {
        let start = interval.start;
        match self {
            Self::Any => true,
            Self::Morning => start < 12 * 60,
            Self::Afternoon => (12 * 60..18 * 60).contains(&start),
            Self::Evening => start >= 18 * 60,
            Self::Day => start < 18 * 60,
        }
    }
}

impl FromStr for PreferredTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "any" => Ok(Self::Any),
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" | "night" => Ok(Self::Evening),
            "day" => Ok(Self::Day),
            other => Err(format!("unknown preferred_time: {:?}", other)),
        }
    }
}
