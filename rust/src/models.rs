//! Core data types for the planning system.

use pyo3::prelude::*;
use serde::Serialize;

use crate::conflict::{ScheduleParseError, TimeInterval};

/// One weekly meeting pattern a course may be taken in.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduleOption {
    /// Weekday labels, compared verbatim ("Lunes", "MO", ...).
    #[pyo3(get, set)]
    pub days: Vec<String>,
    /// Meeting interval as written in the catalog, e.g. "08:00-10:30".
    #[pyo3(get, set)]
    pub time: String,
}

impl ScheduleOption {
    /// Parse the meeting interval. Fails on malformed text.
    pub fn interval(&self) -> Result<TimeInterval, ScheduleParseError> {
        self.time.parse()
    }

    /// True if both options meet on at least one common weekday.
    pub fn shares_day_with(&self, other: &ScheduleOption) -> bool {
        self.days.iter().any(|d| other.days.contains(d))
    }
}

#[pymethods]
impl ScheduleOption {
    #[new]
    fn new(days: Vec<String>, time: String) -> Self {
        Self { days, time }
    }

    fn __repr__(&self) -> String {
        format!("ScheduleOption(days={:?}, time={:?})", self.days, self.time)
    }
}

impl std::fmt::Display for ScheduleOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.days.join(", "), self.time)
    }
}

/// A course in the catalog.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Course {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    /// Year of the curriculum the course belongs to (descriptive only).
    #[pyo3(get, set)]
    pub year: String,
    /// Term of the curriculum the course belongs to (descriptive only).
    #[pyo3(get, set)]
    pub term: String,
    #[pyo3(get, set)]
    pub hours: f64,
    #[pyo3(get, set)]
    pub schedule_options: Vec<ScheduleOption>,
    /// Ids of the courses that must be completed first.
    #[pyo3(get, set)]
    pub correlatives: Vec<String>,
}

#[pymethods]
impl Course {
    #[new]
    #[pyo3(signature = (
        id,
        name,
        hours,
        schedule_options,
        correlatives=Vec::new(),
        year=String::new(),
        term=String::new()
    ))]
    fn new(
        id: String,
        name: String,
        hours: f64,
        schedule_options: Vec<ScheduleOption>,
        correlatives: Vec<String>,
        year: String,
        term: String,
    ) -> Self {
        Self {
            id,
            name,
            year,
            term,
            hours,
            schedule_options,
            correlatives,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Course(id={:?}, hours={}, options={}, correlatives={:?})",
            self.id,
            self.hours,
            self.schedule_options.len(),
            self.correlatives
        )
    }
}
