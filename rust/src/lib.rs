//! Rust implementation of the termplan course planner.
//!
//! This module provides the catalog model, the term assignment search and the
//! plan report, exposed to Python as the `rust` extension module.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;
use std::path::{Path, PathBuf};

pub mod catalog;
pub mod config;
pub mod conflict;
pub mod diagnostics;
pub mod dot;
pub mod graph;
pub mod leveling;
pub mod loader;
pub mod logging;
mod models;
pub mod planner;
pub mod report;

pub use catalog::{Catalog, CatalogError, CourseIdx};
pub use config::{semester_terms, PlannerConfig, PreferredTime};
pub use conflict::{schedules_compatible, select_option, ScheduleParseError, TimeInterval};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use loader::{load_catalog, load_user_config, LoadError, UserConfig};
pub use models::{Course, ScheduleOption};
pub use planner::{Plan, PlanOutcome, PlannerError, SearchStats, TermPlanner};
pub use report::{PlacedCourse, PlanReport, TermSummary, UnassignedCourse};

/// Plan `catalog` on top of the approved ids and assemble the report.
pub fn plan_courses<I, S>(
    catalog: &Catalog,
    approved_ids: I,
    config: &PlannerConfig,
) -> Result<PlanReport, PlannerError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    plan_with_diagnostics(catalog, approved_ids, config, Vec::new())
}

fn plan_with_diagnostics<I, S>(
    catalog: &Catalog,
    approved_ids: I,
    config: &PlannerConfig,
    earlier: Vec<Diagnostic>,
) -> Result<PlanReport, PlannerError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let planner = TermPlanner::new(catalog, approved_ids, config)?.with_diagnostics(earlier);
    let outcome = planner.plan()?;
    crate::log_changes!(
        config.verbosity,
        "Placed {} courses in {} search nodes",
        outcome.plan.placed_count(),
        outcome.stats.nodes
    );
    Ok(PlanReport::assemble(&planner, outcome))
}

/// Load the catalog at `courses_path` and plan it.
///
/// Settings in the user configuration file override `config`. A missing or
/// malformed user configuration, or an invalid setting inside it, is reported
/// as a diagnostic ahead of the planner's own and never fails the run.
pub fn plan_from_files(
    courses_path: impl AsRef<Path>,
    config_path: Option<&Path>,
    mut config: PlannerConfig,
) -> Result<PlanReport, PlannerError> {
    let catalog = load_catalog(courses_path)?;

    let mut user = match config_path {
        Some(path) => load_user_config(path),
        None => UserConfig::default(),
    };
    user.apply(&mut config);
    for diagnostic in &user.diagnostics {
        crate::log_changes!(config.verbosity, "Warning: {}", diagnostic.message);
    }

    plan_with_diagnostics(
        &catalog,
        &user.approved_courses,
        &config,
        user.diagnostics,
    )
}

fn to_py_err(err: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(err.to_string())
}

fn load_error_to_py(err: LoadError) -> PyErr {
    match err {
        LoadError::Io { .. } => pyo3::exceptions::PyIOError::new_err(err.to_string()),
        other => to_py_err(other),
    }
}

fn planner_error_to_py(err: PlannerError) -> PyErr {
    match err {
        PlannerError::Load(err) => load_error_to_py(err),
        other => to_py_err(other),
    }
}

/// Load the course records of a catalog JSON file.
///
/// # Raises
/// * IOError if the file cannot be read
/// * ValueError if the JSON does not describe a list of courses
#[pyfunction]
#[pyo3(name = "load_courses")]
fn py_load_courses(path: PathBuf) -> PyResult<Vec<Course>> {
    loader::load_courses(path).map_err(load_error_to_py)
}

/// Assign courses to terms.
///
/// # Arguments
/// * `courses` - Catalog courses, in catalog order
/// * `approved_ids` - Ids of courses already completed
/// * `config` - Planner configuration (defaults when omitted)
///
/// # Raises
/// * ValueError on an invalid catalog, invalid configuration or malformed schedule time
#[pyfunction]
#[pyo3(name = "plan_courses", signature = (courses, approved_ids=Vec::new(), config=None))]
fn py_plan_courses(
    courses: Vec<Course>,
    approved_ids: Vec<String>,
    config: Option<PlannerConfig>,
) -> PyResult<PlanReport> {
    let config = config.unwrap_or_default();
    let catalog = Catalog::new(courses).map_err(to_py_err)?;
    plan_courses(&catalog, &approved_ids, &config).map_err(to_py_err)
}

/// Load the catalog and optional user configuration, then plan.
///
/// Settings in the user configuration file override `config`. A missing or
/// malformed user configuration is reported as a diagnostic, not raised.
///
/// # Raises
/// * IOError if the catalog file cannot be read
/// * ValueError on an invalid catalog, invalid configuration or malformed schedule time
#[pyfunction]
#[pyo3(name = "plan_from_files", signature = (courses_path, config_path=None, config=None))]
fn py_plan_from_files(
    courses_path: PathBuf,
    config_path: Option<PathBuf>,
    config: Option<PlannerConfig>,
) -> PyResult<PlanReport> {
    plan_from_files(
        courses_path,
        config_path.as_deref(),
        config.unwrap_or_default(),
    )
    .map_err(planner_error_to_py)
}

/// The termplan.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Catalog types
    m.add_class::<Course>()?;
    m.add_class::<ScheduleOption>()?;

    // Config types
    m.add_class::<PlannerConfig>()?;

    // Results
    m.add_class::<PlanReport>()?;
    m.add_class::<TermSummary>()?;
    m.add_class::<PlacedCourse>()?;
    m.add_class::<UnassignedCourse>()?;
    m.add_class::<Diagnostic>()?;

    // Functions
    m.add_function(wrap_pyfunction!(py_load_courses, m)?)?;
    m.add_function(wrap_pyfunction!(py_plan_courses, m)?)?;
    m.add_function(wrap_pyfunction!(py_plan_from_files, m)?)?;

    Ok(())
}
