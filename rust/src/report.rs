//! Plan assembly: term summaries, unassigned residue, totals and renderings.

use pyo3::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::dot::PlanDot;
use crate::models::ScheduleOption;
use crate::planner::{PlanOutcome, TermPlanner};

/// A course placed in a term, with the schedule option chosen for it.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedCourse {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub hours: f64,
    #[pyo3(get)]
    pub schedule: ScheduleOption,
    #[pyo3(get)]
    pub correlatives: Vec<String>,
}

#[pymethods]
impl PlacedCourse {
    fn __repr__(&self) -> String {
        format!("PlacedCourse(id={:?}, schedule={:?})", self.id, self.schedule.to_string())
    }
}

/// All courses placed in one term of the horizon.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TermSummary {
    #[pyo3(get)]
    pub term: String,
    /// Position of the term in the horizon.
    #[pyo3(get)]
    pub position: usize,
    #[pyo3(get)]
    pub courses: Vec<PlacedCourse>,
    #[pyo3(get)]
    pub total_hours: f64,
}

#[pymethods]
impl TermSummary {
    fn __repr__(&self) -> String {
        format!(
            "TermSummary(term={:?}, courses={}, total_hours={})",
            self.term,
            self.courses.len(),
            self.total_hours
        )
    }
}

/// A course no term admitted.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnassignedCourse {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub hours: f64,
    #[pyo3(get)]
    pub correlatives: Vec<String>,
    /// Correlatives that are neither approved nor placed.
    #[pyo3(get)]
    pub pending_correlatives: Vec<String>,
    #[pyo3(get)]
    pub schedule_options: Vec<ScheduleOption>,
}

#[pymethods]
impl UnassignedCourse {
    fn __repr__(&self) -> String {
        format!(
            "UnassignedCourse(id={:?}, pending_correlatives={:?})",
            self.id, self.pending_correlatives
        )
    }
}

/// Final result of a planning run.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanReport {
    /// Non-empty terms in horizon order.
    #[pyo3(get)]
    pub terms: Vec<TermSummary>,
    /// Non-approved courses left out of the plan, in catalog order.
    #[pyo3(get)]
    pub unassigned: Vec<UnassignedCourse>,
    #[pyo3(get)]
    pub approved_courses: Vec<String>,
    #[pyo3(get)]
    pub total_hours: f64,
    #[pyo3(get)]
    pub unassigned_hours: f64,
    /// Schedule option chosen for each placed course.
    #[pyo3(get)]
    pub chosen_schedules: BTreeMap<String, ScheduleOption>,
    #[pyo3(get)]
    pub diagnostics: Vec<Diagnostic>,
    #[pyo3(get)]
    pub search_nodes: u64,
}

impl PlanReport {
    /// Build the report for `outcome`, produced by `planner`.
    pub fn assemble(planner: &TermPlanner<'_>, outcome: PlanOutcome) -> Self {
        let catalog = planner.catalog();
        let plan = &outcome.plan;
        let mut diagnostics = outcome.diagnostics;

        let mut terms = Vec::new();
        let mut chosen_schedules = BTreeMap::new();
        let mut total_hours = 0.0;
        for (position, placed) in plan.iter_terms() {
            if placed.is_empty() {
                continue;
            }
            let courses: Vec<PlacedCourse> = placed
                .iter()
                .filter_map(|&idx| {
                    let course = catalog.course(idx);
                    let schedule = course.schedule_options.get(plan.chosen_option(idx)?)?.clone();
                    chosen_schedules.insert(course.id.clone(), schedule.clone());
                    Some(PlacedCourse {
                        id: course.id.clone(),
                        name: course.name.clone(),
                        hours: course.hours,
                        schedule,
                        correlatives: course.correlatives.clone(),
                    })
                })
                .collect();
            let term_hours = plan.hours_in(position);
            total_hours += term_hours;
            terms.push(TermSummary {
                term: planner.terms()[position].clone(),
                position,
                courses,
                total_hours: term_hours,
            });
        }

        let mut unassigned = Vec::new();
        let mut unassigned_hours = 0.0;
        for (idx, course) in catalog.courses().iter().enumerate() {
            if planner.is_approved(idx) || plan.term_of(idx).is_some() {
                continue;
            }
            let pending_correlatives: Vec<String> = catalog
                .correlatives_of(idx)
                .iter()
                .filter(|&&corr| !planner.is_approved(corr) && plan.term_of(corr).is_none())
                .map(|&corr| catalog.course(corr).id.clone())
                .collect();
            let reason = if pending_correlatives.is_empty() {
                "no term satisfies the hour cap and timetable".to_string()
            } else {
                format!("correlatives never placed: {}", pending_correlatives.join(", "))
            };
            diagnostics.push(Diagnostic::for_course(
                DiagnosticKind::Unassigned,
                &course.id,
                format!("{} ({}) was not assigned: {}", course.name, course.id, reason),
            ));
            unassigned_hours += course.hours;
            unassigned.push(UnassignedCourse {
                id: course.id.clone(),
                name: course.name.clone(),
                hours: course.hours,
                correlatives: course.correlatives.clone(),
                pending_correlatives,
                schedule_options: course.schedule_options.clone(),
            });
        }

        if !outcome.pending.is_empty() && plan.is_empty() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::NothingAssigned,
                "no course could be assigned to any term",
            ));
        }

        Self {
            terms,
            unassigned,
            approved_courses: planner
                .approved_courses()
                .into_iter()
                .map(|idx| catalog.course(idx).id.clone())
                .collect(),
            total_hours,
            unassigned_hours,
            chosen_schedules,
            diagnostics,
            search_nodes: outcome.stats.nodes,
        }
    }

    /// True if every non-approved course was placed.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Graphviz DOT rendering of the plan.
    pub fn to_dot(&self) -> String {
        PlanDot(self).to_string()
    }
}

#[pymethods]
impl PlanReport {
    #[getter]
    fn complete(&self) -> bool {
        self.is_complete()
    }

    #[pyo3(name = "to_json")]
    fn py_to_json(&self) -> PyResult<String> {
        self.to_json()
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    #[pyo3(name = "to_dot")]
    fn py_to_dot(&self) -> String {
        self.to_dot()
    }

    fn __str__(&self) -> String {
        self.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "PlanReport(terms={}, unassigned={}, total_hours={})",
            self.terms.len(),
            self.unassigned.len(),
            self.total_hours
        )
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.approved_courses.is_empty() {
            writeln!(f, "Approved courses: {}", self.approved_courses.len())?;
        }

        if !self.unassigned.is_empty() {
            writeln!(f, "Plan is incomplete.")?;
            writeln!(f)?;
            writeln!(f, "Unassigned courses:")?;
            for course in &self.unassigned {
                writeln!(f)?;
                writeln!(f, "{} (ID: {})", course.name, course.id)?;
                writeln!(f, "Correlatives: [{}]", course.correlatives.join(", "))?;
                writeln!(f, "Available schedules:")?;
                for option in &course.schedule_options {
                    writeln!(f, "  {}", option)?;
                }
            }
            writeln!(f)?;
        }

        if self.terms.is_empty() {
            return writeln!(f, "No course could be assigned.");
        }

        writeln!(f, "Study plan:")?;
        for summary in &self.terms {
            writeln!(f)?;
            writeln!(f, "Term {}:", summary.term)?;
            for course in &summary.courses {
                writeln!(f, "- {} ({} hours)", course.name, course.hours)?;
                writeln!(f, "  Schedule: {}", course.schedule)?;
            }
            writeln!(f, "Term total hours: {}", summary.total_hours)?;
        }
        writeln!(f)?;
        writeln!(f, "Total plan hours: {}", self.total_hours)
    }
}
