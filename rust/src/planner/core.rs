//! Core term assignment search.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, CourseIdx};
use crate::config::{check_max_hours, check_terms, PlannerConfig, PreferredTime};
use crate::conflict::{select_option, ScheduleParseError};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::graph::DependencyGraph;
use crate::leveling::TopologicalLevels;
use crate::loader::LoadError;
use crate::models::ScheduleOption;
use crate::{log_changes, log_checks, log_debug};

use super::state::{Plan, TermIdx};

/// Errors that can occur during planning.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Course not found: {0}")]
    UnknownCourse(String),
    #[error("Term not in planning horizon: {0}")]
    UnknownTerm(String),
    #[error("Bad schedule while placing course {course}: {source}")]
    Schedule {
        course: String,
        #[source]
        source: ScheduleParseError,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Counters kept while searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Search calls that considered a course.
    pub nodes: u64,
    /// True if the node budget ran out before every course was considered.
    pub exhausted: bool,
}

/// Result of a planning run.
#[derive(Clone, Debug)]
pub struct PlanOutcome {
    /// Final assignment; courses absent from it are unassigned.
    pub plan: Plan,
    /// Non-approved courses in the order they were attempted.
    pub pending: Vec<CourseIdx>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: SearchStats,
}

/// Places catalog courses into an ordered horizon of terms.
///
/// Courses are taken in topological order. Each one goes into the first term
/// where all non-approved correlatives sit in strictly earlier terms, the
/// term's hours stay within the cap, and a schedule option fits next to the
/// options already chosen in that term. A course no term admits is skipped and
/// stays unassigned; the search never aborts on it.
pub struct TermPlanner<'a> {
    catalog: &'a Catalog,
    terms: Vec<String>,
    max_hours_per_term: f64,
    preferred_time: PreferredTime,
    max_search_nodes: Option<u64>,
    verbosity: u8,
    approved: FxHashSet<CourseIdx>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> TermPlanner<'a> {
    /// Create a planner, validating the configuration upfront.
    ///
    /// Approved ids that name no catalog course are dropped with a
    /// `UnknownApprovedCourse` diagnostic.
    pub fn new<I, S>(
        catalog: &'a Catalog,
        approved_ids: I,
        config: &PlannerConfig,
    ) -> Result<Self, PlannerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        check_max_hours(config.max_hours_per_term).map_err(PlannerError::InvalidConfig)?;
        check_terms(&config.terms).map_err(PlannerError::InvalidConfig)?;
        let preferred_time: PreferredTime = config
            .preferred_time
            .parse()
            .map_err(PlannerError::InvalidConfig)?;

        let verbosity = config.verbosity;
        let (approved, unknown) = catalog.resolve_approved(approved_ids);
        let diagnostics = unknown
            .iter()
            .map(|id| {
                log_changes!(verbosity, "Ignoring unknown approved course {}", id);
                Diagnostic::for_course(
                    DiagnosticKind::UnknownApprovedCourse,
                    id,
                    format!("approved course {} is not in the catalog", id),
                )
            })
            .collect();

        Ok(Self {
            catalog,
            terms: config.terms.clone(),
            max_hours_per_term: config.max_hours_per_term,
            preferred_time,
            max_search_nodes: config.max_search_nodes,
            verbosity,
            approved,
            diagnostics,
        })
    }

    /// Prepend diagnostics raised before planning (e.g. while loading config).
    pub fn with_diagnostics(mut self, mut earlier: Vec<Diagnostic>) -> Self {
        earlier.append(&mut self.diagnostics);
        self.diagnostics = earlier;
        self
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[inline]
    pub fn is_approved(&self, course: CourseIdx) -> bool {
        self.approved.contains(&course)
    }

    /// Approved course positions, in catalog order.
    pub fn approved_courses(&self) -> Vec<CourseIdx> {
        let mut approved: Vec<CourseIdx> = self.approved.iter().copied().collect();
        approved.sort_unstable();
        approved
    }

    pub fn term_position(&self, term: &str) -> Option<TermIdx> {
        self.terms.iter().position(|t| t == term)
    }

    /// A plan with no course placed, sized for this planner.
    pub fn empty_plan(&self) -> Plan {
        Plan::empty(self.terms.len(), self.catalog.len())
    }

    fn resolve(&self, course_id: &str, term: &str) -> Result<(CourseIdx, TermIdx), PlannerError> {
        let course = self
            .catalog
            .position(course_id)
            .ok_or_else(|| PlannerError::UnknownCourse(course_id.to_string()))?;
        let term = self
            .term_position(term)
            .ok_or_else(|| PlannerError::UnknownTerm(term.to_string()))?;
        Ok((course, term))
    }

    /// Check whether `course_id` may be placed in `term` on top of `plan`.
    pub fn can_place(
        &self,
        course_id: &str,
        term: &str,
        plan: &Plan,
    ) -> Result<bool, PlannerError> {
        let (course, term) = self.resolve(course_id, term)?;
        Ok(self.admit(course, term, plan)?.is_some())
    }

    /// First schedule option of `course_id` compatible with every option
    /// already chosen in `term` (preference window first, then declared order).
    pub fn select_schedule(
        &self,
        course_id: &str,
        term: &str,
        plan: &Plan,
    ) -> Result<Option<&'a ScheduleOption>, PlannerError> {
        let (course, term) = self.resolve(course_id, term)?;
        let option = self.choose_option(course, term, plan)?;
        Ok(option.map(|o| &self.catalog.course(course).schedule_options[o]))
    }

    /// Run the search over the whole catalog.
    pub fn plan(&self) -> Result<PlanOutcome, PlannerError> {
        let levels = TopologicalLevels::compute(&DependencyGraph::build(self.catalog));
        let pending: Vec<CourseIdx> = levels
            .order
            .iter()
            .copied()
            .filter(|course| !self.approved.contains(course))
            .collect();

        log_debug!(
            self.verbosity,
            "Planning {} courses ({} approved) over {} terms in {} layers",
            pending.len(),
            self.approved.len(),
            self.terms.len(),
            levels.layers.len()
        );

        let mut stats = SearchStats::default();
        let plan = self.search(&pending, self.empty_plan(), &mut stats)?;

        let mut diagnostics = self.diagnostics.clone();
        if stats.exhausted {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::SearchBudgetExhausted,
                format!(
                    "search stopped after {} nodes; later courses were not attempted",
                    stats.nodes.saturating_sub(1)
                ),
            ));
        }

        Ok(PlanOutcome {
            plan,
            pending,
            diagnostics,
            stats,
        })
    }

    /// Depth-first placement of `remaining` on top of `plan`.
    ///
    /// Every call consumes the head course, so recursion depth is bounded by
    /// the number of pending courses.
    fn search(
        &self,
        remaining: &[CourseIdx],
        plan: Plan,
        stats: &mut SearchStats,
    ) -> Result<Plan, PlannerError> {
        let Some((&course, rest)) = remaining.split_first() else {
            return Ok(plan);
        };

        stats.nodes += 1;
        if let Some(limit) = self.max_search_nodes {
            if stats.nodes > limit {
                stats.exhausted = true;
                log_changes!(
                    self.verbosity,
                    "Search budget of {} nodes exhausted, {} courses left unattempted",
                    limit,
                    remaining.len()
                );
                return Ok(plan);
            }
        }

        let info = self.catalog.course(course);
        log_debug!(
            self.verbosity,
            "Node {}: course {} ({} remaining after it)",
            stats.nodes,
            info.id,
            rest.len()
        );

        for term in 0..self.terms.len() {
            if let Some(option) = self.admit(course, term, &plan)? {
                let mut branch = plan.clone_for_branch();
                branch.place(course, term, option, info.hours);
                log_changes!(
                    self.verbosity,
                    "Placed {} in {} at {}",
                    info.id,
                    self.terms[term],
                    info.schedule_options[option]
                );
                // Any completion of the remainder counts as success, so the
                // first admissible term is final.
                return self.search(rest, branch, stats);
            }
        }

        log_changes!(
            self.verbosity,
            "No term admits {}, leaving it unassigned",
            info.id
        );
        self.search(rest, plan, stats)
    }

    /// Return the schedule option `course` would take in `term`, or None if
    /// the course may not go there.
    fn admit(
        &self,
        course: CourseIdx,
        term: TermIdx,
        plan: &Plan,
    ) -> Result<Option<usize>, PlannerError> {
        let info = self.catalog.course(course);
        let term_label = &self.terms[term];

        if self.approved.contains(&course) {
            log_checks!(self.verbosity, "  {} is approved, never placed", info.id);
            return Ok(None);
        }

        for &correlative in self.catalog.correlatives_of(course) {
            if self.approved.contains(&correlative) {
                continue;
            }
            let done_before = matches!(plan.term_of(correlative), Some(t) if t < term);
            if !done_before {
                log_checks!(
                    self.verbosity,
                    "  Skipping {} for {}: correlative {} not completed earlier",
                    info.id,
                    term_label,
                    self.catalog.course(correlative).id
                );
                return Ok(None);
            }
        }

        let booked = plan.hours_in(term);
        if booked + info.hours > self.max_hours_per_term {
            log_checks!(
                self.verbosity,
                "  Skipping {} for {}: {} + {} hours exceeds cap {}",
                info.id,
                term_label,
                booked,
                info.hours,
                self.max_hours_per_term
            );
            return Ok(None);
        }

        let option = self.choose_option(course, term, plan)?;
        if option.is_none() {
            log_checks!(
                self.verbosity,
                "  Skipping {} for {}: every schedule option clashes",
                info.id,
                term_label
            );
        }
        Ok(option)
    }

    fn choose_option(
        &self,
        course: CourseIdx,
        term: TermIdx,
        plan: &Plan,
    ) -> Result<Option<usize>, PlannerError> {
        let info = self.catalog.course(course);
        let taken: Vec<&ScheduleOption> = plan
            .courses_in(term)
            .iter()
            .filter_map(|&other| {
                plan.chosen_option(other)
                    .map(|o| &self.catalog.course(other).schedule_options[o])
            })
            .collect();

        select_option(&info.schedule_options, &taken, self.preferred_time).map_err(|source| {
            PlannerError::Schedule {
                course: info.id.clone(),
                source,
            }
        })
    }
}
