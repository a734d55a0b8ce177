//! Term planner: depth-first assignment of courses to an ordered horizon of terms.
//!
//! This module walks the catalog in topological order and places each course in
//! the earliest term that respects correlatives, the per-term hour cap and the
//! weekly timetable of courses already placed there.

mod core;
mod state;

pub use core::{PlanOutcome, PlannerError, SearchStats, TermPlanner};
pub use state::{Plan, TermIdx};
