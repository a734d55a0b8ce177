//! Partial plan carried through the search.

use crate::catalog::CourseIdx;

/// Index of a term in the planning horizon.
pub type TermIdx = usize;

/// A (partial) assignment of courses to terms, with the option chosen for each.
///
/// Everything is indexed by catalog position or term position, so a branch
/// copy is a handful of flat vector clones. Branches never share state: a
/// failed branch is dropped, never rolled back.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    /// Courses per term, in placement order.
    terms: Vec<Vec<CourseIdx>>,
    /// Hours already booked per term.
    term_hours: Vec<f64>,
    /// Term of each placed course.
    placed_in: Vec<Option<TermIdx>>,
    /// Schedule option chosen for each placed course.
    chosen: Vec<Option<usize>>,
}

impl Plan {
    /// Create an empty plan over `term_count` terms and `course_count` courses.
    pub fn empty(term_count: usize, course_count: usize) -> Self {
        Self {
            terms: vec![Vec::new(); term_count],
            term_hours: vec![0.0; term_count],
            placed_in: vec![None; course_count],
            chosen: vec![None; course_count],
        }
    }

    /// Copy this plan for a new search branch.
    ///
    /// Hot path during search.
    pub fn clone_for_branch(&self) -> Self {
        self.clone()
    }

    /// Record `course` in `term` with schedule option `option`.
    pub(crate) fn place(&mut self, course: CourseIdx, term: TermIdx, option: usize, hours: f64) {
        self.terms[term].push(course);
        self.term_hours[term] += hours;
        self.placed_in[course] = Some(term);
        self.chosen[course] = Some(option);
    }

    #[inline]
    pub fn courses_in(&self, term: TermIdx) -> &[CourseIdx] {
        &self.terms[term]
    }

    #[inline]
    pub fn hours_in(&self, term: TermIdx) -> f64 {
        self.term_hours[term]
    }

    #[inline]
    pub fn term_of(&self, course: CourseIdx) -> Option<TermIdx> {
        self.placed_in[course]
    }

    #[inline]
    pub fn chosen_option(&self, course: CourseIdx) -> Option<usize> {
        self.chosen[course]
    }

    /// Number of placed courses.
    pub fn placed_count(&self) -> usize {
        self.placed_in.iter().filter(|t| t.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.iter().all(Vec::is_empty)
    }

    /// Iterate `(term, courses)` over every term, including empty ones.
    pub fn iter_terms(&self) -> impl Iterator<Item = (TermIdx, &[CourseIdx])> {
        self.terms.iter().enumerate().map(|(t, c)| (t, c.as_slice()))
    }
}
