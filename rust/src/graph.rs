//! Correlative dependency graph.

use crate::catalog::{Catalog, CourseIdx};

/// Forward edges (correlative -> dependents) and prerequisite counts.
///
/// Both vectors are indexed by catalog position. Dependents are listed in
/// catalog order, which keeps every traversal deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    pub dependents: Vec<Vec<CourseIdx>>,
    pub prerequisite_counts: Vec<usize>,
}

impl DependencyGraph {
    /// Build the graph from every course's correlative list.
    pub fn build(catalog: &Catalog) -> Self {
        let n = catalog.len();
        let mut dependents: Vec<Vec<CourseIdx>> = vec![Vec::new(); n];
        let mut prerequisite_counts = vec![0; n];

        for course in 0..n {
            for &correlative in catalog.correlatives_of(course) {
                dependents[correlative].push(course);
                prerequisite_counts[course] += 1;
            }
        }

        Self {
            dependents,
            prerequisite_counts,
        }
    }

    pub fn len(&self) -> usize {
        self.prerequisite_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prerequisite_counts.is_empty()
    }
}
