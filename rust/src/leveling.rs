//! Layered topological ordering of the catalog (Kahn's algorithm).

use std::collections::VecDeque;

use crate::catalog::{Catalog, CourseIdx};
use crate::graph::DependencyGraph;

/// Topological order of the catalog, grouped into dependency layers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopologicalLevels {
    /// Every reachable course, after all of its correlatives.
    pub order: Vec<CourseIdx>,
    /// Layer k holds courses whose correlatives all sit in layers < k.
    pub layers: Vec<Vec<CourseIdx>>,
    /// Layer of each course, indexed by catalog position (None if unreached).
    pub level_of: Vec<Option<usize>>,
    /// Courses never released because they sit on a correlative cycle.
    pub unreached: Vec<CourseIdx>,
}

impl TopologicalLevels {
    /// Drain the ready queue one layer at a time.
    ///
    /// The queue starts with every zero-count course in catalog order. Each
    /// pass dequeues exactly the courses present when the pass began, so the
    /// dependents it releases form the next layer.
    pub fn compute(graph: &DependencyGraph) -> Self {
        let n = graph.len();
        let mut remaining = graph.prerequisite_counts.clone();
        let mut queue: VecDeque<CourseIdx> = (0..n).filter(|&idx| remaining[idx] == 0).collect();

        let mut order: Vec<CourseIdx> = Vec::with_capacity(n);
        let mut layers: Vec<Vec<CourseIdx>> = Vec::new();
        let mut level_of: Vec<Option<usize>> = vec![None; n];

        while !queue.is_empty() {
            let level = layers.len();
            let layer_size = queue.len();
            let mut layer = Vec::with_capacity(layer_size);

            for _ in 0..layer_size {
                let Some(course) = queue.pop_front() else {
                    break;
                };
                order.push(course);
                layer.push(course);
                level_of[course] = Some(level);

                for &dependent in &graph.dependents[course] {
                    remaining[dependent] -= 1;
                    if remaining[dependent] == 0 {
                        queue.push_back(dependent);
                    }
                }
            }

            layers.push(layer);
        }

        let unreached = (0..n).filter(|&idx| level_of[idx].is_none()).collect();

        Self {
            order,
            layers,
            level_of,
            unreached,
        }
    }

    /// The order as course ids.
    pub fn order_ids<'a>(&self, catalog: &'a Catalog) -> Vec<&'a str> {
        self.order
            .iter()
            .map(|&idx| catalog.course(idx).id.as_str())
            .collect()
    }
}
