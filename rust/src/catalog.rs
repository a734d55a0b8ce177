//! Immutable course catalog with validated correlatives.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::graph::DependencyGraph;
use crate::leveling::TopologicalLevels;
use crate::models::Course;

/// Position of a course in catalog order.
pub type CourseIdx = usize;

/// Errors raised while building a catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate course id: {0}")]
    DuplicateCourse(String),
    #[error("Course {course} lists unknown correlative {correlative}")]
    UnknownCorrelative { course: String, correlative: String },
    #[error("Circular correlatives among courses: {0:?}")]
    CircularCorrelatives(Vec<String>),
    #[error("Course {course} has invalid hours: {hours}")]
    InvalidHours { course: String, hours: f64 },
    #[error("Course {0} offers no schedule option")]
    NoScheduleOptions(String),
}

/// All courses known to the planner, in input order.
///
/// Construction checks that ids are unique, hours are valid, every
/// correlative names a catalog course, and the correlative graph is acyclic.
#[derive(Clone, Debug)]
pub struct Catalog {
    courses: Vec<Course>,
    index: FxHashMap<String, CourseIdx>,
    /// Resolved correlatives, indexed by course position.
    correlatives: Vec<Vec<CourseIdx>>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Result<Self, CatalogError> {
        let mut index: FxHashMap<String, CourseIdx> =
            FxHashMap::with_capacity_and_hasher(courses.len(), Default::default());
        for (idx, course) in courses.iter().enumerate() {
            if !course.hours.is_finite() || course.hours < 0.0 {
                return Err(CatalogError::InvalidHours {
                    course: course.id.clone(),
                    hours: course.hours,
                });
            }
            if course.schedule_options.is_empty() {
                return Err(CatalogError::NoScheduleOptions(course.id.clone()));
            }
            if index.insert(course.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateCourse(course.id.clone()));
            }
        }

        let mut correlatives = Vec::with_capacity(courses.len());
        for course in &courses {
            let resolved = course
                .correlatives
                .iter()
                .map(|corr| {
                    index
                        .get(corr)
                        .copied()
                        .ok_or_else(|| CatalogError::UnknownCorrelative {
                            course: course.id.clone(),
                            correlative: corr.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            correlatives.push(resolved);
        }

        let catalog = Self {
            courses,
            index,
            correlatives,
        };

        let levels = TopologicalLevels::compute(&DependencyGraph::build(&catalog));
        if !levels.unreached.is_empty() {
            return Err(CatalogError::CircularCorrelatives(
                levels
                    .unreached
                    .iter()
                    .map(|&idx| catalog.courses[idx].id.clone())
                    .collect(),
            ));
        }

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Courses in catalog order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[inline]
    pub fn course(&self, idx: CourseIdx) -> &Course {
        &self.courses[idx]
    }

    #[inline]
    pub fn position(&self, id: &str) -> Option<CourseIdx> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.position(id).map(|idx| &self.courses[idx])
    }

    /// Correlatives of the course at `idx`, as catalog positions.
    #[inline]
    pub fn correlatives_of(&self, idx: CourseIdx) -> &[CourseIdx] {
        &self.correlatives[idx]
    }

    /// Split approved ids into known course positions and unknown ids.
    ///
    /// Unknown ids keep their input order; duplicates are collapsed.
    pub fn resolve_approved<I, S>(&self, ids: I) -> (FxHashSet<CourseIdx>, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known = FxHashSet::default();
        let mut unknown: Vec<String> = Vec::new();
        for id in ids {
            let id = id.as_ref();
            match self.position(id) {
                Some(idx) => {
                    known.insert(idx);
                }
                None if !unknown.iter().any(|u| u == id) => unknown.push(id.to_string()),
                None => {}
            }
        }
        (known, unknown)
    }
}
