//! Randomized checks of the planner invariants over generated acyclic catalogs.

use proptest::prelude::*;
use rustc_hash::FxHashMap;

use termplan_rust::graph::DependencyGraph;
use termplan_rust::leveling::TopologicalLevels;
use termplan_rust::{
    plan_courses, schedules_compatible, Catalog, Course, PlanReport, PlannerConfig,
    ScheduleOption,
};

const DAYS: [&str; 3] = ["Lunes", "Miércoles", "Viernes"];

fn option((day, start, length): (usize, u32, u32)) -> ScheduleOption {
    ScheduleOption {
        days: vec![DAYS[day].to_string()],
        time: format!("{:02}:00-{:02}:00", start, start + length),
    }
}

fn arb_option() -> impl Strategy<Value = ScheduleOption> {
    (0usize..DAYS.len(), 7u32..20, 1u32..4).prop_map(option)
}

/// Catalogs whose correlatives always point to later positions, so the
/// leveler has to reorder them.
fn arb_catalog() -> impl Strategy<Value = Vec<Course>> {
    (1usize..10).prop_flat_map(|n| {
        prop::collection::vec(
            (
                0u32..25,
                prop::collection::vec(arb_option(), 1..4),
                prop::collection::vec(any::<bool>(), n),
            ),
            n,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (units, schedule_options, edges))| Course {
                    id: format!("c{}", i),
                    name: format!("Course {}", i),
                    year: "1".to_string(),
                    term: "1".to_string(),
                    hours: f64::from(units) * 16.0,
                    schedule_options,
                    correlatives: edges
                        .iter()
                        .enumerate()
                        .filter(|&(j, &linked)| linked && j > i)
                        .map(|(j, _)| format!("c{}", j))
                        .collect(),
                })
                .collect()
        })
    })
}

fn arb_config() -> impl Strategy<Value = PlannerConfig> {
    (1usize..6, prop::sample::select(vec![64.0, 128.0, 384.0])).prop_map(|(terms, cap)| {
        PlannerConfig {
            terms: (1..=terms).map(|t| format!("T{}", t)).collect(),
            max_hours_per_term: cap,
            ..PlannerConfig::default()
        }
    })
}

fn approved_ids(courses: &[Course], flags: &[bool]) -> Vec<String> {
    courses
        .iter()
        .zip(flags)
        .filter(|(_, approved)| **approved)
        .map(|(c, _)| c.id.clone())
        .collect()
}

fn term_positions(report: &PlanReport) -> FxHashMap<&str, usize> {
    report
        .terms
        .iter()
        .flat_map(|t| t.courses.iter().map(move |c| (c.id.as_str(), t.position)))
        .collect()
}

proptest! {
    #[test]
    fn topological_order_puts_correlatives_first(courses in arb_catalog()) {
        let catalog = Catalog::new(courses).unwrap();
        let levels = TopologicalLevels::compute(&DependencyGraph::build(&catalog));

        prop_assert_eq!(levels.order.len(), catalog.len());
        let mut position = vec![0; catalog.len()];
        for (i, &idx) in levels.order.iter().enumerate() {
            position[idx] = i;
        }
        for idx in 0..catalog.len() {
            for &corr in catalog.correlatives_of(idx) {
                prop_assert!(position[corr] < position[idx]);
            }
        }
    }

    #[test]
    fn conflict_check_is_symmetric(a in arb_option(), b in arb_option()) {
        prop_assert_eq!(
            schedules_compatible(&a, &b).unwrap(),
            schedules_compatible(&b, &a).unwrap()
        );
    }

    #[test]
    fn plans_respect_cap_precedence_and_timetable(
        courses in arb_catalog(),
        flags in prop::collection::vec(any::<bool>(), 10),
        config in arb_config(),
    ) {
        let approved = approved_ids(&courses, &flags);
        let catalog = Catalog::new(courses).unwrap();
        let report = plan_courses(&catalog, &approved, &config).unwrap();
        let placed_in = term_positions(&report);

        for summary in &report.terms {
            let hours: f64 = summary.courses.iter().map(|c| c.hours).sum();
            prop_assert!(hours <= config.max_hours_per_term);
            prop_assert_eq!(hours, summary.total_hours);

            for (i, first) in summary.courses.iter().enumerate() {
                for second in &summary.courses[i + 1..] {
                    prop_assert!(schedules_compatible(&first.schedule, &second.schedule).unwrap());
                }
            }

            for course in &summary.courses {
                prop_assert!(!approved.contains(&course.id));
                for corr in &course.correlatives {
                    if approved.contains(corr) {
                        continue;
                    }
                    let earlier = placed_in.get(corr.as_str()).map(|&t| t < summary.position);
                    prop_assert_eq!(earlier, Some(true));
                }
            }
        }

        let accounted = placed_in.len() + report.unassigned.len() + approved.len();
        prop_assert_eq!(accounted, catalog.len());
    }

    #[test]
    fn planning_is_deterministic(
        courses in arb_catalog(),
        flags in prop::collection::vec(any::<bool>(), 10),
        config in arb_config(),
    ) {
        let approved = approved_ids(&courses, &flags);
        let catalog = Catalog::new(courses).unwrap();

        let first = plan_courses(&catalog, &approved, &config).unwrap();
        let second = plan_courses(&catalog, &approved, &config).unwrap();

        prop_assert_eq!(first, second);
    }
}
