//! Graphviz DOT rendering of a plan report.

use rustc_hash::FxHashSet;
use std::fmt;

use crate::report::PlanReport;

const FIRST_SEMESTER_FILL: &str = "#E6F3FF";
const SECOND_SEMESTER_FILL: &str = "#FFF0E6";
const UNASSIGNED_FILL: &str = "#FFE6E6";
const TOTAL_FILL: &str = "#E6FFE6";

/// Quote a DOT string, escaping quotes and backslashes; newlines become `\n`.
fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Fill for a term cluster: keyed on a "C1"/"C2" label suffix, otherwise on
/// horizon position parity.
fn term_fill(term: &str, position: usize) -> &'static str {
    if term.ends_with("C1") {
        FIRST_SEMESTER_FILL
    } else if term.ends_with("C2") || position % 2 == 1 {
        SECOND_SEMESTER_FILL
    } else {
        FIRST_SEMESTER_FILL
    }
}

fn node_id(course_id: &str) -> String {
    quoted(&format!("course_{}", course_id))
}

/// Display adapter writing a report as a left-to-right digraph.
///
/// Each term becomes a cluster labelled with its hours, filled by semester.
/// Unassigned courses sit in their own cluster. Edges run from correlative to
/// dependent whenever both ends are drawn.
pub struct PlanDot<'a>(pub &'a PlanReport);

impl fmt::Display for PlanDot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let mut drawn: FxHashSet<&str> = FxHashSet::default();

        writeln!(f, "digraph plan {{")?;
        writeln!(f, "  rankdir=LR;")?;
        writeln!(f, "  node [shape=box, style=\"rounded,filled\"];")?;

        for summary in &report.terms {
            let fill = term_fill(&summary.term, summary.position);
            writeln!(f, "  subgraph {} {{", quoted(&format!("cluster_{}", summary.term)))?;
            writeln!(
                f,
                "    label={};",
                quoted(&format!("Term {}\n({} hours)", summary.term, summary.total_hours))
            )?;
            writeln!(f, "    style=rounded;")?;
            for course in &summary.courses {
                let label = format!(
                    "{}\n{}hs\n{}\n{}",
                    course.name,
                    course.hours,
                    course.schedule.days.join(", "),
                    course.schedule.time
                );
                writeln!(
                    f,
                    "    {} [label={}, fillcolor={}];",
                    node_id(&course.id),
                    quoted(&label),
                    quoted(fill)
                )?;
                drawn.insert(course.id.as_str());
            }
            writeln!(f, "  }}")?;
        }

        if !report.unassigned.is_empty() {
            writeln!(f, "  subgraph \"cluster_unassigned\" {{")?;
            writeln!(f, "    label={};", quoted("Unassigned"))?;
            writeln!(f, "    style=rounded;")?;
            for course in &report.unassigned {
                let schedules: Vec<String> =
                    course.schedule_options.iter().map(|o| o.to_string()).collect();
                let label = format!(
                    "{}\n{}hs\nSchedules:\n{}",
                    course.name,
                    course.hours,
                    schedules.join("\n")
                );
                writeln!(
                    f,
                    "    {} [label={}, fillcolor={}];",
                    node_id(&course.id),
                    quoted(&label),
                    quoted(UNASSIGNED_FILL)
                )?;
                drawn.insert(course.id.as_str());
            }
            writeln!(f, "  }}")?;
        }

        let placed = report
            .terms
            .iter()
            .flat_map(|t| t.courses.iter().map(|c| (&c.id, &c.correlatives)));
        let residue = report.unassigned.iter().map(|c| (&c.id, &c.correlatives));
        for (id, correlatives) in placed.chain(residue) {
            for correlative in correlatives {
                if drawn.contains(correlative.as_str()) {
                    writeln!(f, "  {} -> {};", node_id(correlative), node_id(id))?;
                }
            }
        }

        writeln!(
            f,
            "  total_hours [shape=note, style=filled, fillcolor={}, label={}];",
            quoted(TOTAL_FILL),
            quoted(&format!("Total plan hours:\n{}hs", report.total_hours))
        )?;
        if !report.unassigned.is_empty() {
            writeln!(
                f,
                "  unassigned_hours [shape=note, style=filled, fillcolor={}, label={}];",
                quoted(UNASSIGNED_FILL),
                quoted(&format!("Total unassigned hours:\n{}hs", report.unassigned_hours))
            )?;
        }
        writeln!(f, "}}")
    }
}
