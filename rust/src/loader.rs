//! JSON loading of the course catalog and the user configuration file.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};
use crate::config::{check_max_hours, check_terms, PlannerConfig, PreferredTime};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::models::{Course, ScheduleOption};

/// Errors raised while loading the course catalog.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid catalog JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// An identifier written either as a JSON string or as a number.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
enum RawLabel {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for RawLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

fn labels(raw: Vec<RawLabel>) -> Vec<String> {
    raw.into_iter().map(|l| l.to_string()).collect()
}

#[derive(Deserialize, Debug)]
struct RawScheduleOption {
    #[serde(default)]
    days: Vec<String>,
    time: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawCourse {
    id: RawLabel,
    name: String,
    #[serde(default)]
    year: Option<RawLabel>,
    #[serde(default)]
    term: Option<RawLabel>,
    hours: f64,
    #[serde(default)]
    schedule_options: Vec<RawScheduleOption>,
    #[serde(default)]
    correlatives: Vec<RawLabel>,
}

impl From<RawCourse> for Course {
    fn from(raw: RawCourse) -> Self {
        Course {
            id: raw.id.to_string(),
            name: raw.name,
            year: raw.year.map(|y| y.to_string()).unwrap_or_default(),
            term: raw.term.map(|t| t.to_string()).unwrap_or_default(),
            hours: raw.hours,
            schedule_options: raw
                .schedule_options
                .into_iter()
                .map(|o| ScheduleOption {
                    days: o.days,
                    time: o.time,
                })
                .collect(),
            correlatives: labels(raw.correlatives),
        }
    }
}

/// Parse catalog JSON: an array of course records, kept in input order.
pub fn parse_courses(json: &str) -> Result<Vec<Course>, serde_json::Error> {
    let raw: Vec<RawCourse> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(Course::from).collect())
}

/// Read the course records from a catalog file.
pub fn load_courses(path: impl AsRef<Path>) -> Result<Vec<Course>, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_courses(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and validate a catalog file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, LoadError> {
    Ok(Catalog::new(load_courses(path)?)?)
}

#[derive(Deserialize, Debug, Default)]
struct RawPreferences {
    #[serde(default)]
    preferred_time: Option<String>,
    #[serde(default)]
    max_hours_per_term: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
struct RawUserConfig {
    #[serde(default)]
    approved_courses: Vec<RawLabel>,
    #[serde(default)]
    preferences: Option<RawPreferences>,
    #[serde(default)]
    terms: Option<Vec<String>>,
}

/// Settings read from the user configuration file.
///
/// Loading never fails: an unreadable or malformed file yields an empty
/// configuration carrying a diagnostic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserConfig {
    pub approved_courses: Vec<String>,
    pub preferred_time: Option<String>,
    pub max_hours_per_term: Option<f64>,
    pub terms: Option<Vec<String>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl UserConfig {
    /// Parse user configuration JSON.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawUserConfig = serde_json::from_str(json)?;
        let prefs = raw.preferences.unwrap_or_default();
        Ok(Self {
            approved_courses: labels(raw.approved_courses),
            preferred_time: prefs.preferred_time,
            max_hours_per_term: prefs.max_hours_per_term,
            terms: raw.terms,
            diagnostics: Vec::new(),
        })
    }

    /// Overlay the settings present in this file onto `config`.
    ///
    /// A setting that fails validation is skipped and recorded as a
    /// `ConfigMalformed` diagnostic, so `config` keeps its previous value.
    pub fn apply(&mut self, config: &mut PlannerConfig) {
        if let Some(preferred) = &self.preferred_time {
            match preferred.parse::<PreferredTime>() {
                Ok(_) => config.preferred_time = preferred.clone(),
                Err(err) => self.reject("preferences.preferred_time", err),
            }
        }
        if let Some(cap) = self.max_hours_per_term {
            match check_max_hours(cap) {
                Ok(()) => config.max_hours_per_term = cap,
                Err(err) => self.reject("preferences.max_hours_per_term", err),
            }
        }
        if let Some(terms) = &self.terms {
            match check_terms(terms) {
                Ok(()) => config.terms = terms.clone(),
                Err(err) => self.reject("terms", err),
            }
        }
    }

    fn reject(&mut self, setting: &str, reason: String) {
        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::ConfigMalformed,
            format!("ignoring user setting {}: {}", setting, reason),
        ));
    }
}

/// Load the user configuration file at `path`.
pub fn load_user_config(path: impl AsRef<Path>) -> UserConfig {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            return UserConfig {
                diagnostics: vec![Diagnostic::new(
                    DiagnosticKind::ConfigUnreadable,
                    format!("cannot read user configuration {}: {}", path.display(), err),
                )],
                ..UserConfig::default()
            };
        }
    };
    match UserConfig::parse(&text) {
        Ok(config) => config,
        Err(err) => UserConfig {
            diagnostics: vec![Diagnostic::new(
                DiagnosticKind::ConfigMalformed,
                format!("user configuration {} is not valid: {}", path.display(), err),
            )],
            ..UserConfig::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CATALOG: &str = r#"[
        {"id": 1, "name": "Algebra", "year": 1, "term": "1", "hours": 96,
         "scheduleOptions": [{"days": ["Lunes", "Jueves"], "time": "08:00-11:00"}],
         "correlatives": []},
        {"id": "2", "name": "Calculus II", "year": "1", "term": 2, "hours": 128.5,
         "scheduleOptions": [
            {"days": ["Martes"], "time": "18:00-22:00"},
            {"days": ["Sábado"], "time": "09:00-13:00"}
         ],
         "correlatives": [1]}
    ]"#;

    const CYCLIC_CATALOG: &str = r#"[
        {"id": "a", "name": "A", "hours": 1, "correlatives": ["b"],
         "scheduleOptions": [{"days": ["Lunes"], "time": "08:00-09:00"}]},
        {"id": "b", "name": "B", "hours": 1, "correlatives": ["a"],
         "scheduleOptions": [{"days": ["Lunes"], "time": "08:00-09:00"}]}
    ]"#;

    #[test]
    fn test_parse_courses_accepts_numeric_labels() {
        let courses = parse_courses(CATALOG).unwrap();

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].id, "1");
        assert_eq!(courses[0].year, "1");
        assert_eq!(courses[0].hours, 96.0);
        assert_eq!(courses[0].schedule_options[0].days, vec!["Lunes", "Jueves"]);
        assert_eq!(courses[1].term, "2");
        assert_eq!(courses[1].hours, 128.5);
        assert_eq!(courses[1].correlatives, vec!["1".to_string()]);
        assert_eq!(courses[1].schedule_options[1].time, "09:00-13:00");
    }

    #[test]
    fn test_load_catalog_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, CATALOG).unwrap();

        let catalog = load_catalog(&path).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.correlatives_of(1), &[0]);
    }

    #[test]
    fn test_load_catalog_errors() {
        let dir = tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(load_catalog(&missing), Err(LoadError::Io { .. })));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(load_catalog(&bad), Err(LoadError::Json { .. })));

        let cyclic = dir.path().join("cyclic.json");
        fs::write(&cyclic, CYCLIC_CATALOG).unwrap();
        assert!(matches!(
            load_catalog(&cyclic),
            Err(LoadError::Catalog(CatalogError::CircularCorrelatives(_)))
        ));
    }

    #[test]
    fn test_user_config_with_preferences() {
        let mut config = UserConfig::parse(
            r#"{"approved_courses": [1, "2"],
                "preferences": {"preferred_time": "day", "max_hours_per_term": 300},
                "terms": ["2026C1", "2026C2"]}"#,
        )
        .unwrap();

        assert_eq!(config.approved_courses, vec!["1", "2"]);

        let mut planner_config = PlannerConfig::default();
        config.apply(&mut planner_config);
        assert_eq!(planner_config.preferred_time, "day");
        assert_eq!(planner_config.max_hours_per_term, 300.0);
        assert_eq!(planner_config.terms, vec!["2026C1", "2026C2"]);
        assert!(config.diagnostics.is_empty());
    }

    #[test]
    fn test_user_config_without_optional_sections_keeps_defaults() {
        let mut config = UserConfig::parse(r#"{"approved_courses": ["x"]}"#).unwrap();

        let mut planner_config = PlannerConfig::default();
        config.apply(&mut planner_config);
        assert_eq!(planner_config.max_hours_per_term, 384.0);
        assert_eq!(planner_config.terms.len(), 32);
    }

    #[test]
    fn test_invalid_user_settings_are_skipped() {
        let mut config = UserConfig::parse(
            r#"{"approved_courses": ["a"],
                "preferences": {"preferred_time": "mañana", "max_hours_per_term": 0},
                "terms": []}"#,
        )
        .unwrap();

        let mut planner_config = PlannerConfig::default();
        config.apply(&mut planner_config);

        let defaults = PlannerConfig::default();
        assert_eq!(planner_config.preferred_time, defaults.preferred_time);
        assert_eq!(planner_config.max_hours_per_term, defaults.max_hours_per_term);
        assert_eq!(planner_config.terms, defaults.terms);
        assert_eq!(config.approved_courses, vec!["a"]);
        assert_eq!(config.diagnostics.len(), 3);
        assert!(config
            .diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::ConfigMalformed));
        assert!(config.diagnostics[0].message.contains("preferred_time"));
        assert!(config.diagnostics[1].message.contains("max_hours_per_term"));
        assert!(config.diagnostics[2].message.contains("terms"));
    }

    #[test]
    fn test_missing_user_config_is_a_diagnostic() {
        let dir = tempdir().unwrap();
        let config = load_user_config(dir.path().join("config.json"));

        assert!(config.approved_courses.is_empty());
        assert_eq!(config.diagnostics.len(), 1);
        assert_eq!(config.diagnostics[0].kind, DiagnosticKind::ConfigUnreadable);
    }

    #[test]
    fn test_malformed_user_config_is_a_diagnostic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"approved_courses": "oops"}"#).unwrap();

        let config = load_user_config(&path);

        assert!(config.approved_courses.is_empty());
        assert_eq!(config.diagnostics[0].kind, DiagnosticKind::ConfigMalformed);
    }
}
