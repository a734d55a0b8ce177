//! Logging macros for the planner with verbosity level control.
//!
//! Nothing is formatted when the verbosity is below the macro's level.
//! Levels:
//! - 0: SILENT (nothing; warnings still reach the caller as diagnostics)
//! - 1: CHANGES (course placements, dropped inputs, budget exhaustion)
//! - 2: CHECKS (why a course was rejected for a term)
//! - 3: DEBUG (search internals: node counts, branch copies)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Short tag written in front of each line logged at `level`.
pub fn level_tag(level: u8) -> &'static str {
    match level {
        VERBOSITY_SILENT => "silent",
        VERBOSITY_CHANGES => "plan",
        VERBOSITY_CHECKS => "check",
        _ => "debug",
    }
}

/// Shared body of the level macros: write one tagged line to stderr when
/// `verbosity` reaches `level`.
#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($level:expr, $verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $level {
            eprintln!(
                "[termplan:{}] {}",
                $crate::logging::level_tag($level),
                format_args!($($arg)*)
            );
        }
    };
}

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: placements, warnings about dropped input, skipped courses.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_CHANGES, $verbosity, $($arg)*)
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: precedence, hour-cap and timetable rejections.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_CHECKS, $verbosity, $($arg)*)
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_DEBUG, $verbosity, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_CHANGES);
        assert!(VERBOSITY_CHANGES < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_level_tags() {
        assert_eq!(level_tag(VERBOSITY_CHANGES), "plan");
        assert_eq!(level_tag(VERBOSITY_CHECKS), "check");
        assert_eq!(level_tag(VERBOSITY_DEBUG), "debug");
        assert_eq!(level_tag(7), "debug");
    }

    #[test]
    fn test_macros_skip_formatting_when_silent() {
        let formatted = std::cell::Cell::new(0);
        let count = || {
            formatted.set(formatted.get() + 1);
            formatted.get()
        };
        log_changes!(VERBOSITY_SILENT, "placed {}", count());
        log_checks!(VERBOSITY_CHANGES, "rejected {}", count());
        log_debug!(VERBOSITY_CHECKS, "node {}", count());
        assert_eq!(formatted.get(), 0);

        log_checks!(VERBOSITY_DEBUG, "rejected {}", count());
        assert_eq!(formatted.get(), 1);
    }
}
