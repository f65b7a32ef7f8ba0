//! Planner trace output on stderr, gated by `PlannerConfig::verbosity`.
//!
//! Format arguments are only evaluated when the level is enabled, so a
//! silent planner pays nothing for its trace lines.
//!
//! | level | what is traced |
//! |-------|----------------|
//! | 0 | nothing |
//! | 1 | mode choice, cram chain commits and skips, mid-exam placement |
//! | 2 | target selection, ROI of every candidate chain |
//! | 3 | graph construction, dropped edges |

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_DECISIONS: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Planner decisions (verbosity >= 1).
#[macro_export]
macro_rules! log_decisions {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DECISIONS {
            eprintln!($($arg)*);
        }
    };
}

/// Candidate evaluation (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}
