//! Configuration types for the study-plan scheduler.

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Tunable constants for graph hydration, mode selection, cram selection and
/// checkpoint placement.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq)]
pub struct PlannerConfig {
    /// Duration used for nodes without an estimate (minutes)
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub default_estimated_minutes: f64,
    /// Familiarity assumed when the student has no state for a node
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub default_familiarity: f64,
    /// Deep Study is chosen only when budget >= time needed * margin
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub deep_study_margin: f64,
    /// Minimum intrinsic exam value for a node to be a cram target
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub high_value_threshold: f64,
    /// Fraction of non-mastered nodes targeted when nothing clears the threshold
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub fallback_target_fraction: f64,
    /// Duration of the mid-course checkpoint exam (minutes)
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub mid_exam_minutes: f64,
    /// Duration of the final checkpoint exam (minutes)
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub final_exam_minutes: f64,
    /// Max distance from the midpoint, as a fraction of total structural cost,
    /// for a module boundary to host the mid-course exam
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub boundary_tolerance: f64,
    /// Verbosity level: 0=silent, 1=decisions, 2=checks, 3=debug.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub verbosity: u8,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_estimated_minutes: 30.0,
            default_familiarity: 0.1,
            deep_study_margin: 1.5,
            high_value_threshold: 7.0,
            fallback_target_fraction: 0.2,
            mid_exam_minutes: 45.0,
            final_exam_minutes: 60.0,
            boundary_tolerance: 0.15,
            verbosity: 0,
        }
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl PlannerConfig {
    #[new]
    #[pyo3(signature = (
        default_estimated_minutes=None,
        default_familiarity=None,
        deep_study_margin=None,
        high_value_threshold=None,
        fallback_target_fraction=None,
        mid_exam_minutes=None,
        final_exam_minutes=None,
        boundary_tolerance=None,
        verbosity=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        default_estimated_minutes: Option<f64>,
        default_familiarity: Option<f64>,
        deep_study_margin: Option<f64>,
        high_value_threshold: Option<f64>,
        fallback_target_fraction: Option<f64>,
        mid_exam_minutes: Option<f64>,
        final_exam_minutes: Option<f64>,
        boundary_tolerance: Option<f64>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            default_estimated_minutes: default_estimated_minutes
                .unwrap_or(defaults.default_estimated_minutes),
            default_familiarity: default_familiarity.unwrap_or(defaults.default_familiarity),
            deep_study_margin: deep_study_margin.unwrap_or(defaults.deep_study_margin),
            high_value_threshold: high_value_threshold.unwrap_or(defaults.high_value_threshold),
            fallback_target_fraction: fallback_target_fraction
                .unwrap_or(defaults.fallback_target_fraction),
            mid_exam_minutes: mid_exam_minutes.unwrap_or(defaults.mid_exam_minutes),
            final_exam_minutes: final_exam_minutes.unwrap_or(defaults.final_exam_minutes),
            boundary_tolerance: boundary_tolerance.unwrap_or(defaults.boundary_tolerance),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "PlannerConfig(deep_study_margin={}, high_value_threshold={}, verbosity={})",
            self.deep_study_margin, self.high_value_threshold, self.verbosity
        )
    }
}
