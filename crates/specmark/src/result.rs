//! Aggregate result shapes for specifications and suites.
//!
//! Nothing here executes steps. Callers record outcomes produced elsewhere
//! and the wire converter turns them into [`WireSuiteResult`] messages.
//!
//! [`WireSuiteResult`]: crate::wire::WireSuiteResult

use crate::model::Specification;
use crate::wire::{WireSpec, convert_spec, success_rate};

/// A failed suite-level hook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HookFailure {
    /// Failure message.
    pub error_message: String,
    /// Failure stack trace.
    pub stack_trace: String,
}

/// Outcome of running a single step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepExecutionResult {
    /// Whether the step failed.
    pub failed: bool,
    /// Execution time in milliseconds.
    pub execution_time: i64,
    /// Failure message, if any.
    pub error_message: Option<String>,
    /// Failure stack trace, if any.
    pub stack_trace: Option<String>,
}

/// Outcome of one specification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecResult {
    /// The specification message the outcome belongs to.
    pub proto_spec: WireSpec,
    /// Scenarios run.
    pub scenario_count: usize,
    /// Scenarios failed.
    pub scenario_failed_count: usize,
    /// Whether the specification failed.
    pub failed: bool,
    /// 0-based indices of failed data table rows.
    pub failed_data_table_rows: Vec<usize>,
    /// Execution time in milliseconds.
    pub execution_time: i64,
}

impl SpecResult {
    /// Start an empty result for `spec`.
    #[must_use]
    pub fn new(spec: &Specification) -> Self {
        Self {
            proto_spec: convert_spec(spec),
            ..Self::default()
        }
    }

    /// Record one scenario outcome.
    pub fn record_scenario(&mut self, failed: bool) {
        self.scenario_count += 1;
        if failed {
            self.scenario_failed_count += 1;
            self.failed = true;
        }
    }

    /// Record a failed data table row.
    pub fn record_failed_row(&mut self, row: usize) {
        self.failed_data_table_rows.push(row);
        self.failed = true;
    }

    /// Set the execution time in milliseconds.
    #[must_use]
    pub fn with_execution_time(mut self, millis: i64) -> Self {
        self.execution_time = millis;
        self
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuiteResult {
    /// Failure of the before-suite hook.
    pub pre_suite: Option<HookFailure>,
    /// Failure of the after-suite hook.
    pub post_suite: Option<HookFailure>,
    /// Whether the run failed.
    pub failed: bool,
    /// Specifications that failed.
    pub specs_failed_count: usize,
    /// Execution time in milliseconds.
    pub execution_time: i64,
    /// Per-specification outcomes.
    pub spec_results: Vec<SpecResult>,
    /// Environment the run used.
    pub environment: String,
    /// Tag filter the run used.
    pub tags: String,
    /// Project name.
    pub project_name: String,
    /// Run timestamp.
    pub timestamp: String,
}

impl SuiteResult {
    /// Fold per-specification outcomes into suite counts.
    ///
    /// # Examples
    /// ```
    /// use specmark::{SpecResult, SuiteResult};
    /// let passed = SpecResult::default();
    /// let failed = SpecResult { failed: true, execution_time: 5, ..SpecResult::default() };
    /// let suite = SuiteResult::from_spec_results(vec![passed, failed]);
    /// assert_eq!(suite.specs_failed_count, 1);
    /// assert!(suite.failed);
    /// assert_eq!(suite.execution_time, 5);
    /// ```
    #[must_use]
    pub fn from_spec_results(spec_results: Vec<SpecResult>) -> Self {
        let (specs_failed_count, execution_time) = spec_results
            .iter()
            .fold((0_usize, 0_i64), |(failed, millis), result| {
                (
                    failed + usize::from(result.failed),
                    millis.saturating_add(result.execution_time),
                )
            });
        Self {
            failed: specs_failed_count > 0,
            specs_failed_count,
            execution_time,
            spec_results,
            ..Self::default()
        }
    }

    /// Record a before-suite hook failure; the run is marked failed.
    #[must_use]
    pub fn with_pre_hook_failure(mut self, failure: HookFailure) -> Self {
        self.pre_suite = Some(failure);
        self.failed = true;
        self
    }

    /// Record an after-suite hook failure; the run is marked failed.
    #[must_use]
    pub fn with_post_hook_failure(mut self, failure: HookFailure) -> Self {
        self.post_suite = Some(failure);
        self.failed = true;
        self
    }

    /// Set the environment name.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Set the tag filter expression.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Set the project name.
    #[must_use]
    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = project_name.into();
        self
    }

    /// Set the run timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Percentage of specifications that passed.
    #[must_use]
    pub fn success_rate(&self) -> f32 {
        success_rate(self.spec_results.len(), self.specs_failed_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Table};

    fn spec_result(failed: bool, millis: i64) -> SpecResult {
        SpecResult {
            failed,
            execution_time: millis,
            ..SpecResult::default()
        }
    }

    #[test]
    fn spec_result_carries_spec_message() {
        let table = Table::new(vec!["u".into()], 2);
        let spec = Specification::new("Login", vec![Item::Table(table)], None)
            .with_file_name("login.spec");
        let result = SpecResult::new(&spec);
        assert_eq!(result.proto_spec.spec_heading, "Login");
        assert_eq!(result.proto_spec.file_name, "login.spec");
        assert!(result.proto_spec.is_table_driven);
        assert!(!result.failed);
    }

    #[test]
    fn recording_failures_marks_result_failed() {
        let mut result = SpecResult::default();
        result.record_scenario(false);
        assert!(!result.failed);
        result.record_scenario(true);
        result.record_failed_row(3);
        assert_eq!(result.scenario_count, 2);
        assert_eq!(result.scenario_failed_count, 1);
        assert_eq!(result.failed_data_table_rows, vec![3]);
        assert!(result.failed);
    }

    #[test]
    fn suite_folds_spec_results() {
        let suite = SuiteResult::from_spec_results(vec![
            spec_result(false, 10),
            spec_result(true, 20),
            spec_result(true, 30),
        ]);
        assert_eq!(suite.specs_failed_count, 2);
        assert_eq!(suite.execution_time, 60);
        assert!(suite.failed);
    }

    #[test]
    fn empty_suite_has_zero_success_rate() {
        let suite = SuiteResult::from_spec_results(Vec::new());
        assert!(!suite.failed);
        assert!(suite.success_rate().abs() < f32::EPSILON);
    }

    #[test]
    fn hook_failure_fails_the_suite() {
        let suite = SuiteResult::from_spec_results(vec![spec_result(false, 1)])
            .with_pre_hook_failure(HookFailure {
                error_message: "db unavailable".into(),
                stack_trace: String::new(),
            })
            .with_project_name("shop");
        assert!(suite.failed);
        assert_eq!(suite.project_name, "shop");
    }
}
