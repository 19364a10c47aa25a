//! Canonical wire messages exchanged with runners and reporters.
//!
//! Messages are plain owned data with serde derives; field names serialise
//! in camelCase and tagged unions carry an explicit kind discriminator
//! (`itemType`, `fragmentType`, `parameterType`). Nothing here borrows from
//! the syntax tree, so a message outlives the parse that produced it.

use serde::{Deserialize, Serialize};

mod convert;
pub mod json;

pub use convert::{
    attach_execution_result, convert_item, convert_parameter, convert_spec, convert_spec_results,
    convert_step, convert_step_value, convert_suite_result, convert_table, convert_tags,
    success_rate,
};

/// One node of the message tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "itemType")]
pub enum WireItem {
    /// A scenario and its body.
    Scenario {
        /// Scenario message.
        scenario: WireScenario,
    },
    /// A plain step.
    Step {
        /// Step message.
        step: WireStep,
    },
    /// A comment line.
    Comment {
        /// Comment message.
        comment: WireComment,
    },
    /// A table item.
    Table {
        /// Table message.
        table: WireTable,
    },
    /// A tag declaration.
    Tags {
        /// Tags message.
        tags: WireTags,
    },
    /// A step invoking a concept, with its expansion.
    Concept {
        /// Concept message.
        concept: WireConcept,
    },
}

/// A parsed specification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSpec {
    /// Specification heading.
    pub spec_heading: String,
    /// Top-level items in source order.
    pub items: Vec<WireItem>,
    /// Whether a data table drives the specification.
    pub is_table_driven: bool,
    /// Originating file identifier.
    pub file_name: String,
    /// Specification tags; empty when none were declared.
    pub tags: Vec<String>,
}

/// A scenario.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScenario {
    /// Scenario heading.
    pub scenario_heading: String,
    /// Whether the scenario failed; always `false` straight after parsing.
    pub failed: bool,
    /// Scenario tags; empty when none were declared.
    pub tags: Vec<String>,
    /// Context steps run before the scenario.
    pub contexts: Vec<WireItem>,
    /// Body items in source order.
    pub scenario_items: Vec<WireItem>,
    /// Execution time in milliseconds.
    pub execution_time: i64,
}

/// A step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStep {
    /// Step text as written.
    pub actual_text: String,
    /// Normalised step text with `{}` markers.
    pub parsed_text: String,
    /// Fragments in source order.
    pub fragments: Vec<WireFragment>,
    /// Execution outcome, once the step has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_execution_result: Option<WireStepExecutionResult>,
}

/// A segment of step text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fragmentType")]
pub enum WireFragment {
    /// Literal text.
    Text {
        /// Text content.
        text: String,
    },
    /// A parameter position.
    Parameter {
        /// Parameter message.
        parameter: WireParameter,
    },
}

/// Parameter kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    /// Quoted literal.
    Static,
    /// Named placeholder.
    Dynamic,
    /// Inline table.
    Table,
    /// File contents.
    #[serde(rename = "Special_String")]
    SpecialString,
    /// CSV table.
    #[serde(rename = "Special_Table")]
    SpecialTable,
}

/// A step parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireParameter {
    /// Kind discriminator.
    pub parameter_type: ParameterType,
    /// Parameter name; empty for static literals.
    pub name: String,
    /// Scalar value for static, dynamic and file parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Embedded table for table parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<WireTable>,
}

/// A table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTable {
    /// Header row.
    pub headers: WireTableRow,
    /// Data rows, each as long as the header row.
    pub rows: Vec<WireTableRow>,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireTableRow {
    /// Cells in column order.
    pub cells: Vec<String>,
}

/// A comment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireComment {
    /// Comment text.
    pub text: String,
}

/// A tag list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireTags {
    /// Tags in declaration order.
    pub tags: Vec<String>,
}

/// A concept invocation and its expanded steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConcept {
    /// The invoking step.
    pub concept_step: WireStep,
    /// Expanded steps; nested concepts appear as concept items.
    pub steps: Vec<WireItem>,
}

/// Keyed forms of a step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStepValue {
    /// Normalised value with `{}` markers.
    pub step_value: String,
    /// Value with `<name>` markers.
    pub parameterized_step_value: String,
    /// Parameter names in order.
    pub parameters: Vec<String>,
}

/// Outcome of running a step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStepExecutionResult {
    /// Whether the step failed.
    pub failed: bool,
    /// Execution time in milliseconds.
    pub execution_time: i64,
    /// Failure message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Failure stack trace, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

/// A failed suite-level hook.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireHookFailure {
    /// Failure message.
    pub error_message: String,
    /// Failure stack trace.
    pub stack_trace: String,
}

/// Outcome of one specification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSpecResult {
    /// The specification that ran.
    pub proto_spec: WireSpec,
    /// Scenarios run.
    pub scenario_count: i32,
    /// Scenarios failed.
    pub scenario_failed_count: i32,
    /// Whether the specification failed.
    pub failed: bool,
    /// Indices of failed data table rows.
    pub failed_data_table_rows: Vec<i32>,
    /// Execution time in milliseconds.
    pub execution_time: i64,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSuiteResult {
    /// Failure of the before-suite hook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_hook_failure: Option<WireHookFailure>,
    /// Failure of the after-suite hook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_hook_failure: Option<WireHookFailure>,
    /// Whether the run failed.
    pub failed: bool,
    /// Specifications that failed.
    pub specs_failed_count: i32,
    /// Execution time in milliseconds.
    pub execution_time: i64,
    /// Per-specification outcomes.
    pub spec_results: Vec<WireSpecResult>,
    /// Percentage of specifications that passed.
    pub success_rate: f32,
    /// Environment the run used.
    pub environment: String,
    /// Tag filter the run used.
    pub tags: String,
    /// Project name.
    pub project_name: String,
    /// Run timestamp.
    pub timestamp: String,
}
