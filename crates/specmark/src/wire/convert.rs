//! Conversion from the syntax tree and result shapes to wire messages.
//!
//! Every conversion copies: tables, fragments and tags are cloned into the
//! message, so later changes to the source tree never show through.

use crate::model::{Fragment, Item, Scenario, Specification, Step, StepArg, StepValue, Table, Tags};
use crate::result::{HookFailure, SpecResult, StepExecutionResult, SuiteResult};

use super::{
    ParameterType, WireComment, WireConcept, WireFragment, WireHookFailure, WireItem,
    WireParameter, WireScenario, WireSpec, WireSpecResult, WireStep, WireStepExecutionResult,
    WireStepValue, WireSuiteResult, WireTable, WireTableRow, WireTags,
};

/// Convert a specification and all its items.
#[must_use]
pub fn convert_spec(spec: &Specification) -> WireSpec {
    WireSpec {
        spec_heading: spec.heading().to_string(),
        items: spec.items().iter().map(convert_item).collect(),
        is_table_driven: spec.data_table().is_some(),
        file_name: spec.file_name().to_string(),
        tags: convert_tags(spec.tags()),
    }
}

/// Convert one item; concept steps become [`WireItem::Concept`].
#[must_use]
pub fn convert_item(item: &Item) -> WireItem {
    match item {
        Item::Scenario(scenario) => WireItem::Scenario {
            scenario: convert_scenario(scenario),
        },
        Item::Step(step) => convert_step_item(step),
        Item::Comment(comment) => WireItem::Comment {
            comment: WireComment {
                text: comment.text.clone(),
            },
        },
        Item::Table(table) => WireItem::Table {
            table: convert_table(table),
        },
        Item::Tags(tags) => WireItem::Tags {
            tags: WireTags {
                tags: tags.values().to_vec(),
            },
        },
    }
}

fn convert_step_item(step: &Step) -> WireItem {
    if step.is_concept() {
        WireItem::Concept {
            concept: WireConcept {
                concept_step: convert_step(step),
                steps: step.concept_steps().iter().map(convert_step_item).collect(),
            },
        }
    } else {
        WireItem::Step {
            step: convert_step(step),
        }
    }
}

fn convert_scenario(scenario: &Scenario) -> WireScenario {
    WireScenario {
        scenario_heading: scenario.heading().to_string(),
        failed: false,
        tags: convert_tags(scenario.tags()),
        contexts: Vec::new(),
        scenario_items: scenario.items().iter().map(convert_item).collect(),
        execution_time: 0,
    }
}

/// Convert the step itself, without its concept expansion.
#[must_use]
pub fn convert_step(step: &Step) -> WireStep {
    WireStep {
        actual_text: step.line_text().to_string(),
        parsed_text: step.value().to_string(),
        fragments: step
            .fragments()
            .iter()
            .map(|fragment| match fragment {
                Fragment::Text(text) => WireFragment::Text { text: text.clone() },
                Fragment::Parameter(arg) => WireFragment::Parameter {
                    parameter: convert_parameter(arg),
                },
            })
            .collect(),
        step_execution_result: None,
    }
}

/// Convert a step argument, copying any embedded table.
#[must_use]
pub fn convert_parameter(arg: &StepArg) -> WireParameter {
    let (parameter_type, value, table) = match arg {
        StepArg::Static { value } => (ParameterType::Static, Some(value.clone()), None),
        StepArg::Dynamic { name } => (ParameterType::Dynamic, Some(name.clone()), None),
        StepArg::Table { table, .. } => (ParameterType::Table, None, Some(convert_table(table))),
        StepArg::SpecialString { value, .. } => {
            (ParameterType::SpecialString, Some(value.clone()), None)
        }
        StepArg::SpecialTable { table, .. } => {
            (ParameterType::SpecialTable, None, Some(convert_table(table)))
        }
    };
    WireParameter {
        parameter_type,
        name: arg.name().to_string(),
        value,
        table,
    }
}

/// Copy a table into its message form.
#[must_use]
pub fn convert_table(table: &Table) -> WireTable {
    WireTable {
        headers: WireTableRow {
            cells: table.headers().to_vec(),
        },
        rows: table
            .rows()
            .iter()
            .map(|row| WireTableRow { cells: row.clone() })
            .collect(),
    }
}

/// Flatten tags to an ordered list; absent tags give an empty list.
#[must_use]
pub fn convert_tags(tags: Option<&Tags>) -> Vec<String> {
    tags.map(|tags| tags.values().to_vec()).unwrap_or_default()
}

/// Convert the keyed forms of a step.
#[must_use]
pub fn convert_step_value(value: &StepValue) -> WireStepValue {
    WireStepValue {
        step_value: value.value.clone(),
        parameterized_step_value: value.parameterized_value.clone(),
        parameters: value.parameters.clone(),
    }
}

/// Attach an execution outcome to a step message.
///
/// Items other than plain steps are left untouched.
pub fn attach_execution_result(item: &mut WireItem, result: &StepExecutionResult) {
    if let WireItem::Step { step } = item {
        step.step_execution_result = Some(WireStepExecutionResult {
            failed: result.failed,
            execution_time: result.execution_time,
            error_message: result.error_message.clone(),
            stack_trace: result.stack_trace.clone(),
        });
    }
}

/// Convert a suite outcome, recomputing its success rate.
#[must_use]
pub fn convert_suite_result(suite: &SuiteResult) -> WireSuiteResult {
    WireSuiteResult {
        pre_hook_failure: suite.pre_suite.as_ref().map(convert_hook_failure),
        post_hook_failure: suite.post_suite.as_ref().map(convert_hook_failure),
        failed: suite.failed,
        specs_failed_count: to_i32(suite.specs_failed_count),
        execution_time: suite.execution_time,
        spec_results: convert_spec_results(&suite.spec_results),
        success_rate: success_rate(suite.spec_results.len(), suite.specs_failed_count),
        environment: suite.environment.clone(),
        tags: suite.tags.clone(),
        project_name: suite.project_name.clone(),
        timestamp: suite.timestamp.clone(),
    }
}

/// Convert per-specification outcomes, preserving order.
#[must_use]
pub fn convert_spec_results(results: &[SpecResult]) -> Vec<WireSpecResult> {
    results
        .iter()
        .map(|result| WireSpecResult {
            proto_spec: result.proto_spec.clone(),
            scenario_count: to_i32(result.scenario_count),
            scenario_failed_count: to_i32(result.scenario_failed_count),
            failed: result.failed,
            failed_data_table_rows: result
                .failed_data_table_rows
                .iter()
                .copied()
                .map(to_i32)
                .collect(),
            execution_time: result.execution_time,
        })
        .collect()
}

/// Percentage of passing items, `100 * (total - failed) / total`.
///
/// Uses integer division, so the result is always a whole number, and
/// returns `0` when `total` is `0`.
///
/// # Examples
/// ```
/// use specmark::wire::success_rate;
/// assert_eq!(success_rate(0, 0), 0.0);
/// assert_eq!(success_rate(10, 0), 100.0);
/// assert_eq!(success_rate(10, 3), 70.0);
/// assert_eq!(success_rate(3, 1), 66.0);
/// ```
#[must_use]
pub fn success_rate(total: usize, failed: usize) -> f32 {
    total
        .saturating_sub(failed)
        .saturating_mul(100)
        .checked_div(total)
        .and_then(|percent| u16::try_from(percent).ok())
        .map_or(0.0, f32::from)
}

fn convert_hook_failure(failure: &HookFailure) -> WireHookFailure {
    WireHookFailure {
        error_message: failure.error_message.clone(),
        stack_trace: failure.stack_trace.clone(),
    }
}

fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::concept::ConceptDictionary;
    use crate::model::Comment;
    use crate::parser::parse_document;

    fn parsed(text: &str, concepts: &ConceptDictionary) -> Specification {
        let (spec, result) = parse_document(text, concepts);
        spec.unwrap_or_else(|| panic!("document should parse: {:?}", result.error))
    }

    #[rstest]
    #[case(0, 0, 0.0)]
    #[case(10, 0, 100.0)]
    #[case(10, 3, 70.0)]
    #[case(10, 10, 0.0)]
    #[case(3, 1, 66.0)]
    fn computes_success_rate(#[case] total: usize, #[case] failed: usize, #[case] expected: f32) {
        assert_eq!(success_rate(total, failed).to_bits(), expected.to_bits());
    }

    #[test]
    fn scenario_messages_carry_their_items() {
        let spec = parsed(
            "# Shop\n## Buy\ntags: fast\n* add \"pen\"\nnote\n",
            &ConceptDictionary::default(),
        );
        let wire = convert_spec(&spec);
        let [WireItem::Scenario { scenario }] = wire.items.as_slice() else {
            panic!("expected one scenario item, got {:?}", wire.items);
        };
        assert_eq!(scenario.scenario_heading, "Buy");
        assert_eq!(scenario.tags, vec!["fast".to_string()]);
        assert_eq!(scenario.scenario_items.len(), 3);
        assert!(!scenario.failed);
        assert!(scenario.contexts.is_empty());
        assert_eq!(scenario.execution_time, 0);
    }

    #[test]
    fn concept_steps_convert_to_concept_items() {
        let mut concepts = ConceptDictionary::default();
        concepts
            .define("sign in as <user>", &["open login", "type <user>", "submit"])
            .unwrap_or_else(|e| panic!("concept should define: {e}"));
        let spec = parsed("# S\n## A\n* sign in as \"ann\"\n", &concepts);
        let scenario = spec
            .scenarios()
            .next()
            .unwrap_or_else(|| panic!("expected a scenario"));
        let item = scenario
            .items()
            .first()
            .unwrap_or_else(|| panic!("expected a step item"));
        let WireItem::Concept { concept } = convert_item(item) else {
            panic!("expected a concept item");
        };
        assert_eq!(concept.concept_step.parsed_text, "sign in as {}");
        assert_eq!(concept.steps.len(), 3);
        assert!(concept.steps.iter().all(|s| matches!(s, WireItem::Step { .. })));
    }

    #[test]
    fn nested_concepts_stay_nested() {
        let mut concepts = ConceptDictionary::default();
        concepts
            .define("outer", &["inner", "wave"])
            .unwrap_or_else(|e| panic!("outer should define: {e}"));
        concepts
            .define("inner", &["leaf"])
            .unwrap_or_else(|e| panic!("inner should define: {e}"));
        let spec = parsed("# S\n## A\n* outer\n", &concepts);
        let item = spec
            .scenarios()
            .next()
            .and_then(|scenario| scenario.items().first())
            .unwrap_or_else(|| panic!("expected a step item"));
        let WireItem::Concept { concept } = convert_item(item) else {
            panic!("expected a concept item");
        };
        assert_eq!(concept.concept_step.actual_text, "outer");
        let [WireItem::Concept { concept: inner }, WireItem::Step { step }] =
            concept.steps.as_slice()
        else {
            panic!("expected nested concept then step, got {:?}", concept.steps);
        };
        assert_eq!(inner.concept_step.actual_text, "inner");
        assert!(matches!(inner.steps.as_slice(), [WireItem::Step { .. }]));
        assert_eq!(step.actual_text, "wave");
    }

    #[rstest]
    #[case(StepArg::Static { value: "v".into() }, ParameterType::Static, "", Some("v"))]
    #[case(StepArg::Dynamic { name: "n".into() }, ParameterType::Dynamic, "n", Some("n"))]
    #[case(
        StepArg::SpecialString { name: "file:a".into(), value: "body".into() },
        ParameterType::SpecialString,
        "file:a",
        Some("body")
    )]
    #[case(
        StepArg::Table { name: "table".into(), table: Table::default() },
        ParameterType::Table,
        "table",
        None
    )]
    fn converts_parameters_by_kind(
        #[case] arg: StepArg,
        #[case] kind: ParameterType,
        #[case] name: &str,
        #[case] value: Option<&str>,
    ) {
        let parameter = convert_parameter(&arg);
        assert_eq!(parameter.parameter_type, kind);
        assert_eq!(parameter.name, name);
        assert_eq!(parameter.value.as_deref(), value);
        assert_eq!(parameter.table.is_some(), arg.table().is_some());
    }

    #[test]
    fn absent_tags_become_empty_list() {
        assert!(convert_tags(None).is_empty());
        let spec = Specification::new("S", Vec::new(), None);
        assert!(convert_spec(&spec).tags.is_empty());
        assert!(!convert_spec(&spec).is_table_driven);
    }

    #[test]
    fn execution_result_attaches_to_steps_only() {
        let result = StepExecutionResult {
            failed: true,
            execution_time: 12,
            error_message: Some("boom".into()),
            stack_trace: None,
        };
        let mut step = WireItem::Step {
            step: WireStep::default(),
        };
        attach_execution_result(&mut step, &result);
        let WireItem::Step { step } = step else {
            panic!("step item should stay a step");
        };
        assert_eq!(
            step.step_execution_result.map(|r| r.error_message),
            Some(Some("boom".to_string()))
        );

        let mut comment = convert_item(&Item::Comment(Comment {
            text: "c".into(),
            line: 1,
        }));
        let before = comment.clone();
        attach_execution_result(&mut comment, &result);
        assert_eq!(comment, before);
    }

    #[test]
    fn converts_step_values() {
        let value = StepValue {
            value: "pay {}".into(),
            parameterized_value: "pay <amount>".into(),
            parameters: vec!["amount".into()],
        };
        let wire = convert_step_value(&value);
        assert_eq!(wire.step_value, "pay {}");
        assert_eq!(wire.parameterized_step_value, "pay <amount>");
        assert_eq!(wire.parameters, vec!["amount".to_string()]);
    }

    #[test]
    fn suite_conversion_recomputes_success_rate() {
        let mut results = vec![SpecResult::default(); 10];
        for result in results.iter_mut().take(3) {
            result.failed = true;
        }
        let suite = SuiteResult::from_spec_results(results).with_environment("ci");
        let wire = convert_suite_result(&suite);
        assert_eq!(wire.specs_failed_count, 3);
        assert_eq!(wire.spec_results.len(), 10);
        assert_eq!(wire.success_rate.to_bits(), 70.0_f32.to_bits());
        assert_eq!(wire.environment, "ci");
        assert!(wire.pre_hook_failure.is_none());
    }
}
