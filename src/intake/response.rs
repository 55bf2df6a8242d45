//! Advisory response decoding.
//!
//! Responses are sniffed once here and turned into [`AdvisoryResponse`];
//! everything downstream matches exhaustively on the variant.
//!
//! # Precedence
//!
//! | Field present | Variant |
//! |---------------|---------|
//! | non-empty `stripJsonData` | [`AdvisoryResponse::Proposals`] |
//! | non-empty `availableBuyers` | [`AdvisoryResponse::DrillDown`] (buyers) |
//! | non-empty `availableOrders` | [`AdvisoryResponse::DrillDown`] (orders) |
//! | `scenarios` array | [`AdvisoryResponse::Scenarios`] |
//! | otherwise | [`AdvisoryResponse::Advisory`] with `message` or a fallback |

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use super::scenario::{decode_operation, normalize_scenario_operation, raw_action_type, raw_strip_ref};
use crate::models::{ActionKind, Operation};

/// Advisory text used when a response carries nothing actionable.
pub const FALLBACK_ADVISORY: &str =
    "I analyzed the board but found no specific actions required at this moment.";

/// Fields this module knows how to interpret.
const KNOWN_FIELDS: [&str; 6] = [
    "stripJsonData",
    "availableBuyers",
    "availableOrders",
    "scenarios",
    "recommendation",
    "message",
];

/// Errors decoding an advisory response body.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Advisory response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Advisory response must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A decoded advisory response.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvisoryResponse {
    /// Independent single-operation proposals.
    Proposals(Vec<Proposal>),
    /// Candidates to narrow the next request down to.
    DrillDown(DrillDown),
    /// Simulated scenarios, each an ordered batch.
    Scenarios(ScenarioSet),
    /// Plain text, no board change.
    Advisory(String),
}

/// One proposed operation with the service's reasoning.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    /// Decoded operation (`Unrecognized` if it could not be decoded).
    pub operation: Operation,
    /// Reasoning text shown on the card.
    pub reasoning: String,
    /// `actionType` exactly as sent.
    pub raw_action_type: Option<String>,
    /// `stripId` as display text.
    pub strip_ref: Option<String>,
}

/// What a drill-down lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillDownKind {
    /// `availableBuyers`: buyer short names.
    Buyers,
    /// `availableOrders`: order numbers.
    Orders,
}

/// A disambiguation prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillDown {
    /// Whether the options are buyers or orders.
    pub kind: DrillDownKind,
    /// Option values in service order.
    pub options: Vec<String>,
    /// Prompt text (service message or the default for `kind`).
    pub message: String,
}

/// Scenarios plus the service's pick.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSet {
    /// Scenarios in service order.
    pub scenarios: Vec<Scenario>,
    /// The service's pick, if it made one.
    pub recommendation: Option<Recommendation>,
}

/// The recommended scenario and why.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    /// Name of the recommended scenario.
    pub scenario: String,
    /// Why it was picked.
    pub reasoning: String,
}

/// A named, ordered batch of operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Display name, matched by [`Recommendation::scenario`].
    pub name: String,
    /// What the simulator expects to happen.
    pub expected_outcome: String,
    /// Operations in application order.
    pub steps: Vec<ScenarioStep>,
}

/// One operation of a scenario with its display fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioStep {
    /// Decoded operation (`Unrecognized` if it could not be decoded).
    pub operation: Operation,
    /// `actionType` exactly as sent.
    pub raw_action_type: Option<String>,
    /// `stripId` as display text.
    pub strip_ref: Option<String>,
}

impl AdvisoryResponse {
    /// Decodes a response body.
    pub fn from_json(body: &str) -> Result<Self, IntakeError> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// Decodes an already parsed response.
    pub fn from_value(value: Value) -> Result<Self, IntakeError> {
        let Value::Object(fields) = value else {
            return Err(IntakeError::NotAnObject(json_type(&value)));
        };

        let message = fields
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        if let Some(items) = non_empty_array(&fields, "stripJsonData") {
            let proposals = items.iter().cloned().map(Proposal::from_value).collect();
            return Ok(Self::Proposals(proposals));
        }

        for (key, kind) in [
            ("availableBuyers", DrillDownKind::Buyers),
            ("availableOrders", DrillDownKind::Orders),
        ] {
            if let Some(items) = non_empty_array(&fields, key) {
                return Ok(Self::DrillDown(DrillDown {
                    kind,
                    options: items.iter().filter_map(option_text).collect(),
                    message: message.unwrap_or_else(|| kind.default_prompt().to_string()),
                }));
            }
        }

        if let Some(Value::Array(items)) = fields.get("scenarios") {
            let scenarios = items.iter().cloned().map(Scenario::from_value).collect();
            let recommendation = fields
                .get("recommendation")
                .filter(|v| v.is_object())
                .and_then(|v| serde_json::from_value(v.clone()).ok());
            return Ok(Self::Scenarios(ScenarioSet {
                scenarios,
                recommendation,
            }));
        }

        if message.is_none() && !fields.keys().any(|k| KNOWN_FIELDS.contains(&k.as_str())) {
            let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
            warn!(?keys, "unrecognized advisory response shape");
        }
        Ok(Self::Advisory(
            message.unwrap_or_else(|| FALLBACK_ADVISORY.to_string()),
        ))
    }
}

impl Proposal {
    /// Decodes one `stripJsonData` item.
    pub fn from_value(value: Value) -> Self {
        let reasoning = value
            .get("reasoning")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let raw_action_type = raw_action_type(&value).map(str::to_string);
        let strip_ref = raw_strip_ref(&value);
        Self {
            operation: decode_operation(value),
            reasoning,
            raw_action_type,
            strip_ref,
        }
    }

    /// Card badge, judged from the raw action type text.
    pub fn card_title(&self) -> &'static str {
        match self.raw_action_type.as_deref() {
            Some(t) if t.contains("move") => "Move Order",
            Some(t) if t.contains("split") => "Split Order",
            _ => "Optimization",
        }
    }

    /// Coarse kind of the raw action type.
    pub fn action_kind(&self) -> ActionKind {
        match self.card_title() {
            "Move Order" => ActionKind::Move,
            "Split Order" => ActionKind::Split,
            _ => ActionKind::Other,
        }
    }

    /// Whether the reasoning should start collapsed.
    pub fn is_reasoning_collapsible(&self, threshold: usize) -> bool {
        self.reasoning.chars().count() > threshold
    }
}

impl DrillDownKind {
    /// Prompt used when the service sends no message.
    pub fn default_prompt(self) -> &'static str {
        match self {
            Self::Buyers => "Which buyer would you like to optimize?",
            Self::Orders => "Which order needs attention?",
        }
    }

    /// Query sent when the user picks `option`.
    pub fn follow_up_query(self, option: &str) -> String {
        match self {
            Self::Buyers => format!("Optimize for buyer {option}"),
            Self::Orders => format!("Optimize order #{option}"),
        }
    }

    /// Button label for `option`.
    pub fn option_label(self, option: &str) -> String {
        match self {
            Self::Buyers => option.to_string(),
            Self::Orders => format!("#{option}"),
        }
    }
}

impl ScenarioSet {
    /// Whether `scenario` is the recommended one.
    pub fn is_recommended(&self, scenario: &Scenario) -> bool {
        self.recommendation
            .as_ref()
            .is_some_and(|r| r.scenario == scenario.name)
    }
}

impl Scenario {
    /// Decodes one scenario, mapping alias field names on every operation.
    pub fn from_value(value: Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let name = text("name");
        let expected_outcome = text("expectedOutcome");

        let steps = match value.get("operations") {
            Some(Value::Array(ops)) => ops
                .iter()
                .cloned()
                .map(normalize_scenario_operation)
                .map(ScenarioStep::from_value)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            name,
            expected_outcome,
            steps,
        }
    }

    /// Operations in application order.
    pub fn operations(&self) -> Vec<Operation> {
        self.steps.iter().map(|s| s.operation.clone()).collect()
    }

    /// One summary line per step, e.g. `split parent Order #7`.
    pub fn operation_summaries(&self) -> Vec<String> {
        self.steps.iter().map(ScenarioStep::summary).collect()
    }
}

impl ScenarioStep {
    fn from_value(value: Value) -> Self {
        let raw_action_type = raw_action_type(&value).map(str::to_string);
        let strip_ref = raw_strip_ref(&value);
        Self {
            operation: decode_operation(value),
            raw_action_type,
            strip_ref,
        }
    }

    /// Action type with spaces, then the strip it names.
    pub fn summary(&self) -> String {
        let action = self
            .raw_action_type
            .as_deref()
            .unwrap_or("unknown")
            .replace('_', " ");
        format!("{action} Order #{}", self.strip_ref.as_deref().unwrap_or("?"))
    }
}

fn non_empty_array<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Vec<Value>> {
    match fields.get(key) {
        Some(Value::Array(items)) if !items.is_empty() => Some(items),
        _ => None,
    }
}

fn option_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => {
            warn!(option = %other, "drill-down option ignored");
            None
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
