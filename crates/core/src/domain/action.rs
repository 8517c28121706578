use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::PipelineError;

/// The closed set of structured actions a model reply can resolve to.
///
/// Field names inside `updates` and `deal` stay as raw strings here; the
/// executor validates them against the `Field` table before any write
/// reaches the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Update { company: String, updates: BTreeMap<String, String> },
    Add { deal: BTreeMap<String, String> },
    List { filter_stage: Option<String> },
    Clarify { message: String },
}

impl Action {
    /// Validates raw model JSON into the union, exhaustively.
    ///
    /// Anything that is valid JSON but does not match one of the four
    /// known shapes is rejected: a missing or non-string `action` key is
    /// `MalformedResponse`, an unknown kind is `UnrecognizedAction`, and
    /// a known kind with missing or mistyped fields is
    /// `MalformedResponse` naming the field.
    pub fn from_model_json(value: &Value) -> Result<Action, PipelineError> {
        let object = value
            .as_object()
            .ok_or_else(|| PipelineError::malformed("expected a JSON object"))?;
        let kind = object
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| PipelineError::malformed("missing `action` key"))?;

        match kind {
            "update" => {
                let company = require_string(object, "company")?;
                let updates = require_string_map(object, "updates")?;
                Ok(Action::Update { company, updates })
            }
            "add" => {
                let deal = require_string_map(object, "deal")?;
                Ok(Action::Add { deal })
            }
            "list" => {
                let filter_stage = match object.get("filter_stage") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(stage)) => Some(stage.clone()),
                    Some(other) => {
                        return Err(PipelineError::malformed(format!(
                            "`filter_stage` must be a string or null, got {other}"
                        )))
                    }
                };
                Ok(Action::List { filter_stage })
            }
            "clarify" => {
                let message = require_string(object, "message")?;
                Ok(Action::Clarify { message })
            }
            other => Err(PipelineError::UnrecognizedAction { kind: other.to_string() }),
        }
    }
}

fn require_string(
    object: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<String, PipelineError> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PipelineError::malformed(format!("missing string field `{key}`")))
}

fn require_string_map(
    object: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<BTreeMap<String, String>, PipelineError> {
    let map = object
        .get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| PipelineError::malformed(format!("missing object field `{key}`")))?;

    let mut fields = BTreeMap::new();
    for (field, value) in map {
        let text = match value {
            Value::String(text) => text.clone(),
            // Numbers and booleans from the model are legal cell text.
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            other => {
                return Err(PipelineError::malformed(format!(
                    "`{key}.{field}` must be scalar, got {other}"
                )))
            }
        };
        fields.insert(field.clone(), text);
    }
    Ok(fields)
}
