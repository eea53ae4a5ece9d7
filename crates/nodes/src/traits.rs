//! The `ExecutableNode` trait: the contract every activity executor fulfils.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{NodeError, NodeKind};

/// A node's stored data: a flat JSON object.
pub type Data = Map<String, Value>;

/// Everything an executor may read for one invocation.
///
/// `config` is the node's own stored data, which already holds whatever
/// upstream nodes forwarded to it. `input` is the trigger input of the run.
/// Field lookups consult `config` first and fall back to `input`.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub node_id: &'a str,
    pub config: &'a Data,
    pub input: &'a Data,
}

impl<'a> Invocation<'a> {
    pub fn new(node_id: &'a str, config: &'a Data, input: &'a Data) -> Self {
        Self { node_id, config, input }
    }

    /// Look up a field, ignoring explicit `null`s.
    pub fn field(&self, key: &str) -> Option<&'a Value> {
        self.config
            .get(key)
            .filter(|v| !v.is_null())
            .or_else(|| self.input.get(key).filter(|v| !v.is_null()))
    }

    /// A non-empty string field.
    pub fn str_field(&self, key: &str) -> Option<&'a str> {
        self.field(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn require_str(&self, key: &str) -> Result<&'a str, NodeError> {
        self.str_field(key).ok_or_else(|| NodeError::missing(key))
    }

    /// An integer field. Numeric strings are accepted, since form inputs
    /// often store numbers as text.
    pub fn i64_field(&self, key: &str) -> Option<i64> {
        match self.field(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn require_i64(&self, key: &str) -> Result<i64, NodeError> {
        self.i64_field(key).ok_or_else(|| NodeError::missing(key))
    }

    pub fn object_field(&self, key: &str) -> Option<&'a Data> {
        self.field(key).and_then(Value::as_object)
    }
}

/// What an executor hands back to the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutorResult {
    /// Merged (shallow, later keys win) into the node's data.
    pub output_patch: Data,
    /// The node's verdict. `false` marks the node as `error`.
    pub ok: bool,
}

impl ExecutorResult {
    pub fn success(output_patch: Data) -> Self {
        Self { output_patch, ok: true }
    }

    /// A failure that still carries detail for display.
    pub fn failure(output_patch: Data) -> Self {
        Self { output_patch, ok: false }
    }

    /// The external operation returned nothing usable.
    pub fn no_data() -> Self {
        Self::failure(Data::new())
    }
}

/// The core node trait.
///
/// Each implementation performs exactly one external call per invocation
/// and must not touch global state.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    /// The kind this executor is registered under.
    fn kind(&self) -> NodeKind;

    async fn execute(&self, invocation: &Invocation<'_>) -> Result<ExecutorResult, NodeError>;
}

/// Build a [`Data`] object from a `json!({...})` literal.
///
/// Non-object values produce an empty map.
pub fn data_from(value: Value) -> Data {
    match value {
        Value::Object(map) => map,
        _ => Data::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_shadows_input_but_not_with_null() {
        let config = data_from(json!({ "fileName": "a.txt", "format": null }));
        let input = data_from(json!({ "fileName": "b.txt", "format": "csv" }));
        let inv = Invocation::new("n1", &config, &input);

        assert_eq!(inv.str_field("fileName"), Some("a.txt"));
        assert_eq!(inv.str_field("format"), Some("csv"));
        assert!(inv.field("missing").is_none());
    }

    #[test]
    fn numeric_strings_are_accepted_as_integers() {
        let config = data_from(json!({ "databaseId": "2", "selectedFileId": 1015 }));
        let input = Data::new();
        let inv = Invocation::new("n1", &config, &input);

        assert_eq!(inv.i64_field("databaseId"), Some(2));
        assert_eq!(inv.require_i64("selectedFileId").unwrap(), 1015);
        assert!(matches!(
            inv.require_i64("nope"),
            Err(NodeError::Configuration(msg)) if msg.contains("nope")
        ));
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let config = data_from(json!({ "url": "" }));
        let input = Data::new();
        let inv = Invocation::new("n1", &config, &input);
        assert!(inv.str_field("url").is_none());
    }
}
