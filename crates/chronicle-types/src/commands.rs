//! Wire types for the remote command channel.
//!
//! Inbound commands are loosely typed: an action key, an optional caller
//! correlation id, and named parameters that may arrive as JSON numbers,
//! strings, or booleans. The resolver decodes this envelope into a typed
//! [`GameAction`](crate::actions::GameAction) at the boundary; nothing past
//! the resolver touches `ParamValue`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A loosely-typed command parameter as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A JSON boolean.
    Flag(bool),
    /// A JSON integer.
    Integer(i64),
    /// A JSON string.
    Text(String),
}

impl ParamValue {
    /// The integer value, if this parameter is an integer.
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// The string value, if this parameter is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The boolean value, if this parameter is a boolean.
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            _ => None,
        }
    }

    /// A short name for this value's kind, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Flag(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Text(_) => "string",
        }
    }
}

/// An inbound command: action key, correlation id, named parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// The action to perform, e.g. `moveUnit` or `endTurn`.
    pub action: String,
    /// Optional caller-supplied correlation identifier, echoed verbatim
    /// into the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Named parameters; meaning varies by action.
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

impl Command {
    /// Create a command with no parameters.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            request_id: None,
            params: BTreeMap::new(),
        }
    }

    /// Builder-style parameter insertion, used heavily by tests.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Builder-style correlation id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Look up a parameter by name.
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }
}

/// Outcome of a single command.
///
/// Every command, valid or not, produces exactly one result; failures are
/// carried in the envelope rather than thrown across the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Correlation id echoed from the command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Whether the command executed successfully.
    pub success: bool,
    /// Error message when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Optional payload returned by the control surface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResult {
    /// A successful result with no payload.
    pub const fn ok(request_id: Option<String>) -> Self {
        Self {
            request_id,
            success: true,
            error: None,
            data: None,
        }
    }

    /// A failed result carrying an error message.
    pub fn failed(request_id: Option<String>, error: impl Into<String>) -> Self {
        Self {
            request_id,
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }
}

fn default_stop_on_error() -> bool {
    true
}

/// An ordered batch of commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCommand {
    /// Optional correlation id for the whole batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Commands to execute in order.
    pub commands: Vec<Command>,
    /// Halt at the first failure when true (the default).
    #[serde(default = "default_stop_on_error")]
    pub stop_on_error: bool,
}

/// Outcome of one command inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemResult {
    /// Position of the command in the batch.
    pub index: usize,
    /// The action that was attempted.
    pub action: String,
    /// Whether this command succeeded.
    pub success: bool,
    /// Error message when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a batch execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCommandResult {
    /// Correlation id echoed from the batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// True iff every executed item succeeded and none were skipped.
    pub all_succeeded: bool,
    /// Per-item outcomes, in submission order, one per executed item.
    pub results: Vec<BulkItemResult>,
    /// Index at which execution halted, set only when `stopOnError`
    /// was true and an item failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at_index: Option<usize>,
}
