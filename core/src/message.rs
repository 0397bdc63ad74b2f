//! Wire protocol envelopes: `Request`, `Response`, `Operation`, `Status`, `Schema`.
//!
//! Field names are case-sensitive and capitalised per the wire contract:
//! `Operation`, `Uuid`, `Plugin`, `Status`, `Data`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::plugin::PluginRef;

/// Decoded once at ingress so dispatch is an exhaustive match rather than a
/// string comparison repeated per handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetPlugin,
    GetPluginSchema,
    StartPlugin,
    StopPlugin,
    UpdatePlugin,
    GetRunningPlugins,
    GetAllPlugins,
}

impl Operation {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET_PLUGIN" => Some(Operation::GetPlugin),
            "GET_PLUGIN_SCHEMA" => Some(Operation::GetPluginSchema),
            "START_PLUGIN" => Some(Operation::StartPlugin),
            "STOP_PLUGIN" => Some(Operation::StopPlugin),
            "UPDATE_PLUGIN" => Some(Operation::UpdatePlugin),
            "GET_RUNNING_PLUGINS" => Some(Operation::GetRunningPlugins),
            "GET_ALL_PLUGINS" => Some(Operation::GetAllPlugins),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetPlugin => "GET_PLUGIN",
            Operation::GetPluginSchema => "GET_PLUGIN_SCHEMA",
            Operation::StartPlugin => "START_PLUGIN",
            Operation::StopPlugin => "STOP_PLUGIN",
            Operation::UpdatePlugin => "UPDATE_PLUGIN",
            Operation::GetRunningPlugins => "GET_RUNNING_PLUGINS",
            Operation::GetAllPlugins => "GET_ALL_PLUGINS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Failure,
}

/// A request as it arrives off the wire. The `operation` field is kept as the
/// raw string from the peer so the reader loop can echo `uuid` and report
/// `FAILURE` even when the operation itself is unrecognised.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Request {
    pub operation: String,

    #[serde(default)]
    pub uuid: String,

    #[serde(default)]
    pub plugin: PluginRef,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Response {
    pub status: Status,
    pub uuid: String,
    pub data: Value,
}

impl Response {
    pub fn success(uuid: impl Into<String>, data: Value) -> Self {
        Response { status: Status::Success, uuid: uuid.into(), data }
    }

    pub fn failure(uuid: impl Into<String>, message: impl Into<String>) -> Self {
        Response { status: Status::Failure, uuid: uuid.into(), data: Value::String(message.into()) }
    }
}

/// Returned by `GET_PLUGIN_SCHEMA`: field-type descriptors plus their defaults.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Schema {
    pub types: HashMap<String, String>,
    pub defaults: HashMap<String, Value>,
}
