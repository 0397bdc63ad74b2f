//! Plugin identity types shared between the wire protocol and the facade.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One of the two plugin kinds the current protocol revision supports.
///
/// `AGGREGATOR` and `PROCESSOR` are reserved on the wire (see open question 4
/// in the design notes) but have no facade support yet. A request carrying
/// one of them, or any other value that isn't `INPUT`/`OUTPUT`, must still
/// deserialize — only the dispatcher decides whether the type is usable —
/// so any unrecognised string collapses into `Unknown` rather than failing
/// `Request`'s deserialization outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PluginType {
    Input,
    Output,
    #[serde(other)]
    Unknown,
}

impl PluginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginType::Input => "INPUT",
            PluginType::Output => "OUTPUT",
            PluginType::Unknown => "UNKNOWN",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "INPUT" => Some(PluginType::Input),
            "OUTPUT" => Some(PluginType::Output),
            _ => None,
        }
    }
}

/// The identifier triple carried on the wire for every plugin-related request.
///
/// Invariant (enforced by the dispatcher, not by this type): every operation
/// other than `GET_ALL_PLUGINS`/`GET_RUNNING_PLUGINS` requires either
/// `name`+`type` or `unique_id`+`type`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub plugin_type: Option<PluginType>,

    #[serde(rename = "UniqueId", default, skip_serializing_if = "String::is_empty")]
    pub unique_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<HashMap<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_type_round_trips_through_uppercase_wire_strings() {
        assert_eq!(PluginType::from_str("INPUT"), Some(PluginType::Input));
        assert_eq!(PluginType::from_str("OUTPUT"), Some(PluginType::Output));
        assert_eq!(PluginType::from_str("AGGREGATOR"), None);
        assert_eq!(PluginType::Input.as_str(), "INPUT");
        assert_eq!(PluginType::Output.as_str(), "OUTPUT");
    }

    #[test]
    fn plugin_type_serializes_uppercase() {
        let json = serde_json::to_string(&PluginType::Input).unwrap();
        assert_eq!(json, "\"INPUT\"");
    }

    #[test]
    fn plugin_type_deserializes_reserved_and_garbage_values_as_unknown_instead_of_erroring() {
        for raw in [r#""AGGREGATOR""#, r#""PROCESSOR""#, r#""BOGUS""#] {
            let plugin_type: PluginType = serde_json::from_str(raw).unwrap();
            assert_eq!(plugin_type, PluginType::Unknown);
        }
    }

    #[test]
    fn plugin_ref_deserializes_capitalized_fields() {
        let raw = r#"{"Type":"INPUT","UniqueId":"in-42"}"#;
        let plugin: PluginRef = serde_json::from_str(raw).unwrap();
        assert_eq!(plugin.plugin_type, Some(PluginType::Input));
        assert_eq!(plugin.unique_id, "in-42");
        assert!(plugin.name.is_none());
    }

    #[test]
    fn plugin_ref_omits_absent_optional_fields_on_serialize() {
        let plugin = PluginRef {
            name: Some("memcached".into()),
            plugin_type: Some(PluginType::Input),
            unique_id: String::new(),
            config: None,
        };
        let json = serde_json::to_value(&plugin).unwrap();
        assert_eq!(json["Name"], "memcached");
        assert_eq!(json["Type"], "INPUT");
        assert!(json.get("UniqueId").is_none());
        assert!(json.get("Config").is_none());
    }
}
