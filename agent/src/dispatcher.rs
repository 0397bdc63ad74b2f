//! Translates one `Request` into one `Response` by calling the `AgentFacade`.
//!
//! A dedicated private handler method per operation, with `dispatch` doing
//! the routing and converting every facade error into a `FAILURE` response
//! rather than letting it unwind.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use assistant_core::errors::{FacadeError, ProtocolError};
use assistant_core::facade::AgentFacade;
use assistant_core::message::{Operation, Request, Response};
use assistant_core::plugin::{PluginRef, PluginType};

pub struct Dispatcher {
    facade: Arc<dyn AgentFacade>,
}

impl Dispatcher {
    pub fn new(facade: Arc<dyn AgentFacade>) -> Self {
        Dispatcher { facade }
    }

    /// A pure function from `(Request, AgentFacade)` to `Response`: every
    /// error path here ends in a `FAILURE` response, never a propagated error.
    pub async fn dispatch(&self, request: Request) -> Response {
        debug!(operation = %request.operation, uuid = %request.uuid, "dispatching request");

        let Some(operation) = Operation::from_str(&request.operation) else {
            return Response::failure(request.uuid, ProtocolError::UnknownOperation.to_string());
        };

        let uuid = request.uuid;
        let plugin = request.plugin;

        let result = match operation {
            Operation::GetPlugin => self.handle_get_plugin(&plugin).await,
            Operation::GetPluginSchema => self.handle_get_plugin_schema(&plugin).await,
            Operation::StartPlugin => self.handle_start_plugin(&plugin).await,
            Operation::StopPlugin => self.handle_stop_plugin(&plugin).await,
            Operation::UpdatePlugin => self.handle_update_plugin(&plugin).await,
            Operation::GetRunningPlugins => Ok(self.handle_get_running_plugins().await),
            Operation::GetAllPlugins => Ok(self.handle_get_all_plugins().await),
        };

        match result {
            Ok(data) => Response::success(uuid, data),
            Err(message) => Response::failure(uuid, message),
        }
    }

    async fn handle_get_plugin(&self, plugin: &PluginRef) -> Result<Value, String> {
        if plugin.unique_id.is_empty() {
            return Err(ProtocolError::MissingField("uniqueId").to_string());
        }
        self.facade
            .get_running_plugin(&plugin.unique_id)
            .await
            .map(|config| json!(config))
            .map_err(facade_err_to_string)
    }

    async fn handle_get_plugin_schema(&self, plugin: &PluginRef) -> Result<Value, String> {
        let name = plugin.name.as_deref().ok_or_else(|| ProtocolError::MissingField("name").to_string())?;
        let plugin_type = resolve_plugin_type(plugin)?;

        let create = match plugin_type {
            PluginType::Input => self.facade.create_input(name).await,
            PluginType::Output => self.facade.create_output(name).await,
        };
        create.map_err(facade_err_to_string)?;

        let types = self.facade.get_plugin_types(name).await.map_err(facade_err_to_string)?;
        let defaults = self.facade.get_plugin_values(name).await.map_err(facade_err_to_string)?;
        Ok(json!({ "Types": types, "Defaults": defaults }))
    }

    async fn handle_start_plugin(&self, plugin: &PluginRef) -> Result<Value, String> {
        let name = plugin.name.as_deref().ok_or_else(|| ProtocolError::MissingField("name").to_string())?;
        let plugin_type = resolve_plugin_type(plugin)?;
        let config = plugin.config.clone().unwrap_or_default();

        let unique_id = match plugin_type {
            PluginType::Input => self.facade.start_input(name, config).await,
            PluginType::Output => self.facade.start_output(name, config).await,
        }
        .map_err(facade_err_to_string)?;

        Ok(Value::String(unique_id))
    }

    async fn handle_stop_plugin(&self, plugin: &PluginRef) -> Result<Value, String> {
        if plugin.unique_id.is_empty() {
            return Err(ProtocolError::MissingField("uniqueId").to_string());
        }
        let plugin_type = resolve_plugin_type(plugin)?;

        match plugin_type {
            PluginType::Input => self.facade.stop_input_plugin(&plugin.unique_id, true).await,
            PluginType::Output => self.facade.stop_output_plugin(&plugin.unique_id, true).await,
        }
        .map_err(facade_err_to_string)?;

        Ok(Value::String("plugin stopped".to_string()))
    }

    async fn handle_update_plugin(&self, plugin: &PluginRef) -> Result<Value, String> {
        if plugin.unique_id.is_empty() {
            return Err(ProtocolError::MissingField("uniqueId").to_string());
        }
        let plugin_type = resolve_plugin_type(plugin)?;
        let config = match &plugin.config {
            Some(config) if !config.is_empty() || has_explicit_config(plugin) => config.clone(),
            _ => return Err(ProtocolError::MissingConfig.to_string()),
        };

        let effective = match plugin_type {
            PluginType::Input => self.facade.update_input_plugin(&plugin.unique_id, config).await,
            PluginType::Output => self.facade.update_output_plugin(&plugin.unique_id, config).await,
        }
        .map_err(facade_err_to_string)?;

        Ok(json!(effective))
    }

    async fn handle_get_running_plugins(&self) -> Value {
        let inputs = self.facade.list_running_inputs().await;
        let outputs = self.facade.list_running_outputs().await;
        json!({ "inputs": inputs, "outputs": outputs })
    }

    async fn handle_get_all_plugins(&self) -> Value {
        let inputs = self.facade.list_all_input_names().await;
        let outputs = self.facade.list_all_output_names().await;
        json!({ "inputs": inputs, "outputs": outputs })
    }
}

/// `UPDATE_PLUGIN` with `Config` present but empty is still "specified";
/// only an absent or `null` `Config` counts as missing.
fn has_explicit_config(plugin: &PluginRef) -> bool {
    plugin.config.is_some()
}

/// A missing `Type`, or one present but unrecognised (`Unknown`, e.g. the
/// reserved `AGGREGATOR`/`PROCESSOR` literals or outright garbage), are both
/// rejected the same way: only `Input`/`Output` resolve to a usable facade.
fn resolve_plugin_type(plugin: &PluginRef) -> Result<PluginType, String> {
    match plugin.plugin_type {
        Some(PluginType::Input) => Ok(PluginType::Input),
        Some(PluginType::Output) => Ok(PluginType::Output),
        Some(PluginType::Unknown) | None => Err(ProtocolError::InvalidPluginType.to_string()),
    }
}

fn facade_err_to_string(err: FacadeError) -> String {
    err.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::mock::InMemoryAgent;
    use assistant_core::plugin::PluginRef;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(InMemoryAgent::new()))
    }

    fn request(operation: &str, uuid: &str, plugin: PluginRef) -> Request {
        Request { operation: operation.to_string(), uuid: uuid.to_string(), plugin }
    }

    #[tokio::test]
    async fn unknown_operation_fails_with_invalid_operation_message() {
        let resp = dispatcher().dispatch(request("DELETE_PLUGIN", "u-3", PluginRef::default())).await;
        assert_eq!(resp.uuid, "u-3");
        assert_eq!(resp.data, json!("invalid operation request"));
    }

    #[tokio::test]
    async fn start_then_get_plugin_round_trips_config() {
        let dispatcher = dispatcher();
        let start = dispatcher
            .dispatch(request(
                "START_PLUGIN",
                "u-a",
                PluginRef { name: Some("memcached".into()), plugin_type: Some(PluginType::Input), ..Default::default() },
            ))
            .await;
        let unique_id = start.data.as_str().unwrap().to_string();

        let get = dispatcher
            .dispatch(request(
                "GET_PLUGIN",
                "u-b",
                PluginRef { unique_id, plugin_type: Some(PluginType::Input), ..Default::default() },
            ))
            .await;
        assert_eq!(get.data["Servers"], json!([]));
    }

    #[tokio::test]
    async fn update_without_config_fails_with_no_config_specified() {
        let dispatcher = dispatcher();
        let resp = dispatcher
            .dispatch(request(
                "UPDATE_PLUGIN",
                "u-2",
                PluginRef { unique_id: "in-42".into(), plugin_type: Some(PluginType::Input), ..Default::default() },
            ))
            .await;
        assert_eq!(resp.data, json!("no config specified!"));
    }

    #[tokio::test]
    async fn schema_lookup_matches_scenario_s4() {
        let resp = dispatcher()
            .dispatch(request(
                "GET_PLUGIN_SCHEMA",
                "u-4",
                PluginRef { name: Some("memcached".into()), plugin_type: Some(PluginType::Input), ..Default::default() },
            ))
            .await;
        assert_eq!(resp.data["Types"]["Servers"], "[]string");
        assert_eq!(resp.data["Defaults"]["Servers"], json!([]));
    }

    #[tokio::test]
    async fn missing_plugin_type_fails_with_documented_message() {
        let resp = dispatcher()
            .dispatch(request("START_PLUGIN", "u-5", PluginRef { name: Some("memcached".into()), ..Default::default() }))
            .await;
        assert_eq!(resp.data, json!("did not provide a valid plugin type"));
    }

    #[tokio::test]
    async fn reserved_plugin_type_fails_with_documented_message() {
        let resp = dispatcher()
            .dispatch(request(
                "START_PLUGIN",
                "u-5b",
                PluginRef { name: Some("memcached".into()), plugin_type: Some(PluginType::Unknown), ..Default::default() },
            ))
            .await;
        assert_eq!(resp.data, json!("did not provide a valid plugin type"));
    }

    #[tokio::test]
    async fn reserved_plugin_type_wire_literal_deserializes_and_still_fails_validation() {
        let raw = r#"{"Operation":"START_PLUGIN","Uuid":"u-5c","Plugin":{"Name":"memcached","Type":"AGGREGATOR"}}"#;
        let req: Request = serde_json::from_str(raw).unwrap();
        let resp = dispatcher().dispatch(req).await;
        assert_eq!(resp.data, json!("did not provide a valid plugin type"));
    }

    #[tokio::test]
    async fn get_all_plugins_reads_the_catalog() {
        let resp = dispatcher().dispatch(request("GET_ALL_PLUGINS", "u-6", PluginRef::default())).await;
        assert_eq!(resp.data["inputs"], json!(["cpu", "memcached"]));
        assert_eq!(resp.data["outputs"], json!(["file"]));
    }
}
