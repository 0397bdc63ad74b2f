//! `InMemoryAgent`: a reference [`crate::facade::AgentFacade`] good enough to
//! exercise the session layer end-to-end. A name -> factory catalog of
//! plugin kinds, with running instances tracked in a mutex-guarded map
//! keyed by agent-assigned id.
//!
//! This is scaffolding, not the metrics agent: it does not collect metrics
//! or parse TOML, it only tracks enough state to answer the facade contract.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::FacadeError;
use crate::facade::{AgentFacade, PluginConfig, RunningPlugin};
use crate::plugin::PluginType;

/// One entry in a plugin-kind catalog: the field-type descriptors and
/// default values a throwaway instance of this name would report.
#[derive(Debug, Clone)]
struct PluginKind {
    types: HashMap<String, String>,
    defaults: PluginConfig,
}

#[derive(Debug, Default)]
struct PluginKindRegistry {
    kinds: HashMap<String, PluginKind>,
}

impl PluginKindRegistry {
    fn register(&mut self, name: &str, types: HashMap<String, String>, defaults: PluginConfig) {
        self.kinds.insert(name.to_string(), PluginKind { types, defaults });
    }

    fn get(&self, name: &str) -> Option<&PluginKind> {
        self.kinds.get(name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.kinds.keys().cloned().collect();
        names.sort();
        names
    }
}

struct RunningInstance {
    name: String,
    plugin_type: PluginType,
    config: PluginConfig,
}

/// Tracks running instances by agent-assigned `uniqueId` in a mutex-guarded map.
pub struct InMemoryAgent {
    inputs: PluginKindRegistry,
    outputs: PluginKindRegistry,
    running: Mutex<HashMap<String, RunningInstance>>,
    next_id: AtomicU64,
}

impl Default for InMemoryAgent {
    fn default() -> Self {
        let mut inputs = PluginKindRegistry::default();
        inputs.register(
            "memcached",
            HashMap::from([
                ("Servers".to_string(), "[]string".to_string()),
                ("UnixSockets".to_string(), "[]string".to_string()),
            ]),
            HashMap::from([
                ("Servers".to_string(), json!([])),
                ("UnixSockets".to_string(), json!([])),
            ]),
        );
        inputs.register(
            "cpu",
            HashMap::from([("PercpuStats".to_string(), "bool".to_string())]),
            HashMap::from([("PercpuStats".to_string(), json!(false))]),
        );

        let mut outputs = PluginKindRegistry::default();
        outputs.register(
            "file",
            HashMap::from([("Files".to_string(), "[]string".to_string())]),
            HashMap::from([("Files".to_string(), json!(["stdout"]))]),
        );

        InMemoryAgent { inputs, outputs, running: Mutex::new(HashMap::new()), next_id: AtomicU64::new(1) }
    }
}

impl InMemoryAgent {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self, plugin_type: PluginType) -> &PluginKindRegistry {
        match plugin_type {
            PluginType::Input => &self.inputs,
            PluginType::Output => &self.outputs,
        }
    }

    fn start(&self, plugin_type: PluginType, name: &str, config: PluginConfig) -> Result<String, FacadeError> {
        let kind = self
            .registry(plugin_type)
            .get(name)
            .ok_or_else(|| FacadeError::UnknownPlugin(name.to_string()))?;
        let mut effective = kind.defaults.clone();
        effective.extend(config);

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let unique_id = format!("{name}-{id}");
        self.running.lock().expect("running mutex poisoned").insert(
            unique_id.clone(),
            RunningInstance { name: name.to_string(), plugin_type, config: effective },
        );
        Ok(unique_id)
    }

    fn stop(&self, unique_id: &str) -> Result<(), FacadeError> {
        self.running
            .lock()
            .expect("running mutex poisoned")
            .remove(unique_id)
            .map(|_| ())
            .ok_or_else(|| FacadeError::UnknownInstance(unique_id.to_string()))
    }

    fn update(&self, unique_id: &str, config: PluginConfig) -> Result<PluginConfig, FacadeError> {
        let mut running = self.running.lock().expect("running mutex poisoned");
        let instance = running
            .get_mut(unique_id)
            .ok_or_else(|| FacadeError::UnknownInstance(unique_id.to_string()))?;
        instance.config.extend(config);
        Ok(instance.config.clone())
    }

    fn list_running(&self, plugin_type: PluginType) -> Vec<RunningPlugin> {
        self.running
            .lock()
            .expect("running mutex poisoned")
            .iter()
            .filter(|(_, inst)| inst.plugin_type == plugin_type)
            .map(|(unique_id, inst)| RunningPlugin { name: inst.name.clone(), unique_id: unique_id.clone() })
            .collect()
    }
}

#[async_trait]
impl AgentFacade for InMemoryAgent {
    async fn get_running_plugin(&self, unique_id: &str) -> Result<PluginConfig, FacadeError> {
        self.running
            .lock()
            .expect("running mutex poisoned")
            .get(unique_id)
            .map(|inst| inst.config.clone())
            .ok_or_else(|| FacadeError::UnknownInstance(unique_id.to_string()))
    }

    async fn create_input(&self, name: &str) -> Result<(), FacadeError> {
        self.inputs.get(name).map(|_| ()).ok_or_else(|| FacadeError::UnknownPlugin(name.to_string()))
    }

    async fn create_output(&self, name: &str) -> Result<(), FacadeError> {
        self.outputs.get(name).map(|_| ()).ok_or_else(|| FacadeError::UnknownPlugin(name.to_string()))
    }

    async fn start_input(&self, name: &str, config: PluginConfig) -> Result<String, FacadeError> {
        self.start(PluginType::Input, name, config)
    }

    async fn start_output(&self, name: &str, config: PluginConfig) -> Result<String, FacadeError> {
        self.start(PluginType::Output, name, config)
    }

    async fn stop_input_plugin(&self, unique_id: &str, _await_drain: bool) -> Result<(), FacadeError> {
        self.stop(unique_id)
    }

    async fn stop_output_plugin(&self, unique_id: &str, _await_drain: bool) -> Result<(), FacadeError> {
        self.stop(unique_id)
    }

    async fn update_input_plugin(&self, unique_id: &str, config: PluginConfig) -> Result<PluginConfig, FacadeError> {
        self.update(unique_id, config)
    }

    async fn update_output_plugin(&self, unique_id: &str, config: PluginConfig) -> Result<PluginConfig, FacadeError> {
        self.update(unique_id, config)
    }

    async fn get_plugin_types(&self, name: &str) -> Result<HashMap<String, String>, FacadeError> {
        for registry in [&self.inputs, &self.outputs] {
            if let Some(kind) = registry.get(name) {
                return Ok(kind.types.clone());
            }
        }
        Err(FacadeError::UnknownPlugin(name.to_string()))
    }

    async fn get_plugin_values(&self, name: &str) -> Result<PluginConfig, FacadeError> {
        for registry in [&self.inputs, &self.outputs] {
            if let Some(kind) = registry.get(name) {
                return Ok(kind.defaults.clone());
            }
        }
        Err(FacadeError::UnknownPlugin(name.to_string()))
    }

    async fn list_running_inputs(&self) -> Vec<RunningPlugin> {
        self.list_running(PluginType::Input)
    }

    async fn list_running_outputs(&self) -> Vec<RunningPlugin> {
        self.list_running(PluginType::Output)
    }

    async fn list_all_input_names(&self) -> Vec<String> {
        self.inputs.names()
    }

    async fn list_all_output_names(&self) -> Vec<String> {
        self.outputs.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, Value)]) -> PluginConfig {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[tokio::test]
    async fn lists_all_plugin_names_from_the_catalog_not_running_instances() {
        let agent = InMemoryAgent::new();
        assert_eq!(agent.list_all_input_names().await, vec!["cpu".to_string(), "memcached".to_string()]);
        assert_eq!(agent.list_all_output_names().await, vec!["file".to_string()]);
    }

    #[tokio::test]
    async fn start_then_get_running_plugin_returns_merged_config() {
        let agent = InMemoryAgent::new();
        let id = agent.start_input("memcached", config(&[("Servers", json!(["a:11211"]))])).await.unwrap();
        assert!(id.starts_with("memcached-"));

        let effective = agent.get_running_plugin(&id).await.unwrap();
        assert_eq!(effective["Servers"], json!(["a:11211"]));
        assert_eq!(effective["UnixSockets"], json!([]));
    }

    #[tokio::test]
    async fn start_unknown_plugin_name_fails() {
        let agent = InMemoryAgent::new();
        let err = agent.start_input("bogus", PluginConfig::new()).await.unwrap_err();
        assert!(matches!(err, FacadeError::UnknownPlugin(name) if name == "bogus"));
    }

    #[tokio::test]
    async fn stop_unknown_instance_fails() {
        let agent = InMemoryAgent::new();
        let err = agent.stop_input_plugin("nope", true).await.unwrap_err();
        assert!(matches!(err, FacadeError::UnknownInstance(id) if id == "nope"));
    }

    #[tokio::test]
    async fn update_merges_config_and_returns_effective_config() {
        let agent = InMemoryAgent::new();
        let id = agent.start_input("memcached", PluginConfig::new()).await.unwrap();
        let updated = agent.update_input_plugin(&id, config(&[("Servers", json!(["b:11211"]))])).await.unwrap();
        assert_eq!(updated["Servers"], json!(["b:11211"]));
    }

    #[tokio::test]
    async fn schema_lookup_matches_scenario_s4() {
        let agent = InMemoryAgent::new();
        let types = agent.get_plugin_types("memcached").await.unwrap();
        let defaults = agent.get_plugin_values("memcached").await.unwrap();
        assert_eq!(types["Servers"], "[]string");
        assert_eq!(types["UnixSockets"], "[]string");
        assert_eq!(defaults["Servers"], json!([]));
        assert_eq!(defaults["UnixSockets"], json!([]));
    }

    #[tokio::test]
    async fn list_running_filters_by_plugin_type() {
        let agent = InMemoryAgent::new();
        let input_id = agent.start_input("cpu", PluginConfig::new()).await.unwrap();
        let output_id = agent.start_output("file", PluginConfig::new()).await.unwrap();

        let inputs = agent.list_running_inputs().await;
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].unique_id, input_id);

        let outputs = agent.list_running_outputs().await;
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].unique_id, output_id);
    }
}
