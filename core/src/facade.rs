//! The narrow, capability-typed view of the agent that the dispatcher calls.
//!
//! This is deliberately not the metrics agent itself: it has no TOML config
//! parsing, no metric buffers, no scheduler. It is the seam the dispatcher
//! calls through, with one in-process reference implementation
//! ([`crate::mock::InMemoryAgent`]) good enough to exercise the session layer
//! end-to-end.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::FacadeError;

/// `{name, uniqueId}` pair as returned by `listRunningInputs`/`listRunningOutputs`.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningPlugin {
    pub name: String,
    pub unique_id: String,
}

pub type PluginConfig = HashMap<String, Value>;

/// Synchronous from the dispatcher's point of view: any concurrency inside
/// an implementation is that implementation's own problem, the same
/// contract the real metrics agent must satisfy.
#[async_trait]
pub trait AgentFacade: Send + Sync {
    async fn get_running_plugin(&self, unique_id: &str) -> Result<PluginConfig, FacadeError>;

    async fn create_input(&self, name: &str) -> Result<(), FacadeError>;
    async fn create_output(&self, name: &str) -> Result<(), FacadeError>;

    async fn start_input(&self, name: &str, config: PluginConfig) -> Result<String, FacadeError>;
    async fn start_output(&self, name: &str, config: PluginConfig) -> Result<String, FacadeError>;

    async fn stop_input_plugin(&self, unique_id: &str, await_drain: bool) -> Result<(), FacadeError>;
    async fn stop_output_plugin(&self, unique_id: &str, await_drain: bool) -> Result<(), FacadeError>;

    async fn update_input_plugin(&self, unique_id: &str, config: PluginConfig) -> Result<PluginConfig, FacadeError>;
    async fn update_output_plugin(&self, unique_id: &str, config: PluginConfig) -> Result<PluginConfig, FacadeError>;

    /// Field-type descriptors for a throwaway instance of `name`, never registered.
    async fn get_plugin_types(&self, name: &str) -> Result<HashMap<String, String>, FacadeError>;
    /// Default values for the same throwaway instance.
    async fn get_plugin_values(&self, name: &str) -> Result<PluginConfig, FacadeError>;

    async fn list_running_inputs(&self) -> Vec<RunningPlugin>;
    async fn list_running_outputs(&self) -> Vec<RunningPlugin>;

    async fn list_all_input_names(&self) -> Vec<String>;
    async fn list_all_output_names(&self) -> Vec<String>;
}
