//! Host backend: real power control of VM-backed nodes.
//!
//! Power-off sends `sudo shutdown -h now` over SSH to the node's address;
//! power-on starts the node's domain through `virsh` on the hypervisor.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

use rack_types::NodeName;

use super::{BackendError, BackendKind, FailureBackend};
use crate::ssh::{run_local, SshTarget};

/// Command sent to a node to power it off.
pub const SHUTDOWN_COMMAND: &str = "sudo shutdown -h now";

/// Address and VM domain of one node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostEntry {
    /// SSH address.
    pub ip: String,
    /// Hypervisor domain name.
    pub vm_name: String,
}

/// Host backend settings (`[backend.host]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostSettings {
    /// SSH user on every node.
    #[serde(default = "default_ssh_user")]
    pub ssh_user: String,

    /// SSH private key.
    #[serde(default)]
    pub ssh_key: Option<PathBuf>,

    /// Hypervisor connection URI for `virsh -c`.
    #[serde(default = "default_hypervisor_uri")]
    pub hypervisor_uri: String,

    /// Node → host entry.
    #[serde(default)]
    pub nodes: BTreeMap<String, HostEntry>,
}

fn default_ssh_user() -> String {
    "ubuntu".to_string()
}

fn default_hypervisor_uri() -> String {
    "qemu:///system".to_string()
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            ssh_user: default_ssh_user(),
            ssh_key: None,
            hypervisor_uri: default_hypervisor_uri(),
            nodes: BTreeMap::new(),
        }
    }
}

/// Powers VM-backed nodes off over SSH and on through the hypervisor.
#[derive(Debug, Clone)]
pub struct HostBackend {
    settings: HostSettings,
    current: NodeName,
}

impl HostBackend {
    /// Create a backend that refuses to touch `current`.
    pub fn new(settings: HostSettings, current: NodeName) -> Self {
        Self { settings, current }
    }

    fn entry(&self, node: &NodeName) -> Result<&HostEntry, BackendError> {
        self.settings
            .nodes
            .get(node.as_str())
            .ok_or_else(|| BackendError::UnknownHost(node.clone()))
    }

    /// SSH target for a node.
    pub fn ssh_target(&self, node: &NodeName) -> Result<SshTarget, BackendError> {
        let entry = self.entry(node)?;
        let target = SshTarget::new(&entry.ip, &self.settings.ssh_user);
        Ok(match &self.settings.ssh_key {
            Some(key) => target.with_key(key.clone()),
            None => target,
        })
    }

    /// `virsh` arguments that start a node's domain.
    pub fn start_args(&self, node: &NodeName) -> Result<Vec<String>, BackendError> {
        let entry = self.entry(node)?;
        Ok(vec![
            "-c".into(),
            self.settings.hypervisor_uri.clone(),
            "start".into(),
            entry.vm_name.clone(),
        ])
    }
}

#[async_trait]
impl FailureBackend for HostBackend {
    async fn power_off(&self, node: &NodeName) -> Result<(), BackendError> {
        if *node == self.current {
            warn!(node = %node, "refusing to power off the orchestrator's own node");
            return Ok(());
        }
        let target = self.ssh_target(node)?;
        target.exec_ok(SHUTDOWN_COMMAND).await?;
        info!(node = %node, host = %target.host, "shutdown command sent");
        Ok(())
    }

    async fn power_on(&self, node: &NodeName) -> Result<(), BackendError> {
        let args = self.start_args(node)?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_local("virsh", &args).await?;
        info!(node = %node, "VM started");
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Host
    }
}
