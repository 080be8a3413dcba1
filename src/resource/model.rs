//! Resource Model
//!
//! Host and volume registry for a single DRBD resource. All state sits
//! behind one mutex; every public operation holds it from validation to
//! mutation, so an add either fully applies or leaves nothing behind.

use super::spec::{HostSpec, ResourceSnapshot, VolumeSpec};
use crate::domain::ports::{AsyncConfigSink, ConfigSink};
use crate::error::{Error, HostField, Result, VolumeField};
use crate::render::ConfigRenderer;
use crate::sink::FileSink;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

// =============================================================================
// Host Entry
// =============================================================================

#[derive(Debug, Clone)]
struct HostEntry {
    node_id: u32,
    name: String,
    address: String,
    /// Keyed by volume id
    volumes: HashMap<u32, VolumeSpec>,
}

impl HostEntry {
    fn check_volume(&self, volume: &VolumeSpec) -> Result<()> {
        for existing in self.volumes.values() {
            let conflict = if existing.id == volume.id {
                Some((VolumeField::Id, volume.id.to_string()))
            } else if existing.backing_device == volume.backing_device {
                Some((VolumeField::BackingDevice, volume.backing_device.clone()))
            } else if existing.minor == volume.minor {
                Some((VolumeField::Minor, volume.minor.to_string()))
            } else {
                None
            };

            if let Some((field, value)) = conflict {
                return Err(Error::DuplicateVolume {
                    host: self.name.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }

    fn to_spec(&self) -> HostSpec {
        let mut volumes: Vec<VolumeSpec> = self.volumes.values().cloned().collect();
        volumes.sort_by_key(|v| v.id);
        HostSpec {
            node_id: self.node_id,
            name: self.name.clone(),
            address: self.address.clone(),
            volumes,
        }
    }
}

#[derive(Debug, Default)]
struct ResourceState {
    /// Keyed by hostname
    hosts: HashMap<String, HostEntry>,
}

// =============================================================================
// Resource
// =============================================================================

/// A DRBD resource: hosts, their volumes, and the shared replication port
#[derive(Debug)]
pub struct Resource {
    name: String,
    port: u16,
    state: Mutex<ResourceState>,
}

impl Resource {
    /// Create an empty resource
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
            state: Mutex::new(ResourceState::default()),
        }
    }

    /// Resource name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replication port shared by all hosts
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Add a host to the mesh
    ///
    /// Fails with [`Error::DuplicateHost`] if the node-id, name or address
    /// is already taken by another host.
    pub fn add_host(
        &self,
        node_id: u32,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<()> {
        let entry = HostEntry {
            node_id,
            name: name.into(),
            address: address.into(),
            volumes: HashMap::new(),
        };

        let mut state = self.state.lock();

        for existing in state.hosts.values() {
            let conflict = if existing.node_id == entry.node_id {
                Some((HostField::NodeId, entry.node_id.to_string()))
            } else if existing.name == entry.name {
                Some((HostField::Name, entry.name.clone()))
            } else if existing.address == entry.address {
                Some((HostField::Address, entry.address.clone()))
            } else {
                None
            };

            if let Some((field, value)) = conflict {
                return Err(Error::DuplicateHost {
                    resource: self.name.clone(),
                    field,
                    value,
                });
            }
        }

        debug!(
            "Resource {}: added host {} (node-id {}, {})",
            self.name, entry.name, entry.node_id, entry.address
        );
        state.hosts.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Add a volume to an existing host
    ///
    /// Fails with [`Error::HostNotFound`] for an unknown host and with
    /// [`Error::DuplicateVolume`] if the host already has a volume with the
    /// same id, backing device or minor.
    pub fn add_volume(
        &self,
        id: u32,
        minor: u32,
        backing_device: impl Into<String>,
        hostname: &str,
    ) -> Result<()> {
        let volume = VolumeSpec {
            id,
            minor,
            backing_device: backing_device.into(),
        };

        let mut state = self.state.lock();

        let host = state
            .hosts
            .get_mut(hostname)
            .ok_or_else(|| Error::HostNotFound {
                resource: self.name.clone(),
                hostname: hostname.to_string(),
            })?;

        host.check_volume(&volume)?;

        debug!(
            "Resource {}: added volume {} (minor {}, {}) on {}",
            self.name, volume.id, volume.minor, volume.backing_device, hostname
        );
        host.volumes.insert(volume.id, volume);
        Ok(())
    }

    /// Number of hosts
    pub fn host_count(&self) -> usize {
        self.state.lock().hosts.len()
    }

    /// Number of volumes across all hosts
    pub fn volume_count(&self) -> usize {
        self.state
            .lock()
            .hosts
            .values()
            .map(|h| h.volumes.len())
            .sum()
    }

    /// Check if a host exists
    pub fn contains_host(&self, hostname: &str) -> bool {
        self.state.lock().hosts.contains_key(hostname)
    }

    /// Get a host by name
    pub fn host(&self, hostname: &str) -> Option<HostSpec> {
        self.state.lock().hosts.get(hostname).map(HostEntry::to_spec)
    }

    /// Consistent copy of the resource, hosts by node-id, volumes by id
    pub fn snapshot(&self) -> ResourceSnapshot {
        let state = self.state.lock();
        let mut snapshot = ResourceSnapshot {
            name: self.name.clone(),
            port: self.port,
            hosts: state.hosts.values().map(HostEntry::to_spec).collect(),
        };
        drop(state);

        snapshot.sort();
        snapshot
    }

    /// Minors used by any host, ascending and duplicate free
    ///
    /// Suitable as the seed of a minor [`NumberPool`](crate::NumberPool).
    pub fn used_minors(&self) -> Vec<u32> {
        let state = self.state.lock();
        let mut minors: Vec<u32> = state
            .hosts
            .values()
            .flat_map(|h| h.volumes.values().map(|v| v.minor))
            .collect();
        drop(state);

        minors.sort_unstable();
        minors.dedup();
        minors
    }

    /// Node-ids in use, ascending
    pub fn used_node_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.state.lock().hosts.values().map(|h| h.node_id).collect();
        ids.sort_unstable();
        ids
    }

    /// Render the configuration stamped with the current time
    pub fn render(&self) -> String {
        self.render_at(Utc::now())
    }

    /// Render the configuration stamped with `updated`
    pub fn render_at(&self, updated: DateTime<Utc>) -> String {
        ConfigRenderer::render_at(&self.snapshot(), updated)
    }

    /// Render and hand the bytes to `sink`
    ///
    /// The lock is released before the sink is called.
    pub fn write_config(&self, sink: &dyn ConfigSink) -> Result<()> {
        let config = self.render();
        sink.write(config.as_bytes())?;
        info!("Wrote config for resource {} to {}", self.name, sink.describe());
        Ok(())
    }

    /// Async variant of [`write_config`](Resource::write_config)
    pub async fn write_config_async(&self, sink: &dyn AsyncConfigSink) -> Result<()> {
        let config = self.render();
        sink.write(config.as_bytes()).await?;
        info!("Wrote config for resource {} to {}", self.name, sink.describe());
        Ok(())
    }

    /// Render and write to `path`, replacing any existing file
    ///
    /// A failed write may leave a partial file behind; removing it is up to
    /// the caller.
    pub fn write_config_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_config(&FileSink::new(path.as_ref()))
    }
}
