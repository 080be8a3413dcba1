//! Resource Snapshot Types
//!
//! Plain values describing a resource at one point in time. These are what
//! the renderer consumes and what callers may persist as JSON.

use serde::{Deserialize, Serialize};

/// A replicated volume on one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSpec {
    /// DRBD volume number
    pub id: u32,
    /// Device minor (`/dev/drbd<minor>`)
    pub minor: u32,
    /// Lower-level block device, e.g. `/dev/vg0/r0`
    pub backing_device: String,
}

/// A peer in the mesh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSpec {
    /// DRBD node-id
    pub node_id: u32,
    /// Hostname as reported by `uname -n`
    pub name: String,
    /// Replication IP
    pub address: String,
    /// Volumes, ascending by id in snapshots
    #[serde(default)]
    pub volumes: Vec<VolumeSpec>,
}

/// Consistent view of a whole resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub name: String,
    pub port: u16,
    /// Hosts, ascending by node-id in snapshots
    #[serde(default)]
    pub hosts: Vec<HostSpec>,
}

impl ResourceSnapshot {
    /// Order hosts by node-id and each host's volumes by id
    pub fn sort(&mut self) {
        self.hosts.sort_by_key(|h| h.node_id);
        for host in &mut self.hosts {
            host.volumes.sort_by_key(|v| v.id);
        }
    }

    /// Host names in snapshot order
    pub fn host_names(&self) -> Vec<&str> {
        self.hosts.iter().map(|h| h.name.as_str()).collect()
    }

    /// Total number of volumes across all hosts
    pub fn volume_count(&self) -> usize {
        self.hosts.iter().map(|h| h.volumes.len()).sum()
    }
}
