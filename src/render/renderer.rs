//! Resource Config Renderer
//!
//! Output layout, three spaces per nesting level. Each `on` block is
//! followed by a blank line and the text ends with `}` plus a newline;
//! files written by older drbd tooling end with a bare `}`, so compare
//! them with trailing whitespace trimmed.
//!
//! ```text
//! # meta-data-json:{"updated": "2026-10-19T08:00:00.000000Z"}
//! resource r0 {
//!    on alpha {
//!       node-id 0;
//!       address 10.0.0.1:7789;
//!       volume 0 {
//!          device minor 1000;
//!          disk /dev/vg0/r0;
//!          meta-disk internal;
//!       }
//!    }
//!
//!    connection-mesh {
//!       hosts alpha;
//!    }
//! }
//! ```

use crate::resource::{HostSpec, ResourceSnapshot, VolumeSpec};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// Indent for one nesting level
pub const INDENT: &str = "   ";

/// Renders resource snapshots to DRBD configuration text
///
/// Hosts are emitted in ascending node-id order and volumes in ascending
/// id order, so two renders of the same resource with the same timestamp
/// are byte-identical.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigRenderer;

impl ConfigRenderer {
    /// Render with the current UTC time as the update stamp
    pub fn render(snapshot: &ResourceSnapshot) -> String {
        Self::render_at(snapshot, Utc::now())
    }

    /// Render with a fixed update stamp
    pub fn render_at(snapshot: &ResourceSnapshot, updated: DateTime<Utc>) -> String {
        let mut snapshot = snapshot.clone();
        snapshot.sort();

        let mut out = Writer::default();
        out.raw(&meta_data_line(updated));
        out.line(0, &format!("resource {} {{", snapshot.name));

        for host in &snapshot.hosts {
            write_host(&mut out, host, snapshot.port);
            out.raw("\n");
        }

        out.line(1, "connection-mesh {");
        let mut hosts_line = String::from("hosts");
        for name in snapshot.host_names() {
            hosts_line.push(' ');
            hosts_line.push_str(name);
        }
        hosts_line.push(';');
        out.line(2, &hosts_line);
        out.line(1, "}");

        out.line(0, "}");
        out.finish()
    }
}

/// `# meta-data-json:{"updated": "..."}` followed by a newline
fn meta_data_line(updated: DateTime<Utc>) -> String {
    let stamp = updated.to_rfc3339_opts(SecondsFormat::Micros, true);
    // Serializing a plain string cannot fail
    let quoted = serde_json::to_string(&stamp).unwrap_or_else(|_| format!("\"{}\"", stamp));
    format!("# meta-data-json:{{\"updated\": {}}}\n", quoted)
}

fn write_host(out: &mut Writer, host: &HostSpec, port: u16) {
    out.line(1, &format!("on {} {{", host.name));
    out.line(2, &format!("node-id {};", host.node_id));
    out.line(2, &format!("address {}:{};", host.address, port));
    for volume in &host.volumes {
        write_volume(out, volume);
    }
    out.line(1, "}");
}

fn write_volume(out: &mut Writer, volume: &VolumeSpec) {
    out.line(2, &format!("volume {} {{", volume.id));
    out.line(3, &format!("device minor {};", volume.minor));
    out.line(3, &format!("disk {};", volume.backing_device));
    out.line(3, "meta-disk internal;");
    out.line(2, "}");
}

#[derive(Default)]
struct Writer {
    buf: String,
}

impl Writer {
    fn line(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.buf.push_str(INDENT);
        }
        // Writing to a String is infallible
        let _ = writeln!(self.buf, "{}", text);
    }

    fn raw(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
    }

    fn host(node_id: u32, name: &str, address: &str, volumes: Vec<VolumeSpec>) -> HostSpec {
        HostSpec {
            node_id,
            name: name.into(),
            address: address.into(),
            volumes,
        }
    }

    fn volume(id: u32, minor: u32, disk: &str) -> VolumeSpec {
        VolumeSpec {
            id,
            minor,
            backing_device: disk.into(),
        }
    }

    fn two_hosts() -> ResourceSnapshot {
        ResourceSnapshot {
            name: "r0".into(),
            port: 7789,
            hosts: vec![
                host(1, "beta", "10.0.0.2", vec![volume(0, 1000, "/dev/vg0/r0")]),
                host(0, "alpha", "10.0.0.1", vec![volume(0, 1000, "/dev/vg0/r0")]),
            ],
        }
    }

    #[test]
    fn test_exact_output() {
        let expected = "\
# meta-data-json:{\"updated\": \"2026-10-19T08:30:00.000000Z\"}
resource r0 {
   on alpha {
      node-id 0;
      address 10.0.0.1:7789;
      volume 0 {
         device minor 1000;
         disk /dev/vg0/r0;
         meta-disk internal;
      }
   }

   on beta {
      node-id 1;
      address 10.0.0.2:7789;
      volume 0 {
         device minor 1000;
         disk /dev/vg0/r0;
         meta-disk internal;
      }
   }

   connection-mesh {
      hosts alpha beta;
   }
}
";
        assert_eq!(ConfigRenderer::render_at(&two_hosts(), stamp()), expected);
    }

    #[test]
    fn test_ends_with_single_newline() {
        let text = ConfigRenderer::render_at(&two_hosts(), stamp());
        assert!(text.ends_with("   }\n}\n"));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn test_one_block_per_host_and_one_mesh() {
        let text = ConfigRenderer::render(&two_hosts());
        assert_eq!(text.matches("on alpha {").count(), 1);
        assert_eq!(text.matches("on beta {").count(), 1);
        assert_eq!(text.matches("connection-mesh {").count(), 1);
        assert_eq!(text.matches("hosts alpha beta;").count(), 1);
    }

    #[test]
    fn test_stable_across_renders() {
        let mut reordered = two_hosts();
        reordered.hosts.reverse();
        assert_eq!(
            ConfigRenderer::render_at(&two_hosts(), stamp()),
            ConfigRenderer::render_at(&reordered, stamp())
        );
    }

    #[test]
    fn test_volumes_in_id_order() {
        let snapshot = ResourceSnapshot {
            name: "r1".into(),
            port: 7790,
            hosts: vec![host(
                0,
                "alpha",
                "10.0.0.1",
                vec![volume(2, 1002, "/dev/sdc"), volume(1, 1001, "/dev/sdb")],
            )],
        };
        let text = ConfigRenderer::render_at(&snapshot, stamp());
        let first = text.find("volume 1 {").unwrap();
        let second = text.find("volume 2 {").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_host_without_volumes() {
        let snapshot = ResourceSnapshot {
            name: "r2".into(),
            port: 7791,
            hosts: vec![host(0, "alpha", "10.0.0.1", vec![])],
        };
        let text = ConfigRenderer::render_at(&snapshot, stamp());
        assert!(text.contains("   on alpha {\n      node-id 0;\n      address 10.0.0.1:7791;\n   }\n"));
        assert!(!text.contains("volume"));
    }

    #[test]
    fn test_meta_data_is_json() {
        let text = ConfigRenderer::render_at(&two_hosts(), stamp());
        let first_line = text.lines().next().unwrap();
        let json = first_line.strip_prefix("# meta-data-json:").unwrap();
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["updated"], "2026-10-19T08:30:00.000000Z");
    }
}
