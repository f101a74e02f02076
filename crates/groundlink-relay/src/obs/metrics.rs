//! Minimal metrics registry for the relay worker.
//!
//! Counters with dynamic labels backed by `DashMap`; labels are flattened
//! into sorted key vectors to keep deterministic ordering. The relay only
//! increments — the host renders (Prometheus text format) or reads values.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a label set (0 when never incremented).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let label_str = r
                .key()
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(out, "{name}{{{label_str}}} {val}");
        }
    }
}

/// Per-packet outcome counters for one relay instance.
#[derive(Default)]
pub struct RelayMetrics {
    pub packets_received: CounterVec,
    pub packets_relayed: CounterVec,
    /// Labelled by drop reason (FORMAT / DECODE / SOCKET).
    pub packets_dropped: CounterVec,
    pub bytes_relayed: CounterVec,
}

impl RelayMetrics {
    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.packets_received
            .render("groundlink_packets_received_total", &mut out);
        self.packets_relayed
            .render("groundlink_packets_relayed_total", &mut out);
        self.packets_dropped
            .render("groundlink_packets_dropped_total", &mut out);
        self.bytes_relayed
            .render("groundlink_bytes_relayed_total", &mut out);
        out
    }
}
