//! Log-based snapshot sink.
//!
//! Implements [`SnapshotSink`] by writing one line per sensor to the logger
//! (UART / USB-CDC on the board, stderr on the host).  An MQTT publisher
//! would implement the same trait with `Snapshot::to_json`.

use core::fmt::Write;

use log::{info, warn};

use crate::sensors::hub::{HubReport, Snapshot, SnapshotSink};
use crate::sensors::value::{NamedValues, Value};

/// Adapter that logs every polling pass.
#[derive(Debug, Default)]
pub struct LogSink {
    passes: u32,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Polling passes seen so far.
    pub fn passes(&self) -> u32 {
        self.passes
    }
}

impl SnapshotSink for LogSink {
    fn publish(&mut self, report: &HubReport, snapshot: &Snapshot) {
        self.passes = self.passes.wrapping_add(1);
        for (label, kind, values) in &snapshot.entries {
            info!("READ | {} ({}) | {}", label, kind, format_fields(values));
        }
        for (label, err) in report.failures() {
            warn!("FAIL | {} | {}", label, err);
        }
    }
}

/// `t=21.5 h=40.0 p=-` style rendering; `-` means no reading yet.
pub fn format_fields(values: &NamedValues) -> String {
    let mut out = String::new();
    for (i, (name, value)) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = match value {
            Some(Value::Float(v)) => write!(out, "{name}={v}"),
            Some(Value::Int(v)) => write!(out, "{name}={v}"),
            Some(Value::Bool(v)) => write!(out, "{name}={}", u8::from(v)),
            None => write!(out, "{name}=-"),
        };
    }
    out
}
