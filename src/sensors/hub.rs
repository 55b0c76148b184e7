//! Ordered collection of heterogeneous sensors for a polling loop.
//!
//! The hub owns every adapter behind `Box<dyn Sensor>`.  `read_all` reads
//! them in insertion order; a failing sensor is logged and keeps its
//! previous values so one flaky probe cannot stall the others.  There is
//! no scheduling here: the caller decides when to poll.

use log::{debug, warn};
use serde::Serialize;
use serde::ser::SerializeMap;

use super::value::{NamedValues, Values};
use super::{Sensor, SensorKind};
use crate::error::{Error, Result};

/// Short human label such as `"porch"` or `"tank-probes"`.
pub type Label = heapless::String<16>;

/// Per-sensor read counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub reads: u32,
    pub failures: u32,
    pub last_error: Option<Error>,
}

/// Result of reading one sensor during [`SensorHub::read_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOutcome {
    pub label: Label,
    pub kind: SensorKind,
    pub result: Result<Values>,
}

/// Everything one `read_all` pass produced, in hub order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HubReport {
    pub outcomes: Vec<ReadOutcome>,
}

impl HubReport {
    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, Error)> {
        self.outcomes.iter().filter_map(|o| match o.result {
            Ok(_) => None,
            Err(e) => Some((o.label.as_str(), e)),
        })
    }
}

/// Labelled named values of every sensor, no I/O involved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub entries: Vec<(Label, SensorKind, NamedValues)>,
}

impl Snapshot {
    pub fn get(&self, label: &str) -> Option<&NamedValues> {
        self.entries
            .iter()
            .find(|(l, _, _)| l.as_str() == label)
            .map(|(_, _, v)| v)
    }

    /// Render as `{"label": {"field": value, ...}, ...}`.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|_| Error::Encode("snapshot"))
    }
}

impl Serialize for Snapshot {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, _, values) in &self.entries {
            map.serialize_entry(label.as_str(), values)?;
        }
        map.end()
    }
}

/// Receives the outcome of every polling pass (logging, telemetry, ...).
pub trait SnapshotSink {
    fn publish(&mut self, report: &HubReport, snapshot: &Snapshot);
}

struct Entry<'a> {
    label: Label,
    sensor: Box<dyn Sensor + 'a>,
    stats: ReadStats,
}

/// Aggregates sensors and reads them as one unit.
#[derive(Default)]
pub struct SensorHub<'a> {
    entries: Vec<Entry<'a>>,
}

impl<'a> SensorHub<'a> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append a sensor.  Labels must be unique and at most 16 bytes.
    pub fn add(&mut self, label: &str, sensor: Box<dyn Sensor + 'a>) -> Result<()> {
        let label = Label::try_from(label).map_err(|()| Error::Config("sensor label too long"))?;
        if self.entries.iter().any(|e| e.label == label) {
            return Err(Error::Config("duplicate sensor label"));
        }
        debug!("hub: + {} ({})", label, sensor.kind());
        self.entries.push(Entry {
            label,
            sensor,
            stats: ReadStats::default(),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Borrow a sensor by label.
    pub fn get(&self, label: &str) -> Option<&(dyn Sensor + 'a)> {
        self.entries
            .iter()
            .find(|e| e.label.as_str() == label)
            .map(|e| e.sensor.as_ref())
    }

    /// Read every sensor in insertion order.
    pub fn read_all(&mut self) -> HubReport {
        let mut report = HubReport::default();
        for entry in &mut self.entries {
            entry.stats.reads = entry.stats.reads.saturating_add(1);
            let result = entry.sensor.read();
            if let Err(e) = result {
                entry.stats.failures = entry.stats.failures.saturating_add(1);
                entry.stats.last_error = Some(e);
                warn!("{} ({}): read failed: {}", entry.label, entry.sensor.kind(), e);
            }
            report.outcomes.push(ReadOutcome {
                label: entry.label.clone(),
                kind: entry.sensor.kind(),
                result,
            });
        }
        report
    }

    /// Named last values of every sensor.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entries: self
                .entries
                .iter()
                .map(|e| (e.label.clone(), e.sensor.kind(), e.sensor.values_dict()))
                .collect(),
        }
    }

    pub fn stats(&self, label: &str) -> Option<ReadStats> {
        self.entries
            .iter()
            .find(|e| e.label.as_str() == label)
            .map(|e| e.stats)
    }
}
