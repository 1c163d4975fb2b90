use std::fmt;
use std::time::Duration;

use anyhow::Result;
use serde::ser::{SerializeStruct, Serializer};
use uuid::Uuid;

/// Phase of an event-loop step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TraceEventKind {
    Discover,
    Integrate,
    Apply,
}

impl fmt::Display for TraceEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEventKind::Discover => write!(f, "Discover"),
            TraceEventKind::Integrate => write!(f, "Integrate"),
            TraceEventKind::Apply => write!(f, "Apply"),
        }
    }
}

/// Trace record for one phase of one step.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub kind: TraceEventKind,
    pub step: usize,
    pub event_uuid: Uuid,
    pub start: f64,
    pub end: f64,
    /// Labels of the interruptions that fire at the end of this step.
    pub interruptions: Vec<String>,
    pub micros: String,
    pub micros_parts: [u64; 3],
}

impl serde::Serialize for TraceEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("TraceEvent", 7)?;
        state.serialize_field("step", &self.step)?;
        state.serialize_field("event_uuid", &self.event_uuid)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("start", &self.start)?;
        state.serialize_field("end", &self.end)?;
        state.serialize_field("interruptions", &self.interruptions)?;
        state.serialize_field("micros", &self.micros_parts)?;
        state.end()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TraceTiming {
    pub micros: String,
    pub micros_parts: [u64; 3],
}

pub(crate) fn format_trace_timing(duration: Duration) -> TraceTiming {
    let total_ns = duration.as_nanos();
    let ms = (total_ns / 1_000_000) as u64;
    let us = ((total_ns / 1_000) % 1_000) as u64;
    let ns = (total_ns % 1_000) as u64;
    TraceTiming {
        micros: format!("{ms}ms {us}us {ns}ns"),
        micros_parts: [ms, us, ns],
    }
}

impl TraceEvent {
    pub(crate) fn new(
        kind: TraceEventKind,
        step: usize,
        span: (f64, f64),
        interruptions: Vec<String>,
        timing: Option<TraceTiming>,
    ) -> Self {
        let (micros, micros_parts) = timing
            .map(|timing| (timing.micros, timing.micros_parts))
            .unwrap_or_else(|| ("0ms 0us 0ns".to_string(), [0, 0, 0]));
        Self {
            kind,
            step,
            event_uuid: Uuid::new_v4(),
            start: span.0,
            end: span.1,
            interruptions,
            micros,
            micros_parts,
        }
    }
}

pub struct TraceSerialize;

impl TraceSerialize {
    pub fn json(events: &[TraceEvent]) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(events)?)
    }
}
