//! Status events and the sinks that serialize them.
//!
//! Agents describe what they do as [SimEvent]s and push them through an
//! [EventSink]. The sink is the only ordering the log has: events from one
//! agent arrive in the order that agent emitted them, interleaving across
//! agents is whatever the scheduler produced.

use std::fmt;
use std::sync::Mutex;

use crate::freight::{Cargo, StationId, TrainId};

/// One line of simulation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
  /// The producer created `cargo` and placed it at `origin`.
  CargoProduced { cargo: Cargo, origin: StationId },
  /// A train wants to depart and is about to wait for the section ahead.
  DepartureWait { train: TrainId, station: StationId },
  /// A train holds the section and is on its way.
  Departed {
    train: TrainId,
    from: StationId,
    to: StationId,
  },
  /// A train reached the next station and freed the section behind it.
  Arrived { train: TrainId, station: StationId },
  /// A train took `cargo` aboard at its current station.
  Loaded { train: TrainId, cargo: Cargo },
  /// A train delivered `cargo` at its destination.
  Unloaded { train: TrainId, cargo: Cargo },
  /// Nothing left at the station that fits the train's remaining capacity.
  NoMoreCargo { train: TrainId, station: StationId },
}

impl fmt::Display for SimEvent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SimEvent::CargoProduced { cargo, origin } => write!(
        f,
        "cargo {} (size {}) generated at station {} for station {}",
        cargo.id, cargo.size, origin, cargo.destination
      ),
      SimEvent::DepartureWait { train, station } => {
        write!(f, "train {} wants to leave station {}", train, station)
      }
      SimEvent::Departed { train, from, to } => {
        write!(f, "train {} is travelling from {} to {}", train, from, to)
      }
      SimEvent::Arrived { train, station } => {
        write!(f, "train {} arrived at station {}", train, station)
      }
      SimEvent::Loaded { train, cargo } => write!(
        f,
        "train {} loaded cargo {} (size {}) for station {}",
        train, cargo.id, cargo.size, cargo.destination
      ),
      SimEvent::Unloaded { train, cargo } => write!(
        f,
        "train {} unloaded cargo {} (size {}) at station {}",
        train, cargo.id, cargo.size, cargo.destination
      ),
      SimEvent::NoMoreCargo { train, station } => {
        write!(f, "train {} found no loadable cargo at station {}", train, station)
      }
    }
  }
}

/// Where agents send their events. Implementations must serialize concurrent
/// callers and preserve each caller's submission order.
pub trait EventSink: Send + Sync {
  fn record(&self, event: SimEvent);
}

/// Forwards every event to `tracing` as one info line. The subscriber set up
/// by the host process does the actual writing.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
  fn record(&self, event: SimEvent) {
    tracing::info!(target: "looptrack", "{event}");
  }
}

/// Keeps every event in memory, in arrival order. Meant for tests and
/// post-run audits rather than long real-time runs.
#[derive(Default)]
pub struct MemorySink {
  events: Mutex<Vec<SimEvent>>,
}

impl MemorySink {
  pub fn new() -> MemorySink {
    MemorySink::default()
  }

  pub fn events(&self) -> Vec<SimEvent> {
    self.events.lock().unwrap().clone()
  }
}

impl EventSink for MemorySink {
  fn record(&self, event: SimEvent) {
    self.events.lock().unwrap().push(event);
  }
}
