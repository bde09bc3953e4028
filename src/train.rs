//! The per-train agent: one thread alternating between station dwell and
//! section transit, forever, until the shutdown token says otherwise.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::{SimConfig, TrainConfig};
use crate::event::{EventSink, SimEvent};
use crate::freight::{Cargo, StationId, TrainId};
use crate::shutdown::Shutdown;
use crate::track::Track;

/// Where a train currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  AtStation,
  InSection,
}

/// A train and the loop that drives it. Created parked at its start station
/// (sections start free, so every train must start at a station). The struct
/// is consumed by [TrainAgent::run] and handed back when the loop exits, so
/// the orchestrator can inspect the final state after joining the thread.
pub struct TrainAgent {
  id: TrainId,
  speed: u32,
  capacity: u32,
  capacity_left: u32,
  station: StationId,
  phase: Phase,
  /// Cargo on board, keyed by destination. A train may carry several items
  /// for the same station.
  holding: HashMap<StationId, Vec<Cargo>>,
  track: Arc<Track>,
  sink: Arc<dyn EventSink>,
  shutdown: Shutdown,
  tick: Duration,
  section_ticks: u32,
}

impl TrainAgent {
  pub fn new(
    id: TrainId,
    train: &TrainConfig,
    config: &SimConfig,
    track: Arc<Track>,
    sink: Arc<dyn EventSink>,
    shutdown: Shutdown,
  ) -> TrainAgent {
    TrainAgent {
      id,
      speed: train.speed,
      capacity: train.capacity,
      capacity_left: train.capacity,
      station: train.start_station,
      phase: Phase::AtStation,
      holding: HashMap::new(),
      track,
      sink,
      shutdown,
      tick: config.tick,
      section_ticks: config.section_ticks,
    }
  }

  /// Drive the train until shutdown. The token is checked once per cycle, at
  /// the cycle boundary, so a cycle that has begun always runs to completion
  /// (a train never stops mid-section).
  pub fn run(mut self) -> TrainAgent {
    while !self.shutdown.is_triggered() {
      self.cycle();
    }
    self
  }

  /// One full rotation step: unload and load at the current station, depart
  /// through the gate ahead, traverse the section, arrive at the next
  /// station. Public so a cycle can be driven step-by-step without threads.
  pub fn cycle(&mut self) {
    self.unload();
    self.load();
    self.depart();
    self.arrive();
  }

  /// Deliver every held item whose destination is the current station.
  fn unload(&mut self) {
    while let Some(cargo) = self.pop_deliverable() {
      self.transfer_delay(cargo.size);
      self.capacity_left += cargo.size;
      self.sink.record(SimEvent::Unloaded {
        train: self.id,
        cargo,
      });
    }
    debug_assert_eq!(self.capacity_left + self.held_size(), self.capacity);
  }

  fn pop_deliverable(&mut self) -> Option<Cargo> {
    let here = self.holding.get_mut(&self.station)?;
    let cargo = here.pop();
    if here.is_empty() {
      self.holding.remove(&self.station);
    }
    cargo
  }

  /// Take cargo from the station queue, smallest first, until nothing fits
  /// the remaining capacity.
  fn load(&mut self) {
    let queue = self.track.station(self.station).queue();
    while let Some(cargo) = queue.take_smaller_than(self.capacity_left) {
      // The queue contract returns items strictly smaller than the remaining
      // capacity; anything else is a defect, not a runtime condition.
      assert!(
        cargo.size <= self.capacity_left,
        "train {} (capacity left {}) was handed cargo {} of size {}",
        self.id,
        self.capacity_left,
        cargo.id,
        cargo.size
      );
      self.capacity_left -= cargo.size;
      self.transfer_delay(cargo.size);
      self.sink.record(SimEvent::Loaded {
        train: self.id,
        cargo: cargo.clone(),
      });
      self.holding.entry(cargo.destination).or_default().push(cargo);
    }
    debug_assert_eq!(self.capacity_left + self.held_size(), self.capacity);
    self.sink.record(SimEvent::NoMoreCargo {
      train: self.id,
      station: self.station,
    });
  }

  /// Wait for the section ahead, then head into it.
  fn depart(&mut self) {
    self.sink.record(SimEvent::DepartureWait {
      train: self.id,
      station: self.station,
    });
    self.track.section_ahead(self.station).acquire();
    self.phase = Phase::InSection;
    self.sink.record(SimEvent::Departed {
      train: self.id,
      from: self.station,
      to: self.track.next_station(self.station),
    });
    self.travel_delay();
  }

  /// Reach the next station and free the section just traversed, waking a
  /// train that may be waiting to enter it.
  fn arrive(&mut self) {
    self.station = self.track.next_station(self.station);
    self.track.section_behind(self.station).release();
    self.phase = Phase::AtStation;
    self.sink.record(SimEvent::Arrived {
      train: self.id,
      station: self.station,
    });
    self.travel_delay();
  }

  /// Loading or unloading one item takes a tick per unit of size.
  fn transfer_delay(&self, size: u32) {
    thread::sleep(self.tick * size);
  }

  /// Transit and dwell both scale inversely with speed: a speed-1 train needs
  /// the full `section_ticks`, faster trains proportionally less.
  fn travel_delay(&self) {
    thread::sleep(self.tick * self.section_ticks / self.speed);
  }

  fn held_size(&self) -> u32 {
    self.holding.values().flatten().map(|c| c.size).sum()
  }

  pub fn id(&self) -> TrainId {
    self.id
  }

  pub fn station(&self) -> StationId {
    self.station
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn capacity(&self) -> u32 {
    self.capacity
  }

  pub fn capacity_left(&self) -> u32 {
    self.capacity_left
  }

  /// Copies of everything currently on board.
  pub fn held_cargo(&self) -> Vec<Cargo> {
    self.holding.values().flatten().cloned().collect()
  }
}
