//! The cargo producer: a single agent that drips randomly sized freight into
//! random stations until shutdown.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::SimConfig;
use crate::event::{EventSink, SimEvent};
use crate::freight::{Cargo, CargoId};
use crate::shutdown::Shutdown;
use crate::track::Track;

/// Generates cargo with strictly increasing ids at random stations. One
/// producer per simulation is enough; the station queues are thread-safe, so
/// running more would need no changes here, only a shared id counter.
pub struct CargoProducer {
  track: Arc<Track>,
  sink: Arc<dyn EventSink>,
  shutdown: Shutdown,
  rng: ChaCha8Rng,
  max_cargo_size: u32,
  max_idle_ticks: u32,
  tick: Duration,
  next_id: CargoId,
}

impl CargoProducer {
  pub fn new(
    config: &SimConfig,
    track: Arc<Track>,
    sink: Arc<dyn EventSink>,
    shutdown: Shutdown,
  ) -> CargoProducer {
    let rng = match config.seed {
      Some(seed) => ChaCha8Rng::seed_from_u64(seed),
      None => ChaCha8Rng::from_entropy(),
    };
    CargoProducer {
      track,
      sink,
      shutdown,
      rng,
      max_cargo_size: config.max_cargo_size,
      max_idle_ticks: config.max_idle_ticks,
      tick: config.tick,
      next_id: 0,
    }
  }

  /// Sleep a random number of ticks, drop one item at a random origin for a
  /// random destination (which may equal the origin), repeat. Returns the
  /// number of items produced, for the end-of-run report.
  pub fn run(mut self) -> u64 {
    while !self.shutdown.is_triggered() {
      let idle = self.rng.gen_range(1..=self.max_idle_ticks);
      thread::sleep(self.tick * idle);

      let station_count = self.track.station_count();
      let size = self.rng.gen_range(1..=self.max_cargo_size);
      let origin = self.rng.gen_range(0..station_count);
      let destination = self.rng.gen_range(0..station_count);

      let cargo = Cargo::new(self.next_id, size, destination);
      self.next_id += 1;

      let event = SimEvent::CargoProduced {
        cargo: cargo.clone(),
        origin,
      };
      self.track.station(origin).queue().enqueue(cargo);
      self.sink.record(event);
    }
    self.next_id
  }
}
