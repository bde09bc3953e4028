//! Orchestration: wire a validated configuration into a track, start every
//! agent on its own named thread, and join them back into a report.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::{ConfigError, SimConfig};
use crate::event::EventSink;
use crate::freight::{Cargo, TrainId};
use crate::producer::CargoProducer;
use crate::shutdown::Shutdown;
use crate::track::Track;
use crate::train::TrainAgent;

/// A running simulation: N train threads plus one producer thread, all
/// sharing one [Track] and one [Shutdown] token.
#[derive(Debug)]
pub struct Simulation {
  track: Arc<Track>,
  shutdown: Shutdown,
  trains: Vec<JoinHandle<TrainAgent>>,
  producer: JoinHandle<u64>,
}

impl Simulation {
  /// Validate the configuration and start all agents. Validation failures
  /// surface before any thread is spawned.
  pub fn start(config: SimConfig, sink: Arc<dyn EventSink>) -> Result<Simulation, ConfigError> {
    config.validate()?;

    let track = Arc::new(Track::new(config.station_count));
    let shutdown = Shutdown::new();

    let trains = config
      .trains
      .iter()
      .enumerate()
      .map(|(index, train_config)| {
        let agent = TrainAgent::new(
          index as TrainId,
          train_config,
          &config,
          Arc::clone(&track),
          Arc::clone(&sink),
          shutdown.clone(),
        );
        thread::Builder::new()
          .name(format!("train-{index}"))
          .spawn(move || agent.run())
          .unwrap()
      })
      .collect();

    let producer = CargoProducer::new(&config, Arc::clone(&track), Arc::clone(&sink), shutdown.clone());
    let producer = thread::Builder::new()
      .name("cargo-producer".into())
      .spawn(move || producer.run())
      .unwrap();

    Ok(Simulation {
      track,
      shutdown,
      trains,
      producer,
    })
  }

  /// Ask every agent to stop at its next safe point. Returns immediately;
  /// use [Simulation::join] to wait for them.
  pub fn shutdown(&self) {
    self.shutdown.trigger();
  }

  /// A handle on the stop token, for wiring external triggers (signals,
  /// timers) without keeping the whole simulation around.
  pub fn shutdown_token(&self) -> Shutdown {
    self.shutdown.clone()
  }

  /// Wait for every agent to observe shutdown and return. Trains finish the
  /// cycle they are in, so this can take up to one full cycle per train; a
  /// train blocked on an occupied section waits until that section frees.
  pub fn join(self) -> SimReport {
    let trains = self
      .trains
      .into_iter()
      .map(|handle| handle.join().unwrap())
      .collect();
    let produced = self.producer.join().unwrap();
    SimReport {
      trains,
      produced,
      track: self.track,
    }
  }
}

/// Final state of a finished run: every train as it stopped, the number of
/// cargo items produced, and the track with whatever is still queued.
pub struct SimReport {
  pub trains: Vec<TrainAgent>,
  pub produced: u64,
  pub track: Arc<Track>,
}

impl SimReport {
  /// Cargo still waiting in station queues.
  pub fn waiting_cargo(&self) -> Vec<Cargo> {
    self
      .track
      .stations()
      .iter()
      .flat_map(|station| station.queue().snapshot())
      .collect()
  }

  /// Cargo still aboard trains.
  pub fn held_cargo(&self) -> Vec<Cargo> {
    self.trains.iter().flat_map(|train| train.held_cargo()).collect()
  }
}
