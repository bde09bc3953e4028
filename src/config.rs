//! Startup configuration, validated once before any agent thread spawns.

use std::time::Duration;

use thiserror::Error;

use crate::freight::StationId;

/// Parameters of one train.
#[derive(Debug, Clone)]
pub struct TrainConfig {
  /// Inverse of transit time: a train with speed `s` crosses a section in
  /// `tick * section_ticks / s`. Must be at least 1.
  pub speed: u32,
  /// Total cargo capacity. A capacity of 0 is allowed; such a train just
  /// circulates without ever loading.
  pub capacity: u32,
  pub start_station: StationId,
}

/// Everything a simulation run needs, immutable once agents start.
#[derive(Debug, Clone)]
pub struct SimConfig {
  pub station_count: usize,
  pub trains: Vec<TrainConfig>,
  /// Cargo sizes are drawn uniformly from `1..=max_cargo_size`.
  pub max_cargo_size: u32,
  /// Producer idle time between items is `tick * uniform(1..=max_idle_ticks)`.
  pub max_idle_ticks: u32,
  /// Base time unit every simulated delay is a multiple of. Real runs use
  /// something human-watchable; tests use a millisecond or zero.
  pub tick: Duration,
  /// Ticks a speed-1 train needs to cross one section (or dwell at a station).
  pub section_ticks: u32,
  /// Seed for the producer's RNG; `None` seeds from entropy.
  pub seed: Option<u64>,
}

impl SimConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.station_count < 2 {
      return Err(ConfigError::TooFewStations(self.station_count));
    }
    if self.trains.is_empty() {
      return Err(ConfigError::NoTrains);
    }
    for (index, train) in self.trains.iter().enumerate() {
      if train.start_station >= self.station_count {
        return Err(ConfigError::StartStationOutOfRange {
          train: index,
          station: train.start_station,
          station_count: self.station_count,
        });
      }
      if train.speed == 0 {
        return Err(ConfigError::ZeroSpeed { train: index });
      }
    }
    if self.max_cargo_size == 0 {
      return Err(ConfigError::ZeroCargoSize);
    }
    if self.max_idle_ticks == 0 {
      return Err(ConfigError::ZeroIdleBound);
    }
    Ok(())
  }
}

impl Default for SimConfig {
  /// The classic setup: 8 stations, 4 trains with staggered speeds and
  /// capacities, one-second ticks.
  fn default() -> SimConfig {
    SimConfig {
      station_count: 8,
      trains: (0..4)
        .map(|i| TrainConfig {
          speed: i + 1,
          capacity: (i + 1) * 4,
          start_station: i as StationId % 8,
        })
        .collect(),
      max_cargo_size: 10,
      max_idle_ticks: 2,
      tick: Duration::from_secs(1),
      section_ticks: 4,
      seed: None,
    }
  }
}

/// Fatal startup problems. All of these are reported before any thread exists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("a loop needs at least 2 stations, got {0}")]
  TooFewStations(usize),
  #[error("at least one train is required")]
  NoTrains,
  #[error("train {train} starts at station {station}, but there are only {station_count} stations")]
  StartStationOutOfRange {
    train: usize,
    station: StationId,
    station_count: usize,
  },
  #[error("train {train} has speed 0")]
  ZeroSpeed { train: usize },
  #[error("max cargo size must be at least 1")]
  ZeroCargoSize,
  #[error("producer idle bound must be at least 1 tick")]
  ZeroIdleBound,
}
