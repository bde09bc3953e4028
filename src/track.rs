//! The fixed circular topology the agents share.

use crate::freight::StationId;
use crate::gate::SectionGate;
use crate::station::Station;

/// A closed loop of `N` stations. Station `i` owns the gate for the section
/// from `i` to `(i + 1) % N`. Built once by the orchestrator and handed to
/// every agent as an `Arc`; the track itself is immutable, all mutability
/// lives behind the per-station locks and gates.
#[derive(Debug)]
pub struct Track {
  stations: Vec<Station>,
}

impl Track {
  /// The caller (simulation config validation) guarantees `station_count >= 2`.
  pub fn new(station_count: usize) -> Track {
    Track {
      stations: (0..station_count).map(Station::new).collect(),
    }
  }

  pub fn station_count(&self) -> usize {
    self.stations.len()
  }

  pub fn station(&self, id: StationId) -> &Station {
    &self.stations[id]
  }

  pub fn stations(&self) -> &[Station] {
    &self.stations
  }

  /// The station a train reaches after traversing the section ahead of `id`.
  pub fn next_station(&self, id: StationId) -> StationId {
    (id + 1) % self.stations.len()
  }

  /// Gate a train must hold to travel from `id` to the next station.
  pub fn section_ahead(&self, id: StationId) -> &SectionGate {
    self.stations[id].section_ahead()
  }

  /// Gate for the section a train just traversed to arrive at `id`.
  pub fn section_behind(&self, id: StationId) -> &SectionGate {
    let previous = (id + self.stations.len() - 1) % self.stations.len();
    self.stations[previous].section_ahead()
  }
}
