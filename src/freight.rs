//! Plain data shared by every other module: freight items and the id types
//! used to tag stations, trains, and cargo.

/// Index of a station on the ring, in `0..station_count`.
pub type StationId = usize;

/// Identity of a train, assigned by position in the configuration.
pub type TrainId = u32;

/// Identity of a cargo item, assigned by the producer in increasing order.
pub type CargoId = u64;

/// A unit of freight. Immutable once created; at any instant it is owned by
/// exactly one station queue or one train's holding area, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cargo {
  pub id: CargoId,
  /// Capacity consumed on a train, and the number of ticks a transfer takes.
  /// Always at least 1.
  pub size: u32,
  pub destination: StationId,
}

impl Cargo {
  pub fn new(id: CargoId, size: u32, destination: StationId) -> Cargo {
    Cargo {
      id,
      size,
      destination,
    }
  }
}
