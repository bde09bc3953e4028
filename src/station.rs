//! Stations and their freight queues.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::freight::{Cargo, StationId};
use crate::gate::SectionGate;

#[derive(Debug)]
struct QueueInner {
  /// Pending cargo keyed by `(size, arrival sequence)`, so iteration order is
  /// ascending size with ties resolved by arrival. The sequence number makes
  /// equal-size items distinct keys; nothing is ever silently merged.
  items: BTreeMap<(u32, u64), Cargo>,
  next_seq: u64,
}

/// Thread-safe store of the cargo waiting at one station, ordered by ascending
/// size. The producer inserts concurrently with trains removing; the lock is
/// held only for the duration of a single operation.
#[derive(Debug)]
pub struct CargoQueue {
  inner: Mutex<QueueInner>,
}

impl CargoQueue {
  pub fn new() -> CargoQueue {
    CargoQueue {
      inner: Mutex::new(QueueInner {
        items: BTreeMap::new(),
        next_seq: 0,
      }),
    }
  }

  pub fn enqueue(&self, cargo: Cargo) {
    let mut inner = self.inner.lock().unwrap();
    let seq = inner.next_seq;
    inner.next_seq += 1;
    inner.items.insert((cargo.size, seq), cargo);
  }

  /// Remove and return the smallest pending item, but only if its size is
  /// strictly below `limit`. Returns `None` (without touching the queue) when
  /// the queue is empty or even the smallest item would not fit.
  ///
  /// Taking the globally smallest item rather than any item that fits keeps
  /// large cargo from starving small-capacity trains.
  pub fn take_smaller_than(&self, limit: u32) -> Option<Cargo> {
    let mut inner = self.inner.lock().unwrap();
    let smallest_key = *inner.items.keys().next()?;
    if smallest_key.0 < limit {
      inner.items.remove(&smallest_key)
    } else {
      None
    }
  }

  pub fn len(&self) -> usize {
    self.inner.lock().unwrap().items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Copy of the pending cargo in queue order, for end-of-run reports and
  /// conservation audits.
  pub fn snapshot(&self) -> Vec<Cargo> {
    self.inner.lock().unwrap().items.values().cloned().collect()
  }
}

impl Default for CargoQueue {
  fn default() -> CargoQueue {
    CargoQueue::new()
  }
}

/// One station on the ring. Owns its freight queue and the gate that controls
/// entry to the section immediately ahead of it (section `i` runs from
/// station `i` to station `i + 1`, wrapping).
#[derive(Debug)]
pub struct Station {
  id: StationId,
  queue: CargoQueue,
  section_ahead: SectionGate,
}

impl Station {
  pub fn new(id: StationId) -> Station {
    Station {
      id,
      queue: CargoQueue::new(),
      section_ahead: SectionGate::new(),
    }
  }

  pub fn id(&self) -> StationId {
    self.id
  }

  pub fn queue(&self) -> &CargoQueue {
    &self.queue
  }

  pub fn section_ahead(&self) -> &SectionGate {
    &self.section_ahead
  }
}
