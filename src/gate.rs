//! The admission gate guarding one section of track.

use std::sync::{Condvar, Mutex};

/// A counting gate with capacity 1: the section between two neighboring
/// stations holds at most one train. Starts free, because trains start parked
/// at stations rather than mid-section.
///
/// There is no fairness guarantee: `release` wakes at most one waiter via the
/// condvar, and a newly arriving train can slip in ahead of a thread that was
/// already waiting. Re-acquiring while already holding the gate is not
/// supported.
#[derive(Debug)]
pub struct SectionGate {
  free_slots: Mutex<u32>,
  freed: Condvar,
}

impl SectionGate {
  pub fn new() -> SectionGate {
    SectionGate {
      free_slots: Mutex::new(1),
      freed: Condvar::new(),
    }
  }

  /// Block until the section is free, then occupy it.
  pub fn acquire(&self) {
    let mut slots = self.free_slots.lock().unwrap();
    while *slots == 0 {
      slots = self.freed.wait(slots).unwrap();
    }
    *slots -= 1;
  }

  /// Free the section and wake at most one waiting train.
  pub fn release(&self) {
    let mut slots = self.free_slots.lock().unwrap();
    *slots += 1;
    self.freed.notify_one();
  }

  /// Whether a train currently holds the gate. Only a snapshot; useful for
  /// reporting, not for deciding whether `acquire` would block.
  pub fn is_occupied(&self) -> bool {
    *self.free_slots.lock().unwrap() == 0
  }
}

impl Default for SectionGate {
  fn default() -> SectionGate {
    SectionGate::new()
  }
}

#[cfg(test)]
mod tests {
  use super::SectionGate;
  use std::sync::atomic::{AtomicI32, Ordering};
  use std::sync::Arc;
  use std::thread;
  use std::time::Duration;

  #[test]
  fn starts_free() {
    let gate = SectionGate::new();
    assert!(!gate.is_occupied());
    gate.acquire();
    assert!(gate.is_occupied());
    gate.release();
    assert!(!gate.is_occupied());
  }

  /// The number of threads holding a gate never exceeds 1, checked by
  /// instrumenting acquire/release with a counter.
  #[test]
  fn mutual_exclusion_under_contention() {
    let gate = Arc::new(SectionGate::new());
    let inside = Arc::new(AtomicI32::new(0));

    let handles: Vec<_> = (0..8)
      .map(|_| {
        let gate = Arc::clone(&gate);
        let inside = Arc::clone(&inside);
        thread::spawn(move || {
          for _ in 0..200 {
            gate.acquire();
            let now_inside = inside.fetch_add(1, Ordering::SeqCst) + 1;
            assert_eq!(now_inside, 1, "two trains inside one section");
            thread::sleep(Duration::from_micros(10));
            inside.fetch_sub(1, Ordering::SeqCst);
            gate.release();
          }
        })
      })
      .collect();

    for handle in handles {
      handle.join().unwrap();
    }
    assert_eq!(inside.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn release_wakes_a_waiter() {
    let gate = Arc::new(SectionGate::new());
    gate.acquire();

    let waiter = {
      let gate = Arc::clone(&gate);
      thread::spawn(move || {
        gate.acquire();
        gate.release();
      })
    };

    // Give the waiter time to block, then free the section.
    thread::sleep(Duration::from_millis(20));
    gate.release();
    waiter.join().unwrap();
  }
}
