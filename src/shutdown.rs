//! Cooperative cancellation shared by every agent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable stop token. Agents poll it at the top of their loop and finish
/// the step they are in before exiting; nothing is preempted. Triggering is
/// one-way and idempotent.
///
/// The token is plain shared state, not a signal handler: whoever embeds the
/// simulation decides what triggers it (a timer, Ctrl-C wiring, a test).
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
  flag: Arc<AtomicBool>,
}

impl Shutdown {
  pub fn new() -> Shutdown {
    Shutdown {
      flag: Arc::new(AtomicBool::new(false)),
    }
  }

  pub fn trigger(&self) {
    self.flag.store(true, Ordering::Relaxed);
  }

  pub fn is_triggered(&self) -> bool {
    self.flag.load(Ordering::Relaxed)
  }
}
