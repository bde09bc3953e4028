//! End-to-end runs: several trains, a live producer, real threads, short ticks.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use looptrack::config::{ConfigError, SimConfig, TrainConfig};
use looptrack::event::{EventSink, MemorySink, SimEvent};
use looptrack::sim::{SimReport, Simulation};
use looptrack::train::Phase;

fn small_config() -> SimConfig {
  SimConfig {
    station_count: 4,
    trains: vec![
      TrainConfig {
        speed: 1,
        capacity: 8,
        start_station: 0,
      },
      TrainConfig {
        speed: 2,
        capacity: 12,
        start_station: 2,
      },
    ],
    max_cargo_size: 6,
    max_idle_ticks: 2,
    tick: Duration::from_millis(1),
    section_ticks: 2,
    seed: Some(7),
  }
}

fn run_for(config: SimConfig, duration: Duration) -> (Arc<MemorySink>, SimReport) {
  let sink = Arc::new(MemorySink::new());
  let events: Arc<dyn EventSink> = sink.clone();
  let simulation = Simulation::start(config, events).unwrap();
  thread::sleep(duration);
  simulation.shutdown();
  (sink, simulation.join())
}

/// Every produced cargo item ends up in exactly one place: still queued at a
/// station, still aboard a train, or unloaded at its destination — each id
/// exactly once, nothing duplicated, nothing lost.
#[test]
fn cargo_is_conserved() {
  let (sink, report) = run_for(small_config(), Duration::from_millis(200));

  let mut accounted: Vec<u64> = Vec::new();
  accounted.extend(report.waiting_cargo().iter().map(|c| c.id));
  accounted.extend(report.held_cargo().iter().map(|c| c.id));
  for event in sink.events() {
    if let SimEvent::Unloaded { cargo, .. } = event {
      accounted.push(cargo.id);
    }
  }
  accounted.sort_unstable();

  let expected: Vec<u64> = (0..report.produced).collect();
  assert_eq!(accounted, expected);
}

/// Unloads only ever happen at the cargo's destination — the same train must
/// have logged an arrival at that station earlier — and capacity books
/// balance for every train at the end of the run.
#[test]
fn deliveries_are_correct_and_books_balance() {
  let (sink, report) = run_for(small_config(), Duration::from_millis(200));

  let events = sink.events();
  for (index, event) in events.iter().enumerate() {
    if let SimEvent::Unloaded { train, cargo } = event {
      // Trains start empty, so every unload is preceded by this train
      // arriving at the cargo's destination. The sink preserves per-writer
      // order, so looking backwards in the log is sound.
      let arrived_first = events[..index].iter().any(|earlier| {
        matches!(earlier, SimEvent::Arrived { train: t, station }
          if t == train && station == &cargo.destination)
      });
      assert!(
        arrived_first,
        "train {} unloaded cargo {} at {} without arriving there",
        train, cargo.id, cargo.destination
      );
    }
  }

  for train in &report.trains {
    let held: u32 = train.held_cargo().iter().map(|c| c.size).sum();
    assert_eq!(train.capacity_left() + held, train.capacity());
  }
}

/// After shutdown, every train has finished the cycle it was in: all threads
/// join, and every train is parked at a station, never mid-section.
#[test]
fn shutdown_is_graceful() {
  let (_, report) = run_for(small_config(), Duration::from_millis(60));

  for train in &report.trains {
    assert_eq!(train.phase(), Phase::AtStation);
    assert!(train.station() < 4);
  }
  // All gates were released on the way out.
  for station in 0..report.track.station_count() {
    assert!(!report.track.section_ahead(station).is_occupied());
  }
}

/// Contended loop: as many trains as stations, every section fought over.
/// The run must still stop cleanly and conserve cargo.
#[test]
fn contended_ring_still_stops() {
  let config = SimConfig {
    station_count: 2,
    trains: vec![
      TrainConfig {
        speed: 1,
        capacity: 6,
        start_station: 0,
      },
      TrainConfig {
        speed: 1,
        capacity: 6,
        start_station: 1,
      },
    ],
    max_cargo_size: 4,
    max_idle_ticks: 1,
    tick: Duration::from_millis(1),
    section_ticks: 1,
    seed: Some(99),
  };
  let (sink, report) = run_for(config, Duration::from_millis(100));

  let mut accounted: Vec<u64> = Vec::new();
  accounted.extend(report.waiting_cargo().iter().map(|c| c.id));
  accounted.extend(report.held_cargo().iter().map(|c| c.id));
  for event in sink.events() {
    if let SimEvent::Unloaded { cargo, .. } = event {
      accounted.push(cargo.id);
    }
  }
  accounted.sort_unstable();
  assert_eq!(accounted, (0..report.produced).collect::<Vec<u64>>());
}

/// Per-writer order is preserved by the sink: each train's own events follow
/// the cycle structure (wait, depart, arrive, in that order, repeatedly).
#[test]
fn per_train_event_order_follows_the_cycle() {
  let (sink, report) = run_for(small_config(), Duration::from_millis(120));

  for train in &report.trains {
    let id = train.id();
    let mut expect_departed_next = false;
    for event in sink.events() {
      match event {
        SimEvent::DepartureWait { train: t, .. } if t == id => {
          assert!(!expect_departed_next, "train {id} waited twice without departing");
          expect_departed_next = true;
        }
        SimEvent::Departed { train: t, .. } if t == id => {
          assert!(expect_departed_next, "train {id} departed without announcing");
          expect_departed_next = false;
        }
        _ => {}
      }
    }
  }
}

#[test]
fn invalid_configuration_never_spawns() {
  let sink = Arc::new(MemorySink::new());
  let events: Arc<dyn EventSink> = sink.clone();
  let config = SimConfig {
    station_count: 1,
    ..small_config()
  };
  let error = Simulation::start(config, events).unwrap_err();
  assert_eq!(error, ConfigError::TooFewStations(1));
  assert!(sink.events().is_empty());
}
