//! Demo binary: run a simulation for a while, stop it, print what happened.

use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;

use looptrack::config::{SimConfig, TrainConfig};
use looptrack::event::TracingSink;
use looptrack::sim::Simulation;

#[derive(Parser)]
#[command(name = "looptrack", about = "Trains on a single-track loop, one thread each")]
struct Args {
  /// Number of stations on the loop.
  #[arg(long, default_value_t = 8)]
  stations: usize,

  /// Number of trains. Speeds and capacities are staggered like the classic
  /// exercise: train i gets speed (i mod 4) + 1 and capacity (i + 1) * 4.
  #[arg(long, default_value_t = 4)]
  trains: usize,

  /// Upper bound on generated cargo sizes.
  #[arg(long, default_value_t = 10)]
  max_cargo_size: u32,

  /// Length of one simulation tick in milliseconds.
  #[arg(long, default_value_t = 1000)]
  tick_ms: u64,

  /// Ticks a speed-1 train needs per section.
  #[arg(long, default_value_t = 4)]
  section_ticks: u32,

  /// Upper bound on producer idle time, in ticks.
  #[arg(long, default_value_t = 2)]
  max_idle_ticks: u32,

  /// Seed the producer's RNG for a reproducible run.
  #[arg(long)]
  seed: Option<u64>,

  /// Trigger shutdown after this many seconds.
  #[arg(long, default_value_t = 30)]
  run_for: u64,
}

fn main() -> ExitCode {
  tracing_subscriber::fmt().with_target(false).init();
  let args = Args::parse();

  let config = SimConfig {
    station_count: args.stations,
    trains: (0..args.trains)
      .map(|i| TrainConfig {
        speed: (i as u32 % 4) + 1,
        capacity: (i as u32 + 1) * 4,
        start_station: i % args.stations.max(1),
      })
      .collect(),
    max_cargo_size: args.max_cargo_size,
    max_idle_ticks: args.max_idle_ticks,
    tick: Duration::from_millis(args.tick_ms),
    section_ticks: args.section_ticks,
    seed: args.seed,
  };

  let simulation = match Simulation::start(config, Arc::new(TracingSink)) {
    Ok(simulation) => simulation,
    Err(error) => {
      tracing::error!("invalid configuration: {error}");
      return ExitCode::FAILURE;
    }
  };

  thread::sleep(Duration::from_secs(args.run_for));
  tracing::info!("stopping: waiting for trains to finish their cycles");
  simulation.shutdown();
  let report = simulation.join();

  let waiting = report.waiting_cargo().len();
  let held = report.held_cargo().len();
  let delivered = report.produced as usize - waiting - held;
  tracing::info!(
    "run finished: {} cargo produced, {} delivered, {} still queued, {} aboard trains",
    report.produced,
    delivered,
    waiting,
    held
  );
  for train in &report.trains {
    tracing::info!(
      "train {} stopped at station {} with {}/{} capacity free",
      train.id(),
      train.station(),
      train.capacity_left(),
      train.capacity()
    );
  }
  ExitCode::SUCCESS
}
