//! A simulation of trains running around a closed single-track loop of stations.
//!
//! Each section of track between two neighboring stations admits one train at a
//! time, guarded by a [gate::SectionGate]. Stations hold freight in a
//! size-ordered [station::CargoQueue] that a [producer::CargoProducer] fills
//! concurrently while [train::TrainAgent]s drain it. Every agent runs on its
//! own OS thread and coordinates only through the shared [track::Track]; a
//! cloneable [shutdown::Shutdown] token stops everything cooperatively.
//!
//! To run a simulation, build a [config::SimConfig], pick an
//! [event::EventSink] for the status lines, and hand both to
//! [sim::Simulation::start]. The agents report everything they do through the
//! sink, so a run can be watched live (via [event::TracingSink]) or audited
//! after the fact (via [event::MemorySink]).

pub mod config;
pub mod event;
pub mod freight;
pub mod gate;
pub mod producer;
pub mod shutdown;
pub mod sim;
pub mod station;
pub mod track;
pub mod train;
