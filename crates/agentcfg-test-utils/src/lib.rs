//! Test helpers shared across agentcfg crates.

pub mod engine;
pub mod fixtures;

pub use engine::{RecordingEngine, take_recorded};
pub use fixtures::{
    BaseAgent, ChainA, ChainB, ChainC, InheritOnly, NetworkAgent, Probe, TimedAgent, options,
};
