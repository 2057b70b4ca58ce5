//! 合成编排

pub mod engine;

pub use engine::{GenerateOutcome, SynthesisEngine, SynthesisEngineConfig};
