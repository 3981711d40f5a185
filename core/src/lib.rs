//! Core conversion pipeline for crowd trajectory logs.
//!
//! Raw per-agent, per-frame positions flow through three stages in strict
//! order: kinematics derivation, heading smoothing, and assembly of the
//! Mobius simulation document.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod schema;
pub mod telemetry;
pub mod trajectory;

pub use prelude::{ProcessingStage, StageConfig, StageError, StageResult};
