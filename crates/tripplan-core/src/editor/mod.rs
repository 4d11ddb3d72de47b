//! Plan editing state machine.
//!
//! Pure transitions: each takes the current plan by reference and returns
//! the next one. [`list`] holds the positional primitives, [`trip`] and
//! [`outing`] lift them to the two plan shapes, and [`PlanEdit`] wraps them
//! as serializable commands.

pub mod commands;
pub mod list;
pub mod outing;
pub mod trip;

pub use commands::{EditError, PlanEdit};
