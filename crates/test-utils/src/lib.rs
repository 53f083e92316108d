//! Shared infrastructure for `watchreload` integration tests: recording
//! fakes for the collaborator traits, scratch project trees, and harness
//! plumbing for driving the event loop.

pub mod builders;
pub mod fakes;
pub mod harness;

pub use harness::{eventually, init_tracing};
