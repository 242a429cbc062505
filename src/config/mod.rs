//! Configuration module for SlotInfo
//!
//! Provides CLI arguments and the runtime configuration of the
//! resource provider.

mod settings;

pub use settings::*;
