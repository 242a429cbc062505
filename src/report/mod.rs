//! Report rendering
//!
//! Turns a [`JobResourceInfo`](crate::scheduler::JobResourceInfo) into text,
//! JSON or shell variable assignments.

mod render;

pub use render::*;
