//! Shared helpers for training scripts
//!
//! This module provides run seeding and compact number formatting used
//! alongside the config and logger types.

pub mod format;
pub mod rng;

pub use rng::SimpleRng;
