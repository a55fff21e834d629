//! HBNB command console.
//!
//! The [`console`] drives a read-eval-print loop over storage opened from
//! [`config`]. Models and storage engines live in `hbnb-core` and are
//! re-exported here.

pub mod config;
pub mod console;

pub use hbnb_core::{models, storage};
