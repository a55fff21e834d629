//! Domain models for the HBNB console.
//!
//! # Core Concepts
//!
//! - [`ClassName`]: The registry of model classes the console knows about.
//!   Commands naming any other class are rejected before touching storage.
//! - [`Instance`]: A single stored object. Every class shares the same shape
//!   (identifier, timestamps and a bag of free-form attributes), so one type
//!   covers them all and the class is carried as data.

mod class;
mod instance;

pub use class::*;
pub use instance::*;
