//! Models and storage engines for the HBNB console.
//!
//! [`models`] defines the data-model instances the console manipulates, and
//! [`storage`] keeps them in a keyed map that is persisted through a pluggable
//! [`storage::Backend`].

pub mod models;
pub mod storage;
