//! Implementation of the `#[derive(Commable)]` macro.
//!
//! This module provides derive macro support for the comma column engine,
//! generating name-based field access and accessor constants from struct
//! annotations.

mod attrs;
mod derive;

pub use derive::commable_derive_impl;
