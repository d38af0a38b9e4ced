//! Core types for the Mayorista backend.

pub mod id;

pub use id::*;
