//! Declarative helper macros.

#[macro_use]
mod tracing;
