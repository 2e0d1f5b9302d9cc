//! Describe a Go interface type by reflecting on it in a throwaway program.
//!
//! No source of the target package is parsed. Instead a tiny Go program that
//! imports the package is synthesized, built and run with the Go toolchain,
//! and the package model it prints is decoded back into [`model::Package`].
//!
//! - **[`core`]**: Pure stages (request, program synthesis, CBOR codec).
//! - **[`io`]**: Side-effecting stages (config, workspace, toolchain).
//!
//! [`reflect`] sequences the stages and is the entry point.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod model;
pub mod reflect;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::request::ReflectRequest;
pub use crate::error::{ErrorKind, ReflectError};
pub use crate::model::Package;
pub use crate::reflect::{Reflector, reflect};
