//! I/O helpers for a reflection invocation.

pub mod config;
pub mod toolchain;
pub mod workspace;
