//! Pure stages of a reflection invocation.
//!
//! Core modules must be free of I/O side effects: they build the request,
//! render the program text, and translate bytes to and from the model.

pub mod codec;
pub mod program;
pub mod request;
