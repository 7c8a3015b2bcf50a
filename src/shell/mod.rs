//! Shell Module
//!
//! Bounded external command execution with separated stream capture.

pub mod executor;
