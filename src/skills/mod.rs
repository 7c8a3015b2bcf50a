//! Skills Module
//!
//! Persistence, discovery, and invocation of Rhai skill files. The store
//! writes gated sources to disk, the loader rebuilds the in-memory set from
//! disk, and the invoker resolves an entry point and calls it.

pub mod invoker;
pub mod loader;
pub mod registry;
pub mod store;
