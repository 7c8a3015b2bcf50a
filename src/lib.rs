//! Skillforge -- Agent Self-Extension Core
//!
//! Interprets tagged directives embedded in generated text: run a shell
//! command, forge (validate + persist + load) a new skill, or invoke a
//! stored skill by name. Skills are Rhai scripts vetted by a static gate
//! before they ever reach disk.

pub mod types;
pub mod config;
pub mod gates;
pub mod skills;
pub mod shell;
pub mod dispatch;
