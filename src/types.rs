//! Skillforge - Type Definitions
//!
//! All shared types for the self-extension core: directives, failure kinds,
//! safety verdicts, skill records, and configuration.

use std::path::PathBuf;

use rhai::AST;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Directives ──────────────────────────────────────────────────

/// A single action extracted from generated text.
///
/// At most one request is derived per dispatch call, never a list: the
/// dispatcher picks the highest-priority tag present and ignores the rest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionRequest {
    /// `[SHELL: <command>]`
    Shell { command: String },
    /// `[FORGE: <name> | <source>]`
    Forge { name: String, source: String },
    /// `[SKILL: <name>]`
    Invoke { name: String },
}

// ─── Failure Kinds ───────────────────────────────────────────────

/// Every failure the core can produce.
///
/// All of these are converted to outcome text at the dispatch boundary so
/// the surrounding conversation loop keeps flowing; none of them abort the
/// process.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Invalid skill name '{0}'. Skill names must be bare identifiers.")]
    InvalidIdentifier(String),

    #[error("Syntax error in skill: {0}")]
    Syntax(String),

    #[error("Import of dangerous module '{0}' is not allowed.")]
    ForbiddenImport(String),

    #[error("Skill source contains a forbidden pattern: {0}")]
    ForbiddenPattern(String),

    #[error("Failed to write skill '{name}': {source}")]
    StorageWrite {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Skill '{0}' not found.")]
    SkillNotFound(String),

    #[error("Skill '{0}' has no callable entry point.")]
    EntryPointMissing(String),

    #[error("Skill '{name}' execution failed: {message}")]
    InvocationFailure { name: String, message: String },

    #[error("Blocked unsafe command: {0}")]
    ShellBlocked(String),

    #[error("Command execution failed: {0}")]
    ShellSpawnFailure(String),

    #[error("Command timed out after {0} seconds.")]
    ShellTimeout(u64),
}

// ─── Safety ──────────────────────────────────────────────────────

/// The result of one gate check. Produced fresh per check, never cached.
#[derive(Debug)]
pub struct SafetyVerdict {
    pub allowed: bool,
    /// The typed rejection reason; rendered to text only when the outcome
    /// string is built.
    pub reason: Option<ActionError>,
}

impl SafetyVerdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: ActionError) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    /// Collapse into a `Result` for `?`-style plumbing.
    pub fn into_result(self) -> Result<(), ActionError> {
        match self.reason {
            Some(reason) if !self.allowed => Err(reason),
            _ => Ok(()),
        }
    }
}

// ─── Skills ──────────────────────────────────────────────────────

/// An on-disk skill source, as written by a successful Forge.
///
/// Overwritten (not versioned) by a later Forge with the same name; never
/// deleted by this core.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub name: String,
    pub source_text: String,
    pub storage_path: PathBuf,
}

/// A compiled skill held by the registry.
///
/// Rebuilt from disk on every rescan; a load failure for one file never
/// contaminates the entries of others.
#[derive(Clone, Debug)]
pub struct LoadedSkill {
    pub name: String,
    /// Names of every script function defined in the skill.
    pub entry_points: Vec<String>,
    /// Compiled form, called by the invoker.
    pub ast: AST,
}

/// Serializable per-skill summary handed to the outer engine so it can
/// advertise available skills in its own prompts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillInfo {
    pub name: String,
    pub entry_points: Vec<String>,
}

// ─── Shell ───────────────────────────────────────────────────────

/// Captured output of a completed shell command, streams kept separate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

// ─── Configuration ───────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeConfig {
    pub skills_dir: String,
    pub shell_timeout_secs: u64,
    pub log_level: LogLevel,
    pub version: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The level name as used in env-filter directives.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Returns the default `ForgeConfig`. Callers overwrite what they need.
pub fn default_config() -> ForgeConfig {
    ForgeConfig {
        skills_dir: "~/.skillforge/skills".to_string(),
        shell_timeout_secs: 10,
        log_level: LogLevel::Info,
        version: "0.1.0".to_string(),
    }
}
