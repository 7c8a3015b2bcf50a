//! Shell Gate
//!
//! Denylist validation for raw shell commands. Word-boundary anchored and
//! case-sensitive: "rm -rf /" is blocked, "format the report" is not.
//! A denylist cannot catch synonyms or absolute paths to the same binaries;
//! the executor's timeout is the second line of defense.

use regex::Regex;

use crate::types::{ActionError, SafetyVerdict};

/// Patterns for commands the core must never execute.
fn banned_command_patterns() -> Vec<Regex> {
    let patterns = [
        // Filesystem destruction
        r"\brm\b",
        r"\bdd\b",
        r"\bmkfs\b",
        // Raw writes to block devices
        r">\s*/dev/sd[a-z]",
        // Host power control
        r"\bshutdown\b",
        r"\breboot\b",
    ];

    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

/// Return the first banned pattern a command matches, if any.
pub fn find_banned_pattern(command: &str) -> Option<String> {
    let patterns = banned_command_patterns();

    for pattern in &patterns {
        if pattern.is_match(command) {
            return Some(pattern.as_str().to_string());
        }
    }

    None
}

/// Validate a raw command string against the denylist.
pub fn vet_command(command: &str) -> SafetyVerdict {
    match find_banned_pattern(command) {
        Some(_) => SafetyVerdict::deny(ActionError::ShellBlocked(command.to_string())),
        None => SafetyVerdict::allow(),
    }
}
