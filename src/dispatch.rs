//! Action Dispatcher
//!
//! Extracts at most one directive from raw generated text and routes it to
//! the forge, shell, or invoke path. Priority is Forge > Shell > Skill.
//! Dispatch always produces an outcome string; individual actions can fail
//! but the dispatcher never panics and never propagates an error upward.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use regex::Regex;
use rhai::Engine;
use tracing::{debug, info};

use crate::config::resolve_path;
use crate::shell::executor;
use crate::skills::{invoker, loader, registry::SkillRegistry, store};
use crate::types::{ActionError, ActionRequest, ForgeConfig, SkillInfo};

// ---------------------------------------------------------------------------
// Directive extraction
// ---------------------------------------------------------------------------

// Keyword matching is case-insensitive and bodies may span lines. Bodies
// are non-greedy, so a directive ends at the first `]` after its tag.
const FORGE_TAG: &str = r"(?is)\[FORGE:\s*(.*?)\|\s*(.*?)\]";
const SHELL_TAG: &str = r"(?is)\[SHELL:\s*(.*?)\]";
const SKILL_TAG: &str = r"(?is)\[SKILL:\s*(.*?)\]";

fn first_capture(pattern: &str, text: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(text).map(|caps| caps[1].trim().to_string())
}

/// Extract the highest-priority directive from raw text, if any.
///
/// The whole text is searched, not just its start, and only one directive
/// is ever honored per dispatch. Forge outranks Shell outranks Skill: when
/// the text proposes both a persistent capability and a one-off command,
/// the persistent one wins.
pub fn parse_directive(text: &str) -> Option<ActionRequest> {
    if let Ok(re) = Regex::new(FORGE_TAG) {
        if let Some(caps) = re.captures(text) {
            return Some(ActionRequest::Forge {
                name: caps[1].trim().to_string(),
                source: caps[2].trim().to_string(),
            });
        }
    }

    if let Some(command) = first_capture(SHELL_TAG, text) {
        return Some(ActionRequest::Shell { command });
    }

    if let Some(name) = first_capture(SKILL_TAG, text) {
        return Some(ActionRequest::Invoke { name });
    }

    None
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Routes directives to the gates, store, loader, invoker, and executor.
///
/// Owns the skill registry behind a mutex. The forge path's write-then-
/// rescan sequence runs entirely inside one lock region, so concurrent
/// forges serialize and a half-written state is never observable.
pub struct ActionDispatcher {
    engine: Engine,
    registry: Mutex<SkillRegistry>,
    skills_root: PathBuf,
    shell_timeout: Duration,
}

impl ActionDispatcher {
    /// Build a dispatcher and perform the boot-time skill scan.
    pub fn new(config: &ForgeConfig) -> Self {
        let engine = Engine::new();
        let skills_root = PathBuf::from(resolve_path(&config.skills_dir));

        let mut registry = SkillRegistry::new();
        registry.replace_all(loader::load_all(&engine, &skills_root));
        info!(
            "Loaded {} skill(s) from {}",
            registry.len(),
            skills_root.display()
        );

        Self {
            engine,
            registry: Mutex::new(registry),
            skills_root,
            shell_timeout: Duration::from_secs(config.shell_timeout_secs),
        }
    }

    /// Interpret raw generated text: extract at most one directive, execute
    /// it, and return the outcome. Text without a directive yields an empty
    /// string.
    pub async fn dispatch(&self, text: &str) -> String {
        let request = match parse_directive(text) {
            Some(request) => request,
            None => return String::new(),
        };

        debug!("Extracted directive: {:?}", request);

        match request {
            ActionRequest::Forge { name, source } => self.handle_forge(&name, &source),
            ActionRequest::Shell { command } => self.handle_shell(&command).await,
            ActionRequest::Invoke { name } => self.handle_invoke(&name),
        }
    }

    /// Snapshot of the loaded skill set for the outer engine's prompts.
    pub fn skill_catalog(&self) -> Vec<SkillInfo> {
        self.registry.lock().unwrap().catalog()
    }

    /// Names of currently loaded skills, sorted.
    pub fn skill_names(&self) -> Vec<String> {
        self.registry.lock().unwrap().names()
    }

    // --- handlers ---

    fn handle_forge(&self, name: &str, source: &str) -> String {
        // Single-writer region: the file write and the registry rescan stay
        // under one lock so no reader sees the gap between them.
        let mut registry = self.registry.lock().unwrap();

        match store::save(&self.skills_root, name, source) {
            Ok(record) => {
                registry.replace_all(loader::load_all(&self.engine, &self.skills_root));
                info!(
                    "Forged skill '{}' ({} skill(s) now loaded)",
                    record.name,
                    registry.len()
                );
                format!("Skill '{}' has been forged and loaded.", record.name)
            }
            Err(e) => format!("Forge Error: {}", e),
        }
    }

    async fn handle_shell(&self, command: &str) -> String {
        match executor::execute(command, self.shell_timeout).await {
            Ok(output) => executor::compose_outcome(&output),
            Err(e) => e.to_string(),
        }
    }

    fn handle_invoke(&self, name: &str) -> String {
        // Clone the skill out under a short lock; a long-running invocation
        // must not block concurrent forges or catalog reads.
        let skill = self.registry.lock().unwrap().get(name).cloned();

        let result = match skill {
            Some(skill) => invoker::invoke_loaded(&self.engine, &skill),
            None => Err(ActionError::SkillNotFound(name.to_string())),
        };

        match result {
            Ok(value) => format!("Skill '{}' executed successfully.\nResult:\n{}", name, value),
            Err(e) => e.to_string(),
        }
    }
}
