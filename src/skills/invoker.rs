//! Skill Invoker
//!
//! Resolves a named skill's entry point and calls it with no arguments.
//! Runtime failures inside the skill surface as errors to the caller; one
//! misbehaving skill never takes the process down.

use rhai::{Dynamic, Engine, Scope};
use tracing::debug;

use crate::skills::registry::SkillRegistry;
use crate::types::{ActionError, LoadedSkill};

/// Entry-point names tried after the skill's own name, in order.
const FALLBACK_ENTRY_POINTS: &[&str] = &["run", "main"];

/// Pick the entry point: a function named exactly like the skill wins,
/// then `run`, then `main`.
fn resolve_entry_point<'a>(entry_points: &'a [String], skill_name: &'a str) -> Option<&'a str> {
    if entry_points.iter().any(|f| f.as_str() == skill_name) {
        return Some(skill_name);
    }

    FALLBACK_ENTRY_POINTS
        .iter()
        .copied()
        .find(|candidate| entry_points.iter().any(|f| f.as_str() == *candidate))
}

/// Render a skill's return value for the outcome text. Unit renders as
/// `()` rather than an empty string so "ran and returned nothing" stays
/// distinguishable from a blank result.
fn render_value(value: &Dynamic) -> String {
    if value.is_unit() {
        "()".to_string()
    } else {
        value.to_string()
    }
}

/// Invoke a skill by name with no arguments and stringify its result.
pub fn invoke(
    engine: &Engine,
    registry: &SkillRegistry,
    name: &str,
) -> Result<String, ActionError> {
    let skill = registry
        .get(name)
        .ok_or_else(|| ActionError::SkillNotFound(name.to_string()))?;

    invoke_loaded(engine, skill)
}

/// Call an already-resolved skill.
///
/// Separate from [`invoke`] so a caller holding a locked registry can clone
/// the skill out and release the lock before the call runs.
pub fn invoke_loaded(engine: &Engine, skill: &LoadedSkill) -> Result<String, ActionError> {
    let entry = resolve_entry_point(&skill.entry_points, &skill.name)
        .ok_or_else(|| ActionError::EntryPointMissing(skill.name.clone()))?;

    debug!("Invoking skill '{}' via entry point '{}'", skill.name, entry);

    let mut scope = Scope::new();
    match engine.call_fn::<Dynamic>(&mut scope, &skill.ast, entry, ()) {
        Ok(value) => Ok(render_value(&value)),
        Err(e) => Err(ActionError::InvocationFailure {
            name: skill.name.clone(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(engine: &Engine, name: &str, source: &str) -> LoadedSkill {
        let ast = engine.compile(source).unwrap();
        let mut entry_points: Vec<String> =
            ast.iter_functions().map(|f| f.name.to_string()).collect();
        entry_points.sort();

        LoadedSkill {
            name: name.to_string(),
            entry_points,
            ast,
        }
    }

    fn registry_with(engine: &Engine, name: &str, source: &str) -> SkillRegistry {
        let mut registry = SkillRegistry::new();
        registry.replace_all(vec![loaded(engine, name, source)]);
        registry
    }

    #[test]
    fn test_invoke_returns_stringified_result() {
        let engine = Engine::new();
        let registry = registry_with(&engine, "greet", "fn greet() { \"hi\" }");

        let result = invoke(&engine, &registry, "greet").unwrap();
        assert_eq!(result, "hi");
    }

    #[test]
    fn test_invoke_loaded_needs_no_registry() {
        let engine = Engine::new();
        let skill = loaded(&engine, "direct", "fn run() { \"direct\" }");

        assert_eq!(invoke_loaded(&engine, &skill).unwrap(), "direct");
    }

    #[test]
    fn test_exact_name_beats_run() {
        let engine = Engine::new();
        let source = "fn tool() { \"exact\" }\nfn run() { \"fallback\" }";
        let registry = registry_with(&engine, "tool", source);

        assert_eq!(invoke(&engine, &registry, "tool").unwrap(), "exact");
    }

    #[test]
    fn test_run_beats_main() {
        let engine = Engine::new();
        let source = "fn run() { \"from_run\" }\nfn main() { \"from_main\" }";
        let registry = registry_with(&engine, "task", source);

        assert_eq!(invoke(&engine, &registry, "task").unwrap(), "from_run");
    }

    #[test]
    fn test_main_is_last_resort() {
        let engine = Engine::new();
        let registry = registry_with(&engine, "task", "fn main() { 42 }");

        assert_eq!(invoke(&engine, &registry, "task").unwrap(), "42");
    }

    #[test]
    fn test_unit_result_renders_as_parens() {
        let engine = Engine::new();
        let registry = registry_with(&engine, "quiet", "fn run() { }");

        assert_eq!(invoke(&engine, &registry, "quiet").unwrap(), "()");
    }

    #[test]
    fn test_unknown_skill_is_an_error_not_a_panic() {
        let engine = Engine::new();
        let registry = SkillRegistry::new();

        let err = invoke(&engine, &registry, "ghost").unwrap_err();
        assert_eq!(err.to_string(), "Skill 'ghost' not found.");
    }

    #[test]
    fn test_no_entry_point_reported() {
        let engine = Engine::new();
        let registry = registry_with(&engine, "other", "fn helper_only() { 1 }");

        let err = invoke(&engine, &registry, "other").unwrap_err();
        assert!(matches!(err, ActionError::EntryPointMissing(_)));
    }

    #[test]
    fn test_runtime_failure_is_contained() {
        let engine = Engine::new();
        let registry = registry_with(&engine, "boom", "fn run() { throw \"kaboom\" }");

        let err = invoke(&engine, &registry, "boom").unwrap_err();
        match err {
            ActionError::InvocationFailure { name, message } => {
                assert_eq!(name, "boom");
                assert!(message.contains("kaboom"));
            }
            other => panic!("expected InvocationFailure, got {:?}", other),
        }
    }
}
