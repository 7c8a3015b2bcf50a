//! Skill Loader
//!
//! Discovers `.rhai` skill files under the storage root and compiles each
//! one in isolation. A failure in any single file is logged and skipped; it
//! never aborts the scan.

use std::fs;
use std::path::Path;

use rhai::Engine;
use tracing::{debug, warn};

use crate::gates::forge::is_bare_identifier;
use crate::skills::store::SKILL_EXTENSION;
use crate::types::LoadedSkill;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Scan `skills_root` and return every successfully compiled skill.
///
/// Called once at boot and again after each successful forge. The result is
/// a full snapshot: callers replace their registry contents with it rather
/// than merging. A missing or unreadable root yields an empty set.
pub fn load_all(engine: &Engine, skills_root: &Path) -> Vec<LoadedSkill> {
    if !skills_root.is_dir() {
        return Vec::new();
    }

    let entries = match fs::read_dir(skills_root) {
        Ok(e) => e,
        Err(e) => {
            warn!(
                "Cannot read skills directory {}: {}",
                skills_root.display(),
                e
            );
            return Vec::new();
        }
    };

    let mut skills: Vec<LoadedSkill> = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != SKILL_EXTENSION {
            continue;
        }

        // The file stem is the skill name; anything that is not a bare
        // identifier was not written by the store and is ignored.
        let name = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if is_bare_identifier(stem) => stem.to_string(),
            _ => {
                warn!("Skipping skill file with invalid name: {}", path.display());
                continue;
            }
        };

        let source = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                warn!("Cannot read skill file {}: {}", path.display(), e);
                continue;
            }
        };

        let ast = match engine.compile(&source) {
            Ok(ast) => ast,
            Err(e) => {
                warn!("Skipping skill '{}': {}", name, e);
                continue;
            }
        };

        let mut entry_points: Vec<String> = ast
            .iter_functions()
            .map(|f| f.name.to_string())
            .collect();
        entry_points.sort();
        entry_points.dedup();

        debug!(
            "Loaded skill '{}' with {} function(s)",
            name,
            entry_points.len()
        );

        skills.push(LoadedSkill {
            name,
            entry_points,
            ast,
        });
    }

    skills
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_skill(root: &Path, name: &str, source: &str) {
        fs::write(root.join(format!("{}.rhai", name)), source).unwrap();
    }

    #[test]
    fn test_missing_root_yields_empty_set() {
        let dir = tempdir().unwrap();
        let skills = load_all(&Engine::new(), &dir.path().join("nowhere"));
        assert!(skills.is_empty());
    }

    #[test]
    fn test_loads_valid_skills_with_entry_points() {
        let dir = tempdir().unwrap();
        write_skill(dir.path(), "greet", "fn greet() { \"hi\" }\nfn run() { 2 }");

        let skills = load_all(&Engine::new(), dir.path());

        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "greet");
        assert_eq!(skills[0].entry_points, vec!["greet", "run"]);
    }

    #[test]
    fn test_broken_file_does_not_abort_scan() {
        let dir = tempdir().unwrap();
        write_skill(dir.path(), "good", "fn run() { 1 }");
        write_skill(dir.path(), "broken", "fn run( {");

        let skills = load_all(&Engine::new(), dir.path());

        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "good");
    }

    #[test]
    fn test_ignores_foreign_extensions_and_names() {
        let dir = tempdir().unwrap();
        write_skill(dir.path(), "good", "fn run() { 1 }");
        fs::write(dir.path().join("notes.txt"), "not a skill").unwrap();
        fs::write(dir.path().join("bad-name.rhai"), "fn run() { 1 }").unwrap();

        let skills = load_all(&Engine::new(), dir.path());

        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "good");
    }

    #[test]
    fn test_skill_without_functions_loads_with_empty_entry_points() {
        let dir = tempdir().unwrap();
        write_skill(dir.path(), "bare", "let x = 1;");

        let skills = load_all(&Engine::new(), dir.path());

        assert_eq!(skills.len(), 1);
        assert!(skills[0].entry_points.is_empty());
    }
}
