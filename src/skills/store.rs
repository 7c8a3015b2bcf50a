//! Skill Store
//!
//! Persists validated skill sources under the storage root, one flat
//! `<name>.rhai` file per skill. Re-forging a name overwrites the previous
//! file; there is no version history.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::gates::forge::vet_skill;
use crate::types::{ActionError, SkillRecord};

/// File extension for stored skill sources.
pub const SKILL_EXTENSION: &str = "rhai";

/// Validate and persist a skill.
///
/// The Forge Gate runs first; on rejection the storage root is untouched.
/// On pass the root is created on demand and the source written verbatim.
pub fn save(skills_root: &Path, name: &str, source: &str) -> Result<SkillRecord, ActionError> {
    vet_skill(name, source).into_result()?;

    fs::create_dir_all(skills_root).map_err(|e| ActionError::StorageWrite {
        name: name.to_string(),
        source: e,
    })?;

    let path = skills_root.join(format!("{}.{}", name, SKILL_EXTENSION));

    fs::write(&path, source).map_err(|e| ActionError::StorageWrite {
        name: name.to_string(),
        source: e,
    })?;

    info!("Saved skill '{}' to {}", name, path.display());

    Ok(SkillRecord {
        name: name.to_string(),
        source_text: source.to_string(),
        storage_path: path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_writes_source_verbatim() {
        let dir = tempdir().unwrap();
        let source = "fn greet() { \"hi\" }";

        let record = save(dir.path(), "greet", source).unwrap();

        assert_eq!(record.name, "greet");
        assert_eq!(record.storage_path, dir.path().join("greet.rhai"));
        assert_eq!(fs::read_to_string(&record.storage_path).unwrap(), source);
    }

    #[test]
    fn test_save_creates_missing_root() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("skills");

        save(&nested, "tool", "fn run() { 1 }").unwrap();

        assert!(nested.join("tool.rhai").exists());
    }

    #[test]
    fn test_save_overwrites_previous_version() {
        let dir = tempdir().unwrap();

        save(dir.path(), "tool", "fn run() { 1 }").unwrap();
        save(dir.path(), "tool", "fn run() { 2 }").unwrap();

        let content = fs::read_to_string(dir.path().join("tool.rhai")).unwrap();
        assert_eq!(content, "fn run() { 2 }");
    }

    #[test]
    fn test_rejected_skill_leaves_storage_untouched() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("skills");

        let err = save(&nested, "bad", "import \"os\" as os;").unwrap_err();

        assert!(matches!(err, ActionError::ForbiddenImport(_)));
        // Rejection happens before any filesystem access.
        assert!(!nested.exists());
    }

    #[test]
    fn test_traversal_name_rejected_before_io() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("skills");

        let err = save(&nested, "../etc/passwd", "fn run() { 1 }").unwrap_err();

        assert!(matches!(err, ActionError::InvalidIdentifier(_)));
        assert!(!nested.exists());
    }

    #[test]
    fn test_repeat_rejection_is_identical() {
        let dir = tempdir().unwrap();
        let source = "import \"os\" as os;";

        let first = save(dir.path(), "bad", source).unwrap_err();
        let second = save(dir.path(), "bad", source).unwrap_err();

        assert_eq!(first.to_string(), second.to_string());
        assert!(!dir.path().join("bad.rhai").exists());
    }

    #[test]
    fn test_unwritable_root_reports_storage_error() {
        let dir = tempdir().unwrap();
        // Occupy the root path with a plain file so create_dir_all fails.
        let blocker = dir.path().join("occupied");
        fs::write(&blocker, "x").unwrap();

        let err = save(&blocker, "tool", "fn run() { 1 }").unwrap_err();

        assert!(matches!(err, ActionError::StorageWrite { .. }));
    }
}
