//! Skill Registry
//!
//! The live name-to-compiled-skill mapping. Process-lifetime state, mutated
//! only on boot and immediately after a successful forge; every mutation is
//! a total replacement, never an incremental merge.

use std::collections::HashMap;

use crate::types::{LoadedSkill, SkillInfo};

/// In-memory set of invocable skills. The dispatcher owns one behind a
/// mutex; nothing else mutates it.
#[derive(Debug, Default)]
pub struct SkillRegistry {
    skills: HashMap<String, LoadedSkill>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self {
            skills: HashMap::new(),
        }
    }

    /// Full rebuild: afterwards the registry reflects exactly `loaded`.
    pub fn replace_all(&mut self, loaded: Vec<LoadedSkill>) {
        self.skills = loaded
            .into_iter()
            .map(|skill| (skill.name.clone(), skill))
            .collect();
    }

    pub fn get(&self, name: &str) -> Option<&LoadedSkill> {
        self.skills.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Skill names, sorted for stable output.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.skills.keys().cloned().collect();
        names.sort();
        names
    }

    /// Serializable snapshot of the loaded set, sorted by name.
    pub fn catalog(&self) -> Vec<SkillInfo> {
        let mut infos: Vec<SkillInfo> = self
            .skills
            .values()
            .map(|skill| SkillInfo {
                name: skill.name.clone(),
                entry_points: skill.entry_points.clone(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }
}
