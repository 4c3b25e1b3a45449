//! Skill and spell catalog loader.
//!
//! Actions are authored in RON as a list of [`ActionSpec`] entries. The
//! catalog resolves names case-insensitively and builds a fresh [`Action`]
//! carrying the entry's [`StandardHooks`] on every lookup.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use combat_core::{
    Action, ActionKind, ActionRegistry, DamageType, Dice, HookSpec, StandardHooks,
};

use super::{LoadResult, read_file};

const SKILLS_RON: &str = include_str!("../../data/actions/skills.ron");
const SPELLS_RON: &str = include_str!("../../data/actions/spells.ron");

fn default_modifier() -> f64 {
    1.0
}

/// One catalog entry as written in RON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActionSpec {
    pub name: String,
    pub kind: ActionKind,
    pub dice: Dice,
    pub damage_type: DamageType,
    #[serde(default = "default_modifier")]
    pub damage_modifier: f64,
    #[serde(default)]
    pub mana_cost: u32,
    /// Defaults to `true` for spells.
    #[serde(default)]
    pub invokable: Option<bool>,
    #[serde(default)]
    pub noun: Option<String>,
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub hooks: HookSpec,
}

impl ActionSpec {
    pub fn build(&self) -> Action {
        let mut action = Action::new(self.name.clone(), self.kind, self.damage_type)
            .with_dice(self.dice.count, self.dice.faces)
            .with_modifier(self.damage_modifier)
            .with_mana_cost(self.mana_cost)
            .with_hooks(Arc::new(StandardHooks::from(self.hooks.clone())));
        if let Some(invokable) = self.invokable {
            action = action.with_invokable(invokable);
        }
        if let Some(noun) = &self.noun {
            action = action.with_noun(noun.clone());
        }
        if let Some(skill) = &self.skill {
            action = action.with_skill(skill.clone());
        }
        action
    }
}

/// Name-indexed action catalog.
#[derive(Clone, Debug, Default)]
pub struct ActionBook {
    entries: BTreeMap<String, ActionSpec>,
}

impl ActionBook {
    /// Loads the catalog compiled into the crate.
    pub fn load() -> LoadResult<Self> {
        let mut book = Self::default();
        book.extend_from_ron(SKILLS_RON)
            .map_err(|e| anyhow::anyhow!("embedded skills catalog: {e}"))?;
        book.extend_from_ron(SPELLS_RON)
            .map_err(|e| anyhow::anyhow!("embedded spells catalog: {e}"))?;
        Ok(book)
    }

    /// Loads a catalog from a RON file on disk.
    pub fn load_from_file(path: &Path) -> LoadResult<Self> {
        let mut book = Self::default();
        book.extend_from_file(path)?;
        Ok(book)
    }

    /// Adds every entry of a RON file, replacing same-named entries.
    pub fn extend_from_file(&mut self, path: &Path) -> LoadResult<usize> {
        let content = read_file(path)?;
        self.extend_from_ron(&content)
            .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
    }

    /// Adds every entry of a RON document, replacing same-named entries.
    pub fn extend_from_ron(&mut self, content: &str) -> LoadResult<usize> {
        let specs: Vec<ActionSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse action catalog: {e}"))?;
        let count = specs.len();
        for spec in specs {
            self.insert(spec)?;
        }
        Ok(count)
    }

    pub fn insert(&mut self, spec: ActionSpec) -> LoadResult<()> {
        let key = spec.name.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(anyhow::anyhow!("action entry has an empty name"));
        }
        if spec.dice.count == 0 || spec.dice.faces == 0 {
            return Err(anyhow::anyhow!("action '{}' rolls no damage dice", spec.name));
        }
        if spec.kind == ActionKind::Spell && spec.hooks == HookSpec::Plain {
            return Err(anyhow::anyhow!("spell '{}' has plain hooks", spec.name));
        }
        self.entries.insert(key, spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ActionSpec> {
        self.entries.get(&name.trim().to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionSpec> {
        self.entries.values()
    }
}

impl ActionRegistry for ActionBook {
    fn resolve(&self, name: &str) -> Option<Action> {
        self.get(name).map(ActionSpec::build)
    }

    fn names(&self) -> Vec<String> {
        self.entries.values().map(|spec| spec.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{EffectKind, skills};
    use std::io::Write;

    #[test]
    fn embedded_catalog_loads() {
        let book = ActionBook::load().unwrap();
        assert!(!book.is_empty());
        for name in [skills::HAND_TO_HAND, "kick", "magic missile"] {
            assert!(book.get(name).is_some(), "missing {name}");
        }
        for name in [
            skills::DODGE,
            skills::PARRY,
            skills::EVASIVE_MANEUVERS,
            skills::SECOND_ATTACK,
            skills::CRITICAL_STRIKE,
        ] {
            assert!(book.resolve(name).is_none(), "{name} is not an action");
        }
    }

    #[test]
    fn resolve_builds_spell_with_defaults() {
        let book = ActionBook::load().unwrap();
        let missile = book.resolve("Magic Missile").unwrap();
        assert!(missile.is_spell());
        assert!(missile.invokable);
        assert_eq!(missile.damage_type, DamageType::Energy);
        assert!(missile.mana_cost > 0);
        assert_eq!(missile.skill_key(), "magic missile");
    }

    #[test]
    fn affliction_hooks_survive_parsing() {
        let book = ActionBook::load().unwrap();
        let blindness = book.get("blindness").unwrap();
        assert!(matches!(
            blindness.hooks,
            HookSpec::Affliction {
                effect: EffectKind::Blinded,
                ..
            }
        ));
    }

    #[test]
    fn file_entries_override_embedded_ones() {
        let mut book = ActionBook::load().unwrap();
        let before = book.len();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                (
                    name: "kick",
                    kind: Skill,
                    dice: (count: 3, faces: 10),
                    damage_type: Blunt,
                    invokable: Some(true),
                ),
                (
                    name: "headbutt",
                    kind: Skill,
                    dice: (count: 1, faces: 8),
                    damage_type: Blunt,
                    damage_modifier: 1.5,
                ),
            ]"#
        )
        .unwrap();

        assert_eq!(book.extend_from_file(file.path()).unwrap(), 2);
        assert_eq!(book.len(), before + 1);
        assert_eq!(book.resolve("kick").unwrap().dice, Dice::new(3, 10));
        let headbutt = book.resolve("headbutt").unwrap();
        assert_eq!(headbutt.damage_modifier, 1.5);
        assert!(!headbutt.invokable);
    }

    #[test]
    fn entries_without_damage_dice_are_rejected() {
        let result = ActionBook::default().extend_from_ron(
            r#"[(name: "dodge", kind: Skill, dice: (count: 0, faces: 0), damage_type: Blunt)]"#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("rolls no damage dice"));
    }

    #[test]
    fn spells_must_carry_spell_hooks() {
        let result = ActionBook::default().extend_from_ron(
            r#"[(name: "fizzle", kind: Spell, dice: (count: 1, faces: 4), damage_type: Energy)]"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ActionBook::load_from_file(Path::new("/nonexistent/actions.ron")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
