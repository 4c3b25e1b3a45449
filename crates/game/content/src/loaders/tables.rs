//! Combat tables loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

const COMBAT_TOML: &str = include_str!("../../data/combat.toml");

/// Loader for [`CombatConfig`] from TOML files.
pub struct TablesLoader;

impl TablesLoader {
    /// Load combat tables from a TOML file.
    ///
    /// Keys missing from the file keep their built-in defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
    }

    /// The tables shipped with the crate.
    pub fn embedded() -> LoadResult<CombatConfig> {
        Self::parse(COMBAT_TOML)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combat tables TOML: {}", e))?;
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &CombatConfig) -> LoadResult<()> {
    let exp = &config.experience;
    if exp.max_low > exp.max_high {
        return Err(anyhow::anyhow!(
            "experience.max_low ({}) exceeds experience.max_high ({})",
            exp.max_low,
            exp.max_high
        ));
    }
    if config.levels.max_level == 0 {
        return Err(anyhow::anyhow!("levels.max_level must be at least 1"));
    }
    if config.constitution_loss_interval == 0 {
        return Err(anyhow::anyhow!("constitution_loss_interval must be at least 1"));
    }
    for (name, chance) in [
        ("critical_chance", config.critical_chance),
        ("hint_chance", config.hint_chance),
        ("bonus_armor_chance", config.bonus_armor_chance),
        ("npc_default_proficiency", config.npc_default_proficiency),
    ] {
        if chance > 100 {
            return Err(anyhow::anyhow!("{name} is a percentage, got {chance}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_tables_match_defaults() {
        assert_eq!(TablesLoader::embedded().unwrap(), CombatConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "critical_chance = 10").unwrap();
        writeln!(file, "[levels]").unwrap();
        writeln!(file, "max_level = 60").unwrap();

        let config = TablesLoader::load(file.path()).unwrap();
        assert_eq!(config.critical_chance, 10);
        assert_eq!(config.levels.max_level, 60);
        assert_eq!(config.levels.threshold_base, 1000);
        assert_eq!(config.haggle_cap, 25);
    }

    #[test]
    fn inverted_experience_bounds_are_rejected() {
        let err = TablesLoader::parse("[experience]\nmax_low = 2000\nmax_high = 1000\n")
            .unwrap_err();
        assert!(err.to_string().contains("max_low"));
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(TablesLoader::parse("critical_chance = \"often\"").is_err());
    }
}
