//! Team roster configuration loaded from TOML.
//!
//! ```toml
//! [[teams]]
//! name = "Tigers"
//! piece_count = 3
//!
//! [[teams]]
//! id = "red"
//!
//! [rules]
//! bonus_throw = true
//! ```
//!
//! Fields left out of a `[[teams]]` entry come from the built-in preset for
//! that roster slot.

use crate::types::{Rules, TeamConfig, TeamId};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// One `[[teams]]` entry; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TeamEntry {
    /// Team identifier.
    #[serde(default)]
    id: Option<String>,
    /// Display name.
    #[serde(default)]
    name: Option<String>,
    /// Number of pieces.
    #[serde(default)]
    piece_count: Option<u8>,
    /// Primary color.
    #[serde(default)]
    color: Option<String>,
    /// Light color.
    #[serde(default)]
    color_light: Option<String>,
    /// Emoji glyph.
    #[serde(default)]
    emoji: Option<String>,
}

impl TeamEntry {
    /// Resolves the entry against the preset for roster `slot`.
    fn resolve(&self, slot: usize) -> Result<TeamConfig, ConfigError> {
        let base = match (TeamConfig::preset(slot), &self.id) {
            (Some(preset), _) => preset,
            (None, Some(id)) => TeamConfig::new(
                TeamId::new(id.clone()),
                id.clone(),
                crate::types::DEFAULT_PIECE_COUNT,
                String::new(),
                String::new(),
                String::new(),
            ),
            (None, None) => {
                return Err(ConfigError::new(format!(
                    "Team #{} has no preset; give it an id",
                    slot + 1
                )));
            }
        };

        Ok(TeamConfig::new(
            self.id.clone().map(TeamId::new).unwrap_or_else(|| base.id().clone()),
            self.name.clone().unwrap_or_else(|| base.name().clone()),
            self.piece_count.unwrap_or(*base.piece_count()),
            self.color.clone().unwrap_or_else(|| base.color().clone()),
            self.color_light.clone().unwrap_or_else(|| base.color_light().clone()),
            self.emoji.clone().unwrap_or_else(|| base.emoji().clone()),
        ))
    }
}

/// A roster file: teams in turn order plus rule switches.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Team entries in turn order.
    #[serde(default)]
    teams: Vec<TeamEntry>,
    /// Rule switches.
    #[serde(default)]
    rules: Rules,
}

impl Default for RosterConfig {
    /// Two preset teams (청팀, 홍팀) with four pieces each.
    fn default() -> Self {
        Self {
            teams: vec![TeamEntry::default(), TeamEntry::default()],
            rules: Rules::default(),
        }
    }
}

impl RosterConfig {
    /// Loads a roster from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading roster from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read roster file: {}", e)))?;
        let config = Self::parse(&content)?;
        info!(teams = config.teams.len(), "Roster loaded");
        Ok(config)
    }

    /// Parses a roster from TOML text.
    #[instrument(skip(content))]
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse roster: {}", e)))
    }

    /// Roster of `count` preset teams with `piece_count` pieces each.
    pub fn presets(count: usize, piece_count: u8) -> Self {
        let entry = TeamEntry {
            piece_count: Some(piece_count),
            ..TeamEntry::default()
        };
        Self {
            teams: vec![entry; count],
            rules: Rules::default(),
        }
    }

    /// Same roster with different rules.
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Team configurations with presets filled in.
    ///
    /// Roster-level checks (team count, duplicate ids, piece range) are left
    /// to [`crate::initialize`].
    pub fn team_configs(&self) -> Result<Vec<TeamConfig>, ConfigError> {
        self.teams
            .iter()
            .enumerate()
            .map(|(slot, entry)| entry.resolve(slot))
            .collect()
    }
}

/// Roster configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_classic_two_team_game() {
        let teams = RosterConfig::default().team_configs().unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].name(), "청팀");
        assert_eq!(teams[1].name(), "홍팀");
        assert!(teams.iter().all(|t| *t.piece_count() == 4));
    }

    #[test]
    fn test_partial_entries_fill_from_presets() {
        let config = RosterConfig::parse(
            r#"
            [[teams]]
            name = "Tigers"
            piece_count = 3

            [[teams]]
            id = "crimson"
            emoji = "🐉"

            [rules]
            bonus_throw = true
            "#,
        )
        .unwrap();

        let teams = config.team_configs().unwrap();
        assert_eq!(teams[0].id().as_str(), "blue");
        assert_eq!(teams[0].name(), "Tigers");
        assert_eq!(*teams[0].piece_count(), 3);
        assert_eq!(teams[1].id().as_str(), "crimson");
        assert_eq!(teams[1].name(), "홍팀");
        assert_eq!(teams[1].display_name(), "🐉 홍팀");
        assert!(config.rules().bonus_throw);
    }

    #[test]
    fn test_fifth_team_needs_id() {
        let err = RosterConfig::presets(5, 2).team_configs().unwrap_err();
        assert!(err.message.contains("#5"));
    }

    #[test]
    fn test_bad_toml_is_reported() {
        let err = RosterConfig::parse("[[teams]\nname = ").unwrap_err();
        assert!(err.message.starts_with("Failed to parse roster"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[teams]]\n[[teams]]\n[[teams]]\npiece_count = 1").unwrap();

        let teams = RosterConfig::from_file(file.path()).unwrap().team_configs().unwrap();
        assert_eq!(teams.len(), 3);
        assert_eq!(teams[2].id().as_str(), "green");
        assert_eq!(*teams[2].piece_count(), 1);

        assert!(RosterConfig::from_file("/nonexistent/roster.toml").is_err());
    }
}
