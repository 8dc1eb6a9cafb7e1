//! Tunables for identity assignment and the annotation passes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::annotate::{PassName, matcher::DEFAULT_MIN_TERM_LENGTH};
use crate::parsing::blocks::BlockTag;

pub use crate::annotate::resolver::RepairPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Vocabulary names shorter than this many characters are never matched.
    pub min_term_length: usize,
    /// Block kinds that receive a persisted id after edits.
    pub id_block_kinds: Vec<BlockTag>,
    pub passes: PassToggles,
    pub repair_policy: RepairPolicy,
    /// Quiet period before a requested vocabulary refresh runs.
    pub refresh_debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_term_length: DEFAULT_MIN_TERM_LENGTH,
            id_block_kinds: BlockTag::ALL.to_vec(),
            passes: PassToggles::default(),
            repair_policy: RepairPolicy::default(),
            refresh_debounce_ms: 300,
        }
    }
}

impl Settings {
    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassToggles {
    pub mentions: bool,
    pub known_terms: bool,
    pub heuristic_terms: bool,
}

impl Default for PassToggles {
    fn default() -> Self {
        Self {
            mentions: true,
            known_terms: true,
            heuristic_terms: true,
        }
    }
}

impl PassToggles {
    pub fn is_enabled(&self, pass: PassName) -> bool {
        match pass {
            PassName::Mentions => self.mentions,
            PassName::KnownTerms => self.known_terms,
            PassName::HeuristicTerms => self.heuristic_terms,
        }
    }

    pub fn set(&mut self, pass: PassName, enabled: bool) {
        match pass {
            PassName::Mentions => self.mentions = enabled,
            PassName::KnownTerms => self.known_terms = enabled,
            PassName::HeuristicTerms => self.heuristic_terms = enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
min_term_length = 4
repair_policy = "nearest_to_original"

[passes]
heuristic_terms = false
"#,
        )
        .unwrap();

        assert_eq!(settings.min_term_length, 4);
        assert_eq!(settings.repair_policy, RepairPolicy::NearestToOriginal);
        assert!(settings.passes.mentions);
        assert!(!settings.passes.is_enabled(PassName::HeuristicTerms));
        assert_eq!(settings.id_block_kinds, BlockTag::ALL.to_vec());
        assert_eq!(settings.refresh_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn block_kinds_use_snake_case() {
        let settings: Settings = toml::from_str(r#"id_block_kinds = ["paragraph", "code"]"#).unwrap();
        assert_eq!(
            settings.id_block_kinds,
            vec![BlockTag::Paragraph, BlockTag::Code]
        );
    }

    #[test]
    fn toggles_round_trip_through_set() {
        let mut toggles = PassToggles::default();
        for pass in PassName::ALL {
            toggles.set(pass, false);
            assert!(!toggles.is_enabled(pass));
        }
    }
}
