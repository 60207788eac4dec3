use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Skill set every account carries. Skill entries outside this list do not
/// survive normalization.
pub const SKILL_NAMES: [&str; 4] = ["Võitlus", "Kogumine", "Meisterlikkus", "Maagia"];

pub const DEFAULT_SKILL_LEVEL: i32 = 1;

/// Gameplay state attached to a session user and persisted for members.
///
/// Always handed around by value (`Clone` is a deep copy), so the session's
/// live copy and the stored copy never alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub skills: BTreeMap<String, i32>,
    pub gold: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_training: Option<OffsetDateTime>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            skills: SKILL_NAMES
                .iter()
                .map(|name| (name.to_string(), DEFAULT_SKILL_LEVEL))
                .collect(),
            gold: 0,
            last_training: None,
        }
    }
}

impl Progress {
    /// Maps the carried skill levels onto the full default skill set: unknown
    /// skills are dropped, missing skills default to level 1, gold never goes
    /// below zero. Every store write passes through here so a partial mapping
    /// can never drop a skill row.
    pub fn normalized(&self) -> Progress {
        let skills = SKILL_NAMES
            .iter()
            .map(|name| {
                let level = self
                    .skills
                    .get(*name)
                    .copied()
                    .unwrap_or(DEFAULT_SKILL_LEVEL);
                (name.to_string(), level)
            })
            .collect();
        Progress {
            skills,
            gold: self.gold.max(0),
            last_training: self.last_training,
        }
    }

    pub fn skill(&self, name: &str) -> Option<i32> {
        self.skills.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_every_skill_at_level_one() {
        let progress = Progress::default();
        assert_eq!(progress.skills.len(), SKILL_NAMES.len());
        for name in SKILL_NAMES {
            assert_eq!(progress.skill(name), Some(1));
        }
        assert_eq!(progress.gold, 0);
        assert!(progress.last_training.is_none());
    }

    #[test]
    fn normalized_drops_unknown_skills() {
        let mut progress = Progress::default();
        progress.skills.insert("Kalapüük".to_string(), 7);
        let normalized = progress.normalized();
        assert!(normalized.skill("Kalapüük").is_none());
        assert_eq!(normalized.skills.len(), SKILL_NAMES.len());
    }

    #[test]
    fn normalized_fills_missing_skills_and_keeps_known_levels() {
        let mut progress = Progress::default();
        progress.skills.remove("Maagia");
        progress.skills.insert("Võitlus".to_string(), 9);
        let normalized = progress.normalized();
        assert_eq!(normalized.skill("Maagia"), Some(1));
        assert_eq!(normalized.skill("Võitlus"), Some(9));
    }

    #[test]
    fn normalized_clamps_negative_gold() {
        let progress = Progress {
            gold: -50,
            ..Progress::default()
        };
        assert_eq!(progress.normalized().gold, 0);
    }
}
