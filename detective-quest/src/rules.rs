use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_FALLBACK: &str = "Desconhecido";

/// Clue text containing `pattern` points at `suspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueRule {
    pub pattern: String,
    pub suspect: String,
}

impl ClueRule {
    pub fn new(pattern: &str, suspect: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            suspect: suspect.to_string(),
        }
    }
}

/// Ordered substring rules mapping a clue to a suspect; first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueRules {
    rules: Vec<ClueRule>,
    fallback: String,
}

impl Default for ClueRules {
    fn default() -> Self {
        Self {
            rules: vec![
                ClueRule::new("Relógio", "Mordomo"),
                ClueRule::new("Óculos", "Bibliotecário"),
                ClueRule::new("Luva", "Jardineiro"),
                ClueRule::new("Carta", "Mordomo"),
            ],
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }
}

impl ClueRules {
    /// An empty pattern would match every clue, so it is rejected.
    pub fn new(rules: Vec<ClueRule>, fallback: &str) -> Result<Self, ConfigError> {
        if let Some(index) = rules.iter().position(|rule| rule.pattern.is_empty()) {
            return Err(ConfigError::EmptyPattern { index });
        }
        Ok(Self {
            rules,
            fallback: fallback.to_string(),
        })
    }

    pub fn with_fallback(mut self, fallback: &str) -> Self {
        self.fallback = fallback.to_string();
        self
    }

    /// Case-sensitive substring match, rules tried in order.
    pub fn suspect_for(&self, clue: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| clue.contains(rule.pattern.as_str()))
            .map_or(self.fallback.as_str(), |rule| rule.suspect.as_str())
    }

    pub fn rules(&self) -> &[ClueRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}
