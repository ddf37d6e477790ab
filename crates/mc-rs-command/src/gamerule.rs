//! Gamerule registry: the closed sets of recognized rules and their
//! vanilla (Java Edition) defaults.
//!
//! The recognized-rule sets and the default maps are kept as separate
//! tables. A rule may be settable without having a known default, in which
//! case it cannot be reset.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use thiserror::Error;

use crate::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("gamerule {0:?} is not a known boolean rule")]
    UnknownBoolRule(String),

    #[error("gamerule {0:?} is not a known integer rule")]
    UnknownIntRule(String),

    #[error("no known default for gamerule {0:?}; cannot reset")]
    NoKnownDefault(String),

    #[error("gamerule {0:?} is registered as both boolean and integer")]
    Conflicting(String),
}

impl RuleError {
    /// True for the errors raised when a rule name is not in the registry.
    pub fn is_unknown_rule(&self) -> bool {
        !matches!(self, RuleError::Conflicting(_))
    }
}

/// A typed gamerule value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleValue {
    Bool(bool),
    Int(i32),
}

impl RuleValue {
    /// Parse declared text: a base-10 integer first, then `true`/`false`
    /// in any case.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let text = text.trim();
        if let Ok(i) = text.parse::<i32>() {
            return Ok(RuleValue::Int(i));
        }
        match text.to_ascii_lowercase().as_str() {
            "true" => Ok(RuleValue::Bool(true)),
            "false" => Ok(RuleValue::Bool(false)),
            _ => Err(ValidationError::RuleValue(text.to_string())),
        }
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Bool(b) => write!(f, "{b}"),
            RuleValue::Int(i) => write!(f, "{i}"),
        }
    }
}

/// Recognized rules and defaults, immutable after construction.
#[derive(Debug)]
pub struct RuleRegistry {
    bool_rules: HashSet<String>,
    int_rules: HashSet<String>,
    bool_defaults: HashMap<String, bool>,
    int_defaults: HashMap<String, i32>,
}

static VANILLA: OnceLock<RuleRegistry> = OnceLock::new();

impl RuleRegistry {
    /// Build a registry from explicit tables.
    ///
    /// Fails if a name appears in both the boolean and integer sets.
    pub fn new(
        bool_rules: &[&str],
        int_rules: &[&str],
        bool_defaults: &[(&str, bool)],
        int_defaults: &[(&str, i32)],
    ) -> Result<Self, RuleError> {
        if let Some(dup) = bool_rules.iter().find(|r| int_rules.contains(r)) {
            return Err(RuleError::Conflicting(dup.to_string()));
        }
        Ok(Self::build(bool_rules, int_rules, bool_defaults, int_defaults))
    }

    /// The shared vanilla registry, built on first use.
    pub fn vanilla() -> &'static RuleRegistry {
        VANILLA.get_or_init(|| Self::build(BOOL_RULES, INT_RULES, BOOL_DEFAULTS, INT_DEFAULTS))
    }

    fn build(
        bool_rules: &[&str],
        int_rules: &[&str],
        bool_defaults: &[(&str, bool)],
        int_defaults: &[(&str, i32)],
    ) -> Self {
        Self {
            bool_rules: bool_rules.iter().map(|r| r.to_string()).collect(),
            int_rules: int_rules.iter().map(|r| r.to_string()).collect(),
            bool_defaults: bool_defaults
                .iter()
                .map(|(r, v)| (r.to_string(), *v))
                .collect(),
            int_defaults: int_defaults
                .iter()
                .map(|(r, v)| (r.to_string(), *v))
                .collect(),
        }
    }

    pub fn is_bool_rule(&self, name: &str) -> bool {
        self.bool_rules.contains(name.trim())
    }

    pub fn is_int_rule(&self, name: &str) -> bool {
        self.int_rules.contains(name.trim())
    }

    /// Command setting a boolean rule.
    pub fn set_bool(&self, name: &str, value: bool) -> Result<String, RuleError> {
        let name = name.trim();
        if !self.is_bool_rule(name) {
            return Err(RuleError::UnknownBoolRule(name.to_string()));
        }
        Ok(format!("gamerule {name} {value}"))
    }

    /// Command setting an integer rule.
    pub fn set_int(&self, name: &str, value: i32) -> Result<String, RuleError> {
        let name = name.trim();
        if !self.is_int_rule(name) {
            return Err(RuleError::UnknownIntRule(name.to_string()));
        }
        Ok(format!("gamerule {name} {value}"))
    }

    /// Command setting a rule to a typed value.
    pub fn set(&self, name: &str, value: RuleValue) -> Result<String, RuleError> {
        match value {
            RuleValue::Bool(b) => self.set_bool(name, b),
            RuleValue::Int(i) => self.set_int(name, i),
        }
    }

    /// The registered vanilla default for `name`, if any.
    pub fn default_value(&self, name: &str) -> Option<RuleValue> {
        let name = name.trim();
        if let Some(b) = self.bool_defaults.get(name) {
            return Some(RuleValue::Bool(*b));
        }
        self.int_defaults.get(name).map(|i| RuleValue::Int(*i))
    }

    /// Command restoring `name` to its registered default.
    pub fn reset_to_default(&self, name: &str) -> Result<String, RuleError> {
        match self.default_value(name) {
            Some(value) => self.set(name, value),
            None => Err(RuleError::NoKnownDefault(name.trim().to_string())),
        }
    }

    /// Query form of the gamerule command.
    pub fn query(&self, name: &str) -> String {
        format!("gamerule {}", name.trim())
    }

    /// Extract the rule value from a query reply.
    ///
    /// Servers may wrap the value in prose, so tokens are scanned from the
    /// end for a boolean or an integer. If none is found the trimmed reply
    /// is returned unchanged.
    pub fn parse_reply(reply: &str) -> String {
        let line = reply.trim();
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() == 1 {
            return fields[0].to_string();
        }
        for field in fields.iter().rev() {
            let lower = field.to_ascii_lowercase();
            if lower == "true" || lower == "false" {
                return lower;
            }
            if field.parse::<i64>().is_ok() {
                return field.to_string();
            }
        }
        line.to_string()
    }
}

// ---------------------------------------------------------------------------
// Known rules & defaults (Java Edition)
// ---------------------------------------------------------------------------

static BOOL_RULES: &[&str] = &[
    "announceAdvancements",
    "disableElytraMovementCheck",
    "disablePlayerMovementCheck",
    "disableRaids",
    "doDaylightCycle",
    "doEntityDrops",
    "doFireTick",
    "doInsomnia",
    "doImmediateRespawn",
    "doLimitedCrafting",
    "doMobLoot",
    "doMobSpawning",
    "doPatrolSpawning",
    "doTileDrops",
    "doTraderSpawning",
    "doVinesSpread",
    "doWeatherCycle",
    "doWardenSpawning",
    "drowningDamage",
    "fallDamage",
    "fireDamage",
    "forgiveDeadPlayers",
    "keepInventory",
    "logAdminCommands",
    "mobGriefing",
    "naturalRegeneration",
    "reducedDebugInfo",
    "sendCommandFeedback",
    "showDeathMessages",
    "spectatorsGenerateChunks",
    "universalAnger",
];

static INT_RULES: &[&str] = &[
    "maxCommandChainLength",
    "maxEntityCramming",
    "playersSleepingPercentage",
    "randomTickSpeed",
    "spawnRadius",
];

static BOOL_DEFAULTS: &[(&str, bool)] = &[
    ("announceAdvancements", true),
    ("disableElytraMovementCheck", false),
    ("disablePlayerMovementCheck", false),
    ("disableRaids", false),
    ("doDaylightCycle", true),
    ("doEntityDrops", true),
    ("doFireTick", true),
    ("doInsomnia", true),
    ("doImmediateRespawn", false),
    ("doLimitedCrafting", false),
    ("doMobLoot", true),
    ("doMobSpawning", true),
    ("doPatrolSpawning", true),
    ("doTileDrops", true),
    ("doTraderSpawning", true),
    ("doVinesSpread", true),
    ("doWeatherCycle", true),
    ("doWardenSpawning", true),
    ("drowningDamage", true),
    ("fallDamage", true),
    ("fireDamage", true),
    ("forgiveDeadPlayers", true),
    ("keepInventory", false),
    ("logAdminCommands", true),
    ("mobGriefing", true),
    ("naturalRegeneration", true),
    ("reducedDebugInfo", false),
    ("sendCommandFeedback", true),
    ("showDeathMessages", true),
    ("spectatorsGenerateChunks", true),
    ("universalAnger", false),
];

static INT_DEFAULTS: &[(&str, i32)] = &[
    ("maxCommandChainLength", 65536),
    ("maxEntityCramming", 24),
    ("playersSleepingPercentage", 100),
    ("randomTickSpeed", 3),
    ("spawnRadius", 5),
];

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanilla_sets_are_disjoint() {
        for rule in BOOL_RULES {
            assert!(!INT_RULES.contains(rule), "{rule} is in both sets");
        }
        assert!(RuleRegistry::new(BOOL_RULES, INT_RULES, BOOL_DEFAULTS, INT_DEFAULTS).is_ok());
    }

    #[test]
    fn membership() {
        let reg = RuleRegistry::vanilla();
        assert!(reg.is_bool_rule("keepInventory"));
        assert!(!reg.is_int_rule("keepInventory"));
        assert!(reg.is_int_rule("randomTickSpeed"));
        assert!(!reg.is_bool_rule("randomTickSpeed"));
        assert!(!reg.is_bool_rule("notARule"));
    }

    #[test]
    fn set_formats() {
        let reg = RuleRegistry::vanilla();
        assert_eq!(
            reg.set_bool(" doFireTick ", false).unwrap(),
            "gamerule doFireTick false"
        );
        assert_eq!(
            reg.set_int("randomTickSpeed", 10).unwrap(),
            "gamerule randomTickSpeed 10"
        );
    }

    #[test]
    fn set_rejects_unknown_and_mistyped() {
        let reg = RuleRegistry::vanilla();
        assert_eq!(
            reg.set_bool("notARule", true),
            Err(RuleError::UnknownBoolRule("notARule".into()))
        );
        assert_eq!(
            reg.set_int("keepInventory", 1),
            Err(RuleError::UnknownIntRule("keepInventory".into()))
        );
        assert_eq!(
            reg.set_bool("spawnRadius", true),
            Err(RuleError::UnknownBoolRule("spawnRadius".into()))
        );
    }

    #[test]
    fn reset_uses_registered_defaults() {
        let reg = RuleRegistry::vanilla();
        assert_eq!(
            reg.reset_to_default("keepInventory").unwrap(),
            "gamerule keepInventory false"
        );
        assert_eq!(
            reg.reset_to_default("spawnRadius").unwrap(),
            "gamerule spawnRadius 5"
        );
    }

    #[test]
    fn reset_unknown_fails() {
        let err = RuleRegistry::vanilla().reset_to_default("notARule").unwrap_err();
        assert_eq!(err, RuleError::NoKnownDefault("notARule".into()));
        assert!(err.is_unknown_rule());
    }

    #[test]
    fn recognized_rule_without_default_cannot_reset() {
        let reg = RuleRegistry::new(&["customRule"], &[], &[], &[]).unwrap();
        assert!(reg.set_bool("customRule", true).is_ok());
        assert_eq!(
            reg.reset_to_default("customRule"),
            Err(RuleError::NoKnownDefault("customRule".into()))
        );
    }

    #[test]
    fn default_without_recognized_rule_still_fails_set() {
        let reg = RuleRegistry::new(&[], &[], &[("orphan", true)], &[]).unwrap();
        assert_eq!(
            reg.reset_to_default("orphan"),
            Err(RuleError::UnknownBoolRule("orphan".into()))
        );
    }

    #[test]
    fn conflicting_tables_rejected() {
        assert_eq!(
            RuleRegistry::new(&["both"], &["both"], &[], &[]).unwrap_err(),
            RuleError::Conflicting("both".into())
        );
    }

    #[test]
    fn parse_reply_bare_value() {
        assert_eq!(RuleRegistry::parse_reply("42"), "42");
        assert_eq!(RuleRegistry::parse_reply("  true\n"), "true");
    }

    #[test]
    fn parse_reply_wrapped_value() {
        assert_eq!(
            RuleRegistry::parse_reply("Gamerule doFireTick is currently set to: true"),
            "true"
        );
        assert_eq!(
            RuleRegistry::parse_reply("Gamerule randomTickSpeed is currently set to: 3"),
            "3"
        );
        assert_eq!(RuleRegistry::parse_reply("value is FALSE now"), "false");
    }

    #[test]
    fn parse_reply_falls_back_to_text() {
        assert_eq!(
            RuleRegistry::parse_reply("  Unknown game rule  here "),
            "Unknown game rule  here"
        );
        assert_eq!(RuleRegistry::parse_reply(""), "");
    }

    #[test]
    fn rule_value_parse() {
        assert_eq!(RuleValue::parse("7").unwrap(), RuleValue::Int(7));
        assert_eq!(RuleValue::parse(" TRUE ").unwrap(), RuleValue::Bool(true));
        assert_eq!(
            RuleValue::parse("maybe"),
            Err(ValidationError::RuleValue("maybe".into()))
        );
        assert_eq!(RuleValue::Int(-2).to_string(), "-2");
    }
}
