//! Hardcoded per-entity corrections, keyed by normalized name.
//!
//! Only the entities listed here get special treatment. Each rule field is
//! consumed at one pipeline stage:
//! - `classify_as_self` in the geoscheme extractor,
//! - `ensure_present` after extraction and again before merging,
//! - `fallback_code` during the merge,
//! - `sort_rank` when ordering the output.

use crate::parser::geoscheme::ClassificationRecord;

/// Formal-name prefixes dropped before any cross-source comparison.
pub const NAME_PREFIXES: &[&str] = &["Islamic Republic of"];

pub const POLAR_ENTITY: &str = "Antarctica";

#[derive(Debug, Clone, Copy)]
pub struct EntityRule {
    pub name: &'static str,
    /// Force continent and region to the entity's own name.
    pub classify_as_self: bool,
    /// Synthesize `{name, name, name}` when the source has no row for it.
    pub ensure_present: bool,
    /// Code to use when the ISO list has none.
    pub fallback_code: Option<&'static str>,
    /// Pins the entity ahead of plain lexicographic order. Lower sorts first.
    pub sort_rank: Option<char>,
}

impl EntityRule {
    const fn plain(name: &'static str) -> Self {
        EntityRule {
            name,
            classify_as_self: false,
            ensure_present: false,
            fallback_code: None,
            sort_rank: None,
        }
    }
}

pub const RULES: &[EntityRule] = &[
    EntityRule {
        sort_rank: Some('\u{0}'),
        ..EntityRule::plain("Afghanistan")
    },
    EntityRule {
        sort_rank: Some('\u{1}'),
        ..EntityRule::plain("Åland Islands")
    },
    EntityRule {
        classify_as_self: true,
        ensure_present: true,
        fallback_code: Some("ATA"),
        ..EntityRule::plain(POLAR_ENTITY)
    },
];

pub fn rule_for(name: &str) -> Option<&'static EntityRule> {
    RULES.iter().find(|r| r.name == name)
}

/// Append a synthetic self-classified record for every `ensure_present`
/// entity missing from `records`. Returns the names that were added.
pub fn ensure_present(records: &mut Vec<ClassificationRecord>) -> Vec<&'static str> {
    let mut added = Vec::new();
    for rule in RULES.iter().filter(|r| r.ensure_present) {
        if records.iter().any(|r| r.name == rule.name) {
            continue;
        }
        records.push(ClassificationRecord {
            name: rule.name.to_string(),
            continent: rule.name.to_string(),
            region: rule.name.to_string(),
        });
        added.push(rule.name);
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_entity_rule() {
        let rule = rule_for(POLAR_ENTITY).unwrap();
        assert!(rule.classify_as_self);
        assert!(rule.ensure_present);
        assert_eq!(rule.fallback_code, Some("ATA"));
        assert!(rule_for("France").is_none());
    }

    #[test]
    fn ensure_present_adds_once() {
        let mut records = Vec::new();
        assert_eq!(ensure_present(&mut records), vec![POLAR_ENTITY]);
        assert!(ensure_present(&mut records).is_empty());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].continent, POLAR_ENTITY);
        assert_eq!(records[0].region, POLAR_ENTITY);
    }

    #[test]
    fn sort_ranks_are_ordered() {
        let afg = rule_for("Afghanistan").unwrap().sort_rank.unwrap();
        let ala = rule_for("Åland Islands").unwrap().sort_rank.unwrap();
        assert!(afg < ala);
    }
}
