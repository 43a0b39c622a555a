use std::borrow::Cow;

use tracing::{info, warn};

use crate::overrides;
use crate::parser::geoscheme::ClassificationRecord;
use crate::parser::iso_codes::CodeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRecord {
    pub name: String,
    pub code: Option<String>,
    pub continent: String,
    pub region: String,
}

#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub records: Vec<MergedRecord>,
    /// Names still without a code after overrides, in output order.
    pub unmatched: Vec<String>,
}

/// Left-join classifications against the code map, apply overrides, sort.
pub fn merge(mut records: Vec<ClassificationRecord>, codes: &CodeMap) -> MergeOutcome {
    for name in overrides::ensure_present(&mut records) {
        info!("No classification for {}, added it manually", name);
    }

    let mut merged: Vec<MergedRecord> = records
        .into_iter()
        .map(|r| {
            let code = codes.get(&r.name).cloned().or_else(|| {
                overrides::rule_for(&r.name)
                    .and_then(|rule| rule.fallback_code)
                    .map(str::to_string)
            });
            MergedRecord {
                name: r.name,
                code,
                continent: r.continent,
                region: r.region,
            }
        })
        .collect();

    merged.sort_by(|a, b| sort_key(&a.name).cmp(&sort_key(&b.name)));

    let unmatched: Vec<String> = merged
        .iter()
        .filter(|r| r.code.is_none())
        .map(|r| r.name.clone())
        .collect();
    if !unmatched.is_empty() {
        warn!("{} countries missing ISO codes", unmatched.len());
        for name in &unmatched {
            warn!("  - {}", name);
        }
    }

    MergeOutcome {
        records: merged,
        unmatched,
    }
}

/// Pinned entities sort as `"A" + rank`; everything else by its own name.
pub fn sort_key(name: &str) -> Cow<'_, str> {
    match overrides::rule_for(name).and_then(|r| r.sort_rank) {
        Some(rank) => Cow::Owned(format!("A{}", rank)),
        None => Cow::Borrowed(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::POLAR_ENTITY;

    fn rec(name: &str, continent: &str, region: &str) -> ClassificationRecord {
        ClassificationRecord {
            name: name.into(),
            continent: continent.into(),
            region: region.into(),
        }
    }

    fn codes(pairs: &[(&str, &str)]) -> CodeMap {
        pairs
            .iter()
            .map(|(n, c)| (n.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn pinned_sort_order() {
        let records = vec![
            rec("Zimbabwe", "Africa", "Eastern Africa"),
            rec("Albania", "Europe", "Southern Europe"),
            rec("Åland Islands", "Europe", "Northern Europe"),
            rec("Afghanistan", "Asia", "Southern Asia"),
        ];
        let out = merge(records, &CodeMap::new());
        let names: Vec<&str> = out.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Afghanistan", "Åland Islands", "Albania", POLAR_ENTITY, "Zimbabwe"]
        );
    }

    #[test]
    fn code_attached() {
        let out = merge(
            vec![rec("Name A", "Continent A", "Region A")],
            &codes(&[("Name A", "ABC")]),
        );
        let a = out.records.iter().find(|r| r.name == "Name A").unwrap();
        assert_eq!(a.code.as_deref(), Some("ABC"));
        assert_eq!(a.continent, "Continent A");
        assert_eq!(a.region, "Region A");
        assert!(out.unmatched.is_empty());
    }

    #[test]
    fn missing_code_reported() {
        let out = merge(vec![rec("Name A", "Continent A", "Region A")], &CodeMap::new());
        let a = out.records.iter().find(|r| r.name == "Name A").unwrap();
        assert_eq!(a.code, None);
        assert_eq!(out.unmatched, vec!["Name A".to_string()]);
    }

    #[test]
    fn polar_code_fallback_only_when_absent() {
        let out = merge(vec![rec(POLAR_ENTITY, POLAR_ENTITY, POLAR_ENTITY)], &CodeMap::new());
        assert_eq!(out.records[0].code.as_deref(), Some("ATA"));

        let out = merge(
            vec![rec(POLAR_ENTITY, POLAR_ENTITY, POLAR_ENTITY)],
            &codes(&[(POLAR_ENTITY, "AQQ")]),
        );
        assert_eq!(out.records[0].code.as_deref(), Some("AQQ"));
    }

    #[test]
    fn empty_input_yields_polar_entity() {
        let out = merge(Vec::new(), &CodeMap::new());
        assert_eq!(
            out.records,
            vec![MergedRecord {
                name: POLAR_ENTITY.into(),
                code: Some("ATA".into()),
                continent: POLAR_ENTITY.into(),
                region: POLAR_ENTITY.into(),
            }]
        );
        assert!(out.unmatched.is_empty());
    }

    #[test]
    fn sort_keys() {
        assert_eq!(sort_key("Afghanistan"), "A\u{0}");
        assert_eq!(sort_key("Åland Islands"), "A\u{1}");
        assert_eq!(sort_key("Albania"), "Albania");
    }
}
