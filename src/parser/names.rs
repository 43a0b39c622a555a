use crate::overrides::NAME_PREFIXES;

/// Clean an entity name so both sources agree on the join key.
pub fn normalize(name: &str) -> String {
    let mut s = name.trim();
    while let Some(rest) = NAME_PREFIXES.iter().find_map(|p| s.strip_prefix(p)) {
        s = rest.trim();
    }
    s.to_string()
}
