//! Per-branch property aggregation.
//!
//! Properties arrive as a raw configuration dump, one `branch.<name>.<key>=<value>`
//! line per entry mixed with unrelated configuration lines. Aggregation
//! groups them by branch and derives the report's column set as the union
//! of keys across all branches.

use std::collections::{BTreeMap, BTreeSet};

/// Keys the underlying store manages natively. Never shown as report
/// columns and never writable through the property guard.
pub const RESERVED_PROPERTIES: &[&str] = &["merge", "rebase", "remote"];

/// Properties for one branch, keyed by property name.
pub type PropertyMap = BTreeMap<String, String>;

/// Whether a property key belongs to the underlying store.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_PROPERTIES.contains(&key)
}

/// Group a configuration dump into per-branch property maps.
///
/// Lines that don't match `branch.<name>.<key>=<value>` are skipped
/// silently. Branch names may contain dots; the key is the segment after
/// the last dot.
pub fn parse_config_dump<'a, I>(lines: I) -> BTreeMap<String, PropertyMap>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut by_branch: BTreeMap<String, PropertyMap> = BTreeMap::new();

    for line in lines {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("branch.") else {
            continue;
        };
        let Some((path, value)) = rest.split_once('=') else {
            continue;
        };
        let Some((name, key)) = path.rsplit_once('.') else {
            continue;
        };
        if name.is_empty() || key.is_empty() {
            continue;
        }

        by_branch
            .entry(name.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    by_branch
}

/// Union of custom property keys across all branches: sorted, deduplicated,
/// reserved keys excluded. This is the discoverable column set.
pub fn property_union(by_branch: &BTreeMap<String, PropertyMap>) -> Vec<String> {
    let keys: BTreeSet<&str> = by_branch
        .values()
        .flat_map(|props| props.keys())
        .map(String::as_str)
        .filter(|key| !is_reserved(key))
        .collect();

    keys.into_iter().map(str::to_string).collect()
}
