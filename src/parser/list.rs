//! Column-list and rename-map sub-grammars.
//!
//! Both accept comma-separated entries with an optional alias via `->`,
//! `←`, or `:`. Surrounding braces and brackets are stripped before
//! splitting.

use crate::algebra::ColumnSpec;
use crate::error::{EngineError, EngineResult};
use std::collections::BTreeMap;

const SEPARATORS: [&str; 3] = ["->", "←", ":"];

fn strip_wrappers(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '[' | ']'))
        .collect()
}

/// Split one entry on the first alias separator
fn split_entry(entry: &str) -> (Option<String>, Option<String>) {
    let separator = SEPARATORS
        .iter()
        .filter_map(|sep| entry.find(sep).map(|index| (index, sep.len())))
        .min_by_key(|&(index, _)| index);

    let (left, right) = match separator {
        Some((index, len)) => (&entry[..index], Some(&entry[index + len..])),
        None => (entry, None),
    };

    let clean = |part: &str| {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    };
    (clean(left), right.and_then(|part| clean(part)))
}

/// Parse `a, b -> alias, c` into column specs; blank entries are skipped
pub fn parse_columns_list(raw: &str) -> Vec<ColumnSpec> {
    let stripped = strip_wrappers(raw);
    if stripped.trim().is_empty() {
        return Vec::new();
    }
    stripped
        .split(',')
        .filter_map(|entry| match split_entry(entry) {
            (Some(name), Some(alias)) => Some(ColumnSpec::aliased(name, alias)),
            (Some(name), None) => Some(ColumnSpec::new(name)),
            _ => None,
        })
        .collect()
}

/// Parse `from -> to, …` into a rename map; entries missing either side
/// are an error
pub fn parse_rename_map(raw: &str, offset: usize) -> EngineResult<BTreeMap<String, String>> {
    let stripped = strip_wrappers(raw);
    if stripped.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let mut renames = BTreeMap::new();
    for entry in stripped.split(',') {
        match split_entry(entry) {
            (Some(from), Some(to)) => {
                renames.insert(from, to);
            }
            _ => {
                return Err(EngineError::parse(
                    offset,
                    format!("Invalid rename mapping in \"{}\"", entry.trim()),
                ))
            }
        }
    }
    Ok(renames)
}
