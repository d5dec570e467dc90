//! Duplicate column name resolution

use std::collections::{BTreeMap, HashSet};

/// Outcome of resolving duplicate names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNames {
    /// One unique name per input name, in input order
    pub names: Vec<String>,
    /// `(original, renamed)` for every altered name, in input order
    pub renamed: Vec<(String, String)>,
}

impl ResolvedNames {
    pub fn has_renames(&self) -> bool {
        !self.renamed.is_empty()
    }
}

/// Makes every name unique
///
/// Names that occur once are reserved and never altered. Duplicated base names
/// are processed in lexicographic order; within a group the first occurrence
/// keeps the bare name unless it is already reserved, and every later one
/// becomes `{base}-{n}` with the smallest `n >= 1` not yet reserved.
pub fn resolve_duplicates<S: AsRef<str>>(names: &[S]) -> ResolvedNames {
    let mut occurrences: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, name) in names.iter().enumerate() {
        occurrences.entry(name.as_ref()).or_default().push(i);
    }

    let mut reserved: HashSet<String> = occurrences
        .iter()
        .filter(|(_, positions)| positions.len() == 1)
        .map(|(name, _)| name.to_string())
        .collect();

    let mut resolved: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
    let mut renamed_at: Vec<usize> = Vec::new();

    for (base, positions) in occurrences.iter().filter(|(_, p)| p.len() > 1) {
        let mut suffix = 1;
        for &i in positions {
            if reserved.insert(base.to_string()) {
                continue;
            }
            let mut candidate = format!("{}-{}", base, suffix);
            while reserved.contains(&candidate) {
                suffix += 1;
                candidate = format!("{}-{}", base, suffix);
            }
            reserved.insert(candidate.clone());
            resolved[i] = candidate;
            renamed_at.push(i);
        }
    }

    renamed_at.sort_unstable();
    let renamed = renamed_at
        .into_iter()
        .map(|i| (names[i].as_ref().to_string(), resolved[i].clone()))
        .collect();

    ResolvedNames {
        names: resolved,
        renamed,
    }
}

/// First name that occurs more than once, if any
pub fn first_collision<S: AsRef<str>>(names: &[S]) -> Option<&str> {
    let mut seen: HashSet<&str> = HashSet::new();
    names
        .iter()
        .map(|name| name.as_ref())
        .find(|name| !seen.insert(*name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_names_untouched() {
        let resolved = resolve_duplicates(&["b", "a", "c"]);
        assert_eq!(resolved.names, vec!["b", "a", "c"]);
        assert!(!resolved.has_renames());
    }

    #[test]
    fn test_repeated_name_gets_suffixes() {
        let resolved = resolve_duplicates(&["x", "x", "x"]);
        assert_eq!(resolved.names, vec!["x", "x-1", "x-2"]);
        assert_eq!(
            resolved.renamed,
            vec![
                ("x".to_string(), "x-1".to_string()),
                ("x".to_string(), "x-2".to_string())
            ]
        );
    }

    #[test]
    fn test_suffix_skips_reserved_singleton() {
        // "a-1" occurs once, so it is reserved before the "a" group is resolved
        let resolved = resolve_duplicates(&["a", "a-1", "a"]);
        assert_eq!(resolved.names, vec!["a", "a-1", "a-2"]);
    }

    #[test]
    fn test_groups_resolved_in_lexicographic_order() {
        // "a" claims "a-1" before the duplicated "a-1" group is visited
        let resolved = resolve_duplicates(&["a-1", "a", "a", "a-1"]);
        assert_eq!(resolved.names, vec!["a-1-1", "a", "a-1", "a-1-2"]);
        assert!(first_collision(&resolved.names).is_none());
    }

    #[test]
    fn test_first_collision() {
        assert_eq!(first_collision(&["a", "b", "a"]), Some("a"));
        assert_eq!(first_collision(&["a", "b"]), None);
    }
}
