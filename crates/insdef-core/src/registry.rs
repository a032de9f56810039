//! Named list registries.

use crate::error::{Error, Result};
use crate::value_list::{LabelMap, NamedValueList};
use std::collections::BTreeMap;
use std::fmt;

/// The five kinds of shared name lists a catalog keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListKind {
    Patches,
    Notes,
    Controllers,
    Rpns,
    Nrpns,
}

impl ListKind {
    pub const ALL: [ListKind; 5] = [
        ListKind::Patches,
        ListKind::Notes,
        ListKind::Controllers,
        ListKind::Rpns,
        ListKind::Nrpns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Patches => "patch",
            ListKind::Notes => "note",
            ListKind::Controllers => "controller",
            ListKind::Rpns => "RPN",
            ListKind::Nrpns => "NRPN",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name → list mapping for one [`ListKind`]. Names are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRegistry {
    lists: BTreeMap<String, NamedValueList>,
}

impl ListRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&NamedValueList> {
        self.lists.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut NamedValueList> {
        self.lists.get_mut(name)
    }

    /// The list registered under `name`, created empty (with its name set) if absent.
    pub fn entry(&mut self, name: &str) -> &mut NamedValueList {
        self.lists
            .entry(name.to_string())
            .or_insert_with(|| NamedValueList::new(name))
    }

    /// Register `list` under its own name, returning the list it replaced.
    pub fn insert(&mut self, list: NamedValueList) -> Option<NamedValueList> {
        self.lists.insert(list.name().to_string(), list)
    }

    pub fn remove(&mut self, name: &str) -> Option<NamedValueList> {
        self.lists.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamedValueList)> {
        self.lists.iter().map(|(name, list)| (name.as_str(), list))
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn clear(&mut self) {
        self.lists.clear();
    }

    /// Resolve the list registered under `name` against this registry.
    pub fn resolve(&self, name: &str, kind: ListKind) -> Result<LabelMap> {
        let list = self.get(name).ok_or_else(|| Error::UnknownList {
            kind,
            name: name.to_string(),
        })?;
        list.resolve(self)
    }
}

impl FromIterator<NamedValueList> for ListRegistry {
    fn from_iter<I: IntoIterator<Item = NamedValueList>>(iter: I) -> Self {
        let mut registry = Self::new();
        for list in iter {
            registry.insert(list);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creates_named_list() {
        let mut registry = ListRegistry::new();
        registry.entry("Standard").insert(7, "Volume");
        assert!(registry.contains("Standard"));
        assert_eq!(registry.get("Standard").unwrap().name(), "Standard");
        assert_eq!(registry.get("Standard").unwrap().label(7), "Volume");

        // Second call returns the same list
        registry.entry("Standard").insert(10, "Pan");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Standard").unwrap().len(), 2);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut registry = ListRegistry::new();
        registry.entry("gm");
        registry.entry("GM");
        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["GM", "gm"]);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = ListRegistry::new();
        let err = registry.resolve("Nope", ListKind::Notes).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownList {
                kind: ListKind::Notes,
                name: "Nope".to_string()
            }
        );
        assert_eq!(err.to_string(), "Unknown note list: Nope");
    }

    #[test]
    fn test_from_iterator_keys_by_name() {
        let mut registry: ListRegistry = vec![NamedValueList::new("A"), NamedValueList::new("B")]
            .into_iter()
            .collect();
        assert!(registry.contains("A"));
        assert!(registry.contains("B"));
        assert_eq!(registry.remove("A").map(|l| l.name().to_string()), Some("A".into()));
        assert_eq!(registry.len(), 1);
    }
}
