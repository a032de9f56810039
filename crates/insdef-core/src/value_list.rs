//! Named value lists.
//!
//! A [`NamedValueList`] maps integer codes (program, controller, note numbers)
//! to display labels. Lists live in a [`ListRegistry`] and may inherit from a
//! sibling through `based_on`.
//!
//! Handles are cheap to clone: clones share one payload until either side
//! writes to it, at which point the writer gets a private copy.
//!
//! # Example
//! ```ignore
//! use insdef_core::{ListRegistry, NamedValueList};
//!
//! let mut registry = ListRegistry::new();
//! let gm = registry.entry("General MIDI");
//! gm.insert(0, "Acoustic Grand Piano");
//! gm.insert(1, "Bright Acoustic Piano");
//!
//! let mut custom = NamedValueList::new("My Synth");
//! custom.set_based_on("General MIDI");
//! custom.insert(1, "Electric Grand");
//!
//! let labels = custom.resolve(&registry)?;
//! assert_eq!(labels[&1], "Electric Grand");
//! ```

use crate::error::{Error, Result};
use crate::registry::ListRegistry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Integer code a label is attached to (program, controller, note, RPN number).
pub type Code = i32;

/// Flattened code → label mapping.
pub type LabelMap = BTreeMap<Code, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ValueListData {
    pub(crate) name: String,
    pub(crate) based_on: Option<String>,
    pub(crate) entries: LabelMap,
}

/// A named, inheritable code → label list with copy-on-write value semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedValueList {
    data: Arc<ValueListData>,
}

impl NamedValueList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: Arc::new(ValueListData {
                name: name.into(),
                ..Default::default()
            }),
        }
    }

    pub(crate) fn from_data(data: ValueListData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    #[inline]
    fn data_mut(&mut self) -> &mut ValueListData {
        Arc::make_mut(&mut self.data)
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.data_mut().name = name.into();
    }

    pub fn based_on(&self) -> Option<&str> {
        self.data.based_on.as_deref()
    }

    /// Set the base list name. An empty name clears it.
    pub fn set_based_on(&mut self, based_on: impl Into<String>) {
        let based_on = based_on.into();
        self.data_mut().based_on = if based_on.is_empty() {
            None
        } else {
            Some(based_on)
        };
    }

    pub fn clear_based_on(&mut self) {
        if self.data.based_on.is_some() {
            self.data_mut().based_on = None;
        }
    }

    /// Label for exactly this code. Never consults the base list.
    pub fn get(&self, code: Code) -> Option<&str> {
        self.data.entries.get(&code).map(String::as_str)
    }

    /// Like [`get`](Self::get), but yields `""` when the code is absent.
    pub fn label(&self, code: Code) -> &str {
        self.get(code).unwrap_or("")
    }

    /// Writable slot for `code`, created empty if absent.
    pub fn entry(&mut self, code: Code) -> &mut String {
        self.data_mut().entries.entry(code).or_default()
    }

    pub fn insert(&mut self, code: Code, label: impl Into<String>) -> Option<String> {
        self.data_mut().entries.insert(code, label.into())
    }

    pub fn remove(&mut self, code: Code) -> Option<String> {
        if !self.data.entries.contains_key(&code) {
            return None;
        }
        self.data_mut().entries.remove(&code)
    }

    pub fn contains(&self, code: Code) -> bool {
        self.data.entries.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.data.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.entries.is_empty()
    }

    /// Own entries in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (Code, &str)> {
        self.data.entries.iter().map(|(code, label)| (*code, label.as_str()))
    }

    pub fn entries(&self) -> &LabelMap {
        &self.data.entries
    }

    /// Drop all entries, keeping name and base.
    pub fn clear(&mut self) {
        if !self.data.entries.is_empty() {
            self.data_mut().entries.clear();
        }
    }

    /// Copy every entry `other` defines into this list. Codes only present
    /// here are kept; codes defined by both take `other`'s label.
    pub fn overlay(&mut self, other: &NamedValueList) {
        if other.is_empty() || self.shares_payload_with(other) {
            return;
        }
        let entries = &mut self.data_mut().entries;
        for (code, label) in other.data.entries.iter() {
            entries.insert(*code, label.clone());
        }
    }

    /// Whether both handles still point at the same payload.
    pub fn shares_payload_with(&self, other: &NamedValueList) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Flatten the `based_on` chain through `registry`.
    ///
    /// Base entries are applied first and each derived list overrides them
    /// code by code. A base name missing from the registry ends the chain.
    /// A chain that revisits a name fails with [`Error::BasedOnCycle`].
    pub fn resolve(&self, registry: &ListRegistry) -> Result<LabelMap> {
        let mut chain: Vec<&NamedValueList> = vec![self];
        let mut visited: Vec<&str> = vec![self.name()];
        let mut next = self.based_on();

        while let Some(base_name) = next {
            if visited.contains(&base_name) {
                let mut names: Vec<String> = visited.iter().map(|n| n.to_string()).collect();
                names.push(base_name.to_string());
                return Err(Error::BasedOnCycle {
                    list: self.name().to_string(),
                    chain: names,
                });
            }
            match registry.get(base_name) {
                Some(base) => {
                    visited.push(base_name);
                    chain.push(base);
                    next = base.based_on();
                }
                None => {
                    warn!(
                        "List '{}' is based on unknown list '{}'",
                        visited.last().copied().unwrap_or_default(),
                        base_name
                    );
                    break;
                }
            }
        }

        let mut resolved = LabelMap::new();
        for list in chain.iter().rev() {
            for (code, label) in list.data.entries.iter() {
                resolved.insert(*code, label.clone());
            }
        }
        Ok(resolved)
    }

    /// [`resolve`](Self::resolve), degrading to the list's own entries on a cycle.
    pub fn resolve_lossy(&self, registry: &ListRegistry) -> LabelMap {
        match self.resolve(registry) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("{}", e);
                self.data.entries.clone()
            }
        }
    }
}

impl FromIterator<(Code, String)> for NamedValueList {
    fn from_iter<I: IntoIterator<Item = (Code, String)>>(iter: I) -> Self {
        Self::from_data(ValueListData {
            entries: iter.into_iter().collect(),
            ..Default::default()
        })
    }
}
