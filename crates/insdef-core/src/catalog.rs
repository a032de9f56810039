//! The definition catalog: every instrument profile plus the shared name-list
//! registries and the files that contributed to them.

use crate::anomaly::{Anomaly, AnomalyKind};
use crate::error::Error;
use crate::profile::{Bank, InstrumentProfile, Program};
use crate::registry::{ListKind, ListRegistry};
use crate::value_list::{Code, NamedValueList};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// All loaded instrument definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionCatalog {
    pub(crate) instruments: BTreeMap<String, InstrumentProfile>,
    pub(crate) patches: ListRegistry,
    pub(crate) notes: ListRegistry,
    pub(crate) controllers: ListRegistry,
    pub(crate) rpns: ListRegistry,
    pub(crate) nrpns: ListRegistry,
    pub(crate) files: Vec<PathBuf>,
}

impl DefinitionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Registries ---

    pub fn registry(&self, kind: ListKind) -> &ListRegistry {
        match kind {
            ListKind::Patches => &self.patches,
            ListKind::Notes => &self.notes,
            ListKind::Controllers => &self.controllers,
            ListKind::Rpns => &self.rpns,
            ListKind::Nrpns => &self.nrpns,
        }
    }

    pub fn registry_mut(&mut self, kind: ListKind) -> &mut ListRegistry {
        match kind {
            ListKind::Patches => &mut self.patches,
            ListKind::Notes => &mut self.notes,
            ListKind::Controllers => &mut self.controllers,
            ListKind::Rpns => &mut self.rpns,
            ListKind::Nrpns => &mut self.nrpns,
        }
    }

    pub fn patches(&self) -> &ListRegistry {
        &self.patches
    }

    pub fn patches_mut(&mut self) -> &mut ListRegistry {
        &mut self.patches
    }

    pub fn notes(&self) -> &ListRegistry {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut ListRegistry {
        &mut self.notes
    }

    pub fn controllers(&self) -> &ListRegistry {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut ListRegistry {
        &mut self.controllers
    }

    pub fn rpns(&self) -> &ListRegistry {
        &self.rpns
    }

    pub fn rpns_mut(&mut self) -> &mut ListRegistry {
        &mut self.rpns
    }

    pub fn nrpns(&self) -> &ListRegistry {
        &self.nrpns
    }

    pub fn nrpns_mut(&mut self) -> &mut ListRegistry {
        &mut self.nrpns
    }

    // --- Instruments ---

    pub fn instrument(&self, name: &str) -> Option<&InstrumentProfile> {
        self.instruments.get(name)
    }

    pub fn instrument_mut(&mut self, name: &str) -> Option<&mut InstrumentProfile> {
        self.instruments.get_mut(name)
    }

    /// Install `profile` under `name`, replacing any existing profile.
    pub fn set_instrument(
        &mut self,
        name: impl Into<String>,
        profile: InstrumentProfile,
    ) -> Option<InstrumentProfile> {
        self.instruments.insert(name.into(), profile)
    }

    /// The profile registered under `name`, created empty if absent.
    pub fn instrument_entry(&mut self, name: &str) -> &mut InstrumentProfile {
        self.instruments
            .entry(name.to_string())
            .or_insert_with(|| InstrumentProfile::new(name))
    }

    pub fn remove_instrument(&mut self, name: &str) -> Option<InstrumentProfile> {
        self.instruments.remove(name)
    }

    pub fn contains_instrument(&self, name: &str) -> bool {
        self.instruments.contains_key(name)
    }

    pub fn instrument_names(&self) -> impl Iterator<Item = &str> {
        self.instruments.keys().map(String::as_str)
    }

    pub fn instruments(&self) -> impl Iterator<Item = (&str, &InstrumentProfile)> {
        self.instruments.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// Number of instruments.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// No instruments and no lists.
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
            && ListKind::ALL
                .iter()
                .all(|kind| self.registry(*kind).is_empty())
    }

    /// Empty every registry, the instrument map and the file list.
    pub fn clear_all(&mut self) {
        self.instruments.clear();
        for kind in ListKind::ALL {
            self.registry_mut(kind).clear();
        }
        self.files.clear();
    }

    // --- Source files ---

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Record `path` as a contributor. Already-listed paths are ignored.
    pub fn append_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.files.contains(&path) {
            self.files.push(path);
        }
    }

    pub fn remove_file(&mut self, path: impl AsRef<Path>) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f != path.as_ref());
        self.files.len() != before
    }

    /// Equality of definitions only; the file list is ignored.
    pub fn same_definitions(&self, other: &DefinitionCatalog) -> bool {
        self.instruments == other.instruments
            && ListKind::ALL
                .iter()
                .all(|kind| self.registry(*kind) == other.registry(*kind))
    }

    // --- Display lookups ---

    /// The list a profile slot stands for: the registry entry of the same name
    /// when there is one, otherwise the profile's own copy.
    fn bound<'a>(&'a self, kind: ListKind, list: &'a NamedValueList) -> &'a NamedValueList {
        if list.name().is_empty() {
            return list;
        }
        self.registry(kind).get(list.name()).unwrap_or(list)
    }

    fn resolved_label(&self, kind: ListKind, list: &NamedValueList, code: Code) -> Option<String> {
        let list = self.bound(kind, list);
        if list.based_on().is_none() {
            return list.get(code).map(str::to_string);
        }
        list.resolve_lossy(self.registry(kind)).remove(&code)
    }

    /// Patch name for a program in a bank, following `*` banks and `BasedOn`.
    pub fn patch_label(&self, instrument: &str, bank: Bank, program: Program) -> Option<String> {
        let patch = self.instrument(instrument)?.patch_for(bank)?;
        self.resolved_label(ListKind::Patches, patch, program)
    }

    /// Note name for a key of the given bank and program.
    pub fn note_label(
        &self,
        instrument: &str,
        bank: Bank,
        program: Program,
        note: Code,
    ) -> Option<String> {
        let notes = self.instrument(instrument)?.notes_for(bank, program)?;
        self.resolved_label(ListKind::Notes, notes, note)
    }

    pub fn controller_label(&self, instrument: &str, controller: Code) -> Option<String> {
        let profile = self.instrument(instrument)?;
        self.resolved_label(ListKind::Controllers, profile.control(), controller)
    }

    pub fn rpn_label(&self, instrument: &str, rpn: Code) -> Option<String> {
        let profile = self.instrument(instrument)?;
        self.resolved_label(ListKind::Rpns, profile.rpn(), rpn)
    }

    pub fn nrpn_label(&self, instrument: &str, nrpn: Code) -> Option<String> {
        let profile = self.instrument(instrument)?;
        self.resolved_label(ListKind::Nrpns, profile.nrpn(), nrpn)
    }

    /// Drum flag for (bank, program); unknown instruments are never drums.
    pub fn is_drum(&self, instrument: &str, bank: Bank, program: Program) -> bool {
        self.instrument(instrument)
            .map(|p| p.is_drum(bank, program))
            .unwrap_or(false)
    }

    /// Replace every named list held by a profile with the registry list of the
    /// same name where the two differ. Returns how many slots were replaced.
    pub fn rebind_references(&mut self) -> usize {
        let (patches, notes, controllers, rpns, nrpns) = (
            &self.patches,
            &self.notes,
            &self.controllers,
            &self.rpns,
            &self.nrpns,
        );
        let registered = |kind: ListKind, name: &str| match kind {
            ListKind::Patches => patches.get(name),
            ListKind::Notes => notes.get(name),
            ListKind::Controllers => controllers.get(name),
            ListKind::Rpns => rpns.get(name),
            ListKind::Nrpns => nrpns.get(name),
        };
        self.instruments
            .values_mut()
            .map(|profile| profile.rebind(registered))
            .sum()
    }

    // --- Structural checks ---

    /// Report dangling `BasedOn` references, `BasedOn` cycles, instrument
    /// references to lists missing from their registry, and profile copies that
    /// drifted from their registry list. Each is also logged.
    pub fn anomalies(&self) -> Vec<Anomaly> {
        let mut found = Vec::new();

        for kind in ListKind::ALL {
            let registry = self.registry(kind);
            for (name, list) in registry.iter() {
                if let Some(base) = list.based_on() {
                    if !registry.contains(base) {
                        found.push(Anomaly::new(
                            AnomalyKind::DanglingBasedOn,
                            format!("{kind} list '{name}' is based on unknown list '{base}'"),
                        ));
                        continue;
                    }
                }
                if let Err(Error::BasedOnCycle { chain, .. }) = list.resolve(registry) {
                    found.push(Anomaly::new(
                        AnomalyKind::BasedOnCycle,
                        format!("{kind} list '{name}': {}", chain.join(" -> ")),
                    ));
                }
            }
        }

        for (instrument, profile) in self.instruments.iter() {
            for (kind, list) in profile.referenced_lists() {
                match self.registry(kind).get(list.name()) {
                    None => found.push(Anomaly::new(
                        AnomalyKind::UnknownListReference,
                        format!(
                            "instrument '{instrument}' refers to unknown {kind} list '{}'",
                            list.name()
                        ),
                    )),
                    Some(registered) if registered != list => found.push(Anomaly::new(
                        AnomalyKind::DivergentList,
                        format!(
                            "instrument '{instrument}' has a {kind} list '{}' that differs from the registry",
                            list.name()
                        ),
                    )),
                    Some(_) => {}
                }
            }
        }

        for anomaly in found.iter() {
            warn!("{}", anomaly);
        }
        found
    }
}
