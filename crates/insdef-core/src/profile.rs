//! Instrument profiles.
//!
//! An [`InstrumentProfile`] is one device's full naming definition: patch names
//! per bank, controller/RPN/NRPN names, and note names and drum flags per
//! (bank, program) pair. Like [`NamedValueList`], it is a copy-on-write value.

use crate::error::{Error, Result};
use crate::value_list::NamedValueList;
use std::collections::BTreeMap;
use std::sync::Arc;

/// MIDI bank number (0-16383), or [`WILDCARD`].
pub type Bank = i32;

/// MIDI program number (0-127), or [`WILDCARD`].
pub type Program = i32;

/// The `*` coordinate: applies to any bank or program without its own entry.
pub const WILDCARD: i32 = -1;

/// How bank select messages are sent to the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BankSelectMethod {
    /// CC0 (MSB) followed by CC32 (LSB).
    #[default]
    Normal,
    /// CC0 only.
    Msb,
    /// CC32 only.
    Lsb,
    /// Bank is folded into the program change number.
    PatchNumber,
}

impl BankSelectMethod {
    pub fn code(&self) -> i32 {
        match self {
            BankSelectMethod::Normal => 0,
            BankSelectMethod::Msb => 1,
            BankSelectMethod::Lsb => 2,
            BankSelectMethod::PatchNumber => 3,
        }
    }
}

impl TryFrom<i32> for BankSelectMethod {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(BankSelectMethod::Normal),
            1 => Ok(BankSelectMethod::Msb),
            2 => Ok(BankSelectMethod::Lsb),
            3 => Ok(BankSelectMethod::PatchNumber),
            other => Err(Error::UnknownBankSelectMethod(other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ProfileData {
    pub(crate) name: String,
    pub(crate) bank_select_method: BankSelectMethod,
    pub(crate) uses_notes_as_controllers: bool,
    pub(crate) patches: BTreeMap<Bank, NamedValueList>,
    pub(crate) control: NamedValueList,
    pub(crate) rpn: NamedValueList,
    pub(crate) nrpn: NamedValueList,
    pub(crate) keys: BTreeMap<(Bank, Program), NamedValueList>,
    pub(crate) drums: BTreeMap<(Bank, Program), bool>,
}

/// Bank first, then program: bank `b` if it has any entry (else `*`), then
/// program `p` within that bank (else `*`).
fn lookup<V>(map: &BTreeMap<(Bank, Program), V>, bank: Bank, program: Program) -> Option<&V> {
    let has_bank = map
        .range((bank, Program::MIN)..=(bank, Program::MAX))
        .next()
        .is_some();
    let bank = if has_bank { bank } else { WILDCARD };
    map.get(&(bank, program))
        .or_else(|| map.get(&(bank, WILDCARD)))
}

/// One instrument's naming definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentProfile {
    data: Arc<ProfileData>,
}

impl InstrumentProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: Arc::new(ProfileData {
                name: name.into(),
                ..Default::default()
            }),
        }
    }

    pub(crate) fn from_data(data: ProfileData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    pub(crate) fn data(&self) -> &ProfileData {
        &self.data
    }

    #[inline]
    fn data_mut(&mut self) -> &mut ProfileData {
        Arc::make_mut(&mut self.data)
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.data_mut().name = name.into();
    }

    pub fn bank_select_method(&self) -> BankSelectMethod {
        self.data.bank_select_method
    }

    pub fn set_bank_select_method(&mut self, method: BankSelectMethod) {
        self.data_mut().bank_select_method = method;
    }

    pub fn uses_notes_as_controllers(&self) -> bool {
        self.data.uses_notes_as_controllers
    }

    pub fn set_uses_notes_as_controllers(&mut self, uses: bool) {
        self.data_mut().uses_notes_as_controllers = uses;
    }

    // --- Patch banks ---

    pub fn patches(&self) -> &BTreeMap<Bank, NamedValueList> {
        &self.data.patches
    }

    /// Patch list for exactly `bank`, or an empty list if the bank has none.
    pub fn patch(&self, bank: Bank) -> NamedValueList {
        self.data.patches.get(&bank).cloned().unwrap_or_default()
    }

    /// Writable patch list for `bank`, created empty if absent.
    pub fn patch_mut(&mut self, bank: Bank) -> &mut NamedValueList {
        self.data_mut().patches.entry(bank).or_default()
    }

    pub fn set_patch(&mut self, bank: Bank, patch: NamedValueList) {
        self.data_mut().patches.insert(bank, patch);
    }

    pub fn remove_patch(&mut self, bank: Bank) -> Option<NamedValueList> {
        if !self.data.patches.contains_key(&bank) {
            return None;
        }
        self.data_mut().patches.remove(&bank)
    }

    /// Patch list for `bank`, falling back to the `*` bank.
    pub fn patch_for(&self, bank: Bank) -> Option<&NamedValueList> {
        self.data
            .patches
            .get(&bank)
            .or_else(|| self.data.patches.get(&WILDCARD))
    }

    // --- Controller / RPN / NRPN names ---

    pub fn control(&self) -> &NamedValueList {
        &self.data.control
    }

    pub fn control_mut(&mut self) -> &mut NamedValueList {
        &mut self.data_mut().control
    }

    pub fn set_control(&mut self, control: NamedValueList) {
        self.data_mut().control = control;
    }

    pub fn control_name(&self) -> &str {
        self.data.control.name()
    }

    pub fn rpn(&self) -> &NamedValueList {
        &self.data.rpn
    }

    pub fn rpn_mut(&mut self) -> &mut NamedValueList {
        &mut self.data_mut().rpn
    }

    pub fn set_rpn(&mut self, rpn: NamedValueList) {
        self.data_mut().rpn = rpn;
    }

    pub fn rpn_name(&self) -> &str {
        self.data.rpn.name()
    }

    pub fn nrpn(&self) -> &NamedValueList {
        &self.data.nrpn
    }

    pub fn nrpn_mut(&mut self) -> &mut NamedValueList {
        &mut self.data_mut().nrpn
    }

    pub fn set_nrpn(&mut self, nrpn: NamedValueList) {
        self.data_mut().nrpn = nrpn;
    }

    pub fn nrpn_name(&self) -> &str {
        self.data.nrpn.name()
    }

    // --- Note names per (bank, program) ---

    pub fn keys(&self) -> &BTreeMap<(Bank, Program), NamedValueList> {
        &self.data.keys
    }

    /// Note names for exactly (bank, program), or an empty list.
    pub fn notes(&self, bank: Bank, program: Program) -> NamedValueList {
        self.data
            .keys
            .get(&(bank, program))
            .cloned()
            .unwrap_or_default()
    }

    /// Writable note list for (bank, program), created empty if absent.
    pub fn notes_mut(&mut self, bank: Bank, program: Program) -> &mut NamedValueList {
        self.data_mut().keys.entry((bank, program)).or_default()
    }

    pub fn set_notes(&mut self, bank: Bank, program: Program, notes: NamedValueList) {
        self.data_mut().keys.insert((bank, program), notes);
    }

    pub fn remove_notes(&mut self, bank: Bank, program: Program) -> Option<NamedValueList> {
        if !self.data.keys.contains_key(&(bank, program)) {
            return None;
        }
        self.data_mut().keys.remove(&(bank, program))
    }

    /// Note names for (bank, program). The bank is chosen first (`b`, or `*`
    /// when `b` has no entries), then the program within it (`p`, then `*`).
    pub fn notes_for(&self, bank: Bank, program: Program) -> Option<&NamedValueList> {
        lookup(&self.data.keys, bank, program)
    }

    // --- Drum flags per (bank, program) ---

    pub fn drums(&self) -> &BTreeMap<(Bank, Program), bool> {
        &self.data.drums
    }

    /// Whether (bank, program) is a drum map. Uses the same fallback order as
    /// [`notes_for`](Self::notes_for); `false` when nothing is set.
    pub fn is_drum(&self, bank: Bank, program: Program) -> bool {
        lookup(&self.data.drums, bank, program)
            .copied()
            .unwrap_or(false)
    }

    pub fn set_drum(&mut self, bank: Bank, program: Program, drum: bool) {
        self.data_mut().drums.insert((bank, program), drum);
    }

    pub fn remove_drum(&mut self, bank: Bank, program: Program) -> Option<bool> {
        if !self.data.drums.contains_key(&(bank, program)) {
            return None;
        }
        self.data_mut().drums.remove(&(bank, program))
    }

    /// Swap each named list for `registered(kind, name)` where that differs.
    /// Only detaches the shared payload when something actually changes.
    pub(crate) fn rebind<'a, F>(&mut self, registered: F) -> usize
    where
        F: Fn(crate::ListKind, &str) -> Option<&'a NamedValueList>,
    {
        use crate::ListKind;

        let stale = |kind: ListKind, list: &NamedValueList| -> Option<NamedValueList> {
            if list.name().is_empty() {
                return None;
            }
            registered(kind, list.name())
                .filter(|current| *current != list)
                .cloned()
        };

        let patches: Vec<(Bank, NamedValueList)> = self
            .data
            .patches
            .iter()
            .filter_map(|(bank, list)| stale(ListKind::Patches, list).map(|l| (*bank, l)))
            .collect();
        let keys: Vec<((Bank, Program), NamedValueList)> = self
            .data
            .keys
            .iter()
            .filter_map(|(coord, list)| stale(ListKind::Notes, list).map(|l| (*coord, l)))
            .collect();
        let control = stale(ListKind::Controllers, &self.data.control);
        let rpn = stale(ListKind::Rpns, &self.data.rpn);
        let nrpn = stale(ListKind::Nrpns, &self.data.nrpn);

        let changed = patches.len()
            + keys.len()
            + [&control, &rpn, &nrpn].iter().filter(|l| l.is_some()).count();
        if changed == 0 {
            return 0;
        }

        let data = self.data_mut();
        data.patches.extend(patches);
        data.keys.extend(keys);
        if let Some(list) = control {
            data.control = list;
        }
        if let Some(list) = rpn {
            data.rpn = list;
        }
        if let Some(list) = nrpn {
            data.nrpn = list;
        }
        changed
    }

    /// Every named list this profile holds, with the registry kind it belongs to.
    pub fn referenced_lists(&self) -> impl Iterator<Item = (crate::ListKind, &NamedValueList)> {
        use crate::ListKind;

        let patches = self.data.patches.values().map(|l| (ListKind::Patches, l));
        let notes = self.data.keys.values().map(|l| (ListKind::Notes, l));
        let singles = [
            (ListKind::Controllers, &self.data.control),
            (ListKind::Rpns, &self.data.rpn),
            (ListKind::Nrpns, &self.data.nrpn),
        ];
        patches
            .chain(notes)
            .chain(singles)
            .filter(|(_, list)| !list.name().is_empty())
    }

    pub fn shares_payload_with(&self, other: &InstrumentProfile) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}
