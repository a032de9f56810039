//! Cakewalk `.ins` reader.
//!
//! Line oriented and tolerant: anything that cannot be interpreted is
//! recorded as an [`Anomaly`] and skipped. An unknown `.Section` skips
//! everything up to the next section header.

use crate::section::{parse_coord, Section};
use insdef_core::{
    Anomaly, AnomalyKind, Bank, BankSelectMethod, Code, DefinitionCatalog, InstrumentProfile,
    ListKind, NamedValueList, Program,
};
use std::borrow::Cow;
use tracing::warn;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode file bytes as UTF-8, falling back to Latin-1 byte-per-char.
pub(crate) fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Where the reader currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the first section header.
    Start,
    /// Inside an unrecognised section; lines are skipped.
    Skipping,
    Section(Section),
}

/// Slot of an instrument profile a list reference goes into.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Patch(Bank),
    Control,
    Rpn,
    Nrpn,
    Key(Bank, Program),
}

impl Slot {
    fn kind(&self) -> ListKind {
        match self {
            Slot::Patch(_) => ListKind::Patches,
            Slot::Control => ListKind::Controllers,
            Slot::Rpn => ListKind::Rpns,
            Slot::Nrpn => ListKind::Nrpns,
            Slot::Key(_, _) => ListKind::Notes,
        }
    }
}

/// Instrument → list reference, bound once the whole file has been read.
#[derive(Debug)]
struct PendingRef {
    line: usize,
    instrument: String,
    slot: Slot,
    list: String,
}

pub(crate) struct InsReader {
    catalog: DefinitionCatalog,
    anomalies: Vec<Anomaly>,
    state: State,
    /// Name of the open `[block]` in the current section.
    block: Option<String>,
    pending: Vec<PendingRef>,
    line: usize,
}

impl InsReader {
    pub(crate) fn new() -> Self {
        Self {
            catalog: DefinitionCatalog::new(),
            anomalies: Vec::new(),
            state: State::Start,
            block: None,
            pending: Vec::new(),
            line: 0,
        }
    }

    /// Read a whole document.
    pub(crate) fn read(mut self, text: &str) -> (DefinitionCatalog, Vec<Anomaly>) {
        for (index, raw) in text.lines().enumerate() {
            self.line = index + 1;
            self.read_line(raw);
        }
        self.bind_references();
        (self.catalog, self.anomalies)
    }

    fn anomaly(&mut self, kind: AnomalyKind, message: impl Into<String>) {
        let anomaly = Anomaly::at_line(kind, self.line, message);
        warn!("{}", anomaly);
        self.anomalies.push(anomaly);
    }

    fn read_line(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            return;
        }

        if let Some(title) = line.strip_prefix('.') {
            self.block = None;
            match Section::from_title(title) {
                Some(section) => self.state = State::Section(section),
                None => {
                    self.state = State::Skipping;
                    self.anomaly(
                        AnomalyKind::UnknownSection,
                        format!("unknown section '.{}'", title.trim()),
                    );
                }
            }
            return;
        }

        let section = match self.state {
            State::Skipping => return,
            State::Start => {
                self.anomaly(
                    AnomalyKind::OrphanEntry,
                    format!("'{line}' appears before any section"),
                );
                return;
            }
            State::Section(section) => section,
        };

        if line.starts_with('[') {
            match line.strip_suffix(']') {
                Some(inner) => self.open_block(section, inner[1..].trim()),
                None => {
                    self.block = None;
                    self.anomaly(
                        AnomalyKind::MalformedLine,
                        format!("unterminated block header '{line}'"),
                    );
                }
            }
            return;
        }

        let Some((key, value)) = line.split_once('=') else {
            self.anomaly(
                AnomalyKind::MalformedLine,
                format!("expected 'key=value', got '{line}'"),
            );
            return;
        };
        let (key, value) = (key.trim(), value.trim());

        let Some(block) = self.block.clone() else {
            self.anomaly(
                AnomalyKind::OrphanEntry,
                format!("'{line}' is outside any [block]"),
            );
            return;
        };

        match section {
            Section::List(kind) => self.list_entry(kind, &block, key, value),
            Section::Instruments => self.instrument_entry(&block, key, value),
        }
    }

    fn open_block(&mut self, section: Section, name: &str) {
        if name.is_empty() {
            self.block = None;
            self.anomaly(AnomalyKind::MalformedLine, "empty block name '[]'");
            return;
        }
        match section {
            Section::List(kind) => {
                self.catalog.registry_mut(kind).entry(name);
            }
            Section::Instruments => {
                self.catalog.instrument_entry(name);
            }
        }
        self.block = Some(name.to_string());
    }

    fn list_entry(&mut self, kind: ListKind, block: &str, key: &str, value: &str) {
        if key.eq_ignore_ascii_case("BasedOn") {
            self.catalog.registry_mut(kind).entry(block).set_based_on(value);
            return;
        }

        let Ok(code) = key.parse::<Code>() else {
            self.anomaly(
                AnomalyKind::InvalidCode,
                format!("'{key}' is not a valid code in {kind} list '{block}'"),
            );
            return;
        };

        let list = self.catalog.registry_mut(kind).entry(block);
        if let Some(previous) = list.insert(code, value) {
            self.anomaly(
                AnomalyKind::DuplicateCode,
                format!("code {code} in {kind} list '{block}' redefined (was '{previous}')"),
            );
        }
    }

    fn instrument_entry(&mut self, instrument: &str, key: &str, value: &str) {
        let lower = key.to_ascii_lowercase();

        let slot = match lower.as_str() {
            "control" => Some(Slot::Control),
            "rpn" => Some(Slot::Rpn),
            "nrpn" => Some(Slot::Nrpn),
            "bankselmethod" => {
                self.bank_select_method(instrument, value);
                return;
            }
            "usesnotesascontrollers" | "usenotesascontrollers" => {
                if let Some(flag) = self.flag(key, value) {
                    self.profile(instrument).set_uses_notes_as_controllers(flag);
                }
                return;
            }
            _ => None,
        };

        let slot = match slot {
            Some(slot) => slot,
            None => match indexed_key(&lower)
                .as_ref()
                .map(|(name, args)| (*name, args.as_slice()))
            {
                Some(("patch", [bank])) => match parse_coord(bank) {
                    Some(bank) => Slot::Patch(bank),
                    None => return self.bad_index(key),
                },
                Some(("key", [bank, program])) => match (parse_coord(bank), parse_coord(program)) {
                    (Some(bank), Some(program)) => Slot::Key(bank, program),
                    _ => return self.bad_index(key),
                },
                Some(("drum", [bank, program])) => {
                    match (parse_coord(bank), parse_coord(program)) {
                        (Some(bank), Some(program)) => {
                            if let Some(flag) = self.flag(key, value) {
                                self.profile(instrument).set_drum(bank, program, flag);
                            }
                        }
                        _ => self.bad_index(key),
                    }
                    return;
                }
                _ => {
                    self.anomaly(
                        AnomalyKind::UnknownKey,
                        format!("unknown key '{key}' in instrument '{instrument}'"),
                    );
                    return;
                }
            },
        };

        if value.is_empty() {
            self.anomaly(
                AnomalyKind::InvalidValue,
                format!("'{key}' in instrument '{instrument}' names no list"),
            );
            return;
        }

        self.pending.push(PendingRef {
            line: self.line,
            instrument: instrument.to_string(),
            slot,
            list: value.to_string(),
        });
    }

    fn profile(&mut self, instrument: &str) -> &mut InstrumentProfile {
        self.catalog.instrument_entry(instrument)
    }

    fn flag(&mut self, key: &str, value: &str) -> Option<bool> {
        match value.parse::<i32>() {
            Ok(n) => Some(n != 0),
            Err(_) => {
                self.anomaly(
                    AnomalyKind::InvalidValue,
                    format!("'{key}' expects 0 or 1, got '{value}'"),
                );
                None
            }
        }
    }

    fn bank_select_method(&mut self, instrument: &str, value: &str) {
        let method = value
            .parse::<i32>()
            .map_err(|_| format!("'{value}' is not a number"))
            .and_then(|code| BankSelectMethod::try_from(code).map_err(|e| e.to_string()));
        match method {
            Ok(method) => self.profile(instrument).set_bank_select_method(method),
            Err(reason) => self.anomaly(
                AnomalyKind::InvalidValue,
                format!("BankSelMethod in instrument '{instrument}': {reason}"),
            ),
        }
    }

    fn bad_index(&mut self, key: &str) {
        self.anomaly(
            AnomalyKind::InvalidValue,
            format!("bad bank/program index in '{key}'"),
        );
    }

    /// Attach every collected instrument reference to its list. Unknown names
    /// still get an empty list carrying the name, so they survive a save.
    fn bind_references(&mut self) {
        for pending in std::mem::take(&mut self.pending) {
            let kind = pending.slot.kind();
            let list = match self.catalog.registry(kind).get(&pending.list) {
                Some(list) => list.clone(),
                None => {
                    let anomaly = Anomaly::at_line(
                        AnomalyKind::UnknownListReference,
                        pending.line,
                        format!(
                            "instrument '{}' refers to unknown {kind} list '{}'",
                            pending.instrument, pending.list
                        ),
                    );
                    warn!("{}", anomaly);
                    self.anomalies.push(anomaly);
                    NamedValueList::new(pending.list.as_str())
                }
            };

            let profile = self.profile(&pending.instrument);
            match pending.slot {
                Slot::Patch(bank) => profile.set_patch(bank, list),
                Slot::Control => profile.set_control(list),
                Slot::Rpn => profile.set_rpn(list),
                Slot::Nrpn => profile.set_nrpn(list),
                Slot::Key(bank, program) => profile.set_notes(bank, program, list),
            }
        }
    }
}

/// Split `name[a,b]` into `("name", ["a", "b"])`.
fn indexed_key(key: &str) -> Option<(&str, Vec<&str>)> {
    let (name, rest) = key.split_once('[')?;
    let args = rest.strip_suffix(']')?;
    Some((name.trim(), args.split(',').collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insdef_core::WILDCARD;

    fn read(text: &str) -> (DefinitionCatalog, Vec<Anomaly>) {
        InsReader::new().read(text)
    }

    const SAMPLE: &str = "\
; Sample instrument definitions
.Patch Names

[General MIDI]
0=Acoustic Grand Piano
1=Bright Acoustic Piano

[GS Bank 8]
BasedOn=General MIDI
1=Piano 2w

.Note Names

[GM Drums]
35=Acoustic Bass Drum
36=Bass Drum 1

.Controller Names

[Standard]
7=Volume
10=Pan

.RPN Names

[Standard]
0=Pitch Bend Sensitivity

.NRPN Names

[GS NRPN]
136=Vibrato Rate

.Instrument Definitions

[GS Device]
UsesNotesAsControllers=1
Control=Standard
RPN=Standard
NRPN=GS NRPN
BankSelMethod=1
Patch[*]=General MIDI
Patch[1024]=GS Bank 8
Key[*,*]=GM Drums
Drum[*,*]=0
Drum[128,*]=1
";

    #[test]
    fn test_read_sample() {
        let (catalog, anomalies) = read(SAMPLE);
        assert!(anomalies.is_empty(), "{anomalies:?}");

        let gm = catalog.patches().get("General MIDI").unwrap();
        assert_eq!(gm.len(), 2);
        assert_eq!(gm.label(0), "Acoustic Grand Piano");
        let bank8 = catalog.patches().get("GS Bank 8").unwrap();
        assert_eq!(bank8.based_on(), Some("General MIDI"));

        assert_eq!(catalog.notes().get("GM Drums").unwrap().len(), 2);
        assert_eq!(catalog.controllers().get("Standard").unwrap().label(10), "Pan");
        assert_eq!(
            catalog.rpns().get("Standard").unwrap().label(0),
            "Pitch Bend Sensitivity"
        );
        assert_eq!(catalog.nrpns().get("GS NRPN").unwrap().label(136), "Vibrato Rate");

        let device = catalog.instrument("GS Device").unwrap();
        assert_eq!(device.name(), "GS Device");
        assert!(device.uses_notes_as_controllers());
        assert_eq!(device.bank_select_method(), BankSelectMethod::Msb);
        assert_eq!(device.control_name(), "Standard");
        assert_eq!(device.control().label(7), "Volume");
        assert_eq!(device.rpn_name(), "Standard");
        assert_eq!(device.nrpn_name(), "GS NRPN");
        assert_eq!(device.patch(WILDCARD).name(), "General MIDI");
        assert_eq!(device.patch(1024).name(), "GS Bank 8");
        assert_eq!(device.notes(WILDCARD, WILDCARD).name(), "GM Drums");
        assert!(device.is_drum(128, 0));
        assert!(!device.is_drum(0, 0));
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let text = "\
.Patch Names
[GM]
0=Piano
this line is garbage
1=Bright Piano
";
        let (catalog, anomalies) = read(text);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::MalformedLine);
        assert_eq!(anomalies[0].line, Some(4));
        assert_eq!(catalog.patches().get("GM").unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_and_duplicate_codes() {
        let text = "\
.Controller Names
[Std]
seven=Volume
7=Volume
7=Main Volume
";
        let (catalog, anomalies) = read(text);
        let kinds: Vec<AnomalyKind> = anomalies.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AnomalyKind::InvalidCode, AnomalyKind::DuplicateCode]);
        let std = catalog.controllers().get("Std").unwrap();
        assert_eq!(std.len(), 1);
        assert_eq!(std.label(7), "Main Volume");
    }

    #[test]
    fn test_unknown_section_skipped_until_next() {
        let text = "\
.Drum Maps
[Whatever]
0=Ignored
.Patch Names
[GM]
0=Piano
";
        let (catalog, anomalies) = read(text);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::UnknownSection);
        assert_eq!(catalog.patches().len(), 1);
        assert_eq!(catalog.patches().get("GM").unwrap().label(0), "Piano");
    }

    #[test]
    fn test_orphan_entries() {
        let text = "\
0=Before any section
.Patch Names
1=Before any block
[GM]
2=Fine
";
        let (catalog, anomalies) = read(text);
        let kinds: Vec<AnomalyKind> = anomalies.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AnomalyKind::OrphanEntry, AnomalyKind::OrphanEntry]);
        assert_eq!(catalog.patches().get("GM").unwrap().len(), 1);
    }

    #[test]
    fn test_references_bound_regardless_of_order() {
        let text = "\
.Instrument Definitions
[Synth]
Patch[0]=Bank A
.Patch Names
[Bank A]
0=Pad
";
        let (catalog, anomalies) = read(text);
        assert!(anomalies.is_empty(), "{anomalies:?}");
        let synth = catalog.instrument("Synth").unwrap();
        assert_eq!(synth.patch(0).label(0), "Pad");
    }

    #[test]
    fn test_unknown_list_reference_keeps_name() {
        let text = "\
.Instrument Definitions
[Synth]
Control=Nowhere
";
        let (catalog, anomalies) = read(text);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::UnknownListReference);
        assert_eq!(anomalies[0].line, Some(3));
        let synth = catalog.instrument("Synth").unwrap();
        assert_eq!(synth.control_name(), "Nowhere");
        assert!(synth.control().is_empty());
    }

    #[test]
    fn test_bad_instrument_values() {
        let text = "\
.Instrument Definitions
[Synth]
BankSelMethod=7
UsesNotesAsControllers=yes
Drum[x,0]=1
Patch[-3]=GM
Volume=100
";
        let (catalog, anomalies) = read(text);
        let kinds: Vec<AnomalyKind> = anomalies.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AnomalyKind::InvalidValue,
                AnomalyKind::InvalidValue,
                AnomalyKind::InvalidValue,
                AnomalyKind::InvalidValue,
                AnomalyKind::UnknownKey,
            ]
        );
        let synth = catalog.instrument("Synth").unwrap();
        assert_eq!(synth.bank_select_method(), BankSelectMethod::Normal);
        assert!(!synth.uses_notes_as_controllers());
        assert!(synth.drums().is_empty());
        assert!(synth.patches().is_empty());
    }

    #[test]
    fn test_notes_as_controllers_both_spellings() {
        for key in ["UsesNotesAsControllers", "UseNotesAsControllers"] {
            let text = format!(".Instrument Definitions\n[Synth]\n{key}=1\n");
            let (catalog, anomalies) = read(&text);
            assert!(anomalies.is_empty(), "{key}: {anomalies:?}");
            assert!(catalog.instrument("Synth").unwrap().uses_notes_as_controllers());
        }
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let text = "\
.Patch Names
[GM]
basedon=
0=Piano
.instrument definitions
[Synth]
PATCH[*]=GM
drum[*,*]=1
";
        let (catalog, anomalies) = read(text);
        assert!(anomalies.is_empty(), "{anomalies:?}");
        assert_eq!(catalog.patches().get("GM").unwrap().based_on(), None);
        let synth = catalog.instrument("Synth").unwrap();
        assert_eq!(synth.patch(WILDCARD).name(), "GM");
        assert!(synth.is_drum(5, 5));
    }

    #[test]
    fn test_crlf_and_labels_with_equals() {
        let text = ".Patch Names\r\n[GM]\r\n0=A=B\r\n";
        let (catalog, anomalies) = read(text);
        assert!(anomalies.is_empty());
        assert_eq!(catalog.patches().get("GM").unwrap().label(0), "A=B");
    }

    #[test]
    fn test_decode_latin1_and_bom() {
        assert_eq!(decode(b"\xEF\xBB\xBF.Patch Names"), ".Patch Names");
        // 0xE9 alone is invalid UTF-8; Latin-1 makes it 'é'
        assert_eq!(decode(b"0=Caf\xE9"), "0=Café");
        assert!(matches!(decode(b"plain"), Cow::Borrowed(_)));
    }
}
