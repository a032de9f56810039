//! Serde support for the data model.
//!
//! The copy-on-write handles are serialized through plain mirror structs.
//! Composite (bank, program) keys become flat tuples so that formats
//! without non-string map keys still work.

use crate::catalog::DefinitionCatalog;
use crate::profile::{Bank, BankSelectMethod, InstrumentProfile, ProfileData, Program};
use crate::registry::ListRegistry;
use crate::value_list::{Code, NamedValueList, ValueListData};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;

#[derive(Serialize, Deserialize)]
struct SerializableValueList {
    name: String,
    based_on: Option<String>,
    entries: Vec<(Code, String)>,
}

impl Serialize for NamedValueList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SerializableValueList {
            name: self.name().to_string(),
            based_on: self.based_on().map(str::to_string),
            entries: self
                .iter()
                .map(|(code, label)| (code, label.to_string()))
                .collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NamedValueList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = SerializableValueList::deserialize(deserializer)?;
        Ok(NamedValueList::from_data(ValueListData {
            name: s.name,
            based_on: s.based_on.filter(|b| !b.is_empty()),
            entries: s.entries.into_iter().collect(),
        }))
    }
}

#[derive(Serialize, Deserialize)]
struct SerializableProfile {
    name: String,
    bank_select_method: i32,
    uses_notes_as_controllers: bool,
    patches: Vec<(Bank, NamedValueList)>,
    control: NamedValueList,
    rpn: NamedValueList,
    nrpn: NamedValueList,
    keys: Vec<(Bank, Program, NamedValueList)>,
    drums: Vec<(Bank, Program, bool)>,
}

impl Serialize for InstrumentProfile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = self.data();
        SerializableProfile {
            name: data.name.clone(),
            bank_select_method: data.bank_select_method.code(),
            uses_notes_as_controllers: data.uses_notes_as_controllers,
            patches: data
                .patches
                .iter()
                .map(|(bank, list)| (*bank, list.clone()))
                .collect(),
            control: data.control.clone(),
            rpn: data.rpn.clone(),
            nrpn: data.nrpn.clone(),
            keys: data
                .keys
                .iter()
                .map(|((bank, prog), list)| (*bank, *prog, list.clone()))
                .collect(),
            drums: data
                .drums
                .iter()
                .map(|((bank, prog), drum)| (*bank, *prog, *drum))
                .collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InstrumentProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = SerializableProfile::deserialize(deserializer)?;
        let bank_select_method =
            BankSelectMethod::try_from(s.bank_select_method).map_err(D::Error::custom)?;

        Ok(InstrumentProfile::from_data(ProfileData {
            name: s.name,
            bank_select_method,
            uses_notes_as_controllers: s.uses_notes_as_controllers,
            patches: s.patches.into_iter().collect(),
            control: s.control,
            rpn: s.rpn,
            nrpn: s.nrpn,
            keys: s
                .keys
                .into_iter()
                .map(|(bank, prog, list)| ((bank, prog), list))
                .collect(),
            drums: s
                .drums
                .into_iter()
                .map(|(bank, prog, drum)| ((bank, prog), drum))
                .collect(),
        }))
    }
}

impl Serialize for ListRegistry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter().map(|(_, list)| list))
    }
}

impl<'de> Deserialize<'de> for ListRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let lists = Vec::<NamedValueList>::deserialize(deserializer)?;
        Ok(lists.into_iter().collect())
    }
}

#[derive(Serialize, Deserialize)]
struct SerializableCatalog {
    instruments: Vec<(String, InstrumentProfile)>,
    patches: ListRegistry,
    notes: ListRegistry,
    controllers: ListRegistry,
    rpns: ListRegistry,
    nrpns: ListRegistry,
    files: Vec<PathBuf>,
}

impl Serialize for DefinitionCatalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SerializableCatalog {
            instruments: self
                .instruments()
                .map(|(name, profile)| (name.to_string(), profile.clone()))
                .collect(),
            patches: self.patches.clone(),
            notes: self.notes.clone(),
            controllers: self.controllers.clone(),
            rpns: self.rpns.clone(),
            nrpns: self.nrpns.clone(),
            files: self.files.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DefinitionCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = SerializableCatalog::deserialize(deserializer)?;
        Ok(DefinitionCatalog {
            instruments: s.instruments.into_iter().collect(),
            patches: s.patches,
            notes: s.notes,
            controllers: s.controllers,
            rpns: s.rpns,
            nrpns: s.nrpns,
            files: s.files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::WILDCARD;

    fn sample_catalog() -> DefinitionCatalog {
        let mut catalog = DefinitionCatalog::new();
        let gm = catalog.patches_mut().entry("General MIDI");
        gm.insert(0, "Acoustic Grand Piano");
        gm.insert(127, "Gunshot");
        let var = catalog.patches_mut().entry("Variation");
        var.set_based_on("General MIDI");
        var.insert(0, "Piano 1w");
        catalog.notes_mut().entry("Drums").insert(36, "Kick");

        let mut profile = InstrumentProfile::new("Module");
        profile.set_bank_select_method(BankSelectMethod::Lsb);
        profile.set_patch(WILDCARD, catalog.patches().get("General MIDI").unwrap().clone());
        profile.set_notes(128, WILDCARD, catalog.notes().get("Drums").unwrap().clone());
        profile.set_drum(128, WILDCARD, true);
        catalog.set_instrument("Module", profile);
        catalog.append_file("module.ins");
        catalog
    }

    #[test]
    fn test_value_list_serialization() {
        let mut list = NamedValueList::new("Standard");
        list.set_based_on("Base");
        list.insert(7, "Volume");
        list.insert(10, "Pan");

        let serialized = bincode::serialize(&list).unwrap();
        let deserialized: NamedValueList = bincode::deserialize(&serialized).unwrap();
        assert_eq!(list, deserialized);
    }

    #[test]
    fn test_profile_serialization() {
        let catalog = sample_catalog();
        let profile = catalog.instrument("Module").unwrap();

        let serialized = bincode::serialize(profile).unwrap();
        let deserialized: InstrumentProfile = bincode::deserialize(&serialized).unwrap();
        assert_eq!(profile, &deserialized);
        assert_eq!(deserialized.bank_select_method(), BankSelectMethod::Lsb);
        assert!(deserialized.is_drum(128, 3));
    }

    #[test]
    fn test_catalog_serialization() {
        let catalog = sample_catalog();
        let serialized = bincode::serialize(&catalog).unwrap();
        let deserialized: DefinitionCatalog = bincode::deserialize(&serialized).unwrap();
        assert_eq!(catalog, deserialized);
    }

    #[test]
    fn test_invalid_bank_select_method_rejected() {
        let s = SerializableProfile {
            name: "Bad".to_string(),
            bank_select_method: 42,
            uses_notes_as_controllers: false,
            patches: Vec::new(),
            control: NamedValueList::default(),
            rpn: NamedValueList::default(),
            nrpn: NamedValueList::default(),
            keys: Vec::new(),
            drums: Vec::new(),
        };
        let serialized = bincode::serialize(&s).unwrap();
        assert!(bincode::deserialize::<InstrumentProfile>(&serialized).is_err());
    }
}
