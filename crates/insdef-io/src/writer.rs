//! Cakewalk `.ins` writer.

use crate::config::{CodecConfig, TextEncoding};
use crate::section::{format_coord, Section};
use insdef_core::{DefinitionCatalog, InstrumentProfile, ListKind, ListRegistry, NamedValueList};
use std::io::{self, Write};
use tracing::warn;

const FILE_TITLE: &str = "Cakewalk Instrument Definition File";

/// Line sink applying the configured line ending and encoding.
struct LineSink<'a, W: Write> {
    out: W,
    config: &'a CodecConfig,
    replaced: usize,
    buf: Vec<u8>,
}

impl<'a, W: Write> LineSink<'a, W> {
    fn new(out: W, config: &'a CodecConfig) -> Self {
        Self {
            out,
            config,
            replaced: 0,
            buf: Vec::with_capacity(128),
        }
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        self.buf.clear();
        match self.config.encoding {
            TextEncoding::Utf8 => self.buf.extend_from_slice(text.as_bytes()),
            TextEncoding::Latin1 => {
                for c in text.chars() {
                    match u8::try_from(u32::from(c)) {
                        Ok(byte) => self.buf.push(byte),
                        Err(_) => {
                            self.buf.push(b'?');
                            self.replaced += 1;
                        }
                    }
                }
            }
        }
        self.buf
            .extend_from_slice(self.config.line_ending.as_str().as_bytes());
        self.out.write_all(&self.buf)
    }

    fn blank(&mut self) -> io::Result<()> {
        self.line("")
    }

    fn finish(mut self) -> io::Result<()> {
        if self.replaced > 0 {
            warn!(
                "{} character(s) not representable in Latin-1 were written as '?'",
                self.replaced
            );
        }
        self.out.flush()
    }
}

/// Keep labels and names on one line.
fn single_line(text: &str) -> std::borrow::Cow<'_, str> {
    if text.contains(['\r', '\n']) {
        warn!("Line break in {:?} replaced with a space", text);
        text.replace("\r\n", " ").replace(['\r', '\n'], " ").into()
    } else {
        text.into()
    }
}

/// Registries as they will be written: the catalog's own lists plus any list
/// a profile references that is missing from its registry.
fn effective_registries(catalog: &DefinitionCatalog) -> Vec<(ListKind, ListRegistry)> {
    let mut registries: Vec<(ListKind, ListRegistry)> = ListKind::ALL
        .into_iter()
        .map(|kind| (kind, catalog.registry(kind).clone()))
        .collect();

    for (_, profile) in catalog.instruments() {
        for (kind, list) in profile.referenced_lists() {
            if let Some((_, registry)) = registries.iter_mut().find(|(k, _)| *k == kind) {
                match registry.get(list.name()) {
                    None => {
                        registry.insert(list.clone());
                    }
                    Some(registered) if registered != list => warn!(
                        "{} list '{}' held by '{}' differs from the registry; writing the registry version",
                        kind,
                        list.name(),
                        profile.name()
                    ),
                    Some(_) => {}
                }
            }
        }
    }
    registries
}

pub(crate) fn write_catalog<W: Write>(
    catalog: &DefinitionCatalog,
    out: W,
    config: &CodecConfig,
    file_name: Option<&str>,
) -> io::Result<()> {
    let mut sink = LineSink::new(out, config);

    if config.write_header {
        sink.line(&format!("; {FILE_TITLE}"))?;
        sink.line(";")?;
        if let Some(file_name) = file_name {
            sink.line(&format!(";  File: {}", single_line(file_name)))?;
            sink.line(";")?;
        }
        sink.line(&format!("; Generated by {}", config.generator))?;
        sink.blank()?;
    }

    for (kind, registry) in effective_registries(catalog) {
        if registry.is_empty() {
            continue;
        }
        sink.line(&format!(".{}", Section::List(kind).title()))?;
        sink.blank()?;
        for (_, list) in registry.iter() {
            write_list(&mut sink, list)?;
        }
    }

    if catalog.instrument_names().next().is_some() {
        sink.line(&format!(".{}", Section::Instruments.title()))?;
        sink.blank()?;
        for (name, profile) in catalog.instruments() {
            write_instrument(&mut sink, name, profile)?;
        }
    }

    sink.finish()
}

fn write_list<W: Write>(sink: &mut LineSink<'_, W>, list: &NamedValueList) -> io::Result<()> {
    sink.line(&format!("[{}]", single_line(list.name())))?;
    if let Some(base) = list.based_on() {
        sink.line(&format!("BasedOn={}", single_line(base)))?;
    }
    for (code, label) in list.iter() {
        sink.line(&format!("{code}={}", single_line(label)))?;
    }
    sink.blank()
}

/// Name a profile uses to refer to `list`, or `None` when it cannot be referenced.
fn reference<'l>(instrument: &str, key: &str, list: &'l NamedValueList) -> Option<&'l str> {
    if list.name().is_empty() {
        if !list.is_empty() {
            warn!(
                "Instrument '{}': unnamed list for {} cannot be referenced and is dropped",
                instrument, key
            );
        }
        return None;
    }
    Some(list.name())
}

fn write_instrument<W: Write>(
    sink: &mut LineSink<'_, W>,
    name: &str,
    profile: &InstrumentProfile,
) -> io::Result<()> {
    sink.line(&format!("[{}]", single_line(name)))?;

    if profile.uses_notes_as_controllers() {
        sink.line("UsesNotesAsControllers=1")?;
    }
    for (key, list) in [
        ("Control", profile.control()),
        ("RPN", profile.rpn()),
        ("NRPN", profile.nrpn()),
    ] {
        if let Some(list_name) = reference(name, key, list) {
            sink.line(&format!("{key}={}", single_line(list_name)))?;
        }
    }
    let method = profile.bank_select_method().code();
    if method != 0 {
        sink.line(&format!("BankSelMethod={method}"))?;
    }

    for (bank, patch) in profile.patches() {
        let key = format!("Patch[{}]", format_coord(*bank));
        if let Some(list_name) = reference(name, &key, patch) {
            sink.line(&format!("{key}={}", single_line(list_name)))?;
        }
    }
    for ((bank, program), notes) in profile.keys() {
        let key = format!("Key[{},{}]", format_coord(*bank), format_coord(*program));
        if let Some(list_name) = reference(name, &key, notes) {
            sink.line(&format!("{key}={}", single_line(list_name)))?;
        }
    }
    for ((bank, program), drum) in profile.drums() {
        sink.line(&format!(
            "Drum[{},{}]={}",
            format_coord(*bank),
            format_coord(*program),
            u8::from(*drum)
        ))?;
    }

    sink.blank()
}
