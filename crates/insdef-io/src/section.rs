//! `.ins` section headers.

use insdef_core::{ListKind, WILDCARD};

/// Top-level `.Section` of an instrument definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    List(ListKind),
    Instruments,
}

const INSTRUMENTS_TITLE: &str = "Instrument Definitions";

impl Section {
    pub(crate) fn title(&self) -> &'static str {
        match self {
            Section::List(kind) => list_title(*kind),
            Section::Instruments => INSTRUMENTS_TITLE,
        }
    }

    /// Match a header title (without the leading `.`), ignoring ASCII case.
    pub(crate) fn from_title(title: &str) -> Option<Section> {
        let title = title.trim();
        if title.eq_ignore_ascii_case(INSTRUMENTS_TITLE) {
            return Some(Section::Instruments);
        }
        ListKind::ALL
            .into_iter()
            .find(|kind| title.eq_ignore_ascii_case(list_title(*kind)))
            .map(Section::List)
    }
}

fn list_title(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Patches => "Patch Names",
        ListKind::Notes => "Note Names",
        ListKind::Controllers => "Controller Names",
        ListKind::Rpns => "RPN Names",
        ListKind::Nrpns => "NRPN Names",
    }
}

/// Parse a bank or program coordinate: a non-negative integer or `*`.
pub(crate) fn parse_coord(s: &str) -> Option<i32> {
    let s = s.trim();
    if s == "*" {
        return Some(WILDCARD);
    }
    s.parse::<i32>().ok().filter(|n| *n >= 0)
}

pub(crate) fn format_coord(n: i32) -> String {
    if n == WILDCARD {
        "*".to_string()
    } else {
        n.to_string()
    }
}
