//! Test helpers and fixtures for insdef integration tests
//!
//! Fixture files are written into a fresh temporary directory per test so
//! that open/close/reload can run against real paths.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// General MIDI patch list plus a plain GM instrument.
pub const GM_INS: &str = "\
; Cakewalk Instrument Definition File
.Patch Names

[General MIDI]
0=Acoustic Grand Piano
1=Bright Acoustic Piano
40=Violin

.Note Names

[GM Drums]
36=Bass Drum 1
38=Acoustic Snare

.Controller Names

[Standard]
7=Volume
10=Pan

.Instrument Definitions

[General MIDI]
Control=Standard
Patch[*]=General MIDI
Key[*,*]=GM Drums
Drum[*,*]=0
";

/// Variation bank based on General MIDI, plus a GS module.
/// Redefines `Standard` controllers with an extra entry.
pub const GS_INS: &str = "\
.Patch Names

[GS Variation]
BasedOn=General MIDI
1=Piano 2w

.Controller Names

[Standard]
91=Reverb

.Instrument Definitions

[Roland GS]
Control=Standard
BankSelMethod=1
Patch[*]=General MIDI
Patch[8]=GS Variation
Drum[128,*]=1
";

/// Temporary directory holding fixture files.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `content` to `name` and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    pub fn gm(&self) -> PathBuf {
        self.write("gm.ins", GM_INS)
    }

    pub fn gs(&self) -> PathBuf {
        self.write("gs.ins", GS_INS)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}
