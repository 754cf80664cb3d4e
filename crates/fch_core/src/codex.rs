//! Code/name tables for the enum-like fields of a character file.
//!
//! Every table is bidirectional. Codes without a name render as `0x` followed
//! by at least two lowercase hex digits of the 32-bit pattern, and that form
//! parses back to the same code, so unknown values survive a JSON round trip.

use std::fmt;

/// A static code/name table.
#[derive(Debug, Clone, Copy)]
pub struct Codex {
    kind: &'static str,
    entries: &'static [(i32, &'static str)],
}

impl Codex {
    pub const fn new(kind: &'static str, entries: &'static [(i32, &'static str)]) -> Self {
        Self { kind, entries }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn entries(&self) -> &'static [(i32, &'static str)] {
        self.entries
    }

    pub fn lookup_name(&self, code: i32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| *name)
    }

    pub fn lookup_code(&self, name: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(code, _)| *code)
    }

    pub fn name(&self, code: i32) -> String {
        match self.lookup_name(code) {
            Some(name) => name.to_string(),
            None => format_hex_code(code),
        }
    }

    /// Resolve a name or a `0x` hex literal.
    pub fn code(&self, text: &str) -> Option<i32> {
        self.lookup_code(text).or_else(|| parse_hex_code(text))
    }
}

pub fn format_hex_code(code: i32) -> String {
    format!("0x{:02x}", code as u32)
}

pub fn parse_hex_code(text: &str) -> Option<i32> {
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))?;
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(|v| v as i32)
}

pub static BIOMES: Codex = Codex::new(
    "biome",
    &[
        (1, "Meadows"),
        (2, "Swamp"),
        (4, "Mountain"),
        (8, "BlackForest"),
        (16, "Plains"),
        (32, "AshLands"),
        (64, "DeepNorth"),
        (256, "Ocean"),
        (512, "Mistlands"),
    ],
);

pub static SKILLS: Codex = Codex::new(
    "skill",
    &[
        (0x01, "Sword"),
        (0x02, "Knives"),
        (0x03, "Clubs"),
        (0x04, "Polearms"),
        (0x05, "Spears"),
        (0x06, "Blocking"),
        (0x07, "Axes"),
        (0x08, "Bows"),
        (0x0b, "Unarmed"),
        (0x0c, "Pickaxes"),
        (0x0d, "Woodcutting"),
        (0x65, "Sneaking"),
        (0x66, "Jumping"),
        (0x67, "Swimming"),
    ],
);

pub static MARKER_SYMBOLS: Codex = Codex::new(
    "marker symbol",
    &[
        (0, "Campfire"),
        (1, "House"),
        (2, "T"),
        (3, "Dot"),
        (6, "Gate"),
        (9, "Boss"),
    ],
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Biome(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SkillType(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MarkerSymbol(pub i32);

impl Biome {
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> i32 {
        self.0
    }

    pub fn name(&self) -> String {
        BIOMES.name(self.0)
    }

    pub fn from_name(text: &str) -> Option<Self> {
        BIOMES.code(text).map(Self)
    }
}

impl SkillType {
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> i32 {
        self.0
    }

    pub fn name(&self) -> String {
        SKILLS.name(self.0)
    }

    pub fn from_name(text: &str) -> Option<Self> {
        SKILLS.code(text).map(Self)
    }
}

impl MarkerSymbol {
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> i32 {
        self.0
    }

    pub fn name(&self) -> String {
        MARKER_SYMBOLS.name(self.0)
    }

    pub fn from_name(text: &str) -> Option<Self> {
        MARKER_SYMBOLS.code(text).map(Self)
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Display for MarkerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
