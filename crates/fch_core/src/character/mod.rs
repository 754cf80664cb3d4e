mod inventory;
mod player;
mod skills;
mod stats;
mod world;

use std::io::{Cursor, Read, Seek, Write};

use log::info;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::core_api::CoreResult;
use crate::envelope::{ChecksumMode, close_envelope, open_envelope, write_envelope};
use crate::json::JsonFields;
use crate::reader::LittleEndianReader;
use crate::record::{Record, write_records};
use crate::writer::LittleEndianWriter;

pub use inventory::{Inventory, InventoryItem};
pub use player::{ActiveFood, Appearance, CraftingStation, GuardianPower, JournalEntry, PlayerData};
pub use skills::{Skill, SkillList};
pub use stats::PlayerStats;
pub use world::{
    DEATH_POINT_SINCE, MapMarker, Point, VISIBILITY_SINCE, World, WorldVisibility, read_worlds,
};

/// A whole character file: the decoded payload of one envelope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Character {
    pub stats: PlayerStats,
    pub worlds: Vec<World>,
    pub player: PlayerData,
}

impl Character {
    pub fn read_from<R: Read + Seek>(
        r: &mut LittleEndianReader<R>,
        mode: ChecksumMode,
    ) -> CoreResult<Self> {
        let span = open_envelope(r, mode)?;
        let stats = PlayerStats::decode_binary(r, ())?;
        let worlds = read_worlds(r, &stats)?;
        let player = PlayerData::decode_binary(r, stats.version)?;
        close_envelope(r, span)?;
        info!(
            "loaded character '{}' with {} world(s)",
            player.name,
            worlds.len()
        );
        Ok(Self {
            stats,
            worlds,
            player,
        })
    }

    pub fn from_bytes(bytes: &[u8], mode: ChecksumMode) -> CoreResult<Self> {
        let mut r = LittleEndianReader::new(Cursor::new(bytes));
        Self::read_from(&mut r, mode)
    }

    pub fn write_to<W: Read + Write + Seek>(
        &self,
        w: &mut LittleEndianWriter<W>,
        mode: ChecksumMode,
    ) -> CoreResult<()> {
        write_envelope(w, mode, |w| {
            self.stats.encode_binary(w)?;
            write_records(w, &self.worlds, "world")?;
            self.player.encode_binary(w)
        })?;
        w.flush()?;
        Ok(())
    }

    pub fn to_bytes(&self, mode: ChecksumMode) -> CoreResult<Vec<u8>> {
        let mut w = LittleEndianWriter::new(Cursor::new(Vec::new()));
        self.write_to(&mut w, mode)?;
        Ok(w.into_inner().into_inner())
    }

    /// `{"PlayerStats": ..., "PlayerData": ...}`; worlds travel separately.
    pub fn player_document(&self) -> JsonValue {
        let mut out = JsonMap::new();
        out.insert("PlayerStats".to_string(), self.stats.encode_json());
        out.insert("PlayerData".to_string(), self.player.encode_json());
        JsonValue::Object(out)
    }

    /// Rebuild from a player document plus the already decoded worlds.
    pub fn from_documents(player_doc: &JsonValue, worlds: Vec<World>) -> CoreResult<Self> {
        let j = JsonFields::new("player document", player_doc)?;
        let stats = match j.value("PlayerStats") {
            Some(value) => PlayerStats::decode_json(value)?,
            None => PlayerStats::default(),
        };
        let player = match j.value("PlayerData") {
            Some(value) => PlayerData::decode_json(value)?,
            None => PlayerData::default(),
        };
        Ok(Self {
            stats,
            worlds,
            player,
        })
    }

    /// The full tree as one JSON value, worlds inline.
    pub fn to_json(&self) -> JsonValue {
        let mut doc = self.player_document();
        if let JsonValue::Object(map) = &mut doc {
            map.insert(
                "Worlds".to_string(),
                JsonValue::Array(self.worlds.iter().map(Record::encode_json).collect()),
            );
        }
        doc
    }
}
