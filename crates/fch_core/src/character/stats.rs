use std::io::{Read, Seek, Write};

use log::info;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::core_api::{CoreResult, check_version};
use crate::json::JsonFields;
use crate::reader::LittleEndianReader;
use crate::record::Record;
use crate::writer::LittleEndianWriter;

/// Lifetime counters plus the file schema version shared by the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    pub version: i32,
    pub kills: i32,
    pub deaths: i32,
    pub crafts: i32,
    pub builds: i32,
}

impl PlayerStats {
    pub const CURRENT_VERSION: i32 = 33;
    pub const COUNTERS_SINCE: i32 = 28;
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            kills: 0,
            deaths: 0,
            crafts: 0,
            builds: 0,
        }
    }
}

impl Record for PlayerStats {
    type Context = ();

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, _: ()) -> CoreResult<Self> {
        let version = r.read_i32()?;
        check_version("file", version, None, Self::CURRENT_VERSION)?;
        info!("file version: {version}");

        let mut stats = Self {
            version,
            kills: 0,
            deaths: 0,
            crafts: 0,
            builds: 0,
        };
        if version >= Self::COUNTERS_SINCE {
            stats.kills = r.read_i32()?;
            stats.deaths = r.read_i32()?;
            stats.crafts = r.read_i32()?;
            stats.builds = r.read_i32()?;
        }
        Ok(stats)
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_i32(Self::CURRENT_VERSION)?;
        w.write_i32(self.kills)?;
        w.write_i32(self.deaths)?;
        w.write_i32(self.crafts)?;
        w.write_i32(self.builds)?;
        Ok(())
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let j = JsonFields::new("PlayerStats", value)?;
        Ok(Self {
            version: Self::CURRENT_VERSION,
            kills: j.get_i32("Kills", 0)?,
            deaths: j.get_i32("Deaths", 0)?,
            crafts: j.get_i32("Crafts", 0)?,
            builds: j.get_i32("Builds", 0)?,
        })
    }

    fn encode_json(&self) -> JsonValue {
        let mut out = JsonMap::new();
        out.insert("Kills".to_string(), JsonValue::from(self.kills));
        out.insert("Deaths".to_string(), JsonValue::from(self.deaths));
        out.insert("Crafts".to_string(), JsonValue::from(self.crafts));
        out.insert("Builds".to_string(), JsonValue::from(self.builds));
        JsonValue::Object(out)
    }
}
