use std::io::{Read, Seek, Write};

use log::{debug, info, warn};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::codex::Biome;
use crate::core_api::{CoreError, CoreResult, check_version};
use crate::json::{
    JsonFields, f32_list_to_json, f32_to_json, str_list_to_json, type_name,
};
use crate::reader::LittleEndianReader;
use crate::record::{
    Record, read_records, read_strings, records_to_json, write_records, write_strings,
};
use crate::writer::LittleEndianWriter;

use super::inventory::Inventory;
use super::skills::SkillList;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CraftingStation {
    pub name: String,
    pub level: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JournalEntry {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Appearance {
    pub beard: String,
    pub hair: String,
    pub complexion: [f32; 3],
    pub hair_color: [f32; 3],
    pub body_type: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActiveFood {
    pub name: String,
    pub health: f32,
    pub stamina: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GuardianPower {
    pub name: String,
    pub cooldown: f32,
}

/// The character proper: identity header plus the versioned data block.
///
/// A file whose "has player data" flag is clear decodes with `version == 0`
/// and every block field at its default. Encoding always emits the flag set
/// and a full block at [`PlayerData::CURRENT_VERSION`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerData {
    pub name: String,
    pub player_id: i64,
    pub start_seed: Vec<u8>,
    pub version: i32,
    pub health_max: f32,
    pub health: f32,
    pub stamina_max: f32,
    pub first_spawn: bool,
    pub time_since_death: f32,
    pub guardian_power: GuardianPower,
    pub inventory: Inventory,
    pub known_recipes: Vec<String>,
    pub known_stations: Vec<CraftingStation>,
    pub discovered_materials: Vec<String>,
    pub shown_tutorials: Vec<String>,
    pub discovered_uniques: Vec<String>,
    pub trophies: Vec<String>,
    pub known_biomes: Vec<Biome>,
    pub journal: Vec<JournalEntry>,
    pub appearance: Appearance,
    pub active_food: Vec<ActiveFood>,
    pub skills: SkillList,
}

impl Record for CraftingStation {
    type Context = ();

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, _: ()) -> CoreResult<Self> {
        Ok(Self {
            name: r.read_string()?,
            level: r.read_i32()?,
        })
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_string(&self.name)?;
        w.write_i32(self.level)?;
        Ok(())
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let j = JsonFields::new("CraftingStation", value)?;
        Ok(Self {
            name: j.get_str("Name", "")?,
            level: j.get_i32("Level", 0)?,
        })
    }

    fn encode_json(&self) -> JsonValue {
        let mut out = JsonMap::new();
        out.insert("Name".to_string(), JsonValue::String(self.name.clone()));
        out.insert("Level".to_string(), JsonValue::from(self.level));
        JsonValue::Object(out)
    }
}

impl Record for JournalEntry {
    type Context = ();

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, _: ()) -> CoreResult<Self> {
        Ok(Self {
            label: r.read_string()?,
            text: r.read_string()?,
        })
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_string(&self.label)?;
        w.write_string(&self.text)?;
        Ok(())
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let j = JsonFields::new("JournalEntry", value)?;
        Ok(Self {
            label: j.get_str("Label", "")?,
            text: j.get_str("Text", "")?,
        })
    }

    fn encode_json(&self) -> JsonValue {
        let mut out = JsonMap::new();
        out.insert("Label".to_string(), JsonValue::String(self.label.clone()));
        out.insert("Text".to_string(), JsonValue::String(self.text.clone()));
        JsonValue::Object(out)
    }
}

impl Record for Appearance {
    type Context = ();

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, _: ()) -> CoreResult<Self> {
        Ok(Self {
            beard: r.read_string()?,
            hair: r.read_string()?,
            complexion: r.read_f32_array::<3>()?,
            hair_color: r.read_f32_array::<3>()?,
            body_type: r.read_i32()?,
        })
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_string(&self.beard)?;
        w.write_string(&self.hair)?;
        w.write_f32_slice(&self.complexion)?;
        w.write_f32_slice(&self.hair_color)?;
        w.write_i32(self.body_type)?;
        Ok(())
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let j = JsonFields::new("Appearance", value)?;
        Ok(Self {
            beard: j.get_str("Beard", "")?,
            hair: j.get_str("Hair", "")?,
            complexion: j.get_f32_array("ComplexionRGB", [0.0; 3])?,
            hair_color: j.get_f32_array("HairColorRGB", [0.0; 3])?,
            body_type: j.get_i32("BodyType", 0)?,
        })
    }

    fn encode_json(&self) -> JsonValue {
        let mut out = JsonMap::new();
        out.insert("Beard".to_string(), JsonValue::String(self.beard.clone()));
        out.insert("Hair".to_string(), JsonValue::String(self.hair.clone()));
        out.insert("ComplexionRGB".to_string(), f32_list_to_json(&self.complexion));
        out.insert("HairColorRGB".to_string(), f32_list_to_json(&self.hair_color));
        out.insert("BodyType".to_string(), JsonValue::from(self.body_type));
        JsonValue::Object(out)
    }
}

impl Record for ActiveFood {
    type Context = ();

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, _: ()) -> CoreResult<Self> {
        Ok(Self {
            name: r.read_string()?,
            health: r.read_f32()?,
            stamina: r.read_f32()?,
        })
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_string(&self.name)?;
        w.write_f32(self.health)?;
        w.write_f32(self.stamina)?;
        Ok(())
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let j = JsonFields::new("ActiveFood", value)?;
        Ok(Self {
            name: j.get_str("Name", "")?,
            health: j.get_f32("Health", 0.0)?,
            stamina: j.get_f32("Stamina", 0.0)?,
        })
    }

    fn encode_json(&self) -> JsonValue {
        let mut out = JsonMap::new();
        out.insert("Name".to_string(), JsonValue::String(self.name.clone()));
        out.insert("Health".to_string(), f32_to_json(self.health));
        out.insert("Stamina".to_string(), f32_to_json(self.stamina));
        JsonValue::Object(out)
    }
}

/// Biomes travel as a bare code on disk and a bare name in JSON.
impl Record for Biome {
    type Context = ();

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, _: ()) -> CoreResult<Self> {
        Ok(Biome::from_raw(r.read_i32()?))
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_i32(self.raw())?;
        Ok(())
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let JsonValue::String(name) = value else {
            return Err(CoreError::type_mismatch(format!(
                "biome has type {}, expected string",
                type_name(value)
            )));
        };
        Biome::from_name(name).ok_or_else(|| CoreError::type_mismatch(format!("unknown biome '{name}'")))
    }

    fn encode_json(&self) -> JsonValue {
        JsonValue::String(self.name())
    }
}

impl PlayerData {
    pub const CURRENT_VERSION: i32 = 24;
    /// Blocks at or below this version use a layout this crate does not read.
    pub const OLDEST_UNSUPPORTED: i32 = 20;
    pub const JOURNAL_SINCE: i32 = 22;
    pub const GUARDIAN_NAME_SINCE: i32 = 23;
    pub const GUARDIAN_COOLDOWN_SINCE: i32 = 24;

    /// True when the decoded file carried the versioned data block.
    pub fn has_block(&self) -> bool {
        self.version != 0
    }

    fn decode_block<R: Read + Seek>(&mut self, r: &mut LittleEndianReader<R>) -> CoreResult<()> {
        let version = r.read_i32()?;
        check_version(
            "player data",
            version,
            Some(Self::OLDEST_UNSUPPORTED),
            Self::CURRENT_VERSION,
        )?;
        info!("player data version: {version}");
        self.version = version;

        self.health_max = r.read_f32()?;
        self.health = r.read_f32()?;
        self.stamina_max = r.read_f32()?;
        self.first_spawn = r.read_bool()?;
        self.time_since_death = r.read_f32()?;
        if version >= Self::GUARDIAN_NAME_SINCE {
            self.guardian_power.name = r.read_string()?;
        }
        if version >= Self::GUARDIAN_COOLDOWN_SINCE {
            self.guardian_power.cooldown = r.read_f32()?;
        }

        self.inventory = Inventory::decode_binary(r, ())?;
        self.known_recipes = read_strings(r, "known recipe")?;
        self.known_stations = read_records(r, (), "crafting station")?;
        self.discovered_materials = read_strings(r, "discovered material")?;
        self.shown_tutorials = read_strings(r, "shown tutorial")?;
        self.discovered_uniques = read_strings(r, "discovered unique")?;
        self.trophies = read_strings(r, "trophy")?;
        self.known_biomes = read_records(r, (), "known biome")?;
        if version >= Self::JOURNAL_SINCE {
            self.journal = read_records(r, (), "journal entry")?;
        }
        self.appearance = Appearance::decode_binary(r, ())?;
        self.active_food = read_records(r, (), "active food")?;
        self.skills = SkillList::decode_binary(r, ())?;
        Ok(())
    }

    fn encode_block<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_i32(Self::CURRENT_VERSION)?;
        w.write_f32(self.health_max)?;
        w.write_f32(self.health)?;
        w.write_f32(self.stamina_max)?;
        w.write_bool(self.first_spawn)?;
        w.write_f32(self.time_since_death)?;
        w.write_string(&self.guardian_power.name)?;
        w.write_f32(self.guardian_power.cooldown)?;

        self.inventory.encode_binary(w)?;
        write_strings(w, &self.known_recipes, "known recipe")?;
        write_records(w, &self.known_stations, "crafting station")?;
        write_strings(w, &self.discovered_materials, "discovered material")?;
        write_strings(w, &self.shown_tutorials, "shown tutorial")?;
        write_strings(w, &self.discovered_uniques, "discovered unique")?;
        write_strings(w, &self.trophies, "trophy")?;
        write_records(w, &self.known_biomes, "known biome")?;
        write_records(w, &self.journal, "journal entry")?;
        self.appearance.encode_binary(w)?;
        write_records(w, &self.active_food, "active food")?;
        self.skills.encode_binary(w)?;
        Ok(())
    }
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            name: String::new(),
            player_id: 0,
            start_seed: Vec::new(),
            version: Self::CURRENT_VERSION,
            health_max: 1.0,
            health: 1.0,
            stamina_max: 1.0,
            first_spawn: false,
            time_since_death: 0.0,
            guardian_power: GuardianPower::default(),
            inventory: Inventory::default(),
            known_recipes: Vec::new(),
            known_stations: Vec::new(),
            discovered_materials: Vec::new(),
            shown_tutorials: Vec::new(),
            discovered_uniques: Vec::new(),
            trophies: Vec::new(),
            known_biomes: Vec::new(),
            journal: Vec::new(),
            appearance: Appearance::default(),
            active_food: Vec::new(),
            skills: SkillList::default(),
        }
    }
}

impl Record for PlayerData {
    /// File version from `PlayerStats`.
    type Context = i32;

    fn decode_binary<R: Read + Seek>(
        r: &mut LittleEndianReader<R>,
        file_version: i32,
    ) -> CoreResult<Self> {
        let mut player = Self {
            name: r.read_string()?,
            player_id: r.read_i64()?,
            start_seed: r.read_byte_string()?,
            ..Self::default()
        };
        debug!(
            "player '{}' ({}), file version {file_version}",
            player.name, player.player_id
        );

        if !r.read_bool()? {
            info!("no player data block in file");
            player.version = 0;
            return Ok(player);
        }

        let declared = r.read_i32()?;
        let start = r.position()?;
        player
            .decode_block(r)
            .map_err(|e| e.context(format!("player '{}'", player.name)))?;
        let consumed = r.position()? - start;
        if i64::from(declared) != consumed as i64 {
            warn!("player data block declares {declared} bytes, decoded {consumed}");
        }
        Ok(player)
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_string(&self.name)?;
        w.write_i64(self.player_id)?;
        w.write_byte_string(&self.start_seed)?;
        w.write_bool(true)?;

        let slot = w.begin_length_prefix()?;
        self.encode_block(w)?;
        let written = w.finish_length_prefix(slot)?;
        debug!("player data block: {written} bytes");
        Ok(())
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let j = JsonFields::new("PlayerData", value)?;
        let health = j.get_f32("Health", 1.0)?;

        let guardian_power = match j.value("GuardianPower") {
            Some(power) => {
                let g = JsonFields::new("GuardianPower", power)?;
                GuardianPower {
                    name: g.get_str("Name", "")?,
                    cooldown: g.get_f32("Cooldown", 0.0)?,
                }
            }
            None => GuardianPower::default(),
        };
        let inventory = match j.value("Inventory") {
            Some(items) => Inventory::decode_json(items)?,
            None => Inventory::default(),
        };
        let skills = match j.value("Skills") {
            Some(list) => SkillList::decode_json(list)?,
            None => SkillList::default(),
        };
        let appearance = match j.value("Appearance") {
            Some(look) => Appearance::decode_json(look)?,
            None => Appearance::default(),
        };

        Ok(Self {
            name: j.get_str("PlayerName", "")?,
            player_id: j.get_i64("PlayerID", 0)?,
            start_seed: j.get_hex("StartSeed")?,
            version: Self::CURRENT_VERSION,
            health_max: j.get_f32("HealthMax", health)?,
            health,
            stamina_max: j.get_f32("StaminaMax", 1.0)?,
            first_spawn: j.get_bool("FirstSpawn", false)?,
            time_since_death: j.get_f32("TimeSinceDeath", 0.0)?,
            guardian_power,
            inventory,
            known_recipes: j.get_str_list("KnownRecipes")?,
            known_stations: j.get_records("CraftingStations", CraftingStation::decode_json)?,
            discovered_materials: j.get_str_list("DiscoveredMaterials")?,
            shown_tutorials: j.get_str_list("ShownTutorials")?,
            discovered_uniques: j.get_str_list("DiscoveredUniques")?,
            trophies: j.get_str_list("Trophies")?,
            known_biomes: j.get_records("KnownBiomes", Biome::decode_json)?,
            journal: j.get_records("Journal", JournalEntry::decode_json)?,
            appearance,
            active_food: j.get_records("ActiveFood", ActiveFood::decode_json)?,
            skills,
        })
    }

    fn encode_json(&self) -> JsonValue {
        let mut power = JsonMap::new();
        power.insert(
            "Name".to_string(),
            JsonValue::String(self.guardian_power.name.clone()),
        );
        power.insert(
            "Cooldown".to_string(),
            f32_to_json(self.guardian_power.cooldown),
        );

        let mut out = JsonMap::new();
        out.insert("PlayerName".to_string(), JsonValue::String(self.name.clone()));
        out.insert("PlayerID".to_string(), JsonValue::from(self.player_id));
        out.insert(
            "StartSeed".to_string(),
            JsonValue::String(hex::encode(&self.start_seed)),
        );
        out.insert("Health".to_string(), f32_to_json(self.health));
        out.insert("HealthMax".to_string(), f32_to_json(self.health_max));
        out.insert("StaminaMax".to_string(), f32_to_json(self.stamina_max));
        out.insert("FirstSpawn".to_string(), JsonValue::Bool(self.first_spawn));
        out.insert(
            "TimeSinceDeath".to_string(),
            f32_to_json(self.time_since_death),
        );
        out.insert("GuardianPower".to_string(), JsonValue::Object(power));
        out.insert("ActiveFood".to_string(), records_to_json(&self.active_food));
        out.insert("Appearance".to_string(), self.appearance.encode_json());
        out.insert("Inventory".to_string(), self.inventory.encode_json());
        out.insert("Skills".to_string(), self.skills.encode_json());
        out.insert("KnownBiomes".to_string(), records_to_json(&self.known_biomes));
        out.insert(
            "CraftingStations".to_string(),
            records_to_json(&self.known_stations),
        );
        out.insert("KnownRecipes".to_string(), str_list_to_json(&self.known_recipes));
        out.insert(
            "DiscoveredMaterials".to_string(),
            str_list_to_json(&self.discovered_materials),
        );
        out.insert(
            "ShownTutorials".to_string(),
            str_list_to_json(&self.shown_tutorials),
        );
        out.insert(
            "DiscoveredUniques".to_string(),
            str_list_to_json(&self.discovered_uniques),
        );
        out.insert("Trophies".to_string(), str_list_to_json(&self.trophies));
        out.insert("Journal".to_string(), records_to_json(&self.journal));
        JsonValue::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serde_json::json;

    use super::*;
    use crate::character::inventory::InventoryItem;
    use crate::character::skills::Skill;
    use crate::codex::SkillType;
    use crate::core_api::CoreErrorCode;

    fn sample_player() -> PlayerData {
        PlayerData {
            name: "Sigrun".to_string(),
            player_id: 76_561_198_000_000_001,
            start_seed: vec![0xde, 0xad, 0x00, 0x7f],
            health_max: 50.0,
            health: 31.5,
            stamina_max: 75.0,
            first_spawn: false,
            time_since_death: 812.25,
            guardian_power: GuardianPower {
                name: "GP_Eikthyr".to_string(),
                cooldown: 120.0,
            },
            inventory: Inventory {
                version: Inventory::CURRENT_VERSION,
                items: vec![InventoryItem {
                    name: "AxeFlint".to_string(),
                    count: 1,
                    slot: [1, 0],
                    equipped: true,
                    ..InventoryItem::default()
                }],
            },
            known_recipes: vec!["Recipe_Club".to_string(), "Recipe_Torch".to_string()],
            known_stations: vec![CraftingStation {
                name: "$piece_workbench".to_string(),
                level: 2,
            }],
            discovered_materials: vec!["Wood".to_string()],
            shown_tutorials: vec!["hammer".to_string()],
            discovered_uniques: vec!["Vegvisir".to_string()],
            trophies: vec!["TrophyBoar".to_string()],
            known_biomes: vec![Biome::from_raw(1), Biome::from_raw(8), Biome::from_raw(1024)],
            journal: vec![JournalEntry {
                label: "Day 1".to_string(),
                text: "Landed.".to_string(),
            }],
            appearance: Appearance {
                beard: "Beard5".to_string(),
                hair: "Hair3".to_string(),
                complexion: [0.8, 0.6, 0.5],
                hair_color: [0.2, 0.1, 0.05],
                body_type: 1,
            },
            active_food: vec![ActiveFood {
                name: "CookedMeat".to_string(),
                health: 12.0,
                stamina: 8.5,
            }],
            skills: SkillList {
                version: SkillList::CURRENT_VERSION,
                skills: vec![Skill {
                    skill: SkillType::from_raw(7),
                    level: 9.0,
                    experience: 0.5,
                }],
            },
            ..PlayerData::default()
        }
    }

    fn encode(player: &PlayerData) -> Vec<u8> {
        let mut w = LittleEndianWriter::new(Cursor::new(Vec::new()));
        player.encode_binary(&mut w).unwrap();
        w.into_inner().into_inner()
    }

    #[test]
    fn binary_round_trip() {
        let player = sample_player();
        let bytes = encode(&player);
        let mut r = LittleEndianReader::new(Cursor::new(bytes.as_slice()));
        let decoded = PlayerData::decode_binary(&mut r, 33).unwrap();
        assert_eq!(decoded, player);
        assert_eq!(r.position().unwrap(), bytes.len() as u64);
    }

    #[test]
    fn block_byte_count_is_patched() {
        let player = sample_player();
        let bytes = encode(&player);
        // name (1 + 6) + id (8) + seed (1 + 4) + flag (1)
        let prefix_at = 7 + 8 + 5 + 1;
        let declared = i32::from_le_bytes(bytes[prefix_at..prefix_at + 4].try_into().unwrap());
        assert_eq!(declared as usize, bytes.len() - prefix_at - 4);
    }

    #[test]
    fn header_only_player() {
        let mut w = LittleEndianWriter::new(Cursor::new(Vec::new()));
        w.write_string("Nobody").unwrap();
        w.write_i64(3).unwrap();
        w.write_byte_string(&[]).unwrap();
        w.write_bool(false).unwrap();
        let bytes = w.into_inner().into_inner();

        let mut r = LittleEndianReader::new(Cursor::new(bytes.as_slice()));
        let player = PlayerData::decode_binary(&mut r, 33).unwrap();
        assert_eq!(player.name, "Nobody");
        assert!(!player.has_block());
        assert!(player.inventory.items.is_empty());
    }

    fn header_then_version(version: i32) -> Vec<u8> {
        let mut w = LittleEndianWriter::new(Cursor::new(Vec::new()));
        w.write_string("Old").unwrap();
        w.write_i64(1).unwrap();
        w.write_byte_string(&[]).unwrap();
        w.write_bool(true).unwrap();
        w.write_i32(0).unwrap();
        w.write_i32(version).unwrap();
        w.into_inner().into_inner()
    }

    #[test]
    fn versions_outside_window_are_rejected() {
        for version in [20, 25] {
            let bytes = header_then_version(version);
            let mut r = LittleEndianReader::new(Cursor::new(bytes.as_slice()));
            let err = PlayerData::decode_binary(&mut r, 33).unwrap_err();
            assert_eq!(err.code, CoreErrorCode::UnsupportedVersion, "{version}");
        }
    }

    #[test]
    fn version_21_skips_journal_and_guardian_power() {
        let header = header_then_version(21);
        let end = header.len() as u64;
        let mut w = LittleEndianWriter::new(Cursor::new(header));
        w.seek_to(end).unwrap();
        w.write_f32_slice(&[25.0, 25.0, 50.0]).unwrap();
        w.write_bool(true).unwrap();
        w.write_f32(0.0).unwrap();
        Inventory::default().encode_binary(&mut w).unwrap();
        for _ in 0..7 {
            // recipes, stations, materials, tutorials, uniques, trophies, biomes
            w.write_i32(0).unwrap();
        }
        Appearance::default().encode_binary(&mut w).unwrap();
        w.write_i32(0).unwrap();
        SkillList::default().encode_binary(&mut w).unwrap();
        let bytes = w.into_inner().into_inner();

        let mut r = LittleEndianReader::new(Cursor::new(bytes.as_slice()));
        let player = PlayerData::decode_binary(&mut r, 33).unwrap();
        assert_eq!(player.version, 21);
        assert_eq!(player.stamina_max, 50.0);
        assert!(player.first_spawn);
        assert_eq!(player.guardian_power, GuardianPower::default());
        assert!(player.journal.is_empty());
        assert_eq!(r.position().unwrap(), bytes.len() as u64);
    }

    #[test]
    fn json_round_trip_and_key_order() {
        let player = sample_player();
        let json = player.encode_json();
        assert_eq!(json["StartSeed"], "dead007f");
        assert_eq!(json["KnownBiomes"], json!(["Meadows", "BlackForest", "0x400"]));
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys[..4], ["PlayerName", "PlayerID", "StartSeed", "Health"]);
        assert_eq!(keys.last(), Some(&"Journal"));
        assert_eq!(PlayerData::decode_json(&json).unwrap(), player);
    }

    #[test]
    fn json_defaults() {
        let player = PlayerData::decode_json(&json!({"Health": 40})).unwrap();
        assert_eq!(player.version, PlayerData::CURRENT_VERSION);
        assert_eq!(player.health, 40.0);
        assert_eq!(player.health_max, 40.0);
        assert_eq!(player.stamina_max, 1.0);
        assert!(player.start_seed.is_empty());
        assert!(player.discovered_uniques.is_empty());
    }

    #[test]
    fn biome_must_be_a_string() {
        let err = PlayerData::decode_json(&json!({"KnownBiomes": [1]})).unwrap_err();
        assert_eq!(err.code, CoreErrorCode::TypeMismatch);
        assert!(err.message.contains("KnownBiomes[0]"));
    }
}
