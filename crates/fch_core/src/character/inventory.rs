use std::io::{Read, Seek, Write};

use log::info;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::core_api::{CoreResult, check_version};
use crate::json::{JsonFields, decode_list, f32_to_json};
use crate::reader::LittleEndianReader;
use crate::record::{Record, read_records, records_to_json, write_records};
use crate::writer::LittleEndianWriter;

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub name: String,
    pub count: i32,
    pub durability: f32,
    pub slot: [i32; 2],
    pub equipped: bool,
    pub level: i32,
    pub style: i32,
    pub crafter_id: i64,
    pub crafter_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    pub version: i32,
    pub items: Vec<InventoryItem>,
}

impl Default for InventoryItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            count: 0,
            durability: 100.0,
            slot: [0, 0],
            equipped: false,
            level: 0,
            style: 0,
            crafter_id: 0,
            crafter_name: String::new(),
        }
    }
}

impl Record for InventoryItem {
    /// Owning inventory version.
    type Context = i32;

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, version: i32) -> CoreResult<Self> {
        let mut item = Self {
            name: r.read_string()?,
            count: r.read_i32()?,
            durability: r.read_f32()?,
            slot: r.read_i32_array::<2>()?,
            equipped: r.read_bool()?,
            level: 0,
            style: 0,
            crafter_id: 0,
            crafter_name: String::new(),
        };
        if version >= Inventory::LEVEL_SINCE {
            item.level = r.read_i32()?;
        }
        if version >= Inventory::STYLE_SINCE {
            item.style = r.read_i32()?;
        }
        if version >= Inventory::CRAFTER_SINCE {
            item.crafter_id = r.read_i64()?;
            item.crafter_name = r.read_string()?;
        }
        Ok(item)
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_string(&self.name)?;
        w.write_i32(self.count)?;
        w.write_f32(self.durability)?;
        w.write_i32_slice(&self.slot)?;
        w.write_bool(self.equipped)?;
        w.write_i32(self.level)?;
        w.write_i32(self.style)?;
        w.write_i64(self.crafter_id)?;
        w.write_string(&self.crafter_name)?;
        Ok(())
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let j = JsonFields::new("InventoryItem", value)?;
        Ok(Self {
            name: j.get_str("Name", "")?,
            count: j.get_i32("Count", 0)?,
            durability: j.get_f32("Durability", 100.0)?,
            slot: j.get_i32_array("SlotXY", [0, 0])?,
            equipped: j.get_bool("Equipped", false)?,
            level: j.get_i32("Level", 0)?,
            style: j.get_i32("Style", 0)?,
            crafter_id: j.get_i64("CrafterID", 0)?,
            crafter_name: j.get_str("CrafterName", "")?,
        })
    }

    fn encode_json(&self) -> JsonValue {
        let mut out = JsonMap::new();
        out.insert("Name".to_string(), JsonValue::String(self.name.clone()));
        out.insert("Count".to_string(), JsonValue::from(self.count));
        out.insert("Durability".to_string(), f32_to_json(self.durability));
        out.insert(
            "SlotXY".to_string(),
            JsonValue::Array(self.slot.iter().map(|&v| JsonValue::from(v)).collect()),
        );
        out.insert("Equipped".to_string(), JsonValue::Bool(self.equipped));
        out.insert("Level".to_string(), JsonValue::from(self.level));
        out.insert("Style".to_string(), JsonValue::from(self.style));
        out.insert("CrafterID".to_string(), JsonValue::from(self.crafter_id));
        out.insert(
            "CrafterName".to_string(),
            JsonValue::String(self.crafter_name.clone()),
        );
        JsonValue::Object(out)
    }
}

impl Inventory {
    pub const CURRENT_VERSION: i32 = 103;
    pub const LEVEL_SINCE: i32 = 101;
    pub const STYLE_SINCE: i32 = 102;
    pub const CRAFTER_SINCE: i32 = 103;

    pub fn equipped(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter().filter(|item| item.equipped)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            items: Vec::new(),
        }
    }
}

impl Record for Inventory {
    type Context = ();

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, _: ()) -> CoreResult<Self> {
        let version = r.read_i32()?;
        check_version("inventory", version, None, Self::CURRENT_VERSION)?;
        info!("inventory version: {version}");
        let items = read_records::<InventoryItem, _>(r, version, "inventory item")?;
        Ok(Self { version, items })
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_i32(Self::CURRENT_VERSION)?;
        write_records(w, &self.items, "inventory item")
    }

    /// The JSON form is the bare item list.
    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let items = decode_list("Inventory", value, InventoryItem::decode_json)?;
        Ok(Self {
            version: Self::CURRENT_VERSION,
            items,
        })
    }

    fn encode_json(&self) -> JsonValue {
        records_to_json(&self.items)
    }
}
