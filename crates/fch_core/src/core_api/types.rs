use serde::{Deserialize, Serialize};

/// Where a session's character came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    Binary,
    Projection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub origin: Origin,
    pub player_name: String,
    pub player_id: i64,
    pub file_version: i32,
    /// `None` when the file carried no player data block.
    pub player_data_version: Option<i32>,
    pub kills: i32,
    pub deaths: i32,
    pub crafts: i32,
    pub builds: i32,
    pub world_count: usize,
    pub inventory_items: usize,
    pub known_biomes: Vec<String>,
    pub checksum_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldEntry {
    pub index: usize,
    pub uid: i64,
    pub has_death_point: bool,
    pub map_edge: Option<usize>,
    pub explored_cells: usize,
    pub markers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillEntry {
    pub name: String,
    pub code: i32,
    pub level: f32,
    pub experience: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemEntry {
    pub name: String,
    pub count: i32,
    pub slot: [i32; 2],
    pub equipped: bool,
    pub durability: f32,
}
