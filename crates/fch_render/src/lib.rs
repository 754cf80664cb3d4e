use std::fmt::{Display, Write as _};

use fch_core::character::{Character, PlayerData, World, WorldVisibility};
use fch_core::core_api::{Session, Snapshot};
use serde_json::{Map as JsonMap, Value as JsonValue};

const LINE_WIDTH: usize = 78;
const MIN_RULE: usize = 6;
const SEED_BYTES_PER_LINE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// List every recipe, material, tutorial and trophy instead of a count.
    pub verbose: bool,
}

/// Indentation-nested `Key: value` lines.
struct Tree {
    out: String,
    depth: usize,
}

impl Tree {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: impl Display) {
        let _ = writeln!(self.out, "{}{text}", "  ".repeat(self.depth));
    }

    fn field(&mut self, key: &str, value: impl Display) {
        self.line(format_args!("{key}: {value}"));
    }

    /// A ruled heading; everything until the matching `close` nests under it.
    fn open(&mut self, label: &str) {
        let rule = LINE_WIDTH
            .checked_sub(label.len() + 2 * self.depth)
            .filter(|&n| n > 0)
            .unwrap_or(MIN_RULE);
        self.line(format_args!("{label} {}", "-".repeat(rule)));
        self.depth += 1;
    }

    /// A `Key:` line with its children indented below it.
    fn nest(&mut self, key: &str) {
        self.line(format_args!("{key}:"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn finish(self) -> String {
        self.out
    }
}

fn float(v: f32) -> String {
    format!("{v:?}")
}

fn point(p: &[f32; 3]) -> String {
    format!("({}, {}, {})", float(p[0]), float(p[1]), float(p[2]))
}

fn optional_point(p: Option<&[f32; 3]>) -> String {
    p.map_or_else(|| "None".to_string(), point)
}

pub fn render_text(session: &Session) -> String {
    render_text_with_options(session, TextRenderOptions::default())
}

pub fn render_text_with_options(session: &Session, options: TextRenderOptions) -> String {
    render_character(session.character(), options)
}

pub fn render_character(character: &Character, options: TextRenderOptions) -> String {
    let mut t = Tree::new();

    t.open("Player Stats");
    t.field("File Version", character.stats.version);
    t.field("Kills", character.stats.kills);
    t.field("Deaths", character.stats.deaths);
    t.field("Crafts", character.stats.crafts);
    t.field("Builds", character.stats.builds);
    t.close();

    t.open("World Data");
    t.field("Worlds Visited", character.worlds.len());
    for (index, world) in character.worlds.iter().enumerate() {
        t.open(&format!("World {index}"));
        write_world(&mut t, world);
        t.close();
    }
    t.close();

    t.open("Player Data");
    write_player(&mut t, &character.player, options);
    t.close();

    t.finish()
}

fn write_world(t: &mut Tree, world: &World) {
    t.field("UID", world.uid);
    t.field("Spawn Point (X,Y,Z)", optional_point(world.spawn_point.as_ref()));
    t.field("Logout Point (X,Y,Z)", optional_point(world.logout_point.as_ref()));
    t.field("Death Point (X,Y,Z)", optional_point(world.death_point.as_ref()));
    t.field("Home Point (X,Y,Z)", point(&world.home_point));
    match &world.visibility {
        Some(visibility) => {
            t.nest("Visibility Data");
            write_visibility(t, visibility);
            t.close();
        }
        None => t.field("Visibility Data", "None"),
    }
}

fn write_visibility(t: &mut Tree, visibility: &WorldVisibility) {
    t.field("Visibility Info Version", visibility.version);
    t.field("Edge Length", visibility.edge_length());
    t.field("Explored Cells", visibility.explored.count_set());
    t.field("Public Position On Map", visibility.public_position);
    t.nest("Map Markers");
    t.field("Count", visibility.markers.len());
    for (index, marker) in visibility.markers.iter().enumerate() {
        t.nest(&index.to_string());
        t.field("Text", &marker.text);
        t.field("Point (X,Y,Z)", point(&marker.point));
        t.field("Symbol", marker.symbol);
        t.field("Crossed", marker.crossed);
        t.close();
    }
    t.close();
}

fn write_seed(t: &mut Tree, seed: &[u8]) {
    if seed.len() <= 4 {
        let bytes: Vec<String> = seed.iter().map(|b| format!("{b:02x}")).collect();
        t.field("Starting Seed", format_args!("{{ {} }}", bytes.join(" ")));
        return;
    }
    t.nest("Starting Seed");
    for (row, chunk) in seed.chunks(SEED_BYTES_PER_LINE).enumerate() {
        let bytes: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        t.line(format_args!("{:06x}: {}", row * SEED_BYTES_PER_LINE, bytes.join(" ")));
    }
    t.close();
}

fn write_strings(t: &mut Tree, key: &str, items: &[String], verbose: bool) {
    t.nest(key);
    t.field("Count", items.len());
    if verbose {
        for (index, item) in items.iter().enumerate() {
            t.field(&index.to_string(), item);
        }
    }
    t.close();
}

fn write_player(t: &mut Tree, player: &PlayerData, options: TextRenderOptions) {
    t.field("Player Name", &player.name);
    t.field("Player ID", player.player_id);
    write_seed(t, &player.start_seed);
    if !player.has_block() {
        t.line("No player data block");
        return;
    }

    t.field("Player Version", player.version);
    t.field("Health", float(player.health));
    t.field("Max Health", float(player.health_max));
    t.field("Max Stamina", float(player.stamina_max));
    t.field("First Spawn", player.first_spawn);
    t.field("Time Since Death", float(player.time_since_death));
    t.nest("Guardian Power");
    t.field("Name", &player.guardian_power.name);
    t.field("Cooldown", float(player.guardian_power.cooldown));
    t.close();

    t.nest("Active Food");
    t.field("Count", player.active_food.len());
    for (index, food) in player.active_food.iter().enumerate() {
        t.nest(&index.to_string());
        t.field("Name", &food.name);
        t.field("Health Remaining", float(food.health));
        t.field("Stamina Remaining", float(food.stamina));
        t.close();
    }
    t.close();

    let look = &player.appearance;
    t.nest("Appearance");
    t.field("Beard", if look.beard.is_empty() { "<None>" } else { look.beard.as_str() });
    t.field("Hair", if look.hair.is_empty() { "<None>" } else { look.hair.as_str() });
    t.field("Complexion (R,G,B)", point(&look.complexion));
    t.field("Hair Color (R,G,B)", point(&look.hair_color));
    match look.body_type {
        0 => t.field("Body Type", "Male"),
        1 => t.field("Body Type", "Female"),
        other => t.field("Body Type", other),
    }
    t.close();

    t.nest("Inventory");
    t.field("Version", player.inventory.version);
    t.field("Count", player.inventory.items.len());
    for (index, item) in player.inventory.items.iter().enumerate() {
        t.nest(&index.to_string());
        t.field("Name", &item.name);
        t.field("Count", item.count);
        t.field("Durability", float(item.durability));
        t.field("Slot (X,Y)", format_args!("({}, {})", item.slot[0], item.slot[1]));
        t.field("Equipped", item.equipped);
        t.field("Level", item.level);
        t.field("Style", item.style);
        t.field("Crafter ID", item.crafter_id);
        t.field("Crafter Name", &item.crafter_name);
        t.close();
    }
    t.close();

    t.nest("Skills");
    t.field("Version", player.skills.version);
    t.field("Count", player.skills.skills.len());
    for (index, skill) in player.skills.skills.iter().enumerate() {
        t.nest(&index.to_string());
        t.field("Name", skill.skill);
        t.field("Level", float(skill.level));
        t.field("Experience", float(skill.experience));
        t.close();
    }
    t.close();

    t.nest("Known Biomes");
    t.field("Count", player.known_biomes.len());
    for (index, biome) in player.known_biomes.iter().enumerate() {
        t.field(&index.to_string(), biome);
    }
    t.close();

    t.nest("Crafting Stations");
    t.field("Count", player.known_stations.len());
    for (index, station) in player.known_stations.iter().enumerate() {
        t.nest(&index.to_string());
        t.field("Name", &station.name);
        t.field("Level", station.level);
        t.close();
    }
    t.close();

    write_strings(t, "Known Recipes", &player.known_recipes, options.verbose);
    write_strings(t, "Discovered Materials", &player.discovered_materials, options.verbose);
    write_strings(t, "Shown Tutorials", &player.shown_tutorials, options.verbose);
    write_strings(t, "Trophies", &player.trophies, options.verbose);
    write_strings(t, "Discovered Uniques", &player.discovered_uniques, options.verbose);

    t.nest("Journal");
    t.field("Count", player.journal.len());
    for (index, entry) in player.journal.iter().enumerate() {
        t.nest(&index.to_string());
        t.field("Label", &entry.label);
        t.field("Text", &entry.text);
        t.close();
    }
    t.close();
}

/// The full editable tree, worlds inline.
pub fn render_json_tree(session: &Session) -> JsonValue {
    session.to_json()
}

/// A compact overview: snapshot fields plus per-world, skill and inventory
/// tables.
pub fn render_json_summary(session: &Session) -> JsonValue {
    let mut out = summary_fields(session.snapshot());

    out.insert(
        "worlds".to_string(),
        JsonValue::Array(
            session
                .worlds()
                .into_iter()
                .map(|w| {
                    let mut m = JsonMap::new();
                    m.insert("index".to_string(), JsonValue::from(w.index));
                    m.insert("uid".to_string(), JsonValue::from(w.uid));
                    m.insert("map_edge".to_string(), w.map_edge.map_or(JsonValue::Null, JsonValue::from));
                    m.insert("explored_cells".to_string(), JsonValue::from(w.explored_cells));
                    m.insert("markers".to_string(), JsonValue::from(w.markers));
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );
    out.insert(
        "skills".to_string(),
        JsonValue::Array(
            session
                .skills()
                .into_iter()
                .map(|s| {
                    let mut m = JsonMap::new();
                    m.insert("name".to_string(), JsonValue::String(s.name));
                    m.insert("level".to_string(), JsonValue::from(f64::from(s.level)));
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );
    out.insert(
        "equipped".to_string(),
        JsonValue::Array(
            session
                .inventory()
                .into_iter()
                .filter(|item| item.equipped)
                .map(|item| JsonValue::String(item.name))
                .collect(),
        ),
    );
    JsonValue::Object(out)
}

fn summary_fields(snapshot: &Snapshot) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert(
        "name".to_string(),
        JsonValue::String(snapshot.player_name.clone()),
    );
    out.insert("id".to_string(), JsonValue::from(snapshot.player_id));
    out.insert(
        "file_version".to_string(),
        JsonValue::from(snapshot.file_version),
    );
    out.insert(
        "player_data_version".to_string(),
        snapshot
            .player_data_version
            .map_or(JsonValue::Null, JsonValue::from),
    );
    out.insert("kills".to_string(), JsonValue::from(snapshot.kills));
    out.insert("deaths".to_string(), JsonValue::from(snapshot.deaths));
    out.insert("crafts".to_string(), JsonValue::from(snapshot.crafts));
    out.insert("builds".to_string(), JsonValue::from(snapshot.builds));
    out.insert(
        "biomes".to_string(),
        JsonValue::Array(
            snapshot
                .known_biomes
                .iter()
                .cloned()
                .map(JsonValue::String)
                .collect(),
        ),
    );
    out.insert(
        "checksum_verified".to_string(),
        JsonValue::Bool(snapshot.checksum_verified),
    );
    out
}
