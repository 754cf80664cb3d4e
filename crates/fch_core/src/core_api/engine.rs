use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use log::info;
use serde_json::Value as JsonValue;

use crate::character::Character;
use crate::envelope::ChecksumMode;
use crate::projection;

use super::error::CoreError;
use super::types::{ItemEntry, Origin, SkillEntry, Snapshot, WorldEntry};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine {
    checksum: ChecksumMode,
}

#[derive(Debug)]
pub struct Session {
    origin: Origin,
    checksum: ChecksumMode,
    snapshot: Snapshot,
    character: Character,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checksum(checksum: ChecksumMode) -> Self {
        Self { checksum }
    }

    pub fn checksum_mode(&self) -> ChecksumMode {
        self.checksum
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let character = Character::from_bytes(bytes.as_ref(), self.checksum)?;
        Ok(self.session(character, Origin::Binary))
    }

    pub fn open_path<P: AsRef<Path>>(&self, path: P) -> Result<Session, CoreError> {
        let path = path.as_ref();
        info!("loading {}", path.display());
        let bytes = fs::read(path).map_err(|e| CoreError::from(e).context(path.display().to_string()))?;
        self.open_bytes(bytes)
            .map_err(|e| e.context(path.display().to_string()))
    }

    /// Gather a character from a directory written by [`Session::destruct`].
    pub fn construct<P: AsRef<Path>>(&self, dir: P) -> Result<Session, CoreError> {
        let character = projection::construct(dir.as_ref())?;
        Ok(self.session(character, Origin::Projection))
    }

    /// Wrap an already built tree, e.g. one assembled by hand.
    pub fn adopt(&self, character: Character) -> Session {
        self.session(character, Origin::Projection)
    }

    fn session(&self, character: Character, origin: Origin) -> Session {
        let snapshot = build_snapshot(&character, origin, self.checksum);
        Session {
            origin,
            checksum: self.checksum,
            snapshot,
            character,
        }
    }
}

impl Session {
    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn into_character(self) -> Character {
        self.character
    }

    pub fn worlds(&self) -> Vec<WorldEntry> {
        self.character
            .worlds
            .iter()
            .enumerate()
            .map(|(index, world)| {
                let visibility = world.visibility.as_ref();
                WorldEntry {
                    index,
                    uid: world.uid,
                    has_death_point: world.death_point.is_some(),
                    map_edge: visibility.map(|v| v.edge_length()),
                    explored_cells: visibility.map_or(0, |v| v.explored.count_set()),
                    markers: visibility.map_or(0, |v| v.markers.len()),
                }
            })
            .collect()
    }

    pub fn skills(&self) -> Vec<SkillEntry> {
        self.character
            .player
            .skills
            .skills
            .iter()
            .map(|skill| SkillEntry {
                name: skill.skill.name(),
                code: skill.skill.raw(),
                level: skill.level,
                experience: skill.experience,
            })
            .collect()
    }

    pub fn inventory(&self) -> Vec<ItemEntry> {
        self.character
            .player
            .inventory
            .items
            .iter()
            .map(|item| ItemEntry {
                name: item.name.clone(),
                count: item.count,
                slot: item.slot,
                equipped: item.equipped,
                durability: item.durability,
            })
            .collect()
    }

    pub fn to_json(&self) -> JsonValue {
        self.character.to_json()
    }

    /// Encode at the newest layout with a fresh checksum.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        self.character.to_bytes(self.checksum)
    }

    pub fn save_path<P: AsRef<Path>>(&self, path: P, overwrite: bool) -> Result<(), CoreError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        let mut file = options
            .open(path)
            .map_err(|e| CoreError::from(e).context(path.display().to_string()))?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        info!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    pub fn destruct<P: AsRef<Path>>(&self, dir: P, overwrite: bool) -> Result<(), CoreError> {
        projection::destruct(&self.character, dir.as_ref(), overwrite)
    }
}

fn build_snapshot(character: &Character, origin: Origin, checksum: ChecksumMode) -> Snapshot {
    let player = &character.player;
    let stats = &character.stats;
    Snapshot {
        origin,
        player_name: player.name.clone(),
        player_id: player.player_id,
        file_version: stats.version,
        player_data_version: player.has_block().then_some(player.version),
        kills: stats.kills,
        deaths: stats.deaths,
        crafts: stats.crafts,
        builds: stats.builds,
        world_count: character.worlds.len(),
        inventory_items: player.inventory.items.len(),
        known_biomes: player.known_biomes.iter().map(|b| b.name()).collect(),
        checksum_verified: origin == Origin::Binary && checksum == ChecksumMode::Sha512,
    }
}
