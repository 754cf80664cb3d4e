//! Spreads a character over a directory of editable files and gathers it
//! back:
//!
//! ```text
//! dir/player.json     PlayerStats + PlayerData
//! dir/world<N>.json   one per visited world
//! dir/world<N>.pbm    explored map of world N, when it has one
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::Value as JsonValue;

use crate::character::{Character, World, WorldVisibility};
use crate::core_api::{CoreError, CoreResult};
use crate::pbm::{read_pbm, write_pbm};
use crate::record::Record;

pub const PLAYER_FILE: &str = "player.json";

pub fn world_json_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("world{index}.json"))
}

pub fn world_pbm_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("world{index}.pbm"))
}

fn create_output(path: &Path, overwrite: bool) -> CoreResult<BufWriter<File>> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let file = options
        .open(path)
        .map_err(|e| CoreError::from(e).context(path.display().to_string()))?;
    Ok(BufWriter::new(file))
}

fn write_json(path: &Path, value: &JsonValue, overwrite: bool) -> CoreResult<()> {
    let mut out = create_output(path, overwrite)?;
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    debug!("wrote {}", path.display());
    Ok(())
}

fn read_json(path: &Path) -> CoreResult<JsonValue> {
    let file = File::open(path).map_err(|e| CoreError::from(e).context(path.display().to_string()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| CoreError::from(e).context(path.display().to_string()))
}

/// Write `character` into `dir`, creating it if needed. Existing files are
/// an error unless `overwrite` is set.
pub fn destruct(character: &Character, dir: &Path, overwrite: bool) -> CoreResult<()> {
    fs::create_dir_all(dir)?;
    info!("destructing into {}", dir.display());

    write_json(&dir.join(PLAYER_FILE), &character.player_document(), overwrite)?;
    for (index, world) in character.worlds.iter().enumerate() {
        write_json(&world_json_path(dir, index), &world.encode_json(), overwrite)?;
        if let Some(visibility) = &world.visibility {
            let path = world_pbm_path(dir, index);
            let out = create_output(&path, overwrite)?;
            write_pbm(out, &visibility.explored)
                .map_err(|e| e.context(path.display().to_string()))?;
            debug!("wrote {}", path.display());
        }
    }
    info!("wrote {} world(s)", character.worlds.len());
    Ok(())
}

/// World files in `dir` as `(index, path)`, ordered by index.
pub fn world_files(dir: &Path) -> CoreResult<Vec<(usize, PathBuf)>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let index = name
            .strip_prefix("world")
            .and_then(|rest| rest.strip_suffix(".json"))
            .and_then(|digits| digits.parse::<usize>().ok());
        match index {
            Some(index) => found.push((index, path)),
            None if name.starts_with("world") && name.ends_with(".json") => {
                warn!("ignoring {name}: no world index");
            }
            None => {}
        }
    }
    found.sort_by_key(|(index, _)| *index);
    Ok(found)
}

fn attach_image(world: &mut World, path: &Path) -> CoreResult<()> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("no explored-map image {}", path.display());
            return Ok(());
        }
        Err(e) => return Err(CoreError::from(e).context(path.display().to_string())),
    };
    let explored = read_pbm(BufReader::new(file)).map_err(|e| e.context(path.display().to_string()))?;
    if explored.width() != explored.height() {
        return Err(CoreError::malformed(format!(
            "{}: explored map must be square, got {}x{}",
            path.display(),
            explored.width(),
            explored.height()
        )));
    }
    world
        .visibility
        .get_or_insert_with(WorldVisibility::default)
        .explored = explored;
    Ok(())
}

/// Rebuild a character from the files [`destruct`] wrote.
pub fn construct(dir: &Path) -> CoreResult<Character> {
    info!("constructing from {}", dir.display());
    let player_doc = read_json(&dir.join(PLAYER_FILE))?;

    let mut worlds = Vec::new();
    for (index, json_path) in world_files(dir)? {
        let doc = read_json(&json_path)?;
        let mut world = World::decode_json(&doc).map_err(|e| e.context(json_path.display().to_string()))?;
        attach_image(&mut world, &world_pbm_path(dir, index))?;
        worlds.push(world);
    }
    info!("read {} world(s)", worlds.len());

    Character::from_documents(&player_doc, worlds)
        .map_err(|e| e.context(dir.join(PLAYER_FILE).display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_files_sort_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["world10.json", "world2.json", "world0.json", "world2.pbm", "worldx.json", "notes.txt"] {
            fs::write(dir.path().join(name), b"{}").unwrap();
        }
        let indices: Vec<usize> = world_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|(index, _)| index)
            .collect();
        assert_eq!(indices, vec![0, 2, 10]);
    }

    #[test]
    fn refuses_to_clobber_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let character = Character::default();
        destruct(&character, dir.path(), false).unwrap();
        assert!(destruct(&character, dir.path(), false).is_err());
        destruct(&character, dir.path(), true).unwrap();
    }
}
