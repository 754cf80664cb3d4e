use std::fs;

use fch_core::character::{Character, Inventory, InventoryItem, PlayerData, Skill, World};
use fch_core::codex::SkillType;
use fch_core::core_api::{CoreErrorCode, Engine, Origin};
use fch_core::envelope::ChecksumMode;

fn character() -> Character {
    let mut player = PlayerData {
        name: "Astrid".to_string(),
        player_id: 7,
        inventory: Inventory {
            items: vec![
                InventoryItem {
                    name: "Torch".to_string(),
                    count: 1,
                    slot: [0, 0],
                    equipped: true,
                    ..InventoryItem::default()
                },
                InventoryItem {
                    name: "Stone".to_string(),
                    count: 18,
                    slot: [1, 0],
                    ..InventoryItem::default()
                },
            ],
            ..Inventory::default()
        },
        ..PlayerData::default()
    };
    player.skills.skills.push(Skill {
        skill: SkillType::from_raw(0x67),
        level: 4.0,
        experience: 1.5,
    });
    Character {
        worlds: vec![World {
            uid: 55,
            ..World::default()
        }],
        player,
        ..Character::default()
    }
}

#[test]
fn engine_opens_encoded_bytes() {
    let bytes = character().to_bytes(ChecksumMode::Sha512).expect("encode");
    let session = Engine::new().open_bytes(&bytes).expect("open");

    assert_eq!(session.origin(), Origin::Binary);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.player_name, "Astrid");
    assert_eq!(snapshot.player_data_version, Some(PlayerData::CURRENT_VERSION));
    assert_eq!(snapshot.world_count, 1);
    assert_eq!(snapshot.inventory_items, 2);
    assert!(snapshot.checksum_verified);

    let skills = session.skills();
    assert_eq!(skills[0].name, "Swimming");
    assert_eq!(session.inventory()[1].count, 18);
    assert_eq!(session.worlds()[0].map_edge, None);
    assert_eq!(session.to_bytes().expect("re-encode"), bytes);
}

#[test]
fn degraded_engine_skips_verification() {
    let mut bytes = character().to_bytes(ChecksumMode::Sha512).expect("encode");
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;

    let err = Engine::new().open_bytes(&bytes).expect_err("bad digest");
    assert_eq!(err.code, CoreErrorCode::IntegrityMismatch);
    assert!(err.to_string().starts_with("IntegrityMismatch: "));

    let session = Engine::with_checksum(ChecksumMode::Disabled)
        .open_bytes(&bytes)
        .expect("degraded open");
    assert!(!session.snapshot().checksum_verified);
}

#[test]
fn save_path_respects_overwrite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("astrid.fch");
    let engine = Engine::new();
    let session = engine.adopt(character());

    session.save_path(&path, false).expect("first save");
    let err = session.save_path(&path, false).expect_err("file exists");
    assert_eq!(err.code, CoreErrorCode::Io);
    session.save_path(&path, true).expect("overwrite");

    let reloaded = engine.open_path(&path).expect("reload");
    assert_eq!(reloaded.character(), session.character());
    assert_eq!(fs::read(&path).expect("read"), session.to_bytes().expect("encode"));
}

#[test]
fn session_destruct_and_engine_construct() {
    let dir = tempfile::tempdir().expect("tempdir");
    let engine = Engine::new();
    let session = engine.adopt(character());
    session.destruct(dir.path().join("out"), false).expect("destruct");

    let rebuilt = engine.construct(dir.path().join("out")).expect("construct");
    assert_eq!(rebuilt.origin(), Origin::Projection);
    assert_eq!(rebuilt.character(), session.character());
}

#[test]
fn snapshot_serializes() {
    let session = Engine::new().adopt(character());
    let json = serde_json::to_value(session.snapshot()).expect("serialize");
    assert_eq!(json["player_name"], "Astrid");
    assert_eq!(json["origin"], "Projection");
}
