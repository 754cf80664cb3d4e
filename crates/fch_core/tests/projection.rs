use std::fs;

use fch_core::bitmatrix::BitMatrix;
use fch_core::character::{
    Character, InventoryItem, MapMarker, PlayerData, PlayerStats, World, WorldVisibility,
};
use fch_core::codex::{Biome, MarkerSymbol};
use fch_core::core_api::CoreErrorCode;
use fch_core::envelope::ChecksumMode;
use fch_core::projection::{construct, destruct};

fn sample_character() -> Character {
    let mut explored = BitMatrix::new(8, 8).expect("matrix");
    explored.set(0, 0, true, false).expect("in bounds");
    explored.set(7, 3, true, false).expect("in bounds");

    let mut player = PlayerData {
        name: "Bjorn".to_string(),
        player_id: 42,
        start_seed: vec![0xaa, 0x55],
        known_biomes: vec![Biome::from_raw(2), Biome::from_raw(4096)],
        ..PlayerData::default()
    };
    player.inventory.items.push(InventoryItem {
        name: "Club".to_string(),
        count: 1,
        ..InventoryItem::default()
    });

    Character {
        stats: PlayerStats {
            kills: 12,
            ..PlayerStats::default()
        },
        worlds: vec![
            World {
                uid: 1001,
                spawn_point: Some([1.5, 2.0, 3.0]),
                home_point: [0.25, 0.0, -9.0],
                visibility: Some(WorldVisibility {
                    explored,
                    markers: vec![MapMarker {
                        text: "Troll".to_string(),
                        point: [5.0, 6.0, 7.0],
                        symbol: MarkerSymbol::from_raw(200),
                        crossed: true,
                    }],
                    ..WorldVisibility::default()
                }),
                ..World::default()
            },
            World {
                uid: 1002,
                death_point: Some([9.0, 9.0, 9.0]),
                ..World::default()
            },
        ],
        player,
    }
}

#[test]
fn destruct_then_construct_restores_the_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    let character = sample_character();
    destruct(&character, dir.path(), false).expect("destruct");

    for name in ["player.json", "world0.json", "world0.pbm", "world1.json"] {
        assert!(dir.path().join(name).is_file(), "{name} missing");
    }
    assert!(!dir.path().join("world1.pbm").exists());

    let world0: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("world0.json")).expect("read"))
            .expect("json");
    assert_eq!(world0["VisibilityData"]["MapMarkers"][0]["Symbol"], "0xc8");
    assert!(world0.get("LogoutPointXYZ").is_none());

    let rebuilt = construct(dir.path()).expect("construct");
    assert_eq!(rebuilt, character);

    let bytes = rebuilt.to_bytes(ChecksumMode::Sha512).expect("encode");
    let reloaded = Character::from_bytes(&bytes, ChecksumMode::Sha512).expect("sanity re-read");
    assert_eq!(reloaded, character);
}

#[test]
fn construct_without_image_leaves_matrix_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    destruct(&sample_character(), dir.path(), false).expect("destruct");
    fs::remove_file(dir.path().join("world0.pbm")).expect("remove image");

    let rebuilt = construct(dir.path()).expect("construct");
    let visibility = rebuilt.worlds[0].visibility.as_ref().expect("visibility kept");
    assert!(visibility.explored.is_empty());
    assert_eq!(visibility.markers.len(), 1);
}

#[test]
fn image_alone_creates_visibility() {
    let dir = tempfile::tempdir().expect("tempdir");
    destruct(&sample_character(), dir.path(), false).expect("destruct");
    fs::write(dir.path().join("world1.pbm"), "P1\n2 2\n10\n01\n").expect("write image");

    let rebuilt = construct(dir.path()).expect("construct");
    let visibility = rebuilt.worlds[1].visibility.as_ref().expect("visibility from image");
    assert_eq!(visibility.edge_length(), 2);
    assert_eq!(visibility.explored.count_set(), 2);
}

#[test]
fn non_square_image_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    destruct(&sample_character(), dir.path(), false).expect("destruct");
    fs::write(dir.path().join("world0.pbm"), "P1\n3 2\n000\n000\n").expect("write image");

    let err = construct(dir.path()).expect_err("3x2 image");
    assert_eq!(err.code, CoreErrorCode::MalformedStream);
}

#[test]
fn edited_json_with_wrong_type_is_a_type_mismatch() {
    let dir = tempfile::tempdir().expect("tempdir");
    destruct(&sample_character(), dir.path(), false).expect("destruct");
    fs::write(
        dir.path().join("player.json"),
        r#"{"PlayerStats": {"Kills": "many"}, "PlayerData": {}}"#,
    )
    .expect("write player");

    let err = construct(dir.path()).expect_err("string kills");
    assert_eq!(err.code, CoreErrorCode::TypeMismatch);
    assert!(err.message.contains("Kills"));
}

#[test]
fn missing_player_document_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = construct(dir.path()).expect_err("empty directory");
    assert_eq!(err.code, CoreErrorCode::Io);
}
