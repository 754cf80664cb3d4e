use sha2::{Digest, Sha512};

use fch_core::character::{Character, PlayerData, PlayerStats, SkillList, WorldVisibility};
use fch_core::core_api::CoreErrorCode;
use fch_core::envelope::ChecksumMode;

/// Hand-assembled little-endian bytes, independent of the crate's writer.
#[derive(Default)]
struct Bytes(Vec<u8>);

impl Bytes {
    fn i32(&mut self, v: i32) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn i64(&mut self, v: i64) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn f32(&mut self, v: f32) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn bool(&mut self, v: bool) -> &mut Self {
        self.0.push(u8::from(v));
        self
    }

    fn xyz(&mut self, p: [f32; 3]) -> &mut Self {
        p.into_iter().for_each(|v| {
            self.f32(v);
        });
        self
    }

    /// Short strings only: a single-byte length prefix.
    fn str(&mut self, s: &str) -> &mut Self {
        assert!(s.len() < 128);
        self.0.push(s.len() as u8);
        self.0.extend_from_slice(s.as_bytes());
        self
    }

    fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.0.extend_from_slice(bytes);
        self
    }
}

fn visibility_block() -> Vec<u8> {
    let mut b = Bytes::default();
    b.i32(4).i32(4).raw(&[0u8; 16]);
    b.i32(1).str("Cave").xyz([120.5, 31.0, -64.25]).i32(3).bool(true);
    b.bool(false);
    b.0
}

fn player_block() -> Vec<u8> {
    let mut b = Bytes::default();
    b.i32(24).f32(50.0).f32(42.5).f32(75.0).bool(false).f32(1200.0);
    b.str("GP_Eikthyr").f32(300.0);
    // inventory
    b.i32(103).i32(1);
    b.str("AxeStone").i32(1).f32(93.5).i32(0).i32(0).bool(true);
    b.i32(1).i32(0).i64(-77).str("Sigrun");
    // recipes, stations, materials, tutorials, uniques, trophies
    b.i32(2).str("Recipe_Club").str("Recipe_Torch");
    b.i32(1).str("$piece_workbench").i32(1);
    b.i32(1).str("Wood");
    b.i32(0);
    b.i32(0);
    b.i32(1).str("TrophyBoar");
    // biomes, journal
    b.i32(2).i32(1).i32(8);
    b.i32(0);
    // appearance
    b.str("Beard2").str("Hair7").xyz([0.9, 0.7, 0.6]).xyz([0.3, 0.2, 0.1]).i32(0);
    // active food
    b.i32(1).str("Raspberry").f32(7.0).f32(20.0);
    // skills
    b.i32(2).i32(2).i32(0x0d).f32(12.0).f32(0.75).i32(0x66).f32(3.0).f32(0.0);
    b.0
}

fn payload() -> Vec<u8> {
    let mut b = Bytes::default();
    b.i32(33).i32(3).i32(1).i32(20).i32(40);

    let vis = visibility_block();
    b.i32(1).i64(0x5eed_0000_0001);
    b.bool(true).xyz([10.0, 30.0, 10.0]);
    b.bool(false).xyz([0.0; 3]);
    b.bool(false).xyz([0.0; 3]);
    b.xyz([11.0, 31.0, 12.0]);
    b.bool(true).i32(vis.len() as i32).raw(&vis);

    let block = player_block();
    b.str("Sigrun").i64(987_654_321);
    b.raw(&[3, 0x01, 0x02, 0x03]);
    b.bool(true).i32(block.len() as i32).raw(&block);
    b.0
}

fn container() -> Vec<u8> {
    let payload = payload();
    let mut b = Bytes::default();
    b.i32(payload.len() as i32).raw(&payload);
    b.i32(64).raw(Sha512::digest(&payload).as_slice());
    b.0
}

#[test]
fn synthetic_container_round_trips_byte_for_byte() {
    let bytes = container();
    let character = Character::from_bytes(&bytes, ChecksumMode::Sha512)
        .expect("failed to decode synthetic container");

    assert_eq!(character.stats.version, PlayerStats::CURRENT_VERSION);
    assert_eq!(character.stats.builds, 40);
    assert_eq!(character.worlds.len(), 1);

    let world = &character.worlds[0];
    assert_eq!(world.logout_point, None);
    let visibility = world.visibility.as_ref().expect("world has visibility");
    assert_eq!(visibility.version, WorldVisibility::CURRENT_VERSION);
    assert_eq!(visibility.edge_length(), 4);
    assert_eq!(visibility.explored.count_set(), 0);
    assert_eq!(visibility.markers.len(), 1);
    assert!(visibility.markers[0].crossed);
    assert_eq!(visibility.markers[0].symbol.name(), "Dot");

    let player = &character.player;
    assert_eq!(player.version, PlayerData::CURRENT_VERSION);
    assert_eq!(player.start_seed, vec![1, 2, 3]);
    assert_eq!(player.guardian_power.name, "GP_Eikthyr");
    assert_eq!(player.inventory.items[0].crafter_name, "Sigrun");
    assert_eq!(player.known_biomes[1].name(), "BlackForest");
    assert_eq!(player.skills.version, SkillList::CURRENT_VERSION);
    assert_eq!(player.skills.skills[0].skill.name(), "Woodcutting");

    let emitted = character
        .to_bytes(ChecksumMode::Sha512)
        .expect("failed to encode character");
    assert_eq!(emitted, bytes);

    let again = Character::from_bytes(&emitted, ChecksumMode::Sha512)
        .expect("failed to decode re-encoded container");
    assert_eq!(again, character);
}

#[test]
fn any_flipped_payload_byte_fails_the_checksum() {
    let bytes = container();
    let payload_len = payload().len();
    for offset in [4, 4 + payload_len / 2, 4 + payload_len - 1] {
        let mut corrupt = bytes.clone();
        corrupt[offset] ^= 0x40;
        let err = Character::from_bytes(&corrupt, ChecksumMode::Sha512)
            .expect_err("corrupted container must not load");
        assert_eq!(err.code, CoreErrorCode::IntegrityMismatch, "offset {offset}");
    }
}

#[test]
fn disabled_checksum_accepts_any_digest() {
    let mut bytes = container();
    let len = bytes.len();
    bytes[len - 64..].fill(0xaa);

    let err = Character::from_bytes(&bytes, ChecksumMode::Sha512).expect_err("bad digest");
    assert_eq!(err.code, CoreErrorCode::IntegrityMismatch);

    let character = Character::from_bytes(&bytes, ChecksumMode::Disabled)
        .expect("degraded mode ignores the digest");
    let emitted = character
        .to_bytes(ChecksumMode::Disabled)
        .expect("failed to encode in degraded mode");
    assert!(emitted[emitted.len() - 64..].iter().all(|&b| b == 0));
}

#[test]
fn future_file_version_is_rejected_and_current_is_accepted() {
    let mut payload = payload();
    payload[..4].copy_from_slice(&34i32.to_le_bytes());
    let mut b = Bytes::default();
    b.i32(payload.len() as i32).raw(&payload).i32(64).raw(&[0u8; 64]);

    let err = Character::from_bytes(&b.0, ChecksumMode::Disabled).expect_err("version 34");
    assert_eq!(err.code, CoreErrorCode::UnsupportedVersion);

    assert!(Character::from_bytes(&container(), ChecksumMode::Sha512).is_ok());
}

#[test]
fn trailing_payload_bytes_are_malformed() {
    let mut payload = payload();
    payload.push(0);
    let mut b = Bytes::default();
    b.i32(payload.len() as i32).raw(&payload);
    b.i32(64).raw(Sha512::digest(&payload).as_slice());

    let err = Character::from_bytes(&b.0, ChecksumMode::Sha512).expect_err("extra byte");
    assert_eq!(err.code, CoreErrorCode::MalformedStream);
}

#[test]
fn older_layouts_upgrade_on_encode() {
    let mut b = Bytes::default();
    // file version 27: no counters, worlds without death point or visibility
    b.i32(27);
    b.i32(1).i64(9);
    b.bool(true).xyz([1.0, 2.0, 3.0]);
    b.bool(false).xyz([0.0; 3]);
    b.xyz([4.0, 5.0, 6.0]);
    b.str("Old").i64(1).raw(&[0]).bool(false);
    let payload = b.0;

    let mut c = Bytes::default();
    c.i32(payload.len() as i32).raw(&payload);
    c.i32(64).raw(Sha512::digest(&payload).as_slice());

    let character = Character::from_bytes(&c.0, ChecksumMode::Sha512).expect("version 27 file");
    assert_eq!(character.stats.version, 27);
    assert_eq!(character.worlds[0].home_point, [4.0, 5.0, 6.0]);
    assert!(!character.player.has_block());

    let upgraded = Character::from_bytes(
        &character.to_bytes(ChecksumMode::Sha512).expect("encode"),
        ChecksumMode::Sha512,
    )
    .expect("re-decode");
    assert_eq!(upgraded.stats.version, PlayerStats::CURRENT_VERSION);
    assert_eq!(upgraded.player.version, PlayerData::CURRENT_VERSION);
    assert_eq!(upgraded.worlds, character.worlds);
}

#[test]
fn oversized_visibility_edge_is_malformed_not_fatal() {
    let mut vis = Bytes::default();
    vis.i32(4).i32(i32::MAX);

    let mut b = Bytes::default();
    b.i32(33).i32(0).i32(0).i32(0).i32(0);
    b.i32(1).i64(1);
    b.bool(false).xyz([0.0; 3]);
    b.bool(false).xyz([0.0; 3]);
    b.bool(false).xyz([0.0; 3]);
    b.xyz([0.0; 3]);
    b.bool(true).i32(vis.0.len() as i32).raw(&vis.0);
    let payload = b.0;

    let mut c = Bytes::default();
    c.i32(payload.len() as i32).raw(&payload).i32(64).raw(&[0u8; 64]);

    let err = Character::from_bytes(&c.0, ChecksumMode::Disabled).expect_err("huge edge");
    assert_eq!(err.code, CoreErrorCode::MalformedStream);
}
