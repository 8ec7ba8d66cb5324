//! Integration tests for the SkillCorner deserializer using a small
//! embedded match.
//!
//! Run with: cargo test --test integration_tests

use std::sync::Arc;
use trackset_core::deserializer::{DeserializeOptions, SkillCornerDeserializer};
use trackset_core::types::{AttackingDirection, Ground, Orientation};
use trackset_core::Provider;

const MATCH_META: &str = r#"{
    "home_team": {"id": 1, "name": "Home FC"},
    "away_team": {"id": 2, "name": "Away FC"},
    "home_team_score": 0,
    "away_team_score": 0,
    "players": [
        {"trackable_object": 100, "team_id": 1, "number": 7,
         "first_name": "Hanna", "last_name": "Haus", "start_time": "00:00:00"},
        {"trackable_object": 200, "team_id": 2, "number": 9,
         "first_name": "Ava", "last_name": "Ward", "start_time": "00:00:00"}
    ],
    "referees": [{"trackable_object": 300}],
    "ball": {"trackable_object": 55},
    "pitch_length": 105.0,
    "pitch_width": 68.0
}"#;

fn deserialize(raw: &str, options: DeserializeOptions) -> trackset_core::TrackingDataset {
    SkillCornerDeserializer::new(options)
        .deserialize(Some(MATCH_META.as_bytes()), Some(raw.as_bytes()))
        .expect("deserialization failed")
}

/// The worked example: one populated frame, one empty frame without a
/// time string. Default options drop the empty frame, and the period is
/// bounded by the single timed frame.
#[test]
fn test_worked_example() {
    let raw = r#"[
        {"frame": 10, "period": 1, "time": "00:02", "possession": {"group": null},
         "data": [
             {"x": 10.0, "y": 5.0, "trackable_object": 100},
             {"x": 0.0, "y": 0.0, "trackable_object": 55}
         ]},
        {"frame": 11, "period": 1, "time": null, "possession": {"group": null}, "data": []}
    ]"#;

    let dataset = deserialize(raw, DeserializeOptions::default());

    assert_eq!(dataset.len(), 1);
    let frame = &dataset.records[0];
    assert_eq!(frame.frame_id, 10);
    assert_eq!(frame.players_data.len(), 1);

    // Provider-space (10, 5) lands in the canonical unit square at
    // ((10 + 52.5) / 105, (5 + 34) / 68).
    let (player, data) = frame.players_data.iter().next().unwrap();
    assert_eq!(player.id, "home_7");
    assert!((data.coordinates.x - 62.5 / 105.0).abs() < 1e-9);
    assert!((data.coordinates.y - 39.0 / 68.0).abs() < 1e-9);

    // Ball at pitch center maps to the middle of the unit square.
    let ball = frame.ball_coordinates.expect("ball missing");
    assert!((ball.x - 0.5).abs() < 1e-9);
    assert!((ball.y - 0.5).abs() < 1e-9);

    let period = &dataset.metadata.periods[&1];
    assert_eq!(period.start_timestamp, 2.0);
    assert_eq!(period.end_timestamp, 2.0);
}

/// Output frame count never exceeds the number of raw frames with a
/// non-null period, nor the limit when one is set.
#[test]
fn test_frame_count_bounds() {
    let mut raw_frames = Vec::new();
    for i in 0..30 {
        let period = if i % 5 == 0 { "null".to_string() } else { "1".to_string() };
        raw_frames.push(format!(
            r#"{{"frame": {i}, "period": {period}, "time": "00:{i:02}", "possession": {{"group": null}},
                "data": [{{"x": 0.0, "y": 0.0, "trackable_object": 100}}]}}"#
        ));
    }
    let raw = format!("[{}]", raw_frames.join(","));
    let non_null = 24;

    let dataset = deserialize(&raw, DeserializeOptions::default());
    assert!(dataset.len() <= non_null);
    assert_eq!(dataset.len(), non_null);

    let limited = deserialize(
        &raw,
        DeserializeOptions {
            limit: 5,
            ..Default::default()
        },
    );
    assert_eq!(limited.len(), 5);
}

/// Sampling is reproducible and keeps exactly the frames whose cumulative
/// bucket advances.
#[test]
fn test_sampling_reproducible() {
    let mut raw_frames = Vec::new();
    for i in 0..20 {
        raw_frames.push(format!(
            r#"{{"frame": {i}, "period": 1, "time": "00:{i:02}", "possession": {{"group": null}},
                "data": [{{"x": 0.0, "y": 0.0, "trackable_object": 100}}]}}"#
        ));
    }
    let raw = format!("[{}]", raw_frames.join(","));

    let options = DeserializeOptions {
        sample_rate: 0.25,
        ..Default::default()
    };

    let first = deserialize(&raw, options);
    let second = deserialize(&raw, options);

    let ids: Vec<u64> = first.records.iter().map(|f| f.frame_id).collect();
    let ids_again: Vec<u64> = second.records.iter().map(|f| f.frame_id).collect();
    assert_eq!(ids, vec![0, 4, 8, 12, 16]);
    assert_eq!(ids, ids_again);
}

/// An anonymous track id seen on the same side in different frames always
/// resolves to the same player instance.
#[test]
fn test_anonymous_player_referential_stability() {
    let raw = r#"[
        {"frame": 1, "period": 1, "time": "00:01", "possession": {"group": null},
         "data": [{"x": 1.0, "y": 1.0, "track_id": 77, "group_name": "home team"}]},
        {"frame": 2, "period": 1, "time": "00:02", "possession": {"group": null},
         "data": [{"x": 2.0, "y": 2.0, "trackable_object": 100}]},
        {"frame": 5, "period": 1, "time": "00:05", "possession": {"group": null},
         "data": [{"x": 3.0, "y": 3.0, "track_id": 77, "group_name": "home team"}]}
    ]"#;

    let dataset = deserialize(raw, DeserializeOptions::default());
    assert_eq!(dataset.len(), 3);

    let find_anon = |idx: usize| -> Arc<trackset_core::Player> {
        dataset.records[idx]
            .players_data
            .keys()
            .find(|p| p.id == "home_anon_77")
            .cloned()
            .expect("anonymous player missing")
    };

    let first_seen = find_anon(0);
    let reappeared = find_anon(2);
    assert!(Arc::ptr_eq(&first_seen, &reappeared));
    assert_eq!(first_seen.team, Ground::Home);
    assert_eq!(first_seen.jersey_no, None);
    assert_eq!(first_seen.name, "Anon_77");

    // Anonymous players do not join the squad list.
    assert_eq!(dataset.metadata.home_team().players.len(), 1);
}

/// Directions are always within the enum domain and periods whose frames
/// all lack player data end up NotSet; the orientation follows period 1.
#[test]
fn test_period_directions_and_orientation() {
    let raw = r#"[
        {"frame": 0, "period": 1, "time": "00:01", "possession": {"group": null},
         "data": [{"x": 40.0, "y": 0.0, "trackable_object": 100}]},
        {"frame": 1, "period": 1, "time": "00:02", "possession": {"group": null},
         "data": [{"x": 45.0, "y": 0.0, "trackable_object": 100}]},
        {"frame": 2, "period": 2, "time": "45:00", "possession": {"group": null},
         "data": [{"x": 0.0, "y": 0.0, "trackable_object": 55}]}
    ]"#;

    let dataset = deserialize(raw, DeserializeOptions::default());
    let periods = &dataset.metadata.periods;

    // Home mean x on the high half: away is attacking low-to-high.
    assert_eq!(periods[&1].attacking_direction, AttackingDirection::AwayHome);
    // Period 2 frames carry only ball data, so every vote is NotSet.
    assert_eq!(periods[&2].attacking_direction, AttackingDirection::NotSet);
    assert_eq!(dataset.metadata.orientation, Orientation::AwayTeam);

    for period in periods.values() {
        assert!(AttackingDirection::ALL.contains(&period.attacking_direction));
    }
}

/// Keeping provider coordinates: the SkillCorner target system is the
/// identity transform.
#[test]
fn test_identity_target_system() {
    let raw = r#"[
        {"frame": 0, "period": 1, "time": "00:01", "possession": {"group": null},
         "data": [{"x": 10.0, "y": 5.0, "trackable_object": 100}]}
    ]"#;

    let options = DeserializeOptions {
        coordinate_system: Provider::SkillCorner,
        ..Default::default()
    };
    let dataset = deserialize(raw, options);

    let (_, data) = dataset.records[0].players_data.iter().next().unwrap();
    assert!((data.coordinates.x - 10.0).abs() < 1e-9);
    assert!((data.coordinates.y - 5.0).abs() < 1e-9);
    assert_eq!(
        dataset.metadata.coordinate_system.provider,
        Provider::SkillCorner
    );
}

/// Integrity failures abort the whole deserialization instead of returning
/// a partial dataset.
#[test]
fn test_integrity_failure_aborts() {
    let raw = r#"[
        {"frame": 0, "period": 1, "time": "00:01", "possession": {"group": null},
         "data": [{"x": 0.0, "y": 0.0, "trackable_object": 100}]},
        {"frame": 1, "period": 1, "time": "00:02", "possession": {"group": null},
         "data": [{"x": 0.0, "y": 0.0, "trackable_object": 9999}]}
    ]"#;

    let result = SkillCornerDeserializer::default()
        .deserialize(Some(MATCH_META.as_bytes()), Some(raw.as_bytes()));
    assert!(result.is_err());
}
