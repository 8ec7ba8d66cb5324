//! Raw SkillCorner document shapes and per-record classification.
//!
//! This module mirrors the provider's two JSON documents (match metadata
//! and the structured tracking feed) with serde structs, and resolves each
//! raw position record into a small tagged variant so downstream logic
//! never branches on optional-field presence.

use crate::types::Ground;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors raised while interpreting raw records.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed time string `{0}`, expected MM:SS")]
    MalformedTime(String),

    #[error("position record references unknown trackable object {trackable_object}")]
    UnresolvedRecord { trackable_object: u64 },

    #[error("position record carries neither a trackable object nor a track id")]
    MissingIdentity,

    #[error("anonymous player with track_id `{track_id}` does not have a valid group name (got {group:?})")]
    UnidentifiedTeam {
        track_id: u64,
        group: Option<String>,
    },
}

/// `match_data.json`: teams, squad, referees, ball and pitch geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatchMeta {
    pub home_team: RawTeamMeta,
    pub away_team: RawTeamMeta,
    #[serde(default)]
    pub home_team_score: u32,
    #[serde(default)]
    pub away_team_score: u32,
    pub players: Vec<RawPlayerMeta>,
    #[serde(default)]
    pub referees: Vec<RawRefereeMeta>,
    pub ball: RawBallMeta,
    pub pitch_length: f64,
    pub pitch_width: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTeamMeta {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayerMeta {
    pub trackable_object: u64,
    pub team_id: u64,
    pub number: u32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub player_role: Option<RawPlayerRole>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayerRole {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRefereeMeta {
    pub trackable_object: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBallMeta {
    pub trackable_object: u64,
}

/// One element of `structured_data.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFrame {
    pub frame: u64,
    pub period: Option<u32>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub possession: RawPossession,
    #[serde(default)]
    pub data: Vec<RawRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPossession {
    #[serde(default)]
    pub group: Option<String>,
}

/// A single per-entity position sample inside a raw frame.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: Option<f64>,
    #[serde(default)]
    pub trackable_object: Option<u64>,
    #[serde(default)]
    pub track_id: Option<u64>,
    #[serde(default)]
    pub group_name: Option<String>,
}

/// Resolved meaning of a raw position record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Ball,
    Referee,
    Identified { trackable_object: u64, side: Ground },
    Anonymous { side: Ground, track_id: u64 },
}

/// Registry lookups needed to classify a record.
#[derive(Debug)]
pub struct RecordContext<'a> {
    pub ball_id: u64,
    pub referees: &'a HashSet<u64>,
    pub side_by_trackable: &'a HashMap<u64, Ground>,
}

/// Classifies one raw record, in priority order ball > referee >
/// identified player > anonymous player.
///
/// A record with a trackable object that resolves to none of the known
/// entities, or with no identity at all, or an anonymous record whose
/// group name is neither `"home team"` nor `"away team"`, is a
/// data-integrity error that aborts the whole deserialization.
pub fn classify_record(record: &RawRecord, ctx: &RecordContext<'_>) -> Result<RecordKind, ParseError> {
    if let Some(trackable_object) = record.trackable_object {
        if trackable_object == ctx.ball_id {
            return Ok(RecordKind::Ball);
        }
        if ctx.referees.contains(&trackable_object) {
            return Ok(RecordKind::Referee);
        }
        if let Some(&side) = ctx.side_by_trackable.get(&trackable_object) {
            return Ok(RecordKind::Identified {
                trackable_object,
                side,
            });
        }
        return Err(ParseError::UnresolvedRecord { trackable_object });
    }

    let track_id = record.track_id.ok_or(ParseError::MissingIdentity)?;
    match record.group_name.as_deref() {
        Some("home team") => Ok(RecordKind::Anonymous {
            side: Ground::Home,
            track_id,
        }),
        Some("away team") => Ok(RecordKind::Anonymous {
            side: Ground::Away,
            track_id,
        }),
        other => Err(ParseError::UnidentifiedTeam {
            track_id,
            group: other.map(str::to_string),
        }),
    }
}

/// Parses a `"MM:SS"` time string (fractional seconds allowed) into
/// seconds.
pub fn parse_timestring(timestring: &str) -> Result<f64, ParseError> {
    let malformed = || ParseError::MalformedTime(timestring.to_string());

    let (minutes, seconds) = timestring.split_once(':').ok_or_else(malformed)?;
    let minutes: f64 = minutes.trim().parse().map_err(|_| malformed())?;
    let seconds: f64 = seconds.trim().parse().map_err(|_| malformed())?;

    Ok(60.0 * minutes + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        trackable_object: Option<u64>,
        track_id: Option<u64>,
        group_name: Option<&str>,
    ) -> RawRecord {
        RawRecord {
            x: 1.0,
            y: 2.0,
            z: None,
            trackable_object,
            track_id,
            group_name: group_name.map(str::to_string),
        }
    }

    #[test]
    fn test_classify_priority() {
        let referees = HashSet::from([40]);
        let sides = HashMap::from([(10, Ground::Home), (20, Ground::Away)]);
        let ctx = RecordContext {
            ball_id: 55,
            referees: &referees,
            side_by_trackable: &sides,
        };

        assert_eq!(
            classify_record(&record(Some(55), None, None), &ctx).unwrap(),
            RecordKind::Ball
        );
        assert_eq!(
            classify_record(&record(Some(40), None, None), &ctx).unwrap(),
            RecordKind::Referee
        );
        assert_eq!(
            classify_record(&record(Some(20), None, None), &ctx).unwrap(),
            RecordKind::Identified {
                trackable_object: 20,
                side: Ground::Away
            }
        );
        assert_eq!(
            classify_record(&record(None, Some(77), Some("home team")), &ctx).unwrap(),
            RecordKind::Anonymous {
                side: Ground::Home,
                track_id: 77
            }
        );
    }

    #[test]
    fn test_classify_integrity_errors() {
        let referees = HashSet::new();
        let sides = HashMap::new();
        let ctx = RecordContext {
            ball_id: 55,
            referees: &referees,
            side_by_trackable: &sides,
        };

        assert!(matches!(
            classify_record(&record(Some(999), None, None), &ctx),
            Err(ParseError::UnresolvedRecord {
                trackable_object: 999
            })
        ));
        assert!(matches!(
            classify_record(&record(None, None, None), &ctx),
            Err(ParseError::MissingIdentity)
        ));
        assert!(matches!(
            classify_record(&record(None, Some(3), Some("referee")), &ctx),
            Err(ParseError::UnidentifiedTeam { track_id: 3, .. })
        ));
        assert!(matches!(
            classify_record(&record(None, Some(3), None), &ctx),
            Err(ParseError::UnidentifiedTeam { track_id: 3, .. })
        ));
    }

    #[test]
    fn test_parse_timestring() {
        assert_eq!(parse_timestring("00:02").unwrap(), 2.0);
        assert_eq!(parse_timestring("45:30.5").unwrap(), 2730.5);
        assert_eq!(parse_timestring("90:00").unwrap(), 5400.0);
        assert!(parse_timestring("abc").is_err());
        assert!(parse_timestring("12.5").is_err());
        assert!(parse_timestring("1:b").is_err());
    }

    #[test]
    fn test_raw_frame_deserialization() {
        let json = r#"{
            "frame": 1024,
            "period": 1,
            "time": "00:42",
            "possession": {"group": "home team"},
            "data": [
                {"x": 10.0, "y": -5.0, "trackable_object": 12},
                {"x": 1.0, "y": 2.0, "z": 0.3, "trackable_object": 55},
                {"x": 0.0, "y": 0.0, "track_id": 77, "group_name": "away team"}
            ]
        }"#;

        let frame: RawFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.frame, 1024);
        assert_eq!(frame.period, Some(1));
        assert_eq!(frame.time.as_deref(), Some("00:42"));
        assert_eq!(frame.possession.group.as_deref(), Some("home team"));
        assert_eq!(frame.data.len(), 3);
        assert_eq!(frame.data[1].z, Some(0.3));
        assert_eq!(frame.data[2].track_id, Some(77));
    }

    #[test]
    fn test_raw_frame_null_fields() {
        let json = r#"{"frame": 7, "period": null, "time": null, "possession": {"group": null}, "data": []}"#;
        let frame: RawFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.period, None);
        assert_eq!(frame.time, None);
        assert!(frame.data.is_empty());
    }
}
