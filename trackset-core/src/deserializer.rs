//! SkillCorner tracking-data deserializer.
//!
//! Turns the provider's metadata and structured-data documents into a
//! [`TrackingDataset`]: builds the team/player registry and period table,
//! assembles frames one raw record at a time, transforms every coordinate
//! into the target system and infers per-period attacking directions by
//! majority vote.

use crate::coordinates::{build_coordinate_system, Provider, Transformer};
use crate::parser::{
    classify_record, parse_timestring, ParseError, RawFrame, RawMatchMeta, RecordContext,
    RecordKind,
};
use crate::types::{
    AttackingDirection, BallState, DatasetFlags, Frame, Ground, Metadata, Orientation, Period,
    Player, PlayerData, PlayerRole, Point, Point3D, Score, Team, TrackingDataset,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// SkillCorner's broadcast tracking feed is sampled at 10 Hz.
const FRAME_RATE: u32 = 10;

/// Errors that can occur during deserialization.
#[derive(Error, Debug)]
pub enum DeserializeError {
    #[error("missing required input `{0}`")]
    MissingInput(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Record(#[from] ParseError),

    #[error("metadata player references unknown team id {team_id}")]
    UnknownTeam { team_id: u64 },

    #[error("sample_rate must be in (0, 1], got {0}")]
    InvalidSampleRate(f64),

    #[error("serialization back to SkillCorner format is not supported")]
    NotSupported,
}

/// Options accepted by [`SkillCornerDeserializer::deserialize`].
#[derive(Debug, Clone, Copy)]
pub struct DeserializeOptions {
    /// Fraction of frames to keep, in `(0, 1]`.
    pub sample_rate: f64,
    /// Maximum number of emitted frames; `0` means unlimited.
    pub limit: usize,
    /// Keep frames that carry no position records at all.
    pub include_empty_frames: bool,
    /// Target coordinate system of the output dataset.
    pub coordinate_system: Provider,
}

impl Default for DeserializeOptions {
    fn default() -> Self {
        Self {
            sample_rate: 1.0,
            limit: 0,
            include_empty_frames: false,
            coordinate_system: Provider::Canonical,
        }
    }
}

/// Lookup tables resolved from the match metadata.
#[derive(Debug)]
struct Registry {
    ball_id: u64,
    referees: HashSet<u64>,
    side_by_trackable: HashMap<u64, Ground>,
    players_by_trackable: HashMap<u64, Arc<Player>>,
    home_players: Vec<Arc<Player>>,
    away_players: Vec<Arc<Player>>,
}

/// Deserializer for SkillCorner broadcast tracking data.
///
/// Each call to [`deserialize`](Self::deserialize) owns its own anonymous
/// player registry and counters, so a single deserializer can be reused
/// across matches.
#[derive(Debug, Default)]
pub struct SkillCornerDeserializer {
    options: DeserializeOptions,
}

impl SkillCornerDeserializer {
    /// Creates a deserializer with the given options.
    pub fn new(options: DeserializeOptions) -> Self {
        Self { options }
    }

    /// Deserializes the two provider documents into a tracking dataset.
    ///
    /// `metadata` is the match-data JSON (teams, squad, referees, ball,
    /// pitch geometry, score), `raw_data` the structured tracking feed.
    /// Both are required; passing `None` fails before any parsing begins.
    pub fn deserialize<M: Read, R: Read>(
        &self,
        metadata: Option<M>,
        raw_data: Option<R>,
    ) -> Result<TrackingDataset, DeserializeError> {
        let metadata = metadata.ok_or(DeserializeError::MissingInput("metadata"))?;
        let raw_data = raw_data.ok_or(DeserializeError::MissingInput("raw_data"))?;

        let rate = self.options.sample_rate;
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(DeserializeError::InvalidSampleRate(rate));
        }

        let meta: RawMatchMeta = serde_json::from_reader(BufReader::new(metadata))?;
        let raw_frames: Vec<RawFrame> = serde_json::from_reader(BufReader::new(raw_data))?;
        log::debug!(
            "loaded metadata `{}` vs `{}`, {} raw frames",
            meta.home_team.name,
            meta.away_team.name,
            raw_frames.len()
        );

        let registry = build_registry(&meta)?;
        let mut periods = build_periods(&raw_frames)?;

        let from_system =
            build_coordinate_system(Provider::SkillCorner, meta.pitch_length, meta.pitch_width);
        let to_system = build_coordinate_system(
            self.options.coordinate_system,
            meta.pitch_length,
            meta.pitch_width,
        );
        let transformer = Transformer::new(from_system, to_system);

        // Owned by this call: repeated deserializations stay independent.
        let mut anon_players: HashMap<(Ground, u64), Arc<Player>> = HashMap::new();
        let mut frames: Vec<Frame> = Vec::new();

        let mut seen: u64 = 0;
        let mut last_bucket: Option<u64> = None;

        for raw_frame in &raw_frames {
            let Some(period) = raw_frame.period else {
                continue;
            };

            // Deterministic sampling: emit whenever the cumulative bucket
            // floor(seen * rate) advances.
            let bucket = (seen as f64 * rate).floor() as u64;
            seen += 1;
            if last_bucket == Some(bucket) {
                continue;
            }
            last_bucket = Some(bucket);

            if raw_frame.data.is_empty() && !self.options.include_empty_frames {
                continue;
            }

            let frame = assemble_frame(raw_frame, period, &registry, &mut anon_players)?;
            frames.push(transformer.transform_frame(frame));

            if self.options.limit > 0 && frames.len() >= self.options.limit {
                break;
            }
        }

        log::debug!(
            "assembled {} frames, {} anonymous players",
            frames.len(),
            anon_players.len()
        );

        let mid_x = to_system.pitch_dimensions.x_dim.center();
        set_attacking_directions(&frames, &mut periods, mid_x);

        let orientation = match periods.get(&1) {
            Some(period) if period.attacking_direction == AttackingDirection::HomeAway => {
                Orientation::HomeTeam
            }
            _ => Orientation::AwayTeam,
        };

        let home_team = Team::new(
            meta.home_team.id,
            &meta.home_team.name,
            Ground::Home,
            registry.home_players,
        );
        let away_team = Team::new(
            meta.away_team.id,
            &meta.away_team.name,
            Ground::Away,
            registry.away_players,
        );

        let metadata = Metadata::new(
            home_team,
            away_team,
            periods,
            Score {
                home: meta.home_team_score,
                away: meta.away_team_score,
            },
            FRAME_RATE,
            orientation,
            Provider::SkillCorner,
            // Possession fields are derived from broadcast detection, not
            // provider ground truth.
            DatasetFlags {
                ball_state: false,
                ball_owning_team: false,
            },
            to_system,
        );

        Ok(TrackingDataset {
            records: frames,
            metadata,
        })
    }

    /// Deserializes a match directly from the two JSON files on disk.
    pub fn deserialize_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        metadata: P,
        raw_data: Q,
    ) -> Result<TrackingDataset, DeserializeError> {
        let metadata = File::open(metadata.as_ref())?;
        let raw_data = File::open(raw_data.as_ref())?;
        self.deserialize(Some(metadata), Some(raw_data))
    }

    /// The reverse direction is part of the contract surface but is not
    /// implemented for this provider.
    pub fn serialize(
        &self,
        _dataset: &TrackingDataset,
    ) -> Result<(String, String), DeserializeError> {
        Err(DeserializeError::NotSupported)
    }
}

/// Builds teams, player lookup tables and referee/ball identifiers from the
/// match metadata.
fn build_registry(meta: &RawMatchMeta) -> Result<Registry, DeserializeError> {
    let mut side_by_trackable = HashMap::new();
    let mut players_by_trackable = HashMap::new();
    let mut home_players = Vec::new();
    let mut away_players = Vec::new();

    for raw_player in &meta.players {
        let side = if raw_player.team_id == meta.home_team.id {
            Ground::Home
        } else if raw_player.team_id == meta.away_team.id {
            Ground::Away
        } else {
            return Err(DeserializeError::UnknownTeam {
                team_id: raw_player.team_id,
            });
        };

        let player = Arc::new(Player {
            id: format!("{}_{}", side, raw_player.number),
            team: side,
            jersey_no: Some(raw_player.number),
            name: format!("{} {}", raw_player.first_name, raw_player.last_name),
            first_name: raw_player.first_name.clone(),
            last_name: raw_player.last_name.clone(),
            starting: Some(raw_player.start_time.as_deref() == Some("00:00:00")),
            role: raw_player.player_role.as_ref().map(|role| PlayerRole {
                id: role.id,
                name: role.name.clone(),
            }),
        });

        side_by_trackable.insert(raw_player.trackable_object, side);
        players_by_trackable.insert(raw_player.trackable_object, Arc::clone(&player));
        match side {
            Ground::Home => home_players.push(player),
            Ground::Away => away_players.push(player),
        }
    }

    Ok(Registry {
        ball_id: meta.ball.trackable_object,
        referees: meta
            .referees
            .iter()
            .map(|referee| referee.trackable_object)
            .collect(),
        side_by_trackable,
        players_by_trackable,
        home_players,
        away_players,
    })
}

/// Computes period boundaries from the first and last frame of each period
/// that carries a valid time string. Periods with no timed frames are left
/// out entirely.
fn build_periods(raw_frames: &[RawFrame]) -> Result<BTreeMap<u32, Period>, ParseError> {
    let mut bounds: BTreeMap<u32, (f64, f64)> = BTreeMap::new();

    for raw_frame in raw_frames {
        let (Some(period), Some(time)) = (raw_frame.period, raw_frame.time.as_deref()) else {
            continue;
        };
        let timestamp = parse_timestring(time)?;
        bounds
            .entry(period)
            .and_modify(|(_, end)| *end = timestamp)
            .or_insert((timestamp, timestamp));
    }

    Ok(bounds
        .into_iter()
        .map(|(id, (start, end))| (id, Period::new(id, start, end)))
        .collect())
}

/// Creates a first-class player entity for a track that has a known team
/// but no identity.
fn create_anon_player(side: Ground, track_id: u64) -> Arc<Player> {
    Arc::new(Player {
        id: format!("{}_anon_{}", side, track_id),
        team: side,
        jersey_no: None,
        name: format!("Anon_{}", track_id),
        first_name: "Anon".to_string(),
        last_name: track_id.to_string(),
        starting: None,
        role: None,
    })
}

/// Resolves one raw frame into a [`Frame`] in provider space.
fn assemble_frame(
    raw_frame: &RawFrame,
    period: u32,
    registry: &Registry,
    anon_players: &mut HashMap<(Ground, u64), Arc<Player>>,
) -> Result<Frame, DeserializeError> {
    let timestamp = raw_frame
        .time
        .as_deref()
        .map(parse_timestring)
        .transpose()?;

    let (ball_state, ball_owning_team) = match raw_frame.possession.group.as_deref() {
        Some("home team") => (BallState::Alive, Some(Ground::Home)),
        Some("away team") => (BallState::Alive, Some(Ground::Away)),
        _ => (BallState::Dead, None),
    };

    let ctx = RecordContext {
        ball_id: registry.ball_id,
        referees: &registry.referees,
        side_by_trackable: &registry.side_by_trackable,
    };

    let mut ball_coordinates = None;
    let mut players_data = HashMap::new();

    for record in &raw_frame.data {
        match classify_record(record, &ctx)? {
            RecordKind::Ball => {
                ball_coordinates = Some(Point3D::new(record.x, record.y, record.z));
            }
            RecordKind::Referee => {}
            RecordKind::Identified {
                trackable_object, ..
            } => {
                let player = registry
                    .players_by_trackable
                    .get(&trackable_object)
                    .ok_or(ParseError::UnresolvedRecord { trackable_object })?;
                players_data.insert(
                    Arc::clone(player),
                    PlayerData::new(Point::new(record.x, record.y)),
                );
            }
            RecordKind::Anonymous { side, track_id } => {
                // First-seen wins; later frames with the same track id on
                // the same side reuse the same player instance.
                let player = anon_players
                    .entry((side, track_id))
                    .or_insert_with(|| create_anon_player(side, track_id));
                players_data.insert(
                    Arc::clone(player),
                    PlayerData::new(Point::new(record.x, record.y)),
                );
            }
        }
    }

    Ok(Frame {
        frame_id: raw_frame.frame,
        timestamp,
        ball_coordinates,
        ball_state,
        ball_owning_team,
        players_data,
        period,
    })
}

/// Per-frame attacking-direction vote.
///
/// Broadcast tracking only covers part of the pitch, so a single frame's
/// average position is unreliable; votes are aggregated per period by
/// [`set_attacking_directions`]. The home team's mean x against the pitch
/// midline is the reference; when no home player is visible the away
/// team's mean is used mirrored.
fn frame_attacking_direction(frame: &Frame, mid_x: f64) -> AttackingDirection {
    let mean_x = |side: Ground| -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for (player, data) in &frame.players_data {
            if player.team == side {
                sum += data.coordinates.x;
                count += 1;
            }
        }
        (count > 0).then(|| sum / count as f64)
    };

    if let Some(home_x) = mean_x(Ground::Home) {
        if home_x < mid_x {
            AttackingDirection::HomeAway
        } else {
            AttackingDirection::AwayHome
        }
    } else if let Some(away_x) = mean_x(Ground::Away) {
        if away_x > mid_x {
            AttackingDirection::HomeAway
        } else {
            AttackingDirection::AwayHome
        }
    } else {
        AttackingDirection::NotSet
    }
}

fn direction_ordinal(direction: AttackingDirection) -> usize {
    match direction {
        AttackingDirection::HomeAway => 0,
        AttackingDirection::AwayHome => 1,
        AttackingDirection::NotSet => 2,
    }
}

/// Assigns each period the majority vote among its frames. Ties go to the
/// smaller enum ordinal; periods with no frames in the output are left
/// `NotSet`.
fn set_attacking_directions(frames: &[Frame], periods: &mut BTreeMap<u32, Period>, mid_x: f64) {
    let mut votes: HashMap<u32, [usize; 3]> = HashMap::new();

    for frame in frames {
        let direction = if frame.players_data.is_empty() {
            AttackingDirection::NotSet
        } else {
            frame_attacking_direction(frame, mid_x)
        };
        votes.entry(frame.period).or_insert([0; 3])[direction_ordinal(direction)] += 1;
    }

    for period in periods.values_mut() {
        period.attacking_direction = match votes.get(&period.id) {
            Some(counts) => {
                let mut best = 0;
                for i in 1..counts.len() {
                    if counts[i] > counts[best] {
                        best = i;
                    }
                }
                AttackingDirection::ALL[best]
            }
            None => AttackingDirection::NotSet,
        };
    }
}
