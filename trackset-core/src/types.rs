//! Domain model for tracking datasets.
//!
//! This module defines the provider-agnostic entities a deserialized match
//! is made of: teams, players, periods, per-frame records and the final
//! [`TrackingDataset`].

use crate::coordinates::{CoordinateSystem, PitchDimensions, Provider};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A 2D coordinate in the space of some [`CoordinateSystem`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new 2D point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 3D coordinate; `z` is absent when the provider only reports 2D data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Point3D {
    /// Creates a new 3D point.
    #[inline]
    pub fn new(x: f64, y: f64, z: Option<f64>) -> Self {
        Self { x, y, z }
    }
}

/// Which end of the match a team belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ground {
    Home,
    Away,
}

impl Ground {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ground::Home => "home",
            Ground::Away => "away",
        }
    }
}

impl fmt::Display for Ground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tactical role of a player as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRole {
    pub id: Option<u64>,
    pub name: Option<String>,
}

/// A tracked participant of the match.
///
/// Identity is carried by `id`: `"{side}_{jersey}"` for identified players
/// and `"{side}_anon_{track_id}"` for untracked participants that only have
/// a detection track id. Two `Player` values compare and hash equal iff
/// their ids are equal, so a player can key per-frame data maps.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: String,
    /// Non-owning handle back to the owning team.
    pub team: Ground,
    /// Jersey number; unknown for anonymous players.
    pub jersey_no: Option<u32>,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the player was in the starting lineup; unknown for
    /// anonymous players.
    pub starting: Option<bool>,
    pub role: Option<PlayerRole>,
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// One of the two sides of the match and its resolved squad.
///
/// The player list is populated exactly once, after player resolution has
/// completed; anonymous players discovered during frame assembly are *not*
/// appended here, they only appear through [`Frame::players_data`].
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub ground: Ground,
    pub players: Vec<Arc<Player>>,
}

impl Team {
    /// Creates a team with its final player list.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        ground: Ground,
        players: Vec<Arc<Player>>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            ground,
            players,
        }
    }
}

/// Direction a team is attacking during a period.
///
/// The variant order is meaningful: majority-vote ties are broken in favor
/// of the smaller ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackingDirection {
    /// Home goal on the low-x end, home team attacks toward high x.
    HomeAway,
    /// Away goal on the low-x end, away team attacks toward high x.
    AwayHome,
    NotSet,
}

impl AttackingDirection {
    /// All variants in tie-break order.
    pub const ALL: [AttackingDirection; 3] = [
        AttackingDirection::HomeAway,
        AttackingDirection::AwayHome,
        AttackingDirection::NotSet,
    ];
}

/// A playing period (half) of the match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Period {
    pub id: u32,
    /// Timestamp in seconds of the first frame with a valid time.
    pub start_timestamp: f64,
    /// Timestamp in seconds of the last frame with a valid time.
    pub end_timestamp: f64,
    pub attacking_direction: AttackingDirection,
}

impl Period {
    /// Creates a period; the attacking direction starts out unset and is
    /// assigned once after all frames are assembled.
    pub fn new(id: u32, start_timestamp: f64, end_timestamp: f64) -> Self {
        Self {
            id,
            start_timestamp,
            end_timestamp,
            attacking_direction: AttackingDirection::NotSet,
        }
    }
}

/// Whether the ball is in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    Alive,
    Dead,
}

/// Orientation of the output dataset, derived from period 1's attacking
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    HomeTeam,
    AwayTeam,
}

/// Final score as reported in the match metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

/// Per-frame, per-player record. Coordinates only; this provider does not
/// ship velocities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerData {
    pub coordinates: Point,
}

impl PlayerData {
    #[inline]
    pub fn new(coordinates: Point) -> Self {
        Self { coordinates }
    }
}

/// One sample of the tracking feed.
///
/// Frames are immutable once constructed; the coordinate transform produces
/// a new `Frame` value instead of mutating in place. Players are shared
/// (`Arc`) across all frames of the dataset.
#[derive(Debug, Clone)]
pub struct Frame {
    pub frame_id: u64,
    /// Seconds since period start; `None` when the provider omitted the
    /// time string.
    pub timestamp: Option<f64>,
    pub ball_coordinates: Option<Point3D>,
    pub ball_state: BallState,
    pub ball_owning_team: Option<Ground>,
    pub players_data: HashMap<Arc<Player>, PlayerData>,
    /// Ordinal of the owning period; the `Period` values live in
    /// [`Metadata::periods`].
    pub period: u32,
}

/// Which per-frame fields carry provider-reliable information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetFlags {
    pub ball_state: bool,
    pub ball_owning_team: bool,
}

/// Match-level metadata of a deserialized dataset.
#[derive(Debug, Clone)]
pub struct Metadata {
    home_team: Team,
    away_team: Team,
    pub periods: BTreeMap<u32, Period>,
    pub pitch_dimensions: PitchDimensions,
    pub score: Score,
    pub frame_rate: u32,
    pub orientation: Orientation,
    pub provider: Provider,
    pub flags: DatasetFlags,
    pub coordinate_system: CoordinateSystem,
}

impl Metadata {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        home_team: Team,
        away_team: Team,
        periods: BTreeMap<u32, Period>,
        score: Score,
        frame_rate: u32,
        orientation: Orientation,
        provider: Provider,
        flags: DatasetFlags,
        coordinate_system: CoordinateSystem,
    ) -> Self {
        Self {
            home_team,
            away_team,
            periods,
            pitch_dimensions: coordinate_system.pitch_dimensions,
            score,
            frame_rate,
            orientation,
            provider,
            flags,
            coordinate_system,
        }
    }

    pub fn home_team(&self) -> &Team {
        &self.home_team
    }

    pub fn away_team(&self) -> &Team {
        &self.away_team
    }
}

/// An ordered, restartable sequence of frames plus its match metadata.
#[derive(Debug, Clone)]
pub struct TrackingDataset {
    pub records: Vec<Frame>,
    pub metadata: Metadata,
}

impl TrackingDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
