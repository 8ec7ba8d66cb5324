//! Coordinate systems and the frame transform between them.
//!
//! Every provider reports positions in its own pitch convention (origin,
//! axis direction, dimension ranges). [`build_coordinate_system`] is the
//! registry of known conventions and [`Transformer`] remaps whole frames
//! from one system into another without touching any non-coordinate field.

use crate::types::{Frame, Point, Point3D};
use std::fmt;

/// Identity of a coordinate convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// SkillCorner broadcast tracking: origin at pitch center, metric
    /// units, y growing toward the top of the pitch.
    SkillCorner,
    /// The library-internal target convention: unit square with the origin
    /// in the bottom-left corner.
    Canonical,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::SkillCorner => "skillcorner",
            Provider::Canonical => "canonical",
        }
    }

    /// Looks a provider up by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "skillcorner" => Some(Provider::SkillCorner),
            "canonical" => Some(Provider::Canonical),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value range of a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub min: f64,
    pub max: f64,
}

impl Dimension {
    #[inline]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Axis ranges of the pitch in a given coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchDimensions {
    pub x_dim: Dimension,
    pub y_dim: Dimension,
}

/// Where the coordinate origin sits on the pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Center,
    BottomLeft,
}

/// Direction in which the y axis grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalOrientation {
    BottomToTop,
    TopToBottom,
}

/// An immutable pitch coordinate convention, constructed once per dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSystem {
    pub provider: Provider,
    pub origin: Origin,
    pub vertical_orientation: VerticalOrientation,
    pub pitch_dimensions: PitchDimensions,
}

/// Returns the coordinate system a provider uses for a pitch of the given
/// metric length and width.
pub fn build_coordinate_system(provider: Provider, length: f64, width: f64) -> CoordinateSystem {
    match provider {
        Provider::SkillCorner => CoordinateSystem {
            provider,
            origin: Origin::Center,
            vertical_orientation: VerticalOrientation::BottomToTop,
            pitch_dimensions: PitchDimensions {
                x_dim: Dimension::new(-length / 2.0, length / 2.0),
                y_dim: Dimension::new(-width / 2.0, width / 2.0),
            },
        },
        Provider::Canonical => CoordinateSystem {
            provider,
            origin: Origin::BottomLeft,
            vertical_orientation: VerticalOrientation::BottomToTop,
            pitch_dimensions: PitchDimensions {
                x_dim: Dimension::new(0.0, 1.0),
                y_dim: Dimension::new(0.0, 1.0),
            },
        },
    }
}

/// Pure affine remap of frames from one coordinate system into another.
///
/// Each axis is normalized to `[0, 1]` in source space, flipped when the
/// vertical orientations disagree, and denormalized into target space.
/// Frame ordering, identity and possession state pass through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Transformer {
    from: CoordinateSystem,
    to: CoordinateSystem,
}

impl Transformer {
    pub fn new(from: CoordinateSystem, to: CoordinateSystem) -> Self {
        Self { from, to }
    }

    /// Remaps a single 2D point.
    pub fn transform_point(&self, point: Point) -> Point {
        let nx = (point.x - self.from.pitch_dimensions.x_dim.min)
            / self.from.pitch_dimensions.x_dim.size();
        let mut ny = (point.y - self.from.pitch_dimensions.y_dim.min)
            / self.from.pitch_dimensions.y_dim.size();

        if self.from.vertical_orientation != self.to.vertical_orientation {
            ny = 1.0 - ny;
        }

        Point::new(
            self.to.pitch_dimensions.x_dim.min + nx * self.to.pitch_dimensions.x_dim.size(),
            self.to.pitch_dimensions.y_dim.min + ny * self.to.pitch_dimensions.y_dim.size(),
        )
    }

    /// Remaps a 3D point; `z` is not part of the pitch plane and passes
    /// through unchanged.
    pub fn transform_point3d(&self, point: Point3D) -> Point3D {
        let flat = self.transform_point(Point::new(point.x, point.y));
        Point3D::new(flat.x, flat.y, point.z)
    }

    /// Produces a new frame with every coordinate remapped into the target
    /// system.
    pub fn transform_frame(&self, frame: Frame) -> Frame {
        let ball_coordinates = frame.ball_coordinates.map(|p| self.transform_point3d(p));
        let players_data = frame
            .players_data
            .into_iter()
            .map(|(player, data)| {
                (
                    player,
                    crate::types::PlayerData::new(self.transform_point(data.coordinates)),
                )
            })
            .collect();

        Frame {
            frame_id: frame.frame_id,
            timestamp: frame.timestamp,
            ball_coordinates,
            ball_state: frame.ball_state,
            ball_owning_team: frame.ball_owning_team,
            players_data,
            period: frame.period,
        }
    }
}
