//! Deserialization library for SkillCorner broadcast tracking data.
//!
//! This crate ingests the provider's two JSON documents (match metadata and
//! the structured tracking feed) and produces a provider-agnostic
//! [`TrackingDataset`]: ordered frames with player and ball coordinates
//! normalized into a canonical coordinate system, periods with inferred
//! attacking directions and fully resolved team squads.
//!
//! # Example
//!
//! ```no_run
//! use trackset_core::deserializer::{DeserializeOptions, SkillCornerDeserializer};
//!
//! let deserializer = SkillCornerDeserializer::new(DeserializeOptions::default());
//! let dataset = deserializer
//!     .deserialize_files("match_data.json", "structured_data.json")
//!     .unwrap();
//!
//! println!("Deserialized {} frames", dataset.len());
//! println!(
//!     "{} vs {}",
//!     dataset.metadata.home_team().name,
//!     dataset.metadata.away_team().name
//! );
//! ```
//!
//! # Features
//!
//! - Anonymous (track-id only) participants as first-class players with
//!   stable identity across frames
//! - Affine coordinate transform between provider and canonical pitch
//!   conventions
//! - Per-period attacking-direction inference by majority vote
//! - Deterministic frame sampling and frame-count limits
//! - CSV export of the canonical dataset

pub mod coordinates;
pub mod deserializer;
pub mod output;
pub mod parser;
pub mod types;

// Re-export commonly used types
pub use coordinates::{build_coordinate_system, CoordinateSystem, Provider, Transformer};
pub use deserializer::{DeserializeError, DeserializeOptions, SkillCornerDeserializer};
pub use output::OutputError;
pub use types::{Frame, Metadata, Player, Team, TrackingDataset};
