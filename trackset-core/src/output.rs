//! CSV export of a deserialized tracking dataset.
//!
//! Writes one row per tracked entity per frame in the dataset's own
//! (already transformed) coordinate system. This is a canonical-format
//! export, not a provider re-serialization.

use crate::types::{BallState, Frame, TrackingDataset};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output writing.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const HEADER: &str = "frame_id,period,timestamp,ball_state,player_id,team,x,y,z";

/// CSV writer for tracking frames.
pub struct CsvWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> CsvWriter<W> {
    /// Creates a new CSV writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Writes the column header.
    pub fn write_header(&mut self) -> Result<(), OutputError> {
        writeln!(self.writer, "{}", HEADER)?;
        Ok(())
    }

    /// Writes a batch of frames.
    pub fn write_frames(&mut self, frames: &[Frame]) -> Result<(), OutputError> {
        for frame in frames {
            self.write_frame(frame)?;
        }
        Ok(())
    }

    /// Writes one frame: a ball row (when present) followed by the player
    /// rows sorted by player id, so output is stable across runs.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), OutputError> {
        let timestamp = frame
            .timestamp
            .map(|t| t.to_string())
            .unwrap_or_default();
        let ball_state = match frame.ball_state {
            BallState::Alive => "alive",
            BallState::Dead => "dead",
        };

        if let Some(ball) = frame.ball_coordinates {
            let z = ball.z.map(|z| z.to_string()).unwrap_or_default();
            writeln!(
                self.writer,
                "{},{},{},{},ball,,{},{},{}",
                frame.frame_id, frame.period, timestamp, ball_state, ball.x, ball.y, z
            )?;
        }

        let mut rows: Vec<_> = frame.players_data.iter().collect();
        rows.sort_by(|(a, _), (b, _)| a.id.cmp(&b.id));

        for (player, data) in rows {
            writeln!(
                self.writer,
                "{},{},{},{},{},{},{},{},",
                frame.frame_id,
                frame.period,
                timestamp,
                ball_state,
                player.id,
                player.team,
                data.coordinates.x,
                data.coordinates.y
            )?;
        }

        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes a whole dataset to a CSV file.
pub fn write_csv<P: AsRef<Path>>(path: P, dataset: &TrackingDataset) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = CsvWriter::new(file);
    writer.write_header()?;
    writer.write_frames(&dataset.records)?;
    writer.flush()?;
    Ok(())
}
