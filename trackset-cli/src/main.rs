//! SkillCorner tracking-data CLI application.
//!
//! Deserializes a match-data / structured-data JSON pair into the canonical
//! coordinate system and exports it as CSV.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use trackset_core::deserializer::{DeserializeOptions, SkillCornerDeserializer};
use trackset_core::{output, Provider};

/// SkillCorner broadcast tracking data converter.
///
/// Reads the provider's match_data.json and structured_data.json and writes
/// one CSV row per tracked entity per frame, with all coordinates
/// normalized into the chosen coordinate system.
#[derive(Parser, Debug)]
#[command(name = "trackset")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Match metadata JSON file (teams, players, pitch size)
    #[arg(value_name = "METADATA")]
    metadata: PathBuf,

    /// Structured tracking data JSON file (the frame sequence)
    #[arg(value_name = "RAW_DATA")]
    raw_data: PathBuf,

    /// Output CSV file path
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Fraction of frames to keep, in (0, 1]
    #[arg(short, long, default_value_t = 1.0)]
    sample_rate: f64,

    /// Maximum number of frames to emit (0 = unlimited)
    #[arg(short, long, default_value_t = 0)]
    limit: usize,

    /// Keep frames without any position records
    #[arg(long)]
    include_empty_frames: bool,

    /// Target coordinate system: "canonical" or "skillcorner"
    #[arg(short, long, default_value = "canonical")]
    coordinate_system: String,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let coordinate_system = Provider::from_name(&args.coordinate_system)
        .with_context(|| {
            format!(
                "Unknown coordinate system `{}`. Use canonical or skillcorner",
                args.coordinate_system
            )
        })?;

    // Setup progress bar
    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        pb.set_message("Deserializing...");
        pb
    };

    let start_time = Instant::now();

    progress.set_message(format!(
        "Deserializing {:?}...",
        args.raw_data.file_name().unwrap_or_default()
    ));

    let deserializer = SkillCornerDeserializer::new(DeserializeOptions {
        sample_rate: args.sample_rate,
        limit: args.limit,
        include_empty_frames: args.include_empty_frames,
        coordinate_system,
    });
    let dataset = deserializer
        .deserialize_files(&args.metadata, &args.raw_data)
        .context("Failed to deserialize tracking data")?;

    let deserialize_duration = start_time.elapsed();

    if !args.quiet {
        progress.set_message(format!(
            "Deserialized {} frames in {:.2}s",
            dataset.len(),
            deserialize_duration.as_secs_f64()
        ));
    }

    progress.set_message(format!(
        "Writing to {:?}...",
        args.output.file_name().unwrap_or_default()
    ));

    output::write_csv(&args.output, &dataset).context("Failed to write CSV output")?;

    let total_duration = start_time.elapsed();

    progress.finish_with_message(format!(
        "Done! {} frames in {:.2}s ({} vs {})",
        dataset.len(),
        total_duration.as_secs_f64(),
        dataset.metadata.home_team().name,
        dataset.metadata.away_team().name
    ));

    if !args.quiet {
        // Print summary
        let frames_per_sec = dataset.len() as f64 / total_duration.as_secs_f64();
        eprintln!();
        eprintln!("Summary:");
        eprintln!("  Metadata:     {:?}", args.metadata);
        eprintln!("  Raw data:     {:?}", args.raw_data);
        eprintln!("  Output:       {:?}", args.output);
        eprintln!(
            "  Match:        {} {} - {} {}",
            dataset.metadata.home_team().name,
            dataset.metadata.score.home,
            dataset.metadata.score.away,
            dataset.metadata.away_team().name
        );
        eprintln!("  Frames:       {}", dataset.len());
        eprintln!(
            "  Players:      {} home, {} away",
            dataset.metadata.home_team().players.len(),
            dataset.metadata.away_team().players.len()
        );
        for period in dataset.metadata.periods.values() {
            eprintln!(
                "  Period {}:     {:.0}s - {:.0}s, attacking {:?}",
                period.id, period.start_timestamp, period.end_timestamp, period.attacking_direction
            );
        }
        eprintln!("  Orientation:  {:?}", dataset.metadata.orientation);
        eprintln!("  Target:       {}", coordinate_system);
        eprintln!("  Duration:     {:.3}s", total_duration.as_secs_f64());
        eprintln!("  Throughput:   {:.0} frames/s", frames_per_sec);
    }

    Ok(())
}
