use clap::Parser;
use pitch_control::board::Board;
use pitch_control::data_loader::load_observations;
use pitch_control::io::{object_from_json, write_report};
use pitch_control::pipeline::{FrameOutput, PipelineConfig, process_frames};
use pitch_control::types::{PitchError, Team};
use pitch_control::visualization::{draw_positions, render_control_field};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(version, about, author)]
struct PcrsCli {
    /// glob pattern of frame observation json files, e.g. "frames/*.json"
    frames: String,

    /// pipeline config json, defaults are used for missing fields
    #[arg(short, long)]
    config: Option<String>,

    /// output folder
    #[arg(short, long, default_value = "output")]
    output: String,

    /// save a control-field png for every frame
    #[arg(long)]
    render: bool,

    /// override the ransac seed from the config
    #[arg(long)]
    seed: Option<u64>,
}

fn render_frame(
    output: &FrameOutput,
    config: &PipelineConfig,
    folder: &Path,
) -> Result<(), PitchError> {
    let mut img = render_control_field(
        &output.control_field,
        &config.raster,
        &config.team_colors,
        config.opacity,
    );
    draw_positions(
        &mut img,
        &config.raster,
        &output.team_a,
        config.team_colors.color(Team::A),
    );
    draw_positions(
        &mut img,
        &config.raster,
        &output.team_b,
        config.team_colors.color(Team::B),
    );
    img.save(folder.join(format!("control_{:06}.png", output.result.frame)))?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let cli = PcrsCli::parse();

    let mut config: PipelineConfig = match &cli.config {
        Some(path) => object_from_json(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.homography.seed = seed;
    }

    let output_folder = PathBuf::from(&cli.output);
    std::fs::create_dir_all(&output_folder)?;

    let observations = load_observations(&cli.frames)?;
    if observations.is_empty() {
        log::warn!("no frames found for {}", cli.frames);
        return Ok(());
    }
    log::info!("loaded {} frames", observations.len());

    let board = Board::fifa();
    let now = Instant::now();
    let results = process_frames(&observations, &board, &config, |output| {
        if cli.render {
            render_frame(output, &config, &output_folder)
        } else {
            Ok(())
        }
    })?;
    let duration_sec = now.elapsed().as_secs_f64();
    log::info!(
        "processing took {:.6} sec, avg {:.6} sec per frame",
        duration_sec,
        duration_sec / results.len() as f64
    );

    let with_h = results.iter().filter(|r| r.homography.is_some()).count();
    log::info!("homography available for {} / {} frames", with_h, results.len());

    let report_path = output_folder.join("report.json");
    write_report(&report_path, &results)?;
    log::info!("report written to {}", report_path.display());
    Ok(())
}
