use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use annorender::annotate;
use annorender::memory::{InMemoryHost, InMemorySequence};
use annorender::pipeline::FrameOutputState;
use annorender::pixels::{Payload, SampleState};
use annorender::{
    AnnotatedPipeline, CinematicSequence, FrameNumber, MergedOutputFrame, PassIdentifier,
    PipelineStage, PixelBuffer, PixelType, RenderConfig, ThreadedImageWriteQueue,
};

#[derive(Parser, Debug)]
#[command(name = "annorender", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON scene through the full pipeline with flat-colour frames.
    Replay(ReplayArgs),
    /// Decode a sidecar and print it as JSON.
    Inspect(InspectArgs),
    /// Convert first-frame camera sidecars to JSON documents.
    ConvertCameras(ConvertArgs),
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Scene JSON (sequence, bindings, objects).
    #[arg(long)]
    scene: PathBuf,

    /// Render config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Render at most this many frames of the playback range.
    #[arg(long)]
    frames: Option<u32>,

    /// Image writer threads (defaults to rayon's choice).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Sidecar `.dat` file.
    path: PathBuf,

    /// How to decode the file.
    #[arg(long, value_enum, default_value_t = SidecarKind::Floats)]
    kind: SidecarKind,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SidecarKind {
    Camera,
    Actor,
    Stencil,
    Floats,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Camera sidecar directory, e.g. `output/camera_params`.
    camera_dir: PathBuf,

    /// Delete each `.dat` after converting it.
    #[arg(long)]
    remove_dat: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Replay(args) => cmd_replay(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::ConvertCameras(args) => cmd_convert(args),
    }
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let config = RenderConfig::load(&args.config)?;
    let sequence = InMemorySequence::load(&args.scene)?;
    let level = sequence.level_name().to_owned();
    let sequence: Arc<dyn CinematicSequence> = Arc::new(sequence);

    let queue = Arc::new(ThreadedImageWriteQueue::new(
        args.threads,
        annorender::output::DEFAULT_MAX_IN_FLIGHT,
    )?);
    let mut host = InMemoryHost::new(config.output.clone(), Arc::clone(&sequence))
        .with_color_setting(config.color.clone())
        .with_level_name(level);
    let mut pipeline = AnnotatedPipeline::from_config(&config, queue);
    pipeline.setup_for_pipeline(&mut host)?;

    let mut passes = Vec::new();
    if config.stage.enable_render_pass_rgb {
        passes.push(PassIdentifier::final_image());
    }
    passes.extend(
        pipeline
            .fanout()
            .passes()
            .filter(|p| p.enabled && !p.synthetic_pass_name.is_empty())
            .map(|p| PassIdentifier::new(p.synthetic_pass_name.clone())),
    );

    let camera_name = pipeline
        .bindings()
        .cameras
        .values()
        .next()
        .map(|c| c.export_name.clone())
        .unwrap_or_default();
    let range = sequence.playback_range();
    let count = args
        .frames
        .map_or(range.len_frames(), |n| n.min(range.len_frames()));
    let res = config.output.output_resolution;

    for i in 0..count as i32 {
        let state = FrameOutputState {
            frame_index: FrameNumber(i),
            source_frame_number: range.start.offset(i),
            shot_source_frame_number: range.start.offset(i),
            shot_output_frame_number: FrameNumber(i),
            camera_count: 1,
            camera_name: camera_name.clone(),
            shot_name: sequence.name().to_owned(),
            ..FrameOutputState::default()
        };
        let mut frame = MergedOutputFrame::new(state.clone());
        for (k, pass) in passes.iter().enumerate() {
            let payload = Payload {
                sample_state: SampleState {
                    output_state: state.clone(),
                },
                require_transparent: false,
            };
            let colour = flat_colour(k);
            let buffer = PixelBuffer::solid(PixelType::Float16, res.width, res.height, colour, payload);
            frame.image_outputs.insert(pass.clone(), buffer);
        }
        let report = pipeline.on_receive_image_data(&mut host, frame)?;
        tracing::debug!(frame = i, ?report, "replayed frame");
    }
    pipeline.begin_export(&mut host);

    let results = host.wait_all();
    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    for (data, r) in &results {
        if let Err(e) = r {
            eprintln!("failed to write {}: {e}", data.file_path);
        }
    }
    let root = annorender::naming::normalize_path(&config.output.output_directory)?;
    eprintln!(
        "rendered {count} frames, {} images ({failed} failed)",
        results.len()
    );
    println!("{root}");
    if failed > 0 {
        anyhow::bail!("{failed} image writes failed");
    }
    Ok(())
}

fn flat_colour(pass: usize) -> [f32; 4] {
    const PALETTE: [[f32; 4]; 4] = [
        [0.8, 0.8, 0.8, 1.0],
        [1.0, 0.0, 0.0, 1.0],
        [0.0, 1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0, 1.0],
    ];
    PALETTE[pass % PALETTE.len()]
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let path = args.path.as_path();
    let json = match args.kind {
        SidecarKind::Camera => serde_json::to_string_pretty(&annotate::read_camera_record(path)?)?,
        SidecarKind::Actor => serde_json::to_string_pretty(&annotate::read_actor_info(path)?)?,
        SidecarKind::Stencil => serde_json::to_string_pretty(&annotate::read_stencil_id(path)?)?,
        SidecarKind::Floats => serde_json::to_string_pretty(&annotate::read_float_array(path)?)?,
    };
    println!("{json}");
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let written = annotate::convert_camera_dir(&args.camera_dir, args.remove_dat)
        .with_context(|| format!("convert cameras in '{}'", args.camera_dir.display()))?;
    for p in &written {
        println!("{}", p.display());
    }
    Ok(())
}
