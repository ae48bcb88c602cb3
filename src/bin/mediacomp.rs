use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mediacomp::interact::plot;
use mediacomp::{MediaConfig, MediaSession};

#[derive(Parser, Debug)]
#[command(name = "mediacomp", version)]
struct Cli {
    /// Session settings as JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Folder that relative file names are resolved against.
    #[arg(long, global = true)]
    media_folder: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe a picture or sound file.
    Info(InfoArgs),
    /// Plot a sound as a PNG.
    Waveform(WaveformArgs),
    /// Copy a numbered frame sequence into a directory as frame0001.png, frame0002.png, ...
    Frames(FramesArgs),
    /// Encode a numbered frame sequence as .mov or .avi (requires `ffmpeg` on PATH).
    Movie(MovieArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    file: PathBuf,
}

#[derive(Parser, Debug)]
struct WaveformArgs {
    /// Input sound.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 640, value_parser = extent_parser())]
    width: u32,

    #[arg(long, default_value_t = 480, value_parser = extent_parser())]
    height: u32,
}

fn extent_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(i64::from(plot::MIN_EXTENT)..=i64::from(plot::MAX_EXTENT))
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// First frame; every file whose name differs only in its digits joins the movie.
    #[arg(long)]
    first: PathBuf,

    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct MovieArgs {
    /// First frame; every file whose name differs only in its digits joins the movie.
    #[arg(long)]
    first: PathBuf,

    /// Output path ending in .mov or .avi.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second (defaults to the configured rate).
    #[arg(long)]
    fps: Option<i64>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = MediaConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.media_folder {
        config.media_folder = Some(dir);
    }
    let session = MediaSession::new(config);

    match cli.cmd {
        Command::Info(args) => cmd_info(&session, args),
        Command::Waveform(args) => cmd_waveform(&session, args),
        Command::Frames(args) => cmd_frames(&session, args),
        Command::Movie(args) => cmd_movie(&session, args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();
}

fn cmd_info(session: &MediaSession, args: InfoArgs) -> anyhow::Result<()> {
    if image::ImageFormat::from_path(&args.file).is_ok() {
        let pic = session.make_picture(&args.file)?;
        println!("picture {}", pic.title());
        println!("  width:  {}", pic.width());
        println!("  height: {}", pic.height());
    } else {
        let sound = session.make_sound(&args.file)?;
        println!("sound {}", plot::sound_label(&sound));
        println!("  samples:       {}", sound.len());
        println!("  sampling_rate: {}", sound.sampling_rate());
        println!("  duration:      {:.3}s", sound.duration_secs());
    }
    Ok(())
}

fn cmd_waveform(session: &MediaSession, args: WaveformArgs) -> anyhow::Result<()> {
    let sound = session.make_sound(&args.in_path)?;
    let pic = plot::waveform(&sound, args.width, args.height)?;

    let out = session.resolve(&args.out);
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    pic.write(&out)?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_frames(session: &MediaSession, args: FramesArgs) -> anyhow::Result<()> {
    let mut movie = session.make_movie_from_initial_file(&args.first)?;
    if movie.is_empty() {
        anyhow::bail!("no frames match '{}'", args.first.display());
    }
    session.write_frames_to_directory(&mut movie, Some(&args.out_dir))?;

    eprintln!("wrote {} frames to {}", movie.len(), session.resolve(&args.out_dir).display());
    Ok(())
}

fn cmd_movie(session: &MediaSession, args: MovieArgs) -> anyhow::Result<()> {
    let movie = session.make_movie_from_initial_file(&args.first)?;
    let ext = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("mov") => session.write_quicktime(&movie, &args.out, args.fps)?,
        Some("avi") => session.write_avi(&movie, &args.out, args.fps)?,
        _ => anyhow::bail!("'{}' must end in .mov or .avi", args.out.display()),
    }

    eprintln!("wrote {}", session.resolve(&args.out).display());
    Ok(())
}
