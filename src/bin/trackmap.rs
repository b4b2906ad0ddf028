use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "trackmap", version)]
struct Cli {
    /// Log pipeline steps to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON job (tiles, track, POIs, crop, legend) to an image.
    Render(RenderArgs),
    /// Write a flat grey placeholder tile.
    BlankTile(BlankTileArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input job JSON.
    #[arg(long)]
    job: PathBuf,

    /// Output image path; the extension picks PNG, JPEG or BMP.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BlankTileArgs {
    #[arg(long, default_value_t = 256)]
    width: u32,

    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Tile index; even and odd indices get different greys.
    #[arg(long, default_value_t = 0)]
    index: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::BlankTile(args) => cmd_blank_tile(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let job = trackmap::RenderJob::from_path(&args.job)
        .with_context(|| format!("load job '{}'", args.job.display()))?;
    let assets_root = args.job.parent().unwrap_or_else(|| Path::new("."));

    let mut session = job.into_session(assets_root)?;
    session
        .save(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;

    let (w, h) = session.dimensions();
    eprintln!("wrote {} ({w}x{h})", args.out.display());
    Ok(())
}

fn cmd_blank_tile(args: BlankTileArgs) -> anyhow::Result<()> {
    let bytes = trackmap::blank_tile(args.width, args.height, args.index)?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
