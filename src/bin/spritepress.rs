use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use spritepress::{
    BackendKind, ConversionRequest, FitMode, JobConfig, MetaFormat, SortMode, SpriteRegistry,
};

#[derive(Parser, Debug)]
#[command(name = "spritepress", version, about)]
struct Cli {
    /// Load a JSON job config; flags given on the command line override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an SVG file to PNG, or every .svg/.png under a directory into an output directory.
    Convert(ConvertArgs),
    /// Pack SVG/PNG inputs into a grid spritesheet.
    Sheet(SheetArgs),
    /// List raster backends and whether they can run here (add --verbose for details).
    Backends,
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input file or directory.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (or directory for batch conversion).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Raster backend.
    #[arg(short, long)]
    backend: Option<BackendKind>,

    /// Overwrite existing outputs.
    #[arg(short, long)]
    force: bool,
}

#[derive(Args, Debug)]
struct SizeArgs {
    /// Scale factor applied to the intrinsic size.
    #[arg(long)]
    scale: Option<f64>,

    /// Output width in pixels (height follows the aspect ratio unless given).
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels (width follows the aspect ratio unless given).
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    #[command(flatten)]
    io: IoArgs,

    #[command(flatten)]
    size: SizeArgs,
}

#[derive(Args, Debug)]
struct SheetArgs {
    #[command(flatten)]
    io: IoArgs,

    #[command(flatten)]
    size: SizeArgs,

    /// Tile width in pixels.
    #[arg(long)]
    tile_width: Option<u32>,

    /// Tile height in pixels.
    #[arg(long)]
    tile_height: Option<u32>,

    /// Number of columns (conflicts with --rows).
    #[arg(long, conflicts_with = "rows")]
    cols: Option<u32>,

    /// Number of rows (conflicts with --cols).
    #[arg(long)]
    rows: Option<u32>,

    /// Transparent gap between tiles, in pixels.
    #[arg(long)]
    padding: Option<u32>,

    /// Sprite ordering.
    #[arg(long, value_enum)]
    sort: Option<SortChoice>,

    /// Write sprite metadata to this .json or .csv file.
    #[arg(long)]
    meta: Option<PathBuf>,

    /// Metadata format, when the extension should not decide.
    #[arg(long, value_enum)]
    meta_format: Option<MetaChoice>,

    /// Trim transparent borders before resizing to the tile size.
    #[arg(long)]
    trim: bool,

    /// How tiles are brought to the tile size.
    #[arg(long, value_enum)]
    fit: Option<FitChoice>,

    /// Convert tiles on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (default: one per core).
    #[arg(long)]
    threads: Option<usize>,

    /// Inputs per worker task for --parallel.
    #[arg(long)]
    chunk_size: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortChoice {
    Name,
    Mtime,
    Manual,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MetaChoice {
    Json,
    Csv,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FitChoice {
    Stretch,
    Fit,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let registry = SpriteRegistry::with_builtin();
    match cli.cmd {
        Command::Convert(args) => cmd_convert(&registry, cli.config, args),
        Command::Sheet(args) => cmd_sheet(&registry, cli.config, args),
        Command::Backends => cmd_backends(&registry, cli.verbose > 0),
    }
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("install log subscriber")
}

fn base_config(path: Option<PathBuf>) -> anyhow::Result<JobConfig> {
    match path {
        Some(p) => {
            JobConfig::from_path(&p).with_context(|| format!("load config '{}'", p.display()))
        }
        None => Ok(JobConfig::default()),
    }
}

fn apply_common(cfg: &mut JobConfig, io: IoArgs, size: SizeArgs) {
    if let Some(v) = io.input {
        cfg.input = v;
    }
    if let Some(v) = io.output {
        cfg.output = v;
    }
    if let Some(v) = io.backend {
        cfg.backend = v.id().to_string();
    }
    cfg.force |= io.force;

    // Any sizing flag replaces the config file's sizing entirely.
    if size.scale.is_some() || size.width.is_some() || size.height.is_some() {
        cfg.scale = size.scale.unwrap_or(0.0);
        cfg.width = size.width.unwrap_or(0);
        cfg.height = size.height.unwrap_or(0);
    }
}

fn finish_config(mut cfg: JobConfig) -> anyhow::Result<JobConfig> {
    // Reject contradictory sizing before defaults would paper over it.
    ConversionRequest::new(cfg.scale, cfg.width, cfg.height)?;
    cfg.apply_defaults();
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_convert(
    registry: &SpriteRegistry,
    config: Option<PathBuf>,
    args: ConvertArgs,
) -> anyhow::Result<()> {
    let mut cfg = base_config(config)?;
    apply_common(&mut cfg, args.io, args.size);
    let cfg = finish_config(cfg)?;

    if cfg.input.is_dir() {
        let report = spritepress::convert_batch(registry, &cfg)?;
        eprintln!(
            "converted {} file(s), copied {} into {}",
            report.converted,
            report.copied,
            cfg.output.display()
        );
    } else {
        spritepress::convert_one(registry, &cfg)?;
        eprintln!("wrote {}", cfg.output.display());
    }
    Ok(())
}

fn cmd_sheet(
    registry: &SpriteRegistry,
    config: Option<PathBuf>,
    args: SheetArgs,
) -> anyhow::Result<()> {
    let mut cfg = base_config(config)?;
    apply_common(&mut cfg, args.io, args.size);

    if let Some(v) = args.tile_width {
        cfg.tile_width = v;
    }
    if let Some(v) = args.tile_height {
        cfg.tile_height = v;
    }
    if let Some(v) = args.cols {
        cfg.cols = v;
        cfg.rows = 0;
    }
    if let Some(v) = args.rows {
        cfg.rows = v;
        cfg.cols = 0;
    }
    if let Some(v) = args.padding {
        cfg.padding = v;
    }
    if let Some(v) = args.sort {
        cfg.sort = match v {
            SortChoice::Name => SortMode::Name,
            SortChoice::Mtime => SortMode::Mtime,
            SortChoice::Manual => SortMode::Manual,
        };
    }
    if let Some(v) = args.meta {
        cfg.meta = Some(v);
    }
    if let Some(v) = args.meta_format {
        cfg.meta_format = Some(match v {
            MetaChoice::Json => MetaFormat::Json,
            MetaChoice::Csv => MetaFormat::Csv,
        });
    }
    if let Some(v) = args.fit {
        cfg.fit = match v {
            FitChoice::Stretch => FitMode::Stretch,
            FitChoice::Fit => FitMode::Fit,
        };
    }
    cfg.trim |= args.trim;
    cfg.parallel |= args.parallel;
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }
    if let Some(v) = args.chunk_size {
        cfg.chunk_size = v;
    }

    let cfg = finish_config(cfg)?;
    let meta = spritepress::generate_sheet(registry, &cfg)?;
    eprintln!(
        "wrote {} ({} sprites, {}x{} grid, {}x{} px)",
        cfg.output.display(),
        meta.sprites.len(),
        meta.columns,
        meta.rows,
        meta.canvas_width,
        meta.canvas_height
    );
    if let Some((path, _)) = cfg.metadata_target() {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_backends(registry: &SpriteRegistry, verbose: bool) -> anyhow::Result<()> {
    for d in registry.describe_all(ConversionRequest::intrinsic()) {
        let status = if d.available { "available" } else { "unavailable" };
        println!("{:<10} {status}", d.identifier);
        if verbose {
            println!("           {}", d.display_name);
            println!("           {}", d.description);
        }
    }
    Ok(())
}
