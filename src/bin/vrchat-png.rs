use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vrchat-png", version)]
struct Cli {
    /// Log debug details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite one preview image into a branded thumbnail.
    Thumbnail(ThumbnailArgs),
    /// Composite thumbnails for every record of a catalog JSON export.
    Catalog(CatalogArgs),
}

#[derive(Parser, Debug)]
struct ThumbnailArgs {
    /// Input preview image.
    #[arg(short = 'i', long = "image")]
    image: PathBuf,

    /// Output PNG path or directory. Defaults to the input image's directory.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Supported platforms: 0 (PC + Quest), 1 (PC only), 2 (Quest only).
    #[arg(short, long, value_parser = parse_platform)]
    platform: vrchat_png::PlatformSupport,

    /// Avatar name.
    #[arg(short, long)]
    name: String,

    /// Avatar author name.
    #[arg(short, long)]
    author: String,

    /// Directory holding the overlay images and font.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Draw the asset-file badge.
    #[arg(long)]
    has_asset: bool,

    /// Archive appended after the PNG data.
    #[arg(long)]
    payload: Option<PathBuf>,

    /// Print the resolved font path and family name.
    #[arg(long)]
    dump_font: bool,
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Catalog JSON holding one avatar record or an array of them.
    #[arg(short = 'i', long = "in")]
    in_path: PathBuf,

    /// Output directory. Defaults to the JSON file's directory.
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Directory holding the downloaded preview images.
    #[arg(long)]
    images_dir: PathBuf,

    /// Directory holding the overlay images and font.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Avatar cache export searched for `{id}.*.vrca` bundles.
    #[arg(short = 'A', long)]
    asset_dir: Option<PathBuf>,

    /// Write only the thumbnail, without the appended record archive.
    #[arg(short = 'X', long)]
    no_zip: bool,

    /// Write the cleaned record JSON next to each thumbnail.
    #[arg(long)]
    write_json: bool,

    /// Continue past failing records and report them at the end.
    #[arg(long)]
    keep_going: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Thumbnail(args) => cmd_thumbnail(args),
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_platform(s: &str) -> Result<vrchat_png::PlatformSupport, String> {
    s.parse().map_err(|e: vrchat_png::VrcPngError| e.to_string())
}

fn cmd_thumbnail(args: ThumbnailArgs) -> anyhow::Result<()> {
    let source = std::fs::read(&args.image)
        .with_context(|| format!("read image '{}'", args.image.display()))?;

    if args.dump_font {
        dump_font_diagnostics(&args.data_dir)?;
    }

    let image = vrchat_png::make_thumbnail(&vrchat_png::CompositionRequest {
        source: vrchat_png::SourceImage::Encoded(&source),
        platform: args.platform,
        avatar_name: &args.name,
        author_name: &args.author,
        data_dir: &args.data_dir,
        contains_asset: args.has_asset,
    })?;

    let payload = match &args.payload {
        Some(path) => Some(
            std::fs::read(path)
                .with_context(|| format!("read payload '{}'", path.display()))?,
        ),
        None => None,
    };
    let out = vrchat_png::resolve_output_path(&args.image, args.out.as_deref());
    vrchat_png::write_thumbnail(&out, &image, payload.as_deref())?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let records = vrchat_png::load_records(&args.in_path)?;
    let out_dir = match args.out_dir {
        Some(dir) => dir,
        None => args
            .in_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;

    let opts = vrchat_png::BatchOpts {
        data_dir: args.data_dir,
        images_dir: args.images_dir,
        asset_dir: args.asset_dir,
        out_dir,
        embed_archive: !args.no_zip,
        write_record_json: args.write_json,
        keep_going: args.keep_going,
    };
    let report = vrchat_png::run_batch(&records, &opts)?;

    for outcome in &report.outcomes {
        if let Err(e) = &outcome.result {
            eprintln!("failed {}: {e}", outcome.unique_name);
        }
    }
    eprintln!(
        "wrote {} of {} thumbnails to {}",
        report.succeeded(),
        report.outcomes.len(),
        opts.out_dir.display()
    );
    if report.failed() > 0 {
        anyhow::bail!("{} record(s) failed", report.failed());
    }
    Ok(())
}

fn dump_font_diagnostics(data_dir: &Path) -> anyhow::Result<()> {
    let path = vrchat_png::resolve_font(data_dir)?;
    let bytes =
        std::fs::read(&path).with_context(|| format!("read font '{}'", path.display()))?;
    let captions = vrchat_png::CaptionRenderer::new(&bytes)?;
    eprintln!("font diagnostics:");
    eprintln!("  path:   {}", path.display());
    eprintln!("  family: {}", captions.family_name());
    eprintln!("  bytes:  {}", bytes.len());
    Ok(())
}
