use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "covergen", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every cover of a series (or one with --index) to image files.
    Render(RenderArgs),
    /// Validate a series and run the determinism probe on every cover.
    Check(CheckArgs),
    /// Print the motif placements of one cover as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input series JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Canvas side in pixels.
    #[arg(long, default_value_t = 3000)]
    size: u32,

    /// Image format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,

    /// Font file to register (repeatable). Text needs at least one.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Render only this item (0-based).
    #[arg(long)]
    index: Option<usize>,

    /// Render covers one after another instead of on a thread pool.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Print registered font families with the SHA-256 of their bytes.
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input series JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Canvas side used for the probe renders.
    #[arg(long, default_value_t = 400)]
    size: u32,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input series JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Item index (0-based).
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Canvas side in pixels.
    #[arg(long, default_value_t = 1000)]
    size: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpg,
}

impl From<FormatChoice> for covergen::ExportFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Png => covergen::ExportFormat::Png,
            FormatChoice::Jpg => covergen::ExportFormat::Jpg,
        }
    }
}

const JPEG_QUALITY: u8 = 92;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_series(path: &Path) -> anyhow::Result<covergen::SeriesDoc> {
    let doc = covergen::SeriesDoc::from_path(path)
        .with_context(|| format!("load series '{}'", path.display()))?;
    doc.validate()
        .with_context(|| format!("validate series '{}'", path.display()))?;
    Ok(doc)
}

fn read_fonts(paths: &[PathBuf]) -> anyhow::Result<Vec<covergen::FontBytes>> {
    paths
        .iter()
        .map(|p| {
            std::fs::read(p)
                .map(Arc::new)
                .with_context(|| format!("read font '{}'", p.display()))
        })
        .collect()
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let doc = read_series(&args.in_path)?;
    let canvas = covergen::Canvas::new(args.size)?;
    let fonts = read_fonts(&args.fonts)?;
    if args.dump_fonts {
        dump_font_diagnostics(canvas, &args.fonts, &fonts)?;
    }

    let geometry = Arc::new(covergen::GeometryLibrary::builtin()?);
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let frames = match args.index {
        Some(index) => vec![render_single(geometry, canvas, &doc, index, &fonts)?],
        None => {
            let job = covergen::SeriesJob {
                canvas,
                theme: &doc.theme,
                items: &doc.items,
                series_seed: &doc.series_seed,
                fonts: &fonts,
            };
            let threading = covergen::SeriesThreading {
                parallel: !args.sequential,
                threads: args.threads,
            };
            covergen::render_series(geometry, &job, &threading)?
        }
    };

    let format = covergen::ExportFormat::from(args.format);
    for cover in frames {
        let index = cover.index;
        let name = covergen::export_file_name(index, &doc.items[index], format);
        let out = args.out_dir.join(name);
        write_image(&out, &cover.frame, format)?;
        for warning in &cover.report.warnings {
            eprintln!("warning: cover {}: {warning}", index + 1);
        }
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

/// One cover at its real series index, so the seed key matches a full-series render.
fn render_single(
    geometry: Arc<covergen::GeometryLibrary>,
    canvas: covergen::Canvas,
    doc: &covergen::SeriesDoc,
    index: usize,
    fonts: &[covergen::FontBytes],
) -> anyhow::Result<covergen::CoverFrame> {
    let item = doc.item(index)?;
    let mut surface = covergen::CpuSurface::new(canvas)?;
    surface.register_fonts(fonts)?;
    let mut composer = covergen::Composer::new(geometry);
    let report = composer.render_composition(
        &mut surface,
        canvas,
        &doc.theme,
        item,
        &covergen::SeedContext::new(doc.series_seed.as_str(), index),
    )?;
    Ok(covergen::CoverFrame {
        index,
        frame: surface.into_frame(),
        report,
    })
}

fn write_image(
    path: &Path,
    frame: &covergen::FrameRGBA,
    format: covergen::ExportFormat,
) -> anyhow::Result<()> {
    let rgba = frame.to_straight_rgba8();
    match format {
        covergen::ExportFormat::Png => image::save_buffer_with_format(
            path,
            &rgba,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display())),
        covergen::ExportFormat::Jpg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            let f = File::create(path)
                .with_context(|| format!("create jpg '{}'", path.display()))?;
            let mut w = BufWriter::new(f);
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut w, JPEG_QUALITY)
                .encode(
                    &rgb,
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgb8,
                )
                .with_context(|| format!("write jpg '{}'", path.display()))?;
            w.flush()
                .with_context(|| format!("flush jpg '{}'", path.display()))
        }
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let doc = read_series(&args.in_path)?;
    let canvas = covergen::Canvas::new(args.size)?;
    let mut composer = covergen::Composer::with_builtin_geometry()?;
    composer.check_geometry(&doc.theme)?;

    let mut failures = 0usize;
    for (index, item) in doc.items.iter().enumerate() {
        let ctx = covergen::SeedContext::new(doc.series_seed.as_str(), index);
        let probe = covergen::probe_determinism(
            &mut composer,
            covergen::RecordingSurface::new,
            canvas,
            &doc.theme,
            item,
            &ctx,
        )?;
        if probe.is_deterministic() {
            println!("cover {}: ok (hash {:016x})", index + 1, probe.fresh);
        } else {
            failures += 1;
            println!(
                "cover {}: mismatch ({:016x} vs {:016x})",
                index + 1,
                probe.fresh,
                probe.cached
            );
        }
    }
    if failures > 0 {
        anyhow::bail!("determinism check failed for {failures} cover(s)");
    }
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let doc = read_series(&args.in_path)?;
    let canvas = covergen::Canvas::new(args.size)?;
    let item = doc.item(args.index)?;
    let mut composer = covergen::Composer::with_builtin_geometry()?;
    let placements = composer.placements(
        canvas,
        &doc.theme,
        &covergen::SeedContext::new(doc.series_seed.as_str(), args.index),
        item,
    )?;
    let json = serde_json::to_string_pretty(&*placements).context("serialize placements")?;
    println!("{json}");
    Ok(())
}

fn dump_font_diagnostics(
    canvas: covergen::Canvas,
    paths: &[PathBuf],
    fonts: &[covergen::FontBytes],
) -> anyhow::Result<()> {
    eprintln!("font diagnostics:");
    let mut surface = covergen::CpuSurface::new(canvas)?;
    for (path, bytes) in paths.iter().zip(fonts) {
        let family = surface
            .register_font(bytes)
            .with_context(|| format!("register font '{}'", path.display()))?;
        eprintln!("  {}:", path.display());
        eprintln!("    family: {family}");
        eprintln!("    sha256: {}", sha256_hex(bytes));
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
