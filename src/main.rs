use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epaper_pipeline::{geometry, Palette, PixelBuffer};
use photoframe::codec::{self, ServeFormat};
use photoframe::models::{
    parse_palette_spec, ColorMethod, ProcessingMode, ProcessingSettings, ToneMode,
};
use photoframe::server;

#[derive(Parser)]
#[command(name = "photoframe")]
#[command(about = "Album server and color pipeline for 7-color e-paper photo frames")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Processing parameters shared by `serve` and `process`.
///
/// Defaults match the standalone converter; a `--config` file passed to
/// `serve` takes precedence over these flags.
#[derive(Args, Debug, Clone)]
struct ProcessingFlags {
    /// Exposure multiplier (1.0 = unchanged)
    #[arg(long, default_value_t = 1.0)]
    exposure: f32,

    /// Saturation multiplier (1.0 = unchanged, >1.0 = more vibrant)
    #[arg(long, default_value_t = 1.5)]
    saturation: f32,

    /// Tone operator: "scurve" or "contrast"
    #[arg(long, default_value = "scurve")]
    tone_mode: String,

    /// Contrast multiplier (used with --tone-mode contrast)
    #[arg(long, default_value_t = 1.3)]
    contrast: f32,

    /// S-curve overall strength (0.0-1.0)
    #[arg(long, default_value_t = 0.9)]
    scurve_strength: f32,

    /// S-curve shadow boost (0.0-1.0)
    #[arg(long, default_value_t = 0.0)]
    scurve_shadow: f32,

    /// S-curve highlight compression (0.5-3.0)
    #[arg(long, default_value_t = 1.5)]
    scurve_highlight: f32,

    /// S-curve midpoint (0.3-0.7)
    #[arg(long, default_value_t = 0.5)]
    scurve_midpoint: f32,

    /// Palette matching metric: "rgb" or "lab"
    #[arg(long, default_value = "rgb")]
    color_method: String,

    /// Paint measured panel colors (darker, preview-accurate output)
    #[arg(long)]
    render_measured: bool,

    /// Processing algorithm: "enhanced" (with tone mapping) or "stock"
    #[arg(long, default_value = "enhanced")]
    processing_mode: String,

    /// Custom device palette: seven comma-separated hex colors
    #[arg(long)]
    palette: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve processed album images over HTTP
    Serve {
        /// Directory containing image albums (one subdirectory each)
        #[arg(long)]
        albums: PathBuf,

        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,

        /// Serve format: jpg, png, or bmp
        #[arg(long, default_value = "bmp")]
        format: String,

        /// Processing settings YAML file (overrides processing flags)
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        processing: ProcessingFlags,
    },

    /// Convert one image to a device BMP plus a thumbnail
    Process {
        /// Input image file (JPEG/PNG)
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Suffix appended to output file names
        #[arg(long, default_value = "")]
        suffix: String,

        /// Skip thumbnail generation
        #[arg(long)]
        no_thumbnail: bool,

        #[command(flatten)]
        processing: ProcessingFlags,
    },
}

fn settings_from_flags(
    flags: &ProcessingFlags,
) -> anyhow::Result<(ProcessingSettings, Option<Palette>)> {
    let tone_mode = match flags.tone_mode.as_str() {
        "scurve" => ToneMode::Scurve,
        "contrast" => ToneMode::Contrast,
        other => anyhow::bail!("invalid tone mode \"{other}\" (expected scurve or contrast)"),
    };
    let color_method = match flags.color_method.as_str() {
        "rgb" => ColorMethod::Rgb,
        "lab" => ColorMethod::Lab,
        other => anyhow::bail!("invalid color method \"{other}\" (expected rgb or lab)"),
    };
    let processing_mode = match flags.processing_mode.as_str() {
        "enhanced" => ProcessingMode::Enhanced,
        "stock" => ProcessingMode::Stock,
        other => anyhow::bail!("invalid processing mode \"{other}\" (expected enhanced or stock)"),
    };

    let settings = ProcessingSettings {
        exposure: flags.exposure,
        saturation: flags.saturation,
        tone_mode,
        contrast: flags.contrast,
        strength: flags.scurve_strength,
        shadow_boost: flags.scurve_shadow,
        highlight_compress: flags.scurve_highlight,
        midpoint: flags.scurve_midpoint,
        color_method,
        render_measured: flags.render_measured,
        processing_mode,
    };

    let palette = flags
        .palette
        .as_deref()
        .map(parse_palette_spec)
        .transpose()?;

    Ok((settings, palette))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            albums,
            bind,
            format,
            config,
            processing,
        } => run_serve(albums, bind, &format, config, processing).await,
        Commands::Process {
            input,
            output_dir,
            suffix,
            no_thumbnail,
            processing,
        } => run_process(&input, &output_dir, &suffix, !no_thumbnail, processing),
    }
}

async fn run_serve(
    albums: PathBuf,
    bind: String,
    format: &str,
    config: Option<PathBuf>,
    processing: ProcessingFlags,
) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photoframe=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let serve_format: ServeFormat = format.parse()?;

    let (flag_settings, device_palette) = settings_from_flags(&processing)?;
    let settings = match config {
        Some(path) => ProcessingSettings::load_from_file(&path),
        None => flag_settings,
    };

    let state = server::create_app_state(&albums, serve_format, settings, device_palette)?;
    tracing::info!(
        images = state.library.len(),
        albums = state.library.album_count(),
        format = %serve_format,
        "Album library ready"
    );

    let app = server::build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(addr = %bind, "photoframe server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn run_process(
    input: &PathBuf,
    output_dir: &PathBuf,
    suffix: &str,
    thumbnail: bool,
    processing: ProcessingFlags,
) -> anyhow::Result<()> {
    // Minimal logging for CLI use
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photoframe=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let (settings, device_palette) = settings_from_flags(&processing)?;

    anyhow::ensure!(input.exists(), "input file not found: {}", input.display());
    std::fs::create_dir_all(output_dir)?;

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let bmp_path = output_dir.join(format!("{stem}{suffix}.bmp"));
    let thumb_path = output_dir.join(format!("{stem}{suffix}.jpg"));

    println!("Processing: {}", input.display());
    let source = codec::decode_file(input)?;
    println!("  Source size: {}x{}", source.width(), source.height());

    let portrait = geometry::is_portrait(&source);

    // Portrait sources rotate to the landscape panel, except in
    // render-measured preview mode, which keeps the source orientation
    // and swaps the canvas instead so the preview reads naturally.
    let (target_w, target_h, rotate) = if portrait && settings.render_measured {
        (480, 800, false)
    } else {
        (800, 480, true)
    };
    if portrait && rotate {
        println!("  Portrait source, rotating 90 degrees clockwise");
    }

    let mut canvas = geometry::normalize(&source, target_w, target_h, rotate);
    let params = settings.to_params(device_palette);
    epaper_pipeline::process(&mut canvas, &params)?;

    println!(
        "  Writing BMP ({}x{}): {}",
        canvas.width(),
        canvas.height(),
        bmp_path.display()
    );
    std::fs::write(&bmp_path, codec::encode_bmp(&canvas))?;

    if thumbnail {
        let thumb = make_cli_thumbnail(&source, portrait);
        println!("  Writing thumbnail: {}", thumb_path.display());
        std::fs::write(&thumb_path, codec::encode_jpeg(&thumb, 80)?)?;
    }

    println!("Done.");
    Ok(())
}

/// Small gallery thumbnail in the source orientation.
fn make_cli_thumbnail(source: &PixelBuffer, portrait: bool) -> PixelBuffer {
    let (w, h) = if portrait { (96, 160) } else { (160, 96) };
    geometry::resize_cover(source, w, h)
}
