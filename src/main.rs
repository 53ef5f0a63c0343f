use clap::{Parser, Subcommand};
use image_framer::config::{self, FramerConfig};
use image_framer::batch::{self, BatchOptions};
use image_framer::imaging::{
    FrameSize, FrameWidthCalculator, FrameWidthStrategy, ImageProcessor, Quality, Size,
    load_bitmap, save_bitmap,
};
use image_framer::output;
use image_framer::preview::FramePreview;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// How big the frame should be, shared by every command that frames.
#[derive(clap::Args, Clone)]
struct FrameArgs {
    /// Frame size, 0-30 (default from config)
    #[arg(long, conflicts_with = "position")]
    size: Option<u32>,

    /// Frame size as a slider position, 0.0-1.0 over the full range
    #[arg(long)]
    position: Option<f32>,

    /// Frame width policy (default from config)
    #[arg(long, value_enum)]
    strategy: Option<FrameWidthStrategy>,
}

impl FrameArgs {
    fn frame_size(&self, config: &FramerConfig) -> FrameSize {
        if let Some(position) = self.position {
            return FrameSize::from_slider(position);
        }
        let requested = self.size.unwrap_or(config.frame.size);
        let frame_size = FrameSize::new(requested);
        if frame_size.value() != requested {
            tracing::warn!(requested, used = frame_size.value(), "Frame size clamped");
        }
        frame_size
    }

    fn strategy(&self, config: &FramerConfig) -> FrameWidthStrategy {
        self.strategy.unwrap_or(config.frame.strategy)
    }
}

#[derive(Parser)]
#[command(name = "image-framer")]
#[command(about = "Put photos in square white frames")]
#[command(long_about = "\
Put photos in square white frames

Every framed photo becomes a square whose side is the photo's longest side.
The photo is scaled down to leave a border and centered; the border is white.

Frame size runs from 0 (no border) to 30. How that becomes pixels depends on
the frame width policy:

  fixed-scale   border = longest side * size * 0.53%   (size 30 ≈ 16%)
  percentage    border = longest side * size %

Run 'image-framer gen-config' to generate a documented framer.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Frame one or more photos
    Frame {
        /// Photos to frame
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory framed copies are written to
        #[arg(long, default_value = "framed")]
        output_dir: PathBuf,

        /// Pixels per logical unit of the input photos
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        #[command(flatten)]
        frame: FrameArgs,
    },
    /// Write a framed preview of a photo fitted into the preview box
    Preview {
        input: PathBuf,

        /// Where to write the preview
        #[arg(long, short)]
        output: PathBuf,

        /// Preview box width (default from config)
        #[arg(long)]
        width: Option<f64>,

        /// Preview box height (default from config)
        #[arg(long)]
        height: Option<f64>,

        #[command(flatten)]
        frame: FrameArgs,
    },
    /// Print the frame width of every frame size for a given longest side
    Widths {
        /// Longest side of the photo, in pixels
        max_side: f64,

        /// Frame width policy (default from config)
        #[arg(long, value_enum)]
        strategy: Option<FrameWidthStrategy>,
    },
    /// Print a stock framer.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Frame {
            inputs,
            output_dir,
            scale,
            frame,
        } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            frame_photos(&config, &inputs, &output_dir, scale, &frame)?;
        }
        Command::Preview {
            input,
            output,
            width,
            height,
            frame,
        } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let preview_box = Size::new(
                width.unwrap_or(config.preview.width),
                height.unwrap_or(config.preview.height),
            );
            write_preview(&config, &input, &output, preview_box, &frame)?;
        }
        Command::Widths { max_side, strategy } => {
            let config = config::load_config(&cli.config)?;
            let strategy = strategy.unwrap_or(config.frame.strategy);
            output::print_width_table(&strategy, max_side);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Frame every input on the rayon pool, printing each result as it lands.
fn frame_photos(
    config: &FramerConfig,
    inputs: &[PathBuf],
    output_dir: &Path,
    scale: f64,
    args: &FrameArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let strategy = args.strategy(config);
    let options = BatchOptions {
        output_dir: output_dir.to_path_buf(),
        frame_size: args.frame_size(config),
        scale,
        quality: Quality::new(config.output.quality),
    };
    let processor = ImageProcessor::new().with_calculator(strategy);
    std::fs::create_dir_all(output_dir)?;

    tracing::info!(
        count = inputs.len(),
        frame_size = options.frame_size.value(),
        strategy = strategy.name(),
        "Framing photos"
    );

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_frame_event(&event);
        }
    });
    let summary = batch::frame_batch(&processor, inputs, &options, Some(tx));
    printer.join().map_err(|_| "report printer panicked")?;

    if summary.failed > 0 {
        return Err(format!("{} of {} photos failed", summary.failed, inputs.len()).into());
    }
    Ok(())
}

fn write_preview(
    config: &FramerConfig,
    input: &Path,
    output: &Path,
    preview_box: Size,
    args: &FrameArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let processor = ImageProcessor::new()
        .with_calculator(args.strategy(config))
        .with_output_scale(config.preview.scale);
    let photo = load_bitmap(input, 1.0)?;

    let mut preview = FramePreview::new(processor, &photo, preview_box)?;
    preview.request(args.frame_size(config));
    let frame = preview
        .wait_latest()?
        .ok_or("preview produced no frame")?;

    save_bitmap(&frame.image, output, Quality::new(config.output.quality))?;
    tracing::info!(
        width = frame.image.width(),
        height = frame.image.height(),
        output = %output.display(),
        "Preview written"
    );
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// `max_processes` can only lower the worker count below the core count.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
