use clap::Parser;
use resquare::config::{self, Overrides, PadColor, ResizeConfig};
use resquare::{logging, output, process};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resquare")]
#[command(about = "Batch-resize a directory of images into squares")]
#[command(long_about = "\
Batch-resize a directory of images into squares

Every image found under the input directory (recursively) is written to the
output directory as <stem><ext>, flattened, at exactly LENGTH x LENGTH pixels.

By default the image is scaled so its longer edge equals LENGTH and the
shorter edge is padded with the background colour. With --stretch the image
is resampled straight to the square and the aspect ratio is not kept; --pad
switches back to padding when a config file enables stretching.

Options can also come from a TOML file (--config); flags win over the file:

  side_length = 256
  output_extension = \".jpg\"
  stretch = false
  background_color = [255, 255, 255]
  workers = 4")]
#[command(version)]
struct Cli {
    /// Side length of the output squares, in pixels
    #[arg(short = 'l', long = "length")]
    length: Option<u32>,

    /// Output file extension, which also picks the format [default: .png]
    #[arg(short = 'e', long = "output-ext")]
    output_ext: Option<String>,

    /// Stretch to the square instead of padding
    #[arg(short = 's', long, overrides_with = "pad")]
    stretch: bool,

    /// Scale and pad, even if the config file asks for stretching
    #[arg(long, overrides_with = "stretch")]
    pad: bool,

    /// Pad colour: one intensity (0-255) or R,G,B [default: 127]
    #[arg(short = 'b', long = "background-color")]
    background_color: Option<PadColor>,

    /// Directory searched recursively for images
    #[arg(short = 'i', long = "input-dir")]
    input_dir: PathBuf,

    /// Directory the resized images are written to (created if missing)
    #[arg(short = 'o', long = "output-dir")]
    output_dir: PathBuf,

    /// Number of images processed at the same time [default: 10]
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// TOML file with defaults for the options above
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log per-image diagnostics to stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            side_length: self.length,
            output_extension: self.output_ext.clone(),
            stretch: match (self.stretch, self.pad) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            background_color: self.background_color,
            workers: self.workers,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    let settings = config::load_settings(cli.config.as_deref(), &cli.overrides())?;
    let resize = ResizeConfig::from_settings(&settings)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });
    let result = process::process(
        &cli.input_dir,
        &cli.output_dir,
        &resize,
        settings.workers,
        Some(tx),
    );
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    let report = result?;

    println!();
    output::print_summary(&report);
    if !report.is_success() {
        std::process::exit(1);
    }
    println!("Done!");
    Ok(())
}
