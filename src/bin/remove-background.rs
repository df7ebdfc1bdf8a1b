use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use remove_background::{
    default_output_path, process_directory, process_file, BackgroundSelector, ProcessOptions,
    ProcessResult, Threshold,
};

#[derive(Parser)]
#[command(
    name = "remove-background",
    about = "Make a white or black image background transparent",
    version,
    after_help = "Simple usage: remove-background <image>  (writes <image>_nobg.png)\n\n\
                  Output is always written with an alpha channel; use a .png, .webp or .bmp\n\
                  output path."
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Output file or directory (default: {name}_nobg.png)
    #[arg(short, long)]
    output: Option<String>,

    /// Similarity threshold per channel on the 0-255 scale (scaled by 256)
    #[arg(short, long, default_value_t = 30)]
    threshold: u32,

    /// Background color to remove: "white" or "black" (anything else means white)
    #[arg(short, long, default_value = "white")]
    background: String,

    /// Swap near-black and near-white pixels after removing the background
    #[arg(short, long)]
    invert: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let opts = ProcessOptions {
        threshold: Threshold::from_channel_units(cli.threshold),
        background: BackgroundSelector::from_name(&cli.background),
        invert: cli.invert,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    init_tracing(&opts);

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    if !opts.quiet {
        eprintln!(
            "Removing {} background (threshold: {}){}",
            opts.background,
            cli.threshold,
            if opts.invert { ", inverting black/white" } else { "" }
        );
        eprintln!();
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: remove-background <input_dir> -o <output_dir>");
            process::exit(1);
        };
        process_directory(input_path, &output_dir, &opts)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };
        vec![process_file(input_path, &output_path, &opts)]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Processed: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

/// Install the fmt subscriber; `RUST_LOG` overrides the flag-derived level.
fn init_tracing(opts: &ProcessOptions) {
    let level = if opts.quiet {
        "error"
    } else if opts.verbose {
        "remove_background=debug,info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn print_result(result: &ProcessResult, opts: &ProcessOptions) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        if !opts.quiet {
            match &result.output {
                Some(out) => eprintln!("[OK] {filename} -> {}", out.display()),
                None => eprintln!("[OK] {filename}"),
            }
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}
