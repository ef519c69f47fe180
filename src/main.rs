//! modwave - render ProTracker-style MOD files to WAV
//!
//! Loads a module, optionally prints its structure, renders the whole song
//! offline and writes a 16-bit stereo WAV file.

use anyhow::{Context, Result};
use clap::Parser;
use mw_engine::{render_module, RenderConfig, DEFAULT_SAMPLE_RATE};
use mw_formats::{load_mod_file, save_wav};
use mw_ir::{Module, ModuleSummary, PatternGrid};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "modwave")]
#[command(about = "Render a MOD file to a stereo WAV file")]
#[command(version)]
struct Cli {
    /// Input .mod file
    input: PathBuf,

    /// Output .wav file (default: the input path with .wav appended)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output sample rate in Hz
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE, value_parser = clap::value_parser!(u32).range(1..))]
    sample_rate: u32,

    /// Stop rendering at this song length
    #[arg(long, default_value_t = 1200)]
    max_seconds: u32,

    /// Silence appended after the song
    #[arg(long, default_value_t = 5)]
    tail_seconds: u32,

    /// Follow position jumps that go backwards (renders until --max-seconds)
    #[arg(long)]
    no_loop_guard: bool,

    /// Print the module header and every pattern in play order
    #[arg(long)]
    dump: bool,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        RenderConfig::default()
            .with_sample_rate(self.sample_rate)
            .with_max_seconds(self.max_seconds)
            .with_tail_seconds(self.tail_seconds)
            .with_loop_guard(!self.no_loop_guard)
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output(&self.input))
    }
}

/// `song.mod` becomes `song.mod.wav`.
fn default_output(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".wav");
    PathBuf::from(name)
}

fn dump(module: &Module) {
    print!("{}", ModuleSummary(module));
    for (index, &pattern) in module.order.iter().enumerate() {
        if let Some(grid) = module.patterns.get(pattern as usize) {
            println!();
            println!("position {} pattern {}", index, pattern);
            print!("{}", PatternGrid(grid));
        }
    }
    println!();
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let module = load_mod_file(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    tracing::info!(
        "{:?}: {} format, {} channels, {} positions, {} patterns",
        module.title,
        if module.format.tag().is_empty() { "untagged" } else { module.format.tag() },
        module.channels(),
        module.order.len(),
        module.patterns.len()
    );

    if cli.dump {
        dump(&module);
    }

    let config = cli.render_config();
    let render = render_module(&module, &config);
    let seconds = render.song_frames as f64 / config.sample_rate as f64;
    tracing::info!(
        "rendered {} rows, {:.1} s, peak {:.3}, {} diagnostics",
        render.rows,
        seconds,
        render.buffer.peak(),
        module.diagnostics.len() + render.diagnostics.len()
    );

    let output = cli.output_path();
    save_wav(&output, &render.buffer, config.sample_rate)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!("wrote {}", output.display());

    Ok(())
}
