use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use log::LevelFilter;
use otherworld_core::engine::{Engine, EngineOptions};
use otherworld_core::res::{BankSet, parts};

mod audio;
mod emulator;
mod input;
mod video;

/// Interpreter for the original data files: point it at a directory
/// holding MEMLIST.BIN and the BANK files.
#[derive(Parser)]
#[command(name = "otherworld", version, about)]
struct Cli {
    /// Directory containing MEMLIST.BIN and BANK01..BANK0D
    #[arg(long, default_value = "./share/another-world")]
    data: PathBuf,

    /// Initial part (0-9)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(0..=9))]
    part: u16,

    /// Pre-seed the protection registers and start in the game proper
    #[arg(long)]
    skip_protection: bool,

    /// Window scale factor
    #[arg(long, default_value_t = 3)]
    scale: u32,

    /// Disable all log output
    #[arg(long)]
    quiet: bool,

    /// Debug logging for the engine glue
    #[arg(long)]
    debug_engine: bool,

    /// Debug logging for the virtual machine
    #[arg(long)]
    debug_vm: bool,

    /// Debug logging for video and rasterization
    #[arg(long)]
    debug_video: bool,

    /// Debug logging for the mixer and sequencer
    #[arg(long)]
    debug_audio: bool,

    /// Debug logging for resource loading
    #[arg(long)]
    debug_resources: bool,

    /// Debug logging for the SDL shell
    #[arg(long)]
    debug_backend: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(&cli) {
        log::error!(target: "backend", "fatal: {e}");
        eprintln!("otherworld: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let banks = BankSet::from_directory(&cli.data)?;

    let sdl_context = sdl2::init()?;
    let sdl_audio = sdl_context.audio()?;

    let (device, audio_handle, fade_out) = audio::init(&sdl_audio)?;

    let options = EngineOptions {
        part: parts::GAME_PART_FIRST + cli.part,
        skip_protection: cli.skip_protection,
        rng_seed: clock_seed(),
    };
    let mut engine = Engine::new(banks, audio_handle, options)?;

    let key_map = input::default_key_map(engine.input_map());
    device.resume();

    let result = emulator::run(&sdl_context, &mut engine, &key_map, cli.scale);

    // Ramp the callback down before tearing the device away.
    fade_out.store(true, std::sync::atomic::Ordering::Relaxed);
    std::thread::sleep(audio::fade_out_duration());
    device.pause();

    result
}

fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if cli.quiet {
        LevelFilter::Off
    } else {
        LevelFilter::Info
    });
    if !cli.quiet {
        for (enabled, target) in [
            (cli.debug_engine, "engine"),
            (cli.debug_vm, "vm"),
            (cli.debug_video, "video"),
            (cli.debug_audio, "audio"),
            (cli.debug_resources, "resources"),
            (cli.debug_backend, "backend"),
        ] {
            if enabled {
                builder.filter_module(target, LevelFilter::Debug);
            }
        }
    }
    builder.init();
}

/// Seed the VM's random register from the wall clock, the way the
/// original took `time()`.
fn clock_seed() -> u16 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u16)
        .unwrap_or(0x1234)
}
