//! `sound-trigger` -- drive a sound-triggered clip recorder from the command line.
//!
//! - `sound-trigger run <input.wav>` -- replay a WAV file as the microphone and
//!   record clips; reads control commands from stdin.
//! - `sound-trigger clips` -- list the most recent clips with durations.

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use parking_lot::Mutex;

use sound_trigger_core::{recent_clips, Recorder, RecorderConfig};
use sound_trigger_host::{control, read_chunk_for_poll, Command, ConsoleDelegate, HostError, WavFileSource};

type SharedRecorder = Arc<Mutex<Recorder<WavFileSource>>>;

#[derive(Parser)]
#[command(name = "sound-trigger", about = "Sound-triggered audio clip recorder", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a WAV file through the recorder.
    Run(RunArgs),

    /// List recent clips.
    Clips {
        /// JSON config file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Clips directory (overrides the config).
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Number of clips to show.
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Args)]
struct RunArgs {
    /// 16-bit WAV file to use as the microphone.
    input: PathBuf,

    /// JSON config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Clips directory (overrides the config).
    #[arg(long)]
    clips_dir: Option<PathBuf>,

    /// Trigger threshold, clamped to 500..=15000.
    #[arg(long)]
    threshold: Option<u32>,

    /// Max clip length in seconds, clamped to 5..=120.
    #[arg(long)]
    max_clip: Option<u32>,

    /// Restart the input when it ends.
    #[arg(long = "loop")]
    looping: bool,

    /// Poll rate in Hz.
    #[arg(long, default_value_t = 30)]
    poll_hz: u32,

    /// Don't read control commands from stdin.
    #[arg(long)]
    no_control: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::Run(args) => run(args),
        Commands::Clips { config, dir, limit } => list_clips(config, dir, limit),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RecorderConfig, HostError> {
    match path {
        Some(path) => Ok(RecorderConfig::load(path)?),
        None => Ok(RecorderConfig::default()),
    }
}

fn run(args: RunArgs) -> Result<(), HostError> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(dir) = args.clips_dir {
        config.clips_dir = dir;
    }

    let source = WavFileSource::load(&args.input, args.looping)?;
    if source.sample_rate() != config.sample_rate {
        log::warn!(
            "input is {} Hz, config says {} Hz; using the input rate",
            source.sample_rate(),
            config.sample_rate
        );
        config.sample_rate = source.sample_rate();
    }
    let input_secs = source.duration_secs();

    let poll_hz = args.poll_hz.clamp(1, 1000);
    let chunk = read_chunk_for_poll(config.sample_rate, poll_hz, config.read_chunk_bytes);
    if chunk != config.read_chunk_bytes {
        log::debug!("read chunk {} -> {} bytes for {} Hz polling", config.read_chunk_bytes, chunk, poll_hz);
        config.read_chunk_bytes = chunk;
    }

    let mut recorder = Recorder::with_source(config, source)?;
    recorder.set_delegate(ConsoleDelegate::new());
    if let Some(threshold) = args.threshold {
        recorder.set_threshold(threshold);
    }
    if let Some(secs) = args.max_clip {
        recorder.set_max_clip_secs(secs);
    }

    let recorder: SharedRecorder = Arc::new(Mutex::new(recorder));
    let running = Arc::new(AtomicBool::new(true));

    if !args.no_control {
        spawn_control_thread(Arc::clone(&recorder), Arc::clone(&running))?;
    }

    log::info!(
        "replaying {} ({:.1}s{}) at {} Hz polling",
        args.input.display(),
        input_secs,
        if args.looping { ", looped" } else { "" },
        poll_hz
    );

    let interval = Duration::from_millis(1000 / poll_hz as u64);
    while running.load(Ordering::SeqCst) {
        {
            let mut recorder = recorder.lock();
            recorder.poll();
            if recorder.source().is_finished() {
                log::info!("input finished");
                break;
            }
        }
        thread::sleep(interval);
    }

    let mut recorder = recorder.lock();
    recorder.shutdown();
    println!(
        "{} clip(s), {:.1}s recorded",
        recorder.clip_count(),
        recorder.total_duration_secs()
    );
    Ok(())
}

/// Read commands from stdin until `quit` or EOF. The thread is left detached;
/// it only ever holds the recorder lock for one command.
fn spawn_control_thread(recorder: SharedRecorder, running: Arc<AtomicBool>) -> Result<(), HostError> {
    thread::Builder::new()
        .name("control".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::warn!("stdin closed: {}", e);
                        break;
                    }
                };
                match control::parse_line(&line) {
                    Ok(Some(Command::Quit)) => {
                        running.store(false, Ordering::SeqCst);
                        println!("{}", control::apply(&mut *recorder.lock(), Command::Quit));
                        break;
                    }
                    Ok(Some(command)) => println!("{}", control::apply(&mut *recorder.lock(), command)),
                    Ok(None) => {}
                    Err(e) => eprintln!("{}", e),
                }
            }
        })
        .map(|_| ())
        .map_err(|e| HostError::ThreadSpawn("control", e.to_string()))
}

fn list_clips(config: Option<PathBuf>, dir: Option<PathBuf>, limit: usize) -> Result<(), HostError> {
    let config = load_config(config.as_ref())?;
    let dir = dir.unwrap_or(config.clips_dir);

    let clips = recent_clips(&dir, limit, config.sample_rate)?;
    if clips.is_empty() {
        println!("no clips in {}", dir.display());
        return Ok(());
    }
    for clip in clips {
        println!("{}  {:>6.1}s", clip.name, clip.duration_secs);
    }
    Ok(())
}
