//! Gesture Replay - touch gesture recording and playback over adb

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gesture_replay::analysis::simplify::PathSimplifier;
use gesture_replay::app::cli::{Cli, Commands};
use gesture_replay::app::config::Config;
use gesture_replay::device::client::DeviceClient;
use gesture_replay::device::shell::{list_devices, AdbRunner};
use gesture_replay::gestures::set::GestureSet;
use gesture_replay::replay::scheduler::Replayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    // Initialize tracing (--verbose enables debug-level output)
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Load config
    let config = if let Some(path) = &cli.config {
        Config::load(path)?
    } else {
        Config::load_default()?
    };

    match cli.command {
        Commands::Devices => {
            run_devices(&config)?;
        }
        Commands::Record {
            serial,
            label,
            output,
            duration,
        } => {
            run_record(&serial, &label, output, duration, &config)?;
        }
        Commands::Replay {
            input,
            label,
            serial,
        } => {
            run_replay(&input, &label, serial, &config)?;
        }
        Commands::List { detailed } => {
            run_list(detailed)?;
        }
        Commands::Init { force } => {
            run_init(force, &config)?;
        }
    }

    Ok(())
}

fn run_devices(config: &Config) -> anyhow::Result<()> {
    let runner = AdbRunner::new(&config.adb.path);
    let serials = list_devices(&runner)?;

    if serials.is_empty() {
        println!("No devices attached");
        return Ok(());
    }

    println!("Attached devices:");
    for serial in serials {
        println!("  {}", serial);
    }
    Ok(())
}

fn run_record(
    serial: &str,
    label: &str,
    output: Option<PathBuf>,
    duration: u64,
    config: &Config,
) -> anyhow::Result<()> {
    let runner = Arc::new(AdbRunner::new(&config.adb.path));
    let client = DeviceClient::connect(runner, serial)?;

    let mut session = client
        .session()
        .with_simplifier(PathSimplifier::with_threshold(
            config.capture.straightness_threshold,
        ));
    session.start()?;

    if duration > 0 {
        info!("Recording for {} seconds", duration);
    } else {
        info!("Recording... Press Ctrl+C to stop");
    }

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_handler = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_handler.store(true, Ordering::SeqCst);
    })?;

    let start_time = std::time::Instant::now();
    while !stop_flag.load(Ordering::SeqCst) {
        if duration > 0 && start_time.elapsed().as_secs() >= duration {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(100));
    }

    let gestures = session.stop()?;
    info!(
        "Captured {} gestures in {:.1}s",
        gestures.len(),
        start_time.elapsed().as_secs_f64()
    );

    let output_path = output.unwrap_or_else(|| {
        Cli::data_dir().join(
            chrono::Local::now()
                .format("gestures_%Y%m%d_%H%M%S.json")
                .to_string(),
        )
    });
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut set = GestureSet::new(Some(serial.to_string()));
    let count = gestures.len();
    set.insert(label, gestures);
    set.save(&output_path)?;

    println!("\nRecording saved!");
    println!("  Label: {}", label);
    println!("  Gestures: {}", count);
    println!("  Output: {:?}", output_path);

    Ok(())
}

fn run_replay(
    input: &Path,
    label: &str,
    serial: Option<String>,
    config: &Config,
) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("Gesture set file not found: {:?}", input);
    }
    let set = GestureSet::load(input)?;

    let runner = Arc::new(AdbRunner::new(&config.adb.path));
    let serial = match serial {
        Some(s) => s,
        None => list_devices(runner.as_ref())?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No devices attached"))?,
    };
    let client = DeviceClient::connect(runner, &serial)?;

    let control = Arc::new(AtomicBool::new(true));
    let control_handler = control.clone();
    ctrlc::set_handler(move || {
        control_handler.store(false, Ordering::SeqCst);
    })?;

    info!(serial = %serial, label, "replaying gestures (Ctrl+C cancels)");
    let replayer = Replayer::with_min_swipe_duration(config.replay.min_swipe_duration);
    replayer.replay_named(&client, &set, label, &control)?;

    if control.load(Ordering::SeqCst) {
        println!("Replay complete");
    } else {
        println!("Replay cancelled");
    }
    Ok(())
}

fn run_list(detailed: bool) -> anyhow::Result<()> {
    let data_dir = Cli::data_dir();

    if !data_dir.exists() {
        println!("No gesture sets found in {}", data_dir.display());
        println!("Record one with: gesture-replay record --serial <serial>");
        return Ok(());
    }

    println!("Gesture sets in {:?}:", data_dir);

    let mut entries: Vec<_> = std::fs::read_dir(&data_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();

    entries.sort_by_key(|e| e.path());

    for entry in &entries {
        let path = entry.path();
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();

        if detailed {
            match GestureSet::load(&path) {
                Ok(set) => {
                    let labels: Vec<String> = set
                        .labels()
                        .iter()
                        .map(|&l| format!("{} ({} gestures)", l, set.get(l).len()))
                        .collect();
                    let serial = set.metadata.serial.as_deref().unwrap_or("-");
                    println!("  {}  [device: {}]", file_name, serial);
                    for label in labels {
                        println!("    {}", label);
                    }
                }
                Err(_) => {
                    let fs_meta = entry.metadata()?;
                    println!("  {}  ({} bytes, failed to parse)", file_name, fs_meta.len());
                }
            }
        } else {
            println!("  {}", file_name);
        }
    }

    if entries.is_empty() {
        println!("  (none)");
        println!("Record one with: gesture-replay record --serial <serial>");
    }

    Ok(())
}

fn run_init(force: bool, config: &Config) -> anyhow::Result<()> {
    let config_path = Config::default_path();

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    config.save_default()?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    std::fs::create_dir_all(Cli::data_dir())?;
    println!("Created data directory: {:?}", Cli::data_dir());

    Ok(())
}
