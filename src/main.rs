use clap::Parser;
use limon::audio_session::AudioSession;
use limon::config::Config;
use limon::directories::{storage_path, StorageCategory};
use limon::emulator::EmulationControl;
use limon::events::NotificationCenter;
use limon::feedback::LogFeedback;
use limon::onboarding::{DismissalFlags, OnboardingSupport};
use limon::preferences::{JsonPreferenceStore, MemoryPreferenceStore, PreferenceStore};
use limon::ui::{CpalAudioSession, LimonApp};
use limon::{AppInfo, SceneDelegate, SceneServices};
use std::fs::{create_dir_all, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "limon")]
#[command(about = "Front-end shell for the Limon handheld console emulator")]
struct Args {
    /// Document root for the storage tree (overrides config.toml)
    #[arg(long)]
    documents_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Skip the What's New dialog on this platform
    #[arg(long)]
    no_onboarding: bool,

    /// Forget previous What's New answers before starting
    #[arg(long)]
    reset_whats_new: bool,
}

/// Copies the session log to stdout and `<documents>/log/limon_<timestamp>.log`
struct DualWriter {
    file: File,
}

impl DualWriter {
    fn new(file: File) -> Self {
        Self { file }
    }
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

fn init_logging(debug: bool, documents_root: &std::path::Path) {
    let log_level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // The bootstrapper creates this too; it is needed earlier for the log file
    let logs_dir = storage_path(documents_root, StorageCategory::Log);
    if let Err(e) = create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {}", e);
    }

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let log_path = logs_dir.join(format!("limon_{}.log", timestamp));

    let mut builder = env_logger::Builder::new();
    builder.filter_level(log_level);
    // RUST_LOG still wins when set
    builder.parse_default_env();

    match File::create(&log_path) {
        Ok(file) => {
            println!("Log file: {}", log_path.display());
            builder.target(env_logger::Target::Pipe(Box::new(DualWriter::new(file))));
        }
        Err(e) => eprintln!("Warning: Could not create log file: {}", e),
    }

    builder.init();
}

fn open_preferences() -> Arc<dyn PreferenceStore> {
    let path = Config::preferences_path();
    match JsonPreferenceStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("{}; preferences will not persist this session", e);
            Arc::new(MemoryPreferenceStore::new())
        }
    }
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Some(dir) = args.documents_dir {
        config.documents_dir = Some(dir);
    }
    if args.no_onboarding {
        config.onboarding_enabled = false;
    }
    let documents_root = config.documents_root();

    init_logging(args.debug, &documents_root);

    let app_info = AppInfo::current();
    log::info!("Starting Limón v{}", app_info);
    match config_error {
        Some(e) => log::error!(
            "{} ({}); using default configuration",
            e,
            Config::config_path().display()
        ),
        None => log::info!("Configuration: {}", Config::config_path().display()),
    }
    log::info!("Documents: {}", documents_root.display());

    let preferences = open_preferences();
    if args.reset_whats_new {
        DismissalFlags::reset(preferences.as_ref(), &app_info);
        log::info!("Cleared What's New answers");
    }

    let emulation = Arc::new(EmulationControl::new());
    let audio: Box<dyn AudioSession> = Box::new(CpalAudioSession::new());

    let scene = SceneDelegate::new(SceneServices {
        preferences,
        emulator: emulation.clone(),
        notifications: Arc::new(NotificationCenter::new()),
        feedback: Box::new(LogFeedback),
        audio,
        documents_root,
        app_info,
        onboarding: OnboardingSupport::from(config.onboarding_enabled),
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([360.0, 540.0])
            .with_title("Limón"),
        ..Default::default()
    };

    eframe::run_native(
        "Limon",
        options,
        Box::new(move |_cc| Ok(Box::new(LimonApp::new(scene, emulation)))),
    )
}
