use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slide_gallery::app::{self, AppConfig, FrameOutput, GalleryApp};
use slide_gallery::controller::ControllerConfig;
use slide_gallery::event::GalleryEvent;
use slide_gallery::image_source;
use slide_gallery::input;
use slide_gallery::theme::ThemeStore;
use slide_gallery::view::OutputFormat;
use slide_gallery::{Result, TransitionMode};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT_SHORT"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

#[derive(Parser, Debug)]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
struct Args {
    /// Image files or URLs, shown after the scanned directory
    sources: Vec<String>,

    /// Directory containing images to display
    #[arg(short, long)]
    image_dir: Option<PathBuf>,

    /// Autoplay period in milliseconds
    #[arg(short, long, default_value_t = 4000)]
    delay: u64,

    /// Index of the image shown first
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Initial transition effect
    #[arg(short, long, value_enum, default_value_t = TransitionMode::Fade)]
    transition: TransitionMode,

    /// Seed for shuffle order (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Theme preference file (defaults to the user config directory)
    #[arg(long)]
    theme_file: Option<PathBuf>,

    /// Print one JSON object per state change instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Number of thumbnails visible in the strip
    #[arg(long, default_value_t = 7)]
    thumbs: usize,

    /// Write rendered transition frames as PNG files into this directory
    #[arg(long)]
    frame_dir: Option<PathBuf>,

    /// Frames rendered per transition
    #[arg(long, default_value_t = 12)]
    frames: usize,

    /// Rendered frame width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Rendered frame height in pixels
    #[arg(long, default_value_t = 360)]
    height: u32,
}

impl From<&Args> for AppConfig {
    fn from(args: &Args) -> Self {
        let theme_store = match &args.theme_file {
            Some(path) => ThemeStore::new(Some(path.clone())),
            None => ThemeStore::default_location(),
        };

        Self {
            controller: ControllerConfig {
                autoplay_period: Duration::from_millis(args.delay.max(1)),
                initial_transition: args.transition,
                shuffle_seed: args.seed,
            },
            start_index: args.start,
            visible_thumbnails: args.thumbs,
            format: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            theme_store,
            frame_output: args.frame_dir.as_ref().map(|dir| FrameOutput {
                dir: dir.clone(),
                frames: args.frames,
                width: args.width.max(1),
                height: args.height.max(1),
            }),
        }
    }
}

fn setup_signal_handler(events: mpsc::Sender<GalleryEvent>) -> io::Result<thread::JoinHandle<()>> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    Ok(thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            info!("Received signal {}, shutting down...", signal);
            let _ = events.blocking_send(GalleryEvent::Shutdown);
        }
    }))
}

/// Reads control lines from stdin on a plain thread and forwards them as
/// input events, so a blocked read never holds up shutdown.
fn spawn_stdin_reader(events: mpsc::Sender<GalleryEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    return;
                }
            };
            match input::parse_line(&line) {
                Ok(Some(event)) => {
                    if events.blocking_send(GalleryEvent::Input(event)).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("{}", e),
            }
        }
        debug!("stdin closed, keyboard input disabled");
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let config = AppConfig::from(&args);

    info!("Slide gallery {}", LONG_VERSION);
    if let Some(dir) = &args.image_dir {
        info!("Image directory: {}", dir.display());
    }
    info!("Autoplay period: {} ms", args.delay);

    let images = image_source::collect_sources(args.image_dir.as_deref(), &args.sources)?;
    if images.is_empty() {
        warn!("No images found; navigation is disabled");
    }

    let (tx, rx) = mpsc::channel::<GalleryEvent>(64);
    let _signal_handle = setup_signal_handler(tx.clone())?;
    let _stdin_handle = spawn_stdin_reader(tx.clone());

    let mut app = GalleryApp::new(config, tx, io::stdout());
    app.start(images);
    app::run(&mut app, rx).await;

    info!("Slideshow ended");
    Ok(())
}
