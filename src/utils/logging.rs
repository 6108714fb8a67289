use once_cell::sync::OnceCell;
use std::env;
use std::fs::OpenOptions;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

static ENABLE_LOGGING: AtomicBool = AtomicBool::new(false);
static SUBSCRIBER: OnceCell<()> = OnceCell::new();

/// Initializes logging based on environment variables:
/// - REDDIT_ENGINE_LOGGING: enables/disables logging (true/false, unset means false)
/// - REDDIT_ENGINE_LOG_FILE: when set, logs are appended to this file instead of stdout
///
/// To enable logging in tests, run: REDDIT_ENGINE_LOGGING=true cargo test -- --nocapture
pub fn init_logging() {
    match env::var("REDDIT_ENGINE_LOGGING") {
        Ok(value) => match value.as_str() {
            "true" => {
                ENABLE_LOGGING.store(true, Ordering::SeqCst);
                SUBSCRIBER.get_or_init(install_subscriber);
            }
            "false" => ENABLE_LOGGING.store(false, Ordering::SeqCst),
            _ => panic!("\nError: REDDIT_ENGINE_LOGGING environment variable must be 'true' or 'false'\n\nTo run the program, use one of:\n  REDDIT_ENGINE_LOGGING=true cargo run\n  REDDIT_ENGINE_LOGGING=false cargo run\n"),
        },
        Err(_) => ENABLE_LOGGING.store(false, Ordering::SeqCst),
    }
}

fn install_subscriber() {
    let builder = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false);
    let result = match env::var("REDDIT_ENGINE_LOG_FILE") {
        Ok(path) => match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).try_init(),
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", path, e);
                builder.try_init()
            }
        },
        Err(_) => builder.try_init(),
    };
    // Another subscriber may already be installed, e.g. by a test harness.
    if let Err(e) = result {
        eprintln!("Logging subscriber not installed: {}", e);
    }
}

pub fn is_enabled() -> bool {
    ENABLE_LOGGING.load(Ordering::SeqCst)
}

pub fn log(prefix: &str, message: &str) {
    if is_enabled() {
        tracing::info!("[{}]   {}", prefix, message);
    }
}
