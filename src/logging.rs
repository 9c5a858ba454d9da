use std::fs::OpenOptions;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::LoggingConfig;

/// Install a file logger per `[logging]`.
///
/// The terminal is in raw mode and owned by the line editor, so logs only
/// ever go to a file. Best-effort: any failure leaves logging disabled.
pub fn init(config: &LoggingConfig) {
    let level = parse_level(&config.level);
    if level == LevelFilter::Off {
        return;
    }
    let Some(path) = log_path(&config.file) else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let log_config = ConfigBuilder::new()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(level, log_config, file);
}

fn log_path(file: &str) -> Option<PathBuf> {
    if file.is_empty() {
        return None;
    }
    Some(PathBuf::from(shellexpand::tilde(file).as_ref()))
}

/// Unknown or empty levels mean `off`.
fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Off)
}
