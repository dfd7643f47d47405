use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MAX_LOG_SIZE: u64 = 1024 * 1024; // 1MB

/// Filter used when `RUST_LOG` is unset. Each `-d` raises the level.
pub fn default_filter(debug: u8) -> &'static str {
    match debug {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn env_filter(debug: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(debug)))
}

/// Initialize logging for a component.
///
/// With `file_logging` set, output also goes to
/// `<data dir>/logs/<component>.log`, which is emptied once it grows past
/// 1MB. The returned guard must be kept alive for the duration of the
/// program.
pub fn init_logging(
    component_name: &str,
    debug: u8,
    file_logging: bool,
) -> io::Result<Option<WorkerGuard>> {
    if !file_logging {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter(debug))
            .init();
        return Ok(None);
    }

    let log_dir = log_directory()?;
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join(format!("{}.log", component_name));
    truncate_if_needed(&log_path)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(BufWriter::new(file));

    tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(fmt::layer().with_writer(io::stdout).with_ansi(true))
        .with(
            fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::info!("Logging to file: {}", log_path.display());
    Ok(Some(guard))
}

fn log_directory() -> io::Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "korth-spirit")
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Failed to find home directory"))?;
    Ok(dirs.data_dir().join("logs"))
}

fn truncate_if_needed(log_path: &Path) -> io::Result<()> {
    match fs::metadata(log_path) {
        Ok(metadata) if metadata.len() > MAX_LOG_SIZE => {
            File::create(log_path)?;
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(0), "info");
        assert_eq!(default_filter(1), "debug");
        assert_eq!(default_filter(4), "trace");
    }

    #[test]
    fn test_truncate_only_large_files() {
        let dir = tempfile::tempdir().unwrap();
        let small = dir.path().join("small.log");
        let large = dir.path().join("large.log");
        fs::write(&small, b"keep me").unwrap();
        let mut file = File::create(&large).unwrap();
        file.write_all(&vec![b'x'; MAX_LOG_SIZE as usize + 1]).unwrap();
        drop(file);

        truncate_if_needed(&small).unwrap();
        truncate_if_needed(&large).unwrap();
        truncate_if_needed(&dir.path().join("missing.log")).unwrap();

        assert_eq!(fs::read(&small).unwrap(), b"keep me");
        assert_eq!(fs::metadata(&large).unwrap().len(), 0);
    }
}
