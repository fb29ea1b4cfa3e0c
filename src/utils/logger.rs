use chrono::Utc;
use log::info;
use std::io::Write;

/// Timestamped env_logger setup shared by the GUI and CLI binaries.
pub struct AppLogger;

impl AppLogger {
    /// `level` is an env_logger filter string such as `info` or `health_score=debug`.
    /// Safe to call more than once; later calls are ignored.
    pub fn init(level: &str) {
        let initialised = env_logger::Builder::new()
            .parse_filters(level)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{}] [{}] [{}:{}] {}",
                    Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                    record.level(),
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    record.args()
                )
            })
            .try_init()
            .is_ok();

        if initialised {
            info!("Logger initialized (level: {})", level);
        }
    }
}
