use chrono::{DateTime, Local};
use std::time::{Duration, SystemTime};

pub fn format_system_time(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let total_seconds = elapsed.as_secs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let millis = elapsed.subsec_millis();

    if minutes > 0 {
        format!("{minutes} min {seconds} s")
    } else {
        format!("{seconds}.{millis:03} s")
    }
}

/// Ruta relativa al directorio limpiado, o completa si no cuelga de él.
pub fn display_relative(path: &std::path::Path, root: &std::path::Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
