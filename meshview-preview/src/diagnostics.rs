//! Diagnostic log routing
//!
//! The preview only ever logs through `tracing`. This module is the one
//! place that decides where those records end up: a session log file that
//! is truncated on every install, stderr, and an optional host callback.

use meshview_core::{Error, Result};
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default log file name
pub const LOG_FILE_NAME: &str = "meshview-preview.log";

/// First line of every session log
pub const SESSION_HEADER: &str = "--- NEW PREVIEW SESSION ---";

/// Callback receiving formatted log records
pub type HostSink = Box<dyn Fn(Level, &str) + Send + Sync>;

/// Where diagnostics go
#[derive(Debug, Clone)]
pub struct DiagnosticsConfig {
    pub log_file: Option<PathBuf>,
    /// `EnvFilter` directives, used when `RUST_LOG` is not set
    pub filter: String,
    pub echo_stderr: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            filter: "info".to_string(),
            echo_stderr: true,
        }
    }
}

/// Default log file location inside `dir`
pub fn session_log_path(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE_NAME)
}

/// Forwards every event to a host callback as `(level, message)`
pub struct HostLogLayer {
    sink: HostSink,
}

impl HostLogLayer {
    pub fn new(sink: HostSink) -> Self {
        Self { sink }
    }
}

impl<S: Subscriber> Layer<S> for HostLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        (self.sink)(*event.metadata().level(), &visitor.finish());
    }
}

/// Collects the message field first, then any other fields as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Create (truncating) the session log and write its header
fn open_session_log(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let mut file = File::create(path)?;
    writeln!(file, "{}", SESSION_HEADER)?;
    file.flush()?;
    Ok(file)
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` if a subscriber was already installed, in which case
/// nothing changes.
pub fn install(config: &DiagnosticsConfig, host_sink: Option<HostSink>) -> Result<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| Error::InvalidData(format!("invalid log filter '{}': {}", config.filter, e)))?,
    };

    // The live subscriber may still be writing to the session log
    if tracing::dispatcher::has_been_set() {
        tracing::debug!("Diagnostics already installed");
        return Ok(false);
    }

    let file_layer = match &config.log_file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(open_session_log(path)?)),
        ),
        None => None,
    };
    let stderr_layer = config
        .echo_stderr
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let host_layer = host_sink.map(HostLogLayer::new);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .with(host_layer)
        .try_init()
        .is_ok();

    if installed {
        if let Some(path) = &config.log_file {
            tracing::info!("Logging to {}", path.display());
        }
    } else {
        tracing::debug!("Diagnostics already installed");
    }
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_session_log_path() {
        assert_eq!(
            session_log_path(Path::new("logs")),
            PathBuf::from("logs").join("meshview-preview.log")
        );
    }

    #[test]
    fn test_session_log_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(LOG_FILE_NAME);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "old session\nmore\n").unwrap();

        drop(open_session_log(&path).unwrap());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, format!("{}\n", SESSION_HEADER));
    }

    #[test]
    fn test_host_layer_receives_messages() {
        let records: Arc<Mutex<Vec<(Level, String)>>> = Arc::default();
        let sink_records = Arc::clone(&records);
        let layer = HostLogLayer::new(Box::new(move |level, message| {
            sink_records.lock().unwrap().push((level, message.to_string()));
        }));

        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("avtank03 -> avtank_d.dds");
            tracing::warn!(width = 4, "resize failed");
        });

        let records = records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], (Level::INFO, "avtank03 -> avtank_d.dds".to_string()));
        assert_eq!(records[1], (Level::WARN, "resize failed width=4".to_string()));
    }

    #[test]
    fn test_bad_filter_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = DiagnosticsConfig {
            filter: "meshview=loud".to_string(),
            echo_stderr: false,
            ..DiagnosticsConfig::default()
        };
        assert!(install(&config, None).is_err());
    }
}
