use std::io;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, EnvFilter, Registry};

type FileLayer =
    Option<fmt::Layer<Registry, fmt::format::DefaultFields, fmt::format::Format, NonBlocking>>;

/// The log file is only known after the CLI is parsed, so its layer starts
/// empty and is swapped in through the reload handle.
struct FileSink {
    handle: reload::Handle<FileLayer, Registry>,
    guard: Mutex<Option<WorkerGuard>>,
}

static FILE_SINK: OnceLock<FileSink> = OnceLock::new();

/// Installs the global subscriber. `RUST_LOG` controls the filter, `info` by
/// default. `log` records are forwarded into tracing.
pub fn init() {
    let _ = tracing_log::LogTracer::init();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (file_layer, handle) = reload::Layer::<FileLayer, Registry>::new(None);

    let subscriber = Registry::default()
        .with(file_layer)
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr));

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        let _ = FILE_SINK.set(FileSink {
            handle,
            guard: Mutex::new(None),
        });
    }
}

/// Mirrors log output into `log_file`, or stops mirroring with `None`.
pub fn set_log_file(log_file: Option<&Path>) -> io::Result<()> {
    let Some(sink) = FILE_SINK.get() else {
        return Ok(());
    };

    let (layer, guard): (FileLayer, Option<WorkerGuard>) = match log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_appender(path)?);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    sink.handle.reload(layer).map_err(io::Error::other)?;
    // Dropping the previous guard flushes what its worker still buffers.
    if let Ok(mut slot) = sink.guard.lock() {
        *slot = guard;
    }
    Ok(())
}

fn open_appender(path: &Path) -> io::Result<RollingFileAppender> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log file {} has no file name", path.display()),
        )
    })?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(io::Error::other)
}
