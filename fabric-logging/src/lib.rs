//! Tracing subscriber setup for the Fabric provisioning tools.
//!
//! Configuration comes from the environment:
//!
//! | variable            | values                     | default                  |
//! |---------------------|----------------------------|--------------------------|
//! | `FABRIC_LOG_LEVEL`  | any `EnvFilter` directive  | `info`                   |
//! | `FABRIC_LOG_FORMAT` | `human`, `json`            | `human`                  |
//! | `FABRIC_LOG_OUTPUT` | `console`, `file`, `both`  | `console`                |
//! | `FABRIC_LOG_FILE`   | path                       | `/tmp/fabric-provision.log` |
//!
//! `RUST_LOG` wins over `FABRIC_LOG_LEVEL` when set.

use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::Directive, fmt::MakeWriter, prelude::*, registry, EnvFilter};

const DEFAULT_LOG_FILE: &str = "/tmp/fabric-provision.log";

/// Where formatted events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
}

/// How events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    pub file_path: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Human,
            output: LogOutput::Console,
            file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl LogSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`. Unknown values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let level = lookup("FABRIC_LOG_LEVEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.level);

        let format = match lookup("FABRIC_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Human,
        };

        let output = match lookup("FABRIC_LOG_OUTPUT").as_deref() {
            Some("file") => LogOutput::File,
            Some("both") => LogOutput::Both,
            _ => LogOutput::Console,
        };

        let file_path = lookup("FABRIC_LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.file_path);

        Self {
            level,
            format,
            output,
            file_path,
        }
    }

    /// Force debug level, used by the `--debug` flag.
    pub fn with_debug(mut self, debug: bool) -> Self {
        if debug {
            self.level = "debug".to_string();
        }
        self
    }

    fn env_filter(&self) -> EnvFilter {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));
        ["hyper=warn", "reqwest=warn", "rustls=warn"]
            .iter()
            .filter_map(|directive| directive.parse::<Directive>().ok())
            .fold(filter, |filter, directive| filter.add_directive(directive))
    }
}

// Writes every buffer to both sinks.
struct Tee<A, B> {
    a: A,
    b: B,
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res_a = self.a.write_all(buf);
        let res_b = self.b.write_all(buf);
        res_a.and(res_b).map(|_| buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.a.flush()?;
        self.b.flush()
    }
}

#[derive(Clone)]
struct MakeTee<A, B> {
    make_a: A,
    make_b: B,
}

impl<'a, A, B> MakeWriter<'a> for MakeTee<A, B>
where
    A: MakeWriter<'a>,
    B: MakeWriter<'a>,
{
    type Writer = Tee<A::Writer, B::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            a: self.make_a.make_writer(),
            b: self.make_b.make_writer(),
        }
    }
}

/// Install the global subscriber from environment settings.
///
/// Keep the returned guard alive for the lifetime of the process when file
/// output is enabled, otherwise buffered lines are lost on exit.
pub fn init_subscriber() -> Option<WorkerGuard> {
    init_with(&LogSettings::from_env())
}

/// Install the global subscriber from explicit settings.
pub fn init_with(settings: &LogSettings) -> Option<WorkerGuard> {
    let subscriber = registry().with(settings.env_filter());
    let json = settings.format == LogFormat::Json;

    macro_rules! install {
        ($writer:expr) => {{
            let layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer($writer);
            let result = if json {
                subscriber.with(layer.json()).try_init()
            } else {
                subscriber.with(layer).try_init()
            };
            if let Err(e) = result {
                eprintln!("Logging already initialised: {e}");
            }
        }};
    }

    match settings.output {
        LogOutput::Console => {
            install!(io::stderr);
            None
        }
        LogOutput::File => {
            let (writer, guard) = file_writer(&settings.file_path);
            install!(writer);
            Some(guard)
        }
        LogOutput::Both => {
            let (writer, guard) = file_writer(&settings.file_path);
            install!(MakeTee {
                make_a: io::stderr,
                make_b: writer,
            });
            Some(guard)
        }
    }
}

fn file_writer(path: &Path) -> (tracing_appender::non_blocking::NonBlocking, WorkerGuard) {
    let dir = path.parent().unwrap_or_else(|| Path::new("/tmp"));
    let file_name = path
        .file_name()
        .unwrap_or_else(|| "fabric-provision.log".as_ref());
    let appender = tracing_appender::rolling::daily(dir, file_name);
    tracing_appender::non_blocking(appender)
}
