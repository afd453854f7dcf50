//! Leveled, named loggers shared by every module of the crate.
//!
//! Each subsystem owns a `static LOGGER` created with [`Logger::new`]. The
//! global level set through [`set_log_level`] applies to every live logger,
//! and [`set_user_log_handler`] installs a callback that observes records
//! from all of them.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, LazyLock, Mutex, RwLock, Weak};

static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INSTANCES: LazyLock<Mutex<Vec<Weak<LoggerInner>>>> =
    LazyLock::new(|| Mutex::new(Vec::new()));

type SharedLogHandler = Arc<dyn Fn(&Logger, &LogRecord) + Send + Sync + 'static>;

/// A single emitted log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        let inner = Arc::new(LoggerInner::new(name.into()));
        track_instance(&inner);
        Self { inner }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_u8(self.inner.log_level.load(Ordering::SeqCst))
    }

    pub fn set_log_level<L>(&self, level: L) -> Result<(), LogError>
    where
        L: IntoLogLevel,
    {
        let level = level.into_log_level()?;
        self.inner.log_level.store(level as u8, Ordering::SeqCst);
        Ok(())
    }

    /// Replaces the sink for this logger. The handler is responsible for
    /// its own level filtering.
    pub fn set_log_handler<F>(&self, handler: F)
    where
        F: Fn(&Logger, &LogRecord) + Send + Sync + 'static,
    {
        *write_lock(&self.inner.log_handler) = Arc::new(handler);
    }

    pub fn reset_log_handler(&self) {
        *write_lock(&self.inner.log_handler) = Arc::new(default_log_handler);
    }

    pub fn has_user_log_handler(&self) -> bool {
        read_lock(&self.inner.user_log_handler).is_some()
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Debug, message.into());
    }

    pub fn log(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Verbose, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Info, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Warn, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Error, message.into());
    }

    fn dispatch(&self, level: LogLevel, message: String) {
        let record = LogRecord {
            level,
            message,
            timestamp: Utc::now(),
        };
        let user_handler = read_lock(&self.inner.user_log_handler).clone();
        if let Some(handler) = user_handler {
            handler(self, &record);
        }
        let handler = read_lock(&self.inner.log_handler).clone();
        handler(self, &record);
    }

    fn set_user_log_handler(&self, handler: Option<SharedLogHandler>) {
        *write_lock(&self.inner.user_log_handler) = handler;
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("log_level", &self.log_level())
            .finish()
    }
}

struct LoggerInner {
    name: String,
    log_level: AtomicU8,
    log_handler: RwLock<SharedLogHandler>,
    user_log_handler: RwLock<Option<SharedLogHandler>>,
}

impl LoggerInner {
    fn new(name: String) -> Self {
        Self {
            name,
            log_level: AtomicU8::new(GLOBAL_LOG_LEVEL.load(Ordering::SeqCst)),
            log_handler: RwLock::new(Arc::new(default_log_handler)),
            user_log_handler: RwLock::new(None),
        }
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poison| poison.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poison| poison.into_inner())
}

fn track_instance(inner: &Arc<LoggerInner>) {
    INSTANCES
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
        .push(Arc::downgrade(inner));
}

fn default_log_handler(logger: &Logger, record: &LogRecord) {
    if record.level < logger.log_level() || record.level == LogLevel::Silent {
        return;
    }

    let line = format_record(logger.name(), record);
    match record.level {
        LogLevel::Warn | LogLevel::Error => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}

fn format_record(name: &str, record: &LogRecord) -> String {
    let stamp = record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
    if record.message.is_empty() {
        format!("[{stamp}]  {name}:")
    } else {
        format!("[{stamp}]  {name}: {}", record.message)
    }
}

fn with_instances<F>(mut f: F)
where
    F: FnMut(Logger),
{
    let mut instances = INSTANCES.lock().unwrap_or_else(|poison| poison.into_inner());
    instances.retain(|weak| match weak.upgrade() {
        Some(inner) => {
            f(Logger { inner });
            true
        }
        None => false,
    });
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Verbose = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Silent = 5,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "verbose",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Silent => "silent",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Verbose,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Silent,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "verbose" => Ok(LogLevel::Verbose),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "silent" => Ok(LogLevel::Silent),
            other => Err(LogError::InvalidLogLevel(other.to_string())),
        }
    }
}

pub trait IntoLogLevel {
    fn into_log_level(self) -> Result<LogLevel, LogError>;
}

impl IntoLogLevel for LogLevel {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        Ok(self)
    }
}

impl IntoLogLevel for &str {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        LogLevel::from_str(self)
    }
}

impl IntoLogLevel for String {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        LogLevel::from_str(&self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub level: Option<LogLevel>,
}

/// What a user callback receives for every record at or above its threshold.
#[derive(Debug, Clone)]
pub struct LogCallbackParams {
    pub level: LogLevel,
    pub message: String,
    pub logger_type: String,
}

pub type LogCallback = Arc<dyn Fn(LogCallbackParams) + Send + Sync + 'static>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    InvalidLogLevel(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::InvalidLogLevel(level) => {
                write!(f, "Invalid value \"{level}\" assigned to `logLevel`")
            }
        }
    }
}

impl std::error::Error for LogError {}

/// Sets the level of every existing logger and of loggers created later.
pub fn set_log_level<L>(level: L) -> Result<(), LogError>
where
    L: IntoLogLevel,
{
    let level = level.into_log_level()?;
    GLOBAL_LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    with_instances(|logger| {
        let _ = logger.set_log_level(level);
    });
    Ok(())
}

/// Installs (or with `None`, removes) a callback on every live logger.
pub fn set_user_log_handler(callback: Option<LogCallback>, options: Option<LogOptions>) {
    let custom_level = options.unwrap_or_default().level;

    with_instances(|logger| {
        let handler = callback.clone().map(|cb| {
            Arc::new(move |instance: &Logger, record: &LogRecord| {
                let threshold = custom_level.unwrap_or_else(|| instance.log_level());
                if record.level < threshold {
                    return;
                }
                cb(LogCallbackParams {
                    level: record.level,
                    message: record.message.clone(),
                    logger_type: instance.name().to_owned(),
                });
            }) as SharedLogHandler
        });
        logger.set_user_log_handler(handler);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    static TEST_GUARD: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

    fn reset_logging() {
        set_log_level(LogLevel::Info).unwrap();
        set_user_log_handler(None, None);
    }

    fn capture(logger: &Logger) -> Arc<Mutex<Vec<(LogLevel, String)>>> {
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&records);
        logger.set_log_handler(move |instance, record| {
            if record.level < instance.log_level() {
                return;
            }
            sink.lock()
                .unwrap()
                .push((record.level, record.message.clone()));
        });
        records
    }

    #[test]
    fn log_methods_respect_global_level() {
        let _guard = TEST_GUARD.lock().unwrap();
        reset_logging();
        let logger = Logger::new("@firebase/logger-level-test");
        set_log_level(LogLevel::Debug).unwrap();
        let records = capture(&logger);

        logger.debug("debug message");
        logger.log("verbose message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");

        let stored = records.lock().unwrap();
        let levels: Vec<_> = stored.iter().map(|(level, _)| *level).collect();
        assert_eq!(
            levels,
            [
                LogLevel::Debug,
                LogLevel::Verbose,
                LogLevel::Info,
                LogLevel::Warn,
                LogLevel::Error,
            ]
        );
        assert_eq!(stored[0].1, "debug message");
        drop(stored);
        reset_logging();
    }

    #[test]
    fn string_levels_filter_lower_records() {
        let _guard = TEST_GUARD.lock().unwrap();
        reset_logging();
        let logger = Logger::new("@firebase/logger-string-level");
        set_log_level("warn").unwrap();
        let records = capture(&logger);

        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");

        let levels: Vec<_> = records.lock().unwrap().iter().map(|(l, _)| *l).collect();
        assert_eq!(levels, [LogLevel::Warn, LogLevel::Error]);
        reset_logging();
    }

    #[test]
    fn invalid_level_is_rejected() {
        let err = set_log_level("loud").unwrap_err();
        assert_eq!(err, LogError::InvalidLogLevel("loud".into()));
    }

    #[test]
    fn user_handler_respects_custom_level() {
        let _guard = TEST_GUARD.lock().unwrap();
        reset_logging();
        let logger = Logger::new("@firebase/logger-user-handler");
        logger.set_log_handler(|_, _| {});
        let logger_name = logger.name().to_owned();

        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);
        let callback: LogCallback = Arc::new(move |params: LogCallbackParams| {
            if params.logger_type == logger_name {
                sink.lock().unwrap().push((params.level, params.message));
            }
        });
        set_user_log_handler(
            Some(callback),
            Some(LogOptions {
                level: Some(LogLevel::Warn),
            }),
        );
        assert!(logger.has_user_log_handler());

        logger.info("info message");
        logger.warn("warn message");

        let records = captured.lock().unwrap().clone();
        assert_eq!(records, vec![(LogLevel::Warn, "warn message".to_string())]);

        set_user_log_handler(None, None);
        assert!(!logger.has_user_log_handler());
    }

    #[test]
    fn formats_header_with_logger_name() {
        let record = LogRecord {
            level: LogLevel::Info,
            message: "ready".into(),
            timestamp: Utc::now(),
        };
        let line = format_record("@firebase/app", &record);
        assert!(line.ends_with("@firebase/app: ready"));
        assert!(line.starts_with('['));
    }
}
