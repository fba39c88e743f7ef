//! Main logger implementation
//!
//! Entries that pass the level filter are written to the console appender
//! and, while remote delivery is enabled, appended to an in-memory buffer.
//! A dedicated worker thread owns remote delivery: it receives batches
//! swapped out of the buffer, runs the recurring flush timer, and puts a
//! batch back in front of the buffer when the collector rejects it.

use super::{
    appender::Appender,
    batch_sink::{BatchSink, LogBatch},
    config::{Environment, LoggerConfig, LoggerConfigUpdate},
    error::{LoggerError, Result},
    log_category::LogCategory,
    log_context::LogContext,
    log_entry::{ErrorInfo, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use crate::appenders::{ConsoleAppender, HttpBatchSink};
use crossbeam_channel::{at, never, select, unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for logger teardown (5 seconds)
///
/// Bounds how long `destroy()` waits for the final flush to finish.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

static GLOBAL_LOGGER: OnceLock<Arc<Logger>> = OnceLock::new();

/// Lifecycle of a logger instance
///
/// `Uninitialized -> Initializing -> Ready -> Destroyed`. There is no way
/// back out of `Destroyed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    Uninitialized,
    Initializing,
    Ready,
    Destroyed,
}

enum WorkerCommand {
    /// Re-read the flush schedule from the live config
    Reconfigure,
    /// Final flush, then exit
    Shutdown,
}

/// Entries waiting for delivery, oldest first
#[derive(Default)]
struct PendingBuffer {
    entries: Vec<LogEntry>,
    /// Leading entries put back after a failed delivery; they do not count
    /// toward the buffer-full trigger
    carried: usize,
}

impl PendingBuffer {
    fn fresh(&self) -> usize {
        self.entries.len() - self.carried
    }

    fn take(&mut self) -> Vec<LogEntry> {
        self.carried = 0;
        std::mem::take(&mut self.entries)
    }

    /// Drop the oldest entries beyond `cap`, returning how many went
    fn truncate_front(&mut self, cap: usize) -> usize {
        let excess = self.entries.len().saturating_sub(cap);
        if excess > 0 {
            self.entries.drain(..excess);
            self.carried = self.carried.saturating_sub(excess);
        }
        excess
    }
}

struct LoggerInner {
    config: RwLock<LoggerConfig>,
    environment: Environment,
    state: RwLock<LoggerState>,
    buffer: Mutex<PendingBuffer>,
    /// Batches swapped out of the buffer, in swap order
    queued: Receiver<Vec<LogEntry>>,
    console: Mutex<Box<dyn Appender>>,
    sink: Arc<dyn BatchSink>,
    metrics: LoggerMetrics,
}

impl LoggerInner {
    /// Move queued batches onto the end of `entries`
    ///
    /// Batches are sent while the buffer lock is held, so a caller holding
    /// that lock sees every batch swapped out before it.
    fn drain_queued(&self, entries: &mut Vec<LogEntry>) {
        while let Ok(mut batch) = self.queued.try_recv() {
            entries.append(&mut batch);
        }
    }

    /// Everything not yet handed to the sink, oldest first
    fn take_pending(&self) -> Vec<LogEntry> {
        let mut buffer = self.buffer.lock();
        let mut entries = Vec::new();
        self.drain_queued(&mut entries);
        entries.append(&mut buffer.take());
        entries
    }

    /// Put a failed batch back in front of everything logged since it was taken
    ///
    /// The returned entries stop counting toward the buffer-full trigger, so
    /// an outage does not resend the backlog on every call. The oldest
    /// entries beyond the backlog cap are dropped.
    fn requeue(&self, mut entries: Vec<LogEntry>) {
        let cap = self.config.read().backlog_cap();
        let mut buffer = self.buffer.lock();
        self.drain_queued(&mut entries);
        let carried = entries.len() + buffer.carried;
        entries.append(&mut buffer.entries);
        buffer.entries = entries;
        buffer.carried = carried.min(buffer.entries.len());
        let dropped = buffer.truncate_front(cap);
        drop(buffer);
        self.report_dropped(dropped, cap);
    }

    fn report_dropped(&self, dropped: usize, cap: usize) {
        if dropped == 0 {
            return;
        }
        self.metrics.record_discarded(dropped);
        eprintln!(
            "[LOGGER WARNING] Backlog exceeded {} entries, {} oldest logs discarded",
            cap, dropped
        );
    }

    /// Deliver one batch on the worker thread
    fn deliver(&self, runtime: &tokio::runtime::Runtime, entries: Vec<LogEntry>) {
        if entries.is_empty() {
            return;
        }

        let (enable_remote, endpoint) = {
            let config = self.config.read();
            (config.enable_remote, config.remote_endpoint.clone())
        };

        if !enable_remote {
            // Remote delivery switched off after the batch was taken
            self.requeue(entries);
            return;
        }

        let Some(endpoint) = endpoint else {
            self.metrics.record_discarded(entries.len());
            return;
        };

        let count = entries.len();
        let batch = LogBatch::new(entries, self.environment);

        match runtime.block_on(self.sink.deliver(&endpoint, &batch)) {
            Ok(()) => {
                self.metrics.record_delivered(count);
            }
            Err(e) => {
                // Console only: reporting through the logger would recurse
                eprintln!(
                    "[LOGGER ERROR] Failed to send {} logs to remote endpoint via {}: {}",
                    count,
                    self.sink.name(),
                    e
                );
                self.requeue(batch.into_entries());
                self.metrics.record_delivery_failure(count);
            }
        }
    }

    fn next_tick(&self, from: Instant) -> Option<Instant> {
        let config = self.config.read();
        if !config.timer_enabled() {
            return None;
        }
        // Past the clock's range the timer never fires
        from.checked_add(config.flush_interval)
    }

    fn flush_pending(&self, runtime: &tokio::runtime::Runtime) {
        let entries = self.take_pending();
        if !entries.is_empty() {
            self.metrics.record_flush();
        }
        self.deliver(runtime, entries);
    }

    fn run_worker(self: Arc<Self>, control: Receiver<WorkerCommand>) {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to start delivery runtime: {}", e);
                return;
            }
        };

        let mut next_tick = self.next_tick(Instant::now());

        loop {
            let timer = next_tick.map(at).unwrap_or_else(never);

            select! {
                recv(self.queued) -> batch => match batch {
                    Ok(entries) => self.deliver(&runtime, entries),
                    Err(_) => {
                        self.flush_pending(&runtime);
                        break;
                    }
                },
                recv(control) -> command => match command {
                    Ok(WorkerCommand::Reconfigure) => {
                        next_tick = self.next_tick(Instant::now());
                    }
                    Ok(WorkerCommand::Shutdown) | Err(_) => {
                        self.flush_pending(&runtime);
                        break;
                    }
                },
                // Timer tick: flush whatever is pending, possibly nothing
                recv(timer) -> _ => {
                    next_tick = self.next_tick(Instant::now());
                    self.flush_pending(&runtime);
                }
            }
        }
    }
}

/// Leveled, categorized logger with batched remote delivery
///
/// Logging calls never block on delivery and never fail; problems inside
/// the logger are reported on stderr.
pub struct Logger {
    inner: Arc<LoggerInner>,
    batches: Sender<Vec<LogEntry>>,
    control: Mutex<Option<Sender<WorkerCommand>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use bridge_resilience::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .enable_remote(false)
    ///     .build()
    ///     .unwrap();
    /// logger.debug(LogCategory::Wallet, "Wallet connected", None);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// The process-wide logger, created from the environment on first use
    ///
    /// Every call returns the same instance, including after `destroy()`.
    pub fn global() -> Arc<Logger> {
        Arc::clone(GLOBAL_LOGGER.get_or_init(|| {
            match LoggerBuilder::from_env().build() {
                Ok(logger) => Arc::new(logger),
                Err(e) => {
                    eprintln!(
                        "[LOGGER ERROR] Failed to build logger from environment: {}. \
                         Falling back to console-only logging.",
                        e
                    );
                    Arc::new(LoggerBuilder::from_env().enable_remote(false).build_detached())
                }
            }
        }))
    }

    /// Install an explicitly configured process-wide logger
    ///
    /// # Errors
    ///
    /// `AlreadyInitialized` if `global()` or `init_global()` ran before,
    /// `LoggerStopped` if that logger has since been destroyed.
    pub fn init_global(builder: LoggerBuilder) -> Result<Arc<Logger>> {
        if let Some(existing) = GLOBAL_LOGGER.get() {
            return Err(match existing.state() {
                LoggerState::Destroyed => LoggerError::LoggerStopped,
                _ => LoggerError::AlreadyInitialized,
            });
        }
        let logger = Arc::new(builder.build()?);
        GLOBAL_LOGGER
            .set(Arc::clone(&logger))
            .map_err(|_| LoggerError::AlreadyInitialized)?;
        Ok(logger)
    }

    /// State of the process-wide logger without creating it
    pub fn global_state() -> LoggerState {
        GLOBAL_LOGGER
            .get()
            .map(|logger| logger.state())
            .unwrap_or(LoggerState::Uninitialized)
    }

    fn assemble(
        config: LoggerConfig,
        environment: Environment,
        console: Box<dyn Appender>,
        sink: Arc<dyn BatchSink>,
    ) -> Self {
        let (batches, queued) = unbounded();
        let inner = Arc::new(LoggerInner {
            config: RwLock::new(config),
            environment,
            state: RwLock::new(LoggerState::Initializing),
            buffer: Mutex::new(PendingBuffer::default()),
            queued,
            console: Mutex::new(console),
            sink,
            metrics: LoggerMetrics::new(),
        });

        Self {
            inner,
            batches,
            control: Mutex::new(None),
            worker: Mutex::new(None),
        }
    }

    fn start_worker(&self) -> Result<()> {
        let (control, receiver) = unbounded();
        let inner = Arc::clone(&self.inner);

        let handle = thread::Builder::new()
            .name("log-flush".to_string())
            .spawn(move || inner.run_worker(receiver))
            .map_err(|e| LoggerError::worker(e.to_string()))?;

        *self.control.lock() = Some(control);
        *self.worker.lock() = Some(handle);
        Ok(())
    }

    fn finish_init(&self) {
        *self.inner.state.write() = LoggerState::Ready;

        let config = self.config();
        self.info(
            LogCategory::General,
            "Logger initialized",
            Some(json!({
                "level": config.level,
                "environment": self.inner.environment,
                "enableConsole": config.enable_console,
                "enableRemote": config.enable_remote,
            })),
        );
    }

    pub fn state(&self) -> LoggerState {
        *self.inner.state.read()
    }

    pub fn environment(&self) -> Environment {
        self.inner.environment
    }

    /// Snapshot of the live configuration
    pub fn config(&self) -> LoggerConfig {
        self.inner.config.read().clone()
    }

    /// Apply a partial configuration change in place
    ///
    /// Takes effect for every subsequent call. A change to the remote switch
    /// or the flush interval reschedules the timer immediately.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the merged config breaks an invariant; the
    /// live config is left unchanged.
    pub fn update_config(&self, update: LoggerConfigUpdate) -> Result<()> {
        let next = {
            let mut config = self.inner.config.write();
            let next = config.merged(&update)?;
            *config = next.clone();
            next
        };

        if update.touches_schedule() {
            self.send_command(WorkerCommand::Reconfigure);
        }

        self.info(
            LogCategory::General,
            "Logger config updated",
            Some(json!({
                "level": next.level,
                "enableConsole": next.enable_console,
                "enableRemote": next.enable_remote,
                "remoteEndpoint": next.remote_endpoint,
                "maxBufferSize": next.max_buffer_size,
                "flushIntervalMs": u64::try_from(next.flush_interval.as_millis()).unwrap_or(u64::MAX),
                "maxBacklog": next.max_backlog,
            })),
        );
        Ok(())
    }

    /// Whether an entry at `level` would currently be emitted
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.inner.config.read().level
    }

    /// Primary logging entry point
    #[allow(clippy::too_many_arguments)]
    pub fn log(
        &self,
        level: LogLevel,
        category: LogCategory,
        title: impl AsRef<str>,
        message: Option<&str>,
        data: Option<Value>,
        error: Option<ErrorInfo>,
        context: Option<LogContext>,
    ) {
        if !self.is_enabled(level) {
            self.inner.metrics.record_filtered();
            return;
        }

        let mut entry = LogEntry::new(level, category, title);
        if let Some(message) = message {
            entry = entry.with_message(message);
        }
        if let Some(data) = data {
            entry = entry.with_data(data);
        }
        if let Some(error) = error {
            entry = entry.with_error(error);
        }
        if let Some(context) = context {
            entry = entry.with_context(context);
        }

        self.write_entry(entry);
    }

    /// Log a prebuilt entry, subject to the same level filter
    pub fn log_entry(&self, entry: LogEntry) {
        if !self.is_enabled(entry.level) {
            self.inner.metrics.record_filtered();
            return;
        }
        self.write_entry(entry);
    }

    fn write_entry(&self, entry: LogEntry) {
        let (enable_console, enable_remote, max_buffer_size, backlog_cap) = {
            let config = self.inner.config.read();
            (
                config.enable_console,
                config.enable_remote,
                config.max_buffer_size,
                config.backlog_cap(),
            )
        };

        self.inner.metrics.record_logged();

        if enable_console {
            if let Err(e) = self.inner.console.lock().append(&entry) {
                eprintln!("[LOGGER ERROR] Console appender failed: {}", e);
            }
        }

        if !enable_remote || self.state() == LoggerState::Destroyed {
            return;
        }

        let mut buffer = self.inner.buffer.lock();
        buffer.entries.push(entry);
        if buffer.fresh() >= max_buffer_size {
            let entries = buffer.take();
            self.dispatch(entries);
        } else {
            let dropped = buffer.truncate_front(backlog_cap);
            drop(buffer);
            self.inner.report_dropped(dropped, backlog_cap);
        }
    }

    fn send_command(&self, command: WorkerCommand) -> bool {
        match self.control.lock().as_ref() {
            Some(control) => control.send(command).is_ok(),
            None => false,
        }
    }

    /// Hand a swapped-out batch to the worker
    ///
    /// Callers hold the buffer lock so batches queue in swap order.
    fn dispatch(&self, entries: Vec<LogEntry>) {
        let count = entries.len();
        self.inner.metrics.record_flush();
        let running = self.control.lock().is_some();
        if !running || self.batches.send(entries).is_err() {
            self.inner.metrics.record_discarded(count);
            eprintln!(
                "[LOGGER WARNING] Flush worker unavailable, {} logs discarded",
                count
            );
        }
    }

    /// Swap out the buffer and schedule its delivery
    ///
    /// Returns immediately; delivery completes on the worker. An empty
    /// buffer, or disabled remote delivery, makes this a no-op.
    pub fn flush(&self) {
        if !self.inner.config.read().enable_remote {
            return;
        }
        let mut buffer = self.inner.buffer.lock();
        if !buffer.entries.is_empty() {
            let entries = buffer.take();
            self.dispatch(entries);
        }
    }

    /// Number of entries waiting for the next flush
    pub fn buffered_len(&self) -> usize {
        self.inner.buffer.lock().entries.len()
    }

    /// Copy of the entries waiting for the next flush, oldest first
    pub fn buffered_entries(&self) -> Vec<LogEntry> {
        self.inner.buffer.lock().entries.clone()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.metrics
    }

    /// Tear down the logger
    ///
    /// Cancels the flush timer, performs one final flush attempt and waits
    /// for it up to [`DEFAULT_SHUTDOWN_TIMEOUT`]. Later calls still write to
    /// the console but nothing is buffered any more. Calling it twice is a
    /// no-op.
    ///
    /// Returns `true` if the final flush finished within the timeout.
    pub fn destroy(&self) -> bool {
        self.destroy_with_timeout(DEFAULT_SHUTDOWN_TIMEOUT)
    }

    pub fn destroy_with_timeout(&self, timeout: Duration) -> bool {
        {
            let mut state = self.inner.state.write();
            if *state == LoggerState::Destroyed {
                return true;
            }
            *state = LoggerState::Destroyed;
        }

        if let Some(control) = self.control.lock().take() {
            let _ = control.send(WorkerCommand::Shutdown);
        }

        let finished = match self.worker.lock().take() {
            Some(handle) => Self::join_with_timeout(handle, timeout),
            None => true,
        };

        if let Err(e) = self.inner.console.lock().flush() {
            eprintln!("[LOGGER ERROR] Failed to flush console during shutdown: {}", e);
        }

        finished
    }

    fn join_with_timeout(handle: thread::JoinHandle<()>, timeout: Duration) -> bool {
        let start = Instant::now();

        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Flush worker panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Flush worker did not finish within {:?} timeout. \
                     Some logs may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }

    #[inline]
    pub fn debug(&self, category: LogCategory, title: impl AsRef<str>, data: Option<Value>) {
        self.log(LogLevel::Debug, category, title, None, data, None, None);
    }

    #[inline]
    pub fn info(&self, category: LogCategory, title: impl AsRef<str>, data: Option<Value>) {
        self.log(LogLevel::Info, category, title, None, data, None, None);
    }

    #[inline]
    pub fn warn(&self, category: LogCategory, title: impl AsRef<str>, data: Option<Value>) {
        self.log(LogLevel::Warn, category, title, None, data, None, None);
    }

    #[inline]
    pub fn error(
        &self,
        category: LogCategory,
        title: impl AsRef<str>,
        error: Option<ErrorInfo>,
        data: Option<Value>,
    ) {
        self.log(LogLevel::Error, category, title, None, data, error, None);
    }

    #[inline]
    pub fn critical(
        &self,
        category: LogCategory,
        title: impl AsRef<str>,
        error: Option<ErrorInfo>,
        data: Option<Value>,
    ) {
        self.log(LogLevel::Critical, category, title, None, data, error, None);
    }

    pub fn debug_with_context(
        &self,
        category: LogCategory,
        title: impl AsRef<str>,
        data: Option<Value>,
        context: LogContext,
    ) {
        self.log(LogLevel::Debug, category, title, None, data, None, Some(context));
    }

    /// Helper for structured info logging
    pub fn info_with_context(
        &self,
        category: LogCategory,
        title: impl AsRef<str>,
        data: Option<Value>,
        context: LogContext,
    ) {
        self.log(LogLevel::Info, category, title, None, data, None, Some(context));
    }

    pub fn warn_with_context(
        &self,
        category: LogCategory,
        title: impl AsRef<str>,
        data: Option<Value>,
        context: LogContext,
    ) {
        self.log(LogLevel::Warn, category, title, None, data, None, Some(context));
    }

    /// Helper for structured error logging
    pub fn error_with_context(
        &self,
        category: LogCategory,
        title: impl AsRef<str>,
        error: Option<ErrorInfo>,
        context: LogContext,
    ) {
        self.log(LogLevel::Error, category, title, None, None, error, Some(context));
    }

    pub fn critical_with_context(
        &self,
        category: LogCategory,
        title: impl AsRef<str>,
        error: Option<ErrorInfo>,
        context: LogContext,
    ) {
        self.log(LogLevel::Critical, category, title, None, None, error, Some(context));
    }

    /// Generic message at Info/General
    pub fn log_message(&self, title: impl AsRef<str>, data: Option<Value>) {
        self.info(LogCategory::General, title, data);
    }

    /// Transaction trace at Info/Transaction
    pub fn log_tx(&self, data: Value) {
        self.info(LogCategory::Transaction, "Transaction", Some(data));
    }

    /// Network trace at Info/Network
    pub fn log_net(&self, data: Value) {
        self.info(LogCategory::Network, "Network", Some(data));
    }

    /// Error at Error/Error from anything printable
    pub fn log_error(&self, title: impl AsRef<str>, error: impl fmt::Display) {
        self.error(
            LogCategory::Error,
            title,
            Some(ErrorInfo::from_message(error)),
            None,
        );
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.state() != LoggerState::Destroyed {
            self.destroy();
        }
    }
}

/// Generic message on the global logger
pub fn log(title: impl AsRef<str>, data: Option<Value>) {
    Logger::global().log_message(title, data);
}

/// Transaction trace on the global logger
pub fn log_tx(data: Value) {
    Logger::global().log_tx(data);
}

/// Network trace on the global logger
pub fn log_net(data: Value) {
    Logger::global().log_net(data);
}

/// Error on the global logger
pub fn log_error(title: impl AsRef<str>, error: impl fmt::Display) {
    Logger::global().log_error(title, error);
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use bridge_resilience::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .environment(Environment::Testnet)
///     .min_level(LogLevel::Info)
///     .enable_remote(false)
///     .max_buffer_size(50)
///     .flush_interval(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// assert_eq!(logger.config().max_buffer_size, 50);
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    environment: Environment,
    console: Option<Box<dyn Appender>>,
    sink: Option<Arc<dyn BatchSink>>,
}

impl LoggerBuilder {
    /// Start from the development defaults
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::for_environment(Environment::Development),
            environment: Environment::Development,
            console: None,
            sink: None,
        }
    }

    /// Start from the defaults of the current process environment
    pub fn from_env() -> Self {
        let (environment, config) = LoggerConfig::from_env();
        Self {
            config,
            environment,
            console: None,
            sink: None,
        }
    }

    /// Label batches with this environment and adopt its defaults
    #[must_use = "builder methods return a new value"]
    pub fn environment(mut self, environment: Environment) -> Self {
        let endpoint = self.config.remote_endpoint.take();
        self.environment = environment;
        self.config = LoggerConfig::for_environment(environment);
        self.config.remote_endpoint = endpoint;
        self
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn enable_console(mut self, enable: bool) -> Self {
        self.config.enable_console = enable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn enable_remote(mut self, enable: bool) -> Self {
        self.config.enable_remote = enable;
        self
    }

    /// Set the collector endpoint and turn remote delivery on
    #[must_use = "builder methods return a new value"]
    pub fn remote_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.remote_endpoint = Some(endpoint.into());
        self.config.enable_remote = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_buffer_size(mut self, size: usize) -> Self {
        self.config.max_buffer_size = size;
        self
    }

    /// Timer period; zero disables the timer
    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval = interval;
        self
    }

    /// Entries kept while the collector is down; oldest are dropped beyond it
    #[must_use = "builder methods return a new value"]
    pub fn max_backlog(mut self, size: usize) -> Self {
        self.config.max_backlog = size;
        self
    }

    /// Replace the default console appender
    #[must_use = "builder methods return a new value"]
    pub fn console_appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.console = Some(Box::new(appender));
        self
    }

    /// Replace the default HTTP sink
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Arc<dyn BatchSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the Logger and start its flush worker
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for a bad config or HTTP client, and
    /// `WorkerUnavailable` if the worker thread cannot be spawned.
    pub fn build(self) -> Result<Logger> {
        self.config.validate()?;

        let sink: Arc<dyn BatchSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(HttpBatchSink::new()?),
        };
        let console = self
            .console
            .unwrap_or_else(|| Box::new(ConsoleAppender::new()));

        let logger = Logger::assemble(self.config, self.environment, console, sink);
        logger.start_worker()?;
        logger.finish_init();
        Ok(logger)
    }

    /// Build a logger without a worker; flush requests are discarded
    fn build_detached(self) -> Logger {
        let mut config = self.config;
        if config.max_buffer_size == 0 {
            config.max_buffer_size = 1;
        }
        let console = self
            .console
            .unwrap_or_else(|| Box::new(ConsoleAppender::new()));
        let sink = self.sink.unwrap_or_else(|| Arc::new(NullSink));

        let logger = Logger::assemble(config, self.environment, console, sink);
        logger.finish_init();
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink for loggers that never deliver remotely
struct NullSink;

#[async_trait::async_trait]
impl BatchSink for NullSink {
    async fn deliver(&self, _endpoint: &str, _batch: &LogBatch) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
