//! Polling derivation: retry a callback until its value satisfies a guard.
//!
//! A `wait_until` call takes an order-flexible argument list. Scanning from
//! the end, the first [`WaitArg::Callback`] is the polled callback, every
//! [`WaitArg::Value`] before it is forwarded to the assert function after
//! the callback's value, and [`WaitArg::Options`] / [`WaitArg::Message`]
//! after it configure the loop. [`WaitArg::Undefined`] entries are skipped.
//!
//! The loop is strictly sequential: invoke the callback, run the assertion,
//! and on failure sleep for the interval before checking the elapsed time
//! against the timeout. The last failure is chained onto the timeout error.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Deserialize;
use tokio::time::{Instant, sleep};

use crate::error::{BoxError, Result, WaitUntilTimeout, WardenError};

/// Delay between polling attempts when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);
/// Total polling budget when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A type-erased `wait_until` function over candidates of type `V`.
pub type WaitUntilFn<V> =
    Arc<dyn Fn(Vec<WaitArg<V>>) -> BoxFuture<'static, Result<V>> + Send + Sync>;

/// A duration written as a sum of units, e.g. `{"seconds": 1, "milliseconds": 500}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DurationSpec {
    /// Milliseconds.
    pub milliseconds: f64,
    /// Seconds.
    pub seconds: f64,
    /// Minutes.
    pub minutes: f64,
}

impl DurationSpec {
    /// Total length in milliseconds.
    pub fn total_milliseconds(&self) -> f64 {
        self.milliseconds + self.seconds * 1_000.0 + self.minutes * 60_000.0
    }

    /// Convert into a [`Duration`], rejecting negative or non-finite totals.
    pub fn to_duration(&self) -> Result<Duration> {
        let millis = self.total_milliseconds();
        if !millis.is_finite() || millis < 0.0 {
            return Err(WardenError::Usage(format!(
                "duration must be a finite, non-negative length, got {millis} milliseconds"
            )));
        }
        Ok(Duration::from_nanos((millis * 1_000_000.0).round() as u64))
    }
}

/// Interval and timeout of a polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitUntilOptions {
    /// Delay between attempts.
    pub interval: Duration,
    /// Elapsed time after which polling gives up.
    pub timeout: Duration,
}

impl Default for WaitUntilOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWaitUntilOptions {
    interval: Option<DurationSpec>,
    timeout: Option<DurationSpec>,
}

impl WaitUntilOptions {
    /// Replace the polling interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Replace the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse options such as `{"interval": {"milliseconds": 10}}`.
    ///
    /// Missing fields keep their defaults.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let raw: RawWaitUntilOptions = serde_json::from_value(value.clone())?;
        let mut options = Self::default();
        if let Some(interval) = raw.interval {
            options.interval = interval.to_duration()?;
        }
        if let Some(timeout) = raw.timeout {
            options.timeout = timeout.to_duration()?;
        }
        Ok(options)
    }
}

/// The callback polled by `wait_until`.
pub enum Callback<V> {
    /// Produces a value immediately.
    Sync(Box<dyn FnMut() -> std::result::Result<V, BoxError> + Send>),
    /// Produces a value once the returned future resolves.
    Async(Box<dyn FnMut() -> BoxFuture<'static, std::result::Result<V, BoxError>> + Send>),
}

impl<V> Callback<V> {
    /// Wrap a synchronous callback.
    pub fn sync<F>(callback: F) -> Self
    where
        F: FnMut() -> std::result::Result<V, BoxError> + Send + 'static,
    {
        Self::Sync(Box::new(callback))
    }

    /// Wrap a callback returning a future.
    pub fn future<F, Fut>(mut callback: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<V, BoxError>> + Send + 'static,
    {
        Self::Async(Box::new(move || callback().boxed()))
    }

    /// Whether the callback's value is only available after awaiting.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    async fn invoke(&mut self) -> std::result::Result<V, BoxError> {
        match self {
            Self::Sync(callback) => callback(),
            Self::Async(callback) => callback().await,
        }
    }
}

impl<V> fmt::Debug for Callback<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Callback::Sync"),
            Self::Async(_) => f.write_str("Callback::Async"),
        }
    }
}

/// One raw argument of a `wait_until` call.
#[derive(Debug)]
pub enum WaitArg<V> {
    /// An extra assertion argument; only valid before the callback.
    Value(V),
    /// The polled callback.
    Callback(Callback<V>),
    /// Polling options.
    Options(WaitUntilOptions),
    /// Failure message used as the timeout prefix.
    Message(String),
    /// Skipped.
    Undefined,
}

impl<V> WaitArg<V> {
    /// An extra assertion argument.
    pub fn value(value: V) -> Self {
        Self::Value(value)
    }

    /// A synchronous callback.
    pub fn callback<F>(callback: F) -> Self
    where
        F: FnMut() -> std::result::Result<V, BoxError> + Send + 'static,
    {
        Self::Callback(Callback::sync(callback))
    }

    /// A future-returning callback.
    pub fn future<F, Fut>(callback: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<V, BoxError>> + Send + 'static,
    {
        Self::Callback(Callback::future(callback))
    }

    /// Polling options.
    pub fn options(options: WaitUntilOptions) -> Self {
        Self::Options(options)
    }

    /// A failure message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// A parsed `wait_until` call.
#[derive(Debug)]
pub struct WaitUntilCall<V> {
    /// Arguments forwarded to the assert function after the callback's value.
    pub extra_args: Vec<V>,
    /// The polled callback.
    pub callback: Callback<V>,
    /// Interval and timeout.
    pub options: WaitUntilOptions,
    /// Prefix for the timeout message.
    pub failure_message: Option<String>,
}

impl<V> WaitUntilCall<V> {
    /// Start a call around `callback` with default options.
    pub fn new(callback: Callback<V>) -> Self {
        Self {
            extra_args: Vec::new(),
            callback,
            options: WaitUntilOptions::default(),
            failure_message: None,
        }
    }

    /// Replace the extra assertion arguments.
    pub fn with_args(mut self, extra_args: Vec<V>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Replace the polling options.
    pub fn with_options(mut self, options: WaitUntilOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    /// Flatten back into the raw argument order accepted by [`parse_wait_until_args`].
    pub fn into_args(self) -> Vec<WaitArg<V>> {
        let mut args: Vec<WaitArg<V>> = self.extra_args.into_iter().map(WaitArg::Value).collect();
        args.push(WaitArg::Callback(self.callback));
        args.push(WaitArg::Options(self.options));
        if let Some(message) = self.failure_message {
            args.push(WaitArg::Message(message));
        }
        args
    }
}

/// Classify a raw argument list into a [`WaitUntilCall`].
pub fn parse_wait_until_args<V>(raw_args: Vec<WaitArg<V>>) -> Result<WaitUntilCall<V>> {
    let mut callback = None;
    let mut extra_args = Vec::new();
    let mut options = None;
    let mut failure_message = None;
    let mut stray_value = None;

    for (index, arg) in raw_args.into_iter().enumerate().rev() {
        if callback.is_some() {
            match arg {
                WaitArg::Value(value) => extra_args.push(value),
                WaitArg::Undefined => {}
                WaitArg::Callback(_) => {
                    return Err(usage(index, "only one callback may be supplied"));
                }
                WaitArg::Options(_) | WaitArg::Message(_) => {
                    return Err(usage(
                        index,
                        "options and failure messages must follow the callback",
                    ));
                }
            }
            continue;
        }

        // The last message and the last options win; earlier ones are ignored.
        match arg {
            WaitArg::Callback(found) => callback = Some(found),
            WaitArg::Message(message) => {
                if failure_message.is_none() {
                    failure_message = Some(message);
                } else {
                    log::debug!("wait_until argument {index}: ignoring earlier failure message");
                }
            }
            WaitArg::Options(found) => {
                if options.is_none() {
                    options = Some(found);
                } else {
                    log::debug!("wait_until argument {index}: ignoring earlier options");
                }
            }
            WaitArg::Undefined => {}
            WaitArg::Value(_) => stray_value = Some(index),
        }
    }

    let Some(callback) = callback else {
        return Err(WardenError::Usage("missing callback".to_string()));
    };
    if let Some(index) = stray_value {
        return Err(usage(index, "unexpected value after the callback"));
    }
    extra_args.reverse();

    Ok(WaitUntilCall {
        extra_args,
        callback,
        options: options.unwrap_or_default(),
        failure_message,
    })
}

fn usage(index: usize, problem: &str) -> WardenError {
    WardenError::Usage(format!("wait_until argument {index}: {problem}"))
}

/// Derive a `wait_until` function from an assert function.
///
/// With `require_synchronous_result` the callback's value is handed to the
/// assertion exactly as produced, so only [`Callback::Sync`] is accepted.
pub fn create_wait_until<V, F>(assert_fn: F, require_synchronous_result: bool) -> WaitUntilFn<V>
where
    V: Send + 'static,
    F: Fn(&V, &[V], Option<&str>) -> Result<()> + Send + Sync + 'static,
{
    let assert_fn = Arc::new(assert_fn);
    Arc::new(move |raw_args: Vec<WaitArg<V>>| {
        run_wait_until(Arc::clone(&assert_fn), raw_args, require_synchronous_result).boxed()
    })
}

async fn run_wait_until<V, F>(
    assert_fn: Arc<F>,
    raw_args: Vec<WaitArg<V>>,
    require_synchronous_result: bool,
) -> Result<V>
where
    V: Send,
    F: Fn(&V, &[V], Option<&str>) -> Result<()> + Send + Sync,
{
    let call = parse_wait_until_args(raw_args)?;
    poll_until(assert_fn.as_ref(), call, require_synchronous_result).await
}

/// Run the polling loop for an already-parsed call.
pub async fn poll_until<V, F>(
    assert_fn: &F,
    call: WaitUntilCall<V>,
    require_synchronous_result: bool,
) -> Result<V>
where
    F: Fn(&V, &[V], Option<&str>) -> Result<()> + ?Sized,
{
    let WaitUntilCall {
        extra_args,
        mut callback,
        options,
        failure_message,
    } = call;

    if require_synchronous_result && callback.is_async() {
        return Err(WardenError::Usage(
            "this guard inspects the callback's immediate result and needs a synchronous callback"
                .to_string(),
        ));
    }

    let started = Instant::now();
    let mut attempts = 0usize;
    loop {
        attempts += 1;
        let last_error: BoxError = match callback.invoke().await {
            Ok(output) => match assert_fn(&output, &extra_args, None) {
                Ok(()) => {
                    log::debug!("wait_until passed after {attempts} attempt(s)");
                    return Ok(output);
                }
                Err(err) => Box::new(err) as BoxError,
            },
            Err(err) => err,
        };
        log::trace!("wait_until attempt {attempts} failed: {last_error}");

        sleep(options.interval).await;
        if started.elapsed() >= options.timeout {
            log::debug!(
                "wait_until gave up after {attempts} attempt(s) and {}ms",
                options.timeout.as_millis()
            );
            return Err(WaitUntilTimeout::new(
                options.timeout,
                failure_message.as_deref(),
                Some(last_error),
            )
            .into());
        }
    }
}
