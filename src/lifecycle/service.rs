//! Service lifecycle controller
//!
//! Drives one configured service through start, run and stop.

use super::register::RegisterLoop;
use super::shutdown::{shutdown_signal, wait_for_shutdown};
use super::{LifecycleError, Result};
use crate::options::{Options, ServiceOption};
use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use strum_macros::Display;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

/// Where a service is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum State {
    Created,
    Started,
    Running,
    Stopping,
    Stopped,
}

/// A single run of a configured service
///
/// Owns the [`Options`] (and with them the registry and tracer handles) until
/// [`stop`](Self::stop) releases them.
///
/// # Example
///
/// ```rust,ignore
/// use svckit::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut service = Service::new([
///         name("billing"),
///         register_interval(Duration::from_secs(10)),
///         before_start(|| {
///             tracing::info!("opening connections");
///             Ok(())
///         }),
///     ]);
///
///     // Blocks until Ctrl+C / SIGTERM, then runs the stop hooks
///     service.run().await?;
///     Ok(())
/// }
/// ```
pub struct Service {
    options: Options,
    state: State,
    span: Span,
    started_at: Option<DateTime<Utc>>,
}

impl Service {
    /// Build the configuration from `opts` and wrap it
    pub fn new<I>(opts: I) -> Self
    where
        I: IntoIterator<Item = ServiceOption>,
    {
        Self::from_options(Options::new(opts))
    }

    pub fn from_options(options: Options) -> Self {
        let span = tracing::info_span!("service", name = %options.name(), id = %options.id());
        Self {
            options,
            state: State::Created,
            span,
            started_at: None,
        }
    }

    /// Log under `span` instead of the default `service` span
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn name(&self) -> &str {
        self.options.name()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// When `start` last succeeded
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Run the start hooks
    ///
    /// `before_start` hooks run first, then `after_start`. The first failure
    /// in either phase is returned and the rest of that phase (and anything
    /// after it) is skipped. Only valid on a freshly created service.
    pub async fn start(&mut self) -> Result<()> {
        let span = self.span.clone();
        self.start_inner().instrument(span).await
    }

    /// Run the stop hooks and release the registry and tracer
    ///
    /// Every `before_stop` hook runs, then the registry and the tracer are
    /// closed, then every `after_stop` hook runs. The last hook failure
    /// across both phases is returned.
    pub async fn stop(&mut self) -> Result<()> {
        let span = self.span.clone();
        self.stop_inner().instrument(span).await
    }

    /// Start, wait for Ctrl+C or SIGTERM (or cancellation), then stop
    pub async fn run(&mut self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Start, wait for `shutdown` or cancellation, then stop
    ///
    /// If `start` fails its error is returned right away: no background
    /// loop is launched and nothing is awaited.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let span = self.span.clone();
        self.run_inner(shutdown).instrument(span).await
    }

    async fn start_inner(&mut self) -> Result<()> {
        if self.state != State::Created {
            return Err(LifecycleError::invalid_state(self.state, State::Started));
        }

        tracing::info!("Starting service...");

        self.options.before_start.run_fail_fast().await?;
        self.options.after_start.run_fail_fast().await?;

        self.started_at = Some(Utc::now());
        self.transition(State::Started);

        tracing::info!("Service started");
        Ok(())
    }

    async fn stop_inner(&mut self) -> Result<()> {
        if self.state == State::Stopped {
            return Err(LifecycleError::invalid_state(self.state, State::Stopping));
        }

        self.transition(State::Stopping);
        tracing::info!("Stopping service...");

        let mut last = self.options.before_stop.run_all().await.err();

        if !self.options.release_handles() {
            tracing::warn!("Some handles failed to close, continuing shutdown");
        }

        if let Err(e) = self.options.after_stop.run_all().await {
            last = Some(e);
        }

        self.transition(State::Stopped);

        if let Some(started_at) = self.started_at {
            let uptime = Utc::now() - started_at;
            tracing::info!(uptime_ms = uptime.num_milliseconds(), "Service stopped");
        } else {
            tracing::info!("Service stopped");
        }

        match last {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn run_inner<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.start_inner().await?;

        let stop = CancellationToken::new();
        // Stops the loop even if this future is dropped before shutdown
        let _loop_guard = stop.clone().drop_guard();
        let register = RegisterLoop::new(
            self.options.name(),
            self.options.register_interval(),
            self.options.register_action.clone(),
            stop.clone(),
        );
        let handle = tokio::spawn(register.run().instrument(Span::current()));

        self.transition(State::Running);

        let cancellation = self.options.cancellation.clone();
        let reason = wait_for_shutdown(shutdown, &cancellation).await;
        tracing::info!(%reason, "Shutdown requested");

        stop.cancel();
        match handle.await {
            Ok(ticks) => tracing::debug!(ticks, "Re-registration loop joined"),
            Err(e) => tracing::warn!(error = %e, "Re-registration loop ended abnormally"),
        }

        self.stop_inner().await
    }

    fn transition(&mut self, to: State) {
        tracing::debug!(from = %self.state, %to, "State change");
        self.state = to;
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.options.name())
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("started_at", &self.started_at)
            .finish()
    }
}
