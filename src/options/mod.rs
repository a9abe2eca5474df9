//! Service configuration
//!
//! [`Options`] is assembled once from [`Defaults`] and an ordered list of
//! [`ServiceOption`]s, then handed to a [`Service`](crate::lifecycle::Service).
//!
//! # Example
//!
//! ```rust,ignore
//! use svckit::options::*;
//!
//! let options = Options::new([
//!     description(ServiceDescription::new("billing.v1.Billing")),
//!     register_interval(Duration::from_secs(10)),
//!     before_start(|| Ok(())),
//! ]);
//! assert_eq!(options.name(), "billing.v1.Billing");
//! ```

mod description;
mod option;

pub use description::ServiceDescription;
pub use option::{
    after_start, after_stop, before_start, before_stop, context, description, hook, name,
    on_register, register_interval, registry, tracer, using, ServiceOption,
};

use crate::config::ConfigService;
use crate::error::Result;
use crate::handle::{close_quietly, Registry, RegistryFactory, Tracer, TracerFactory};
use crate::lifecycle::{Hook, HookChain, Phase, RegisterAction};
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Name used when nothing else names the service
pub const DEFAULT_NAME: &str = "svckit/service[default]";

/// Base values the builder starts from before any option is applied
pub struct Defaults {
    pub name: String,
    pub register_interval: Duration,
    pub registry: Option<RegistryFactory>,
    pub tracer: Option<TracerFactory>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            register_interval: Duration::ZERO,
            registry: None,
            tracer: None,
        }
    }
}

impl Defaults {
    /// Read the name and re-registration interval from configuration
    pub fn from_config(config: &ConfigService) -> Result<Self> {
        let mut defaults = Self::default();
        if let Some(name) = config.service_name() {
            defaults.name = name;
        }
        if let Some(interval) = config.register_interval()? {
            defaults.register_interval = interval;
        }
        Ok(defaults)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_register_interval(mut self, interval: Duration) -> Self {
        self.register_interval = interval;
        self
    }

    /// Factory for the default registry; failures leave the registry absent
    pub fn with_registry<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> Result<Box<dyn Registry>> + Send + Sync + 'static,
    {
        self.registry = Some(Box::new(factory));
        self
    }

    /// Factory for the default tracer; failures leave the tracer absent
    pub fn with_tracer<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> Result<Box<dyn Tracer>> + Send + Sync + 'static,
    {
        self.tracer = Some(Box::new(factory));
        self
    }
}

fn best_effort<T>(component: &'static str, created: Result<T>) -> Option<T> {
    match created {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(component, error = %e, "Continuing without {}", component);
            None
        }
    }
}

/// Configuration of a single service run
pub struct Options {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) description: Option<ServiceDescription>,
    pub(crate) register_interval: Duration,
    pub(crate) register_action: Option<RegisterAction>,
    pub(crate) tracer: Option<Box<dyn Tracer>>,
    pub(crate) registry: Option<Box<dyn Registry>>,
    pub(crate) before_start: HookChain,
    pub(crate) after_start: HookChain,
    pub(crate) before_stop: HookChain,
    pub(crate) after_stop: HookChain,
    pub(crate) cancellation: CancellationToken,
}

impl Options {
    /// Build from [`Defaults::default`] and the given options
    pub fn new<I>(opts: I) -> Self
    where
        I: IntoIterator<Item = ServiceOption>,
    {
        Self::build(&Defaults::default(), opts)
    }

    /// Build from `defaults`, applying `opts` strictly in order
    ///
    /// [`using`] replaces everything configured before it, so it belongs at
    /// the front of the list. Anywhere else it is still applied, with a
    /// warning.
    pub fn build<I>(defaults: &Defaults, opts: I) -> Self
    where
        I: IntoIterator<Item = ServiceOption>,
    {
        let name = defaults.name.clone();
        let registry = defaults
            .registry
            .as_ref()
            .and_then(|factory| best_effort("registry", factory(&name)));
        let tracer = defaults
            .tracer
            .as_ref()
            .and_then(|factory| best_effort("tracer", factory(&name)));

        let mut options = Self {
            id: Uuid::new_v4(),
            name,
            description: None,
            register_interval: defaults.register_interval,
            register_action: None,
            tracer,
            registry,
            before_start: HookChain::new(Phase::BeforeStart),
            after_start: HookChain::new(Phase::AfterStart),
            before_stop: HookChain::new(Phase::BeforeStop),
            after_stop: HookChain::new(Phase::AfterStop),
            cancellation: CancellationToken::new(),
        };

        for (position, opt) in opts.into_iter().enumerate() {
            if opt.replaces_all() && position > 0 {
                tracing::warn!(
                    position,
                    "`using` applied after other options; their effects are discarded"
                );
            }
            opt.apply(&mut options);
        }

        options
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&ServiceDescription> {
        self.description.as_ref()
    }

    pub fn register_interval(&self) -> Duration {
        self.register_interval
    }

    pub fn has_registry(&self) -> bool {
        self.registry.is_some()
    }

    pub fn has_tracer(&self) -> bool {
        self.tracer.is_some()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Get the number of hooks registered for a phase
    pub fn hook_count(&self, phase: Phase) -> usize {
        self.hooks(phase).len()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Store the description; its declared name becomes the service name
    pub fn set_description(&mut self, description: ServiceDescription) {
        self.name = description.service_name.clone();
        self.description = Some(description);
    }

    /// Zero disables the re-registration loop
    pub fn set_register_interval(&mut self, interval: Duration) {
        self.register_interval = interval;
    }

    pub fn set_register_action(&mut self, action: RegisterAction) {
        self.register_action = Some(action);
    }

    /// Install a registry, closing the one currently held
    pub fn set_registry(&mut self, registry: Box<dyn Registry>) {
        if let Some(mut previous) = self.registry.take() {
            let closed = close_quietly("registry", previous.as_mut());
            tracing::debug!(closed, "Replaced registry");
        }
        self.registry = Some(registry);
    }

    /// Install a tracer, closing the one currently held
    pub fn set_tracer(&mut self, tracer: Box<dyn Tracer>) {
        if let Some(mut previous) = self.tracer.take() {
            let closed = close_quietly("tracer", previous.as_mut());
            tracing::debug!(closed, "Replaced tracer");
        }
        self.tracer = Some(tracer);
    }

    pub fn set_cancellation(&mut self, token: CancellationToken) {
        self.cancellation = token;
    }

    /// Append a hook to a phase
    pub fn push_hook(&mut self, phase: Phase, hook: Box<dyn Hook>) {
        self.hooks_mut(phase).push(hook);
    }

    /// Replace the whole configuration with `base`
    ///
    /// Handles held by `self` are closed first so that only `base`'s remain.
    pub fn replace_with(&mut self, base: Options) {
        if !self.release_handles() {
            tracing::warn!("Displaced handles did not all close cleanly");
        }
        *self = base;
    }

    /// Close the registry, then the tracer
    ///
    /// Both are always attempted. Returns `false` if either close failed;
    /// the failures themselves are only logged.
    pub(crate) fn release_handles(&mut self) -> bool {
        let mut clean = true;
        if let Some(mut registry) = self.registry.take() {
            clean &= close_quietly("registry", registry.as_mut());
        }
        if let Some(mut tracer) = self.tracer.take() {
            clean &= close_quietly("tracer", tracer.as_mut());
        }
        clean
    }

    pub(crate) fn hooks(&self, phase: Phase) -> &HookChain {
        match phase {
            Phase::BeforeStart => &self.before_start,
            Phase::AfterStart => &self.after_start,
            Phase::BeforeStop => &self.before_stop,
            Phase::AfterStop => &self.after_stop,
        }
    }

    pub(crate) fn hooks_mut(&mut self, phase: Phase) -> &mut HookChain {
        match phase {
            Phase::BeforeStart => &mut self.before_start,
            Phase::AfterStart => &mut self.after_start,
            Phase::BeforeStop => &mut self.before_stop,
            Phase::AfterStop => &mut self.after_stop,
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new([])
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("register_interval", &self.register_interval)
            .field("registry", &self.registry.is_some())
            .field("tracer", &self.tracer.is_some())
            .field("before_start", &self.before_start.len())
            .field("after_start", &self.after_start.len())
            .field("before_stop", &self.before_stop.len())
            .field("after_stop", &self.after_stop.len())
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}
