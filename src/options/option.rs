use super::{Options, ServiceDescription};
use crate::handle::{Registry, Tracer};
use crate::lifecycle::{Hook, HookResult, Phase, RegisterAction};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A single configuration step, applied in order by [`Options::build`]
pub struct ServiceOption {
    apply: Box<dyn FnOnce(&mut Options) + Send>,
    replaces_all: bool,
}

impl ServiceOption {
    /// Wrap an arbitrary mutation of the in-progress configuration
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut Options) + Send + 'static,
    {
        Self {
            apply: Box::new(f),
            replaces_all: false,
        }
    }

    /// Whether this option overwrites the whole configuration
    pub fn replaces_all(&self) -> bool {
        self.replaces_all
    }

    pub(crate) fn apply(self, options: &mut Options) {
        (self.apply)(options)
    }
}

/// Replace the configuration built so far with `base`
///
/// Must be the first option: anything applied before it is discarded.
pub fn using(base: Options) -> ServiceOption {
    ServiceOption {
        apply: Box::new(move |o: &mut Options| o.replace_with(base)),
        replaces_all: true,
    }
}

pub fn name(name: impl Into<String>) -> ServiceOption {
    let name = name.into();
    ServiceOption::new(move |o| o.set_name(name))
}

/// Set the service description; the service takes the description's name
pub fn description(description: ServiceDescription) -> ServiceOption {
    ServiceOption::new(move |o| o.set_description(description))
}

/// Install a registry, closing the one currently held
pub fn registry<R>(registry: R) -> ServiceOption
where
    R: Registry + 'static,
{
    ServiceOption::new(move |o| o.set_registry(Box::new(registry)))
}

/// Install a tracer, closing the one currently held
pub fn tracer<T>(tracer: T) -> ServiceOption
where
    T: Tracer + 'static,
{
    ServiceOption::new(move |o| o.set_tracer(Box::new(tracer)))
}

/// Use `token` as the external cancellation source
pub fn context(token: CancellationToken) -> ServiceOption {
    ServiceOption::new(move |o| o.set_cancellation(token))
}

/// Re-register every `interval` while running; zero disables the loop
pub fn register_interval(interval: Duration) -> ServiceOption {
    ServiceOption::new(move |o| o.set_register_interval(interval))
}

/// Action run on every re-registration tick, given the service name
pub fn on_register<F>(action: F) -> ServiceOption
where
    F: Fn(&str) + Send + Sync + 'static,
{
    let action: RegisterAction = Arc::new(action);
    ServiceOption::new(move |o| o.set_register_action(action))
}

/// Append any [`Hook`] (for example an [`async_hook`](crate::lifecycle::async_hook)) to a phase
pub fn hook<H>(phase: Phase, hook: H) -> ServiceOption
where
    H: Hook + 'static,
{
    ServiceOption::new(move |o| o.push_hook(phase, Box::new(hook)))
}

pub fn before_start<F>(f: F) -> ServiceOption
where
    F: FnMut() -> HookResult + Send + 'static,
{
    hook(Phase::BeforeStart, f)
}

pub fn after_start<F>(f: F) -> ServiceOption
where
    F: FnMut() -> HookResult + Send + 'static,
{
    hook(Phase::AfterStart, f)
}

pub fn before_stop<F>(f: F) -> ServiceOption
where
    F: FnMut() -> HookResult + Send + 'static,
{
    hook(Phase::BeforeStop, f)
}

pub fn after_stop<F>(f: F) -> ServiceOption
where
    F: FnMut() -> HookResult + Send + 'static,
{
    hook(Phase::AfterStop, f)
}
