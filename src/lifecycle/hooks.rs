//! Lifecycle hooks
//!
//! A hook is a zero-argument fallible callback bound to one [`Phase`]. Hooks of
//! a phase live in a [`HookChain`] and always run in registration order, one at
//! a time.

use super::{LifecycleError, Result};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use strum_macros::{AsRefStr, Display, EnumIter};

/// Outcome of a single hook
pub type HookResult = anyhow::Result<()>;

/// The four points of the lifecycle where hooks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    BeforeStart,
    AfterStart,
    BeforeStop,
    AfterStop,
}

/// A callback registered for a lifecycle phase
///
/// Plain closures returning [`HookResult`] are hooks already:
///
/// ```rust,ignore
/// let opts = [before_start(|| {
///     tracing::info!("warming caches");
///     Ok(())
/// })];
/// ```
///
/// Async work can be wrapped with [`async_hook`].
#[async_trait]
pub trait Hook: Send {
    async fn call(&mut self) -> HookResult;
}

#[async_trait]
impl<F> Hook for F
where
    F: FnMut() -> HookResult + Send,
{
    async fn call(&mut self) -> HookResult {
        (self)()
    }
}

/// Hook backed by a closure that returns a future
pub struct AsyncHook<F> {
    f: F,
}

/// Turn an async closure into a [`Hook`]
///
/// ```rust,ignore
/// let flush = async_hook(move || {
///     let sink = sink.clone();
///     async move { sink.flush().await.map_err(Into::into) }
/// });
/// ```
pub fn async_hook<F, Fut>(f: F) -> AsyncHook<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = HookResult> + Send + 'static,
{
    AsyncHook { f }
}

#[async_trait]
impl<F, Fut> Hook for AsyncHook<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = HookResult> + Send + 'static,
{
    async fn call(&mut self) -> HookResult {
        (self.f)().await
    }
}

/// Ordered, append-only list of hooks for one phase
pub struct HookChain {
    phase: Phase,
    hooks: Vec<Box<dyn Hook>>,
}

impl HookChain {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            hooks: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn push(&mut self, hook: Box<dyn Hook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Execute hooks in order, stopping at the first failure
    pub async fn run_fail_fast(&mut self) -> Result<()> {
        tracing::debug!(phase = %self.phase, count = self.hooks.len(), "Running hooks");

        for (index, hook) in self.hooks.iter_mut().enumerate() {
            tracing::debug!(phase = %self.phase, index, "Running hook");
            if let Err(e) = hook.call().await {
                tracing::error!(
                    phase = %self.phase,
                    index,
                    error = %e,
                    "Hook failed, skipping the rest of the phase"
                );
                return Err(LifecycleError::hook_failed(self.phase, index, e));
            }
        }

        Ok(())
    }

    /// Execute every hook regardless of failures
    ///
    /// Returns the last failure observed, if any.
    pub async fn run_all(&mut self) -> Result<()> {
        tracing::debug!(phase = %self.phase, count = self.hooks.len(), "Running hooks");

        let mut last = None;
        for (index, hook) in self.hooks.iter_mut().enumerate() {
            tracing::debug!(phase = %self.phase, index, "Running hook");
            if let Err(e) = hook.call().await {
                // Log error but continue with other hooks
                tracing::error!(phase = %self.phase, index, error = %e, "Hook failed");
                last = Some(LifecycleError::hook_failed(self.phase, index, e));
            }
        }

        match last {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("phase", &self.phase)
            .field("len", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::{Arc, Mutex};

    fn recorder(order: &Arc<Mutex<Vec<usize>>>, id: usize, fail: bool) -> Box<dyn Hook> {
        let order = Arc::clone(order);
        Box::new(move || {
            order.lock().unwrap().push(id);
            if fail {
                Err(anyhow!("hook {} failed", id))
            } else {
                Ok(())
            }
        })
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::BeforeStart.to_string(), "before_start");
        assert_eq!(Phase::AfterStop.as_ref(), "after_stop");
    }

    #[tokio::test]
    async fn test_hooks_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut chain = HookChain::new(Phase::AfterStart);
        for i in 0..4 {
            chain.push(recorder(&order, i, false));
        }

        chain.run_fail_fast().await.unwrap();
        chain.run_all().await.unwrap();

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fail_fast_stops_at_first_failure() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut chain = HookChain::new(Phase::BeforeStart);
        chain.push(recorder(&order, 0, false));
        chain.push(recorder(&order, 1, true));
        chain.push(recorder(&order, 2, true));

        let err = chain.run_fail_fast().await.unwrap_err();

        assert_eq!(*order.lock().unwrap(), vec![0, 1]);
        match err {
            LifecycleError::HookFailed {
                phase,
                index,
                source,
            } => {
                assert_eq!(phase, Phase::BeforeStart);
                assert_eq!(index, 1);
                assert_eq!(source.to_string(), "hook 1 failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_run_all_keeps_last_failure() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut chain = HookChain::new(Phase::BeforeStop);
        chain.push(recorder(&order, 0, true));
        chain.push(recorder(&order, 1, false));
        chain.push(recorder(&order, 2, true));
        chain.push(recorder(&order, 3, false));

        let err = chain.run_all().await.unwrap_err();

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
        assert!(matches!(err, LifecycleError::HookFailed { index: 2, .. }));
        assert_eq!(err.to_string(), "before_stop hook #2 failed: hook 2 failed");
    }

    #[tokio::test]
    async fn test_empty_chain_succeeds() {
        let mut chain = HookChain::new(Phase::AfterStop);
        assert!(chain.is_empty());
        chain.run_fail_fast().await.unwrap();
        chain.run_all().await.unwrap();
    }

    #[tokio::test]
    async fn test_async_hook() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let mut chain = HookChain::new(Phase::AfterStart);
        chain.push(Box::new(async_hook(move || {
            let counter = Arc::clone(&counter);
            async move {
                tokio::task::yield_now().await;
                *counter.lock().unwrap() += 1;
                Ok::<(), anyhow::Error>(())
            }
        })));

        chain.run_fail_fast().await.unwrap();
        chain.run_fail_fast().await.unwrap();

        assert_eq!(*calls.lock().unwrap(), 2);
    }
}
