//! Background re-registration loop

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Action invoked once per re-registration tick with the service name
pub type RegisterAction = Arc<dyn Fn(&str) + Send + Sync>;

/// Periodically re-announces a service until told to stop
pub(crate) struct RegisterLoop {
    service: String,
    interval: Duration,
    action: Option<RegisterAction>,
    stop: CancellationToken,
}

impl RegisterLoop {
    pub(crate) fn new(
        service: impl Into<String>,
        interval: Duration,
        action: Option<RegisterAction>,
        stop: CancellationToken,
    ) -> Self {
        Self {
            service: service.into(),
            interval,
            action,
            stop,
        }
    }

    /// Run until the stop token fires, returning the number of ticks performed
    pub(crate) async fn run(self) -> u64 {
        if self.interval.is_zero() {
            tracing::debug!("Re-registration disabled");
            return 0;
        }

        tracing::info!(interval = ?self.interval, "Re-registration loop starting");

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut ticks = 0;
        loop {
            tokio::select! {
                biased;
                _ = self.stop.cancelled() => {
                    break;
                }
                _ = ticker.tick() => {
                    ticks += 1;
                    tracing::debug!(tick = ticks, "Re-registering");
                    self.register();
                }
            }
        }

        tracing::info!(ticks, "Re-registration loop stopped");
        ticks
    }

    fn register(&self) {
        if let Some(action) = &self.action {
            action(&self.service);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn counting_action(counter: &Arc<AtomicU64>) -> RegisterAction {
        let counter = Arc::clone(counter);
        Arc::new(move |_name: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_never_ticks() {
        let counter = Arc::new(AtomicU64::new(0));
        let stop = CancellationToken::new();
        let action = Some(counting_action(&counter));
        let register = RegisterLoop::new("svc", Duration::ZERO, action, stop.clone());
        let handle = tokio::spawn(register.run());

        tokio::time::sleep(Duration::from_secs(10)).await;
        stop.cancel();

        assert_eq!(handle.await.unwrap(), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_interval() {
        let counter = Arc::new(AtomicU64::new(0));
        let stop = CancellationToken::new();
        let handle = tokio::spawn(
            RegisterLoop::new(
                "svc",
                Duration::from_millis(100),
                Some(counting_action(&counter)),
                stop.clone(),
            )
            .run(),
        );

        tokio::time::sleep(Duration::from_millis(1050)).await;
        stop.cancel();
        let ticks = handle.await.unwrap();

        assert!((9..=11).contains(&ticks), "ticks = {ticks}");
        assert_eq!(counter.load(Ordering::SeqCst), ticks);

        // No tick after the loop has been stopped
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_wins_over_due_tick() {
        let counter = Arc::new(AtomicU64::new(0));
        let stop = CancellationToken::new();
        stop.cancel();

        let ticks = RegisterLoop::new(
            "svc",
            Duration::from_millis(1),
            Some(counting_action(&counter)),
            stop,
        )
        .run()
        .await;

        assert_eq!(ticks, 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_receives_service_name() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let action: RegisterAction = Arc::new(move |name: &str| {
            sink.lock().unwrap().push(name.to_string());
        });
        let stop = CancellationToken::new();
        let handle = tokio::spawn(
            RegisterLoop::new("orders", Duration::from_secs(1), Some(action), stop.clone()).run(),
        );

        tokio::time::sleep(Duration::from_millis(1500)).await;
        stop.cancel();
        handle.await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["orders".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_action_still_ticks() {
        let stop = CancellationToken::new();
        let handle = tokio::spawn(
            RegisterLoop::new("svc", Duration::from_millis(10), None, stop.clone()).run(),
        );

        tokio::time::sleep(Duration::from_millis(35)).await;
        stop.cancel();

        let ticks = handle.await.unwrap();
        assert!((2..=4).contains(&ticks), "ticks = {ticks}");
    }
}
