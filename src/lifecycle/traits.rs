//! Lifecycle trait
//!
//! Lets several services be driven through one interface, e.g. a
//! `Vec<Box<dyn Lifecycle>>` owned by a supervisor.

use super::{Result, Service};
use async_trait::async_trait;

/// Something that can be started, run until asked to stop, and stopped
#[async_trait]
pub trait Lifecycle: Send {
    /// Run the start hooks
    async fn start(&mut self) -> Result<()>;

    /// Run the stop hooks and release owned resources
    async fn stop(&mut self) -> Result<()>;

    /// Start, block until a shutdown request, then stop
    async fn run(&mut self) -> Result<()>;
}

#[async_trait]
impl Lifecycle for Service {
    async fn start(&mut self) -> Result<()> {
        Service::start(self).await
    }

    async fn stop(&mut self) -> Result<()> {
        Service::stop(self).await
    }

    async fn run(&mut self) -> Result<()> {
        Service::run(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::State;
    use crate::options::{before_start, before_stop, name};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_drive_services_through_trait_objects() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut services: Vec<Box<dyn Lifecycle>> = (0..3)
            .map(|i| {
                let on_start = Arc::clone(&calls);
                let on_stop = Arc::clone(&calls);
                Box::new(Service::new([
                    name(format!("svc-{i}")),
                    before_start(move || {
                        on_start.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }),
                    before_stop(move || {
                        on_stop.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }),
                ])) as Box<dyn Lifecycle>
            })
            .collect();

        for service in services.iter_mut() {
            service.start().await.unwrap();
        }
        for service in services.iter_mut().rev() {
            service.stop().await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_trait_start_respects_state() {
        let mut service = Service::new([]);
        Lifecycle::start(&mut service).await.unwrap();
        assert_eq!(service.state(), State::Started);
        assert!(Lifecycle::start(&mut service).await.is_err());
    }
}
