//! Owned collaborator handles
//!
//! A service owns at most one registry handle and one tracer handle. The core
//! never looks inside them: the only thing it needs is a way to release them.

use crate::error::{Result, ServiceError};
use std::panic::{self, AssertUnwindSafe};

/// A resource that exposes a single teardown operation
pub trait Closable: Send {
    /// Release the resource.
    ///
    /// Called at most once per handle by this crate.
    fn close(&mut self) -> Result<()>;
}

/// Client for the service registry (the store the service announces itself to)
pub trait Registry: Closable {}

/// Client for the distributed tracing backend
pub trait Tracer: Closable {}

/// Best-effort constructor for the default registry, given the service name
pub type RegistryFactory = Box<dyn Fn(&str) -> Result<Box<dyn Registry>> + Send + Sync>;

/// Best-effort constructor for the default tracer, given the service name
pub type TracerFactory = Box<dyn Fn(&str) -> Result<Box<dyn Tracer>> + Send + Sync>;

/// Close a handle, logging instead of propagating failure.
///
/// A panicking `close` is caught so that callers releasing several handles in
/// a row always get to the next one.
pub(crate) fn close_quietly<H>(component: &'static str, handle: &mut H) -> bool
where
    H: Closable + ?Sized,
{
    match panic::catch_unwind(AssertUnwindSafe(|| handle.close())) {
        Ok(Ok(())) => {
            tracing::debug!(component, "Handle closed");
            true
        }
        Ok(Err(e)) => {
            tracing::warn!(component, error = %e, "Failed to close handle");
            false
        }
        Err(_) => {
            let e = ServiceError::close(component, "close panicked");
            tracing::warn!(component, error = %e, "Failed to close handle");
            false
        }
    }
}
