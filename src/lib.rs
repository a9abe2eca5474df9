//! # svckit
//!
//! A lifecycle shell for network-exposed services.
//!
//! A service is configured once from an ordered list of options, started by
//! running its start hooks, kept alive while a background loop periodically
//! re-announces it, and stopped cleanly when the process receives a
//! termination signal or its cancellation token fires.
//!
//! ## Features
//!
//! - **Composable options**: each option may override earlier ones; handles
//!   they replace are closed, never leaked
//! - **Phase hooks**: `before_start`/`after_start` fail fast, `before_stop`/
//!   `after_stop` always run to completion
//! - **Owned collaborators**: registry and tracer handles are released exactly
//!   once, between the two stop phases
//! - **Testable shutdown**: the wait point accepts any future, so tests need no
//!   real OS signals
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use svckit::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LifecycleError> {
//!     tracing_subscriber::fmt::init();
//!
//!     let mut service = Service::new([
//!         description(ServiceDescription::new("billing.v1.Billing")),
//!         register_interval(Duration::from_secs(10)),
//!         on_register(|name| tracing::info!(%name, "still here")),
//!         before_start(|| {
//!             tracing::info!("opening connections");
//!             Ok(())
//!         }),
//!         after_stop(|| {
//!             tracing::info!("connections closed");
//!             Ok(())
//!         }),
//!     ]);
//!
//!     service.run().await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handle;
pub mod lifecycle;
pub mod options;

// Re-export core types
pub use config::ConfigService;
pub use error::{Result, ServiceError};
pub use handle::{Closable, Registry, Tracer};
pub use lifecycle::{Lifecycle, LifecycleError, Service, State};
pub use options::{Defaults, Options, ServiceDescription, ServiceOption, DEFAULT_NAME};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use tokio_util::sync::CancellationToken;

/// Prelude module for convenient imports
///
/// ```
/// use svckit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::ConfigService;
    pub use crate::error::ServiceError;
    pub use crate::handle::{Closable, Registry, Tracer};
    pub use crate::lifecycle::{
        async_hook, shutdown_signal, Hook, HookResult, Lifecycle, LifecycleError, Phase, Service,
        State, WakeReason,
    };
    pub use crate::options::{
        after_start, after_stop, before_start, before_stop, context, description, hook, name,
        on_register, register_interval, registry, tracer, using, Defaults, Options,
        ServiceDescription, ServiceOption, DEFAULT_NAME,
    };
    pub use std::time::Duration;
    pub use tokio_util::sync::CancellationToken;
}
