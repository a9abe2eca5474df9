//! Lifecycle Module
//!
//! Drives a configured service through its lifecycle and runs the hooks
//! registered for each phase.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Options built (defaults → options, in order)
//!    ↓
//! 2. before_start hooks          ← fail fast
//!    ↓
//! 3. after_start hooks           ← fail fast
//!    ↓
//! 4. Re-registration loop spawned
//!    ↓
//! [Running...]
//!    ↓
//! 5. Shutdown signal (SIGTERM/SIGINT) or cancellation
//!    ↓
//! 6. Re-registration loop stopped and joined
//!    ↓
//! 7. before_stop hooks           ← all run, last error kept
//!    ↓
//! 8. Registry closed, then tracer
//!    ↓
//! 9. after_stop hooks            ← all run, last error kept
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use svckit::lifecycle::Service;
//! use svckit::options::{after_stop, before_start, context};
//! use tokio_util::sync::CancellationToken;
//!
//! let token = CancellationToken::new();
//! let mut service = Service::new([
//!     context(token.clone()),
//!     before_start(|| {
//!         tracing::info!("Initializing database connection");
//!         Ok(())
//!     }),
//!     after_stop(|| {
//!         tracing::info!("Closing database connections");
//!         Ok(())
//!     }),
//! ]);
//!
//! service.run().await?;
//! ```

mod error;
mod hooks;
mod register;
mod service;
mod shutdown;
mod traits;

pub use error::{LifecycleError, Result};
pub use hooks::{async_hook, AsyncHook, Hook, HookChain, HookResult, Phase};
pub use register::RegisterAction;
pub use service::{Service, State};
pub use shutdown::{shutdown_signal, wait_for_shutdown, WakeReason};
pub use traits::Lifecycle;
