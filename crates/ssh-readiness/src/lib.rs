//! Runtime-agnostic helpers for waiting on SSH server readiness
//!
//! This crate provides the small set of utilities a test suite needs when it
//! spawns an SSH server and has to wait for it: allocating a free TCP port,
//! checking that an executable is resolvable on `PATH`, and polling a
//! host/port until an SSH banner is observed or a wait budget runs out.
//!
//! # Architecture
//!
//! The crate is runtime-agnostic, working with any async runtime (tokio,
//! async-std, smol, etc). It uses:
//!
//! - `async-net` for networking
//! - `async-io` timers for the default suspension primitive
//! - Standard `futures` traits
//!
//! The suspension primitive is injected through the [`Sleeper`] trait so test
//! suites can verify retry timing without real elapsed time.
//!
//! # Example
//!
//! ```no_run
//! use ssh_readiness::{get_free_port, wait_ssh_ready, WaitOptions};
//!
//! # async fn example() -> ssh_readiness::Result<()> {
//! let port = get_free_port().await?;
//! // ... spawn an SSH server on `port` ...
//! wait_ssh_ready("127.0.0.1", port, WaitOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod exec;
pub mod port;
pub mod ready;

pub use error::{Error, Result};
pub use exec::has_executable;
pub use port::get_free_port;
pub use ready::{
    wait_ssh_ready, wait_ssh_ready_with, RecordingSleeper, Sleeper, TimerSleeper, WaitOptions,
};
