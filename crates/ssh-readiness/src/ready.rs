//! Deadline-bounded polling for an SSH banner.
//!
//! The poller repeatedly connects to a host/port and reads the first line the
//! peer sends. A line containing `"SSH"` means the server is ready. A refused
//! connection (or a connection that answers with something else) is retried
//! after a fixed sleep until the wait budget runs out; every other
//! connection-level error is surfaced immediately.

use std::io;
use std::sync::Mutex;
use std::time::Duration;

use async_io::Timer;
use async_net::TcpStream;
use async_trait::async_trait;
use futures::io::{AsyncBufReadExt, BufReader};
use futures_lite::future;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Substring that marks a banner line as coming from an SSH server.
const BANNER_MARKER: &str = "SSH";

/// Budget for establishing a single TCP connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Suspension capability used between polling attempts.
///
/// Injected rather than called directly so test suites can substitute a
/// recorder and assert retry timing without real elapsed time.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Timer-backed [`Sleeper`] used outside of tests.
#[derive(Debug, Default)]
pub struct TimerSleeper;

#[async_trait]
impl Sleeper for TimerSleeper {
    async fn sleep(&self, duration: Duration) {
        Timer::after(duration).await;
    }
}

/// A [`Sleeper`] that records each requested duration instead of sleeping.
///
/// Exists for test suites: it lets a test drive the full retry loop in
/// microseconds and then assert exactly how often, and for how long, the
/// poller would have slept.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Create a recorder with no calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// The durations passed to [`Sleeper::sleep`], in call order.
    pub fn calls(&self) -> Vec<Duration> {
        self.calls.lock().expect("sleeper lock poisoned").clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.calls
            .lock()
            .expect("sleeper lock poisoned")
            .push(duration);
    }
}

/// Polling intervals for [`wait_ssh_ready`].
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Interval between attempts.
    pub sleep: Duration,
    /// Total wait budget. Polling stops once the accumulated sleep time
    /// would exceed this.
    pub max_wait: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            sleep: Duration::from_secs(1),
            max_wait: Duration::from_secs(60),
        }
    }
}

/// Outcome of a single connect-and-read-banner attempt.
enum AttemptError {
    /// Retryable: the target refused the connection, or accepted it but
    /// answered with something other than an SSH banner.
    Refused(io::Error),
    /// Everything else (unreachable, resolution failure, connect timeout).
    Fatal(io::Error),
}

/// Poll `host:port` until an SSH banner is observed.
///
/// Returns `Ok(())` as soon as one connection attempt reads a line containing
/// `"SSH"`. A refused connection or a non-SSH reply is retried after
/// `options.sleep` until sleeping once more would exceed `options.max_wait`,
/// at which point [`Error::ConnectionRefused`] is returned. Any other
/// connection-level error is surfaced immediately without retrying.
pub async fn wait_ssh_ready(host: &str, port: u16, options: WaitOptions) -> Result<()> {
    wait_ssh_ready_with(host, port, options, &TimerSleeper).await
}

/// [`wait_ssh_ready`] with an explicit suspension capability.
pub async fn wait_ssh_ready_with(
    host: &str,
    port: u16,
    options: WaitOptions,
    sleeper: &dyn Sleeper,
) -> Result<()> {
    let mut waited = Duration::ZERO;

    loop {
        let refused = match attempt(host, port).await {
            Ok(()) => {
                debug!("{}:{} answered with an SSH banner", host, port);
                return Ok(());
            }
            Err(AttemptError::Refused(source)) => source,
            Err(AttemptError::Fatal(source)) => {
                warn!("giving up on {}:{}: {}", host, port, source);
                return Err(Error::Io(source));
            }
        };

        // Checked before sleeping: under persistent failure the loop sleeps
        // exactly floor(max_wait / sleep) times.
        if waited + options.sleep > options.max_wait {
            return Err(Error::ConnectionRefused {
                host: host.to_string(),
                port,
                waited,
                source: refused,
            });
        }

        debug!(
            "{}:{} not ready ({}), retrying in {:?}",
            host, port, refused, options.sleep
        );
        sleeper.sleep(options.sleep).await;
        waited += options.sleep;
    }
}

/// Connect once and read the first line the peer sends.
///
/// The socket lives only for the duration of this call and is released on
/// every exit path.
async fn attempt(host: &str, port: u16) -> std::result::Result<(), AttemptError> {
    let stream = match connect(host, port).await {
        Ok(stream) => stream,
        Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
            return Err(AttemptError::Refused(e));
        }
        Err(e) => return Err(AttemptError::Fatal(e)),
    };

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    if let Err(e) = reader.read_line(&mut line).await {
        return Err(AttemptError::Fatal(e));
    }

    if line.contains(BANNER_MARKER) {
        Ok(())
    } else {
        // Deliberately surfaced as a refusal so a server that answers with
        // the wrong banner fails the same way as no server at all.
        Err(AttemptError::Refused(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            format!("no SSH banner from {host}:{port}, got {:?}", line.trim_end()),
        )))
    }
}

async fn connect(host: &str, port: u16) -> io::Result<TcpStream> {
    let connect = async { TcpStream::connect((host, port)).await };
    let timeout = async {
        Timer::after(CONNECT_TIMEOUT).await;
        Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("connecting to {host}:{port} timed out"),
        ))
    };
    future::or(connect, timeout).await
}
