//! Report dispatch loop
//!
//! Waits on the hidraw descriptor with a bounded timeout, decodes each report
//! and routes the resulting dial tick to the virtual device or the backlight.
//! Per-report failures are logged and skipped; only losing the device ends
//! the loop early.

use std::io::{ErrorKind, Read};
use std::os::fd::AsFd;
use std::sync::atomic::{AtomicBool, Ordering};

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use thiserror::Error;
use tracing::{debug, warn};

use crate::action::Effect;
use crate::backlight::{Backlight, BacklightError};
use crate::config::DialBindings;
use crate::report::{self, MAX_REPORT_LEN};
use crate::sink::{InputSink, SinkError};

/// Readiness wait per iteration; bounds how long a shutdown request can go unseen
pub const DEFAULT_POLL_TIMEOUT_MS: u16 = 1000;

/// Errors from dispatching dial reports
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Output device error: {0}")]
    Sink(#[from] SinkError),
    #[error("Backlight adjustment failed: {0}")]
    Backlight(#[from] BacklightError),
    #[error("Polling device failed: {0}")]
    Poll(#[source] Errno),
    #[error("Device disconnected")]
    DeviceLost,
}

/// Routes decoded dial ticks to their outputs
pub struct Dispatcher<S> {
    bindings: DialBindings,
    sink: S,
    backlight: Option<Backlight>,
    poll_timeout_ms: u16,
}

impl<S: InputSink> Dispatcher<S> {
    /// # Arguments
    /// * `bindings` - Resolved per-dial actions
    /// * `sink` - Output for key and scroll actions
    /// * `backlight` - Backlight controller; `None` turns backlight actions into no-ops
    pub fn new(bindings: DialBindings, sink: S, backlight: Option<Backlight>) -> Self {
        Self {
            bindings,
            sink,
            backlight,
            poll_timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
        }
    }

    pub fn with_poll_timeout(mut self, timeout_ms: u16) -> Self {
        self.poll_timeout_ms = timeout_ms;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Handle one raw report
    ///
    /// Returns the effect applied, or `None` if the report carried no dial tick.
    pub fn handle_report(&mut self, data: &[u8]) -> Result<Option<Effect>, DispatchError> {
        let Some(event) = report::decode(data) else {
            return Ok(None);
        };

        let effect = self.bindings.get(event.dial).resolve(event.direction);
        debug!("{:?} {} -> {:?}", event.dial, event.direction, effect);

        match effect {
            Effect::Key(key) => {
                // One click per tick: press and release in the same batch
                self.sink.key(key, true)?;
                self.sink.key(key, false)?;
                self.sink.sync()?;
            }
            Effect::Rel { axis, delta } => {
                self.sink.relative(axis, delta)?;
                self.sink.sync()?;
            }
            Effect::Backlight {
                direction,
                step_percent,
            } => match &self.backlight {
                Some(backlight) => {
                    backlight.adjust(direction, step_percent)?;
                }
                None => debug!("No backlight controller, ignoring {}", direction),
            },
        }

        Ok(Some(effect))
    }

    /// Run until `running` is cleared or the device goes away
    ///
    /// The device is owned by the loop and closed when it returns.
    pub fn run<D: Read + AsFd>(
        &mut self,
        mut device: D,
        running: &AtomicBool,
    ) -> Result<(), DispatchError> {
        let mut buf = [0u8; MAX_REPORT_LEN];

        while running.load(Ordering::SeqCst) {
            let revents = {
                let mut fds = [PollFd::new(device.as_fd(), PollFlags::POLLIN)];
                match poll(&mut fds, PollTimeout::from(self.poll_timeout_ms)) {
                    Ok(0) => continue,
                    Ok(_) => fds[0].revents().unwrap_or(PollFlags::empty()),
                    Err(Errno::EINTR) => continue,
                    Err(e) => return Err(DispatchError::Poll(e)),
                }
            };

            if revents.intersects(PollFlags::POLLERR | PollFlags::POLLHUP | PollFlags::POLLNVAL) {
                return Err(DispatchError::DeviceLost);
            }
            if !revents.contains(PollFlags::POLLIN) {
                continue;
            }

            let len = match device.read(&mut buf) {
                Ok(len) => len,
                Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {
                    continue
                }
                Err(e) => {
                    warn!("Read error: {}", e);
                    continue;
                }
            };

            if let Err(e) = self.handle_report(&buf[..len]) {
                warn!("{}", e);
            }
        }

        debug!("Dispatch loop stopped");
        Ok(())
    }
}
