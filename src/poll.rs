//! Polling loop
//!
//! Reads reports from the controller at a fixed cadence and feeds them
//! through the translation pipeline until the shutdown token is cancelled.
//! Every exit path releases all held keys before returning.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use j2k_transport::{ReportSource, READ_BUFFER_SIZE};
use tracing::{debug, error, info, trace, warn};

use crate::axis::DEFAULT_DEADZONE;
use crate::config::Config;
use crate::error::Error;
use crate::intent::IntentSet;
use crate::key_state::KeyStateMachine;
use crate::keyboard::KeySink;
use crate::report::ControllerReport;

/// ~60Hz
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Cancellation flag shared between the polling loop and the signal handler
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    cancelled: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the polling loop to stop
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Cancel this token on Ctrl-C / SIGTERM
    ///
    /// Can only succeed once per process. Failure is fatal: a signal would
    /// otherwise kill the process with keys still held.
    pub fn install_signal_handler(&self) -> Result<(), Error> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            info!("Stopping emulator...");
            token.cancel();
        })
        .map_err(Error::SignalHandler)
    }
}

/// Loop timing and stick settings
#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    pub deadzone: f64,
    pub poll_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            deadzone: DEFAULT_DEADZONE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl From<&Config> for PollSettings {
    fn from(config: &Config) -> Self {
        Self {
            deadzone: config.deadzone,
            poll_interval: config.poll_interval(),
        }
    }
}

/// Counters collected over one run of the loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub cycles: u64,
    /// Reports decoded and applied
    pub reports: u64,
    pub short_reads: u64,
    pub read_errors: u64,
    /// Press and release events emitted while polling
    pub key_events: u64,
}

/// Releases all keys when dropped
struct ReleaseGuard<'a, S: KeySink> {
    engine: &'a KeyStateMachine<S>,
}

impl<S: KeySink> Drop for ReleaseGuard<'_, S> {
    fn drop(&mut self) {
        match self.engine.release_all() {
            Ok(0) => debug!("No keys held at shutdown"),
            Ok(n) => info!("Released {} held keys", n),
            Err(e) => error!("Failed to release all keys: {}", e),
        }
    }
}

/// Read one report and turn it into the desired intent set
pub fn read_intents<R: ReportSource + ?Sized>(
    source: &mut R,
    buf: &mut [u8],
    deadzone: f64,
) -> Result<IntentSet, Error> {
    let n = source.read_report(buf).map_err(Error::TransientRead)?;
    let report = ControllerReport::decode(&buf[..n.min(buf.len())])?;
    trace!("{:?}", report);
    Ok(IntentSet::from_report(&report, deadzone))
}

/// Run the polling loop until `shutdown` is cancelled
///
/// Read failures and short reads skip the cycle; they never end the loop.
/// All keys are released before this returns, including on unwind.
pub fn run<R, S>(
    source: &mut R,
    engine: &KeyStateMachine<S>,
    settings: &PollSettings,
    shutdown: &ShutdownToken,
) -> PollStats
where
    R: ReportSource + ?Sized,
    S: KeySink,
{
    let _guard = ReleaseGuard { engine };
    let mut buf = [0u8; READ_BUFFER_SIZE];
    let mut stats = PollStats::default();
    let mut failing = false;

    info!(
        "Polling {} every {:?}",
        source.device_info(),
        settings.poll_interval
    );

    while !shutdown.is_cancelled() {
        stats.cycles += 1;

        match read_intents(source, &mut buf, settings.deadzone) {
            Ok(intents) => {
                if failing {
                    info!("Controller reads recovered");
                    failing = false;
                }
                // The read may have blocked across a shutdown request
                if shutdown.is_cancelled() {
                    break;
                }
                stats.reports += 1;
                stats.key_events += engine.apply(&intents) as u64;
            }
            Err(Error::ShortRead(e)) => {
                stats.short_reads += 1;
                trace!("Skipping cycle: {}", e);
            }
            Err(e) => {
                stats.read_errors += 1;
                if failing {
                    debug!("{}", e);
                } else {
                    warn!("{}", e);
                    failing = true;
                }
            }
        }

        if !settings.poll_interval.is_zero() {
            thread::sleep(settings.poll_interval);
        }
    }

    info!(
        "Polling stopped after {} cycles ({} reports, {} read errors)",
        stats.cycles, stats.reports, stats.read_errors
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Input;
    use crate::keyboard::KeyboardError;
    use crate::keymap::{KeyMapping, Profile};
    use evdev::Key;
    use j2k_transport::{TransportDeviceInfo, TransportError};
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    enum Step {
        Bytes(Vec<u8>),
        Fail,
        /// Shutdown arrives while the read is blocked
        CancelThen(Vec<u8>),
        /// Claims more bytes than the buffer holds
        Overlong(Vec<u8>),
    }

    struct Script {
        steps: VecDeque<Step>,
        info: TransportDeviceInfo,
        shutdown: ShutdownToken,
    }

    impl Script {
        fn new(steps: Vec<Step>, shutdown: &ShutdownToken) -> Self {
            Self {
                steps: steps.into(),
                info: TransportDeviceInfo {
                    vid: 0x045E,
                    pid: 0x028E,
                    device_path: "script".into(),
                    serial: None,
                    product_name: None,
                    manufacturer: None,
                },
                shutdown: shutdown.clone(),
            }
        }
    }

    impl ReportSource for Script {
        fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
            match self.steps.pop_front() {
                Some(Step::Bytes(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(Step::Fail) => Err(TransportError::HidError("read failed".into())),
                Some(Step::CancelThen(bytes)) => {
                    self.shutdown.cancel();
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(Step::Overlong(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(buf.len() + 16)
                }
                None => {
                    self.shutdown.cancel();
                    Ok(0)
                }
            }
        }

        fn device_info(&self) -> &TransportDeviceInfo {
            &self.info
        }
    }

    #[derive(Clone, Default)]
    struct Counter {
        presses: Arc<AtomicUsize>,
        releases: Arc<AtomicUsize>,
    }

    impl Counter {
        fn totals(&self) -> (usize, usize) {
            (
                self.presses.load(Ordering::SeqCst),
                self.releases.load(Ordering::SeqCst),
            )
        }
    }

    impl KeySink for Counter {
        fn press(&mut self, _key: Key) -> Result<(), KeyboardError> {
            self.presses.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn release(&mut self, _key: Key) -> Result<(), KeyboardError> {
            self.releases.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn settings() -> PollSettings {
        PollSettings {
            poll_interval: Duration::ZERO,
            ..Default::default()
        }
    }

    fn engine_with(counter: Counter) -> KeyStateMachine<Counter> {
        KeyStateMachine::new(KeyMapping::for_profile(Profile::Full).unwrap(), counter)
    }

    fn engine() -> KeyStateMachine<Counter> {
        engine_with(Counter::default())
    }

    fn report_bytes(buttons: u16) -> Vec<u8> {
        ControllerReport {
            buttons,
            ..Default::default()
        }
        .encode()
        .to_vec()
    }

    fn report(buttons: u16) -> Step {
        Step::Bytes(report_bytes(buttons))
    }

    #[test]
    fn test_errors_and_short_reads_skip_cycle() {
        let shutdown = ShutdownToken::new();
        let mut source = Script::new(
            vec![
                Step::Fail,
                Step::Bytes(vec![0x01; 5]),
                report(0x0001),
                Step::Fail,
                report(0x0001),
            ],
            &shutdown,
        );
        let engine = engine();

        let stats = run(&mut source, &engine, &settings(), &shutdown);
        assert_eq!(stats.read_errors, 2);
        // the 5-byte read and the final 0-byte read
        assert_eq!(stats.short_reads, 2);
        assert_eq!(stats.reports, 2);
        assert_eq!(stats.key_events, 1);
        assert_eq!(engine.pressed_count(), 0);
    }

    #[test]
    fn test_keys_released_on_shutdown() {
        let shutdown = ShutdownToken::new();
        let mut source = Script::new(vec![report(0x00F0)], &shutdown);
        let engine = engine();

        let stats = run(&mut source, &engine, &settings(), &shutdown);
        assert_eq!(stats.key_events, 4);
        assert_eq!(engine.pressed_count(), 0);
    }

    #[test]
    fn test_cancelled_before_start() {
        let shutdown = ShutdownToken::new();
        shutdown.cancel();
        let mut source = Script::new(vec![report(0x0001)], &shutdown);
        let engine = engine();

        let stats = run(&mut source, &engine, &settings(), &shutdown);
        assert_eq!(stats, PollStats::default());
    }

    #[test]
    fn test_report_read_across_shutdown_not_applied() {
        let shutdown = ShutdownToken::new();
        let mut source = Script::new(vec![Step::CancelThen(report_bytes(0x0010))], &shutdown);
        let counter = Counter::default();
        let engine = engine_with(counter.clone());

        let stats = run(&mut source, &engine, &settings(), &shutdown);
        assert_eq!(stats.cycles, 1);
        assert_eq!(stats.reports, 0);
        assert_eq!(stats.key_events, 0);
        assert_eq!(counter.totals(), (0, 0));
    }

    #[test]
    fn test_read_intents_clamps_overlong_count() {
        let shutdown = ShutdownToken::new();
        let mut source = Script::new(vec![Step::Overlong(report_bytes(0x0001))], &shutdown);
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let intents = read_intents(&mut source, &mut buf, DEFAULT_DEADZONE).unwrap();
        assert_eq!(intents.pressed().collect::<Vec<_>>(), vec![Input::DpadUp]);
    }

    #[test]
    fn test_signal_handler_installs_once() {
        let shutdown = ShutdownToken::new();
        shutdown.install_signal_handler().unwrap();

        let err = ShutdownToken::new().install_signal_handler().unwrap_err();
        assert!(matches!(
            err,
            Error::SignalHandler(ctrlc::Error::MultipleHandlers)
        ));
        assert!(!shutdown.is_cancelled());
    }

    #[test]
    fn test_read_intents_short() {
        let shutdown = ShutdownToken::new();
        let mut source = Script::new(vec![Step::Bytes(vec![0; 13])], &shutdown);
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let err = read_intents(&mut source, &mut buf, DEFAULT_DEADZONE).unwrap_err();
        assert!(matches!(err, Error::ShortRead(_)));
    }

    #[test]
    fn test_settings_from_config() {
        let config = Config {
            deadzone: 0.3,
            poll_interval_ms: 8,
            ..Default::default()
        };
        let settings = PollSettings::from(&config);
        assert_eq!(settings.deadzone, 0.3);
        assert_eq!(settings.poll_interval, Duration::from_millis(8));
    }
}
