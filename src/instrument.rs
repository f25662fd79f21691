use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{bounded, select, Receiver, Sender, TrySendError};
use log::debug;

use crate::config::{step_delay_ms, Pacing, SETTLE_DELAY_MS};
use crate::controller::{PlaybackState, RunReport};
use crate::element::Element;
use crate::error::Interrupted;

/// Result of every driver step: `Err(Interrupted)` unwinds the whole run.
pub type Flow<T = ()> = Result<T, Interrupted>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunCounters {
    pub comparisons: u64,
    pub swaps: u64,
}

/// Full copy of the array and counters at one publish point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Publish index within the run; 0 for arrays published outside a run.
    pub frame: u64,
    pub elements: Vec<Element>,
    pub counters: RunCounters,
}

impl Snapshot {
    pub fn values(&self) -> Vec<u32> {
        self.elements.iter().map(|el| el.value).collect()
    }

    pub fn is_sorted(&self) -> bool {
        self.elements.windows(2).all(|w| w[0].value <= w[1].value)
    }

    pub fn is_settled(&self) -> bool {
        self.elements.iter().all(Element::is_settled)
    }
}

/// Everything the rendering side observes.
#[derive(Debug, Clone)]
pub enum Event {
    Snapshot(Snapshot),
    State(PlaybackState),
    Finished(RunReport),
}

#[derive(Debug)]
struct TokenInner {
    cancelled: AtomicBool,
    // Dropping the sender disconnects `wake`, releasing every blocked select.
    trigger: Mutex<Option<Sender<()>>>,
    wake: Receiver<()>,
}

/// Cooperative cancellation shared between the controller and one run.
#[derive(Debug, Clone)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (trigger, wake) = bounded(0);
        CancelToken {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                wake,
            }),
        }
    }

    /// Idempotent; safe from any thread.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut trigger = self
            .inner
            .trigger
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        trigger.take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Sleeps for `duration` unless cancelled first. Returns false if cancelled.
    pub fn sleep(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return false;
        }
        select! {
            recv(self.inner.wake) -> _ => false,
            default(duration) => !self.is_cancelled(),
        }
    }

    fn wake(&self) -> &Receiver<()> {
        &self.inner.wake
    }
}

/// Speed setting shared between the controller and the active run.
#[derive(Debug, Clone)]
pub struct SpeedHandle(Arc<AtomicU8>);

impl SpeedHandle {
    pub fn new(speed: u8) -> Self {
        SpeedHandle(Arc::new(AtomicU8::new(speed)))
    }

    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, speed: u8) {
        self.0.store(speed, Ordering::Relaxed);
    }
}

/// What a driver reports through: snapshots, counters, pacing and liveness.
pub struct Instrument {
    events: Sender<Event>,
    token: CancelToken,
    speed: SpeedHandle,
    pacing: Pacing,
    counters: RunCounters,
    frame: u64,
    detached: bool,
}

impl Instrument {
    pub fn new(events: Sender<Event>, token: CancelToken, speed: SpeedHandle, pacing: Pacing) -> Self {
        Instrument {
            events,
            token,
            speed,
            pacing,
            counters: RunCounters::default(),
            frame: 0,
            detached: false,
        }
    }

    /// Sends a full copy of `arr` with the current counters.
    ///
    /// A gone receiver is tolerated, the run simply continues unobserved.
    /// A full bounded channel blocks until there is room or the run is cancelled.
    pub fn publish(&mut self, arr: &[Element]) {
        self.frame += 1;
        let event = Event::Snapshot(Snapshot {
            frame: self.frame,
            elements: arr.to_vec(),
            counters: self.counters,
        });
        self.deliver(event);
    }

    /// Sends `event`, waiting for room only while the run is live.
    ///
    /// Returns false if the event was dropped.
    pub fn deliver(&mut self, event: Event) -> bool {
        if self.detached {
            return false;
        }
        let event = match self.events.try_send(event) {
            Ok(()) => return true,
            Err(TrySendError::Disconnected(_)) => {
                debug!("Event receiver gone at frame {}, running unobserved", self.frame);
                self.detached = true;
                return false;
            }
            Err(TrySendError::Full(event)) => event,
        };
        select! {
            send(self.events, event) -> res => {
                if res.is_err() {
                    debug!("Event receiver gone at frame {}, running unobserved", self.frame);
                    self.detached = true;
                }
                res.is_ok()
            },
            recv(self.token.wake()) -> _ => {
                debug!("Dropped event at frame {}: channel full after cancel", self.frame);
                false
            },
        }
    }

    pub fn should_continue(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// `should_continue` as a `Flow`, for use with `?` before irreversible work.
    pub fn checkpoint(&self) -> Flow {
        if self.should_continue() {
            Ok(())
        } else {
            Err(Interrupted)
        }
    }

    /// Per-comparison pause derived from the current speed.
    pub fn step_delay(&self) {
        self.delay(step_delay_ms(self.speed.get()));
    }

    /// Fixed short pause for transitional frames.
    pub fn settle_delay(&self) {
        self.delay(SETTLE_DELAY_MS);
    }

    fn delay(&self, ms: u64) {
        if self.pacing == Pacing::Immediate {
            return;
        }
        self.token.sleep(Duration::from_millis(ms));
    }

    pub fn compare(&mut self) {
        self.counters.comparisons += 1;
    }

    pub fn swap(&mut self) {
        self.counters.swaps += 1;
    }

    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    /// Number of publishes so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }
}
