use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithm::Algorithm;
use crate::config::{validate_size, validate_speed, Settings};
use crate::element::{clear_flags, generate_elements, Element};
use crate::error::{ControlError, Interrupted};
use crate::instrument::{CancelToken, Event, Instrument, RunCounters, SpeedHandle, Snapshot};
use crate::sort::{driver_for, Driver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    /// Cancel requested, run thread not yet joined.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub phase: Phase,
    pub algorithm: Algorithm,
    pub size: usize,
    pub speed: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Interrupted,
    /// The driver panicked; the message is the panic payload when it was a string.
    Faulted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub outcome: Outcome,
    pub counters: RunCounters,
    pub frames: u64,
    pub elapsed: Duration,
}

struct ActiveRun {
    token: CancelToken,
    handle: JoinHandle<(Vec<Element>, RunReport)>,
    algorithm: Algorithm,
    // order handed to the run, adopted again if the thread itself dies
    fallback: Vec<Element>,
}

/// Owns the array between runs, the playback settings and at most one run.
pub struct Controller {
    settings: Settings,
    speed: SpeedHandle,
    rng: StdRng,
    elements: Vec<Element>,
    counters: RunCounters,
    phase: Phase,
    events: Sender<Event>,
    active: Option<ActiveRun>,
}

impl Controller {
    /// A controller plus the receiving end of its event stream.
    pub fn new(settings: Settings) -> Result<(Controller, Receiver<Event>), ControlError> {
        let (tx, rx) = unbounded();
        let controller = Controller::with_sender(settings, tx)?;
        Ok((controller, rx))
    }

    /// Publishes into a caller-provided channel, e.g. a bounded one for back-pressure.
    ///
    /// Controller-side state events never block: when the channel is full they are dropped.
    pub fn with_sender(settings: Settings, events: Sender<Event>) -> Result<Controller, ControlError> {
        settings.validate()?;
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let elements = generate_elements(&mut rng, settings.size);
        let mut controller = Controller {
            speed: SpeedHandle::new(settings.speed),
            settings,
            rng,
            elements,
            counters: RunCounters::default(),
            phase: Phase::Idle,
            events,
            active: None,
        };
        controller.publish_idle();
        controller.publish_state();
        Ok(controller)
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            is_playing: self.phase == Phase::Running,
            phase: self.phase,
            algorithm: self.settings.algorithm,
            size: self.settings.size,
            speed: self.speed.get(),
        }
    }

    /// The on-screen order as of the last reaped run or generation.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Replaces the array with `size` fresh elements. Idle only.
    pub fn generate(&mut self, size: usize) -> Result<(), ControlError> {
        self.ensure_idle("generate")?;
        let size = validate_size(size)?;
        self.settings.size = size;
        self.elements = generate_elements(&mut self.rng, size);
        self.counters = RunCounters::default();
        debug!("Generated {} elements", size);
        self.publish_idle();
        self.publish_state();
        Ok(())
    }

    /// `generate` at the current size.
    pub fn reset(&mut self) -> Result<(), ControlError> {
        self.generate(self.settings.size)
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> Result<(), ControlError> {
        self.ensure_idle("set_algorithm")?;
        self.settings.algorithm = algorithm;
        self.publish_state();
        Ok(())
    }

    /// Allowed at any time; a running sort picks it up at its next delay.
    pub fn set_speed(&mut self, speed: u8) -> Result<(), ControlError> {
        let speed = validate_speed(speed)?;
        self.speed.set(speed);
        self.settings.speed = speed;
        self.publish_state();
        Ok(())
    }

    /// Starts a run when idle, cancels the active one otherwise.
    ///
    /// A run that already ended on its own is reaped first, so this starts a new one.
    pub fn toggle_run(&mut self) -> Result<Option<RunReport>, ControlError> {
        self.poll();
        if self.active.is_some() {
            Ok(self.cancel())
        } else {
            self.start()?;
            Ok(None)
        }
    }

    /// Sorts a flag-cleared copy of the current order on a fresh run thread.
    pub fn start(&mut self) -> Result<(), ControlError> {
        self.ensure_idle("start")?;
        let algorithm = self.settings.algorithm;
        self.spawn_run(algorithm, driver_for(algorithm))
    }

    fn spawn_run(&mut self, algorithm: Algorithm, driver: Driver) -> Result<(), ControlError> {
        let mut working = self.elements.clone();
        clear_flags(&mut working);
        let fallback = working.clone();

        let token = CancelToken::new();
        let mut ins = Instrument::new(
            self.events.clone(),
            token.clone(),
            self.speed.clone(),
            self.settings.pacing,
        );

        let handle = thread::Builder::new()
            .name(format!("sortvis-{}", algorithm.key()))
            .spawn(move || {
                let start = Instant::now();
                let flow = panic::catch_unwind(AssertUnwindSafe(|| driver(working.as_mut_slice(), &mut ins)));
                let outcome = match flow {
                    Ok(Ok(())) => Outcome::Completed,
                    Ok(Err(Interrupted)) => Outcome::Interrupted,
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        error!("{} faulted after {} frames: {}", algorithm, ins.frames(), message);
                        Outcome::Faulted(message)
                    }
                };
                let report = RunReport {
                    algorithm,
                    outcome,
                    counters: ins.counters(),
                    frames: ins.frames(),
                    elapsed: start.elapsed(),
                };
                ins.deliver(Event::Finished(report.clone()));
                (working, report)
            })?;

        info!(
            "Starting {} on {} elements at speed {}",
            algorithm,
            self.elements.len(),
            self.speed.get()
        );
        self.counters = RunCounters::default();
        self.active = Some(ActiveRun {
            token,
            handle,
            algorithm,
            fallback,
        });
        self.phase = Phase::Running;
        self.publish_state();
        Ok(())
    }

    /// Stops the active run at its next checkpoint and adopts its partial order.
    ///
    /// Returns `None` when nothing was running. A run that already completed is
    /// reaped as it ended, without passing through `Interrupted`.
    pub fn cancel(&mut self) -> Option<RunReport> {
        if let Some(report) = self.poll() {
            return Some(report);
        }
        let run = self.active.take()?;
        run.token.cancel();
        self.phase = Phase::Interrupted;
        self.publish_state();
        Some(self.reap(run))
    }

    /// Reaps a run that ended on its own. Never blocks.
    pub fn poll(&mut self) -> Option<RunReport> {
        if !self.active.as_ref()?.handle.is_finished() {
            return None;
        }
        let run = self.active.take()?;
        Some(self.reap(run))
    }

    /// Blocks until the active run ends, then reaps it.
    pub fn wait(&mut self) -> Option<RunReport> {
        let run = self.active.take()?;
        Some(self.reap(run))
    }

    fn reap(&mut self, run: ActiveRun) -> RunReport {
        let report = match run.handle.join() {
            Ok((elements, report)) => {
                self.elements = elements;
                report
            }
            Err(payload) => {
                // the driver's panic is caught inside the thread, so this is unexpected
                let message = panic_message(payload.as_ref());
                error!("Run thread for {} died: {}", run.algorithm, message);
                self.elements = run.fallback;
                RunReport {
                    algorithm: run.algorithm,
                    outcome: Outcome::Faulted(message),
                    counters: RunCounters::default(),
                    frames: 0,
                    elapsed: Duration::ZERO,
                }
            }
        };

        self.counters = report.counters;
        self.phase = Phase::Idle;
        match &report.outcome {
            Outcome::Completed => info!(
                "{} done: {} comparisons, {} swaps, {} frames in {:?}",
                report.algorithm,
                report.counters.comparisons,
                report.counters.swaps,
                report.frames,
                report.elapsed
            ),
            Outcome::Interrupted => info!(
                "{} interrupted after {} comparisons, {} swaps",
                report.algorithm, report.counters.comparisons, report.counters.swaps
            ),
            Outcome::Faulted(_) => warn!("{} abandoned after a fault", report.algorithm),
        }
        self.publish_state();
        report
    }

    fn ensure_idle(&mut self, command: &str) -> Result<(), ControlError> {
        self.poll();
        if self.active.is_some() {
            warn!("Rejected {} while {} is running", command, self.settings.algorithm);
            return Err(ControlError::Busy);
        }
        Ok(())
    }

    fn publish_state(&self) {
        self.offer(Event::State(self.state()));
    }

    fn publish_idle(&self) {
        self.offer(Event::Snapshot(Snapshot {
            frame: 0,
            elements: self.elements.clone(),
            counters: self.counters,
        }));
    }

    // The controller's caller may be the one draining the channel, so never wait here.
    fn offer(&self, event: Event) {
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => debug!("Event channel full, dropped {} event", kind(&event)),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Some(run) = self.active.take() {
            run.token.cancel();
            let _ = run.handle.join();
        }
    }
}

fn kind(event: &Event) -> &'static str {
    match event {
        Event::Snapshot(_) => "snapshot",
        Event::State(_) => "state",
        Event::Finished(_) => "finished",
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
