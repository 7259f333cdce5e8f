//! Background search engine.
//!
//! The engine owns a worker thread that sleeps on a control channel until a
//! search is requested, then drives an [`AStarSearch`] to completion while
//! streaming its events to the consumer. Requests that arrive while a run is
//! in progress are folded into a single follow-up run. `stop` is permanent:
//! a stopped engine never searches again and has to be replaced.
//!
//! Events go to exactly one consumer: the receiver handed out by
//! [`SearchEngine::start`]. Dropping it stops the engine at the next send.

use crate::algorithms::a_star::AStarSearch;
use crate::error::EngineError;
use crate::events::SearchEvent;
use crate::grid::GridModel;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::{debug, error, info, trace};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Pause after every expanded cell so a renderer can keep up.
    /// Zero runs the search flat out.
    pub step_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EngineState {
    Idle = 0,
    Running = 1,
    Stopped = 2,
}

impl EngineState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => EngineState::Idle,
            1 => EngineState::Running,
            _ => EngineState::Stopped,
        }
    }
}

/// Lifecycle state shared between the engine handle and its worker.
#[derive(Debug)]
struct SharedState(AtomicU8);

impl SharedState {
    fn new() -> Self {
        SharedState(AtomicU8::new(EngineState::Idle as u8))
    }

    fn get(&self) -> EngineState {
        EngineState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Moves `from -> to`, failing if the state changed underneath (in
    /// practice: if the engine was stopped).
    fn transition(&self, from: EngineState, to: EngineState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn stop(&self) {
        self.0.store(EngineState::Stopped as u8, Ordering::Release);
    }

    fn is_stopped(&self) -> bool {
        self.get() == EngineState::Stopped
    }
}

enum Control {
    Search,
    Stop,
}

enum RunOutcome {
    Finished { rerun: bool },
    Stopped,
}

pub struct SearchEngine {
    state: Arc<SharedState>,
    control_tx: Sender<Control>,
    join: Option<JoinHandle<()>>,
}

impl SearchEngine {
    /// Validates the grid's endpoints and spawns the search worker.
    ///
    /// Returns the engine handle and the receiver carrying the progress and
    /// result events of every run, in emission order. The engine starts
    /// idle; nothing runs until [`request_search`].
    ///
    /// [`request_search`]: SearchEngine::request_search
    pub fn start(
        grid: Arc<GridModel>,
        config: EngineConfig,
    ) -> Result<(Self, Receiver<SearchEvent>), EngineError> {
        grid.check_endpoints()?;

        let state = Arc::new(SharedState::new());
        let (control_tx, control_rx) = crossbeam_channel::unbounded::<Control>();
        let (events_tx, events_rx) = crossbeam_channel::unbounded::<SearchEvent>();

        info!(
            "search engine starting on {}x{} grid, start {} goal {}",
            grid.width(),
            grid.height(),
            grid.start(),
            grid.goal()
        );

        let worker_state = Arc::clone(&state);
        let join = std::thread::Builder::new()
            .name("maze-search".to_string())
            .spawn(move || run_worker(grid, config, worker_state, control_rx, events_tx))?;

        let engine = SearchEngine {
            state,
            control_tx,
            join: Some(join),
        };
        Ok((engine, events_rx))
    }

    pub fn state(&self) -> EngineState {
        self.state.get()
    }

    /// Asks the worker to run a search. Never blocks; ignored once stopped.
    pub fn request_search(&self) {
        if self.state.is_stopped() {
            debug!("search request ignored, engine is stopped");
            return;
        }
        let _ = self.control_tx.send(Control::Search);
    }

    /// Stops the engine for good. A run in flight finishes its current
    /// expansion and is abandoned without a result event.
    pub fn stop(&self) {
        if !self.state.is_stopped() {
            debug!("stopping search engine");
        }
        self.state.stop();
        let _ = self.control_tx.send(Control::Stop);
    }

    /// Stops the engine and waits for the worker to exit.
    pub fn shutdown(mut self) {
        self.stop();
        self.join_worker();
    }

    fn join_worker(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for SearchEngine {
    fn drop(&mut self) {
        self.stop();
        self.join_worker();
    }
}

fn run_worker(
    grid: Arc<GridModel>,
    config: EngineConfig,
    state: Arc<SharedState>,
    control_rx: Receiver<Control>,
    events_tx: Sender<SearchEvent>,
) {
    'idle: while let Ok(control) = control_rx.recv() {
        if matches!(control, Control::Stop) {
            break;
        }
        if !state.transition(EngineState::Idle, EngineState::Running) {
            break;
        }

        let mut run = 0usize;
        loop {
            run += 1;
            match run_search(&grid, &config, &state, &control_rx, &events_tx) {
                RunOutcome::Finished { rerun: true } => {
                    debug!("search requested during run {run}, searching again");
                }
                RunOutcome::Finished { rerun: false } => {
                    if !state.transition(EngineState::Running, EngineState::Idle) {
                        break 'idle;
                    }
                    continue 'idle;
                }
                RunOutcome::Stopped => break 'idle,
            }
        }
    }

    state.stop();
    debug!("search worker exiting");
}

fn run_search(
    grid: &GridModel,
    config: &EngineConfig,
    state: &SharedState,
    control_rx: &Receiver<Control>,
    events_tx: &Sender<SearchEvent>,
) -> RunOutcome {
    let mut search = match AStarSearch::new(grid) {
        Ok(search) => search,
        Err(e) => {
            error!("cannot search: {}", e);
            return RunOutcome::Stopped;
        }
    };
    let mut rerun = false;

    loop {
        let events = search.step();
        let finished = events.last().is_some_and(SearchEvent::is_terminal) || events.is_empty();

        for event in events {
            if events_tx.send(event).is_err() {
                debug!("event receiver dropped, stopping search worker");
                return RunOutcome::Stopped;
            }
        }

        if finished {
            break;
        }
        if !wait_step(control_rx, config.step_delay, &mut rerun) || state.is_stopped() {
            trace!("search abandoned after {} expansions", search.counters().expanded);
            return RunOutcome::Stopped;
        }
    }

    if !wait_step(control_rx, Duration::ZERO, &mut rerun) || state.is_stopped() {
        return RunOutcome::Stopped;
    }
    RunOutcome::Finished { rerun }
}

/// Paces the run while draining control messages. Returns `false` when the
/// worker has to stop.
fn wait_step(control_rx: &Receiver<Control>, delay: Duration, rerun: &mut bool) -> bool {
    let deadline = Instant::now() + delay;
    loop {
        let control = if delay.is_zero() {
            match control_rx.try_recv() {
                Ok(control) => control,
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        } else {
            match control_rx.recv_deadline(deadline) {
                Ok(control) => control,
                Err(RecvTimeoutError::Timeout) => return true,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        };

        match control {
            Control::Search => *rerun = true,
            Control::Stop => return false,
        }
    }
}
