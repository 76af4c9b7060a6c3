//! Background search thread. The game loop hands over a deep clone of its
//! state and polls for the answer; one request is in flight at a time.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use stacker_core::Input;
use stacker_engine::BoardState;
use stacker_eval::Evaluator;
use tracing::{debug, warn};

use crate::engine::{Decision, SearchEngine};

/// Alternative move source tried before the search, e.g. a perfect-clear
/// solver. `None` means it has nothing for this state.
pub trait AltSolver: Send {
    fn solve(&mut self, state: &BoardState) -> Option<Vec<Input>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Search(Decision),
    Solver(Vec<Input>),
    /// Nothing was evaluated in time; the caller has to fall back
    Skip,
}

impl Plan {
    pub fn inputs(&self) -> &[Input] {
        match self {
            Plan::Search(decision) => decision.inputs.as_slice(),
            Plan::Solver(inputs) => inputs.as_slice(),
            Plan::Skip => &[],
        }
    }
}

pub struct SearchWorker {
    requests: Option<Sender<BoardState>>,
    responses: Receiver<Plan>,
    handle: Option<JoinHandle<()>>,
    pending: bool,
}

impl SearchWorker {
    pub fn spawn<E>(engine: SearchEngine<E>) -> io::Result<Self>
    where
        E: Evaluator + Send + 'static,
    {
        Self::spawn_with(engine, None)
    }

    pub fn spawn_with<E>(
        mut engine: SearchEngine<E>,
        mut solver: Option<Box<dyn AltSolver>>,
    ) -> io::Result<Self>
    where
        E: Evaluator + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<BoardState>();
        let (response_tx, response_rx) = mpsc::channel::<Plan>();

        let handle = thread::Builder::new()
            .name("stacker-search".into())
            .spawn(move || {
                while let Ok(state) = request_rx.recv() {
                    let solved = solver.as_mut().and_then(|s| s.solve(&state));
                    let plan = match solved {
                        Some(inputs) => {
                            debug!(inputs = inputs.len(), "solver answered");
                            Plan::Solver(inputs)
                        }
                        None => engine.decide(&state).map_or(Plan::Skip, Plan::Search),
                    };
                    if response_tx.send(plan).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            handle: Some(handle),
            pending: false,
        })
    }

    /// Queue a decision for `state`; false while one is still in flight
    /// or after the thread has gone away
    pub fn request(&mut self, state: &BoardState) -> bool {
        if self.pending {
            return false;
        }
        let Some(requests) = &self.requests else {
            return false;
        };
        if requests.send(state.clone()).is_err() {
            warn!("search thread is gone");
            return false;
        }
        self.pending = true;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The finished plan, if the in-flight decision is done
    pub fn try_take(&mut self) -> Option<Plan> {
        if !self.pending {
            return None;
        }
        match self.responses.try_recv() {
            Ok(plan) => {
                self.pending = false;
                Some(plan)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.pending = false;
                None
            }
        }
    }

    /// Block until the in-flight decision is done
    pub fn wait(&mut self) -> Option<Plan> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        self.responses.recv().ok()
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        // closing the request channel ends the thread's loop
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("search thread panicked");
            }
        }
    }
}
