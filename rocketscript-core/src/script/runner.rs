//! Script runner state machine
//!
//! Holds an ordered queue of Functions and advances exactly one of them
//! per tick:
//!
//! ```text
//! Idle ──tick (queue non-empty)──► Running(i, false)
//! Running(i, false) ──tick: init, run──► Running(i, true)
//! Running(i, true)  ──tick: run, !finished──► Running(i, true)
//! Running(i, true)  ──tick: run, finished, stop──► Running(i+1, false) | Done
//! ```
//!
//! Activation happens on the same tick as the Idle transition, so the first
//! Function's `init` and first `run` land on the very first tick. Done is
//! terminal for the loaded queue; `reset` starts over.

use alloc::boxed::Box;
use heapless::Deque;

use super::function::Function;

/// Maximum queued entries per script
pub const MAX_SCRIPT_ENTRIES: usize = 16;

/// Errors that can occur queueing Functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScriptError {
    /// Queue already holds [`MAX_SCRIPT_ENTRIES`] entries
    QueueFull,
    /// The loaded queue has run to completion or was cancelled
    Finished,
}

/// Script runner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunnerState {
    /// Nothing has run yet
    Idle,
    /// Entry `index` is current; `initialized` once its `init` was called
    Running { index: usize, initialized: bool },
    /// Every entry has completed, or the script was cancelled
    Done,
}

/// Sequencer that runs queued Functions one at a time
pub struct ScriptRunner<'a> {
    /// Entries not yet activated, in execution order
    pending: Deque<Box<dyn Function + 'a>, MAX_SCRIPT_ENTRIES>,
    /// The activated entry, between `init` and `stop`
    active: Option<Box<dyn Function + 'a>>,
    state: RunnerState,
    /// Entries that reached `stop` through completion
    completed: usize,
}

impl<'a> ScriptRunner<'a> {
    /// Create an idle runner with an empty queue
    pub fn new() -> Self {
        Self {
            pending: Deque::new(),
            active: None,
            state: RunnerState::Idle,
            completed: 0,
        }
    }

    /// Get the current state
    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Check if the loaded queue is finished
    pub fn is_done(&self) -> bool {
        self.state == RunnerState::Done
    }

    /// Number of entries that completed normally
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Number of entries waiting to be activated
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Name of the activated Function, if any
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref().map(|f| f.name())
    }

    /// Queue a Function at the end of the script
    pub fn push<F: Function + 'a>(&mut self, function: F) -> Result<(), ScriptError> {
        self.push_boxed(Box::new(function))
    }

    /// Queue an already boxed Function at the end of the script
    pub fn push_boxed(&mut self, function: Box<dyn Function + 'a>) -> Result<(), ScriptError> {
        if self.state == RunnerState::Done {
            return Err(ScriptError::Finished);
        }
        self.pending
            .push_back(function)
            .map_err(|_| ScriptError::QueueFull)
    }

    /// Advance the script by one control tick
    pub fn tick(&mut self) {
        if self.state == RunnerState::Idle {
            if self.pending.is_empty() {
                return;
            }
            self.state = RunnerState::Running {
                index: 0,
                initialized: false,
            };
        }

        match self.state {
            RunnerState::Running {
                index,
                initialized: false,
            } => self.activate(index),
            RunnerState::Running {
                index,
                initialized: true,
            } => self.run_active(index),
            RunnerState::Idle | RunnerState::Done => {}
        }
    }

    /// Activate the next pending entry: init, then its first run
    fn activate(&mut self, index: usize) {
        let Some(mut function) = self.pending.pop_front() else {
            self.state = RunnerState::Done;
            return;
        };

        function.init();
        function.run();
        self.active = Some(function);
        self.state = RunnerState::Running {
            index,
            initialized: true,
        };
    }

    /// Run the active entry and retire it once finished
    fn run_active(&mut self, index: usize) {
        let Some(function) = self.active.as_mut() else {
            self.state = RunnerState::Done;
            return;
        };

        function.run();
        if !function.is_finished() {
            return;
        }

        function.stop();
        self.active = None;
        self.completed += 1;

        self.state = if self.pending.is_empty() {
            RunnerState::Done
        } else {
            RunnerState::Running {
                index: index + 1,
                initialized: false,
            }
        };
    }

    /// Abandon the script
    ///
    /// Stops the active Function immediately regardless of `is_finished`,
    /// drops every pending entry and moves to Done.
    pub fn cancel(&mut self) {
        if let Some(mut function) = self.active.take() {
            function.stop();
        }
        self.pending.clear();
        self.state = RunnerState::Done;
    }

    /// Cancel and return to Idle so a new script can be queued
    pub fn reset(&mut self) {
        self.cancel();
        self.completed = 0;
        self.state = RunnerState::Idle;
    }
}

impl Default for ScriptRunner<'_> {
    fn default() -> Self {
        Self::new()
    }
}
