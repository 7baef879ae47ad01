#![forbid(unsafe_code)]

//! Elm-style runtime for host-driven applications.
//!
//! The runtime never blocks and never performs I/O. The host pushes messages
//! in, calls [`Program::step`], executes the [`Effect`]s that come out, and
//! pushes the completions back in as messages.
//!
//! # Ordering
//!
//! One host message is processed at a time. Follow-up messages returned as
//! [`Cmd::Msg`] are processed before the next host message is accepted, so a
//! message and everything it causes form one atomic step from the host's
//! point of view.
//!
//! # Example
//!
//! ```
//! use kartan_runtime::program::{Cmd, Model, Program};
//!
//! struct Counter {
//!     count: i32,
//! }
//!
//! enum Msg {
//!     Increment,
//!     Twice,
//! }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!     type View = i32;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Increment => {
//!                 self.count += 1;
//!                 Cmd::none()
//!             }
//!             Msg::Twice => Cmd::sequence(vec![Cmd::msg(Msg::Increment), Cmd::msg(Msg::Increment)]),
//!         }
//!     }
//!
//!     fn view(&self) -> i32 {
//!         self.count
//!     }
//! }
//!
//! let mut program = Program::new(Counter { count: 0 });
//! program.push(Msg::Twice);
//! program.step();
//! assert_eq!(program.view(), 2);
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use tracing::debug;

use crate::effect::Effect;

/// Application state and behavior.
pub trait Model: Sized {
    /// Messages that drive state transitions.
    type Message;

    /// Read-only snapshot handed to the host.
    type View;

    /// Called once before the first message. Return startup effects such as
    /// the initial data fetch.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// The state transition function.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Snapshot of the current state.
    fn view(&self) -> Self::View;
}

/// Work requested by `init()` or `update()`.
#[derive(Debug)]
pub enum Cmd<M> {
    /// No operation.
    None,
    /// Run commands; order is preserved.
    Batch(Vec<Cmd<M>>),
    /// Run commands strictly in order.
    Sequence(Vec<Cmd<M>>),
    /// Feed a message back into the model before the next host message.
    Msg(M),
    /// Hand an effect to the host.
    Effect(Effect),
    /// Ask the host to step again after a delay (toast expiry and similar).
    Tick(Duration),
    /// Diagnostic line, emitted through `tracing`.
    Log(String),
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn effect(effect: Effect) -> Self {
        Self::Effect(effect)
    }

    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    #[inline]
    pub fn tick(duration: Duration) -> Self {
        Self::Tick(duration)
    }

    /// Create a batch of commands, collapsing trivial batches.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Create a sequence of commands, collapsing trivial sequences.
    pub fn sequence(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Sequence(cmds),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Human-readable kind label for tracing.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Batch(_) => "Batch",
            Self::Sequence(_) => "Sequence",
            Self::Msg(_) => "Msg",
            Self::Effect(_) => "Effect",
            Self::Tick(_) => "Tick",
            Self::Log(_) => "Log",
        }
    }

    /// Number of leaf commands in the tree.
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Batch(cmds) | Self::Sequence(cmds) => cmds.iter().map(Cmd::count).sum(),
            _ => 1,
        }
    }
}

impl<M> Default for Cmd<M> {
    fn default() -> Self {
        Self::None
    }
}

/// Outcome of one [`Program::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// Host messages consumed.
    pub host_messages: usize,
    /// Messages processed including follow-ups.
    pub processed: usize,
    /// Effects queued for the host during this step.
    pub effects: usize,
    /// Shortest tick requested during this step.
    pub tick: Option<Duration>,
}

/// Host-driven program runtime.
pub struct Program<M: Model> {
    model: M,
    inbox: VecDeque<M::Message>,
    effects: Vec<Effect>,
    initialized: bool,
    steps: u64,
}

impl<M: Model> Program<M> {
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            inbox: VecDeque::new(),
            effects: Vec::new(),
            initialized: false,
            steps: 0,
        }
    }

    /// Run `Model::init` once. Later calls do nothing.
    pub fn init(&mut self) -> StepResult {
        if self.initialized {
            return StepResult::default();
        }
        self.initialized = true;
        let cmd = self.model.init();
        let mut result = StepResult::default();
        self.run(cmd, &mut result);
        result
    }

    /// Queue a host message for the next step.
    pub fn push(&mut self, msg: M::Message) {
        self.inbox.push_back(msg);
    }

    /// Process every queued host message. Initializes the model first if
    /// that has not happened yet.
    pub fn step(&mut self) -> StepResult {
        let mut result = self.init();
        while let Some(msg) = self.inbox.pop_front() {
            result.host_messages += 1;
            let cmd = self.dispatch(msg, &mut result);
            self.run(cmd, &mut result);
        }
        self.steps += 1;
        debug!(
            target: "kartan.app",
            step = self.steps,
            host_messages = result.host_messages,
            processed = result.processed,
            effects = result.effects,
            "step"
        );
        result
    }

    /// Push one message and step.
    pub fn send(&mut self, msg: M::Message) -> StepResult {
        self.push(msg);
        self.step()
    }

    /// Take the effects produced so far.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    #[inline]
    pub fn pending_effects(&self) -> &[Effect] {
        &self.effects
    }

    #[inline]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[inline]
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn view(&self) -> M::View {
        self.model.view()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn dispatch(&mut self, msg: M::Message, result: &mut StepResult) -> Cmd<M::Message> {
        result.processed += 1;
        self.model.update(msg)
    }

    /// Execute a command tree depth-first. Follow-up messages run to
    /// completion before the caller continues.
    fn run(&mut self, cmd: Cmd<M::Message>, result: &mut StepResult) {
        let mut stack = vec![cmd];
        while let Some(cmd) = stack.pop() {
            match cmd {
                Cmd::None => {}
                Cmd::Batch(cmds) | Cmd::Sequence(cmds) => {
                    stack.extend(cmds.into_iter().rev());
                }
                Cmd::Msg(msg) => {
                    let next = self.dispatch(msg, result);
                    stack.push(next);
                }
                Cmd::Effect(effect) => {
                    debug!(target: "kartan.app", effect = effect.kind(), "effect queued");
                    result.effects += 1;
                    self.effects.push(effect);
                }
                Cmd::Tick(duration) => {
                    result.tick = Some(result.tick.map_or(duration, |t| t.min(duration)));
                }
                Cmd::Log(line) => {
                    debug!(target: "kartan.app", "{line}");
                }
            }
        }
    }
}
