//! Runs one asynchronous operation behind a spinner.
//!
//! [`Fetch`] is a [`Model`] with a single in-flight invocation at a time. It
//! reports exactly one terminal [`Outcome`]: the operation's value, its error,
//! or a cancellation by the user. In polling mode every success schedules the
//! next invocation until the screen is dismissed.

use std::{fmt::Display, future::Future, time::Duration};

use crossterm::event::Event;
use futures::{future::BoxFuture, FutureExt};
use tracing::{debug, trace};

use super::{
    loader::{Loader, TICK_INTERVAL},
    program::{is_quit, key_press, Cmd, Mode, Model, Program, TerminalError},
    styles,
};

/// How long a success stays on screen before the loop ends
pub const SUCCESS_DISPLAY_DELAY: Duration = Duration::from_millis(300);

pub type OperationFuture<T, E> = BoxFuture<'static, Result<T, E>>;

/// A zero-argument asynchronous callable, invoked once per submission.
pub struct Operation<T, E> {
    call: Box<dyn FnMut() -> OperationFuture<T, E> + Send>,
}

impl<T, E> Operation<T, E> {
    pub fn new<F, Fut>(mut f: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            call: Box::new(move || f().boxed()),
        }
    }

    fn invoke(&mut self) -> OperationFuture<T, E> {
        (self.call)()
    }
}

#[derive(Debug)]
pub enum FetchState<T, E> {
    Idle,
    Submitting,
    Succeeded(T),
    Failed(E),
    Cancelled,
}

pub enum FetchMsg<T, E> {
    Submit,
    Tick,
    Completed(Result<T, E>),
    /// The success display delay has elapsed
    Finish,
    Input(Event),
}

impl<T, E> From<Event> for FetchMsg<T, E> {
    fn from(event: Event) -> Self {
        FetchMsg::Input(event)
    }
}

/// Terminal result of running a screen.
#[derive(Debug, PartialEq)]
pub enum Outcome<T, E> {
    Succeeded(T),
    Failed(E),
    Cancelled,
}

impl<T, E> Outcome<T, E> {
    /// `Ok(None)` stands for a cancellation.
    pub fn into_result(self) -> Result<Option<T>, E> {
        match self {
            Outcome::Succeeded(value) => Ok(Some(value)),
            Outcome::Failed(error) => Err(error),
            Outcome::Cancelled => Ok(None),
        }
    }
}

pub struct Fetch<T, E> {
    loader: Loader,
    operation: Operation<T, E>,
    state: FetchState<T, E>,
    polling: Option<Duration>,
    invocations: usize,
}

impl<T, E> Fetch<T, E> {
    pub fn new(label: impl Into<String>, operation: Operation<T, E>) -> Self {
        Self {
            loader: Loader::new(label),
            operation,
            state: FetchState::Idle,
            polling: None,
            invocations: 0,
        }
    }

    /// Re-invoke the operation `interval` after every success.
    pub fn polling(label: impl Into<String>, interval: Duration, operation: Operation<T, E>) -> Self {
        Self {
            polling: Some(interval),
            ..Self::new(label, operation)
        }
    }

    pub fn state(&self) -> &FetchState<T, E> {
        &self.state
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// Number of times the operation has been started.
    pub fn invocations(&self) -> usize {
        self.invocations
    }

    /// The value of the latest success, if the operation is not running.
    pub fn value(&self) -> Option<&T> {
        match &self.state {
            FetchState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_outcome(self) -> Outcome<T, E> {
        match self.state {
            FetchState::Succeeded(value) => Outcome::Succeeded(value),
            FetchState::Failed(error) => Outcome::Failed(error),
            FetchState::Idle | FetchState::Submitting | FetchState::Cancelled => Outcome::Cancelled,
        }
    }

    fn is_finished(&self) -> bool {
        match self.state {
            FetchState::Failed(_) | FetchState::Cancelled => true,
            FetchState::Succeeded(_) => self.polling.is_none(),
            FetchState::Idle | FetchState::Submitting => false,
        }
    }
}

impl<T, E> Fetch<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn submit(&mut self) -> Cmd<FetchMsg<T, E>> {
        match self.state {
            FetchState::Submitting => {
                trace!("Operation already in flight, ignoring submit");
                Cmd::None
            }
            FetchState::Failed(_) | FetchState::Cancelled => Cmd::None,
            FetchState::Idle | FetchState::Succeeded(_) => {
                self.state = FetchState::Submitting;
                self.invocations += 1;
                debug!("Starting '{}' (invocation {})", self.loader.label(), self.invocations);
                Cmd::spawn(self.operation.invoke().map(FetchMsg::Completed))
            }
        }
    }

    fn complete(&mut self, result: Result<T, E>) -> Cmd<FetchMsg<T, E>> {
        if matches!(self.state, FetchState::Cancelled) {
            trace!("Discarding a result that arrived after cancellation");
            return Cmd::None;
        }

        match result {
            Ok(value) => {
                self.state = FetchState::Succeeded(value);
                match self.polling {
                    Some(interval) => Cmd::After(interval, FetchMsg::Submit),
                    None => Cmd::After(SUCCESS_DISPLAY_DELAY, FetchMsg::Finish),
                }
            }
            Err(error) => {
                debug!("'{}' failed", self.loader.label());
                self.state = FetchState::Failed(error);
                Cmd::Quit
            }
        }
    }
}

impl<T, E> Model for Fetch<T, E>
where
    T: Send + 'static,
    E: Display + Send + 'static,
{
    type Msg = FetchMsg<T, E>;

    fn init(&mut self) -> Cmd<Self::Msg> {
        Cmd::batch([
            Cmd::After(TICK_INTERVAL, FetchMsg::Tick),
            Cmd::Emit(FetchMsg::Submit),
        ])
    }

    fn update(&mut self, msg: Self::Msg) -> Cmd<Self::Msg> {
        match msg {
            FetchMsg::Input(event) => match key_press(&event) {
                Some(key) if is_quit(key) && !self.is_finished() => {
                    debug!("'{}' cancelled", self.loader.label());
                    self.state = FetchState::Cancelled;
                    Cmd::Quit
                }
                _ => Cmd::None,
            },
            FetchMsg::Tick => {
                if self.is_finished() {
                    Cmd::None
                } else {
                    self.loader = self.loader.tick();
                    Cmd::After(TICK_INTERVAL, FetchMsg::Tick)
                }
            }
            FetchMsg::Submit => self.submit(),
            FetchMsg::Completed(result) => self.complete(result),
            FetchMsg::Finish => Cmd::Quit,
        }
    }

    fn view(&self) -> String {
        match &self.state {
            FetchState::Idle | FetchState::Cancelled => String::new(),
            FetchState::Submitting => self.loader.render(),
            FetchState::Succeeded(_) => styles::success("success!"),
            FetchState::Failed(error) => styles::error(&error.to_string()),
        }
    }
}

/// Run the operation and wait for its outcome.
pub async fn run_to_completion<T, E>(fetch: Fetch<T, E>, mode: Mode) -> Result<Outcome<T, E>, TerminalError>
where
    T: Send + 'static,
    E: Display + Send + 'static,
{
    Ok(Program::new(fetch).run_in(mode).await?.into_outcome())
}

/// Shorthand for running a one-shot operation behind a labelled spinner.
pub async fn run<T, E, F, Fut>(label: impl Into<String>, mode: Mode, f: F) -> Result<Outcome<T, E>, TerminalError>
where
    T: Send + 'static,
    E: Display + Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    run_to_completion(Fetch::new(label, Operation::new(f)), mode).await
}
