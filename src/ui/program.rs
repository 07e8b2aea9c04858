//! Cooperative event loop that drives a single interactive screen.
//!
//! A screen is a [`Model`]: it receives messages, answers each one with a [`Cmd`]
//! describing follow-up work, and renders itself to a string. The [`Program`]
//! owns the loop. Commands are executed on a [`JoinSet`], so every timer and
//! background operation belongs to the screen that started it and is aborted
//! when the screen goes away.

use std::{
    collections::VecDeque,
    fmt,
    future::Future,
    io::{self, IsTerminal, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
    time::Duration,
};

use crossterm::{
    cursor,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::{future::BoxFuture, FutureExt, Stream, StreamExt};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, trace};

/// Error types that can occur while driving the terminal
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Follow-up work requested by a model in response to a message.
pub enum Cmd<M> {
    /// Nothing to do
    None,
    /// End the event loop after this update
    Quit,
    /// Deliver a message before any further external event
    Emit(M),
    /// Deliver a message once the delay has elapsed
    After(Duration, M),
    /// Run a future in the background and deliver its output
    Spawn(BoxFuture<'static, M>),
    /// Several commands at once
    Batch(Vec<Cmd<M>>),
}

impl<M: Send + 'static> Cmd<M> {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = M> + Send + 'static,
    {
        Cmd::Spawn(future.boxed())
    }

    pub fn batch(cmds: impl IntoIterator<Item = Cmd<M>>) -> Self {
        Cmd::Batch(cmds.into_iter().collect())
    }

    /// Lift a command of an embedded model into the message type of its host.
    pub fn map<N: Send + 'static>(self, f: fn(M) -> N) -> Cmd<N> {
        match self {
            Cmd::None => Cmd::None,
            Cmd::Quit => Cmd::Quit,
            Cmd::Emit(msg) => Cmd::Emit(f(msg)),
            Cmd::After(delay, msg) => Cmd::After(delay, f(msg)),
            Cmd::Spawn(future) => Cmd::Spawn(future.map(f).boxed()),
            Cmd::Batch(cmds) => Cmd::Batch(cmds.into_iter().map(|cmd| cmd.map(f)).collect()),
        }
    }

    /// Whether running this command ends the event loop.
    pub fn quits(&self) -> bool {
        match self {
            Cmd::Quit => true,
            Cmd::Batch(cmds) => cmds.iter().any(Cmd::quits),
            _ => false,
        }
    }
}

impl<M> fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cmd::None => write!(f, "None"),
            Cmd::Quit => write!(f, "Quit"),
            Cmd::Emit(_) => write!(f, "Emit(..)"),
            Cmd::After(delay, _) => write!(f, "After({:?}, ..)", delay),
            Cmd::Spawn(_) => write!(f, "Spawn(..)"),
            Cmd::Batch(cmds) => f.debug_list().entries(cmds).finish(),
        }
    }
}

/// A screen driven by [`Program`].
///
/// Terminal events reach the model through `From<Event>` on its message type,
/// everything else arrives as the output of a [`Cmd`].
pub trait Model {
    type Msg: From<Event> + Send + 'static;

    fn init(&mut self) -> Cmd<Self::Msg>;

    fn update(&mut self, msg: Self::Msg) -> Cmd<Self::Msg>;

    fn view(&self) -> String;
}

/// Returns the key of a key press event, ignoring repeats and releases.
pub fn key_press(event: &Event) -> Option<&KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}

pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// `q`, `Esc` or `Ctrl+C`
pub fn is_quit(key: &KeyEvent) -> bool {
    is_interrupt(key) || matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
}

/// Where a screen runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// On the controlling terminal when there is one
    #[default]
    Auto,
    /// Without input and without drawing
    Headless,
}

impl Mode {
    /// Whether screens run in this mode can read keys from the user.
    pub fn is_interactive(self) -> bool {
        self == Mode::Auto && io::stdin().is_terminal() && io::stderr().is_terminal()
    }
}

pub struct Program<M: Model> {
    model: M,
    alt_screen: bool,
    width: Option<u16>,
}

impl<M: Model> Program<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            alt_screen: false,
            width: None,
        }
    }

    /// Wrap lines at `columns` when working out how far to move up on redraw.
    pub fn with_width(mut self, columns: u16) -> Self {
        self.width = Some(columns);
        self
    }

    /// Render into the alternate screen instead of inline.
    pub fn with_alt_screen(mut self) -> Self {
        self.alt_screen = true;
        self
    }

    /// Run the screen on the controlling terminal and return the final model.
    ///
    /// The screen is drawn on stderr so that command output on stdout stays
    /// clean. Without a terminal the loop still runs, without keyboard input
    /// and without drawing.
    pub async fn run(self) -> Result<M, TerminalError> {
        self.run_in(Mode::Auto).await
    }

    pub async fn run_in(mut self, mode: Mode) -> Result<M, TerminalError> {
        if !mode.is_interactive() {
            debug!("No interactive terminal attached, running the screen headless");
            return self.run_with(futures::stream::empty(), io::sink()).await;
        }

        let _guard = TerminalGuard::enter(self.alt_screen)?;
        if self.width.is_none() {
            self.width = terminal::size().ok().map(|(columns, _)| columns);
        }
        self.run_with(EventStream::new(), io::stderr()).await
    }

    /// Run the screen against an arbitrary event source and output sink.
    pub async fn run_with<S, W>(self, mut input: S, output: W) -> Result<M, TerminalError>
    where
        S: Stream<Item = io::Result<Event>> + Unpin,
        W: Write,
    {
        let Program { mut model, width, .. } = self;
        let mut renderer = Renderer::new(output, width);
        let mut runtime = Runtime::new();
        let mut input_open = true;

        let mut running = runtime.schedule(model.init());
        renderer.draw(&model.view())?;

        while running {
            let msg = match runtime.queue.pop_front() {
                Some(msg) => msg,
                None => tokio::select! {
                    event = input.next(), if input_open => match event {
                        Some(event) => {
                            let event = event?;
                            if let Event::Resize(columns, _) = event {
                                renderer.resize(columns);
                            }
                            M::Msg::from(event)
                        }
                        None => {
                            trace!("Input stream closed");
                            input_open = false;
                            continue;
                        }
                    },
                    joined = runtime.tasks.join_next(), if !runtime.tasks.is_empty() => match joined {
                        Some(Ok(msg)) => msg,
                        Some(Err(e)) if e.is_cancelled() => continue,
                        Some(Err(e)) => return Err(e.into()),
                        None => continue,
                    },
                    else => {
                        debug!("Nothing left to wait for, leaving the event loop");
                        break;
                    }
                },
            };

            running = runtime.schedule(model.update(msg));
            renderer.draw(&model.view())?;
        }

        let outstanding = runtime.tasks.len();
        if outstanding > 0 {
            trace!("Aborting {} outstanding task(s)", outstanding);
        }
        runtime.tasks.abort_all();
        renderer.finish()?;

        Ok(model)
    }
}

struct Runtime<Msg> {
    tasks: JoinSet<Msg>,
    queue: VecDeque<Msg>,
}

impl<Msg: Send + 'static> Runtime<Msg> {
    fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            queue: VecDeque::new(),
        }
    }

    /// Returns `false` once the command asks to quit.
    fn schedule(&mut self, cmd: Cmd<Msg>) -> bool {
        match cmd {
            Cmd::None => true,
            Cmd::Quit => false,
            Cmd::Emit(msg) => {
                self.queue.push_back(msg);
                true
            }
            Cmd::After(delay, msg) => {
                self.tasks.spawn(async move {
                    tokio::time::sleep(delay).await;
                    msg
                });
                true
            }
            Cmd::Spawn(future) => {
                self.tasks.spawn(future);
                true
            }
            Cmd::Batch(cmds) => cmds
                .into_iter()
                .fold(true, |running, cmd| self.schedule(cmd) && running),
        }
    }
}

/// Columns a line takes on screen, ignoring ANSI escape sequences.
fn visible_width(line: &str) -> usize {
    let mut width = 0;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // CSI sequences end with a letter
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

/// Redraws a multi-line view in place.
struct Renderer<W: Write> {
    out: W,
    width: Option<u16>,
    height: u16,
    last_view: String,
}

impl<W: Write> Renderer<W> {
    fn new(out: W, width: Option<u16>) -> Self {
        Self {
            out,
            width,
            height: 0,
            last_view: String::new(),
        }
    }

    /// Terminal rows below the first one that `view` occupies.
    fn rows_below(&self, view: &str) -> u16 {
        let rows: usize = view
            .trim_end_matches('\n')
            .split('\n')
            .map(|line| match self.width {
                Some(columns) if columns > 0 => visible_width(line).div_ceil(usize::from(columns)).max(1),
                _ => 1,
            })
            .sum();
        u16::try_from(rows.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    /// The previous frame has reflowed to the new width.
    fn resize(&mut self, columns: u16) {
        self.width = Some(columns);
        self.height = self.rows_below(&self.last_view);
    }

    fn draw(&mut self, view: &str) -> io::Result<()> {
        if self.height > 0 {
            queue!(self.out, cursor::MoveToPreviousLine(self.height))?;
        }
        queue!(self.out, cursor::MoveToColumn(0), Clear(ClearType::FromCursorDown))?;

        let lines: Vec<&str> = view.trim_end_matches('\n').split('\n').collect();
        // raw mode does not translate line feeds
        write!(self.out, "{}", lines.join("\r\n"))?;

        self.height = self.rows_below(view);
        self.last_view = view.to_string();
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        if !self.last_view.trim().is_empty() {
            write!(self.out, "\r\n")?;
        }
        self.out.flush()
    }
}

static SCREEN_ACTIVE: AtomicBool = AtomicBool::new(false);
static HELD_LOGS: Mutex<Vec<u8>> = Mutex::new(Vec::new());

/// Log sink for stderr that holds lines back while a screen owns the terminal.
///
/// Held lines are written once the screen is left, so they never land in the
/// middle of a frame that is about to be redrawn.
#[derive(Debug, Default)]
pub struct LogWriter;

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if SCREEN_ACTIVE.load(Ordering::SeqCst) {
            let mut held = HELD_LOGS
                .lock()
                .map_err(|_| io::Error::other("held log buffer poisoned"))?;
            held.extend_from_slice(buf);
            return Ok(buf.len());
        }
        io::stderr().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

fn release_held_logs() {
    if let Ok(mut held) = HELD_LOGS.lock() {
        if !held.is_empty() {
            let mut err = io::stderr();
            let _ = err.write_all(&held);
            let _ = err.flush();
            held.clear();
        }
    }
}

/// Raw mode (and optionally the alternate screen) for as long as it lives.
struct TerminalGuard {
    alt_screen: bool,
}

impl TerminalGuard {
    fn enter(alt_screen: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        SCREEN_ACTIVE.store(true, Ordering::SeqCst);
        let mut err = io::stderr();
        if alt_screen {
            execute!(err, EnterAlternateScreen, cursor::MoveTo(0, 0))?;
        }
        execute!(err, cursor::Hide)?;
        Ok(Self { alt_screen })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut err = io::stderr();
        if self.alt_screen {
            let _ = execute!(err, LeaveAlternateScreen);
        }
        let _ = execute!(err, cursor::Show);
        let _ = terminal::disable_raw_mode();
        SCREEN_ACTIVE.store(false, Ordering::SeqCst);
        release_held_logs();
    }
}
