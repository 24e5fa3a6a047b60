use crate::command::{Action, Command, CommandInner};
use crate::event::TerminalEvent;
use crate::model::Model;
use crossterm::cursor;
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, EventStream,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Failure driving the terminal.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// Terminal setup, drawing, input or teardown failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Runtime configuration for a [`Program`].
///
/// Override only what you need with struct update syntax:
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     mouse_capture: true,
///     log_file: Some("taro.log".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Redraw rate in frames per second, clamped to 1..=120 (default: 60).
    pub fps: u32,
    /// Draw on the alternate screen (default: true).
    pub alt_screen: bool,
    /// Report mouse clicks, moves and scrolling (default: false).
    pub mouse_capture: bool,
    /// Report terminal focus gained / lost (default: true).
    pub focus_events: bool,
    /// Restore the terminal before the panic message prints (default: true).
    pub catch_panics: bool,
    /// Stop on Ctrl+C delivered as a signal (default: true).
    pub handle_signals: bool,
    /// Where the application should send its logs, since stdout belongs to
    /// the UI. Open it with [`log_to_file`].
    pub log_file: Option<PathBuf>,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse_capture: false,
            focus_events: true,
            catch_panics: true,
            handle_signals: true,
            log_file: None,
        }
    }
}

/// Terminal modes a session switches on, and must switch off again.
#[derive(Debug, Clone, Copy)]
struct Modes {
    alt_screen: bool,
    mouse_capture: bool,
    focus_events: bool,
}

impl Modes {
    fn from_options(options: &ProgramOptions) -> Self {
        Self {
            alt_screen: options.alt_screen,
            mouse_capture: options.mouse_capture,
            focus_events: options.focus_events,
        }
    }

    fn enter(self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut out = stdout();
        if self.alt_screen {
            execute!(out, EnterAlternateScreen)?;
        }
        if self.mouse_capture {
            execute!(out, EnableMouseCapture)?;
        }
        if self.focus_events {
            execute!(out, EnableFocusChange)?;
        }
        execute!(out, cursor::Hide)
    }

    /// Undo [`enter`](Modes::enter). Every step runs even if an earlier one
    /// fails; only the raw-mode result is reported.
    fn leave(self) -> io::Result<()> {
        let raw = disable_raw_mode();
        let mut out = stdout();
        if self.focus_events {
            execute!(out, DisableFocusChange).ok();
        }
        if self.mouse_capture {
            execute!(out, DisableMouseCapture).ok();
        }
        execute!(out, cursor::Show).ok();
        if self.alt_screen {
            execute!(out, LeaveAlternateScreen).ok();
        }
        raw
    }
}

/// The terminal in UI mode. Dropping it restores the terminal.
struct Session {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    modes: Modes,
    closed: bool,
}

impl Session {
    fn open(options: &ProgramOptions) -> Result<Self, ProgramError> {
        let modes = Modes::from_options(options);
        if options.catch_panics {
            install_panic_hook(modes);
        }
        modes.enter()?;
        let terminal = match Terminal::new(CrosstermBackend::new(stdout())) {
            Ok(terminal) => terminal,
            Err(err) => {
                modes.leave().ok();
                return Err(err.into());
            }
        };
        Ok(Self {
            terminal,
            modes,
            closed: false,
        })
    }

    fn draw<M: Model>(&mut self, model: &M) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| model.view(frame))?;
        Ok(())
    }

    fn close(mut self) -> Result<(), ProgramError> {
        self.closed = true;
        self.modes.leave()?;
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            self.modes.leave().ok();
        }
    }
}

/// Installed once per process; later programs reuse the first hook.
fn install_panic_hook(modes: Modes) {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            modes.leave().ok();
            previous(info);
        }));
    });
}

/// Drives a [`Model`] against the real terminal.
///
/// Messages are processed one at a time in arrival order. Immediate
/// messages from a [`Command`] re-enter the same queue as everything else,
/// and futures are spawned on the tokio runtime, so their results arrive on
/// a later turn of the loop.
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), taro_core::ProgramError> {
///     let app = taro_core::Program::<MyApp>::new(())?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    session: Session,
    tx: mpsc::UnboundedSender<M::Message>,
    rx: mpsc::UnboundedReceiver<M::Message>,
    options: ProgramOptions,
    dirty: bool,
    quit: bool,
}

impl<M: Model> Program<M> {
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Initialize the model and put the terminal into UI mode.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (model, init) = M::init(flags);
        let session = Session::open(&options)?;
        tracing::debug!(
            fps = options.fps,
            mouse = options.mouse_capture,
            focus_events = options.focus_events,
            "program started"
        );
        let mut program = Self {
            model,
            session,
            tx,
            rx,
            options,
            dirty: true,
            quit: false,
        };
        program.execute(init);
        Ok(program)
    }

    /// A handle for injecting messages from outside the program.
    pub fn sender(&self) -> mpsc::UnboundedSender<M::Message> {
        self.tx.clone()
    }

    /// Run until the model quits, then restore the terminal and hand the
    /// final model back.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let outcome = self.event_loop().await;
        tracing::debug!(ok = outcome.is_ok(), "program stopping");
        let Program { model, session, .. } = self;
        session.close()?;
        outcome.map(|()| model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.session.draw(&self.model)?;
        self.dirty = false;

        let period = Duration::from_secs_f64(1.0 / f64::from(self.options.fps.clamp(1, 120)));
        let mut frames = tokio::time::interval(period);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let handle_signals = self.options.handle_signals;
        let mut events = EventStream::new();

        while !self.quit {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    tracing::debug!("ctrl+c signal");
                    break;
                }

                Some(msg) = self.rx.recv() => self.dispatch(msg),

                event = events.next() => match event {
                    Some(Ok(event)) => self.on_event(TerminalEvent::from(event)),
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                },

                _ = frames.tick(), if self.dirty => {
                    self.session.draw(&self.model)?;
                    self.dirty = false;
                }
            }
        }
        Ok(())
    }

    fn on_event(&mut self, event: TerminalEvent) {
        if matches!(event, TerminalEvent::Resize(..)) {
            self.dirty = true;
        }
        if let Some(msg) = self.model.event(event) {
            self.dispatch(msg);
        }
    }

    fn dispatch(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute(cmd);
        self.dirty = true;
    }

    fn execute(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                // The receiver lives as long as the program.
                let _ = self.tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Future(fut) => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(fut.await);
                });
            }
            CommandInner::Batch(cmds) => cmds.into_iter().for_each(|cmd| self.execute(cmd)),
        }
    }
}

/// Run a model with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run a model with custom options.
pub async fn run_with<M: Model>(flags: M::Flags, options: ProgramOptions) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}

/// Open (or create) `path` for appending log output.
///
/// Pass the file to a `tracing` subscriber as its writer, so logs stay out
/// of the terminal the UI draws on.
///
/// ```no_run
/// use std::io::Write;
///
/// let mut f = taro_core::log_to_file("debug.log").unwrap();
/// writeln!(f, "started").unwrap();
/// ```
pub fn log_to_file(path: impl AsRef<Path>) -> io::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = ProgramOptions::default();
        assert_eq!(opts.fps, 60);
        assert!(opts.alt_screen);
        assert!(!opts.mouse_capture);
        assert!(opts.focus_events);
        assert!(opts.log_file.is_none());
    }

    #[test]
    fn modes_follow_options() {
        let modes = Modes::from_options(&ProgramOptions {
            mouse_capture: true,
            alt_screen: false,
            ..ProgramOptions::default()
        });
        assert!(modes.mouse_capture);
        assert!(!modes.alt_screen);
        assert!(modes.focus_events);
    }

    #[test]
    fn log_to_file_appends() {
        let path = std::env::temp_dir().join(format!("taro-log-{}.log", std::process::id()));
        {
            use std::io::Write;
            let mut f = log_to_file(&path).unwrap();
            writeln!(f, "one").unwrap();
            let mut f = log_to_file(&path).unwrap();
            writeln!(f, "two").unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(content, "one\ntwo\n");
    }
}
