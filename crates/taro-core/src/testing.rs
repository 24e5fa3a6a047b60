use crate::command::{Action, Command, CommandInner};
use crate::component::Component;
use crate::model::Model;
use futures::future::BoxFuture;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// `TestProgram` exercises the init/update/view cycle in a plain `#[test]`
/// function -- no tokio runtime or TTY required. Immediate messages are
/// queued and flushed with [`drain_messages`](TestProgram::drain_messages);
/// deferred futures are run to completion by
/// [`run_pending`](TestProgram::run_pending).
///
/// # Example
///
/// ```rust,ignore
/// use taro_core::testing::TestProgram;
///
/// let mut prog = TestProgram::<Picker>::new(());
/// prog.send(PickerMsg::Open);
/// prog.drain_messages();
/// assert!(prog.render_string(40, 5).contains("Apple"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    pending_futures: Vec<BoxFuture<'static, M::Message>>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            pending_futures: Vec::new(),
            quit: false,
        };
        program.collect(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Process all queued immediate messages, including the ones they produce.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                self.send(msg);
            }
        }
    }

    /// Resolve every pending future, deliver its message, and drain the
    /// resulting immediate messages. Repeats until nothing is pending.
    pub fn run_pending(&mut self) {
        self.drain_messages();
        while !self.pending_futures.is_empty() {
            let futures: Vec<_> = self.pending_futures.drain(..).collect();
            for fut in futures {
                let msg = futures::executor::block_on(fut);
                self.send(msg);
            }
            self.drain_messages();
        }
    }

    /// Whether the model has returned [`Command::quit`].
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a ratatui [`Buffer`] of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        render_buffer(width, height, |frame| self.model.view(frame))
    }

    /// Render the model and return the visible content as a plain string,
    /// one line per buffer row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => self.pending_messages.push(msg),
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Future(fut) => self.pending_futures.push(fut),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}

/// A headless harness for a single [`Component`].
///
/// Messages a component emits are notifications for its parent, so the
/// harness records them in an outbox instead of feeding them back. Deferred
/// futures are held until [`run_pending`](ComponentHarness::run_pending),
/// which resolves them and delivers their messages to the component, just
/// as the runtime would on a later tick.
pub struct ComponentHarness<C: Component> {
    component: C,
    outbox: Vec<C::Message>,
    pending_futures: Vec<BoxFuture<'static, C::Message>>,
}

impl<C: Component> ComponentHarness<C> {
    /// Wrap a component.
    pub fn new(component: C) -> Self {
        Self {
            component,
            outbox: Vec::new(),
            pending_futures: Vec::new(),
        }
    }

    /// Deliver a message to the component.
    pub fn send(&mut self, msg: C::Message) {
        let cmd = self.component.update(msg);
        self.collect(cmd);
    }

    /// Resolve every pending future and deliver its message to the component.
    pub fn run_pending(&mut self) {
        while !self.pending_futures.is_empty() {
            let futures: Vec<_> = self.pending_futures.drain(..).collect();
            for fut in futures {
                let msg = futures::executor::block_on(fut);
                self.send(msg);
            }
        }
    }

    /// Number of futures waiting for [`run_pending`](ComponentHarness::run_pending).
    pub fn pending(&self) -> usize {
        self.pending_futures.len()
    }

    /// Take the messages emitted so far.
    pub fn take_outbox(&mut self) -> Vec<C::Message> {
        std::mem::take(&mut self.outbox)
    }

    /// Messages emitted so far, without clearing them.
    pub fn outbox(&self) -> &[C::Message] {
        &self.outbox
    }

    /// Get a shared reference to the component for assertions.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Get a mutable reference to the component for direct test setup.
    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Consume the harness, returning the component.
    pub fn into_inner(self) -> C {
        self.component
    }

    /// Render the component into the full area of a buffer.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        render_buffer(width, height, |frame| {
            let area = frame.area();
            self.component.view(frame, area)
        })
    }

    /// Render the component into `area` of a `width` x `height` buffer.
    pub fn render_in(&self, width: u16, height: u16, area: Rect) -> Buffer {
        render_buffer(width, height, |frame| self.component.view(frame, area))
    }

    /// Render the component and return the visible content as a plain string.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn collect(&mut self, cmd: Command<C::Message>) {
        match cmd.inner {
            CommandInner::None | CommandInner::Action(Action::Quit) => {}
            CommandInner::Action(Action::Message(msg)) => self.outbox.push(msg),
            CommandInner::Future(fut) => self.pending_futures.push(fut),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}

fn render_buffer(width: u16, height: u16, draw: impl FnOnce(&mut ratatui::Frame)) -> Buffer {
    let backend = ratatui::backend::TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    terminal.backend().buffer().clone()
}

/// Concatenate each buffer row into a line; rows are separated by newlines.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}
