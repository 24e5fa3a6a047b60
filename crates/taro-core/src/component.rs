use crate::command::Command;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// `Component` mirrors [`Model`](crate::Model) except that
/// [`view`](Component::view) receives the `area` to draw into, so a parent
/// decides where each child renders.
///
/// # Composition pattern
///
/// Wrap the component's message type in a variant of the parent message and
/// use [`Command::map`] to lift commands. Notification messages a component
/// emits (a committed selection, say) come back through the parent's
/// `update`, where the parent reacts to them:
///
/// ```rust,ignore
/// use taro_core::{Command, Component, Model};
/// use taro_widgets::combobox::{self, Combobox};
///
/// struct App { fruit: Combobox<String> }
///
/// enum AppMsg { Fruit(combobox::Message<String>) }
///
/// impl Model for App {
///     type Message = AppMsg;
///     type Flags = ();
///
///     fn update(&mut self, msg: AppMsg) -> Command<AppMsg> {
///         match msg {
///             AppMsg::Fruit(combobox::Message::Changed(value)) => {
///                 self.fruit.set_value(Some(value));
///                 Command::none()
///             }
///             AppMsg::Fruit(m) => self.fruit.update(m).map(AppMsg::Fruit),
///         }
///     }
///     // ...
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's message type: both the input it reacts to and the
    /// notifications it emits.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    ///
    /// The returned command uses the component's own `Message` type; the
    /// parent calls [`.map()`](Command::map) to lift it.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into a specific `area` of the [`Frame`].
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently has focus.
    ///
    /// A hint for input routing. The default implementation returns `false`.
    fn focused(&self) -> bool {
        false
    }
}
