//! Searchable, groupable single-value combobox.
//!
//! The value is controlled by the host: the combobox only mirrors it to know
//! which row is selected, and reports a commit with [`Message::Changed`].
//! The host applies the new value with [`Combobox::set_value`] on its own
//! schedule. Open state, search text and highlight belong to the combobox.
//!
//! Output notifications ([`Message::Changed`], [`Message::Opened`],
//! [`Message::Closed`], [`Message::FocusTrigger`]) travel in the same enum as
//! the input intents. A parent intercepts them in its own update; delivered
//! back to the combobox they do nothing.
//!
//! # Example
//!
//! ```ignore
//! use taro_widgets::combobox::{Combobox, Message};
//! use taro_widgets::item::Item;
//!
//! let mut fruit = Combobox::new(vec![
//!     Item::new("apple".to_string(), "Apple"),
//!     Item::new("banana".to_string(), "Banana"),
//! ])
//! .with_searchable(true)
//! .with_search_placeholder("Pick a fruit");
//!
//! // In the parent's update:
//! // ComboMsg(Message::Changed(v)) => fruit.set_value(Some(v)),
//! ```

use crate::filter;
use crate::focus::{FocusCoordinator, FocusTarget, Settled, Ticket};
use crate::item::{Group, Item, ItemFns, Label, Predicate, Value};
use crate::key::ComboboxKeyBindings;
use crate::navigation::{Direction, Highlight};
use crate::overlay::Overlay;
use crate::panel::{self, ComboboxStyle, HitMap, HitTarget, PanelModel, PanelRow};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};
use ratatui::widgets::Block;
use ratatui::Frame;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use taro_core::command::Command;
use taro_core::component::Component;
use tracing::{debug, trace};

const DEFAULT_MAX_VISIBLE: usize = 8;

/// Messages for the combobox component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message<V> {
    /// A key press forwarded to the combobox.
    KeyPress(KeyEvent),
    /// A mouse event forwarded to the combobox. Resolved against the areas
    /// recorded by the last render.
    Mouse(MouseEvent),
    /// Open the panel.
    Open,
    /// Close the panel without committing.
    Dismiss,
    /// Open when closed, close when open.
    Toggle,
    /// Replace the search text.
    SetSearch(String),
    /// Move the highlight.
    Navigate(Direction),
    /// Highlight a row (flattened index) without committing.
    Hover(usize),
    /// Commit a row by flattened index, or the highlighted row with `None`.
    Commit(Option<usize>),
    /// The footer was activated.
    FooterClick,
    /// Focus left the search input or the trigger.
    Blur,
    /// Focus moved to `target`, as reported by the host.
    FocusChanged(FocusTarget),
    /// Deferred blur check, scheduled by [`Message::Blur`].
    FocusSettled(Ticket),

    /// Emitted: a row was committed. The host decides whether to apply it.
    Changed(V),
    /// Emitted: the panel opened.
    Opened,
    /// Emitted: the panel closed.
    Closed,
    /// Emitted: focus went back to the trigger after closing.
    FocusTrigger,
}

/// Snapshot of the state owned by the combobox.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComboboxState {
    pub is_open: bool,
    pub search_text: String,
    pub highlighted_index: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
enum CloseReason {
    Commit,
    Escape,
    Toggle,
    Footer,
    Outside,
    Blur,
    Disabled,
}

/// What the highlight stays on across a recomputation.
#[derive(Debug, Clone)]
enum Anchor {
    /// Option position; the options themselves did not change.
    Option(usize),
    /// Item key; the options were replaced.
    Key(String),
}

/// A single-selection combobox over `Item<V, L>`.
pub struct Combobox<V, L = String> {
    options: Vec<Item<V, L>>,
    value: Option<V>,
    fns: ItemFns<V, L>,
    searchable: bool,
    disabled: bool,
    use_portal: bool,
    is_open: bool,
    search_text: String,
    groups: Vec<Group>,
    flattened: Vec<usize>,
    highlight: Highlight,
    focus: FocusCoordinator,
    footer: Option<Text<'static>>,
    dropdown_title: Option<Line<'static>>,
    search_placeholder: String,
    trigger_title: Option<String>,
    max_visible: usize,
    style: ComboboxStyle,
    key_bindings: ComboboxKeyBindings,
    block: Option<Block<'static>>,
    hits: RefCell<HitMap>,
}

impl<V: Value + fmt::Display, L: Label> Combobox<V, L> {
    /// Create a combobox whose plain text for each item is the value's
    /// `Display` output.
    pub fn new(options: Vec<Item<V, L>>) -> Self {
        Self::with_fns(options, ItemFns::display())
    }
}

impl<V: Value, L: Label> Combobox<V, L> {
    /// Create a combobox for values without a `Display` impl, using
    /// `item_to_string` as the plain-text conversion.
    pub fn from_item_to_string(
        options: Vec<Item<V, L>>,
        item_to_string: impl Fn(Option<&Item<V, L>>) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::with_fns(options, ItemFns::new(Arc::new(item_to_string)))
    }

    fn with_fns(options: Vec<Item<V, L>>, fns: ItemFns<V, L>) -> Self {
        let mut combobox = Self {
            options,
            value: None,
            fns,
            searchable: false,
            disabled: false,
            use_portal: false,
            is_open: false,
            search_text: String::new(),
            groups: Vec::new(),
            flattened: Vec::new(),
            highlight: Highlight::new(0, DEFAULT_MAX_VISIBLE),
            focus: FocusCoordinator::new(),
            footer: None,
            dropdown_title: None,
            search_placeholder: String::new(),
            trigger_title: None,
            max_visible: DEFAULT_MAX_VISIBLE,
            style: ComboboxStyle::default(),
            key_bindings: ComboboxKeyBindings::default(),
            block: None,
            hits: RefCell::new(HitMap::default()),
        };
        combobox.refresh(None);
        combobox
    }

    /// Set the initial value mirrored from the host.
    pub fn with_value(mut self, value: Option<V>) -> Self {
        self.value = value;
        self
    }

    /// Show a search input in the panel and filter rows by it.
    pub fn with_searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self.search_text.clear();
        self.refresh(None);
        self
    }

    /// Start disabled. A disabled combobox ignores keys and clicks.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Place the panel against the whole frame instead of the component's
    /// area.
    pub fn with_portal(mut self, use_portal: bool) -> Self {
        self.use_portal = use_portal;
        self
    }

    /// Plain text for each item, used by the default filter and as the
    /// default item key.
    pub fn with_item_to_string(
        mut self,
        f: impl Fn(Option<&Item<V, L>>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.fns.item_to_string = Arc::new(f);
        self.refresh(None);
        self
    }

    /// Plain text used where a rich label cannot go (the search input
    /// placeholder). Defaults to the item-to-string conversion.
    pub fn with_item_to_display_string(
        mut self,
        f: impl Fn(Option<&Item<V, L>>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.fns.item_to_display_string = Some(Arc::new(f));
        self
    }

    /// Replace the default case-insensitive substring match. The factory is
    /// called once per search text and returns the predicate for it.
    pub fn with_filter(
        mut self,
        factory: impl Fn(&str) -> Predicate<V, L> + Send + Sync + 'static,
    ) -> Self {
        self.fns.filter = Some(Arc::new(factory));
        self.refresh(None);
        self
    }

    /// Key identifying an item when the options are replaced while open.
    /// Defaults to the item-to-string conversion.
    pub fn with_item_key(mut self, f: impl Fn(&Item<V, L>) -> String + Send + Sync + 'static) -> Self {
        self.fns.item_key = Some(Arc::new(f));
        self
    }

    /// Equality used to find the selected item. Defaults to `PartialEq`.
    pub fn with_values_equal(mut self, f: impl Fn(&V, &V) -> bool + Send + Sync + 'static) -> Self {
        self.fns.values_equal = Arc::new(f);
        self
    }

    /// Group rows under a header per distinct key, in first-seen order.
    /// Items with an empty key are listed without a header.
    pub fn with_group_by(mut self, f: impl Fn(&Item<V, L>) -> String + Send + Sync + 'static) -> Self {
        self.fns.group_by = Some(Arc::new(f));
        self.refresh(None);
        self
    }

    /// Content rendered after the rows. Clicking it closes the panel.
    pub fn with_footer(mut self, footer: impl Into<Text<'static>>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Title shown in the panel header, and on the trigger while nothing is
    /// selected.
    pub fn with_dropdown_title(mut self, title: impl Into<Line<'static>>) -> Self {
        self.dropdown_title = Some(title.into());
        self
    }

    /// Placeholder shown in the empty search input while nothing is
    /// selected.
    pub fn with_search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = placeholder.into();
        self
    }

    /// Tooltip text for the trigger.
    pub fn with_trigger_title(mut self, title: impl Into<String>) -> Self {
        self.trigger_title = Some(title.into());
        self
    }

    /// Set the maximum number of rows shown before scrolling.
    pub fn with_max_visible(mut self, max: usize) -> Self {
        self.max_visible = max.max(1);
        self.highlight.set_visible(self.max_visible);
        self
    }

    /// Set the visual style.
    pub fn with_style(mut self, style: ComboboxStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the default key bindings.
    pub fn with_key_bindings(mut self, key_bindings: ComboboxKeyBindings) -> Self {
        self.key_bindings = key_bindings;
        self
    }

    /// Set the block (border/title container) for the panel.
    pub fn with_block(mut self, block: Block<'static>) -> Self {
        self.block = Some(block);
        self
    }

    /// Mirror the host's current value.
    pub fn set_value(&mut self, value: Option<V>) {
        self.value = value;
    }

    /// Replace the options. While open, the highlight follows the same item
    /// by key when it is still listed.
    pub fn set_options(&mut self, options: Vec<Item<V, L>>) {
        let previous = self
            .highlighted_item()
            .map(|item| Anchor::Key(self.fns.key(item)));
        self.options = options;
        self.refresh(previous);
    }

    /// Enable or disable the control. Disabling an open panel dismisses it.
    pub fn set_disabled(&mut self, disabled: bool) -> Command<Message<V>> {
        self.disabled = disabled;
        if disabled {
            self.close(CloseReason::Disabled)
        } else {
            Command::none()
        }
    }

    /// Detach from the host. Deferred focus checks still in flight are
    /// ignored when they arrive.
    pub fn unmount(&mut self) {
        self.focus.unmount();
        self.is_open = false;
        self.search_text.clear();
        self.highlight.reset();
        self.refresh(None);
        debug!("combobox unmounted");
    }

    /// Open state, search text and highlight, copied out.
    pub fn state(&self) -> ComboboxState {
        ComboboxState {
            is_open: self.is_open,
            search_text: self.search_text.clone(),
            highlighted_index: self.highlight.cursor(),
        }
    }

    /// Whether the panel is showing.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether the combobox ignores input.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the panel has a search input.
    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    /// Current search text; empty while closed.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Highlighted position in [`flattened`](Combobox::flattened).
    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlight.cursor()
    }

    /// All options, unfiltered.
    pub fn options(&self) -> &[Item<V, L>] {
        &self.options
    }

    /// The mirrored value.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Filtered groups, in display order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Option positions in display order; the highlight indexes into this.
    pub fn flattened(&self) -> &[usize] {
        &self.flattened
    }

    /// The first option whose value equals the mirrored value.
    pub fn selected_item(&self) -> Option<&Item<V, L>> {
        self.selected_index().map(|i| &self.options[i])
    }

    /// The option under the highlight, if any.
    pub fn highlighted_item(&self) -> Option<&Item<V, L>> {
        let index = self.highlight.cursor()?;
        self.flattened.get(index).map(|&i| &self.options[i])
    }

    /// Plain text for `item`, or for "no item" with `None`.
    pub fn item_to_string(&self, item: Option<&Item<V, L>>) -> String {
        self.fns.to_string(item)
    }

    /// Search input placeholder: the selected item's display string, or the
    /// configured search placeholder when that is empty.
    pub fn placeholder(&self) -> String {
        let current = self.fns.display_string(self.selected_item());
        if current.is_empty() {
            self.search_placeholder.clone()
        } else {
            current
        }
    }

    /// Where focus is, as last reported.
    pub fn focus(&self) -> FocusTarget {
        self.focus.current()
    }

    /// Tooltip text for the trigger, for the host to show.
    pub fn trigger_title(&self) -> Option<&str> {
        self.trigger_title.as_deref()
    }

    fn selected_index(&self) -> Option<usize> {
        self.fns.find_selected(&self.options, self.value.as_ref())
    }

    /// Recompute groups and the flattened list, then re-clamp the highlight.
    /// `previous` names the item highlighted before the change.
    fn refresh(&mut self, previous: Option<Anchor>) {
        self.groups = filter::compute(&self.options, &self.search_text, self.searchable, &self.fns);
        self.flattened = filter::flatten(&self.groups);
        self.highlight.set_count(self.flattened.len());
        if let Some(anchor) = previous {
            let position = match anchor {
                Anchor::Option(option) => self.flattened.iter().position(|&i| i == option),
                Anchor::Key(key) => self
                    .flattened
                    .iter()
                    .position(|&i| self.fns.key(&self.options[i]) == key),
            };
            if let Some(position) = position {
                self.highlight.select(position);
            }
        }
    }

    fn open(&mut self) -> Command<Message<V>> {
        if self.disabled || self.is_open {
            return Command::none();
        }
        self.is_open = true;
        self.search_text.clear();
        self.highlight.reset();
        self.refresh(None);
        let selected = self.selected_index();
        if let Some(position) = selected.and_then(|s| self.flattened.iter().position(|&i| i == s)) {
            self.highlight.select(position);
        }
        self.focus.invalidate();
        self.focus.focus(if self.searchable {
            FocusTarget::Input
        } else {
            FocusTarget::Toggle
        });
        debug!(
            searchable = self.searchable,
            highlighted = ?self.highlight.cursor(),
            "combobox opened"
        );
        Command::message(Message::Opened)
    }

    fn close(&mut self, reason: CloseReason) -> Command<Message<V>> {
        if !self.is_open {
            return Command::none();
        }
        self.is_open = false;
        self.search_text.clear();
        self.highlight.reset();
        self.focus.invalidate();
        self.refresh(None);
        let refocus = self.focus.restore_to_trigger();
        debug!(?reason, refocus, "combobox closed");

        let closed = Command::message(Message::Closed);
        if refocus {
            Command::batch([closed, Command::message(Message::FocusTrigger)])
        } else {
            closed
        }
    }

    fn commit(&mut self, index: Option<usize>) -> Command<Message<V>> {
        if !self.is_open {
            return Command::none();
        }
        let Some(position) = index.or(self.highlight.cursor()) else {
            return Command::none();
        };
        let Some(&option) = self.flattened.get(position) else {
            return Command::none();
        };
        let value = self.options[option].value.clone();
        debug!(position, option, "combobox commit");
        let closed = self.close(CloseReason::Commit);
        Command::batch([Command::message(Message::Changed(value)), closed])
    }

    fn set_search(&mut self, text: String) -> Command<Message<V>> {
        if !self.is_open || !self.searchable || text == self.search_text {
            return Command::none();
        }
        let previous = self
            .highlight
            .cursor()
            .and_then(|position| self.flattened.get(position))
            .map(|&option| Anchor::Option(option));
        self.search_text = text;
        self.refresh(previous);
        trace!(
            search = %self.search_text,
            matches = self.flattened.len(),
            "combobox search"
        );
        Command::none()
    }

    fn navigate(&mut self, direction: Direction) -> Command<Message<V>> {
        if self.is_open {
            self.highlight.step(direction);
            trace!(?direction, highlighted = ?self.highlight.cursor(), "combobox navigate");
        }
        Command::none()
    }

    fn hover(&mut self, position: usize) -> Command<Message<V>> {
        if self.is_open && position < self.flattened.len() {
            self.highlight.select(position);
        }
        Command::none()
    }

    fn blur(&mut self) -> Command<Message<V>> {
        self.focus.focus(FocusTarget::Outside);
        if !self.is_open {
            return Command::none();
        }
        let ticket = self.focus.blur();
        Command::next_tick(Message::FocusSettled(ticket))
    }

    fn settle(&mut self, ticket: Ticket) -> Command<Message<V>> {
        match self.focus.settle(ticket, self.is_open) {
            Settled::Dismiss => self.close(CloseReason::Blur),
            Settled::Stay => Command::none(),
            Settled::Stale => {
                debug!(?ticket, "stale focus check ignored");
                Command::none()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message<V>> {
        if key.kind == KeyEventKind::Release || self.disabled {
            return Command::none();
        }

        if !self.is_open {
            if self.key_bindings.open.matches(&key) {
                return self.open();
            }
            if let Some(c) = printable(&key).filter(|_| self.searchable) {
                let opened = self.open();
                self.set_search(c.to_string());
                return opened;
            }
            return Command::none();
        }

        if self.key_bindings.dismiss.matches(&key) {
            return self.close(CloseReason::Escape);
        }
        if self.key_bindings.commit.matches(&key) {
            return self.commit(None);
        }
        let direction = if self.key_bindings.next.matches(&key) {
            Some(Direction::Next)
        } else if self.key_bindings.prev.matches(&key) {
            Some(Direction::Prev)
        } else if self.key_bindings.first.matches(&key) {
            Some(Direction::First)
        } else if self.key_bindings.last.matches(&key) {
            Some(Direction::Last)
        } else {
            None
        };
        if let Some(direction) = direction {
            return self.navigate(direction);
        }

        if !self.searchable {
            return Command::none();
        }
        if self.key_bindings.clear_search.matches(&key) {
            return self.set_search(String::new());
        }
        if key.code == KeyCode::Backspace {
            let mut text = self.search_text.clone();
            text.pop();
            return self.set_search(text);
        }
        if let Some(c) = printable(&key) {
            let mut text = self.search_text.clone();
            text.push(c);
            return self.set_search(text);
        }
        Command::none()
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Command<Message<V>> {
        if self.disabled {
            return Command::none();
        }
        let hit = self.hits.borrow().hit(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => match hit {
                Some(HitTarget::Trigger) if !self.is_open => {
                    self.focus.focus(FocusTarget::Trigger);
                    self.open()
                }
                Some(HitTarget::Trigger | HitTarget::Toggle) => {
                    self.focus.focus(FocusTarget::Toggle);
                    self.close(CloseReason::Toggle)
                }
                Some(HitTarget::Input) => {
                    self.focus.focus(FocusTarget::Input);
                    Command::none()
                }
                Some(HitTarget::Row(position)) => {
                    self.focus.focus(FocusTarget::Row(position));
                    self.commit(Some(position))
                }
                Some(HitTarget::Footer) => {
                    self.focus.focus(FocusTarget::Footer);
                    self.close(CloseReason::Footer)
                }
                Some(HitTarget::Panel) => Command::none(),
                None => {
                    self.focus.focus(FocusTarget::Outside);
                    self.close(CloseReason::Outside)
                }
            },
            MouseEventKind::Moved => match hit {
                Some(HitTarget::Row(position)) => self.hover(position),
                _ => Command::none(),
            },
            MouseEventKind::ScrollDown if hit.is_some() => self.navigate(Direction::Next),
            MouseEventKind::ScrollUp if hit.is_some() => self.navigate(Direction::Prev),
            _ => Command::none(),
        }
    }

    fn panel_rows(&self) -> Vec<PanelRow<'_>> {
        if !self.is_open {
            return Vec::new();
        }
        let selected = self.selected_index();
        let highlighted = self.highlight.cursor();
        let mut rows = Vec::with_capacity(self.flattened.len() + self.groups.len());
        let mut flat = 0;
        for group in &self.groups {
            if group.has_header() {
                rows.push(PanelRow::Header(group.key.as_str()));
            }
            for &index in &group.items {
                rows.push(PanelRow::Item {
                    flat,
                    line: self.options[index].label.to_line(),
                    highlighted: highlighted == Some(flat),
                    selected: selected == Some(index),
                    grouped: group.has_header(),
                });
                flat += 1;
            }
        }
        rows
    }
}

fn printable(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Some(c)
        }
        _ => None,
    }
}

impl<V: Value, L: Label> Component for Combobox<V, L> {
    type Message = Message<V>;

    fn update(&mut self, msg: Message<V>) -> Command<Message<V>> {
        match msg {
            Message::KeyPress(key) => self.handle_key(key),
            Message::Mouse(mouse) => self.handle_mouse(mouse),
            Message::Open => self.open(),
            Message::Dismiss => self.close(CloseReason::Escape),
            Message::Toggle if self.is_open => self.close(CloseReason::Toggle),
            Message::Toggle => self.open(),
            Message::SetSearch(text) => self.set_search(text),
            Message::Navigate(direction) => self.navigate(direction),
            Message::Hover(position) => self.hover(position),
            Message::Commit(position) => self.commit(position),
            Message::FooterClick => self.close(CloseReason::Footer),
            Message::Blur => self.blur(),
            Message::FocusChanged(FocusTarget::Outside) => self.blur(),
            Message::FocusChanged(target) => {
                self.focus.focus(target);
                match target {
                    FocusTarget::Row(position) => self.hover(position),
                    _ => Command::none(),
                }
            }
            Message::FocusSettled(ticket) => self.settle(ticket),
            Message::Changed(_) | Message::Opened | Message::Closed | Message::FocusTrigger => {
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let focus = self.focus.current();
        let model = PanelModel {
            is_open: self.is_open,
            disabled: self.disabled,
            trigger_focused: focus == FocusTarget::Trigger,
            input_focused: self.is_open && focus == FocusTarget::Input,
            selected_label: self.selected_item().map(|item| item.label.to_line()),
            dropdown_title: self.dropdown_title.as_ref(),
            searchable: self.searchable,
            search_text: &self.search_text,
            placeholder: self.placeholder(),
            rows: self.panel_rows(),
            scroll: self.highlight.offset(),
            max_visible: self.max_visible,
            footer: self.footer.as_ref(),
            overlay: Overlay::new(self.is_open, self.use_portal),
            style: &self.style,
            block: self.block.as_ref(),
        };
        *self.hits.borrow_mut() = panel::render(frame, area, &model);
    }

    fn focused(&self) -> bool {
        self.is_open || self.focus.current().is_inside()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use taro_core::testing::{buffer_to_string, ComponentHarness};

    type Combo = Combobox<String, &'static str>;

    fn key(code: KeyCode) -> Message<String> {
        key_with(code, KeyModifiers::NONE)
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> Message<String> {
        Message::KeyPress(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn click(column: u16, row: u16) -> Message<String> {
        mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Message<String> {
        Message::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn fruit() -> Vec<Item<String, &'static str>> {
        vec![
            Item::new("apple".to_string(), "Apple"),
            Item::new("banana".to_string(), "Banana"),
            Item::new("cherry".to_string(), "Cherry"),
        ]
    }

    fn harness(combo: Combo) -> ComponentHarness<Combo> {
        ComponentHarness::new(combo)
    }

    fn by_label(combo: Combo) -> Combo {
        combo.with_item_to_string(|i: Option<&Item<String, &'static str>>| {
            i.map(|i| i.label.to_string()).unwrap_or_default()
        })
    }

    #[test]
    fn starts_closed() {
        let combo = Combo::new(fruit());
        assert_eq!(combo.state(), ComboboxState::default());
        assert_eq!(combo.flattened(), &[0, 1, 2]);
        assert!(combo.selected_item().is_none());
    }

    #[test]
    fn selected_item_is_first_equal_value() {
        let mut options = fruit();
        options.push(Item::new("banana".to_string(), "Banana again"));
        let mut combo = Combo::new(options).with_value(Some("banana".to_string()));
        assert_eq!(combo.selected_item().map(|i| i.label), Some("Banana"));

        combo.set_value(Some("durian".to_string()));
        assert!(combo.selected_item().is_none());
        combo.set_value(None);
        assert!(combo.selected_item().is_none());
    }

    #[test]
    fn open_highlights_selected_item() {
        let mut h = harness(Combo::new(fruit()).with_value(Some("cherry".to_string())));
        h.send(Message::Open);
        assert!(h.component().is_open());
        assert_eq!(h.component().highlighted_index(), Some(2));
        assert_eq!(h.take_outbox(), vec![Message::Opened]);
    }

    #[test]
    fn open_without_selection_highlights_nothing() {
        let mut h = harness(Combo::new(fruit()));
        h.send(key(KeyCode::Enter));
        assert!(h.component().is_open());
        assert_eq!(h.component().highlighted_index(), None);
    }

    #[test]
    fn disabled_never_opens() {
        let mut h = harness(Combo::new(fruit()).with_disabled(true));
        h.send(Message::Open);
        h.send(Message::Toggle);
        h.send(key(KeyCode::Enter));
        assert!(!h.component().is_open());
        assert!(h.outbox().is_empty());
    }

    #[test]
    fn disabling_while_open_dismisses() {
        let mut h = harness(Combo::new(fruit()));
        h.send(Message::Open);
        h.take_outbox();
        let cmd = h.component_mut().set_disabled(true);
        assert!(!h.component().is_open());
        let messages = cmd.into_messages();
        assert!(messages.contains(&Message::Closed));
        assert!(!messages.iter().any(|m| matches!(m, Message::Changed(_))));
    }

    #[test]
    fn enter_commits_highlighted_row() {
        let mut h = harness(Combo::new(fruit()));
        h.send(Message::Open);
        h.send(key(KeyCode::Down));
        h.send(key(KeyCode::Down));
        h.take_outbox();
        h.send(key(KeyCode::Enter));
        let outbox = h.take_outbox();
        assert_eq!(outbox[0], Message::Changed("banana".to_string()));
        assert!(outbox.contains(&Message::Closed));
        assert!(!h.component().is_open());
    }

    #[test]
    fn commit_with_nothing_highlighted_is_noop() {
        let mut h = harness(Combo::new(fruit()));
        h.send(Message::Open);
        h.take_outbox();
        h.send(Message::Commit(None));
        h.send(Message::Commit(Some(7)));
        assert!(h.component().is_open());
        assert!(h.outbox().is_empty());
    }

    #[test]
    fn click_row_commits_once_without_applying_value() {
        let mut h = harness(Combo::new(fruit()).with_value(Some("apple".to_string())));
        h.render(20, 10);
        h.send(click(1, 0));
        assert!(h.component().is_open());
        h.take_outbox();

        // Non-searchable panel: toggle row at y=0, rows from y=1.
        h.render(20, 10);
        h.send(click(2, 3));
        let changed: Vec<_> = h
            .take_outbox()
            .into_iter()
            .filter(|m| matches!(m, Message::Changed(_)))
            .collect();
        assert_eq!(changed, vec![Message::Changed("cherry".to_string())]);
        assert!(!h.component().is_open());
        // The host has not applied the new value yet.
        assert_eq!(h.component().selected_item().map(|i| i.label), Some("Apple"));
        assert!(h.render_string(20, 1).starts_with("Apple"));
    }

    #[test]
    fn hover_highlights_without_committing() {
        let mut h = harness(Combo::new(fruit()));
        h.send(Message::Open);
        h.take_outbox();
        h.render(20, 10);
        h.send(mouse(MouseEventKind::Moved, 4, 2));
        assert_eq!(h.component().highlighted_index(), Some(1));
        assert!(h.component().is_open());
        assert!(h.outbox().is_empty());
    }

    #[test]
    fn click_outside_dismisses() {
        let mut h = harness(Combo::new(fruit()));
        h.send(Message::Open);
        h.take_outbox();
        h.render_in(40, 10, Rect::new(0, 0, 20, 10));
        h.send(click(30, 8));
        assert!(!h.component().is_open());
        assert_eq!(h.take_outbox(), vec![Message::Closed]);
        assert_eq!(h.component().focus(), FocusTarget::Outside);
    }

    #[test]
    fn toggle_row_closes_and_refocuses_trigger() {
        let mut h = harness(Combo::new(fruit()));
        h.send(Message::Open);
        h.take_outbox();
        h.render(20, 10);
        h.send(click(1, 0));
        assert!(!h.component().is_open());
        assert_eq!(
            h.take_outbox(),
            vec![Message::Closed, Message::FocusTrigger]
        );
        assert_eq!(h.component().focus(), FocusTarget::Trigger);
    }

    #[test]
    fn escape_dismisses_without_change() {
        let mut h = harness(Combo::new(fruit()).with_searchable(true));
        h.send(Message::Open);
        h.send(key(KeyCode::Char('a')));
        h.send(key(KeyCode::Down));
        h.take_outbox();
        h.send(key(KeyCode::Esc));
        assert_eq!(h.component().state(), ComboboxState::default());
        let outbox = h.take_outbox();
        assert!(outbox.contains(&Message::Closed));
        assert!(!outbox.iter().any(|m| matches!(m, Message::Changed(_))));
    }

    #[test]
    fn footer_click_closes_without_commit() {
        let mut h = harness(Combo::new(fruit()).with_footer("Add new"));
        h.send(Message::Open);
        h.send(key(KeyCode::Down));
        h.take_outbox();
        h.render(20, 10);
        // Toggle row, three rows, separator at y=4, footer text at y=5.
        h.send(click(1, 5));
        assert!(!h.component().is_open());
        let outbox = h.take_outbox();
        assert!(outbox.contains(&Message::Closed));
        assert!(!outbox.iter().any(|m| matches!(m, Message::Changed(_))));
    }

    #[test]
    fn navigation_wraps() {
        let mut h = harness(Combo::new(fruit()));
        h.send(Message::Open);
        h.send(key(KeyCode::Up));
        assert_eq!(h.component().highlighted_index(), Some(2));
        h.send(key(KeyCode::Down));
        assert_eq!(h.component().highlighted_index(), Some(0));
        h.send(key(KeyCode::End));
        assert_eq!(h.component().highlighted_index(), Some(2));
        h.send(key_with(KeyCode::Char('p'), KeyModifiers::CONTROL));
        assert_eq!(h.component().highlighted_index(), Some(1));
        h.send(key(KeyCode::Home));
        assert_eq!(h.component().highlighted_index(), Some(0));
    }

    #[test]
    fn navigation_on_empty_list_is_noop() {
        let mut h = harness(by_label(Combo::new(fruit())).with_searchable(true));
        h.send(Message::Open);
        h.send(Message::SetSearch("zzz".into()));
        assert!(h.component().flattened().is_empty());
        for code in [KeyCode::Down, KeyCode::Up, KeyCode::Home, KeyCode::End] {
            h.send(key(code));
            assert_eq!(h.component().highlighted_index(), None);
        }
    }

    #[test]
    fn typing_filters_and_reclamps_highlight() {
        let mut h = harness(by_label(Combo::new(fruit())).with_searchable(true));
        h.send(Message::Open);
        h.send(key(KeyCode::End));
        assert_eq!(h.component().highlighted_index(), Some(2));

        // "Cherry" is gone; the highlight clamps into the shorter list.
        h.send(key(KeyCode::Char('a')));
        assert_eq!(h.component().search_text(), "a");
        assert_eq!(h.component().flattened(), &[0, 1]);
        assert_eq!(h.component().highlighted_index(), Some(1));

        h.send(key(KeyCode::Char('x')));
        assert!(h.component().flattened().is_empty());
        assert_eq!(h.component().highlighted_index(), None);
    }

    #[test]
    fn highlight_follows_item_through_filtering() {
        let mut h = harness(by_label(Combo::new(fruit())).with_searchable(true));
        h.send(Message::Open);
        h.send(Message::Hover(1)); // Banana
        h.send(Message::SetSearch("an".into()));
        assert_eq!(h.component().flattened(), &[1]);
        assert_eq!(h.component().highlighted_item().map(|i| i.label), Some("Banana"));
        h.send(key(KeyCode::Backspace));
        h.send(key(KeyCode::Backspace));
        assert_eq!(h.component().search_text(), "");
        assert_eq!(h.component().highlighted_index(), Some(1));
    }

    #[test]
    fn ctrl_u_clears_search() {
        let mut h = harness(Combo::new(fruit()).with_searchable(true));
        h.send(Message::Open);
        h.send(key(KeyCode::Char('c')));
        h.send(key(KeyCode::Char('h')));
        h.send(key_with(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(h.component().search_text(), "");
        assert_eq!(h.component().flattened().len(), 3);
    }

    #[test]
    fn typing_while_closed_opens_and_seeds_search() {
        let mut h = harness(Combo::new(fruit()).with_searchable(true));
        h.send(key(KeyCode::Char('b')));
        assert!(h.component().is_open());
        assert_eq!(h.component().search_text(), "b");
        assert_eq!(h.component().flattened(), &[1]);
        assert_eq!(h.take_outbox(), vec![Message::Opened]);
    }

    #[test]
    fn typing_is_ignored_when_not_searchable() {
        let mut h = harness(Combo::new(fruit()));
        h.send(key(KeyCode::Char('b')));
        assert!(!h.component().is_open());
        h.send(Message::Open);
        h.send(Message::SetSearch("b".into()));
        assert_eq!(h.component().search_text(), "");
        assert_eq!(h.component().flattened().len(), 3);
    }

    #[test]
    fn blur_to_outside_dismisses_after_tick() {
        let mut h = harness(Combo::new(fruit()).with_searchable(true));
        h.send(Message::Open);
        h.take_outbox();
        h.send(Message::Blur);
        // The check is deferred.
        assert!(h.component().is_open());
        assert_eq!(h.pending(), 1);
        h.run_pending();
        assert!(!h.component().is_open());
        assert_eq!(h.take_outbox(), vec![Message::Closed]);
    }

    #[test]
    fn two_step_focus_move_stays_open() {
        let mut h = harness(Combo::new(fruit()).with_searchable(true));
        h.send(Message::Open);
        h.send(Message::Blur);
        h.send(Message::FocusChanged(FocusTarget::Row(2)));
        h.run_pending();
        assert!(h.component().is_open());
        assert_eq!(h.component().highlighted_index(), Some(2));
    }

    #[test]
    fn stale_check_after_reopen_does_not_close() {
        let mut h = harness(Combo::new(fruit()).with_searchable(true));
        h.send(Message::Open);
        h.send(Message::Blur);
        h.send(key(KeyCode::Esc));
        h.send(Message::Open);
        h.take_outbox();
        // The check from the earlier open phase is still in flight, and
        // focus is outside when it lands.
        assert_eq!(h.pending(), 1);
        h.component_mut().focus.focus(FocusTarget::Outside);
        h.run_pending();
        assert!(h.component().is_open());
        assert!(h.outbox().is_empty());
    }

    #[test]
    fn unmount_ignores_pending_checks() {
        let mut h = harness(Combo::new(fruit()));
        h.send(Message::Open);
        h.send(Message::Blur);
        h.component_mut().unmount();
        h.take_outbox();
        h.run_pending();
        assert!(h.outbox().is_empty());
        assert!(!h.component().is_open());
    }

    #[test]
    fn output_messages_are_inert() {
        let mut h = harness(Combo::new(fruit()));
        for msg in [
            Message::Changed("apple".to_string()),
            Message::Opened,
            Message::Closed,
            Message::FocusTrigger,
        ] {
            h.send(msg);
        }
        assert_eq!(h.component().state(), ComboboxState::default());
        assert!(h.outbox().is_empty());
    }

    #[test]
    fn set_options_while_open_keeps_highlighted_item() {
        let mut h = harness(Combo::new(fruit()));
        h.send(Message::Open);
        h.send(Message::Hover(2)); // cherry
        h.component_mut().set_options(vec![
            Item::new("cherry".to_string(), "Cherry"),
            Item::new("date".to_string(), "Date"),
        ]);
        assert_eq!(h.component().highlighted_index(), Some(0));
        h.component_mut().set_options(vec![]);
        assert_eq!(h.component().highlighted_index(), None);
    }

    #[test]
    fn placeholder_prefers_display_string() {
        let combo = Combo::new(fruit())
            .with_search_placeholder("Search fruit")
            .with_value(Some("banana".to_string()));
        assert_eq!(combo.placeholder(), "banana");

        let combo = combo.with_item_to_display_string(|i: Option<&Item<String, &'static str>>| {
            i.map(|i| i.label.to_uppercase()).unwrap_or_default()
        });
        assert_eq!(combo.placeholder(), "BANANA");

        let combo = combo.with_value(None);
        assert_eq!(combo.placeholder(), "Search fruit");
    }

    #[test]
    fn groups_render_headers_and_index_items_only() {
        let options = vec![
            Item::new("a".to_string(), "A"),
            Item::new("b".to_string(), "B"),
            Item::new("b1".to_string(), "B1"),
        ];
        let mut h = harness(
            Combo::new(options).with_group_by(|i: &Item<String, &'static str>| {
                format!("Starts with {}", &i.label[..1])
            }),
        );
        let keys: Vec<&str> = h.component().groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Starts with A", "Starts with B"]);

        h.send(Message::Open);
        h.send(key(KeyCode::Down));
        h.send(key(KeyCode::Down));
        assert_eq!(h.component().highlighted_item().map(|i| i.label), Some("B"));

        let screen = h.render_string(24, 8);
        assert!(screen.contains("Starts with A"));
        assert!(screen.contains("Starts with B"));
        assert!(screen.contains("B1"));
    }

    #[test]
    fn trigger_shows_title_until_selected() {
        let combo = Combo::new(fruit()).with_dropdown_title("Fruit");
        let h = harness(combo);
        assert!(h.render_string(20, 1).starts_with("Fruit"));

        let combo = h.into_inner().with_value(Some("banana".to_string()));
        let h = harness(combo);
        assert!(h.render_string(20, 1).starts_with("Banana"));
    }

    #[test]
    fn searchable_panel_shows_placeholder_and_footer() {
        let mut h = harness(
            Combo::new(fruit())
                .with_searchable(true)
                .with_search_placeholder("Type to filter")
                .with_footer("Ask for more"),
        );
        h.send(Message::Open);
        let screen = h.render_string(30, 10);
        assert!(screen.contains("Type to filter"));
        assert!(screen.contains("Cherry"));
        assert!(screen.contains("Ask for more"));
    }

    #[test]
    fn panel_scrolls_to_highlight() {
        let options: Vec<Item<String, &'static str>> = ["One", "Two", "Three", "Four", "Five"]
            .into_iter()
            .map(|label| Item::new(label.to_lowercase(), label))
            .collect();
        let mut h = harness(Combo::new(options).with_max_visible(2));
        h.send(Message::Open);
        h.send(key(KeyCode::End));
        let screen = h.render_string(20, 6);
        assert!(screen.contains("Five"));
        assert!(!screen.contains("One"));
    }

    fn same_labels() -> Vec<Item<String, &'static str>> {
        vec![
            Item::new("first".to_string(), "Same"),
            Item::new("second".to_string(), "Same"),
            Item::new("third".to_string(), "Other"),
        ]
    }

    #[test]
    fn typing_keeps_highlight_on_duplicate_label() {
        let mut h = harness(by_label(Combo::new(same_labels())).with_searchable(true));
        h.send(Message::Open);
        h.send(Message::Hover(1));
        h.send(Message::SetSearch("s".into()));
        assert_eq!(h.component().flattened(), &[0, 1]);
        assert_eq!(h.component().highlighted_index(), Some(1));
        assert_eq!(
            h.component().highlighted_item().map(|i| i.value.as_str()),
            Some("second")
        );
    }

    #[test]
    fn custom_item_key_follows_item_across_new_options() {
        let mut h = harness(
            by_label(Combo::new(same_labels()))
                .with_item_key(|i: &Item<String, &'static str>| i.value.clone()),
        );
        h.send(Message::Open);
        h.send(Message::Hover(1));
        let mut options = same_labels();
        options.swap(1, 2);
        h.component_mut().set_options(options);
        assert_eq!(h.component().highlighted_index(), Some(2));
        assert_eq!(
            h.component().highlighted_item().map(|i| i.value.as_str()),
            Some("second")
        );
    }

    #[test]
    fn custom_filter_replaces_substring_match() {
        let mut h = harness(
            Combo::new(fruit())
                .with_searchable(true)
                .with_filter(|search: &str| {
                    let suffix = search.to_string();
                    Box::new(move |i: &Item<String, &'static str>| i.label.ends_with(&suffix))
                }),
        );
        h.send(Message::Open);
        h.send(Message::SetSearch("rry".into()));
        assert_eq!(h.component().flattened(), &[2]);
        h.send(Message::SetSearch("Ch".into()));
        assert!(h.component().flattened().is_empty());
    }

    #[test]
    fn custom_equality_selects_and_highlights_row() {
        let mut h = harness(
            Combo::new(fruit())
                .with_values_equal(|a: &String, b: &String| a.eq_ignore_ascii_case(b))
                .with_value(Some("BANANA".to_string())),
        );
        assert_eq!(h.component().selected_item().map(|i| i.label), Some("Banana"));
        h.send(Message::Open);
        assert_eq!(h.component().highlighted_index(), Some(1));
    }

    #[test]
    fn portal_panel_escapes_cramped_area() {
        let cramped = Rect::new(0, 0, 20, 1);
        let mut local = harness(Combo::new(fruit()));
        local.send(Message::Open);
        let screen = buffer_to_string(&local.render_in(30, 10, cramped));
        assert!(!screen.contains("Cherry"));

        let mut portal = harness(Combo::new(fruit()).with_portal(true));
        portal.send(Message::Open);
        let screen = buffer_to_string(&portal.render_in(30, 10, cramped));
        assert!(screen.contains("Apple"));
        assert!(screen.contains("Cherry"));
    }
}
