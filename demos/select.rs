//! # Select Example
//!
//! A page of comboboxes, one per configuration:
//! - plain, searchable, disabled
//! - searchable with a dropdown title, search placeholder and footer
//! - titled but not searchable
//! - grouped options
//! - a portal panel escaping its cramped container
//!
//! Each control's value is owned by the app: `Changed` notifications are
//! applied with `set_value`. Tab / Shift+Tab move focus, `q` or Ctrl+C quits.
//! Set `TARO_LOG=debug` to see state transitions in `select.log`.
//!
//! Run with: `cargo run --example select`

use std::sync::Mutex;
use taro::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use taro::ratatui::layout::Rect;
use taro::ratatui::style::{Color, Modifier, Style};
use taro::ratatui::text::{Line, Span};
use taro::ratatui::widgets::{Block, Borders, Paragraph};
use taro::ratatui::Frame;
use taro::widgets::combobox::{self, Combobox};
use taro::widgets::focus::FocusTarget;
use taro::widgets::item::Item;
use taro::{log_to_file, Command, Component, Model, ProgramOptions, TerminalEvent};
use tracing_subscriber::EnvFilter;

type Select = Combobox<u32, &'static str>;

const LABEL_WIDTH: u16 = 34;
const CONTROL_WIDTH: u16 = 30;
const ROW_SPACING: u16 = 3;

struct SelectApp {
    selects: Vec<(&'static str, Select)>,
    focused: usize,
}

#[derive(Debug)]
enum Msg {
    Select(usize, combobox::Message<u32>),
    Mouse(MouseEvent),
    FocusNext,
    FocusPrev,
    Quit,
}

fn numbers() -> Vec<Item<u32, &'static str>> {
    vec![Item::new(1, "One"), Item::new(2, "Two"), Item::new(3, "Three")]
}

fn select() -> Select {
    Combobox::new(numbers())
        .with_item_to_string(|item: Option<&Item<u32, &'static str>>| {
            item.map(|i| i.label.to_string()).unwrap_or_default()
        })
        .with_block(Block::default().borders(Borders::ALL))
}

fn footer() -> Line<'static> {
    Line::from(Span::styled(
        "[ Click me ]",
        Style::default().fg(Color::Cyan),
    ))
}

impl SelectApp {
    fn control_area(&self, index: usize, frame: Rect) -> Rect {
        let y = 1 + index as u16 * ROW_SPACING;
        let (label, _) = &self.selects[index];
        let height = if *label == "portal" {
            1
        } else {
            frame.bottom().saturating_sub(y)
        };
        Rect::new(LABEL_WIDTH, y, CONTROL_WIDTH, height).intersection(frame)
    }

    fn move_focus(&mut self, next: usize) -> Command<Msg> {
        let previous = self.focused;
        self.focused = next;
        let blur = self.selects[previous]
            .1
            .update(combobox::Message::Blur)
            .map(move |m| Msg::Select(previous, m));
        let focus = self.selects[next]
            .1
            .update(combobox::Message::FocusChanged(FocusTarget::Trigger))
            .map(move |m| Msg::Select(next, m));
        Command::batch([blur, focus])
    }

    fn open_index(&self) -> Option<usize> {
        self.selects.iter().position(|(_, s)| s.is_open())
    }
}

impl Model for SelectApp {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let selects = vec![
            ("plain", select().with_value(Some(1))),
            ("searchable", select().with_value(Some(1)).with_searchable(true)),
            (
                "disabled",
                select()
                    .with_value(Some(1))
                    .with_searchable(true)
                    .with_disabled(true),
            ),
            (
                "searchable with title",
                select()
                    .with_searchable(true)
                    .with_dropdown_title("Sample Select Title")
                    .with_search_placeholder("Sample search placeholder...")
                    .with_footer(footer()),
            ),
            (
                "title, not searchable",
                select()
                    .with_dropdown_title("Sample Select Title")
                    .with_footer(footer()),
            ),
            (
                "option groups",
                select()
                    .with_value(Some(1))
                    .with_group_by(|item: &Item<u32, &'static str>| {
                        format!("Starts with {}", &item.label[..1])
                    }),
            ),
            (
                "portal",
                select()
                    .with_value(Some(2))
                    .with_portal(true)
                    .with_trigger_title("Rendered against the whole screen"),
            ),
        ];
        let mut app = SelectApp {
            selects,
            focused: 0,
        };
        let cmd = app.selects[0]
            .1
            .update(combobox::Message::FocusChanged(FocusTarget::Trigger))
            .map(|m| Msg::Select(0, m));
        (app, cmd)
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Select(index, combobox::Message::Changed(value)) => {
                tracing::info!(control = self.selects[index].0, value, "value changed");
                self.selects[index].1.set_value(Some(value));
                Command::none()
            }
            Msg::Select(index, combobox::Message::Opened) => {
                self.focused = index;
                Command::none()
            }
            Msg::Select(
                _,
                combobox::Message::Closed | combobox::Message::FocusTrigger,
            ) => Command::none(),
            Msg::Select(index, m) => self.selects[index]
                .1
                .update(m)
                .map(move |m| Msg::Select(index, m)),
            Msg::Mouse(mouse) => {
                // An open panel may cover other triggers; it gets the click alone.
                let targets: Vec<usize> = match self.open_index() {
                    Some(open) => vec![open],
                    None => (0..self.selects.len()).collect(),
                };
                Command::batch(targets.into_iter().map(|index| {
                    self.selects[index]
                        .1
                        .update(combobox::Message::Mouse(mouse))
                        .map(move |m| Msg::Select(index, m))
                }))
            }
            Msg::FocusNext => {
                let next = (self.focused + 1) % self.selects.len();
                self.move_focus(next)
            }
            Msg::FocusPrev => {
                let len = self.selects.len();
                self.move_focus((self.focused + len - 1) % len)
            }
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let header = Line::from(vec![
            Span::styled(" taro select ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                " tab: next  shift+tab: prev  q: quit",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(header), Rect { height: 1, ..area });

        for (index, (label, select)) in self.selects.iter().enumerate() {
            let control = self.control_area(index, area);
            let value = select
                .selected_item()
                .map(|item| item.value.to_string())
                .unwrap_or_else(|| "none".into());
            let style = if index == self.focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let text = Line::from(vec![
                Span::styled(format!(" {label}"), style),
                Span::styled(format!("  (value: {value})"), Style::default().fg(Color::DarkGray)),
            ]);
            frame.render_widget(
                Paragraph::new(text),
                Rect::new(0, control.y, LABEL_WIDTH, 1).intersection(area),
            );
        }

        // Open panels float above later rows, so draw the open one last.
        let open = self.open_index();
        for (index, (_, select)) in self.selects.iter().enumerate() {
            if Some(index) != open {
                select.view(frame, self.control_area(index, area));
            }
        }
        if let Some(index) = open {
            self.selects[index].1.view(frame, self.control_area(index, area));
        }

        let focused = &self.selects[self.focused].1;
        if let Some(title) = focused.trigger_title() {
            let status = Rect::new(0, area.bottom().saturating_sub(1), area.width, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {title}"),
                    Style::default().fg(Color::DarkGray),
                )),
                status,
            );
        }
    }

    fn event(&self, event: TerminalEvent) -> Option<Msg> {
        if event.is_key_release() {
            return None;
        }
        match event {
            TerminalEvent::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }) => Some(Msg::Quit),
            TerminalEvent::Key(KeyEvent {
                code: KeyCode::Tab, ..
            }) => Some(Msg::FocusNext),
            TerminalEvent::Key(KeyEvent {
                code: KeyCode::BackTab,
                ..
            }) => Some(Msg::FocusPrev),
            TerminalEvent::Key(KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }) if !self.selects[self.focused].1.is_open() => Some(Msg::Quit),
            TerminalEvent::Key(key) => Some(Msg::Select(
                self.focused,
                combobox::Message::KeyPress(key),
            )),
            TerminalEvent::Mouse(mouse) => Some(Msg::Mouse(mouse)),
            TerminalEvent::FocusLost => Some(Msg::Select(self.focused, combobox::Message::Blur)),
            _ => None,
        }
    }
}

fn init_logging(options: &ProgramOptions) -> std::io::Result<()> {
    let Some(path) = &options.log_file else {
        return Ok(());
    };
    let file = log_to_file(path)?;
    let filter = EnvFilter::try_from_env("TARO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = ProgramOptions {
        mouse_capture: true,
        log_file: Some("select.log".into()),
        ..ProgramOptions::default()
    };
    init_logging(&options)?;
    let app = taro::run_with::<SelectApp>((), options).await?;
    for (label, select) in &app.selects {
        if let Some(value) = select.value() {
            println!("{label}: {value}");
        }
    }
    Ok(())
}
