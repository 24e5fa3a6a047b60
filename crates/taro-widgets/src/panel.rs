//! Trigger and panel presentation.
//!
//! [`Combobox::view`](crate::combobox::Combobox) builds a [`PanelModel`]
//! snapshot of its state and hands it to [`render`]. Rendering is a pure
//! projection of that snapshot; the only output besides the frame is the
//! [`HitMap`] pointer events are later resolved against.

use crate::overlay::{render_overlay, Overlay};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

const CARET_DOWN: &str = " ▾";
const CARET_UP: &str = " ▴";
const GROUP_INDENT: &str = "  ";

/// Visual style configuration for the combobox.
#[derive(Debug, Clone)]
pub struct ComboboxStyle {
    /// Trigger text when a value is shown.
    pub trigger: Style,
    /// Added on top of `trigger` while the trigger has focus.
    pub trigger_focused: Style,
    /// Trigger text when showing the dropdown title instead of a value.
    pub title: Style,
    /// Trigger text while disabled.
    pub disabled: Style,
    /// The caret glyph.
    pub caret: Style,
    /// Search input text.
    pub input: Style,
    /// Search input placeholder.
    pub input_placeholder: Style,
    /// Group header rows.
    pub group_header: Style,
    /// Ordinary rows.
    pub item: Style,
    /// The highlighted row.
    pub highlighted_item: Style,
    /// Added on top of the row style for the selected row.
    pub selected_item: Style,
    /// Footer content and its separator.
    pub footer: Style,
    /// Prefix drawn before the highlighted row.
    pub highlight_symbol: String,
}

impl Default for ComboboxStyle {
    fn default() -> Self {
        Self {
            trigger: Style::default(),
            trigger_focused: Style::default().add_modifier(Modifier::REVERSED),
            title: Style::default().add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::DarkGray),
            caret: Style::default().fg(Color::DarkGray),
            input: Style::default(),
            input_placeholder: Style::default().fg(Color::DarkGray),
            group_header: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            item: Style::default(),
            highlighted_item: Style::default().fg(Color::Black).bg(Color::LightBlue),
            selected_item: Style::default().add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::DarkGray),
            highlight_symbol: "▸ ".to_string(),
        }
    }
}

/// What a screen cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Trigger,
    Toggle,
    Input,
    /// A row, by flattened index.
    Row(usize),
    Footer,
    /// Panel chrome with no action (padding, headers, borders).
    Panel,
}

/// Screen regions recorded by the last render, for pointer hit-testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMap {
    regions: Vec<(Rect, HitTarget)>,
}

impl HitMap {
    fn push(&mut self, area: Rect, target: HitTarget) {
        if !area.is_empty() {
            self.regions.push((area, target));
        }
    }

    /// The topmost target under `(column, row)`.
    pub fn hit(&self, column: u16, row: u16) -> Option<HitTarget> {
        let pos = Position::new(column, row);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, target)| *target)
    }

    /// Area of the first region for `target`, if it was rendered.
    pub fn area_of(&self, target: HitTarget) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(_, t)| *t == target)
            .map(|(area, _)| *area)
    }
}

/// One display row of the open panel.
#[derive(Debug, Clone)]
pub enum PanelRow<'a> {
    Header(&'a str),
    Item {
        flat: usize,
        line: Line<'a>,
        highlighted: bool,
        selected: bool,
        grouped: bool,
    },
}

/// Everything the presentation needs, borrowed from the combobox.
pub struct PanelModel<'a> {
    pub is_open: bool,
    pub disabled: bool,
    pub trigger_focused: bool,
    pub input_focused: bool,
    /// Label of the selected item, if any.
    pub selected_label: Option<Line<'a>>,
    pub dropdown_title: Option<&'a Line<'static>>,
    pub searchable: bool,
    pub search_text: &'a str,
    pub placeholder: String,
    pub rows: Vec<PanelRow<'a>>,
    /// First item row to show, as a flattened index.
    pub scroll: usize,
    pub max_visible: usize,
    pub footer: Option<&'a Text<'static>>,
    pub overlay: Overlay,
    pub style: &'a ComboboxStyle,
    pub block: Option<&'a Block<'static>>,
}

/// Render trigger and (when open) panel into `area`. Returns the hit map.
pub fn render(frame: &mut Frame, area: Rect, model: &PanelModel<'_>) -> HitMap {
    let mut hits = HitMap::default();
    if area.is_empty() {
        return hits;
    }
    let trigger_area = Rect { height: 1, ..area };
    render_trigger(frame, trigger_area, model);
    hits.push(trigger_area, HitTarget::Trigger);

    if model.is_open {
        render_panel(frame, area, trigger_area, model, &mut hits);
    }
    hits
}

fn render_trigger(frame: &mut Frame, area: Rect, model: &PanelModel<'_>) {
    let style = model.style;
    let (content, content_style) = match (&model.selected_label, model.dropdown_title) {
        (Some(label), _) => (label.clone(), style.trigger),
        (None, Some(title)) => (title.clone(), style.title),
        (None, None) => (Line::default(), style.trigger),
    };
    let content_style = if model.disabled {
        style.disabled
    } else if model.trigger_focused && !model.is_open {
        content_style.patch(style.trigger_focused)
    } else {
        content_style
    };

    let caret_width = CARET_DOWN.width() as u16;
    let text_area = Rect {
        width: area.width.saturating_sub(caret_width),
        ..area
    };
    let caret_area = Rect {
        x: text_area.right(),
        width: area.width - text_area.width,
        ..area
    };
    frame.render_widget(Paragraph::new(content).style(content_style), text_area);
    frame.render_widget(
        Paragraph::new(Span::styled(CARET_DOWN, style.caret)),
        caret_area,
    );
}

fn render_panel(
    frame: &mut Frame,
    area: Rect,
    trigger_area: Rect,
    model: &PanelModel<'_>,
    hits: &mut HitMap,
) {
    let style = model.style;
    let has_title = model.dropdown_title.is_some();
    let header_rows: u16 = if model.searchable && has_title { 2 } else { 1 };
    let list_rows = u16::try_from(model.rows.len().min(model.max_visible)).unwrap_or(u16::MAX);
    let footer_rows = model
        .footer
        .map_or(0, |f| u16::try_from(f.lines.len()).unwrap_or(u16::MAX).saturating_add(1));
    let chrome: u16 = if model.block.is_some() { 2 } else { 0 };
    let height = header_rows
        .saturating_add(list_rows)
        .saturating_add(footer_rows)
        .saturating_add(chrome);
    let width = content_width(model).saturating_add(chrome);

    let Some(panel) = model
        .overlay
        .place(trigger_area, width, height, area, frame.area())
    else {
        return;
    };
    let inner = render_overlay(frame, panel, model.block);
    hits.push(panel, HitTarget::Panel);

    let mut y = inner.y;
    let row = |y: u16| Rect::new(inner.x, y, inner.width, 1);
    let fits = |y: u16| y < inner.bottom();

    // Header: title / toggle / search input.
    if model.searchable {
        if let Some(title) = model.dropdown_title.filter(|_| fits(y)) {
            render_toggle_row(frame, row(y), title.clone(), style.title, style);
            hits.push(row(y), HitTarget::Toggle);
            y += 1;
        }
        if fits(y) {
            render_input_row(frame, row(y), model, !has_title, hits);
            y += 1;
        }
    } else if fits(y) {
        let (line, line_style) = match (&model.selected_label, model.dropdown_title) {
            (Some(label), _) => (label.clone(), style.trigger),
            (None, Some(title)) => (title.clone(), style.title),
            (None, None) => (Line::default(), style.trigger),
        };
        render_toggle_row(frame, row(y), line, line_style, style);
        hits.push(row(y), HitTarget::Toggle);
        y += 1;
    }

    // Rows.
    let footer_start = inner.bottom().saturating_sub(footer_rows);
    let start = window_start(model);
    for panel_row in model.rows.iter().skip(start) {
        if y >= footer_start {
            break;
        }
        match panel_row {
            PanelRow::Header(key) => {
                frame.render_widget(
                    Paragraph::new(Span::styled(*key, style.group_header)),
                    row(y),
                );
            }
            PanelRow::Item {
                flat,
                line,
                highlighted,
                selected,
                grouped,
            } => {
                let mut row_style = if *highlighted {
                    style.highlighted_item
                } else {
                    style.item
                };
                if *selected {
                    row_style = row_style.patch(style.selected_item);
                }
                let prefix = if *highlighted {
                    style.highlight_symbol.clone()
                } else {
                    " ".repeat(style.highlight_symbol.width())
                };
                let mut spans = Vec::with_capacity(line.spans.len() + 2);
                if *grouped {
                    spans.push(Span::raw(GROUP_INDENT));
                }
                spans.push(Span::raw(prefix));
                spans.extend(line.spans.iter().cloned());
                frame.render_widget(
                    Paragraph::new(Line::from(spans)).style(row_style),
                    row(y),
                );
                hits.push(row(y), HitTarget::Row(*flat));
            }
        }
        y += 1;
    }

    // Footer: a separator, then the opaque content. Any click inside closes.
    if let Some(footer) = model.footer {
        let footer_area = Rect::new(inner.x, footer_start, inner.width, footer_rows)
            .intersection(inner);
        if !footer_area.is_empty() {
            let separator = "─".repeat(inner.width as usize);
            frame.render_widget(
                Paragraph::new(Span::styled(separator, style.footer)),
                Rect { height: 1, ..footer_area },
            );
            let content = Rect {
                y: footer_area.y + 1,
                height: footer_area.height.saturating_sub(1),
                ..footer_area
            };
            frame.render_widget(Paragraph::new(footer.clone()).style(style.footer), content);
            hits.push(footer_area, HitTarget::Footer);
        }
    }
}

fn render_toggle_row(frame: &mut Frame, area: Rect, line: Line<'_>, line_style: Style, style: &ComboboxStyle) {
    let caret_width = CARET_UP.width() as u16;
    let text_area = Rect {
        width: area.width.saturating_sub(caret_width),
        ..area
    };
    frame.render_widget(Paragraph::new(line).style(line_style), text_area);
    frame.render_widget(
        Paragraph::new(Span::styled(CARET_UP, style.caret)),
        Rect {
            x: text_area.right(),
            width: area.width - text_area.width,
            ..area
        },
    );
}

fn render_input_row(
    frame: &mut Frame,
    area: Rect,
    model: &PanelModel<'_>,
    with_toggle: bool,
    hits: &mut HitMap,
) {
    let style = model.style;
    let caret_width = if with_toggle { CARET_UP.width() as u16 } else { 0 };
    let input_area = Rect {
        width: area.width.saturating_sub(caret_width),
        ..area
    };
    let span = if model.search_text.is_empty() {
        Span::styled(model.placeholder.as_str(), style.input_placeholder)
    } else {
        Span::styled(model.search_text, style.input)
    };
    frame.render_widget(Paragraph::new(Line::from(vec![Span::raw("⌕ "), span])), input_area);
    hits.push(input_area, HitTarget::Input);

    if with_toggle {
        let toggle = Rect {
            x: input_area.right(),
            width: area.width - input_area.width,
            ..area
        };
        frame.render_widget(Paragraph::new(Span::styled(CARET_UP, style.caret)), toggle);
        hits.push(toggle, HitTarget::Toggle);
    }

    if model.input_focused {
        let offset = u16::try_from("⌕ ".width() + model.search_text.width()).unwrap_or(u16::MAX);
        let x = input_area
            .x
            .saturating_add(offset)
            .min(input_area.right().saturating_sub(1));
        frame.set_cursor_position((x, input_area.y));
    }
}

/// Widest content line, plus room for prefixes and carets.
fn content_width(model: &PanelModel<'_>) -> u16 {
    let symbol = model.style.highlight_symbol.width();
    let caret = CARET_UP.width();
    let mut width = model
        .dropdown_title
        .map_or(0, |t| t.width() + caret);
    if model.searchable {
        let text = model.search_text.width().max(model.placeholder.width());
        width = width.max("⌕ ".width() + text + caret + 1);
    } else if let Some(label) = &model.selected_label {
        width = width.max(label.width() + caret);
    }
    for row in &model.rows {
        let w = match row {
            PanelRow::Header(key) => key.width(),
            PanelRow::Item { line, grouped, .. } => {
                line.width() + symbol + if *grouped { GROUP_INDENT.len() } else { 0 }
            }
        };
        width = width.max(w);
    }
    if let Some(footer) = model.footer {
        width = width.max(footer.width());
    }
    u16::try_from(width).unwrap_or(u16::MAX)
}

/// Index into `model.rows` of the first row to draw. Starts at the scroll
/// item (or its group header, when it opens a group) and moves down far
/// enough to keep the highlighted row inside `max_visible` rows.
fn window_start(model: &PanelModel<'_>) -> usize {
    let position_of = |target: usize| {
        model.rows.iter().position(
            |r| matches!(r, PanelRow::Item { flat, .. } if *flat == target),
        )
    };
    let mut start = match position_of(model.scroll) {
        Some(p) if p > 0 && matches!(model.rows[p - 1], PanelRow::Header(_)) => p - 1,
        Some(p) => p,
        None => 0,
    };
    let highlighted = model
        .rows
        .iter()
        .position(|r| matches!(r, PanelRow::Item { highlighted: true, .. }));
    if let Some(h) = highlighted {
        let visible = model.max_visible.max(1);
        if h < start {
            start = h;
        } else if h >= start + visible {
            start = h + 1 - visible;
        }
    }
    start
}
