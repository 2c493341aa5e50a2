use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    DefaultTerminal, Frame,
};

use crate::engine::{FieldKind, Predicate, TableView, ROWS_PER_PAGE_OPTIONS};
use crate::fmt;
use crate::tui::{self, CURSOR_STYLE, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE};
use crate::views::compact_columns;

const FACET_LINES: usize = 9;

enum BrowseMode {
    Normal,
    GotoPage(String),
    Search { input: String, previous: String },
    Facet {
        field: String,
        options: Vec<String>,
        chosen: Vec<String>,
        cursor: usize,
    },
}

pub enum BrowseAction {
    Continue,
    Close,
}

/// Interactive pager over a [`TableView`]. All filtering, sorting and paging
/// goes through the view; the browser only tracks the cursor and input modes.
pub struct RecordBrowser {
    title: String,
    view: TableView,
    /// Schema indices of the columns that can take the column cursor.
    columns: Vec<usize>,
    column_cursor: usize,
    selected: usize,
    mode: BrowseMode,
    status_message: Option<String>,
    table_state: TableState,
}

impl RecordBrowser {
    pub fn new(title: &str, view: TableView) -> Self {
        let schema = view.schema();
        let columns: Vec<usize> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| f.name != schema.id_field())
            .map(|(i, _)| i)
            .collect();
        Self {
            title: title.to_string(),
            view,
            columns,
            column_cursor: 0,
            selected: 0,
            mode: BrowseMode::Normal,
            status_message: None,
            table_state: TableState::default(),
        }
    }

    pub fn view(&self) -> &TableView {
        &self.view
    }

    /// Message shown in the status line until the next key press.
    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some(msg);
    }

    pub fn run(&mut self) -> io::Result<()> {
        if self.view.records().is_empty() {
            println!("No {} found.", self.view.schema().name());
            return Ok(());
        }

        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            ratatui::restore();
            hook(info);
        }));

        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal);
        ratatui::restore();
        result
    }

    fn cursor_field(&self) -> Option<&str> {
        let idx = *self.columns.get(self.column_cursor)?;
        self.view.schema().fields().get(idx).map(|f| f.name.as_str())
    }

    /// Draw the browser into the given frame. Callable from an external event loop.
    pub fn draw_frame(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let narrow = area.width < 120;

        let panel_height: u16 = match &self.mode {
            BrowseMode::Facet { options, .. } => 1 + options.len().clamp(1, FACET_LINES) as u16,
            _ => 0,
        };

        let areas = Layout::vertical([
            Constraint::Length(1),            // title
            Constraint::Fill(1),              // table
            Constraint::Length(panel_height), // facet picker
            Constraint::Length(1),            // status
            Constraint::Length(1),            // keys
        ])
        .split(area);
        let title_area = areas[0];
        let table_area = areas[1];
        let panel_area = areas[2];
        let status_area = areas[3];
        let keys_area = areas[4];

        let schema = self.view.schema();
        let sort = self.view.sort();

        // Title
        let title = if sort.is_active() {
            let label = schema.field(&sort.key).map_or(sort.key.as_str(), |f| f.label.as_str());
            format!("{} (sorted by {} {})", self.title, label, sort.direction.arrow())
        } else {
            self.title.clone()
        };
        frame.render_widget(Paragraph::new(title).style(HEADER_STYLE), title_area);

        // Visible columns
        let shown: Vec<usize> = if narrow {
            let compact = compact_columns(schema);
            self.columns
                .iter()
                .copied()
                .filter(|&i| compact.contains(&schema.fields()[i].name.as_str()))
                .collect()
        } else {
            self.columns.clone()
        };

        let widths: Vec<Constraint> = shown
            .iter()
            .map(|&i| match schema.fields()[i].kind {
                FieldKind::Date => Constraint::Length(10),
                FieldKind::Number => Constraint::Length(14),
                FieldKind::Text => Constraint::Fill(1),
            })
            .collect();

        // Text columns share what the fixed columns leave over
        let fixed: u16 = widths
            .iter()
            .map(|c| match c {
                Constraint::Length(n) => *n,
                _ => 0,
            })
            .sum();
        let fill_count = widths
            .iter()
            .filter(|c| matches!(c, Constraint::Fill(_)))
            .count()
            .max(1) as u16;
        let spacing = shown.len().saturating_sub(1) as u16;
        let fill_width = (table_area.width.saturating_sub(fixed + spacing) / fill_count).max(8) as usize;

        let derived = self.view.derive();
        let rows: Vec<Row> = derived
            .records
            .iter()
            .map(|record| {
                let mut height = 1u16;
                let cells: Vec<Cell> = shown
                    .iter()
                    .map(|&i| {
                        let field = &schema.fields()[i];
                        let text = record
                            .value(i)
                            .map(|v| fmt::cell(field, v))
                            .unwrap_or_default();
                        if field.kind == FieldKind::Text {
                            let (wrapped, lines) = tui::wrap_text(&text, fill_width);
                            height = height.max(lines);
                            Cell::from(wrapped)
                        } else if field.money {
                            let color = match record.value(i).and_then(|v| v.as_number()) {
                                Some(n) if n < 0.0 => Color::Red,
                                _ => Color::Green,
                            };
                            Cell::from(Span::styled(text, Style::default().fg(color)))
                        } else {
                            Cell::from(text)
                        }
                    })
                    .collect();
                Row::new(cells).height(height)
            })
            .collect();

        let cursor_idx = self.columns.get(self.column_cursor).copied();
        let header: Vec<Cell> = shown
            .iter()
            .map(|&i| {
                let field = &schema.fields()[i];
                let mut label = field.label.clone();
                if sort.is_active() && sort.key == field.name {
                    label = format!("{label} {}", sort.direction.arrow());
                }
                if self.view.filters().get(&field.name).is_some() {
                    label.push('*');
                }
                if Some(i) == cursor_idx {
                    Cell::from(label).style(CURSOR_STYLE)
                } else {
                    Cell::from(label)
                }
            })
            .collect();

        self.selected = self.selected.min(derived.records.len().saturating_sub(1));
        self.table_state.select(Some(self.selected));
        let table = Table::new(rows, widths)
            .header(Row::new(header).style(HEADER_STYLE).bottom_margin(1))
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE);

        frame.render_stateful_widget(table, table_area, &mut self.table_state);

        // Facet picker
        if let BrowseMode::Facet {
            field,
            options,
            chosen,
            cursor,
        } = &self.mode
        {
            let mut lines = vec![Line::from(format!("  Filter {field}:"))];
            if options.is_empty() {
                lines.push(Line::from(Span::styled(
                    "    (no values)",
                    Style::default().fg(Color::DarkGray),
                )));
            } else {
                let start = cursor.saturating_sub(FACET_LINES - 1);
                for (i, option) in options.iter().enumerate().skip(start).take(FACET_LINES) {
                    let marker = if i == *cursor { ">" } else { " " };
                    let check = if chosen.contains(option) { "x" } else { " " };
                    lines.push(Line::from(format!("  {marker} [{check}] {option}")));
                }
            }
            frame.render_widget(Paragraph::new(lines), panel_area);
        }

        // Status line
        let mut status = format!(
            "Page {} / {} | {} of {} records | {} per page",
            derived.current_page,
            derived.total_pages.max(1),
            derived.total,
            self.view.records().len(),
            derived.rows_per_page,
        );
        let filters = self.view.filters().describe();
        if !filters.is_empty() {
            status.push_str(&format!(" | {filters}"));
        }
        if let Some(ref msg) = self.status_message {
            status.push_str(&format!(" | {msg}"));
        }
        frame.render_widget(Paragraph::new(status).style(FOOTER_STYLE), status_area);

        // Keys / input prompt
        let keys_widget = match &self.mode {
            BrowseMode::Normal => Paragraph::new(
                "\u{2191}/\u{2193}:select  n/\u{2192}:next  p/\u{2190}:prev  tab:column  s:sort  r:reverse  f:facet  /:search  +:rows  g:page  c:clear  q:quit",
            )
            .style(FOOTER_STYLE),
            BrowseMode::GotoPage(input) => Paragraph::new(format!("Go to page: {input}\u{2588}")),
            BrowseMode::Search { input, .. } => {
                Paragraph::new(format!("Search: {input}\u{2588}"))
            }
            BrowseMode::Facet { .. } => {
                Paragraph::new("Space=toggle, Enter=apply, Esc=cancel").style(FOOTER_STYLE)
            }
        };
        frame.render_widget(keys_widget, keys_area);
    }

    /// Handle a key event. Returns a BrowseAction indicating what the caller should do.
    pub fn handle_key_event(&mut self, code: KeyCode) -> BrowseAction {
        self.status_message = None;

        match &self.mode {
            BrowseMode::Normal => match code {
                KeyCode::Char('q') | KeyCode::Esc => return BrowseAction::Close,
                KeyCode::Down => {
                    let on_page = self.view.derive().records.len();
                    if self.selected + 1 < on_page {
                        self.selected += 1;
                    }
                }
                KeyCode::Up => {
                    self.selected = self.selected.saturating_sub(1);
                }
                KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => {
                    if self.view.next_page() {
                        self.selected = 0;
                    } else {
                        self.status_message = Some("Already on the last page".to_string());
                    }
                }
                KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => {
                    if self.view.prev_page() {
                        self.selected = 0;
                    } else {
                        self.status_message = Some("Already on the first page".to_string());
                    }
                }
                KeyCode::Home => {
                    self.view.set_page(1);
                    self.selected = 0;
                }
                KeyCode::End => {
                    self.view.set_page(self.view.total_pages());
                    self.selected = 0;
                }
                KeyCode::Tab => {
                    if !self.columns.is_empty() {
                        self.column_cursor = (self.column_cursor + 1) % self.columns.len();
                    }
                }
                KeyCode::BackTab => {
                    if !self.columns.is_empty() {
                        self.column_cursor =
                            (self.column_cursor + self.columns.len() - 1) % self.columns.len();
                    }
                }
                KeyCode::Char('s') => {
                    if let Some(field) = self.cursor_field().map(str::to_string) {
                        self.view.set_sort(&field);
                        self.selected = 0;
                    }
                }
                KeyCode::Char('r') => {
                    let key = self.view.sort().key.clone();
                    if key.is_empty() {
                        self.status_message = Some("Not sorted".to_string());
                    } else {
                        self.view.set_sort(&key);
                        self.selected = 0;
                    }
                }
                KeyCode::Char('x') => {
                    self.view.clear_sort();
                    self.selected = 0;
                }
                KeyCode::Char('+') => self.cycle_rows_per_page(),
                KeyCode::Char('/') => {
                    let previous = self.view.filters().global().to_string();
                    self.mode = BrowseMode::Search {
                        input: previous.clone(),
                        previous,
                    };
                }
                KeyCode::Char('g') => {
                    self.mode = BrowseMode::GotoPage(String::new());
                }
                KeyCode::Char('f') => self.open_facet(),
                KeyCode::Char('c') => {
                    self.view.clear_filters();
                    self.selected = 0;
                    self.status_message = Some("Filters cleared".to_string());
                }
                _ => {}
            },
            BrowseMode::GotoPage(_) => match code {
                KeyCode::Esc => self.mode = BrowseMode::Normal,
                KeyCode::Enter => self.submit_goto(),
                KeyCode::Backspace => {
                    if let BrowseMode::GotoPage(s) = &mut self.mode {
                        s.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let BrowseMode::GotoPage(s) = &mut self.mode {
                        s.push(c);
                    }
                }
                _ => {}
            },
            BrowseMode::Search { .. } => self.handle_search_key(code),
            BrowseMode::Facet { .. } => self.handle_facet_key(code),
        }
        BrowseAction::Continue
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        loop {
            terminal.draw(|frame| self.draw_frame(frame))?;

            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            {
                if kind != KeyEventKind::Press {
                    continue;
                }

                if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                    break;
                }

                match self.handle_key_event(code) {
                    BrowseAction::Close => break,
                    BrowseAction::Continue => {}
                }
            }
        }
        Ok(())
    }

    fn cycle_rows_per_page(&mut self) {
        let current = self.view.rows_per_page();
        let next = ROWS_PER_PAGE_OPTIONS
            .iter()
            .copied()
            .find(|&n| n > current)
            .unwrap_or(ROWS_PER_PAGE_OPTIONS[0]);
        self.view.set_rows_per_page(next);
        self.selected = 0;
    }

    fn submit_goto(&mut self) {
        let mode = std::mem::replace(&mut self.mode, BrowseMode::Normal);
        if let BrowseMode::GotoPage(input) = mode {
            let total = self.view.total_pages();
            match input.trim().parse::<usize>() {
                Ok(page) if self.view.set_page(page) => self.selected = 0,
                _ => {
                    self.status_message =
                        Some(format!("No page {} (1-{})", input.trim(), total.max(1)));
                }
            }
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.mode = BrowseMode::Normal,
            KeyCode::Esc => {
                let mode = std::mem::replace(&mut self.mode, BrowseMode::Normal);
                if let BrowseMode::Search { previous, .. } = mode {
                    self.view.set_global_filter(&previous);
                }
            }
            KeyCode::Backspace | KeyCode::Char(_) => {
                let text = match &mut self.mode {
                    BrowseMode::Search { input, .. } => {
                        match code {
                            KeyCode::Char(c) => input.push(c),
                            _ => {
                                input.pop();
                            }
                        }
                        input.clone()
                    }
                    _ => return,
                };
                self.view.set_global_filter(&text);
            }
            _ => {}
        }
        self.selected = 0;
    }

    fn open_facet(&mut self) {
        let Some(field) = self.cursor_field().map(str::to_string) else {
            return;
        };
        let is_text = self
            .view
            .schema()
            .field(&field)
            .is_some_and(|f| f.kind == FieldKind::Text);
        if !is_text {
            self.status_message = Some(format!("{field} is not a text column"));
            return;
        }
        let chosen = match self.view.filters().get(&field) {
            Some(Predicate::OneOf(values)) => values.clone(),
            _ => Vec::new(),
        };
        let mut options = self.view.distinct_values(&field);
        options.sort();
        self.mode = BrowseMode::Facet {
            field,
            options,
            chosen,
            cursor: 0,
        };
    }

    fn handle_facet_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.mode = BrowseMode::Normal,
            KeyCode::Enter => {
                let mode = std::mem::replace(&mut self.mode, BrowseMode::Normal);
                if let BrowseMode::Facet { field, chosen, .. } = mode {
                    if chosen.is_empty() {
                        self.view.clear_filter(&field);
                    } else {
                        self.view.set_filter(&field, Predicate::OneOf(chosen));
                    }
                    self.selected = 0;
                }
            }
            _ => {
                if let BrowseMode::Facet {
                    options,
                    chosen,
                    cursor,
                    ..
                } = &mut self.mode
                {
                    match code {
                        KeyCode::Down if *cursor + 1 < options.len() => *cursor += 1,
                        KeyCode::Up => *cursor = cursor.saturating_sub(1),
                        KeyCode::Char(' ') => {
                            if let Some(option) = options.get(*cursor) {
                                if let Some(pos) = chosen.iter().position(|c| c == option) {
                                    chosen.remove(pos);
                                } else {
                                    chosen.push(option.clone());
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}
