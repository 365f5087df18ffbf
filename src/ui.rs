use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
};

use crate::domain::AppConfig;
use crate::highlight::segments;
use crate::model::{Modus, Model, VisibleRow};

pub const SEARCHBAR_HEIGHT: u16 = 3;
pub const STATUSLINE_HEIGHT: u16 = 1;
pub const PAGER_HEIGHT: u16 = 1;
pub const COLUMN_WIDTH_MARGIN: usize = 2;
pub const MAX_COLUMN_WIDTH: usize = 40;
pub const EMPTY_CELL: &str = "-";
const SEARCH_PROMPT: &str = "Search: ";

#[derive(Debug)]
pub struct TableUI {
    highlight: Style,
    matched_cell: Style,
    selected_row: Style,
}

impl TableUI {
    pub fn new(_cfg: &AppConfig) -> Self {
        Self {
            highlight: Style::new().fg(Color::Black).bg(Color::Yellow),
            matched_cell: Style::new().bg(Color::Rgb(30, 40, 70)),
            selected_row: Style::new().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let [search_area, table_area, pager_area, status_area] = Layout::vertical([
            Constraint::Length(SEARCHBAR_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(PAGER_HEIGHT),
            Constraint::Length(STATUSLINE_HEIGHT),
        ])
        .areas(frame.area());

        self.draw_search_bar(model, frame, search_area);
        self.draw_table(model, frame, table_area);
        self.draw_pager(model, frame, pager_area);
        self.draw_status(model, frame, status_area);

        match model.modus() {
            Modus::FilePicker => self.draw_file_picker(model, frame),
            Modus::Popup => self.draw_popup(model.popup_message(), frame),
            Modus::Table | Modus::SearchInput => {}
        }
    }

    fn draw_search_bar(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            " csvseek ".bold(),
            model.selected_file().unwrap_or("no file").yellow(),
            " ".into(),
        ]);
        let scope = Line::from(vec![
            " in: ".into(),
            model.scope().to_string().cyan().bold(),
            " <Tab> ".into(),
        ]);
        let mut block = Block::bordered()
            .title(title)
            .title(scope.right_aligned())
            .border_set(border::ROUNDED);
        if let Some(label) = model.results_label() {
            block = block.title_bottom(Line::from(format!(" {label} ")).right_aligned());
        }
        let editing = model.modus() == Modus::SearchInput;
        if editing {
            block = block.border_style(Style::new().fg(Color::Blue));
        }

        let term = model.search_term();
        let line = if term.is_empty() && !editing {
            Line::from(vec![SEARCH_PROMPT.into(), "press / to search your data...".dark_gray()])
        } else {
            Line::from(vec![SEARCH_PROMPT.into(), term.to_string().bold()])
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if editing {
            let x = area.x + 1 + SEARCH_PROMPT.len() as u16 + model.input().curser_pos as u16;
            frame.set_cursor_position((x, area.y + 1));
        }
    }

    fn draw_table(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let Some(table) = model.table() else {
            let text = match model.error() {
                Some(err) => Text::from(err.to_string()).red(),
                None => Text::from("No data loaded. Press <o> to choose a CSV file.").dark_gray(),
            };
            frame.render_widget(
                Paragraph::new(text)
                    .centered()
                    .wrap(Wrap { trim: true })
                    .block(Block::bordered().border_set(border::ROUNDED)),
                area,
            );
            return;
        };

        let visible = model.visible_rows();
        let headers = table.headers();
        let widths = column_widths(headers, &visible);
        let term = model.search_term();

        let header = Row::new(
            std::iter::once(Cell::from("#"))
                .chain(headers.iter().map(|h| Cell::from(h.as_str())))
                .collect::<Vec<_>>(),
        )
        .style(Style::new().bold().underlined());

        let rows: Vec<Row> = visible
            .iter()
            .map(|vr| {
                let number = Cell::from(vr.number.to_string()).dark_gray();
                let cells = headers.iter().map(|h| self.render_cell(vr, h, term));
                Row::new(std::iter::once(number).chain(cells).collect::<Vec<_>>())
            })
            .collect();

        let title = Line::from(format!(" Data Results ({} records) ", model.display_len()));
        let block = Block::bordered()
            .title(title.bold())
            .border_set(border::ROUNDED);

        let mut constraints = vec![Constraint::Length(index_width(&visible))];
        constraints.extend(widths.into_iter().map(|w| Constraint::Length(w as u16)));

        let widget = Table::new(rows, constraints)
            .header(header)
            .block(block)
            .row_highlight_style(self.selected_row);
        let mut state = TableState::default().with_selected(Some(model.curser_row()));
        if visible.is_empty() {
            state.select(None);
        }
        frame.render_stateful_widget(widget, area, &mut state);
    }

    fn render_cell<'a>(&self, vr: &VisibleRow<'a>, column: &str, term: &str) -> Cell<'a> {
        let value = vr.row.get(column).map(|c| c.to_string()).unwrap_or_default();
        if value.is_empty() {
            return Cell::from(EMPTY_CELL).dark_gray();
        }
        let matched = !term.is_empty() && vr.matched.iter().any(|m| m == column);
        if !matched {
            return Cell::from(value);
        }
        let spans: Vec<Span> = segments(&value, term)
            .into_iter()
            .map(|s| {
                if s.matched {
                    Span::styled(s.text.to_string(), self.highlight)
                } else {
                    Span::raw(s.text.to_string())
                }
            })
            .collect();
        Cell::from(Line::from(spans)).style(self.matched_cell)
    }

    fn draw_pager(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let pager = model.pager();
        if !pager.is_paged() {
            return;
        }
        let prev = if pager.has_prev() { "<Left> ".blue() } else { "       ".into() };
        let next = if pager.has_next() { " <Right>".blue() } else { "".into() };
        let line = Line::from(vec![
            pager.summary().into(),
            "  ".into(),
            prev,
            pager.page_label().bold(),
            next,
            format!("  {} per page <+>", pager.page_size()).dark_gray(),
        ]);
        frame.render_widget(Paragraph::new(line).centered(), area);
    }

    fn draw_status(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let line = match model.error() {
            Some(err) if model.table().is_some() => Line::from(err.to_string().red()),
            _ => Line::from(vec![
                model.status_message().to_string().into(),
                "  <?> help  <q> quit".dark_gray(),
            ]),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_file_picker(&self, model: &Model, frame: &mut Frame) {
        let area = popup_area(frame.area(), 50, 50);
        let items: Vec<ListItem> = model
            .files()
            .iter()
            .map(|f| {
                let marker = if Some(f.as_str()) == model.selected_file() { "* " } else { "  " };
                ListItem::new(format!("{marker}{f}"))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::bordered()
                    .title(" Select CSV File ".bold())
                    .title_bottom(Line::from(" <Enter> open  <Esc> close ").centered())
                    .border_set(border::THICK),
            )
            .highlight_style(self.selected_row);
        let mut state = ListState::default().with_selected(Some(model.file_cursor()));
        frame.render_widget(Clear, area);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_popup(&self, message: &str, frame: &mut Frame) {
        let area = popup_area(frame.area(), 60, 60);
        let popup = Paragraph::new(message.to_string())
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .title(" Help ".bold())
                    .title_bottom(Line::from(" <Esc> close ").centered())
                    .border_set(border::THICK),
            );
        frame.render_widget(Clear, area);
        frame.render_widget(popup, area);
    }
}

fn index_width(visible: &[VisibleRow]) -> u16 {
    let widest = visible
        .iter()
        .map(|vr| vr.number.to_string().len())
        .max()
        .unwrap_or(1);
    std::cmp::max(widest, 1) as u16 + 1
}

/// Width per column: widest of header and the visible values, capped.
pub fn column_widths(headers: &[String], visible: &[VisibleRow]) -> Vec<usize> {
    headers
        .iter()
        .map(|h| {
            let widest_value = visible
                .iter()
                .map(|vr| {
                    vr.row
                        .get(h)
                        .map(|c| c.to_string().chars().count())
                        .unwrap_or(0)
                })
                .max()
                .unwrap_or(0);
            let width = std::cmp::max(h.chars().count(), widest_value) + COLUMN_WIDTH_MARGIN;
            std::cmp::min(width, MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}
