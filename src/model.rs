use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use std::time::Instant;
use tracing::{debug, error, info, trace};

use crate::domain::{AppConfig, Error, HELP_TEXT, Message};
use crate::export::{export, write_export};
use crate::inputter::{InputResult, Inputter};
use crate::loader::{FileAccess, available_files, load_table};
use crate::pagination::Pager;
use crate::search::{MatchResult, SearchScope, search};
use crate::table::{Row, Table};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Status {
    Empty,
    Ready,
    Quitting,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Modus {
    Table,
    SearchInput,
    FilePicker,
    Popup,
}

/// Owned copy of a [`MatchResult`] without the row reference, kept between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMatch {
    pub index: usize,
    pub columns: Vec<String>,
}

impl From<MatchResult<'_>> for RowMatch {
    fn from(m: MatchResult<'_>) -> Self {
        RowMatch {
            index: m.index,
            columns: m.matched_columns.into_iter().map(str::to_string).collect(),
        }
    }
}

/// A row on the current page, ready for rendering.
pub struct VisibleRow<'a> {
    /// 1-based position of the row in the file.
    pub number: usize,
    pub row: &'a Row,
    /// Columns to highlight. Empty when no search is active.
    pub matched: &'a [String],
}

pub struct Model {
    config: AppConfig,
    access: Box<dyn FileAccess>,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    files: Vec<String>,
    file_cursor: usize,
    selected_file: Option<String>,
    table: Option<Table>,
    input: Inputter,
    last_input: InputResult,
    scope: SearchScope,
    matches: Vec<RowMatch>,
    pager: Pager,
    curser_row: usize,
    error: Option<String>,
    popup_message: String,
    status_message: String,
    last_status_message_update: Instant,
    clipboard: Option<Clipboard>,
}

impl Model {
    pub fn init(config: &AppConfig, access: Box<dyn FileAccess>) -> Self {
        let files = available_files(access.as_ref(), &config.files);
        info!("{} files available", files.len());

        let mut model = Self {
            config: config.clone(),
            access,
            status: Status::Empty,
            modus: Modus::Table,
            previous_modus: Modus::Table,
            files,
            file_cursor: 0,
            selected_file: None,
            table: None,
            input: Inputter::default(),
            last_input: InputResult::default(),
            scope: SearchScope::All,
            matches: Vec::new(),
            pager: Pager::new(config.page_size),
            curser_row: 0,
            error: None,
            popup_message: String::new(),
            status_message: "Started csvseek!".to_string(),
            last_status_message_update: Instant::now(),
            clipboard: None,
        };

        // Pick the first file right away
        if let Some(first) = model.files.first().cloned() {
            model.load_data_file(&first);
        } else {
            model.set_status_message(format!(
                "No CSV files found in {}",
                model.config.data_dir.display()
            ));
        }
        model
    }

    /// Loads `name` and replaces the current table. Failures clear the table
    /// and are kept as the error message.
    pub fn load_data_file(&mut self, name: &str) {
        let start_time = Instant::now();
        self.error = None;
        self.selected_file = Some(name.to_string());
        if let Some(pos) = self.files.iter().position(|f| f == name) {
            self.file_cursor = pos;
        }

        match load_table(self.access.as_ref(), name) {
            Ok(table) => {
                let loading_duration = start_time.elapsed().as_millis();
                info!("Loading {name} took {loading_duration}ms ...");
                self.table = Some(table);
                self.status = Status::Ready;
                self.input.clear();
                self.last_input = self.input.get();
                self.scope = SearchScope::All;
                self.refresh_search();
                self.set_status_message(format!("Loaded {name} in {loading_duration}ms ..."));
            }
            Err(e) => {
                error!("Loading {name} failed: {e}");
                self.table = None;
                self.status = Status::Empty;
                self.matches.clear();
                self.pager.reset(0);
                self.error = Some(e.to_string());
            }
        }
    }

    // Recomputes the matches from scratch for the current term and scope.
    fn refresh_search(&mut self) {
        let start_time = Instant::now();
        self.matches = match &self.table {
            Some(table) => search(table, self.search_term(), &self.scope)
                .into_iter()
                .map(RowMatch::from)
                .collect(),
            None => Vec::new(),
        };
        self.pager.reset(self.display_len());
        self.curser_row = 0;
        debug!(
            "Search {:?} in {} took {}ms, {} matches",
            self.search_term(),
            self.scope,
            start_time.elapsed().as_millis(),
            self.matches.len()
        );
    }

    // -------------------- Accessors used for rendering ---------------------- //

    pub fn modus(&self) -> Modus {
        self.modus
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn file_cursor(&self) -> usize {
        self.file_cursor
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.selected_file.as_deref()
    }

    pub fn search_term(&self) -> &str {
        self.input.value()
    }

    pub fn input(&self) -> &InputResult {
        &self.last_input
    }

    pub fn scope(&self) -> &SearchScope {
        &self.scope
    }

    pub fn matches(&self) -> &[RowMatch] {
        &self.matches
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn curser_row(&self) -> usize {
        self.curser_row
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn popup_message(&self) -> &str {
        &self.popup_message
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn last_status_message_update(&self) -> Instant {
        self.last_status_message_update
    }

    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::SearchInput
    }

    fn is_searching(&self) -> bool {
        !self.search_term().is_empty()
    }

    /// Number of rows shown: every row without a term, the matches otherwise.
    pub fn display_len(&self) -> usize {
        match &self.table {
            Some(_) if self.is_searching() => self.matches.len(),
            Some(table) => table.nrows(),
            None => 0,
        }
    }

    /// Rows shown in order, paired with their matched columns.
    pub fn display_rows(&self) -> Vec<(usize, &[String])> {
        let Some(table) = &self.table else {
            return Vec::new();
        };
        if self.is_searching() {
            self.matches
                .iter()
                .map(|m| (m.index, m.columns.as_slice()))
                .collect()
        } else {
            (0..table.nrows()).map(|idx| (idx, &[][..])).collect()
        }
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        let Some(table) = &self.table else {
            return Vec::new();
        };
        let rows = self.display_rows();
        let range = self.pager.range();
        rows[range]
            .iter()
            .map(|&(idx, matched)| VisibleRow {
                number: idx + 1,
                row: &table.rows()[idx],
                matched,
            })
            .collect()
    }

    /// "Found N results" line, `None` while no term is entered.
    pub fn results_label(&self) -> Option<String> {
        if !self.is_searching() {
            return None;
        }
        let count = self.matches.len();
        let mut label = format!("Found {} result{}", count, if count == 1 { "" } else { "s" });
        if let SearchScope::Column(name) = &self.scope {
            label.push_str(&format!(" in \"{name}\""));
        }
        Some(label)
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Instant::now();
        trace!("Status: {}", self.status_message);
    }

    pub fn quit(&mut self) {
        self.status = Status::Quitting;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), Error> {
        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);
        match self.modus {
            Modus::Table => match msg {
                Message::Quit => self.quit(),
                Message::MoveUp => self.move_selection_up(),
                Message::MoveDown => self.move_selection_down(),
                Message::NextPage => self.next_page(),
                Message::PrevPage => self.prev_page(),
                Message::CyclePageSize => self.cycle_page_size(),
                Message::CycleScope => self.cycle_scope(),
                Message::Search => self.enter_search_mode(),
                Message::Exit => self.clear_search(),
                Message::OpenFiles => self.open_file_picker(),
                Message::Reload => self.reload(),
                Message::Export => self.export_view(),
                Message::CopyRow => self.copy_selected_row(),
                Message::Help => self.show_popup(HELP_TEXT.to_string()),
                _ => (),
            },
            Modus::SearchInput => match msg {
                Message::RawKey(key) => self.raw_input(key),
                Message::CycleScope => self.cycle_scope(),
                _ => (),
            },
            Modus::FilePicker => match msg {
                Message::Quit => self.quit(),
                Message::MoveUp => self.file_cursor = self.file_cursor.saturating_sub(1),
                Message::MoveDown => {
                    if self.file_cursor + 1 < self.files.len() {
                        self.file_cursor += 1;
                    }
                }
                Message::Enter => self.pick_file(),
                Message::Exit | Message::OpenFiles => self.exit(),
                _ => (),
            },
            Modus::Popup => match msg {
                Message::Quit => self.quit(),
                Message::Exit | Message::Enter | Message::Help => self.exit(),
                _ => (),
            },
        }
        Ok(())
    }

    // -------------------- Control handling functions ---------------------- //

    fn exit(&mut self) {
        trace!("Leaving {:?} ...", self.modus);
        self.modus = match self.modus {
            Modus::Popup => self.previous_modus,
            _ => Modus::Table,
        };
        self.previous_modus = Modus::Table;
    }

    fn show_popup(&mut self, message: String) {
        self.previous_modus = self.modus;
        self.modus = Modus::Popup;
        self.popup_message = message;
    }

    fn enter_search_mode(&mut self) {
        if self.table.is_none() {
            return;
        }
        trace!("Entering search mode ...");
        self.previous_modus = self.modus;
        self.modus = Modus::SearchInput;
        self.last_input = self.input.get();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        if self.last_input.changed {
            self.refresh_search();
        }
        if self.last_input.finished {
            self.input.set(&self.last_input.input);
            self.last_input = self.input.get();
            self.modus = Modus::Table;
            self.previous_modus = Modus::SearchInput;
        }
    }

    fn clear_search(&mut self) {
        if self.is_searching() {
            self.input.clear();
            self.last_input = self.input.get();
            self.refresh_search();
        }
    }

    /// Sets the search term directly, as if it had been typed.
    pub fn set_search_term(&mut self, term: &str) {
        self.input.set(term);
        self.last_input = self.input.get();
        self.refresh_search();
    }

    pub fn set_scope(&mut self, scope: SearchScope) {
        self.scope = scope;
        self.refresh_search();
    }

    fn cycle_scope(&mut self) {
        if let Some(table) = &self.table {
            let next = self.scope.cycle(table.headers());
            self.set_scope(next);
            self.set_status_message(format!("Searching in {}", self.scope));
        }
    }

    fn open_file_picker(&mut self) {
        if self.files.is_empty() {
            self.set_status_message("No files available");
            return;
        }
        self.previous_modus = self.modus;
        self.modus = Modus::FilePicker;
    }

    fn pick_file(&mut self) {
        if let Some(name) = self.files.get(self.file_cursor).cloned() {
            self.modus = Modus::Table;
            self.load_data_file(&name);
        }
    }

    fn reload(&mut self) {
        if let Some(name) = self.selected_file.clone() {
            self.load_data_file(&name);
        }
    }

    fn next_page(&mut self) {
        self.pager.next_page();
        self.curser_row = 0;
    }

    fn prev_page(&mut self) {
        self.pager.prev_page();
        self.curser_row = 0;
    }

    fn cycle_page_size(&mut self) {
        self.pager.cycle_page_size();
        self.curser_row = 0;
        self.set_status_message(format!("{} per page", self.pager.page_size()));
    }

    fn move_selection_up(&mut self) {
        self.curser_row = self.curser_row.saturating_sub(1);
    }

    fn move_selection_down(&mut self) {
        let on_page = self.pager.range().len();
        if self.curser_row + 1 < on_page {
            self.curser_row += 1;
        }
    }

    /// CSV text of the rows currently shown.
    pub fn export_text(&self) -> Option<String> {
        let table = self.table.as_ref()?;
        let rows = self.display_rows();
        Some(export(
            table.headers(),
            rows.iter().map(|&(idx, _)| &table.rows()[idx]),
        ))
    }

    fn export_view(&mut self) {
        let Some(content) = self.export_text() else {
            return;
        };
        match write_export(&self.config.export_dir, &content) {
            Ok(path) => {
                let count = self.display_len();
                self.set_status_message(format!("Exported {count} rows to {}", path.display()))
            }
            Err(e) => {
                error!("Export failed: {e}");
                self.error = Some(Error::from(e).to_string());
            }
        }
    }

    /// The selected row as one CSV line.
    pub fn selected_row_text(&self) -> Option<String> {
        let table = self.table.as_ref()?;
        let row = self.visible_rows().get(self.curser_row)?.row;
        Some(row.values(table.headers()).collect::<Vec<_>>().join(","))
    }

    fn copy_selected_row(&mut self) {
        let Some(content) = self.selected_row_text() else {
            return;
        };
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    error!("Clipboard unavailable: {:?}", e);
                    self.set_status_message("Clipboard unavailable");
                    return;
                }
            }
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            match clipboard.set_text(content) {
                Ok(_) => {
                    trace!("Copied row content to clipboard.");
                    self.set_status_message("Copied row to clipboard");
                }
                Err(e) => trace!("Error copying to clipboard: {:?}", e),
            }
        }
    }
}
