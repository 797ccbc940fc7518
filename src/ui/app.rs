//! Main TUI application state and logic

use crate::explain::Explainer;
use crate::parser::ast::{ExternalDeclaration, TranslationUnit};
use crate::ui::panes::{self, SourceScrollState, StatusRenderData};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Declarations,
    Details,
    Diagnostics,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> declarations -> details -> diagnostics)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Declarations,
            FocusedPane::Declarations => FocusedPane::Details,
            FocusedPane::Details => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Diagnostics,
            FocusedPane::Declarations => FocusedPane::Source,
            FocusedPane::Details => FocusedPane::Declarations,
            FocusedPane::Diagnostics => FocusedPane::Details,
        }
    }
}

/// The main application state
pub struct App {
    /// The parsed file
    pub unit: TranslationUnit,

    /// The source text the unit was parsed from
    pub source_code: String,

    /// Shown in the status bar
    pub file_name: String,

    explainer: Explainer,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Index into `unit.items`
    pub selected: usize,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub declarations_scroll: usize,
    pub details_scroll: usize,
    pub diagnostics_scroll: usize,

    /// Lines that carry at least one diagnostic
    error_lines: Vec<usize>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a browser over a parsed unit and its source text
    pub fn new(unit: TranslationUnit, source_code: String, file_name: impl Into<String>) -> Self {
        let explainer = Explainer::for_unit(&unit);
        let mut error_lines: Vec<usize> = unit.diagnostics.iter().map(|d| d.location.line).collect();
        error_lines.sort_unstable();
        error_lines.dedup();

        let status_message = match unit.diagnostics.len() {
            0 => format!("Parsed {} declarations", unit.items.len()),
            n => format!("Parsed {} declarations, recovered from {} error(s)", unit.items.len(), n),
        };

        App {
            unit,
            source_code,
            file_name: file_name.into(),
            explainer,
            focused_pane: FocusedPane::Declarations,
            selected: 0,
            source_scroll: SourceScrollState::default(),
            declarations_scroll: 0,
            details_scroll: 0,
            diagnostics_scroll: 0,
            error_lines,
            should_quit: false,
            status_message,
        }
    }

    /// The item under the selection, if the unit has any
    pub fn selected_item(&self) -> Option<&ExternalDeclaration> {
        self.unit.items.get(self.selected)
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Diagnostics (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
            .split(columns[0]);

        // Right column: Declarations (top) | Details (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(columns[1]);

        let selected_span = self.selected_item().map(|item| item.span);

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            selected_span,
            &self.error_lines,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_diagnostics_pane(
            frame,
            left_rows[1],
            &self.unit.diagnostics,
            self.focused_pane == FocusedPane::Diagnostics,
            &mut self.diagnostics_scroll,
        );

        panes::render_declarations_pane(
            frame,
            right_rows[0],
            &self.unit,
            self.selected,
            self.focused_pane == FocusedPane::Declarations,
            &mut self.declarations_scroll,
        );

        panes::render_details_pane(
            frame,
            right_rows[1],
            self.unit.items.get(self.selected),
            &self.explainer,
            self.focused_pane == FocusedPane::Details,
            &mut self.details_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                message: &self.status_message,
                file_name: &self.file_name,
                selected: self.selected,
                total: self.unit.items.len(),
                diagnostics: self.unit.diagnostics.len(),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Declarations => self.select(self.selected.saturating_sub(1)),
                FocusedPane::Source => {
                    // Scrolling up moves the selection down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Details => {
                    self.details_scroll = self.details_scroll.saturating_sub(1);
                }
                FocusedPane::Diagnostics => {
                    self.diagnostics_scroll = self.diagnostics_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Declarations => self.select(self.selected.saturating_add(1)),
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Details => {
                    self.details_scroll = self.details_scroll.saturating_add(1);
                }
                FocusedPane::Diagnostics => {
                    self.diagnostics_scroll = self.diagnostics_scroll.saturating_add(1);
                }
            },
            KeyCode::Home => match self.focused_pane {
                FocusedPane::Declarations | FocusedPane::Source => self.select(0),
                FocusedPane::Details => self.details_scroll = 0,
                FocusedPane::Diagnostics => self.diagnostics_scroll = 0,
            },
            KeyCode::End => match self.focused_pane {
                FocusedPane::Declarations | FocusedPane::Source => self.select(usize::MAX),
                // Clamped to the last page at render time
                FocusedPane::Details => self.details_scroll = usize::MAX,
                FocusedPane::Diagnostics => self.diagnostics_scroll = usize::MAX,
            },
            _ => {}
        }
    }

    /// Move the selection, clamped to the item list
    fn select(&mut self, index: usize) {
        let Some(last) = self.unit.items.len().checked_sub(1) else {
            self.status_message = "No declarations to select".to_string();
            return;
        };
        let index = index.min(last);
        if index != self.selected {
            self.selected = index;
            self.details_scroll = 0;
            self.source_scroll.target_line_row = None;
        }
        let line = self.unit.items[index].span.start.line;
        self.status_message = format!("Line {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;
    use crossterm::event::KeyModifiers;

    fn app(source: &str) -> App {
        let mut parser = Parser::new(source).unwrap();
        let unit = parser.parse_translation_unit().unwrap();
        App::new(unit, source.to_string(), "test.c")
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = app("int a;\nint b;\nint c;\n");
        assert_eq!(app.focused_pane, FocusedPane::Declarations);

        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, 0);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 2);
        assert_eq!(app.status_message, "Line 3");

        press(&mut app, KeyCode::Home);
        assert_eq!(app.selected, 0);
        press(&mut app, KeyCode::End);
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_focus_cycles_both_ways() {
        let mut app = app("int a;");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Details);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Source);
        for _ in 0..4 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.focused_pane, FocusedPane::Source);
    }

    #[test]
    fn test_selection_change_resets_details_scroll() {
        let mut app = app("int a;\nint b;\n");
        app.details_scroll = 7;
        press(&mut app, KeyCode::Down);
        assert_eq!(app.details_scroll, 0);
        assert_eq!(app.source_scroll.target_line_row, None);
    }

    #[test]
    fn test_empty_unit() {
        let mut app = app("");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 0);
        assert!(app.selected_item().is_none());
        assert_eq!(app.status_message, "No declarations to select");
    }

    #[test]
    fn test_error_lines_and_quit() {
        let mut app = app("int a;\nint [;\nint b;\n");
        assert_eq!(app.error_lines, vec![2]);
        assert!(app.status_message.contains("recovered from 1 error(s)"));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
