//! Terminal UI implementation using ratatui
//!
//! Draws the four dashboard regions as bordered blocks with a status line
//! underneath. The page contents come from [`PageState`]; this module never
//! decides what to show, only how.

use crate::error::{DashError, Result};
use crate::page::{ElementId, PageState};
use crate::render::ui::{ColorTheme, UIRenderer};
use ratatui::crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

const KEY_HINTS: &str = "q quit | r refresh";

/// Terminal UI implementation with ratatui backend
pub struct TerminalUI {
    terminal: Option<CrosstermTerminal>,
    theme: ColorTheme,
}

impl TerminalUI {
    /// Create terminal UI with custom theme
    pub fn with_theme(theme: ColorTheme) -> Result<Self> {
        Ok(Self {
            terminal: None,
            theme,
        })
    }
}

/// Draw `page` into `area`.
pub fn draw_page(frame: &mut Frame, area: Rect, page: &PageState, theme: &ColorTheme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(alert_height(page)),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    if let Some(alert) = page.alerts().last() {
        frame.render_widget(Paragraph::new(alert.as_str()).style(theme.alert), rows[0]);
    }

    text_region(frame, rows[1], page, ElementId::UserName, "Name", theme);
    list_region(frame, rows[2], page, ElementId::CartItems, "Cart", theme);
    text_region(frame, rows[3], page, ElementId::LatestOrder, "Latest order", theme);
    list_region(frame, rows[4], page, ElementId::PastOrders, "Past orders", theme);

    let location = page.location().unwrap_or("dashboard");
    let status = Paragraph::new(format!("{location} | {KEY_HINTS}"))
        .style(Style::default().bg(theme.status_bg).fg(theme.status_fg));
    frame.render_widget(status, rows[5]);
}

fn alert_height(page: &PageState) -> u16 {
    if page.alerts().is_empty() {
        0
    } else {
        1
    }
}

fn region_block<'a>(title: &'a str, theme: &ColorTheme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(title)
}

fn text_region(
    frame: &mut Frame,
    area: Rect,
    page: &PageState,
    id: ElementId,
    title: &str,
    theme: &ColorTheme,
) {
    let text = page.text(id).unwrap_or("");
    let line = if page.unavailable_reason(id).is_some() {
        Line::from(Span::styled(text, theme.unavailable))
    } else if text.is_empty() {
        Line::from(Span::styled("-", theme.placeholder))
    } else {
        Line::from(Span::styled(text, theme.text))
    };
    frame.render_widget(Paragraph::new(line).block(region_block(title, theme)), area);
}

fn list_region(
    frame: &mut Frame,
    area: Rect,
    page: &PageState,
    id: ElementId,
    title: &str,
    theme: &ColorTheme,
) {
    let items: Vec<ListItem> = if let Some(reason) = page.unavailable_reason(id) {
        vec![ListItem::new(Line::from(Span::styled(
            format!("unavailable ({reason})"),
            theme.unavailable,
        )))]
    } else if page.items(id).is_empty() {
        vec![ListItem::new(Line::from(Span::styled("-", theme.placeholder)))]
    } else {
        page.items(id)
            .iter()
            .map(|entry| ListItem::new(Line::from(Span::styled(entry.as_str(), theme.text))))
            .collect()
    };
    frame.render_widget(List::new(items).block(region_block(title, theme)), area);
}

impl UIRenderer for TerminalUI {
    fn render(&mut self, page: &PageState) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            let theme = &self.theme;
            terminal.draw(move |frame| {
                let size = frame.size();
                draw_page(frame, size, page, theme);
            })?;
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal =
            Terminal::new(backend).map_err(|err| DashError::ui(format!("terminal setup: {err}")))?;
        self.terminal = Some(terminal);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if let Some(mut terminal) = self.terminal.take() {
            disable_raw_mode()?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
        }
        Ok(())
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
