use crate::api::transactions::TransactionsSource;
use crate::models::transaction::TransactionType;
use crate::operations::dashboard::{BalanceCard, BalanceKind, Dashboard, LoadStatus};
use crate::utils::format::Formatter;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Modifier, Rect, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};
use std::io;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

#[derive(Default)]
struct ViewState {
    table_state: TableState,
}

impl ViewState {
    fn sync(&mut self, row_count: usize) {
        if row_count == 0 {
            self.table_state.select(None);
        } else if self.table_state.selected().is_none() {
            self.table_state.select(Some(0));
        }
    }

    fn move_selection(&mut self, row_count: usize, delta: i32) {
        if row_count == 0 {
            self.table_state.select(None);
            return;
        }

        let current = self.table_state.selected().unwrap_or(0) as i32;
        let max_index = row_count.saturating_sub(1) as i32;
        let next = (current + delta).clamp(0, max_index) as usize;
        self.table_state.select(Some(next));
    }
}

/// Mounts the dashboard in the terminal until the user quits. Quitting
/// unmounts it, which cancels a load still in flight.
pub fn run_dashboard(
    runtime: &Handle,
    source: Arc<dyn TransactionsSource>,
    formatter: Formatter,
) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    enter_alternate_screen(&mut stdout)?;

    let result = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| format!("Failed to initialize terminal: {}", e))?;

        let mut dashboard = Dashboard::mount(runtime, source, formatter);
        let mut view = ViewState::default();

        loop {
            if dashboard.tick() {
                view.sync(dashboard.transactions().len());
            }

            terminal
                .draw(|frame| draw(frame, &dashboard, &mut view))
                .map_err(|e| format!("Failed to draw terminal UI: {}", e))?;

            if event::poll(std::time::Duration::from_millis(200))
                .map_err(|e| format!("Failed to poll input: {}", e))?
            {
                if let Event::Key(key) =
                    event::read().map_err(|e| format!("Failed to read input: {}", e))?
                {
                    if handle_key(&mut view, dashboard.transactions().len(), key) {
                        debug!("Leaving dashboard");
                        break;
                    }
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;

    result
}

/// Raw mode is already on when this runs; it is switched back off if the
/// screen cannot be entered.
fn enter_alternate_screen<W: io::Write>(out: &mut W) -> Result<(), String> {
    if let Err(e) = execute!(out, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(format!("Failed to enter alternate screen: {}", e));
    }
    Ok(())
}

fn handle_key(view: &mut ViewState, row_count: usize, key: KeyEvent) -> bool {
    // Many terminals emit both a Press and a Release event. Only act on Press/Repeat.
    if key.kind == KeyEventKind::Release {
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Up => view.move_selection(row_count, -1),
        KeyCode::Down => view.move_selection(row_count, 1),
        KeyCode::Home => view.move_selection(row_count, i32::MIN / 2),
        KeyCode::End => view.move_selection(row_count, i32::MAX / 2),
        _ => {}
    }
    false
}

fn draw(frame: &mut ratatui::Frame, dashboard: &Dashboard, view: &mut ViewState) {
    let size = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(size);

    render_header(frame, layout[0]);
    render_cards(frame, layout[1], dashboard);
    render_table(frame, layout[2], dashboard, view);
    render_footer(frame, layout[3], dashboard);
}

fn render_header(frame: &mut ratatui::Frame, area: Rect) {
    let line = Line::from(vec![Span::styled(
        "FINO Dashboard",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )]);

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block).alignment(Alignment::Left), area);
}

fn render_cards(frame: &mut ratatui::Frame, area: Rect, dashboard: &Dashboard) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (card, column) in dashboard.cards().iter().zip(columns.iter()) {
        render_card(frame, *column, card);
    }
}

fn render_card(frame: &mut ratatui::Frame, area: Rect, card: &BalanceCard) {
    let (icon_color, border_style) = match card.kind {
        BalanceKind::Income => (Color::Green, Style::default()),
        BalanceKind::Outcome => (Color::Red, Style::default()),
        BalanceKind::Total => (Color::White, Style::default().fg(Color::Yellow)),
    };

    let title = Line::from(vec![
        Span::raw(format!(" {} ", card.label)),
        Span::styled(format!("{} ", card.kind.icon()), Style::default().fg(icon_color)),
    ]);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let value = Paragraph::new(Line::from(Span::styled(
        card.value.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .block(block)
    .alignment(Alignment::Left);

    frame.render_widget(value, area);
}

fn render_table(frame: &mut ratatui::Frame, area: Rect, dashboard: &Dashboard, view: &mut ViewState) {
    let labels = dashboard.labels();
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new([
        Cell::from(labels.title).style(bold),
        Cell::from(labels.price).style(bold),
        Cell::from(labels.category).style(bold),
        Cell::from(labels.date).style(bold),
    ])
    .style(Style::default().fg(Color::White));

    let transaction_rows = dashboard.rows();
    let rows = transaction_rows.iter().map(|row| {
        let value_color = match row.transaction_type {
            TransactionType::Income => Color::Green,
            TransactionType::Outcome => Color::Red,
        };

        Row::new([
            Cell::from(row.title.clone()),
            Cell::from(row.value.clone()).style(Style::default().fg(value_color)),
            Cell::from(row.category.clone()),
            Cell::from(row.date.clone()),
        ])
    });

    let widths = [
        Constraint::Percentage(40),
        Constraint::Length(18),
        Constraint::Length(16),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("➤ ")
        .column_spacing(1);

    frame.render_stateful_widget(table, inner, &mut view.table_state);

    if transaction_rows.is_empty() && dashboard.status() == &LoadStatus::Loaded {
        let empty = Paragraph::new(labels.empty)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        // Below the header row.
        let body = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        frame.render_widget(empty, body);
    }
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, dashboard: &Dashboard) {
    let line = match dashboard.status() {
        LoadStatus::Failed(message) => Line::from(Span::styled(
            format!("{}: {}", dashboard.labels().load_failed, message),
            Style::default().fg(Color::Red),
        )),
        _ => Line::from("↑/↓ move  Home/End jump  q/Esc exit"),
    };

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(line)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        area,
    );
}
