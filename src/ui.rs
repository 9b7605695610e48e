//! Layout and drawing: playfield, active piece, sidebar, pause and game-over menus.

use crate::game::{MenuItem, Session, Status};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

/// Each grid cell is two terminal columns wide so cells render roughly square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 20;

/// Playfield size in terminal cells (grid + border) for given grid dimensions.
fn playfield_pixel_size(width: u16, height: u16) -> (u16, u16) {
    (width * CELL_WIDTH + 2, height + 2)
}

/// Draw the board and sidebar, with the pause or game-over popup on top when
/// the session is in that state.
pub fn draw(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    draw_game(frame, session, theme, area);
    match session.status {
        Status::Playing => {}
        Status::Paused => draw_pause_menu(frame, session, theme, area),
        Status::GameOver => draw_game_over(frame, session, theme, area),
    }
}

/// Active-piece cell value at playfield coordinate (x, y), if the piece's
/// matrix has a nonzero cell there after translating by its offset.
fn active_cell_value(session: &Session, x: usize, y: usize) -> Option<u8> {
    let piece = session.piece.as_ref()?;
    let cx = x as i32 - piece.x;
    let cy = y as i32 - piece.y;
    if cx < 0 || cy < 0 {
        return None;
    }
    let value = *piece.matrix.get(cy as usize)?.get(cx as usize)?;
    (value != 0).then_some(value)
}

/// Draw game: playfield + sidebar; use full area and center the board.
fn draw_game(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let (pw, ph) = playfield_pixel_size(
        session.playfield.width() as u16,
        session.playfield.height() as u16,
    );
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let active_area = vert[1];

    let (playfield_area, sidebar_area) = {
        let inner = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
            .split(active_area);
        (inner[0], inner[1])
    };

    draw_playfield(frame, session, theme, playfield_area);
    draw_sidebar(frame, session, theme, sidebar_area);
}

fn draw_playfield(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border).bg(theme.bg))
        .title(Span::styled(" tetrotui ", Style::default().fg(theme.title)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let width = session.playfield.width();
    let height = session.playfield.height();
    let mut lines = Vec::with_capacity(height);
    for y in 0..height {
        let mut spans = Vec::with_capacity(width);
        for x in 0..width {
            // Locked cells from the playfield; the active piece drawn on top.
            let value = active_cell_value(session, x, y).unwrap_or(session.playfield.cell(x, y));
            let color = if value == 0 {
                theme.bg
            } else {
                theme.piece_color(value)
            };
            spans.push(Span::styled("  ", Style::default().bg(color)));
        }
        lines.push(Line::from(spans));
    }
    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

fn draw_sidebar(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.text);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let status = match session.status {
        Status::Playing => "Playing",
        Status::Paused => "Paused",
        Status::GameOver => "Game over",
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Rows: ", title_style),
            Span::styled(session.rows_completed.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Status: ", title_style),
            Span::styled(status, fg_style),
        ]),
    ];
    if let Some(piece) = &session.piece {
        lines.push(Line::from(vec![
            Span::styled("Piece: ", title_style),
            Span::styled(
                piece.kind.symbol().to_string(),
                Style::default().fg(theme.piece_color(piece.kind.cell_value())),
            ),
        ]));
    }
    lines.extend([
        Line::from(""),
        Line::from(Span::styled("←/→  move", fg_style)),
        Line::from(Span::styled("↑    rotate", fg_style)),
        Line::from(Span::styled("z    rotate ccw", fg_style)),
        Line::from(Span::styled("↓    soft drop", fg_style)),
        Line::from(Span::styled("p    pause", fg_style)),
        Line::from(Span::styled("q    quit", fg_style)),
    ]);
    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

/// One menu entry line: the highlighted item is drawn inverted.
fn menu_entry(label: &str, highlighted: bool, theme: &Theme) -> Line<'static> {
    let style = if highlighted {
        Style::default()
            .fg(theme.bg)
            .bg(theme.title)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(Span::styled(format!(" {label} "), style))
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_pause_menu(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let popup = centered_popup(area, 26, 8);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        menu_entry("Resume", session.menu_selection == MenuItem::Resume, theme),
        menu_entry("Reset", session.menu_selection == MenuItem::Reset, theme),
        Line::from(""),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let popup = centered_popup(area, 26, 9);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Rows: {} ", session.rows_completed),
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        menu_entry("Reset", true, theme),
        Line::from(""),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}
