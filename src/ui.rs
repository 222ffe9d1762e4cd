//! Layout and drawing: layer slices, spawn zone, sidebar, game over.
//!
//! The grid is shown as horizontal slices, one per height, top layer first.
//! Inside a slice x runs left to right and z runs top to bottom, so moving
//! "forward" (-z) moves the piece up the screen.

use crate::app::Screen;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashMap;
use voxtris::config::MAX_GRID_SIZE;
use voxtris::{Engine, GridPos, PieceId, PieceKind};

/// Terminal columns per grid cell.
const CELL_WIDTH: u16 = 2;

pub const SIDEBAR_WIDTH: u16 = 26;

/// Outer size (with border) of one slice for a grid of side `n`.
fn slice_size(n: usize) -> (u16, u16) {
    (n as u16 * CELL_WIDTH + 2, n as u16 + 2)
}

/// Slices to draw: the spawn zone plus one per layer.
fn slice_count(n: usize) -> u16 {
    n as u16 + 1
}

/// (columns, rows) of slices when laid out in `width` terminal columns. None if one slice does not fit.
fn slice_layout(n: usize, width: u16) -> Option<(u16, u16)> {
    let (sw, _) = slice_size(n);
    let cols = (width / sw).min(slice_count(n));
    if cols == 0 {
        return None;
    }
    Some((cols, slice_count(n).div_ceil(cols)))
}

fn board_size(n: usize, width: u16) -> Option<(u16, u16)> {
    let (sw, sh) = slice_size(n);
    slice_layout(n, width).map(|(cols, rows)| (cols * sw, rows * sh))
}

/// Largest grid side whose slices and sidebar fit the terminal.
pub fn max_grid_size_for_terminal(term_cols: u16, term_rows: u16) -> usize {
    let board_w = term_cols.saturating_sub(SIDEBAR_WIDTH);
    (1..=MAX_GRID_SIZE)
        .rev()
        .find(|&n| board_size(n, board_w).is_some_and(|(_, h)| h <= term_rows))
        .unwrap_or(1)
}

/// Sidebar figures kept by the app.
#[derive(Debug, Clone, Default)]
pub struct Hud {
    pub next: Option<PieceKind>,
    pub pieces_placed: u32,
    pub layers_cleared: u32,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellView {
    Empty,
    Placed(PieceKind),
    Active(PieceKind),
    /// Active block sitting on a placed one (possible right after a rotation).
    Overlap(PieceKind),
}

/// Snapshot of what each cell shows this frame.
struct Scene {
    n: usize,
    owners: HashMap<PieceId, PieceKind>,
    active: Vec<GridPos>,
    active_kind: Option<PieceKind>,
}

impl Scene {
    fn capture(engine: &Engine) -> Self {
        let n = engine.grid_size();
        let owners = engine
            .placed_pieces()
            .into_iter()
            .map(|p| (p.id, p.kind))
            .collect();
        let active = engine
            .current_piece_blocks()
            .into_iter()
            .map(|b| b.to_grid(n))
            .collect();
        Self {
            n,
            owners,
            active,
            active_kind: engine.current_piece().map(|p| p.kind),
        }
    }

    fn layer_cell(&self, engine: &Engine, x: i32, y: i32, z: i32) -> CellView {
        let pos = GridPos::new(x, y, z);
        let placed = engine
            .grid()
            .occupant(pos)
            .map(|id| self.owners.get(&id).copied().unwrap_or(PieceKind::Seed));
        let active = self.active_kind.filter(|_| self.active.contains(&pos));
        match (active, placed) {
            (Some(k), Some(_)) => CellView::Overlap(k),
            (Some(k), None) => CellView::Active(k),
            (None, Some(k)) => CellView::Placed(k),
            (None, None) => CellView::Empty,
        }
    }

    /// Active blocks above the grid, projected onto (x, z).
    fn spawn_zone_cell(&self, x: i32, z: i32) -> CellView {
        let n = self.n as i32;
        match self.active_kind {
            Some(k) if self.active.iter().any(|p| p.x == x && p.z == z && p.y >= n) => {
                CellView::Active(k)
            }
            _ => CellView::Empty,
        }
    }
}

/// Draw current screen; game over draws the board with a popup on top.
pub fn draw(frame: &mut Frame, screen: Screen, engine: &Engine, theme: &Theme, hud: &Hud) {
    let area = frame.area();
    Block::default()
        .style(Style::default().bg(theme.bg))
        .render(area, frame.buffer_mut());
    draw_game(frame, engine, theme, hud, area);
    if screen == Screen::GameOver {
        draw_game_over(frame, theme, hud, area);
    }
}

/// Board of slices + sidebar, centred.
fn draw_game(frame: &mut Frame, engine: &Engine, theme: &Theme, hud: &Hud, area: Rect) {
    let n = engine.grid_size();
    let board_w_avail = area.width.saturating_sub(SIDEBAR_WIDTH);
    let Some((bw, bh)) = board_size(n, board_w_avail) else {
        Paragraph::new("Terminal too small")
            .style(Style::default().fg(theme.main_fg))
            .render(area, frame.buffer_mut());
        return;
    };
    let total_w = bw + SIDEBAR_WIDTH;
    let total_h = bh.max(SIDEBAR_HEIGHT);

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
            Constraint::Length(total_h),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);

    draw_board(frame, engine, theme, inner[0]);
    draw_sidebar(frame, engine, theme, hud, inner[1]);
}

fn draw_board(frame: &mut Frame, engine: &Engine, theme: &Theme, area: Rect) {
    let n = engine.grid_size();
    let Some((cols, _)) = slice_layout(n, area.width) else {
        return;
    };
    let (sw, sh) = slice_size(n);
    let scene = Scene::capture(engine);
    let grid = engine.grid();
    let buf = frame.buffer_mut();

    for i in 0..slice_count(n) {
        let rect = Rect {
            x: area.x + (i % cols) * sw,
            y: area.y + (i / cols) * sh,
            width: sw,
            height: sh,
        }
        .intersection(area);
        if rect.is_empty() {
            continue;
        }
        if i == 0 {
            draw_slice(buf, theme, rect, " above ".to_string(), false, n, |x, z| {
                scene.spawn_zone_cell(x, z)
            });
        } else {
            let y = n as i32 - i as i32;
            let filled = (0..n as i32)
                .flat_map(|x| (0..n as i32).map(move |z| GridPos::new(x, y, z)))
                .filter(|&p| grid.get_cell(p))
                .count();
            let title = format!(" y={y} {filled}/{} ", n * n);
            let holds_active = scene.active.iter().any(|p| p.y == y);
            draw_slice(buf, theme, rect, title, holds_active, n, |x, z| {
                scene.layer_cell(engine, x, y, z)
            });
        }
    }
}

fn draw_slice(
    buf: &mut Buffer,
    theme: &Theme,
    rect: Rect,
    title: String,
    highlight: bool,
    n: usize,
    cell: impl Fn(i32, i32) -> CellView,
) {
    let border = if highlight { theme.title } else { theme.div_line };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(theme.bg))
        .title(Span::styled(title, Style::default().fg(theme.main_fg)));
    let inner = block.inner(rect);
    block.render(rect, buf);

    for z in 0..n as i32 {
        for x in 0..n as i32 {
            let rx = inner.x + x as u16 * CELL_WIDTH;
            let ry = inner.y + z as u16;
            if rx + CELL_WIDTH > inner.x + inner.width || ry >= inner.y + inner.height {
                continue;
            }
            let (symbol, style) = match cell(x, z) {
                CellView::Empty => ("· ", Style::default().fg(theme.inactive_fg).bg(theme.bg)),
                CellView::Placed(k) => ("██", Style::default().fg(theme.piece_color(k)).bg(theme.bg)),
                CellView::Active(k) => (
                    "▓▓",
                    Style::default()
                        .fg(theme.piece_color(k))
                        .bg(theme.bg)
                        .add_modifier(Modifier::BOLD),
                ),
                CellView::Overlap(k) => ("▓▓", Style::default().fg(theme.piece_color(k)).bg(Color::Red)),
            };
            buf.set_string(rx, ry, symbol, style);
        }
    }
}

const SIDEBAR_HEIGHT: u16 = 22;

fn section(theme: &Theme, title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, Style::default().fg(theme.title)))
}

fn draw_sidebar(frame: &mut Frame, engine: &Engine, theme: &Theme, hud: &Hud, area: Rect) {
    let fg = Style::default().fg(theme.main_fg);
    let label = Style::default().fg(theme.title);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Next
            Constraint::Length(4), // Piece
            Constraint::Length(5), // Stats
            Constraint::Length(9), // Keys
        ])
        .split(area);

    let next_lines = match hud.next {
        Some(kind) => vec![Line::from(vec![
            Span::styled("██ ", Style::default().fg(theme.piece_color(kind))),
            Span::styled(kind.name(), fg),
        ])],
        None => vec![Line::from(Span::styled("-", fg))],
    };
    Paragraph::new(next_lines)
        .block(section(theme, " Next "))
        .render(chunks[0], frame.buffer_mut());

    let piece_lines = match engine.current_piece() {
        Some(piece) => {
            let anchor = piece.anchor.to_grid(engine.grid_size());
            vec![
                Line::from(vec![
                    Span::styled("██ ", Style::default().fg(theme.piece_color(piece.kind))),
                    Span::styled(format!("{} {}", piece.kind.name(), piece.id), fg),
                ]),
                Line::from(vec![Span::styled("at ", label), Span::styled(anchor.to_string(), fg)]),
            ]
        }
        None => vec![Line::from(Span::styled("none", fg))],
    };
    Paragraph::new(piece_lines)
        .block(section(theme, " Piece "))
        .render(chunks[1], frame.buffer_mut());

    let stats = vec![
        Line::from(vec![
            Span::styled("Placed: ", label),
            Span::styled(hud.pieces_placed.to_string(), fg),
        ]),
        Line::from(vec![
            Span::styled("Layers: ", label),
            Span::styled(hud.layers_cleared.to_string(), fg),
        ]),
        Line::from(Span::styled(hud.message.as_str(), Style::default().fg(theme.inactive_fg))),
    ];
    Paragraph::new(stats)
        .block(section(theme, " Stats "))
        .render(chunks[2], frame.buffer_mut());

    let keys = [
        ("←→ h l", "x"),
        ("↑↓ k j", "z"),
        ("Space", "down"),
        ("x y z", "rotate"),
        ("n", "skip"),
        ("r", "restart"),
        ("q", "quit"),
    ];
    let key_lines: Vec<Line> = keys
        .iter()
        .map(|(k, what)| {
            Line::from(vec![
                Span::styled(format!("{k:<8}"), label),
                Span::styled(*what, fg),
            ])
        })
        .collect();
    Paragraph::new(key_lines)
        .block(section(theme, " Keys "))
        .render(chunks[3], frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, theme: &Theme, hud: &Hud, area: Rect) {
    let popup_w = 30u16;
    let popup_h = 8u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Stack overflow ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Placed {}  Layers {} ", hud.pieces_placed, hud.layers_cleared),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " R — Restart    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(" voxtris ", Style::default().fg(theme.title))),
    );
    p.render(popup, frame.buffer_mut());
}
