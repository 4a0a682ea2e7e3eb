use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Stdout, Write};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

use crate::maze::{Direction, Maze};
use crate::player::Player;

/// Each cell interior is this many terminal columns wide.
const CELL_INNER_W: usize = 2;

const WALL_COLOR: Color = Color::DarkBlue;
const PLAYER_COLOR: Color = Color::Magenta;
const EXIT_COLOR: Color = Color::Blue;

#[derive(Clone, Copy, PartialEq)]
enum Marker {
    Player,
    Exit,
    Empty,
}

/// Tracks what is already on screen so a frame only rewrites the HUD and
/// the cell interiors that changed. The wall frame is static once drawn.
pub struct Renderer {
    last_player: Option<(usize, usize)>,
    last_hud: String,
    pub needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last_player: None,
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

/// Board width in terminal columns: a 1-column wall post per cell plus the
/// shared right border.
pub fn board_cols(maze: &Maze) -> usize {
    maze.width() * (CELL_INNER_W + 1) + 1
}

/// Board height in terminal rows: a wall row per cell row plus the shared
/// bottom border.
pub fn board_rows(maze: &Maze) -> usize {
    maze.height() * 2 + 1
}

/// The static wall frame as plain text, one string per terminal row.
/// Openings in the outer border are the forced entry and exit gaps.
pub fn board_lines(maze: &Maze) -> Vec<String> {
    let mut lines = Vec::with_capacity(board_rows(maze));
    for y in 0..maze.height() {
        lines.push(wall_row(maze, y, Direction::Top));
        let mut line = String::new();
        for x in 0..maze.width() {
            line.push(if maze.wall(x, y, Direction::Left) { '|' } else { ' ' });
            line.push_str("  ");
        }
        line.push(if maze.wall(maze.width() - 1, y, Direction::Right) {
            '|'
        } else {
            ' '
        });
        lines.push(line);
    }
    lines.push(wall_row(maze, maze.height() - 1, Direction::Bottom));
    lines
}

fn wall_row(maze: &Maze, y: usize, side: Direction) -> String {
    let mut line = String::new();
    for x in 0..maze.width() {
        line.push('+');
        line.push_str(if maze.wall(x, y, side) { "--" } else { "  " });
    }
    line.push('+');
    line
}

pub fn render(
    stdout: &mut Stdout,
    maze: &Maze,
    player: &Player,
    hud: &str,
    renderer: &mut Renderer,
) -> io::Result<()> {
    let needed_w = board_cols(maze) as u16;
    let needed_h = (board_rows(maze) + 2) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud.to_string();
    }

    let pos = (player.x, player.y);
    if renderer.needs_full {
        stdout.queue(SetForegroundColor(WALL_COLOR))?;
        for (row, line) in board_lines(maze).iter().enumerate() {
            stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y + row as u16))?;
            stdout.queue(Print(line))?;
        }
        stdout.queue(ResetColor)?;

        let exit = maze.exit();
        if exit != pos {
            draw_marker(stdout, renderer, exit.0, exit.1, Marker::Exit)?;
        }
        draw_marker(stdout, renderer, pos.0, pos.1, Marker::Player)?;
        renderer.last_player = Some(pos);
        renderer.needs_full = false;
    } else if renderer.last_player != Some(pos) {
        if let Some((ox, oy)) = renderer.last_player {
            let vacated = if (ox, oy) == maze.exit() {
                Marker::Exit
            } else {
                Marker::Empty
            };
            draw_marker(stdout, renderer, ox, oy, vacated)?;
        }
        draw_marker(stdout, renderer, pos.0, pos.1, Marker::Player)?;
        renderer.last_player = Some(pos);
    }

    stdout.flush()?;
    Ok(())
}

fn draw_marker(
    stdout: &mut Stdout,
    renderer: &Renderer,
    x: usize,
    y: usize,
    marker: Marker,
) -> io::Result<()> {
    let (text, color) = match marker {
        Marker::Player => ("●", PLAYER_COLOR),
        Marker::Exit => ("▒▒", EXIT_COLOR),
        Marker::Empty => ("  ", Color::Reset),
    };
    let x_pos = renderer.origin_x + (x * (CELL_INNER_W + 1) + 1) as u16;
    let y_pos = renderer.origin_y + (y * 2 + 1) as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_INNER_W {
        for _ in 0..(CELL_INNER_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

/// Show the win line below the board, then block until `q` is pressed.
pub fn render_win(
    stdout: &mut Stdout,
    maze: &Maze,
    renderer: &Renderer,
    moves: u32,
    elapsed: Duration,
) -> io::Result<()> {
    let needed_w = board_cols(maze) as u16;
    let needed_h = (board_rows(maze) + 2) as u16;
    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(MoveTo(0, needed_h))?;
    } else {
        stdout.queue(MoveTo(
            renderer.origin_x,
            renderer.origin_y + board_rows(maze) as u16,
        ))?;
    }
    stdout.queue(Print(format!(
        "Congratulations! You've reached the exit! {} moves in {:.1}s (press q to quit)",
        moves,
        elapsed.as_secs_f64()
    )))?;
    stdout.flush()?;
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
