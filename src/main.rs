use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use std::error::Error;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

mod maze;
mod player;
mod render;

use maze::{Direction, Maze};
use player::Player;
use render::Renderer;

const DEFAULT_MAZE_W: usize = 20;
const DEFAULT_MAZE_H: usize = 12;
const POLL_MS: u64 = 50;

fn main() -> Result<(), Box<dyn Error>> {
    let (width, height) = read_size_settings();
    // Validate and generate before touching terminal state, so a bad size
    // reports cleanly instead of dying inside the alternate screen.
    let mut maze = Maze::new(width, height)?;
    let mut rng = rand::thread_rng();
    maze.generate(&mut rng);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &maze);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result?;
    Ok(())
}

fn run(stdout: &mut Stdout, maze: &Maze) -> io::Result<()> {
    let mut player = Player::new();
    let mut renderer = Renderer::new();
    let started = Instant::now();

    loop {
        let hud = format!(
            "Maze {}x{}  Pos ({}, {})  Moves: {}  Time: {}s  (arrows move, q quits)",
            maze.width(),
            maze.height(),
            player.x,
            player.y,
            player.moves,
            started.elapsed().as_secs()
        );
        render::render(stdout, maze, &player, &hud, &mut renderer)?;

        if player.at_exit(maze) {
            return render::render_win(stdout, maze, &renderer, player.moves, started.elapsed());
        }

        if event::poll(Duration::from_millis(POLL_MS))? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Up => {
                            player.try_move(maze, Direction::Top);
                        }
                        KeyCode::Right => {
                            player.try_move(maze, Direction::Right);
                        }
                        KeyCode::Down => {
                            player.try_move(maze, Direction::Bottom);
                        }
                        KeyCode::Left => {
                            player.try_move(maze, Direction::Left);
                        }
                        _ => {}
                    },
                    _ => {}
                },
                Event::Resize(_, _) => renderer.needs_full = true,
                _ => {}
            }
        }
    }
}

fn read_size_settings() -> (usize, usize) {
    // A value of 0 is passed through on purpose: the maze constructor is
    // the one place that rejects bad dimensions.
    let width = std::env::var("MAZE_WIDTH")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAZE_W);
    let height = std::env::var("MAZE_HEIGHT")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAZE_H);
    (width, height)
}
