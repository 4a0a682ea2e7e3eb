use crate::maze::{Direction, Maze};

/// The single agent walking a generated maze. Starts in the top-left cell;
/// the maze itself is never mutated by movement.
pub struct Player {
    pub x: usize,
    pub y: usize,
    pub moves: u32,
}

impl Player {
    pub fn new() -> Self {
        Player { x: 0, y: 0, moves: 0 }
    }

    /// Attempt one step. Returns false without touching any state when the
    /// target cell is outside the grid or the separating wall stands. The
    /// bounds check also keeps the player from walking out through the
    /// entry/exit gaps in the border.
    pub fn try_move(&mut self, maze: &Maze, dir: Direction) -> bool {
        let (dx, dy) = dir.delta();
        let nx = self.x as isize + dx;
        let ny = self.y as isize + dy;
        if !maze.in_bounds(nx, ny) {
            return false;
        }
        if maze.wall(self.x, self.y, dir) {
            return false;
        }
        self.x = nx as usize;
        self.y = ny as usize;
        self.moves += 1;
        true
    }

    pub fn at_exit(&self, maze: &Maze) -> bool {
        (self.x, self.y) == maze.exit()
    }
}
