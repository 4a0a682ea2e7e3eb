use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// The four sides of a cell. The discriminant doubles as the wall index,
/// so `opposite` is `(d + 2) % 4`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Top => (0, -1),
            Direction::Right => (1, 0),
            Direction::Bottom => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }
}

/// One grid slot. `walls[d]` is true while the wall on side `d` stands.
/// Starts sealed and unvisited; only generation mutates it.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    pub visited: bool,
    pub walls: [bool; 4],
}

impl Cell {
    fn sealed() -> Self {
        Cell {
            visited: false,
            walls: [true; 4],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeError {
    InvalidDimension { width: usize, height: usize },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidDimension { width, height } => {
                write!(f, "maze dimensions must be at least 1x1, got {width}x{height}")
            }
        }
    }
}

impl std::error::Error for MazeError {}

/// A DFS frame: one cell plus the shuffled order in which its sides are
/// still to be tried. Pop/push mirrors call/return of the recursive walk.
struct Frame {
    x: usize,
    y: usize,
    dirs: [Direction; 4],
    next: usize,
}

impl Frame {
    fn new(x: usize, y: usize, rng: &mut impl Rng) -> Self {
        let mut dirs = Direction::ALL;
        dirs.shuffle(rng);
        Frame { x, y, dirs, next: 0 }
    }
}

#[derive(Debug)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

impl Maze {
    pub fn new(width: usize, height: usize) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimension { width, height });
        }
        Ok(Maze {
            width,
            height,
            cells: vec![vec![Cell::sealed(); width]; height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Exit cell: bottom-right corner.
    pub fn exit(&self) -> (usize, usize) {
        (self.width - 1, self.height - 1)
    }

    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// Whether the wall on side `dir` of cell (x, y) still stands.
    /// Coordinates must be in bounds.
    pub fn wall(&self, x: usize, y: usize, dir: Direction) -> bool {
        debug_assert!(self.in_bounds(x as isize, y as isize), "wall query out of bounds");
        self.cells[y][x].walls[dir as usize]
    }

    fn remove_wall_between(&mut self, x: usize, y: usize, dir: Direction) {
        let (dx, dy) = dir.delta();
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        debug_assert!(self.in_bounds(nx, ny), "carve target out of bounds");
        self.cells[y][x].walls[dir as usize] = false;
        self.cells[ny as usize][nx as usize].walls[dir.opposite() as usize] = false;
    }

    /// Carve a perfect maze: randomized depth-first backtracking from (0, 0).
    ///
    /// An edge is only carved toward an unvisited cell, so the open passages
    /// form a spanning tree and any two cells are joined by exactly one path.
    /// The walk runs on an explicit stack rather than recursing; recursion
    /// depth would otherwise reach `width * height` on a serpentine maze.
    pub fn generate(&mut self, rng: &mut impl Rng) {
        self.cells[0][0].visited = true;
        let mut stack = vec![Frame::new(0, 0, rng)];

        while !stack.is_empty() {
            let top = stack.len() - 1;
            let frame = &mut stack[top];
            if frame.next == frame.dirs.len() {
                stack.pop();
                continue;
            }
            let dir = frame.dirs[frame.next];
            frame.next += 1;
            let (x, y) = (frame.x, frame.y);

            let (dx, dy) = dir.delta();
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if !self.in_bounds(nx, ny) {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if self.cells[ny][nx].visited {
                continue;
            }

            self.remove_wall_between(x, y, dir);
            self.cells[ny][nx].visited = true;
            stack.push(Frame::new(nx, ny, rng));
        }

        // Entry and exit open to the outside of the grid. These are not
        // tree edges, just gaps in the border.
        self.cells[0][0].walls[Direction::Left as usize] = false;
        self.cells[self.height - 1][self.width - 1].walls[Direction::Right as usize] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn generated(width: usize, height: usize, seed: u64) -> Maze {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut maze = Maze::new(width, height).unwrap();
        maze.generate(&mut rng);
        maze
    }

    /// Cells reachable from (0, 0) through open passages, ignoring the
    /// entry/exit gaps in the border.
    fn reachable_count(maze: &Maze) -> usize {
        let mut seen = vec![vec![false; maze.width()]; maze.height()];
        let mut queue = VecDeque::new();
        seen[0][0] = true;
        queue.push_back((0usize, 0usize));
        let mut count = 0;
        while let Some((x, y)) = queue.pop_front() {
            count += 1;
            for dir in Direction::ALL {
                if maze.wall(x, y, dir) {
                    continue;
                }
                let (dx, dy) = dir.delta();
                let (nx, ny) = (x as isize + dx, y as isize + dy);
                if !maze.in_bounds(nx, ny) {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if !seen[ny][nx] {
                    seen[ny][nx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        count
    }

    /// Open passages between adjacent cells, each pair counted once.
    fn passage_count(maze: &Maze) -> usize {
        let mut count = 0;
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                if x + 1 < maze.width() && !maze.wall(x, y, Direction::Right) {
                    count += 1;
                }
                if y + 1 < maze.height() && !maze.wall(x, y, Direction::Bottom) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(
            Maze::new(0, 5).unwrap_err(),
            MazeError::InvalidDimension { width: 0, height: 5 }
        );
        assert_eq!(
            Maze::new(5, 0).unwrap_err(),
            MazeError::InvalidDimension { width: 5, height: 0 }
        );
        assert!(Maze::new(1, 1).is_ok());
    }

    #[test]
    fn fresh_maze_is_sealed_and_unvisited() {
        let maze = Maze::new(3, 2).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                assert!(!maze.cells[y][x].visited);
                for dir in Direction::ALL {
                    assert!(maze.wall(x, y, dir));
                }
            }
        }
    }

    #[test]
    fn every_cell_is_reachable() {
        for (w, h, seed) in [(1, 1, 0), (2, 1, 1), (1, 7, 2), (8, 5, 3), (20, 12, 4)] {
            let maze = generated(w, h, seed);
            assert_eq!(reachable_count(&maze), w * h, "{w}x{h} seed {seed}");
        }
    }

    #[test]
    fn passages_form_a_spanning_tree() {
        for (w, h, seed) in [(1, 1, 0), (2, 1, 1), (1, 7, 2), (8, 5, 3), (20, 12, 4)] {
            let maze = generated(w, h, seed);
            assert_eq!(passage_count(&maze), w * h - 1, "{w}x{h} seed {seed}");
        }
    }

    #[test]
    fn walls_agree_between_neighbors() {
        let maze = generated(9, 6, 42);
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                for dir in Direction::ALL {
                    let (dx, dy) = dir.delta();
                    let (nx, ny) = (x as isize + dx, y as isize + dy);
                    if !maze.in_bounds(nx, ny) {
                        continue;
                    }
                    assert_eq!(
                        maze.wall(x, y, dir),
                        maze.wall(nx as usize, ny as usize, dir.opposite()),
                        "asymmetric wall at ({x}, {y}) {dir:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn entry_and_exit_are_forced_open() {
        for seed in 0..8 {
            let maze = generated(6, 4, seed);
            assert!(!maze.wall(0, 0, Direction::Left));
            assert!(!maze.wall(5, 3, Direction::Right));
        }
    }

    #[test]
    fn every_cell_ends_visited() {
        let maze = generated(7, 7, 9);
        for row in &maze.cells {
            for cell in row {
                assert!(cell.visited);
            }
        }
    }

    #[test]
    fn single_cell_maze() {
        let maze = generated(1, 1, 0);
        assert!(!maze.wall(0, 0, Direction::Left));
        assert!(!maze.wall(0, 0, Direction::Right));
        assert!(maze.wall(0, 0, Direction::Top));
        assert!(maze.wall(0, 0, Direction::Bottom));
        assert_eq!(maze.exit(), (0, 0));
    }

    #[test]
    fn two_by_one_carves_the_only_passage() {
        let maze = generated(2, 1, 3);
        // The sole spanning tree joins the two cells horizontally.
        assert!(!maze.wall(0, 0, Direction::Right));
        assert!(!maze.wall(1, 0, Direction::Left));
        // Entry and exit gaps in the border.
        assert!(!maze.wall(0, 0, Direction::Left));
        assert!(!maze.wall(1, 0, Direction::Right));
        // No vertical openings exist in a 1-tall maze.
        assert!(maze.wall(0, 0, Direction::Top));
        assert!(maze.wall(1, 0, Direction::Bottom));
    }

    #[test]
    fn direction_algebra() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
        assert_eq!(Direction::Top.delta(), (0, -1));
        assert_eq!(Direction::Right.delta(), (1, 0));
        assert_eq!(Direction::Bottom.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
    }

    #[test]
    #[should_panic(expected = "wall query out of bounds")]
    fn wall_query_outside_the_grid_is_a_bug() {
        let maze = Maze::new(3, 2).unwrap();
        maze.wall(3, 0, Direction::Top);
    }

    #[test]
    fn in_bounds_edges() {
        let maze = Maze::new(3, 2).unwrap();
        assert!(maze.in_bounds(0, 0));
        assert!(maze.in_bounds(2, 1));
        assert!(!maze.in_bounds(-1, 0));
        assert!(!maze.in_bounds(0, -1));
        assert!(!maze.in_bounds(3, 0));
        assert!(!maze.in_bounds(0, 2));
    }
}
