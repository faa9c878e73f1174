//! Board geometry: modules, win lines and the cell array.

// ---------------------------------------------------------------------------
// Module
// ---------------------------------------------------------------------------

/// A board variant, selected by the module name in `START`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    /// 3x3, three in a row.
    Classic,
    /// 5x5, four in a row.
    Large,
}

impl Module {
    pub const CLASSIC_NAME: &'static str = "Klassisches 3x3 Feld für 2 Bots";
    pub const LARGE_NAME: &'static str = "Größeres 5x5 Feld für 2 Bots";

    /// Looks up a module by its platform name or short alias (`3x3`, `5x5`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            Self::CLASSIC_NAME | "3x3" => Some(Self::Classic),
            Self::LARGE_NAME | "5x5" => Some(Self::Large),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Classic => Self::CLASSIC_NAME,
            Self::Large => Self::LARGE_NAME,
        }
    }

    /// Cells per side.
    pub fn side(self) -> usize {
        match self {
            Self::Classic => 3,
            Self::Large => 5,
        }
    }

    /// Marks in a line needed to win.
    pub fn run(self) -> usize {
        match self {
            Self::Classic => 3,
            Self::Large => 4,
        }
    }

    pub fn cells(self) -> usize {
        self.side() * self.side()
    }

    /// Every winning line as row-major cell indices: all runs of
    /// [`run`](Self::run) cells along rows, columns and both diagonals.
    pub fn win_lines(self) -> Vec<Vec<usize>> {
        let side = self.side() as isize;
        let run = self.run() as isize;
        let directions = [(0, 1), (1, 0), (1, 1), (1, -1)];

        let mut lines = Vec::new();
        for row in 0..side {
            for col in 0..side {
                for (dr, dc) in directions {
                    let end_row = row + dr * (run - 1);
                    let end_col = col + dc * (run - 1);
                    if !(0..side).contains(&end_row) || !(0..side).contains(&end_col) {
                        continue;
                    }
                    let line = (0..run)
                        .map(|k| ((row + dr * k) * side + col + dc * k) as usize)
                        .collect();
                    lines.push(line);
                }
            }
        }
        lines
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// How a board stands after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The player with this index (0 or 1) completed a line.
    Won(usize),
    /// Every cell is taken and nobody won.
    Draw,
    Running,
}

/// Row-major cells: `0` is empty, `1` and `2` are the marks of the first
/// and second bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    module: Module,
    cells: Vec<u8>,
    lines: Vec<Vec<usize>>,
}

impl Board {
    pub fn new(module: Module) -> Self {
        Self {
            module,
            cells: vec![0; module.cells()],
            lines: module.win_lines(),
        }
    }

    pub fn module(&self) -> Module {
        self.module
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Returns `true` if `index` is on the board and empty.
    pub fn is_free(&self, index: usize) -> bool {
        self.cells.get(index) == Some(&0)
    }

    /// Puts the mark of `player` on `index`. Returns `false` (and leaves
    /// the board alone) if the cell isn't free.
    pub fn place(&mut self, index: usize, player: usize) -> bool {
        if !self.is_free(index) {
            return false;
        }
        self.cells[index] = player as u8 + 1;
        true
    }

    /// A win is checked before a full board, so a last move that
    /// completes a line is a win, not a draw.
    pub fn outcome(&self) -> Outcome {
        let winner = self.lines.iter().find_map(|line| {
            let first = self.cells[line[0]];
            (first != 0 && line.iter().all(|&i| self.cells[i] == first)).then_some(first)
        });
        match winner {
            Some(mark) => Outcome::Won(usize::from(mark) - 1),
            None if self.cells.iter().all(|&c| c != 0) => Outcome::Draw,
            None => Outcome::Running,
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}
