//! Game state: playfield, active piece, collision, wall-kick rotation, row clears.

use crate::pieces::{self, Matrix, PieceKind};
use rand::rngs::StdRng;

/// Rotation direction for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// Session status. Game over is a distinct terminal state, not an overloaded
/// pause: it behaves like the pause menu with Reset pre-selected and Resume
/// unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    Paused,
    GameOver,
}

/// Highlighted pause-menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Resume,
    Reset,
}

impl MenuItem {
    fn toggled(self) -> Self {
        match self {
            Self::Resume => Self::Reset,
            Self::Reset => Self::Resume,
        }
    }
}

/// Logical commands consumed by the session. Timer ticks and key presses are
/// merged into this one alphabet and processed serially, one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    SoftDrop,
    TogglePause,
    MenuUp,
    MenuDown,
    MenuSelect,
    Tick,
}

/// Emitted by [`Session::handle`] when the app must act outside the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Tear the session down and reinitialise a fresh one after the
    /// configured delay.
    ResetRequested,
}

/// Playfield: `height` rows of `width` cells, rows ordered top-to-bottom.
/// A cell is occupied iff its value is nonzero.
#[derive(Debug, Clone)]
pub struct Playfield {
    width: usize,
    height: usize,
    rows: Vec<Vec<u8>>,
}

impl Playfield {
    /// Zero-filled grid of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![0; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell value at (x, y); 0 for out-of-range coordinates. Rendering only —
    /// collision goes through [`Self::collides`], where out-of-range means
    /// occupied, not empty.
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(0)
    }

    /// True if any nonzero matrix cell, translated by (x, y), overlaps an
    /// occupied playfield cell or falls outside the grid. The grid does not
    /// wrap; reading past any edge counts as a collision.
    pub fn collides(&self, matrix: &Matrix, x: i32, y: i32) -> bool {
        for (cy, row) in matrix.iter().enumerate() {
            for (cx, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let px = x + cx as i32;
                let py = y + cy as i32;
                if px < 0 || py < 0 || px >= self.width as i32 || py >= self.height as i32 {
                    return true;
                }
                if self.rows[py as usize][px as usize] != 0 {
                    return true;
                }
            }
        }
        false
    }

    /// Write each nonzero matrix cell into the grid at (x, y). Returns true
    /// if any cell landed in row 0 (the spawn row), which ends the session.
    fn merge(&mut self, matrix: &Matrix, x: i32, y: i32) -> bool {
        let mut touched_top = false;
        for (cy, row) in matrix.iter().enumerate() {
            for (cx, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let px = x + cx as i32;
                let py = y + cy as i32;
                if px >= 0 && py >= 0 && px < self.width as i32 && py < self.height as i32 {
                    self.rows[py as usize][px as usize] = value;
                    touched_top |= py == 0;
                }
            }
        }
        touched_top
    }

    /// Remove every complete row, inserting a fresh zero row at the top for
    /// each so the row count stays `height`. Returns the number of rows
    /// cleared. Removal plus top-insertion leaves the indices of rows below
    /// the cleared one unchanged, so a single forward scan visits every
    /// original row exactly once.
    fn sweep(&mut self) -> u32 {
        let mut cleared = 0;
        for y in 0..self.height {
            if self.rows[y].iter().all(|&cell| cell != 0) {
                self.rows.remove(y);
                self.rows.insert(0, vec![0; self.width]);
                cleared += 1;
            }
        }
        cleared
    }
}

/// The tetromino currently under player control: a private matrix copy plus
/// its top-left anchor in playfield coordinates.
#[derive(Debug, Clone)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub matrix: Matrix,
    pub x: i32,
    pub y: i32,
}

impl ActivePiece {
    pub fn new(kind: PieceKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            matrix: kind.matrix(),
            x,
            y,
        }
    }
}

/// Rotate a square matrix 90° in place: transpose, then reverse each row
/// (clockwise) or reverse the row order (counter-clockwise).
pub fn rotate_matrix(matrix: &mut Matrix, direction: Rotation) {
    for y in 0..matrix.len() {
        for x in 0..y {
            let (a, b) = (matrix[y][x], matrix[x][y]);
            matrix[y][x] = b;
            matrix[x][y] = a;
        }
    }
    match direction {
        Rotation::Clockwise => {
            for row in matrix.iter_mut() {
                row.reverse();
            }
        }
        Rotation::CounterClockwise => matrix.reverse(),
    }
}

/// One game session: playfield, active piece, menu state and the
/// rows-completed counter. All mutation goes through [`Session::handle`].
#[derive(Debug)]
pub struct Session {
    pub playfield: Playfield,
    pub piece: Option<ActivePiece>,
    pub rows_completed: u32,
    pub status: Status,
    pub menu_selection: MenuItem,
    /// Forced kind for the first spawn (practice); consumed on use.
    first_piece: Option<PieceKind>,
    rng: StdRng,
}

impl Session {
    pub fn new(width: usize, height: usize, first_piece: Option<PieceKind>, rng: StdRng) -> Self {
        let mut session = Self {
            playfield: Playfield::new(width, height),
            piece: None,
            rows_completed: 0,
            status: Status::Playing,
            menu_selection: MenuItem::Resume,
            first_piece,
            rng,
        };
        session.spawn();
        session
    }

    /// Apply one command. Returns an event when the app must act (reset).
    pub fn handle(&mut self, command: Command) -> Option<SessionEvent> {
        match self.status {
            Status::Playing => match command {
                Command::MoveLeft => self.shift(-1),
                Command::MoveRight => self.shift(1),
                Command::RotateCw => self.rotate(Rotation::Clockwise),
                Command::RotateCcw => self.rotate(Rotation::CounterClockwise),
                Command::SoftDrop | Command::Tick => self.descend(),
                Command::TogglePause => {
                    self.status = Status::Paused;
                    self.menu_selection = MenuItem::Resume;
                }
                Command::MenuUp | Command::MenuDown | Command::MenuSelect => {}
            },
            Status::Paused => match command {
                Command::TogglePause => self.status = Status::Playing,
                Command::MenuUp | Command::MenuDown => {
                    self.menu_selection = self.menu_selection.toggled();
                }
                Command::MenuSelect => match self.menu_selection {
                    MenuItem::Resume => self.status = Status::Playing,
                    MenuItem::Reset => return Some(SessionEvent::ResetRequested),
                },
                _ => {}
            },
            Status::GameOver => {
                // Reset is pre-selected; everything else is inert.
                if command == Command::MenuSelect {
                    return Some(SessionEvent::ResetRequested);
                }
            }
        }
        None
    }

    /// Spawn column centres the matrix: width/2 − matrix_width/2, row 0.
    fn spawn(&mut self) {
        let kind = self
            .first_piece
            .take()
            .unwrap_or_else(|| pieces::random_kind(&mut self.rng));
        let matrix_width = kind.matrix().len() as i32;
        let x = self.playfield.width as i32 / 2 - matrix_width / 2;
        self.piece = Some(ActivePiece::new(kind, x, 0));
    }

    /// Shift the piece horizontally, reverting the move on collision.
    fn shift(&mut self, dx: i32) {
        let Some(piece) = self.piece.as_mut() else {
            return;
        };
        piece.x += dx;
        if self.playfield.collides(&piece.matrix, piece.x, piece.y) {
            piece.x -= dx;
        }
    }

    /// Rotate with wall-kick resolution. Kick offsets are +1, −2, +3, −4, …
    /// (`offset = −(offset + signum(offset))`); once |offset| exceeds the
    /// matrix width the rotation is aborted: the matrix is rotated back and
    /// the original x restored exactly.
    fn rotate(&mut self, direction: Rotation) {
        let Some(piece) = self.piece.as_mut() else {
            return;
        };
        let original_x = piece.x;
        let matrix_width = piece.matrix.first().map_or(0, Vec::len) as i32;
        rotate_matrix(&mut piece.matrix, direction);
        let mut offset = 1;
        while self.playfield.collides(&piece.matrix, piece.x, piece.y) {
            piece.x += offset;
            offset = -(offset + offset.signum());
            if offset.abs() > matrix_width {
                rotate_matrix(&mut piece.matrix, direction.reversed());
                piece.x = original_x;
                return;
            }
        }
    }

    /// Advance one row (tick gravity or soft drop), then resolve.
    fn descend(&mut self) {
        let Some(piece) = self.piece.as_mut() else {
            return;
        };
        piece.y += 1;
        self.resolve();
    }

    /// If the piece now collides, revert the vertical step to the last valid
    /// resting position, merge, then either end the session (a merged cell
    /// landed in the spawn row) or clear rows and spawn the next piece.
    fn resolve(&mut self) {
        let colliding = match &self.piece {
            Some(p) => self.playfield.collides(&p.matrix, p.x, p.y),
            None => return,
        };
        if !colliding {
            return;
        }
        if let Some(mut piece) = self.piece.take() {
            piece.y -= 1;
            let touched_top = self.playfield.merge(&piece.matrix, piece.x, piece.y);
            if touched_top {
                self.status = Status::GameOver;
                self.menu_selection = MenuItem::Reset;
            } else {
                self.rows_completed += self.playfield.sweep();
                self.spawn();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn session(width: usize, height: usize) -> Session {
        Session::new(width, height, None, StdRng::seed_from_u64(42))
    }

    /// Session with a fixed piece instead of the random spawn.
    fn session_with(width: usize, height: usize, piece: ActivePiece) -> Session {
        let mut s = session(width, height);
        s.piece = Some(piece);
        s
    }

    #[test]
    fn test_new_playfield_is_all_zero() {
        let field = Playfield::new(12, 20);
        assert_eq!(field.width(), 12);
        assert_eq!(field.height(), 20);
        for y in 0..20 {
            for x in 0..12 {
                assert_eq!(field.cell(x, y), 0);
            }
        }
    }

    #[test]
    fn test_no_collision_on_empty_field_in_bounds() {
        let field = Playfield::new(12, 20);
        for kind in PieceKind::ALL {
            assert!(!field.collides(&kind.matrix(), 4, 3), "{:?}", kind);
        }
    }

    #[test]
    fn test_out_of_bounds_is_a_collision() {
        let field = Playfield::new(12, 20);
        let m = PieceKind::O.matrix();
        assert!(field.collides(&m, -1, 0), "past left edge");
        assert!(field.collides(&m, 11, 0), "past right edge");
        assert!(field.collides(&m, 0, 19), "past bottom edge");
        assert!(field.collides(&m, 0, -1), "above top edge");
    }

    #[test]
    fn test_zero_cells_do_not_occupy() {
        let field = Playfield::new(12, 20);
        // I's matrix is 4 wide but only column 1 is solid; x = -1 puts the
        // solid column at 0 with transparent cells hanging past the edge.
        let m = PieceKind::I.matrix();
        assert!(!field.collides(&m, -1, 0));
        assert!(field.collides(&m, -2, 0));
    }

    #[test]
    fn test_rotate_four_times_is_identity() {
        for kind in PieceKind::ALL {
            for direction in [Rotation::Clockwise, Rotation::CounterClockwise] {
                let mut m = kind.matrix();
                for _ in 0..4 {
                    rotate_matrix(&mut m, direction);
                }
                assert_eq!(m, kind.matrix(), "{:?} {:?}", kind, direction);
            }
        }
    }

    #[test]
    fn test_rotate_then_counter_rotate_is_identity() {
        for kind in PieceKind::ALL {
            let mut m = kind.matrix();
            rotate_matrix(&mut m, Rotation::Clockwise);
            rotate_matrix(&mut m, Rotation::CounterClockwise);
            assert_eq!(m, kind.matrix(), "{:?}", kind);
        }
    }

    #[test]
    fn test_sweep_clears_exactly_the_complete_row() {
        let mut field = Playfield::new(4, 5);
        // Row 3 complete; row 4 has a hole.
        field.rows[3] = vec![1, 2, 3, 4];
        field.rows[4] = vec![1, 0, 1, 1];
        let cleared = field.sweep();
        assert_eq!(cleared, 1);
        assert_eq!(field.rows.len(), 5);
        assert_eq!(field.rows[0], vec![0, 0, 0, 0], "fresh top row");
        assert_eq!(field.rows[4], vec![1, 0, 1, 1], "incomplete row kept");
        assert!(field.rows[3].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_sweep_clears_adjacent_rows_in_one_pass() {
        let mut field = Playfield::new(3, 4);
        field.rows[2] = vec![1, 1, 1];
        field.rows[3] = vec![2, 2, 2];
        assert_eq!(field.sweep(), 2);
        assert_eq!(field.rows.len(), 4);
        assert!(field.rows.iter().flatten().all(|&c| c == 0));
    }

    #[test]
    fn test_wall_kick_succeeds_within_piece_width() {
        // Vertical I flush against the left wall: the solid column sits at
        // x=0 when the anchor is -1. Rotating to horizontal needs a +1 kick.
        let mut s = session_with(12, 20, ActivePiece::new(PieceKind::I, -1, 3));
        s.handle(Command::RotateCw);
        let piece = s.piece.as_ref().unwrap();
        assert_eq!(piece.x, 0, "kicked one column right");
        assert_eq!(piece.matrix[1], vec![2, 2, 2, 2], "now horizontal");
    }

    #[test]
    fn test_wall_kick_aborts_and_restores_exactly() {
        // Occupy row 4 except column 0, so the horizontal I fits nowhere on
        // that row; the kick search must give up and restore the vertical
        // piece at its original anchor.
        let mut s = session_with(12, 20, ActivePiece::new(PieceKind::I, -1, 3));
        for x in 1..12 {
            s.playfield.rows[4][x] = 9;
        }
        let before = s.piece.as_ref().unwrap().matrix.clone();
        s.handle(Command::RotateCw);
        let piece = s.piece.as_ref().unwrap();
        assert_eq!(piece.x, -1, "original x restored");
        assert_eq!(piece.matrix, before, "original orientation restored");
    }

    #[test]
    fn test_horizontal_move_reverts_on_collision() {
        let mut s = session_with(12, 20, ActivePiece::new(PieceKind::O, 0, 5));
        s.handle(Command::MoveLeft);
        assert_eq!(s.piece.as_ref().unwrap().x, 0, "blocked by the wall");
        s.handle(Command::MoveRight);
        assert_eq!(s.piece.as_ref().unwrap().x, 1);
    }

    #[test]
    fn test_o_piece_locks_at_bottom_and_respawns() {
        let mut s = session_with(12, 12, ActivePiece::new(PieceKind::O, 5, 0));
        // Tick until the O locks: it rests when y reaches h - 2 = 10.
        let mut ticks = 0;
        while s.playfield.cell(5, 11) == 0 {
            s.handle(Command::Tick);
            ticks += 1;
            assert!(ticks <= 12, "O should have locked by now");
        }
        assert_eq!(ticks, 11, "lock happens on the step past the floor");
        for y in 10..12 {
            assert_eq!(s.playfield.cell(5, y), 1);
            assert_eq!(s.playfield.cell(6, y), 1);
        }
        assert_eq!(s.playfield.cell(5, 9), 0, "nothing above the lock");
        assert_eq!(s.status, Status::Playing);
        let next = s.piece.as_ref().unwrap();
        assert_eq!(next.y, 0, "next piece spawns at the top");
        let expected_x = 12 / 2 - next.matrix.len() as i32 / 2;
        assert_eq!(next.x, expected_x);
    }

    #[test]
    fn test_completing_bottom_row_increments_counter() {
        let mut s = session_with(12, 12, ActivePiece::new(PieceKind::O, 5, 0));
        // Fill the bottom two rows except the O's landing columns 5 and 6.
        for y in 10..12 {
            for x in 0..12 {
                if x != 5 && x != 6 {
                    s.playfield.rows[y][x] = 3;
                }
            }
        }
        for _ in 0..12 {
            s.handle(Command::Tick);
        }
        assert_eq!(s.rows_completed, 2);
        assert_eq!(s.playfield.height(), 12);
        assert!(
            s.playfield.rows[10].iter().all(|&c| c == 0)
                && s.playfield.rows[11].iter().all(|&c| c == 0),
            "both completed rows removed"
        );
    }

    #[test]
    fn test_lock_in_spawn_row_ends_the_session() {
        let mut s = session_with(12, 12, ActivePiece::new(PieceKind::O, 5, 0));
        // A stack right below the spawn position forces a lock at y = 0.
        for y in 2..12 {
            s.playfield.rows[y][5] = 4;
        }
        s.handle(Command::Tick);
        assert_eq!(s.status, Status::GameOver);
        assert_eq!(s.menu_selection, MenuItem::Reset);
        assert!(s.piece.is_none());
        // The ended session ignores gameplay and ticks, but Reset works.
        assert_eq!(s.handle(Command::Tick), None);
        assert_eq!(s.handle(Command::MoveLeft), None);
        assert_eq!(
            s.handle(Command::MenuSelect),
            Some(SessionEvent::ResetRequested)
        );
    }

    #[test]
    fn test_pause_menu_transitions() {
        let mut s = session(12, 20);
        s.handle(Command::TogglePause);
        assert_eq!(s.status, Status::Paused);
        assert_eq!(s.menu_selection, MenuItem::Resume);

        // Ticks and moves are inert while paused.
        let y_before = s.piece.as_ref().unwrap().y;
        s.handle(Command::Tick);
        assert_eq!(s.piece.as_ref().unwrap().y, y_before);

        s.handle(Command::MenuDown);
        assert_eq!(s.menu_selection, MenuItem::Reset);
        s.handle(Command::MenuUp);
        assert_eq!(s.menu_selection, MenuItem::Resume);

        assert_eq!(s.handle(Command::MenuSelect), None);
        assert_eq!(s.status, Status::Playing);

        s.handle(Command::TogglePause);
        s.handle(Command::MenuDown);
        assert_eq!(
            s.handle(Command::MenuSelect),
            Some(SessionEvent::ResetRequested)
        );
    }

    #[test]
    fn test_first_piece_is_honoured_once() {
        let mut s = Session::new(12, 20, Some(PieceKind::I), StdRng::seed_from_u64(0));
        assert_eq!(s.piece.as_ref().unwrap().kind, PieceKind::I);
        // Drop it to the floor: the solid column (x=5) locks down to row 19,
        // and the replacement spawns fresh at the top.
        let mut ticks = 0;
        while s.playfield.cell(5, 19) == 0 {
            s.handle(Command::Tick);
            ticks += 1;
            assert!(ticks <= 20, "I should have locked by now");
        }
        assert!(s.piece.is_some());
        assert_eq!(s.piece.as_ref().unwrap().y, 0);
    }

    #[test]
    fn test_soft_drop_advances_one_row() {
        let mut s = session_with(12, 20, ActivePiece::new(PieceKind::T, 4, 2));
        s.handle(Command::SoftDrop);
        assert_eq!(s.piece.as_ref().unwrap().y, 3);
    }
}
