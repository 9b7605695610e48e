//! Piece catalog: canonical tetromino matrices keyed by the 7-symbol alphabet.

use rand::Rng;

/// Matrix of cell values: 0 = transparent, 1..=7 = the owning piece's identifier.
pub type Matrix = Vec<Vec<u8>>;

/// Tetromino kinds (O, I, Z, S, L, J, T).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    O,
    I,
    Z,
    S,
    L,
    J,
    T,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [
        Self::O,
        Self::I,
        Self::Z,
        Self::S,
        Self::L,
        Self::J,
        Self::T,
    ];

    /// Parse a catalog symbol. Unknown symbols map to `None`, never to an
    /// undefined grid.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'O' => Some(Self::O),
            'I' => Some(Self::I),
            'Z' => Some(Self::Z),
            'S' => Some(Self::S),
            'L' => Some(Self::L),
            'J' => Some(Self::J),
            'T' => Some(Self::T),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::O => 'O',
            Self::I => 'I',
            Self::Z => 'Z',
            Self::S => 'S',
            Self::L => 'L',
            Self::J => 'J',
            Self::T => 'T',
        }
    }

    /// Cell value (1..=7) this kind writes into the playfield. Doubles as the
    /// colour-lookup index.
    pub fn cell_value(self) -> u8 {
        match self {
            Self::O => 1,
            Self::I => 2,
            Self::Z => 3,
            Self::S => 4,
            Self::L => 5,
            Self::J => 6,
            Self::T => 7,
        }
    }

    /// Canonical matrix for this kind, always as a fresh copy. Rotation
    /// mutates the caller's copy; the catalog originals stay pristine.
    pub fn matrix(self) -> Matrix {
        match self {
            Self::O => vec![vec![1, 1], vec![1, 1]],
            Self::I => vec![
                vec![0, 2, 0, 0],
                vec![0, 2, 0, 0],
                vec![0, 2, 0, 0],
                vec![0, 2, 0, 0],
            ],
            Self::Z => vec![vec![3, 3, 0], vec![0, 3, 3], vec![0, 0, 0]],
            Self::S => vec![vec![0, 4, 4], vec![4, 4, 0], vec![0, 0, 0]],
            Self::L => vec![vec![0, 5, 0], vec![0, 5, 0], vec![0, 5, 5]],
            Self::J => vec![vec![0, 6, 0], vec![0, 6, 0], vec![6, 6, 0]],
            Self::T => vec![vec![0, 0, 0], vec![7, 7, 7], vec![0, 7, 0]],
        }
    }
}

/// Uniform choice over all 7 kinds.
pub fn random_kind<R: Rng>(rng: &mut R) -> PieceKind {
    PieceKind::ALL[rng.gen_range(0..PieceKind::ALL.len())]
}
