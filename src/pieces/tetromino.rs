use std::{fmt, str::FromStr};

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use strum_macros::EnumIter;

use super::Matrix;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown piece type '{letter}'")]
pub struct UnknownPieceError {
    letter: String,
}

// the seven tetrominos, discriminants are the identities written into the field
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tetromino {
    I = 1,
    O = 2,
    T = 3,
    S = 4,
    Z = 5,
    J = 6,
    L = 7,
}

impl Tetromino {
    pub fn id(&self) -> u8 { self.to_u8().unwrap_or(0) }

    pub fn from_id(id: u8) -> Option<Tetromino> { Tetromino::from_u8(id) }

    pub fn letter(&self) -> char {
        match self {
            Tetromino::I => 'I',
            Tetromino::O => 'O',
            Tetromino::T => 'T',
            Tetromino::S => 'S',
            Tetromino::Z => 'Z',
            Tetromino::J => 'J',
            Tetromino::L => 'L',
        }
    }

    pub fn from_letter(letter: char) -> Result<Tetromino, UnknownPieceError> {
        match letter {
            'I' => Ok(Tetromino::I),
            'O' => Ok(Tetromino::O),
            'T' => Ok(Tetromino::T),
            'S' => Ok(Tetromino::S),
            'Z' => Ok(Tetromino::Z),
            'J' => Ok(Tetromino::J),
            'L' => Ok(Tetromino::L),
            _ => Err(UnknownPieceError {
                letter: letter.to_string(),
            }),
        }
    }

    // fresh 0/1 copy of the shape, sized to its rotation extent
    pub fn shape(&self) -> Matrix {
        let rows: &[&[u8]] = match self {
            Tetromino::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
            Tetromino::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
        };
        Matrix::new(rows.iter().map(|row| row.to_vec()).collect())
    }

    // shape with occupied cells set to this piece's identity
    pub fn spawn_matrix(&self) -> Matrix {
        let mut matrix = self.shape();
        matrix.fill(self.id());
        matrix
    }
}

impl fmt::Display for Tetromino {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.letter()) }
}

impl FromStr for Tetromino {
    type Err = UnknownPieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Tetromino::from_letter(letter),
            _ => Err(UnknownPieceError { letter: s.to_string() }),
        }
    }
}
