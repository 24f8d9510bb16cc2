use crate::{kicks::Rotation, Coords};

pub use self::tetromino::{Tetromino, UnknownPieceError};

pub mod tetromino;

// square grid of cells describing a piece shape, 0 is empty and anything else is occupied
// every live piece owns its own matrix, so rotating one never affects the shape table or other pieces
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    cells: Vec<Vec<u8>>,
}

impl Matrix {
    pub fn new(cells: Vec<Vec<u8>>) -> Self {
        let size = cells.len();
        assert!(cells.iter().all(|row| row.len() == size), "piece matrices must be square");
        Matrix { cells }
    }

    pub fn width(&self) -> usize { self.cells.first().map_or(0, Vec::len) }

    pub fn height(&self) -> usize { self.cells.len() }

    pub fn rows(&self) -> &[Vec<u8>] { &self.cells }

    // offsets (relative to the matrix origin) and values of all occupied cells
    pub fn occupied(&self) -> impl Iterator<Item = (Coords, u8)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .filter(|(_, value)| **value != 0)
                .map(move |(col, value)| (Coords(row as i32, col as i32), *value))
        })
    }

    // rewrite every occupied cell to `value`
    pub fn fill(&mut self, value: u8) {
        self.cells.iter_mut().flatten().filter(|c| **c != 0).for_each(|c| *c = value);
    }

    // 90 degree rotation in place: transpose, then mirror
    pub fn rotate(&mut self, rotation: Rotation) {
        let size = self.cells.len();
        for row in 0..size {
            for col in 0..row {
                let tmp = self.cells[row][col];
                self.cells[row][col] = self.cells[col][row];
                self.cells[col][row] = tmp;
            }
        }

        match rotation {
            Rotation::Cw => self.cells.iter_mut().for_each(|row| row.reverse()),
            Rotation::Ccw => self.cells.reverse(),
        }
    }

    pub fn rotated(&self, rotation: Rotation) -> Matrix {
        let mut rotated = self.clone();
        rotated.rotate(rotation);
        rotated
    }
}
