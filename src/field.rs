use crate::{
    kicks::{KickTable, Rotation},
    pieces::{Matrix, Tetromino},
    Coords,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Square {
    #[default]
    Empty,
    Filled(Tetromino),
}

impl Square {
    pub fn is_empty(&self) -> bool { matches!(self, Square::Empty) }

    pub fn is_filled(&self) -> bool { !self.is_empty() }

    // 0 for empty, otherwise the piece identity
    pub fn id(&self) -> u8 {
        match self {
            Square::Empty => 0,
            Square::Filled(kind) => kind.id(),
        }
    }

    pub fn from_id(id: u8) -> Option<Square> {
        match id {
            0 => Some(Square::Empty),
            _ => Tetromino::from_id(id).map(Square::Filled),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    squares: Vec<Square>,
}

impl Line {
    pub fn new(width: usize) -> Self {
        Line {
            squares: vec![Square::Empty; width],
        }
    }

    pub fn squares(&self) -> &[Square] { &self.squares }

    // every square is filled
    pub fn is_full(&self) -> bool { self.squares.iter().all(Square::is_filled) }

    pub fn is_empty(&self) -> bool { self.squares.iter().all(Square::is_empty) }

    fn clear(&mut self) { self.squares.fill(Square::Empty); }
}

// the grid of locked squares, row 0 is the top
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    width: usize,
    height: usize,
    lines: Vec<Line>,
}

impl Field {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "field must have at least one square");
        Field {
            width,
            height,
            lines: (0..height).map(|_| Line::new(width)).collect(),
        }
    }

    pub fn width(&self) -> usize { self.width }

    pub fn height(&self) -> usize { self.height }

    pub fn lines(&self) -> &[Line] { &self.lines }

    pub fn coords_in_bounds(&self, Coords(row, col): &Coords) -> bool {
        (0..self.height as i32).contains(row) && (0..self.width as i32).contains(col)
    }

    pub fn get_at(&self, coords: &Coords) -> Option<Square> {
        self.coords_in_bounds(coords)
            .then(|| self.lines[coords.0 as usize].squares[coords.1 as usize])
    }

    // returns false without writing anything if `coords` is out of bounds
    pub fn set_at(&mut self, coords: &Coords, square: Square) -> bool {
        let in_bounds = self.coords_in_bounds(coords);
        if in_bounds {
            self.lines[coords.0 as usize].squares[coords.1 as usize] = square;
        }
        in_bounds
    }

    // whether the occupied cells of `matrix` placed at `origin` overlap a wall, the floor or a filled square
    // cells above the top of the field are allowed
    pub fn collides(&self, matrix: &Matrix, origin: Coords) -> bool {
        matrix.occupied().any(|(offset, _)| {
            let Coords(row, col) = origin + offset;
            if col < 0 || col >= self.width as i32 || row >= self.height as i32 {
                true
            } else if row < 0 {
                false
            } else {
                self.lines[row as usize].squares[col as usize].is_filled()
            }
        })
    }

    // writes the piece into the field; the caller checks `collides` first
    pub fn merge(&mut self, matrix: &Matrix, origin: Coords) {
        for (offset, value) in matrix.occupied() {
            if let Some(square) = Square::from_id(value) {
                self.set_at(&(origin + offset), square);
            }
        }
    }

    // removes full lines from the bottom up, dropping everything above them
    // returns the number of lines removed
    pub fn sweep(&mut self) -> usize {
        let mut n_cleared = 0;
        let mut row = self.height;
        while row > 0 {
            // stay on the same row after a removal since the line above has moved into it
            if self.lines[row - 1].is_full() {
                self.lines.remove(row - 1);
                self.lines.insert(0, Line::new(self.width));
                n_cleared += 1;
            } else {
                row -= 1;
            }
        }
        n_cleared
    }

    pub fn reset(&mut self) { self.lines.iter_mut().for_each(Line::clear); }

    pub fn is_empty(&self) -> bool { self.lines.iter().all(Line::is_empty) }
}

// the falling piece: its own copy of the shape matrix and where the matrix origin sits on the field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LivePiece {
    kind: Tetromino,
    matrix: Matrix,
    origin: Coords,
}

impl LivePiece {
    // top row, horizontally centered
    pub fn spawn(kind: Tetromino, field_width: usize) -> Self {
        let matrix = kind.spawn_matrix();
        let col = (field_width / 2) as i32 - (matrix.width() / 2) as i32;
        LivePiece {
            kind,
            matrix,
            origin: Coords(0, col),
        }
    }

    pub fn kind(&self) -> Tetromino { self.kind }

    pub fn matrix(&self) -> &Matrix { &self.matrix }

    pub fn origin(&self) -> Coords { self.origin }

    // absolute coords of every occupied cell
    pub fn coords(&self) -> Vec<Coords> { self.matrix.occupied().map(|(offset, _)| self.origin + offset).collect() }

    pub fn is_blocked(&self, field: &Field) -> bool { field.collides(&self.matrix, self.origin) }

    fn shifted(&self, rows: i32, cols: i32) -> LivePiece {
        LivePiece {
            origin: self.origin + Coords(rows, cols),
            ..self.clone()
        }
    }

    // move the piece (fails if blocked)
    pub fn try_shift(&mut self, field: &Field, rows: i32, cols: i32) -> bool {
        let shifted = self.shifted(rows, cols);
        let blocked = shifted.is_blocked(field);
        if !blocked {
            *self = shifted;
        }
        !blocked
    }

    // rotates the piece, using the first kick that fits
    // the piece is left untouched if no kick fits
    pub fn try_rotate(&mut self, field: &Field, kick_table: &impl KickTable, rotation: Rotation) -> bool {
        let rotated = LivePiece {
            matrix: self.matrix.rotated(rotation),
            ..self.clone()
        };

        kick_table
            .kicks(rotated.matrix.width())
            .into_iter()
            .map(|Coords(rows, cols)| rotated.shifted(rows, cols))
            .find(|piece| !piece.is_blocked(field))
            .map(|piece| *self = piece)
            .is_some()
    }

    // lowest position reachable by moving straight down (shadow piece, hard drop)
    // a piece that is already blocked stays where it is
    pub fn projected_down(&self, field: &Field) -> LivePiece {
        let mut projected = self.clone();
        // bounded by the field height, the floor always blocks eventually
        for _ in 0..=field.height() {
            if !projected.try_shift(field, 1, 0) {
                break;
            }
        }
        projected
    }

    // write this piece into the field
    pub fn lock(&self, field: &mut Field) { field.merge(&self.matrix, self.origin); }
}
