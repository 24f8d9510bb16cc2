use crate::Coords;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    Cw,
    Ccw,
}

// offsets to try, in order, when placing a freshly rotated piece
// the first offset that isn't blocked wins; none fitting cancels the rotation
// the search only depends on the piece size, both rotation directions use the same offsets
pub trait KickTable {
    fn kicks(&self, matrix_width: usize) -> Vec<Coords>;
}

// horizontal-only kicks from walking the piece +1, -2, +3, -4, ... columns from where it was
// the walk stops once the next step would be wider than the piece plus one
pub struct AlternatingKickTable;

impl KickTable for AlternatingKickTable {
    fn kicks(&self, matrix_width: usize) -> Vec<Coords> {
        let limit = matrix_width as i32 + 1;
        let mut kicks = vec![Coords(0, 0)];

        let mut col: i32 = 0;
        let mut step: i32 = 1;
        while step.abs() < limit {
            col += step;
            kicks.push(Coords(0, col));
            step = -(step + step.signum());
        }
        kicks
    }
}
