use glowtris::{
    field::Square,
    game::Game,
    pieces::{Matrix, Tetromino},
    Coords, Randomizer,
};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::util;

pub const SQUARE_WIDTH: usize = 20; // css pixels per square on the field
pub const NEXT_PIECE_WIDTH: usize = 80; // the next piece preview is a 4x4 grid of this size
pub const NEXT_PIECE_SQUARES: usize = 4;

pub const GLOW_BLUR: f64 = 18.0;
pub const GLOW_COLOR: &str = "#0ff";

pub fn square_color(id: u8) -> &'static str {
    match Tetromino::from_id(id) {
        Some(Tetromino::I) => "#0ff",
        Some(Tetromino::O) => "#f0f",
        Some(Tetromino::T) => "#ff0",
        Some(Tetromino::S) => "#0f0",
        Some(Tetromino::Z) => "#09f",
        Some(Tetromino::J) => "#f90",
        Some(Tetromino::L) => "#f09",
        None => "#0ff",
    }
}

// draws game state onto a canvas in square units
pub struct CanvasDrawer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasDrawer {
    pub fn from_id(id: &str) -> Option<Self> {
        let canvas = util::canvas_by_id(id)?;
        let context = util::context_2d(&canvas)?;
        Some(CanvasDrawer { canvas, context })
    }

    // size the backing store for the device pixel ratio and scale so one unit is `unit_px` css pixels
    fn prepare(&self, width_px: usize, height_px: usize, unit_px: f64) {
        let dpr = util::device_pixel_ratio();
        let (width, height) = ((width_px as f64 * dpr) as u32, (height_px as f64 * dpr) as u32);
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        let scale = dpr * unit_px;
        if self.context.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0).is_err() {
            util::log("failed to scale canvas");
        }
    }

    pub fn draw_field<R: Randomizer>(&self, game: &Game<R>) {
        let field = game.field();
        let (fw, fh) = (field.width(), field.height());
        self.prepare(fw * SQUARE_WIDTH, fh * SQUARE_WIDTH, SQUARE_WIDTH as f64);

        let ctx = &self.context;
        ctx.set_fill_style(&"#000".into());
        ctx.fill_rect(0.0, 0.0, fw as f64, fh as f64);

        let glow = game.glow_enabled();
        for (row, line) in field.lines().iter().enumerate() {
            let ids = line.squares().iter().map(Square::id);
            for (col, id) in ids.enumerate().filter(|(_, id)| *id != 0) {
                self.draw_square(id, Coords(row as i32, col as i32), glow);
            }
        }

        // the piece that failed to spawn isn't shown
        if !game.status().is_game_over() {
            let piece = game.cur_piece();
            self.draw_matrix(piece.matrix(), piece.origin(), glow);
        }
    }

    pub fn draw_next_piece(&self, kind: Tetromino) {
        self.prepare(NEXT_PIECE_WIDTH, NEXT_PIECE_WIDTH, 1.0);
        let cell = (NEXT_PIECE_WIDTH / NEXT_PIECE_SQUARES) as f64;

        let ctx = &self.context;
        ctx.set_fill_style(&"#000".into());
        ctx.fill_rect(0.0, 0.0, NEXT_PIECE_WIDTH as f64, NEXT_PIECE_WIDTH as f64);

        // centered in the grid
        let matrix = kind.spawn_matrix();
        let row_offset = (NEXT_PIECE_SQUARES as f64 - matrix.height() as f64) / 2.0;
        let col_offset = (NEXT_PIECE_SQUARES as f64 - matrix.width() as f64) / 2.0;

        ctx.set_fill_style(&square_color(kind.id()).into());
        for (Coords(row, col), _) in matrix.occupied() {
            let x = (col as f64 + col_offset) * cell;
            let y = (row as f64 + row_offset) * cell;
            ctx.fill_rect(x, y, cell, cell);
        }
    }

    fn draw_matrix(&self, matrix: &Matrix, origin: Coords, glow: bool) {
        for (offset, id) in matrix.occupied() {
            self.draw_square(id, origin + offset, glow);
        }
    }

    fn draw_square(&self, id: u8, Coords(row, col): Coords, glow: bool) {
        let ctx = &self.context;
        let (x, y) = (col as f64, row as f64);

        ctx.save();
        ctx.set_shadow_blur(if glow { GLOW_BLUR } else { 0.0 });
        if glow {
            ctx.set_shadow_color(GLOW_COLOR);
        }
        ctx.set_fill_style(&square_color(id).into());
        ctx.fill_rect(x, y, 1.0, 1.0);

        // slightly darker inset to separate neighbouring squares
        ctx.set_fill_style(&"rgba(0,0,0,0.06)".into());
        ctx.fill_rect(x + 0.02, y + 0.02, 0.96, 0.96);
        ctx.restore();
    }
}
