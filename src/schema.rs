//! Methods for converting to and from a textual field representation.
//!
//! This is mostly useful for writing more complicated test cases: a
//! fixture field can be drawn as a string, and an end state can be
//! compared against a drawn expectation.
//!
//! ## Examples
//!
//! ```
//! use faststack::schema::Schema;
//! use faststack::field::Field;
//!
//! let mut field = Field::new(10, 20);
//! Schema::from_string(
//!     "
//!     |#         |
//!     |##       #|
//!     ------------
//! ",
//! )
//! .apply_to(&mut field);
//!
//! assert!(field.occupied(0, 18));
//! assert!(field.occupied(9, 19));
//! ```

use engine::Engine;
use field::Field;
use piece::{GARBAGE_COLOR, PieceType};

use itertools::Itertools;
use std::fmt;
use std::iter;

/// A simple 2d textual representation of a field, and optionally the
/// active piece.
///
/// `#` marks a locked cell, `@` a cell of the active piece and a space an
/// empty cell. Rows are bordered by `|` characters and the bottom border
/// is dashes; leading and trailing whitespace is ignored so differently
/// indented strings produce the same schema.
#[derive(Clone, Debug)]
pub struct Schema {
    /// Field data in row-major `(y, x)` order.
    data: Vec<Vec<char>>,

    /// The width of the schema.
    width: usize,

    /// The height of the schema.
    height: usize,
}

impl Schema {
    /// Construct a schema representation from an input string.
    ///
    /// # Panics
    ///
    /// Panics on empty input or uneven row lengths, both of which are
    /// authoring mistakes in a fixture.
    pub fn from_string(source: &str) -> Schema {
        let grid = source
            .split('\n')
            .map(|line| {
                line.trim()
                    .chars()
                    .filter(|&c| c != '|' && c != '-')
                    .collect_vec()
            })
            .filter(|row| !row.is_empty())
            .collect_vec();

        assert!(!grid.is_empty(), "empty input");
        assert!(
            grid.iter().map(|row| row.len()).dedup().count() == 1,
            "uneven row lengths"
        );

        let width = grid[0].len();
        let height = grid.len();

        Schema {
            data: grid,
            width,
            height,
        }
    }

    /// Construct a schema from a field alone.
    pub fn from_field(field: &Field) -> Schema {
        let mut grid = vec![vec![' '; field.width]; field.height];

        for (y, row) in grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                if field.occupied(x as i32, y as i32) {
                    *cell = '#';
                }
            }
        }

        Schema {
            width: field.width,
            height: field.height,
            data: grid,
        }
    }

    /// Construct a schema from an engine's field and active piece.
    ///
    /// # Panics
    ///
    /// Panics if the active piece overlaps the stack, which indicates a
    /// corrupt game state.
    pub fn from_engine(engine: &Engine) -> Schema {
        let mut schema = Schema::from_field(&engine.field);

        if engine.piece != PieceType::None {
            let blocks = engine.piece_blocks(engine.piece, engine.x, engine.y, engine.theta);
            for &(bx, by) in blocks.iter() {
                let cell = &mut schema.data[by as usize][bx as usize];
                assert!(*cell == ' ', "active piece overlaps stack at ({}, {})", bx, by);
                *cell = '@';
            }
        }

        schema
    }

    /// Write this schema's cells into an existing field.
    ///
    /// The schema is aligned to the bottom of the field, so fixtures only
    /// need to draw the interesting lower rows. Both `#` and `@` become
    /// occupied cells.
    ///
    /// # Panics
    ///
    /// Panics if the schema is wider or taller than the field.
    pub fn apply_to(&self, field: &mut Field) {
        assert!(self.width <= field.width && self.height <= field.height);
        let y_offset = field.height - self.height;

        for (y, row) in self.data.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell != ' ' {
                    field.fill(x, y + y_offset, GARBAGE_COLOR);
                }
            }
        }
    }

    /// Truncate to the simplest form by removing leading empty rows.
    fn truncate(&self) -> Schema {
        let mut schema = self.clone();
        let empty = iter::repeat(' ').take(self.width).collect_vec();

        schema.data.retain(|row| row.as_slice() != empty.as_slice());
        schema.height = schema.data.len();
        schema
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let body = self
            .data
            .iter()
            .map(|row| row.iter().collect::<String>())
            .join("|\n|");
        let border: String = iter::repeat('-').take(self.width + 2).collect();

        write!(f, "|{}|\n{}", body, border)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Schema) -> bool {
        self.width == other.width && self.truncate().data == other.truncate().data
    }
}
