//! Hand-authored floor-plan templates.
//!
//! ```text
//! ; comment
//! ##..##
//! ......
//! ```
//!
//! * One line per row; row index = `z`, column index = `x`.
//! * `#` or `B` = building lot, `.` or space = open street.

use std::{fs, io, path::Path};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("template has no rows")]
    Empty,

    #[error("row {row} is {found} cells wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unexpected character {ch:?} at row {row}, column {col}")]
    BadChar { ch: char, row: usize, col: usize },
}

/// Boolean occupancy plan, before archetypes are assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    width: usize,
    length: usize,
    occupied: Vec<bool>,
}

/// Downtown block layout used when no template file is configured.
pub const DOWNTOWN: &str = "\
; 26 x 26 downtown: 2x2 blocks separated by streets, walled in
##########################
#........................#
#.##.##.##.##.##.##.##.#.#
#.##.##.##.##.##.##.##.#.#
#........................#
#.##.##.##.##.##.##.##.#.#
#.##.##.##....##.##.##.#.#
#........................#
#.##.##.##.##.##.##.##.#.#
#.##.##.##.##.##.##.##.#.#
#........................#
#.##.##.....##.##.##.##..#
#.##.##.....##.##.##.##..#
#........................#
#.##.##.##.##.##.....##..#
#.##.##.##.##.##.....##..#
#........................#
#.##.##.##.##.##.##.##.#.#
#.##.##.##.##.##.##.##.#.#
#........................#
#.##....##.##.##.##.##.#.#
#.##....##.##.##.##.##.#.#
#........................#
#.##.##.##.##.##.##.##.#.#
#........................#
##########################
";

impl Template {
    /// Build from explicit rows of booleans (`true` = occupied).
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, TemplateError> {
        let width = rows.first().map(Vec::len).ok_or(TemplateError::Empty)?;
        if width == 0 {
            return Err(TemplateError::Empty);
        }
        let mut occupied = Vec::with_capacity(width * rows.len());
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width {
                return Err(TemplateError::Ragged {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            occupied.extend_from_slice(r);
        }
        Ok(Self {
            width,
            length: rows.len(),
            occupied,
        })
    }

    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with(';') {
                continue;
            }
            let row_idx = rows.len();
            let row = line
                .chars()
                .enumerate()
                .map(|(col, ch)| match ch {
                    '#' | 'B' => Ok(true),
                    '.' | ' ' => Ok(false),
                    _ => Err(TemplateError::BadChar {
                        ch,
                        row: row_idx,
                        col,
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.length)
    }

    /// Occupancy of `(x, z)`; panics outside the template.
    #[inline]
    pub fn is_occupied(&self, x: usize, z: usize) -> bool {
        assert!(
            x < self.width && z < self.length,
            "template cell ({x}, {z}) outside {}x{}",
            self.width,
            self.length
        );
        self.occupied[z * self.width + x]
    }

    /// Row-major occupancy flags.
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.occupied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let t = Template::parse("; header\n\n#.\n.B\n").unwrap();
        assert_eq!(t.dimensions(), (2, 2));
        assert!(t.is_occupied(0, 0));
        assert!(!t.is_occupied(1, 0));
        assert!(!t.is_occupied(0, 1));
        assert!(t.is_occupied(1, 1));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Template::parse("##\n#\n").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn unknown_characters_are_rejected() {
        let err = Template::parse("#x\n").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::BadChar {
                ch: 'x',
                row: 0,
                col: 1
            }
        ));
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(
            Template::parse("; nothing\n"),
            Err(TemplateError::Empty)
        ));
    }

    #[test]
    fn downtown_template_is_well_formed() {
        let t = Template::parse(DOWNTOWN).unwrap();
        assert_eq!(t.dimensions(), (26, 26));
        assert!(t.cells().iter().any(|&c| c));
        assert!(t.cells().iter().any(|&c| !c));
    }

    #[test]
    fn downtown_is_walled_in() {
        let t = Template::parse(DOWNTOWN).unwrap();
        let (w, l) = t.dimensions();
        for x in 0..w {
            assert!(t.is_occupied(x, 0) && t.is_occupied(x, l - 1), "open edge at column {x}");
        }
        for z in 0..l {
            assert!(t.is_occupied(0, z) && t.is_occupied(w - 1, z), "open edge at row {z}");
        }
    }

    #[test]
    fn loads_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "..#").unwrap();
        writeln!(f, "#..").unwrap();
        let t = Template::from_file(f.path()).unwrap();
        assert_eq!(t.dimensions(), (3, 2));
        assert!(t.is_occupied(2, 0));
        assert!(t.is_occupied(0, 1));
    }

    #[test]
    #[should_panic]
    fn out_of_range_lookup_panics() {
        let t = Template::parse("#.\n").unwrap();
        t.is_occupied(2, 0);
    }
}
