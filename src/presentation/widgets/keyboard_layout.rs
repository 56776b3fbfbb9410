//! Key grids of the on-screen keyboard and the cross-row column remap.

/// A key cap on the on-screen keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCap {
    Char(&'static str),
    Shift,
    Symbols,
    Letters,
    Space,
    Delete,
    Submit,
    Cancel,
}

impl KeyCap {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Char(c) => c,
            Self::Shift => "SHFT",
            Self::Symbols => "SYM",
            Self::Letters => "ABC",
            Self::Space => "SPC",
            Self::Delete => "DEL",
            Self::Submit => "OK",
            Self::Cancel => "CANC",
        }
    }

    #[must_use]
    pub const fn is_action(self) -> bool {
        !matches!(self, Self::Char(_))
    }
}

use KeyCap::{Cancel, Char, Delete, Letters, Shift, Space, Submit, Symbols};

const LETTERS_BOTTOM: &[KeyCap] = &[Shift, Symbols, Space, Delete, Submit, Cancel];
const SYMBOLS_BOTTOM: &[KeyCap] = &[Letters, Space, Delete, Submit, Cancel];

const LOWER: &[&[KeyCap]] = &[
    &[Char("1"), Char("2"), Char("3"), Char("4"), Char("5"), Char("6"), Char("7"), Char("8"), Char("9"), Char("0")],
    &[Char("q"), Char("w"), Char("e"), Char("r"), Char("t"), Char("y"), Char("u"), Char("i"), Char("o"), Char("p")],
    &[Char("a"), Char("s"), Char("d"), Char("f"), Char("g"), Char("h"), Char("j"), Char("k"), Char("l")],
    &[Char("z"), Char("x"), Char("c"), Char("v"), Char("b"), Char("n"), Char("m"), Char(","), Char(".")],
    LETTERS_BOTTOM,
];

const UPPER: &[&[KeyCap]] = &[
    &[Char("1"), Char("2"), Char("3"), Char("4"), Char("5"), Char("6"), Char("7"), Char("8"), Char("9"), Char("0")],
    &[Char("Q"), Char("W"), Char("E"), Char("R"), Char("T"), Char("Y"), Char("U"), Char("I"), Char("O"), Char("P")],
    &[Char("A"), Char("S"), Char("D"), Char("F"), Char("G"), Char("H"), Char("J"), Char("K"), Char("L")],
    &[Char("Z"), Char("X"), Char("C"), Char("V"), Char("B"), Char("N"), Char("M"), Char(","), Char(".")],
    LETTERS_BOTTOM,
];

// The empty fourth row keeps the bottom row on the same line as the letter layouts.
const SYMBOLS: &[&[KeyCap]] = &[
    &[Char("!"), Char("@"), Char("#"), Char("$"), Char("%"), Char("^"), Char("&"), Char("*"), Char("("), Char(")")],
    &[Char("-"), Char("_"), Char("="), Char("+"), Char("["), Char("]"), Char("{"), Char("}"), Char("\\"), Char("|")],
    &[Char(";"), Char(":"), Char("'"), Char("\""), Char("`"), Char("~"), Char("/"), Char("?"), Char("<"), Char(">")],
    &[],
    SYMBOLS_BOTTOM,
];

/// Which key grid is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardLayout {
    Lower,
    Upper,
    Symbols,
}

impl KeyboardLayout {
    pub const ALL: [Self; 3] = [Self::Lower, Self::Upper, Self::Symbols];

    #[must_use]
    pub const fn rows(self) -> &'static [&'static [KeyCap]] {
        match self {
            Self::Lower => LOWER,
            Self::Upper => UPPER,
            Self::Symbols => SYMBOLS,
        }
    }

    #[must_use]
    pub const fn bottom_row(self) -> usize {
        self.rows().len() - 1
    }

    #[must_use]
    pub fn key(self, row: usize, col: usize) -> Option<KeyCap> {
        self.rows().get(row)?.get(col).copied()
    }

    /// Next non-empty row above `row`, wrapping to the bottom.
    #[must_use]
    pub fn row_above(self, row: usize) -> usize {
        let rows = self.rows();
        let mut next = row;
        loop {
            next = if next == 0 { rows.len() - 1 } else { next - 1 };
            if !rows[next].is_empty() || next == row {
                return next;
            }
        }
    }

    /// Next non-empty row below `row`, wrapping to the top.
    #[must_use]
    pub fn row_below(self, row: usize) -> usize {
        let rows = self.rows();
        let mut next = row;
        loop {
            next = (next + 1) % rows.len();
            if !rows[next].is_empty() || next == row {
                return next;
            }
        }
    }

    /// Column to land on when moving vertically from `(from_row, col)` to
    /// `to_row`. Moves into or out of the action row follow a fixed table
    /// so each action key lines up with the keys drawn above it; every
    /// other move clamps.
    #[must_use]
    pub fn remap_column(self, from_row: usize, to_row: usize, col: usize) -> usize {
        let rows = self.rows();
        let to_len = rows[to_row].len();
        if to_len == 0 {
            return 0;
        }

        let last = to_len - 1;
        let bottom = self.bottom_row();
        let bottom_len = rows[bottom].len();
        let from_bottom = from_row == bottom;
        let to_bottom = to_row == bottom;

        if from_bottom && !to_bottom {
            let target = if bottom_len == 6 {
                match col {
                    0 => 0,
                    1 => 1,
                    2 => 4,
                    3 => 6,
                    4 => 7,
                    _ => last,
                }
            } else {
                match col {
                    0 => 0,
                    1 => to_len / 2,
                    2 => 6,
                    3 => 7,
                    _ => last,
                }
            };
            return target.min(last);
        }

        if to_bottom && !from_bottom {
            let target = if bottom_len == 6 {
                match col {
                    0 => 0,
                    1 | 2 => 1,
                    3..=5 => 2,
                    6 => 3,
                    7 => 4,
                    _ => 5,
                }
            } else {
                match col {
                    0 | 1 => 0,
                    2..=5 => 1,
                    6 => 2,
                    7 => 3,
                    _ => 4,
                }
            };
            return target.min(last);
        }

        col.min(last)
    }
}
