//! Advance-width tables for the built-in fonts.
//!
//! Widths are in 1/1000 em for the printable ASCII range (U+0020..U+007E),
//! taken from the Adobe core font metrics. Characters outside the table use
//! the width of `n`, which is a serviceable average for Latin text.

const FIRST_CHAR: u32 = 0x20;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Per-character advance widths of a built-in font.
#[derive(Debug, Clone, Copy)]
pub enum StandardFontMetrics {
    /// Proportional table lookup.
    Table(&'static [u16; 95]),
    /// Every glyph has the same advance.
    Monospace(u16),
}

impl StandardFontMetrics {
    pub const HELVETICA: Self = Self::Table(&HELVETICA_WIDTHS);
    pub const HELVETICA_BOLD: Self = Self::Table(&HELVETICA_BOLD_WIDTHS);
    pub const COURIER: Self = Self::Monospace(600);

    /// Advance width of `ch` in units per 1000 em.
    fn units(&self, ch: char) -> u16 {
        match self {
            Self::Monospace(w) => *w,
            Self::Table(widths) => {
                let idx = (ch as u32).wrapping_sub(FIRST_CHAR) as usize;
                widths
                    .get(idx)
                    .copied()
                    .unwrap_or(widths[(b'n' as u32 - FIRST_CHAR) as usize])
            }
        }
    }

    /// Advance width of a character in scene units.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.units(ch) as f64 / 1000.0 * font_size
    }

    /// Width of a whole string in scene units.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars()
            .map(|ch| self.char_width(ch, font_size))
            .sum()
    }
}
