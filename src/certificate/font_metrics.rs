//! Glyph widths for the built-in PDF fonts used on certificates.
//!
//! Widths are the Adobe AFM advance widths for printable ASCII, in 1/1000 em.

use serde::{Deserialize, Serialize};

const UNITS_PER_EM: f32 = 1000.0;
const FIRST_CHAR: u32 = 0x20;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Font faces available to draw instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    fn widths(&self) -> &'static [u16; 95] {
        match self {
            Self::Regular => &HELVETICA,
            Self::Bold => &HELVETICA_BOLD,
        }
    }

    /// Advance width of `c` in em units. Characters outside printable ASCII
    /// use the digit width.
    pub fn char_width(&self, c: char) -> u16 {
        let index = (c as u32).wrapping_sub(FIRST_CHAR) as usize;
        self.widths().get(index).copied().unwrap_or(556)
    }

    /// Width of `text` in points at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 / UNITS_PER_EM * font_size
    }
}

/// Measures text set in the regular body face.
pub fn body_text_width(text: &str, font_size: f32) -> f32 {
    FontFace::Regular.text_width(text, font_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_width() {
        assert_eq!(FontFace::Regular.char_width(' '), 278);
        assert_eq!(FontFace::Bold.char_width(' '), 278);
    }

    #[test]
    fn test_table_alignment() {
        assert_eq!(FontFace::Regular.char_width('A'), 667);
        assert_eq!(FontFace::Regular.char_width('i'), 222);
        assert_eq!(FontFace::Regular.char_width('~'), 584);
        assert_eq!(FontFace::Bold.char_width('W'), 944);
        assert_eq!(FontFace::Bold.char_width('m'), 889);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        // "Hello": H=722 e=556 l=222 l=222 o=556 -> 2278 units
        let width = FontFace::Regular.text_width("Hello", 10.0);
        assert!((width - 22.78).abs() < 0.001);
        assert!((body_text_width("Hello", 20.0) - 45.56).abs() < 0.001);
    }

    #[test]
    fn test_non_ascii_uses_default_width() {
        assert_eq!(FontFace::Regular.char_width('é'), 556);
        assert_eq!(FontFace::Regular.char_width('\n'), 556);
    }
}
