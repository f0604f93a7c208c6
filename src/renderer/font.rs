//! 5x7 bitmap font for HUD and popup text
//!
//! Lowercase letters render as uppercase. Characters without a glyph still
//! advance, so emoji in labels leave a gap rather than shifting the text.

use glam::Vec2;

pub const GLYPH_COLUMNS: u32 = 5;
pub const GLYPH_ROWS: u32 = 7;
/// Columns per character, including spacing
const ADVANCE: u32 = GLYPH_COLUMNS + 1;

/// Rows top to bottom, bit 4 is the leftmost column
type Glyph = [u8; GLYPH_ROWS as usize];

#[rustfmt::skip]
const LETTERS: [Glyph; 26] = [
    [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // A
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110], // B
    [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110], // C
    [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110], // D
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111], // E
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000], // F
    [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111], // G
    [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // H
    [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // I
    [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100], // J
    [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001], // K
    [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111], // L
    [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001], // M
    [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001], // N
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // O
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000], // P
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101], // Q
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001], // R
    [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110], // S
    [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // T
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // U
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // V
    [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010], // W
    [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001], // X
    [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100], // Y
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111], // Z
];

#[rustfmt::skip]
const DIGITS: [Glyph; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111], // 2
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110], // 3
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110], // 5
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000], // 7
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100], // 9
];

#[rustfmt::skip]
fn punctuation(c: char) -> Option<Glyph> {
    Some(match c {
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        _ => return None,
    })
}

pub fn glyph(c: char) -> Option<Glyph> {
    let c = c.to_ascii_uppercase();
    match c {
        'A'..='Z' => Some(LETTERS[(c as u8 - b'A') as usize]),
        '0'..='9' => Some(DIGITS[(c as u8 - b'0') as usize]),
        _ => punctuation(c),
    }
}

/// Size of one font pixel for a nominal font size (cap height is 0.7 em)
pub fn pixel_size(font_size: f32) -> f32 {
    font_size / 10.0
}

/// Rendered width of `text`, without trailing spacing
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let count = text.chars().count() as u32;
    if count == 0 {
        return 0.0;
    }
    (count * ADVANCE - 1) as f32 * pixel_size(font_size)
}

pub fn text_height(font_size: f32) -> f32 {
    GLYPH_ROWS as f32 * pixel_size(font_size)
}

/// Lit runs of `text` as (top-left, size) boxes, origin at the text's top-left
pub fn runs(text: &str, font_size: f32) -> Vec<(Vec2, Vec2)> {
    let px = pixel_size(font_size);
    let mut boxes = Vec::new();

    for (index, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let x0 = (index as u32 * ADVANCE) as f32 * px;

        for (row, bits) in rows.iter().enumerate() {
            let y = row as f32 * px;
            let mut col = 0;
            while col < GLYPH_COLUMNS {
                if bits & (1 << (GLYPH_COLUMNS - 1 - col)) == 0 {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < GLYPH_COLUMNS && bits & (1 << (GLYPH_COLUMNS - 1 - col)) != 0 {
                    col += 1;
                }
                boxes.push((
                    Vec2::new(x0 + start as f32 * px, y),
                    Vec2::new((col - start) as f32 * px, px),
                ));
            }
        }
    }

    boxes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_maps_to_uppercase() {
        assert_eq!(glyph('g'), glyph('G'));
        assert!(glyph('z').is_some());
        assert!(glyph('🌟').is_none());
        assert!(glyph(' ').is_none());
    }

    #[test]
    fn test_width_counts_every_char() {
        // 10 px font: 1 px per font pixel, 6 per advance
        assert_eq!(text_width("", 10.0), 0.0);
        assert_eq!(text_width("A", 10.0), 5.0);
        assert_eq!(text_width("AB", 10.0), 11.0);
        assert_eq!(text_width("+5 🌟", 10.0), 23.0);
        assert_eq!(text_height(20.0), 14.0);
    }

    #[test]
    fn test_runs_merge_horizontal_pixels() {
        // '-' is a single row of five pixels
        let boxes = runs("-", 10.0);
        assert_eq!(boxes, vec![(Vec2::new(0.0, 3.0), Vec2::new(5.0, 1.0))]);

        // Unknown glyphs advance without drawing
        let boxes = runs("?-", 10.0);
        assert_eq!(boxes[0].0, Vec2::new(6.0, 3.0));
    }

    #[test]
    fn test_all_glyphs_fit_grid() {
        for g in LETTERS.iter().chain(DIGITS.iter()) {
            assert!(g.iter().all(|row| *row < 1 << GLYPH_COLUMNS));
            assert!(g.iter().any(|row| *row != 0));
        }
    }
}
