/// Color cycle engine: palettes and triangle-wave color animation.
///
/// All three cycles share one index law. For a palette of length L and a
/// position p (frame counter, optionally offset per line or per character):
///
///   m = p mod (2L - 2)
///   index = m            if m < L
///   index = (2L - 2) - m otherwise
///
/// The index sweeps 0 → L-1 → 1 → 0 with no repeated endpoint, so the
/// animation never stalls or jumps at the wrap.
///
/// Output is a `StyledBlock`: the exact input text split into lines, each
/// line a list of spans carrying one color token. Nothing is added to or
/// removed from the characters themselves.

use crossterm::style::Color;
use serde::Deserialize;

use super::layout::LayoutError;

// ── Color tokens & palettes ──

/// One display attribute: a foreground color, optionally bold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorToken {
    pub color: Color,
    pub bold: bool,
}

impl ColorToken {
    /// 256-color palette entry.
    pub const fn indexed(code: u8) -> Self {
        ColorToken { color: Color::AnsiValue(code), bold: false }
    }

    pub const fn basic(color: Color, bold: bool) -> Self {
        ColorToken { color, bold }
    }
}

/// Ordered, non-empty color sequence. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    tokens: Vec<ColorToken>,
}

/// Built-in palettes selectable from `config.toml`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteName {
    Red,
    Blue,
    Green,
    Greyscale,
    Rainbow,
    All,
}

const RED_CODES: [u8; 12] = [88, 124, 125, 160, 161, 196, 197, 202, 203, 208, 209, 9];
const BLUE_CODES: [u8; 12] = [17, 18, 19, 20, 21, 26, 27, 33, 38, 39, 45, 51];
const GREEN_CODES: [u8; 12] = [22, 23, 28, 29, 34, 35, 36, 40, 41, 42, 46, 47];
const RAINBOW_HUES: [Color; 5] = [
    Color::DarkRed,
    Color::DarkYellow,
    Color::DarkGreen,
    Color::DarkCyan,
    Color::DarkBlue,
];

impl Palette {
    pub fn new(tokens: Vec<ColorToken>) -> Result<Self, LayoutError> {
        if tokens.is_empty() {
            Err(LayoutError::EmptyPalette)
        } else {
            Ok(Palette { tokens })
        }
    }

    pub fn builtin(name: PaletteName) -> Self {
        let tokens: Vec<ColorToken> = match name {
            PaletteName::Red => RED_CODES.iter().map(|&c| ColorToken::indexed(c)).collect(),
            PaletteName::Blue => BLUE_CODES.iter().map(|&c| ColorToken::indexed(c)).collect(),
            PaletteName::Green => GREEN_CODES.iter().map(|&c| ColorToken::indexed(c)).collect(),
            PaletteName::Greyscale => (241..255).map(ColorToken::indexed).collect(),
            // Each hue plain, then bold (bright on most terminals)
            PaletteName::Rainbow => RAINBOW_HUES
                .iter()
                .flat_map(|&c| [ColorToken::basic(c, false), ColorToken::basic(c, true)])
                .collect(),
            // Column-major walk through all 256 entries
            PaletteName::All => (0..16u16)
                .flat_map(|j| (0..16u16).map(move |i| ColorToken::indexed((i * 16 + j) as u8)))
                .collect(),
        };
        Palette { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn get(&self, index: usize) -> ColorToken {
        self.tokens[index]
    }

    /// Token at a triangle-wave position.
    pub fn at(&self, position: i64) -> ColorToken {
        self.get(triangle_index(position, self.len()))
    }

    /// `position` reduced into one sweep period. Same token, and small
    /// enough that adding a line or column offset cannot overflow.
    pub fn fold(&self, position: i64) -> i64 {
        let period = (2 * self.len() as i64 - 2).max(1);
        position.rem_euclid(period)
    }
}

/// Ping-pong index into a sequence of `len` entries.
///
/// Negative positions are folded with euclidean modulo, so inverted sweeps
/// keep the same shape. `len` of 0 or 1 always yields 0.
pub fn triangle_index(position: i64, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * len as i64 - 2;
    let m = position.rem_euclid(period);
    if m < len as i64 {
        m as usize
    } else {
        (period - m) as usize
    }
}

// ── Styled output ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub token: ColorToken,
    pub text: String,
}

/// Colorized text: one entry per input line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyledBlock {
    pub lines: Vec<Vec<Span>>,
}

impl StyledBlock {
    /// The text with all color metadata stripped.
    #[allow(dead_code)]
    pub fn plain(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(|s| s.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ── Cycle functions ──

/// Which cycle a phase animates with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cycle {
    /// Whole block in one color.
    Pulse,
    /// One color per line; bands travel vertically.
    Horizontal,
    /// One color per character; bands travel horizontally.
    Vertical,
}

impl Cycle {
    pub fn apply(self, content: &str, frame: i64, palette: &Palette, inverted: bool) -> StyledBlock {
        match self {
            Cycle::Pulse => pulse(content, frame, palette, inverted),
            Cycle::Horizontal => horizontal_sweep(content, frame, palette, inverted),
            Cycle::Vertical => vertical_sweep(content, frame, palette, inverted),
        }
    }
}

/// Signed offset for a line or character index.
fn offset(index: usize, inverted: bool) -> i64 {
    if inverted { -(index as i64) } else { index as i64 }
}

/// `inverted` has no visible effect on a single-color block; accepted for a
/// uniform signature.
pub fn pulse(content: &str, frame: i64, palette: &Palette, _inverted: bool) -> StyledBlock {
    let token = palette.at(palette.fold(frame));
    StyledBlock {
        lines: content
            .split('\n')
            .map(|line| vec![Span { token, text: line.to_string() }])
            .collect(),
    }
}

pub fn horizontal_sweep(content: &str, frame: i64, palette: &Palette, inverted: bool) -> StyledBlock {
    let frame = palette.fold(frame);
    StyledBlock {
        lines: content
            .split('\n')
            .enumerate()
            .map(|(row, line)| {
                let token = palette.at(frame + offset(row, inverted));
                vec![Span { token, text: line.to_string() }]
            })
            .collect(),
    }
}

pub fn vertical_sweep(content: &str, frame: i64, palette: &Palette, inverted: bool) -> StyledBlock {
    let frame = palette.fold(frame);
    StyledBlock {
        lines: content
            .split('\n')
            .map(|line| {
                line.chars()
                    .enumerate()
                    .map(|(col, ch)| Span {
                        token: palette.at(frame + offset(col, inverted)),
                        text: ch.to_string(),
                    })
                    .collect()
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn triangle_sweeps_forward_then_back() {
        // L = 4 → period 6: 0 1 2 3 2 1 | 0 1 ...
        let seq: Vec<usize> = (0..8).map(|p| triangle_index(p, 4)).collect();
        assert_eq!(seq, vec![0, 1, 2, 3, 2, 1, 0, 1]);
    }

    #[test]
    fn triangle_negative_positions_fold() {
        assert_eq!(triangle_index(-1, 4), 1);
        assert_eq!(triangle_index(-3, 4), 3);
        assert_eq!(triangle_index(-6, 4), 0);
    }

    #[test]
    fn triangle_single_entry_palette() {
        for p in -5..5 {
            assert_eq!(triangle_index(p, 1), 0);
        }
    }

    proptest! {
        #[test]
        fn triangle_periodic_and_symmetric(len in 2usize..40, p in 0i64..10_000) {
            let period = 2 * len as i64 - 2;
            let idx = triangle_index(p, len);
            prop_assert!(idx < len);
            prop_assert_eq!(idx, triangle_index(p + period, len));
            prop_assert_eq!(idx, triangle_index(period - p, len));
        }

        #[test]
        fn triangle_steps_by_one(len in 2usize..40, p in 0i64..10_000) {
            let a = triangle_index(p, len) as i64;
            let b = triangle_index(p + 1, len) as i64;
            prop_assert_eq!((a - b).abs(), 1);
        }
    }

    #[test]
    fn triangle_covers_every_index() {
        let len = 7;
        let mut seen = vec![false; len];
        for p in 0..(2 * len as i64 - 2) {
            seen[triangle_index(p, len)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn empty_palette_rejected() {
        assert_eq!(Palette::new(vec![]), Err(LayoutError::EmptyPalette));
        assert!(Palette::new(vec![ColorToken::indexed(1)]).is_ok());
    }

    #[test]
    fn builtin_palettes_non_empty() {
        for name in [
            PaletteName::Red,
            PaletteName::Blue,
            PaletteName::Green,
            PaletteName::Greyscale,
            PaletteName::Rainbow,
            PaletteName::All,
        ] {
            assert!(Palette::builtin(name).len() > 1);
        }
        assert_eq!(Palette::builtin(PaletteName::Rainbow).len(), 10);
        assert_eq!(Palette::builtin(PaletteName::All).len(), 256);
    }

    fn test_palette() -> Palette {
        Palette::new((1..=4).map(ColorToken::indexed).collect()).unwrap()
    }

    const TEXT: &str = "ab\ncde\n\nf";

    #[test]
    fn cycles_preserve_content() {
        let pal = test_palette();
        for cycle in [Cycle::Pulse, Cycle::Horizontal, Cycle::Vertical] {
            for inverted in [false, true] {
                let block = cycle.apply(TEXT, 17, &pal, inverted);
                assert_eq!(block.plain(), TEXT);
                assert_eq!(block.lines.len(), 4);
            }
        }
    }

    #[test]
    fn pulse_uses_one_color() {
        let pal = test_palette();
        let block = pulse(TEXT, 2, &pal, false);
        for line in &block.lines {
            assert_eq!(line.len(), 1);
            assert_eq!(line[0].token, pal.get(2));
        }
    }

    #[test]
    fn horizontal_offsets_by_line() {
        let pal = test_palette();
        let block = horizontal_sweep(TEXT, 0, &pal, false);
        let idx: Vec<ColorToken> = block.lines.iter().map(|l| l[0].token).collect();
        assert_eq!(idx, vec![pal.get(0), pal.get(1), pal.get(2), pal.get(3)]);

        let inv = horizontal_sweep(TEXT, 0, &pal, true);
        // positions 0, -1, -2, -3 → 0, 1, 2, 3 under the ping-pong fold
        assert_eq!(inv.lines[1][0].token, pal.get(1));
        assert_eq!(inv.lines[3][0].token, pal.get(3));
    }

    #[test]
    fn vertical_colors_each_char() {
        let pal = test_palette();
        let block = vertical_sweep("abcde", 1, &pal, false);
        let line = &block.lines[0];
        assert_eq!(line.len(), 5);
        let got: Vec<ColorToken> = line.iter().map(|s| s.token).collect();
        // positions 1..=5 → 1 2 3 2 1
        assert_eq!(got, vec![pal.get(1), pal.get(2), pal.get(3), pal.get(2), pal.get(1)]);
    }

    #[test]
    fn extreme_positions_do_not_overflow() {
        let pal = test_palette();
        let base = i64::MAX.rem_euclid(6);
        let block = vertical_sweep("abcde", i64::MAX, &pal, false);
        let got: Vec<ColorToken> = block.lines[0].iter().map(|s| s.token).collect();
        let want: Vec<ColorToken> = (0..5).map(|c| pal.at(base + c)).collect();
        assert_eq!(got, want);

        let low = horizontal_sweep("a\nb\nc", i64::MIN, &pal, true);
        assert_eq!(low.lines.len(), 3);
        assert_eq!(low.lines[0][0].token, pal.at(i64::MIN));
        assert_eq!(pulse("x", i64::MAX, &pal, false).lines[0][0].token, pal.at(i64::MAX));
    }

    #[test]
    fn fold_keeps_token() {
        let pal = test_palette();
        for p in [-13, -1, 0, 5, 6, 1_000_003] {
            let folded = pal.fold(p);
            assert!((0..6).contains(&folded));
            assert_eq!(pal.at(folded), pal.at(p));
        }
        let single = Palette::new(vec![ColorToken::indexed(7)]).unwrap();
        assert_eq!(single.fold(i64::MAX), 0);
    }

    #[test]
    fn vertical_handles_multibyte_glyphs() {
        let pal = test_palette();
        let block = vertical_sweep("⣀⣿ ", 0, &pal, true);
        assert_eq!(block.lines[0].len(), 3);
        assert_eq!(block.plain(), "⣀⣿ ");
    }
}
