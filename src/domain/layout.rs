/// Text layout primitives: progress bar, bordered banner, side-by-side join.
///
/// All widths are counted in chars. Every glyph the countdown draws
/// (ASCII art, braille ramp) occupies one terminal column.

use serde::Deserialize;
use thiserror::Error;

/// Braille ramp, emptiest to fullest.
pub const VERTICAL_LOAD: [char; 9] = [' ', '⡀', '⣀', '⣠', '⣤', '⣦', '⣶', '⣾', '⣿'];
pub const FADE_IN_LOAD: [char; 4] = [' ', '░', '▒', '█'];

/// Glyph ramp used for the countdown bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarStyle {
    Braille,
    Shade,
}

impl BarStyle {
    pub fn ramp(self) -> &'static [char] {
        match self {
            BarStyle::Braille => &VERTICAL_LOAD,
            BarStyle::Shade => &FADE_IN_LOAD,
        }
    }
}

/// Invalid-argument failures from the layout primitives and palette
/// construction.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("progress bar width {width} too small (need at least {min})")]
    BarTooNarrow { width: usize, min: usize },
    #[error("progress must be between 0 and 1 (got {0})")]
    ProgressOutOfRange(f64),
    #[error("progress ramp needs at least 2 glyphs (got {0})")]
    RampTooShort(usize),
    #[error("banner height must be at least 3 (got {0})")]
    BannerTooShort(usize),
    #[error("text too wide for banner (line length {line}, width {width})")]
    LineTooWide { line: usize, width: usize },
    #[error("banner too small for text (height {height}, lines {lines})")]
    TooManyLines { height: usize, lines: usize },
    #[error("palette needs at least one color")]
    EmptyPalette,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

// ── Progress bar ──

/// Build a one-line progress bar `width` cells wide.
///
/// `brackets`, when given, take one cell at each end out of `width`.
/// With `inverted` the ramp is reversed so the bar drains as progress grows;
/// cell order stays left to right.
pub fn progress_bar(
    width: usize,
    progress: f64,
    ramp: &[char],
    brackets: Option<(char, char)>,
    inverted: bool,
) -> Result<String, LayoutError> {
    let reserved = if brackets.is_some() { 2 } else { 0 };
    if width < 1 + reserved {
        return Err(LayoutError::BarTooNarrow { width, min: 1 + reserved });
    }
    if !(0.0..=1.0).contains(&progress) {
        return Err(LayoutError::ProgressOutOfRange(progress));
    }
    if ramp.len() < 2 {
        return Err(LayoutError::RampTooShort(ramp.len()));
    }

    let ramp: Vec<char> = if inverted {
        ramp.iter().rev().copied().collect()
    } else {
        ramp.to_vec()
    };
    let empty = ramp[0];
    let full = ramp[ramp.len() - 1];

    let cells = width - reserved;
    let filled = cells as f64 * progress;
    let num_full = (filled.floor() as usize).min(cells);

    let mut bar = String::with_capacity(width * 3);
    if let Some((open, _)) = brackets {
        bar.push(open);
    }
    bar.extend(std::iter::repeat(full).take(num_full));
    if num_full < cells {
        let step = ((filled.fract() * ramp.len() as f64).floor() as usize).min(ramp.len() - 1);
        bar.push(ramp[step]);
        bar.extend(std::iter::repeat(empty).take(cells - num_full - 1));
    }
    if let Some((_, close)) = brackets {
        bar.push(close);
    }
    Ok(bar)
}

// ── Banner ──

/// Frame `text` in a box of `height` rows, `width` interior columns wide.
///
/// Top and bottom rows are `top_char` across the full `width + 2`. Text lines
/// are centered horizontally, and the block of lines is centered vertically
/// in the interior rows.
pub fn banner(
    text: &str,
    width: usize,
    height: usize,
    top_char: char,
    side_char: char,
) -> Result<String, LayoutError> {
    if height < 3 {
        return Err(LayoutError::BannerTooShort(height));
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let longest = lines.iter().map(|l| char_len(l)).max().unwrap_or(0);
    if longest > width {
        return Err(LayoutError::LineTooWide { line: longest, width });
    }
    if lines.len() > height - 2 {
        return Err(LayoutError::TooManyLines { height, lines: lines.len() });
    }

    let text_begin = height / 2 - lines.len() / 2;
    let edge: String = std::iter::repeat(top_char).take(width + 2).collect();

    let mut rows = Vec::with_capacity(height);
    for row in 0..height {
        if row == 0 || row == height - 1 {
            rows.push(edge.clone());
        } else if row >= text_begin && row < text_begin + lines.len() {
            let line = lines[row - text_begin];
            rows.push(format!("{side_char}{line:^width$}{side_char}"));
        } else {
            rows.push(format!("{side_char}{:width$}{side_char}", ""));
        }
    }
    Ok(rows.join("\n"))
}

// ── Multi-line join ──

/// Place blocks side by side, left to right.
///
/// Each block is padded on the right to its own widest line, `padding`
/// spaces separate neighbours, and short blocks are extended with blank
/// lines to the tallest block's height.
pub fn multi_line_join(blocks: &[&str], padding: usize) -> String {
    let split: Vec<Vec<&str>> = blocks.iter().map(|b| b.split('\n').collect()).collect();
    let widths: Vec<usize> = split
        .iter()
        .map(|lines| lines.iter().map(|l| char_len(l)).max().unwrap_or(0))
        .collect();
    let height = split.iter().map(Vec::len).max().unwrap_or(0);
    let gap = " ".repeat(padding);

    (0..height)
        .map(|row| {
            let mut out = String::new();
            for (i, lines) in split.iter().enumerate() {
                let chunk = lines.get(row).copied().unwrap_or("");
                out.push_str(chunk);
                out.extend(std::iter::repeat(' ').take(widths[i] - char_len(chunk)));
                if i + 1 != split.len() {
                    out.push_str(&gap);
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}
