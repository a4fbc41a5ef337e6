/// Static ASCII art drawn on both sides of the countdown banner.

pub const POT_LEAF: &str = r"        /\
 |\    /  \    /|
 | \   \  /   / |
 |  |  \  /  |  |
  \  \ \  / /  /
|\__\ \\  // /__/|
 \___--    --___/
     /_/||\_\
        ||";

/// A multi-line art block with its row count precomputed.
#[derive(Clone, Copy, Debug)]
pub struct Art {
    pub text: &'static str,
    pub height: usize,
}

impl Art {
    pub fn new(text: &'static str) -> Self {
        Art { text, height: text.split('\n').count() }
    }
}

impl Default for Art {
    fn default() -> Self {
        Art::new(POT_LEAF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pot_leaf_dimensions() {
        let art = Art::default();
        assert_eq!(art.height, 9);
        let widest = art.text.split('\n').map(|l| l.chars().count()).max();
        assert_eq!(widest, Some(18));
    }
}
