pub mod clock;
pub mod countdown;
pub mod phase;
pub mod tones;
