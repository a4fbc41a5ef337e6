pub mod renderer;
pub mod sound;
