pub mod renderer;

pub use renderer::{GlyphSet, HudContext, Renderer};
