//! Rendering expressions as infix text.

pub mod expr;

pub use expr::render;
