pub mod painter;
pub mod pointer;

pub use painter::*;
pub use pointer::*;
