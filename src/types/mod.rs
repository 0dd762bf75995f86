mod error;
mod palette_size;

pub use error::*;
pub use palette_size::*;
