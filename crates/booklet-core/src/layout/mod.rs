//! Layout calculation modules for booklet imposition
//!
//! This module handles all the geometric calculations, with no I/O:
//! - Booklet page ordering (which source page goes on which face and half)
//! - Half-face bounds from the margins
//! - Content placement (uniform scaling, centering)

mod compose;
mod order;
mod placement;
mod types;

pub use compose::*;
pub use order::*;
pub use placement::*;
pub use types::*;
