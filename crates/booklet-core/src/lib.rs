pub mod constants;
pub mod impose;
pub mod layout;
mod options;
pub mod render;
mod stats;
mod types;

pub use impose::{FaceProgress, SourceDocument, impose, impose_with_progress, load_pdf, save_pdf};
pub use layout::{PageSource, SheetSpec, compose};
pub use options::*;
pub use stats::calculate_statistics;
pub use types::*;
