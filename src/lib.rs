pub mod analytics;
pub mod export;
pub mod model;
pub mod progress;
pub mod store;
pub mod window;

pub use analytics::*;
pub use export::{Export, ExportError, NoteRecord};
pub use model::*;
pub use progress::*;
pub use store::*;
pub use window::*;
