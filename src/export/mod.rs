pub mod error;
pub mod notes;
pub mod progress;
pub mod report;

pub use error::ExportError;
pub use notes::NoteRecord;

pub trait Export {
    fn to_csv(&self) -> Result<String, ExportError>;
    fn to_md(&self) -> Result<String, ExportError>;
    fn to_json(&self) -> Result<String, ExportError>;
}
