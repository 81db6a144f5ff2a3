pub mod authors;
pub mod books;
pub mod days;
pub mod pages;
pub mod report;

pub use authors::*;
pub use books::*;
pub use days::*;
pub use pages::*;
pub use report::*;
