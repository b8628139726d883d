pub mod error;
pub mod loader;
pub mod result;
pub mod traversal;
pub mod visitor;

pub use error::*;
pub use loader::*;
pub use result::*;
pub use traversal::*;
pub use visitor::*;
