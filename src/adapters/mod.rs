pub mod copier;
pub mod metadata;

pub use copier::*;
pub use metadata::*;
