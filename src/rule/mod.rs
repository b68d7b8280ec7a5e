pub mod artifact;
pub mod definition;

pub use artifact::*;
pub use definition::*;
