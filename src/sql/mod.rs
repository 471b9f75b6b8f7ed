//! Safe SQL builder: identifiers from code constants only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
