//! Request validation and the partial-update engine.

pub mod patch;
mod validation;
pub use patch::{PatchDocument, RiddlePatch, ALLOWED_FIELDS};
pub use validation::RequestValidator;
