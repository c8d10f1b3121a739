//! Reference attitudes and the geometry that resolves them each tick.

pub mod selector;
pub mod orientation;
pub mod resolver;

pub use selector::ReferenceSelector;
pub use orientation::{orthonormalize, Hpr, OrientationRequest, ReferenceFrame};
pub use resolver::resolve;
