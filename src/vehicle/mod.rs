pub mod stage;

pub use stage::{Stage, StageBuilder};
