//! Share domain entities.

pub mod model;

pub use model::{Share, ShareTarget, ShareTargetKind};
