//! Cell-tracking domain built on the pooled model
//!
//! - `spot`: spot and link payloads
//! - `index`: spots grouped by timepoint
//! - `model`: the tracking model keeping graph and index in step

pub mod index;
pub mod model;
pub mod spot;

pub use index::TimepointIndex;
pub use model::TrackingModel;
pub use spot::{Link, Spot};
