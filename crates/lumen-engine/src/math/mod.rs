//! Matrix helpers on top of `glam`.
//!
//! All matrices use the column-vector convention (`p' = M * p`). A column-major
//! `glam::Mat4` is uploaded to uniform buffers as-is.

mod projection;
mod transform;

pub use projection::{Projection, FAR_PLANE, FIELD_OF_VIEW, NEAR_PLANE};
pub use transform::Transform;
