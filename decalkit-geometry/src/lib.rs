//! # decalkit geometry
//!
//! The decal placement pipeline, leaf-first:
//!
//! - [`surface`]: the static target mesh and its world transform
//! - [`raycast`]: pointer coordinates to the nearest surface hit
//! - [`placement`]: a hit to an oriented, sized placement frame
//! - [`clipper`]: the surface cut by the frame's box into a conforming decal mesh

pub mod surface;
pub mod raycast;
pub mod placement;
pub mod clipper;

// Re-export commonly used items
pub use surface::*;
pub use raycast::*;
pub use placement::*;
pub use clipper::*;
