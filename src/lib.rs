//! # decalkit
//!
//! Click-to-place decals on triangle meshes.
//!
//! This is the umbrella crate that re-exports the decalkit crates. Use it to
//! get everything in one place, or depend on the individual crates for
//! more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Points, rays, meshes, transforms and the decal vertex layout
//! - **Geometry**: Surface raycasting, placement frames and decal volume clipping
//! - **Interaction**: Camera, scene, decal store and the click/drag controller
//!
//! ## Quick Start
//!
//! ```rust
//! use decalkit::prelude::*;
//!
//! let mut session = DecalSession::new(DecalParams::default(), Viewport::default(), Some(1))?;
//!
//! // A press and release without camera movement is a click
//! session.handle_event(PointerEvent::Down { x: 650.0, y: 350.0 });
//! let placed = session.handle_event(PointerEvent::Up { x: 650.0, y: 350.0 });
//!
//! assert!(matches!(placed, Interaction::Placed { draw_order: 0, .. }));
//! assert_eq!(session.store().len(), 1);
//! # Ok::<(), decalkit::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables interaction
//! - `interaction`: Camera, scene arena, decal store and session

// Re-export core functionality
pub use decalkit_core::*;

// Re-export sub-crates
pub use decalkit_geometry as geometry;

#[cfg(feature = "interaction")]
pub use decalkit_interaction as interaction;

/// Convenient imports for common use cases
pub mod prelude {
    pub use decalkit_core::*;
    pub use decalkit_geometry::*;

    #[cfg(feature = "interaction")]
    pub use decalkit_interaction::*;
}
