//! Interactive decal placement
//!
//! This crate turns pointer events into decals on a surface:
//! - A perspective camera with orbit controls
//! - A scene arena addressed by stable entity ids
//! - The sticker texture catalog and decal materials
//! - The decal store, kept in draw order
//! - The click/drag state machine and the per-frame session tick

pub mod camera;
pub mod scene;
pub mod textures;
pub mod material;
pub mod store;
pub mod controller;
pub mod session;

pub use camera::*;
pub use scene::*;
pub use textures::*;
pub use material::*;
pub use store::*;
pub use controller::*;
pub use session::*;
