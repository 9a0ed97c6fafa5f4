//! Decal materials and the tweakable decal parameters

use crate::textures::{Rgb, TextureHandle};
use decalkit_core::{Error, Result};
use decalkit_geometry::ScaleRange;
use serde::{Deserialize, Serialize};

/// Live-editable surface response of decal materials, both in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialParams {
    pub metalness: f32,
    pub roughness: f32,
}

impl MaterialParams {
    /// Values outside [0, 1] are clamped; NaN becomes 0
    pub fn new(metalness: f32, roughness: f32) -> Self {
        let unit = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            metalness: unit(metalness),
            roughness: unit(roughness),
        }
    }
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            metalness: 0.6,
            roughness: 0.0,
        }
    }
}

/// User-facing decal settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecalParams {
    /// Smallest half-size a decal box is drawn with
    pub min_scale: f32,
    /// Largest half-size a decal box is drawn with
    pub max_scale: f32,
    pub env_map_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
    /// Randomize the roll of each decal about the surface normal
    pub rotate: bool,
}

impl DecalParams {
    pub fn validate(&self) -> Result<()> {
        self.scale_range()?;
        if !(0.0..=1.0).contains(&self.metalness) || !(0.0..=1.0).contains(&self.roughness) {
            return Err(Error::InvalidParameter(format!(
                "Metalness and roughness must lie in [0, 1], got {} and {}",
                self.metalness, self.roughness
            )));
        }
        if !(self.env_map_intensity >= 0.0 && self.env_map_intensity.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "Environment map intensity must be non-negative, got {}",
                self.env_map_intensity
            )));
        }
        Ok(())
    }

    pub fn scale_range(&self) -> Result<ScaleRange> {
        ScaleRange::new(self.min_scale, self.max_scale)
    }

    pub fn material_params(&self) -> MaterialParams {
        MaterialParams::new(self.metalness, self.roughness)
    }
}

impl Default for DecalParams {
    fn default() -> Self {
        Self {
            min_scale: 5.0,
            max_scale: 10.0,
            env_map_intensity: 2.5,
            metalness: 0.6,
            roughness: 0.0,
            rotate: false,
        }
    }
}

/// How one decal is shaded and layered.
///
/// Decals lie on the surface, so they skip depth writes, pull themselves
/// towards the camera with a polygon offset and rely on `draw_order` to
/// layer over each other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecalMaterial {
    pub texture: TextureHandle,
    pub color: Rgb,
    pub transparent: bool,
    pub depth_write: bool,
    pub depth_test: bool,
    pub polygon_offset: bool,
    pub polygon_offset_factor: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub env_map_intensity: f32,
    /// Assigned by the decal store on insertion
    pub draw_order: u32,
}

impl DecalMaterial {
    /// Material shared by every new decal, before a texture is chosen
    pub fn template(params: &DecalParams) -> Self {
        let material = params.material_params();
        Self {
            texture: TextureHandle(0),
            color: Rgb::WHITE,
            transparent: true,
            depth_write: false,
            depth_test: true,
            polygon_offset: true,
            polygon_offset_factor: -4.0,
            metalness: material.metalness,
            roughness: material.roughness,
            env_map_intensity: params.env_map_intensity,
            draw_order: 0,
        }
    }

    /// Copy of this material drawn with another texture and colour
    pub fn with_texture(&self, texture: TextureHandle, color: Rgb) -> Self {
        Self {
            texture,
            color,
            ..*self
        }
    }

    pub fn apply(&mut self, params: &MaterialParams) {
        self.metalness = params.metalness;
        self.roughness = params.roughness;
    }
}

impl Default for DecalMaterial {
    fn default() -> Self {
        Self::template(&DecalParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let params = DecalParams::default();
        params.validate().unwrap();
        let range = params.scale_range().unwrap();
        assert_eq!((range.min, range.max), (5.0, 10.0));
    }

    #[test]
    fn test_invalid_params() {
        let inverted = DecalParams { min_scale: 10.0, max_scale: 5.0, ..Default::default() };
        assert!(inverted.validate().is_err());

        let shiny = DecalParams { metalness: 1.5, ..Default::default() };
        assert!(shiny.validate().is_err());
    }

    #[test]
    fn test_material_params_clamp() {
        let params = MaterialParams::new(2.0, -1.0);
        assert_eq!(params, MaterialParams { metalness: 1.0, roughness: 0.0 });
        assert_eq!(MaterialParams::new(f32::NAN, 0.5).metalness, 0.0);
    }

    #[test]
    fn test_template_layering_flags() {
        let material = DecalMaterial::default();
        assert!(material.transparent);
        assert!(!material.depth_write);
        assert!(material.polygon_offset);
        assert_eq!(material.polygon_offset_factor, -4.0);

        let textured = material.with_texture(TextureHandle(3), Rgb::from_hex(0xff0000));
        assert_eq!(textured.texture, TextureHandle(3));
        assert_eq!(textured.metalness, material.metalness);
    }
}
