//! Sticker texture catalog
//!
//! Textures are described, not loaded: the renderer resolves `path` itself.

use decalkit_core::{Error, Result};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Name of the one texture that gets a random tint per decal
pub const SPLASH_TEXTURE: &str = "splash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Sampled as stored
    #[default]
    Unspecified,
    Srgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub name: String,
    pub path: String,
    pub color_space: ColorSpace,
}

/// An RGB colour with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    /// From a 0xRRGGBB value; bits above 24 are ignored
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// The fixed set of textures decals are drawn with
#[derive(Debug, Clone, Default)]
pub struct TextureCatalog {
    textures: Vec<TextureInfo>,
}

impl TextureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Five stickers plus the tintable splash texture
    pub fn with_default_stickers() -> Self {
        let mut catalog = Self::new();
        for i in 1..=5 {
            catalog.push(
                &format!("sticker{}", i),
                &format!("/assets/textures/sticker{}.png", i),
                ColorSpace::Unspecified,
            );
        }
        catalog.push(SPLASH_TEXTURE, "/assets/textures/decal-diffuse.png", ColorSpace::Srgb);
        info!("Registered {} decal textures", catalog.len());
        catalog
    }

    /// Add a texture; names must be unique
    pub fn register(&mut self, name: &str, path: &str, color_space: ColorSpace) -> Result<TextureHandle> {
        if self.find(name).is_some() {
            return Err(Error::InvalidData(format!("Texture '{}' is already registered", name)));
        }
        Ok(self.push(name, path, color_space))
    }

    fn push(&mut self, name: &str, path: &str, color_space: ColorSpace) -> TextureHandle {
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(TextureInfo {
            name: name.to_string(),
            path: path.to_string(),
            color_space,
        });
        handle
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureInfo> {
        self.textures.get(handle.0 as usize)
    }

    pub fn find(&self, name: &str) -> Option<TextureHandle> {
        self.textures
            .iter()
            .position(|t| t.name == name)
            .map(|i| TextureHandle(i as u32))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn is_tinted(&self, handle: TextureHandle) -> bool {
        self.get(handle).is_some_and(|t| t.name == SPLASH_TEXTURE)
    }

    /// Uniformly pick a texture and the colour to draw it with.
    ///
    /// Only the splash texture gets a random tint; everything else is white.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(TextureHandle, Rgb)> {
        if self.textures.is_empty() {
            return None;
        }
        let handle = TextureHandle(rng.gen_range(0..self.textures.len()) as u32);
        let color = if self.is_tinted(handle) {
            Rgb::from_hex(rng.gen_range(0..0xffffff))
        } else {
            Rgb::WHITE
        };
        Some((handle, color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_catalog() {
        let catalog = TextureCatalog::with_default_stickers();
        assert_eq!(catalog.len(), 6);
        let splash = catalog.find(SPLASH_TEXTURE).unwrap();
        assert_eq!(catalog.get(splash).unwrap().color_space, ColorSpace::Srgb);
        assert_eq!(
            (0..6).filter(|&i| catalog.is_tinted(TextureHandle(i))).count(),
            1
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut catalog = TextureCatalog::new();
        catalog.register("a", "a.png", ColorSpace::Unspecified).unwrap();
        assert!(catalog.register("a", "b.png", ColorSpace::Unspecified).is_err());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_register_after_defaults() {
        let mut catalog = TextureCatalog::with_default_stickers();
        assert!(catalog.register("sticker3", "other.png", ColorSpace::Srgb).is_err());
        assert!(catalog.register(SPLASH_TEXTURE, "other.png", ColorSpace::Srgb).is_err());

        let handle = catalog.register("sticker6", "/assets/textures/sticker6.png", ColorSpace::Unspecified).unwrap();
        assert_eq!(handle, TextureHandle(6));
        assert_eq!(catalog.find("sticker6"), Some(handle));
        assert!(!catalog.is_tinted(handle));
    }

    #[test]
    fn test_only_splash_is_tinted() {
        let catalog = TextureCatalog::with_default_stickers();
        let splash = catalog.find(SPLASH_TEXTURE).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let mut tinted = 0;

        for _ in 0..500 {
            let (handle, color) = catalog.pick(&mut rng).unwrap();
            if handle == splash {
                tinted += (color != Rgb::WHITE) as usize;
            } else {
                assert_eq!(color, Rgb::WHITE);
            }
        }
        assert!(tinted > 0);
    }

    #[test]
    fn test_empty_catalog_picks_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(TextureCatalog::new().pick(&mut rng).is_none());
    }

    #[test]
    fn test_hex_round_trip() {
        assert_eq!(Rgb::from_hex(0x3366cc).to_hex(), 0x3366cc);
        assert_eq!(Rgb::from_hex(0xffffff), Rgb::WHITE);
    }
}
