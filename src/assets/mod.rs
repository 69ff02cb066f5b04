//! Image asset loading
//!
//! Resolves the scene's texture files concurrently and hands back decoded
//! RGBA data. A file that is missing or fails to decode is a warning, not an
//! error: the slot is filled with a flat placeholder so the scene still
//! renders, just without that map. There is no retry.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Which scene texture a file provides.
///
/// The kind decides the placeholder used when the file cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    FlagFace,
    Ground,
    BaseColor,
    BaseNormal,
    StarMask,
}

/// Decoded RGBA8 pixels, CPU-side. Uploaded to a GPU texture later.
#[derive(Clone)]
pub struct ImageData {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    /// Decodes an image file from raw bytes into RGBA8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            pixels: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Single-pixel solid color image.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            pixels: rgba.to_vec(),
            width: 1,
            height: 1,
        }
    }

    /// Flat stand-in for a texture that failed to load.
    ///
    /// Normal maps get the neutral up-facing blue, alpha masks get opaque
    /// white, everything else a mid grey.
    pub fn placeholder(kind: AssetKind) -> Self {
        match kind {
            AssetKind::BaseNormal => Self::solid([127, 127, 255, 255]),
            AssetKind::StarMask => Self::solid([255, 255, 255, 255]),
            _ => Self::solid([128, 128, 128, 255]),
        }
    }
}

/// File locations for every texture the scene wants.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub flag: PathBuf,
    pub ground: PathBuf,
    pub base_color: PathBuf,
    pub base_normal: PathBuf,
    pub star_mask: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            flag: PathBuf::from("assets/flag.png"),
            ground: PathBuf::from("assets/ground.jpg"),
            base_color: PathBuf::from("assets/concrete.png"),
            base_normal: PathBuf::from("assets/concrete_normal.png"),
            star_mask: PathBuf::from("assets/star.png"),
        }
    }
}

/// All decoded scene textures, placeholder-filled where loading failed.
pub struct AssetLibrary {
    pub flag: ImageData,
    pub ground: ImageData,
    pub base_color: ImageData,
    pub base_normal: ImageData,
    pub star_mask: ImageData,
}

impl AssetLibrary {
    /// Fetches every asset concurrently.
    ///
    /// `on_complete` is invoked exactly once, after all slots have resolved,
    /// whether or not any individual load failed. The app uses it to hide the
    /// loading indicator.
    pub async fn load_all(paths: &AssetPaths, on_complete: impl FnOnce()) -> Self {
        let (flag, ground, base_color, base_normal, star_mask) = futures::join!(
            load_or_placeholder(&paths.flag, AssetKind::FlagFace),
            load_or_placeholder(&paths.ground, AssetKind::Ground),
            load_or_placeholder(&paths.base_color, AssetKind::BaseColor),
            load_or_placeholder(&paths.base_normal, AssetKind::BaseNormal),
            load_or_placeholder(&paths.star_mask, AssetKind::StarMask),
        );

        on_complete();

        Self {
            flag,
            ground,
            base_color,
            base_normal,
            star_mask,
        }
    }
}

async fn load_image(path: &Path) -> Result<ImageData> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    ImageData::from_bytes(&bytes).with_context(|| format!("decoding {}", path.display()))
}

async fn load_or_placeholder(path: &Path, kind: AssetKind) -> ImageData {
    match load_image(path).await {
        Ok(image) => image,
        Err(err) => {
            log::warn!("asset {:?} unavailable ({err:#}), using placeholder", kind);
            ImageData::placeholder(kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn missing_paths() -> AssetPaths {
        AssetPaths {
            flag: PathBuf::from("/nonexistent/flag.png"),
            ground: PathBuf::from("/nonexistent/ground.jpg"),
            base_color: PathBuf::from("/nonexistent/concrete.png"),
            base_normal: PathBuf::from("/nonexistent/concrete_normal.png"),
            star_mask: PathBuf::from("/nonexistent/star.png"),
        }
    }

    #[test]
    fn completion_fires_once_even_when_everything_is_missing() {
        let fired = Cell::new(0u32);
        let library =
            pollster::block_on(AssetLibrary::load_all(&missing_paths(), || {
                fired.set(fired.get() + 1)
            }));
        assert_eq!(fired.get(), 1);
        assert_eq!(library.flag.width, 1);
        assert_eq!(library.flag.height, 1);
    }

    #[test]
    fn missing_normal_map_falls_back_to_neutral_blue() {
        let placeholder = ImageData::placeholder(AssetKind::BaseNormal);
        assert_eq!(placeholder.pixels, vec![127, 127, 255, 255]);
    }

    #[test]
    fn missing_star_mask_falls_back_to_opaque_white() {
        let placeholder = ImageData::placeholder(AssetKind::StarMask);
        assert_eq!(placeholder.pixels, vec![255, 255, 255, 255]);
    }
}
