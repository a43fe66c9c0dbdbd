//! Landscape images: directory enumeration, decoding and premultiplied pixel storage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use kurbo::Size;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{EngineError, EngineResult};
use crate::render::vector::pixmap_dims;

/// File extensions picked up by [`ImageLibrary::load_dir`] (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Decoded image shared between the library and in-flight transitions.
///
/// Pixels live in a `vello_cpu` pixmap so painters can use the image as a paint without a copy.
#[derive(Clone)]
pub struct ImageHandle {
    id: usize,
    name: String,
    width: u32,
    height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.width == other.width
            && self.height == other.height
            && self.pixels() == other.pixels()
    }
}

impl Eq for ImageHandle {}

impl ImageHandle {
    /// Wrap premultiplied pixels.
    pub fn from_premul(
        id: usize,
        name: impl Into<String>,
        width: u32,
        height: u32,
        rgba8_premul: Vec<u8>,
    ) -> EngineResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4));
        if width == 0 || height == 0 || expected != Some(rgba8_premul.len()) {
            return Err(EngineError::asset(format!(
                "image {width}x{height} has {} bytes of pixel data",
                rgba8_premul.len()
            )));
        }
        let (w, h) = pixmap_dims(width, height)
            .map_err(|_| EngineError::asset(format!("image {width}x{height} is too large")))?;
        Ok(Self {
            id,
            name: name.into(),
            width,
            height,
            pixmap: Arc::new(premul_bytes_to_pixmap(&rgba8_premul, w, h)),
        })
    }

    /// Single-color image.
    pub fn solid(
        id: usize,
        name: impl Into<String>,
        width: u32,
        height: u32,
        color: Rgba8Premul,
    ) -> EngineResult<Self> {
        let len = crate::foundation::alloc::rgba_len(width, height)?;
        let mut px = crate::foundation::alloc::try_filled(len, 0u8, "solid image")?;
        for p in px.chunks_exact_mut(4) {
            p.copy_from_slice(&color.to_array());
        }
        Self::from_premul(id, name, width, height, px)
    }

    /// Index in the owning library.
    pub fn id(&self) -> usize {
        self.id
    }

    /// File name (or label) the image came from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel dimensions as a size.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Premultiplied RGBA8 pixels.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// The image as a `vello_cpu` paint in texel space.
    pub fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Pack premultiplied bytes (length already validated) into a pixmap.
fn premul_bytes_to_pixmap(rgba8_premul: &[u8], width: u16, height: u16) -> vello_cpu::Pixmap {
    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect();
    vello_cpu::Pixmap::from_parts_with_opacity(pixels, width, height, may_have_opacities)
}

/// Decode encoded bytes into a premultiplied handle.
pub fn decode_image(id: usize, name: &str, bytes: &[u8]) -> EngineResult<ImageHandle> {
    let dyn_img = image::load_from_memory(bytes)
        .with_context(|| format!("decode image '{name}'"))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut px = rgba.into_raw();
    premultiply_rgba8_in_place(&mut px);
    ImageHandle::from_premul(id, name, width, height, px)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

/// Ordered set of images the landscape scene cycles through.
#[derive(Clone, Debug, Default)]
pub struct ImageLibrary {
    dir: PathBuf,
    images: Vec<ImageHandle>,
}

impl ImageLibrary {
    /// Library over already-decoded handles; ids are reassigned to their positions.
    pub fn from_handles(dir: impl Into<PathBuf>, handles: Vec<ImageHandle>) -> Self {
        let images = handles
            .into_iter()
            .enumerate()
            .map(|(i, mut h)| {
                h.id = i;
                h
            })
            .collect();
        Self {
            dir: dir.into(),
            images,
        }
    }

    /// Enumerate `dir` for jpg/jpeg/png files (sorted by file name) and decode them.
    ///
    /// A missing directory yields an empty library. Files that fail to decode are skipped with
    /// a warning.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn load_dir(dir: &Path) -> EngineResult<Self> {
        if !dir.is_dir() {
            tracing::warn!("landscape directory not found; scene will show a placeholder");
            return Ok(Self {
                dir: dir.to_path_buf(),
                images: Vec::new(),
            });
        }

        let mut paths = Vec::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read landscape directory '{}'", dir.display()))?;
        for entry in entries {
            let path = entry.context("read directory entry")?.path();
            if path.is_file() && has_image_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut images = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let decoded = std::fs::read(&path)
                .with_context(|| format!("read image '{}'", path.display()))
                .map_err(EngineError::from)
                .and_then(|bytes| decode_image(images.len(), &name, &bytes));
            match decoded {
                Ok(handle) => {
                    tracing::info!(
                        name = handle.name(),
                        width = handle.width(),
                        height = handle.height(),
                        "loaded landscape"
                    );
                    images.push(handle);
                }
                Err(err) => tracing::warn!(path = %path.display(), error = %err, "skipping image"),
            }
        }
        tracing::info!(count = images.len(), "landscape library ready");

        Ok(Self {
            dir: dir.to_path_buf(),
            images,
        })
    }

    /// Directory the library was loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no images are available.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image at `index`.
    pub fn get(&self, index: usize) -> Option<&ImageHandle> {
        self.images.get(index)
    }

    /// All images in order.
    pub fn images(&self) -> &[ImageHandle] {
        &self.images
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/images.rs"]
mod tests;
