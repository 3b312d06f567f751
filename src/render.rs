//! Offscreen rendering of the main image and its transition effect.
//!
//! Images are decoded once up front ([`preload`]), then every index change
//! can be turned into a short sequence of composited frames by
//! [`FrameCompositor`] and written out by [`FrameWriter`].

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Result;
use crate::gallery::RenderFrame;
use crate::image_source::GalleryImage;
use crate::transition::TransitionMode;

const PLACEHOLDER: Rgba<u8> = Rgba([25, 25, 50, 255]);
const MAX_BLUR_SIGMA: f32 = 8.0;
const ZOOM_START: f32 = 0.8;

/// Decoded images scaled to the output size, keyed by source URL.
#[derive(Debug)]
pub struct ImageCache {
    width: u32,
    height: u32,
    images: HashMap<Url, RgbaImage>,
}

impl ImageCache {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            images: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn insert(&mut self, src: Url, image: RgbaImage) {
        let image = if image.dimensions() == (self.width, self.height) {
            image
        } else {
            imageops::resize(&image, self.width, self.height, FilterType::Triangle)
        };
        self.images.insert(src, image);
    }

    pub fn get(&self, src: &Url) -> Option<&RgbaImage> {
        self.images.get(src)
    }

    /// Image for `src`, or a flat placeholder when it is unknown.
    pub fn frame_for(&self, src: Option<&Url>) -> RgbaImage {
        src.and_then(|src| self.get(src))
            .cloned()
            .unwrap_or_else(|| RgbaImage::from_pixel(self.width, self.height, PLACEHOLDER))
    }
}

fn load_and_scale(path: &Path, width: u32, height: u32) -> Result<RgbaImage> {
    let image = image::open(path)?;
    Ok(image.resize_exact(width, height, FilterType::Triangle).to_rgba8())
}

/// Decodes every local image in parallel. Remote sources are skipped and
/// unreadable files are logged; both fall back to the placeholder later.
pub fn preload(images: &[GalleryImage], width: u32, height: u32) -> ImageCache {
    let decoded: Vec<(Url, RgbaImage)> = images
        .par_iter()
        .filter_map(|image| {
            let Some(path) = image.local_path() else {
                debug!("Not preloading remote source {}", image.src);
                return None;
            };
            match load_and_scale(&path, width, height) {
                Ok(decoded) => Some((image.src.clone(), decoded)),
                Err(e) => {
                    warn!("Failed to preload {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect();

    let mut cache = ImageCache::empty(width, height);
    for (src, image) in decoded {
        cache.insert(src, image);
    }
    info!("Preloaded {} of {} images", cache.len(), images.len());
    cache
}

#[derive(Debug)]
pub struct FrameCompositor;

impl FrameCompositor {
    /// Blends `from` into `to` at `progress` (clamped to 0..=1) using the
    /// given effect. Both inputs must share dimensions.
    pub fn compose(from: &RgbaImage, to: &RgbaImage, progress: f32, mode: TransitionMode) -> RgbaImage {
        let t = mode.ease(progress);
        match mode {
            TransitionMode::Fade => Self::blend(from, to, t),
            TransitionMode::Slide => Self::slide(from, to, t),
            TransitionMode::Zoom => Self::zoom(from, to, t),
            TransitionMode::Blur => Self::blur(from, to, t),
        }
    }

    fn mix(a: &Rgba<u8>, b: &Rgba<u8>, t: f32) -> Rgba<u8> {
        let channel = |i: usize| (a[i] as f32 * (1.0 - t) + b[i] as f32 * t).round() as u8;
        Rgba([channel(0), channel(1), channel(2), channel(3)])
    }

    fn blend(from: &RgbaImage, to: &RgbaImage, t: f32) -> RgbaImage {
        RgbaImage::from_fn(from.width(), from.height(), |x, y| {
            Self::mix(from.get_pixel(x, y), to.get_pixel(x, y), t)
        })
    }

    /// Incoming image pushes the outgoing one off to the left.
    fn slide(from: &RgbaImage, to: &RgbaImage, t: f32) -> RgbaImage {
        let width = from.width();
        let offset = (width as f32 * t).round() as u32;
        RgbaImage::from_fn(width, from.height(), |x, y| {
            let shifted = x + offset;
            if shifted < width {
                *from.get_pixel(shifted, y)
            } else {
                *to.get_pixel(shifted - width, y)
            }
        })
    }

    /// Incoming image grows from the centre while fading in.
    fn zoom(from: &RgbaImage, to: &RgbaImage, t: f32) -> RgbaImage {
        let (width, height) = from.dimensions();
        let scale = ZOOM_START + (1.0 - ZOOM_START) * t;
        let scaled_w = ((width as f32 * scale).round() as u32).clamp(1, width);
        let scaled_h = ((height as f32 * scale).round() as u32).clamp(1, height);
        let scaled = imageops::resize(to, scaled_w, scaled_h, FilterType::Triangle);
        let left = (width - scaled_w) / 2;
        let top = (height - scaled_h) / 2;

        RgbaImage::from_fn(width, height, |x, y| {
            let outgoing = from.get_pixel(x, y);
            let inside = x >= left && x < left + scaled_w && y >= top && y < top + scaled_h;
            if inside {
                Self::mix(outgoing, scaled.get_pixel(x - left, y - top), t)
            } else {
                *outgoing
            }
        })
    }

    /// Outgoing image blurs away while the incoming one sharpens in.
    fn blur(from: &RgbaImage, to: &RgbaImage, t: f32) -> RgbaImage {
        let out_sigma = MAX_BLUR_SIGMA * t;
        let in_sigma = MAX_BLUR_SIGMA * (1.0 - t);
        let outgoing = Self::blurred(from, out_sigma);
        let incoming = Self::blurred(to, in_sigma);
        Self::blend(&outgoing, &incoming, t)
    }

    fn blurred(image: &RgbaImage, sigma: f32) -> RgbaImage {
        if sigma < 0.1 {
            image.clone()
        } else {
            imageops::blur(image, sigma)
        }
    }
}

/// Writes the transition sequence for each index change as numbered PNGs.
#[derive(Debug)]
pub struct FrameWriter {
    dir: PathBuf,
    frames: usize,
    sequence: u64,
    last_src: Option<Url>,
}

impl FrameWriter {
    pub fn new(dir: PathBuf, frames: usize) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            frames: frames.max(1),
            sequence: 0,
            last_src: None,
        })
    }

    fn next_path(&mut self) -> PathBuf {
        let path = self.dir.join(format!("frame-{:06}.png", self.sequence));
        self.sequence += 1;
        path
    }

    /// Renders the move from the previously written image to `frame`'s main
    /// image. Returns how many files were written; nothing is written when
    /// the main image did not change.
    pub fn write(&mut self, cache: &ImageCache, frame: &RenderFrame) -> Result<usize> {
        if frame.main_src == self.last_src {
            return Ok(0);
        }

        let to = cache.frame_for(frame.main_src.as_ref());
        let written = match self.last_src.take() {
            None => {
                let path = self.next_path();
                to.save(&path)?;
                1
            }
            Some(previous) => {
                let from = cache.frame_for(Some(&previous));
                for i in 1..=self.frames {
                    let progress = i as f32 / self.frames as f32;
                    let composed = FrameCompositor::compose(&from, &to, progress, frame.transition);
                    let path = self.next_path();
                    composed.save(&path)?;
                }
                self.frames
            }
        };

        self.last_src = frame.main_src.clone();
        debug!(
            "Wrote {} {} frame(s) to {}",
            written,
            frame.transition.name(),
            self.dir.display()
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::GalleryState;
    use tempfile::tempdir;

    fn solid(value: u8) -> RgbaImage {
        RgbaImage::from_pixel(8, 4, Rgba([value, value, value, 255]))
    }

    #[test]
    fn every_mode_ends_on_the_incoming_image() {
        let from = solid(0);
        let to = solid(200);
        for mode in TransitionMode::ALL {
            let end = FrameCompositor::compose(&from, &to, 1.0, mode);
            assert_eq!(end.dimensions(), (8, 4), "{mode:?}");
            assert_eq!(end.get_pixel(4, 2), &Rgba([200, 200, 200, 255]), "{mode:?}");
        }
    }

    #[test]
    fn fade_midpoint_is_halfway() {
        let mid = FrameCompositor::compose(&solid(0), &solid(200), 0.5, TransitionMode::Fade);
        assert_eq!(mid.get_pixel(0, 0)[0], 100);
    }

    #[test]
    fn slide_starts_on_the_outgoing_image() {
        let start = FrameCompositor::compose(&solid(10), &solid(90), 0.0, TransitionMode::Slide);
        assert_eq!(start.get_pixel(7, 3)[0], 10);
    }

    #[test]
    fn unknown_source_renders_placeholder() {
        let cache = ImageCache::empty(3, 2);
        let frame = cache.frame_for(None);
        assert_eq!(frame.dimensions(), (3, 2));
        assert_eq!(frame.get_pixel(0, 0), &PLACEHOLDER);
    }

    #[test]
    fn preload_decodes_local_files_and_skips_the_rest() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("red.png");
        RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])).save(&path).unwrap();
        let broken = temp_dir.path().join("broken.png");
        fs::write(&broken, b"not a png").unwrap();

        let images = vec![
            GalleryImage::from_path(&path).unwrap(),
            GalleryImage::from_path(&broken).unwrap(),
            GalleryImage::parse("https://example.com/remote.png").unwrap(),
        ];
        let cache = preload(&images, 2, 2);

        assert_eq!(cache.len(), 1);
        let red = cache.get(&images[0].src).unwrap();
        assert_eq!(red.dimensions(), (2, 2));
        assert_eq!(red.get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn writer_emits_sequence_only_on_change() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut writer = FrameWriter::new(temp_dir.path().join("frames"), 3).unwrap();
        let cache = ImageCache::empty(4, 4);

        let mut state = GalleryState::new(crate::gallery::test_support::images(2));
        assert_eq!(writer.write(&cache, &state.frame()).unwrap(), 1);
        assert_eq!(writer.write(&cache, &state.frame()).unwrap(), 0);

        state.advance(1);
        assert_eq!(writer.write(&cache, &state.frame()).unwrap(), 3);

        let count = fs::read_dir(temp_dir.path().join("frames")).unwrap().count();
        assert_eq!(count, 4);
    }
}
