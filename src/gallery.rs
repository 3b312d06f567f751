//! Pure gallery state.
//!
//! [`GalleryState`] owns the display order, the current index and the
//! playback/shuffle/transition flags. Nothing here touches timers or the
//! view: every mutation is a plain state transition and [`GalleryState::frame`]
//! derives the outputs the view needs.

use serde::Serialize;
use url::Url;

use crate::image_source::GalleryImage;
use crate::transition::TransitionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
}

/// Everything the view needs after a state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub main_src: Option<Url>,
    pub main_id: Option<String>,
    pub active_thumbnail: Option<usize>,
    pub counter: String,
    pub transition: TransitionMode,
    pub playback: PlaybackState,
    pub shuffled: bool,
    pub total: usize,
}

impl RenderFrame {
    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }
}

#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    items: Vec<GalleryImage>,
    original_order: Vec<GalleryImage>,
    current_index: usize,
    is_playing: bool,
    is_shuffled: bool,
    transition_mode: TransitionMode,
}

/// Circular index arithmetic shared by every navigation path.
///
/// Returns `None` for an empty list; otherwise the result is always in
/// `0..len`, whatever the sign or magnitude of `delta`.
pub fn wrap_index(current: usize, delta: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = len as i64;
    let current = (current as i64).rem_euclid(len);
    Some((current + delta.rem_euclid(len)).rem_euclid(len) as usize)
}

impl GalleryState {
    /// Fresh state in display order, index 0, playing.
    pub fn new(images: Vec<GalleryImage>) -> Self {
        Self {
            original_order: images.clone(),
            items: images,
            current_index: 0,
            is_playing: true,
            is_shuffled: false,
            transition_mode: TransitionMode::default(),
        }
    }

    pub fn with_transition(mut self, mode: TransitionMode) -> Self {
        self.transition_mode = mode;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[GalleryImage] {
        &self.items
    }

    pub fn original_order(&self) -> &[GalleryImage] {
        &self.original_order
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&GalleryImage> {
        self.items.get(self.current_index)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_shuffled(&self) -> bool {
        self.is_shuffled
    }

    pub fn transition_mode(&self) -> TransitionMode {
        self.transition_mode
    }

    pub fn playback(&self) -> PlaybackState {
        if self.is_playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    /// Moves to `index`, wrapping out-of-range values. Returns the index that
    /// became current, or `None` when there is nothing to show.
    pub fn go_to(&mut self, index: usize) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        self.current_index = index % self.items.len();
        Some(self.current_index)
    }

    pub fn advance(&mut self, delta: i64) -> Option<usize> {
        let target = wrap_index(self.current_index, delta, self.items.len())?;
        self.go_to(target)
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Enables shuffle with a fresh Fisher–Yates permutation of the original
    /// order, or restores the original order. Either way the index resets to 0.
    pub fn toggle_shuffle(&mut self, rng: &mut fastrand::Rng) -> bool {
        self.is_shuffled = !self.is_shuffled;

        let mut items = self.original_order.clone();
        if self.is_shuffled {
            rng.shuffle(&mut items);
        }
        self.items = items;
        self.current_index = 0;

        self.is_shuffled
    }

    pub fn cycle_transition(&mut self) -> TransitionMode {
        self.transition_mode = self.transition_mode.next();
        self.transition_mode
    }

    pub fn counter(&self) -> String {
        if self.items.is_empty() {
            "0 / 0".to_string()
        } else {
            format!("{} / {}", self.current_index + 1, self.items.len())
        }
    }

    pub fn frame(&self) -> RenderFrame {
        let current = self.current();
        RenderFrame {
            main_src: current.map(|image| image.src.clone()),
            main_id: current.map(|image| image.id.clone()),
            active_thumbnail: current.map(|_| self.current_index),
            counter: self.counter(),
            transition: self.transition_mode,
            playback: self.playback(),
            shuffled: self.is_shuffled,
            total: self.items.len(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn images(count: usize) -> Vec<GalleryImage> {
        (0..count)
            .map(|i| {
                let src = Url::parse(&format!("https://example.com/img/{i}.jpg")).unwrap();
                GalleryImage::new(format!("{i}.jpg"), src)
            })
            .collect()
    }
}
