//! Full-size overlay kept in lock-step with the controller.
//!
//! The lightbox stores no index of its own: what it shows is always derived
//! from the controller's current frame, and navigating inside it goes through
//! the same manual-navigation path as the main view.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::controller::{GalleryController, Navigation};
use crate::gallery::RenderFrame;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightboxView {
    pub src: Option<Url>,
    pub counter: String,
}

#[derive(Debug, Default)]
pub struct Lightbox {
    open: bool,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens on whatever the controller currently shows.
    pub fn open(&mut self, controller: &GalleryController) -> LightboxView {
        self.open = true;
        let frame = controller.frame();
        debug!("Lightbox opened on {:?}", frame.main_id);
        Self::project(&frame)
    }

    /// Closing never touches playback.
    pub fn close(&mut self) {
        if self.open {
            debug!("Lightbox closed");
        }
        self.open = false;
    }

    /// Prev/next inside the overlay. Ignored while closed.
    pub fn navigate(&mut self, controller: &mut GalleryController, delta: i64) -> Option<RenderFrame> {
        if !self.open {
            return None;
        }
        Some(controller.on_user_navigate(Navigation::By(delta)))
    }

    pub fn view(&self, frame: &RenderFrame) -> Option<LightboxView> {
        self.open.then(|| Self::project(frame))
    }

    fn project(frame: &RenderFrame) -> LightboxView {
        LightboxView {
            src: frame.main_src.clone(),
            counter: frame.counter.clone(),
        }
    }
}
