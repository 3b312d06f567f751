//! Thumbnail gallery with slideshow autoplay, a lightbox overlay, shuffle,
//! transition effects, touch-swipe navigation and a persisted light/dark
//! theme.
//!
//! The core is [`controller::GalleryController`], a single owned state
//! machine fed by a timer and a handful of input adapters. [`app`] wires it
//! to a terminal view on a single-threaded tokio event loop.

pub mod app;
pub mod autoplay;
pub mod controller;
pub mod error;
pub mod event;
pub mod gallery;
pub mod help;
pub mod image_source;
pub mod input;
pub mod lightbox;
pub mod render;
pub mod theme;
pub mod thumbnails;
pub mod transition;
pub mod view;

pub use controller::{ControllerConfig, GalleryCommand, GalleryController, Navigation};
pub use error::{GalleryError, Result};
pub use gallery::{GalleryState, PlaybackState, RenderFrame};
pub use image_source::GalleryImage;
pub use transition::TransitionMode;
