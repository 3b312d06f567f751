use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Visual effect applied when the main image changes. Cosmetic only: it never
/// influences navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    #[default]
    Fade,
    Slide,
    Zoom,
    Blur,
}

impl TransitionMode {
    pub const ALL: [TransitionMode; 4] = [Self::Fade, Self::Slide, Self::Zoom, Self::Blur];

    /// Next mode in the fixed cycle, wrapping from `Blur` back to `Fade`.
    pub fn next(self) -> Self {
        match self {
            Self::Fade => Self::Slide,
            Self::Slide => Self::Zoom,
            Self::Zoom => Self::Blur,
            Self::Blur => Self::Fade,
        }
    }

    /// Tag the view applies to the main image, e.g. `transition-fade`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Fade => "transition-fade",
            Self::Slide => "transition-slide",
            Self::Zoom => "transition-zoom",
            Self::Blur => "transition-blur",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Fade => "FADE",
            Self::Slide => "SLIDE",
            Self::Zoom => "ZOOM",
            Self::Blur => "BLUR",
        }
    }

    /// Easing applied to linear progress before compositing a frame.
    pub fn ease(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Fade | Self::Blur => t,
            Self::Slide => 1.0 - (1.0 - t) * (1.0 - t),
            Self::Zoom => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
        }
    }
}
