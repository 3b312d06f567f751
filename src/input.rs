//! Input adapters.
//!
//! Raw input (key names, thumbnail clicks, touch gestures, button presses)
//! is parsed into an [`InputEvent`] and then mapped to exactly one
//! [`Action`]. Keeping both steps pure lets every binding be tested without
//! a terminal.

use crate::controller::{GalleryCommand, Navigation};
use crate::error::{GalleryError, Result};

/// Minimum horizontal travel, in pixels, for a touch to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Space,
    Enter,
    Escape,
    Char(char),
}

impl Key {
    pub fn from_token(token: &str) -> Option<Self> {
        let key = match token.to_ascii_lowercase().as_str() {
            "right" | "arrowright" | "→" => Key::ArrowRight,
            "left" | "arrowleft" | "←" => Key::ArrowLeft,
            "space" | " " => Key::Space,
            "enter" | "return" => Key::Enter,
            "esc" | "escape" => Key::Escape,
            _ => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchGesture {
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
}

impl TouchGesture {
    /// Travel measured as start minus end, so a leftward swipe is positive.
    pub fn delta(&self) -> (f32, f32) {
        (self.start_x - self.end_x, self.start_y - self.end_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved left: show the next image.
    Left,
    /// Finger moved right: show the previous image.
    Right,
}

impl Swipe {
    pub fn step(self) -> i64 {
        match self {
            Swipe::Left => 1,
            Swipe::Right => -1,
        }
    }
}

/// Horizontal-dominant gestures past the threshold are swipes; anything else
/// is ignored.
pub fn classify_swipe(delta_x: f32, delta_y: f32) -> Option<Swipe> {
    if delta_x.abs() > delta_y.abs() && delta_x.abs() > SWIPE_THRESHOLD {
        Some(if delta_x > 0.0 { Swipe::Left } else { Swipe::Right })
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    PlayPause,
    Shuffle,
    Transition,
    Fullscreen,
    LightboxPrev,
    LightboxNext,
    LightboxClose,
    HelpOpen,
    HelpClose,
    ThemeToggle,
    ThumbnailsPrev,
    ThumbnailsNext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(Key),
    ThumbnailClick(usize),
    Touch(TouchGesture),
    Button(Button),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Gallery(GalleryCommand),
    OpenLightbox,
    CloseLightbox,
    LightboxNavigate(i64),
    ToggleHelp,
    OpenHelp,
    CloseHelp,
    CloseOverlays,
    ToggleTheme,
    ScrollThumbnails(i32),
    Quit,
}

fn manual(navigation: Navigation) -> Action {
    Action::Gallery(GalleryCommand::Navigate(navigation))
}

pub fn action_for_key(key: Key) -> Option<Action> {
    let action = match key {
        Key::ArrowRight => manual(Navigation::By(1)),
        Key::ArrowLeft => manual(Navigation::By(-1)),
        Key::Space => Action::Gallery(GalleryCommand::TogglePlayPause),
        Key::Enter => Action::OpenLightbox,
        Key::Escape => Action::CloseOverlays,
        Key::Char('s' | 'S') => Action::Gallery(GalleryCommand::ToggleShuffle),
        Key::Char('t' | 'T') => Action::Gallery(GalleryCommand::CycleTransition),
        Key::Char('?') => Action::ToggleHelp,
        Key::Char(_) => return None,
    };
    Some(action)
}

pub fn action_for_button(button: Button) -> Action {
    match button {
        Button::PlayPause => Action::Gallery(GalleryCommand::TogglePlayPause),
        Button::Shuffle => Action::Gallery(GalleryCommand::ToggleShuffle),
        Button::Transition => Action::Gallery(GalleryCommand::CycleTransition),
        Button::Fullscreen => Action::OpenLightbox,
        Button::LightboxPrev => Action::LightboxNavigate(-1),
        Button::LightboxNext => Action::LightboxNavigate(1),
        Button::LightboxClose => Action::CloseLightbox,
        Button::HelpOpen => Action::OpenHelp,
        Button::HelpClose => Action::CloseHelp,
        Button::ThemeToggle => Action::ToggleTheme,
        Button::ThumbnailsPrev => Action::ScrollThumbnails(-1),
        Button::ThumbnailsNext => Action::ScrollThumbnails(1),
    }
}

/// Translates one input event into at most one action.
pub fn action_for(event: &InputEvent) -> Option<Action> {
    match event {
        InputEvent::Key(key) => action_for_key(*key),
        InputEvent::ThumbnailClick(index) => Some(manual(Navigation::To(*index))),
        InputEvent::Touch(gesture) => {
            let (dx, dy) = gesture.delta();
            classify_swipe(dx, dy).map(|swipe| manual(Navigation::By(swipe.step())))
        }
        InputEvent::Button(button) => Some(action_for_button(*button)),
        InputEvent::Quit => Some(Action::Quit),
    }
}

fn parse_number<T: std::str::FromStr>(token: Option<&str>, line: &str) -> Result<T> {
    token
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| GalleryError::Input(line.to_string()))
}

/// Parses one line of the stdin control protocol. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<InputEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        // A line holding only spaces is the space key.
        return Ok(line.contains(' ').then_some(InputEvent::Key(Key::Space)));
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default();

    let event = match command.to_ascii_lowercase().as_str() {
        "click" | "thumb" => InputEvent::ThumbnailClick(parse_number(parts.next(), trimmed)?),
        "swipe" => {
            let dx: f32 = parse_number(parts.next(), trimmed)?;
            let dy: f32 = parse_number(parts.next(), trimmed)?;
            InputEvent::Touch(TouchGesture {
                start_x: dx,
                start_y: dy,
                end_x: 0.0,
                end_y: 0.0,
            })
        }
        "touch" => InputEvent::Touch(TouchGesture {
            start_x: parse_number(parts.next(), trimmed)?,
            start_y: parse_number(parts.next(), trimmed)?,
            end_x: parse_number(parts.next(), trimmed)?,
            end_y: parse_number(parts.next(), trimmed)?,
        }),
        "play" | "pause" => InputEvent::Button(Button::PlayPause),
        "shuffle" => InputEvent::Button(Button::Shuffle),
        "transition" => InputEvent::Button(Button::Transition),
        "open" | "fullscreen" => InputEvent::Button(Button::Fullscreen),
        "close" => InputEvent::Button(Button::LightboxClose),
        "lb-prev" => InputEvent::Button(Button::LightboxPrev),
        "lb-next" => InputEvent::Button(Button::LightboxNext),
        "help" => InputEvent::Button(Button::HelpOpen),
        "help-close" => InputEvent::Button(Button::HelpClose),
        "theme" => InputEvent::Button(Button::ThemeToggle),
        "thumbs-prev" => InputEvent::Button(Button::ThumbnailsPrev),
        "thumbs-next" => InputEvent::Button(Button::ThumbnailsNext),
        "quit" | "exit" => InputEvent::Quit,
        _ => match Key::from_token(trimmed) {
            Some(key) => InputEvent::Key(key),
            None => return Err(GalleryError::Input(trimmed.to_string())),
        },
    };

    Ok(Some(event))
}
