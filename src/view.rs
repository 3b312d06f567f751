//! Terminal view: applies render outputs to stdout (or any writer).
//!
//! Two formats are supported. `Text` prints a compact status block for a
//! human at the terminal; `Json` prints one JSON object per state change so
//! the gallery can be driven and observed by another program.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::ops::Range;

use crate::error::Result;
use crate::gallery::{PlaybackState, RenderFrame};
use crate::help::BINDINGS;
use crate::image_source::GalleryImage;
use crate::lightbox::LightboxView;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThumbnailView {
    pub index: usize,
    pub id: String,
    pub active: bool,
}

/// Everything drawn for one state change.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub frame: RenderFrame,
    pub lightbox: Option<LightboxView>,
    pub help_open: bool,
    pub theme: Theme,
    pub thumbnails: Vec<ThumbnailView>,
    pub more_before: bool,
    pub more_after: bool,
}

impl Snapshot {
    pub fn new(
        frame: RenderFrame,
        items: &[GalleryImage],
        window: Range<usize>,
        lightbox: Option<LightboxView>,
        help_open: bool,
        theme: Theme,
    ) -> Self {
        let thumbnails = items
            .iter()
            .enumerate()
            .skip(window.start)
            .take(window.end.saturating_sub(window.start))
            .map(|(index, image)| ThumbnailView {
                index,
                id: image.id.clone(),
                active: frame.active_thumbnail == Some(index),
            })
            .collect();

        Self {
            timestamp: Utc::now(),
            more_before: window.start > 0,
            more_after: window.end < items.len(),
            frame,
            lightbox,
            help_open,
            theme,
            thumbnails,
        }
    }
}

#[derive(Debug)]
pub struct TerminalView<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn render(&mut self, snapshot: &Snapshot) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, snapshot)?;
                writeln!(self.out)?;
            }
            OutputFormat::Text => self.render_text(snapshot)?,
        }
        self.out.flush()?;
        Ok(())
    }

    fn render_text(&mut self, snapshot: &Snapshot) -> Result<()> {
        let frame = &snapshot.frame;
        let playback = match frame.playback {
            PlaybackState::Playing => "▶",
            PlaybackState::Paused => "⏸",
        };

        writeln!(
            self.out,
            "{} {}  {}  [{}]{}  {}",
            playback,
            frame.counter,
            frame.main_id.as_deref().unwrap_or("(no images)"),
            frame.transition.tag(),
            if frame.shuffled { "  shuffle" } else { "" },
            snapshot.theme.icon(),
        )?;

        if !snapshot.thumbnails.is_empty() {
            let strip: Vec<String> = snapshot
                .thumbnails
                .iter()
                .map(|thumb| {
                    if thumb.active {
                        format!("[{}]", thumb.index + 1)
                    } else {
                        format!(" {} ", thumb.index + 1)
                    }
                })
                .collect();
            writeln!(
                self.out,
                "  {}{}{}",
                if snapshot.more_before { "‹ " } else { "  " },
                strip.join(""),
                if snapshot.more_after { " ›" } else { "" },
            )?;
        }

        if let Some(lightbox) = &snapshot.lightbox {
            let src = lightbox
                .src
                .as_ref()
                .map(|src| src.as_str())
                .unwrap_or("(empty)");
            writeln!(self.out, "  lightbox {}  {}", lightbox.counter, src)?;
        }

        if snapshot.help_open {
            writeln!(self.out, "  keyboard shortcuts:")?;
            for (key, description) in BINDINGS {
                writeln!(self.out, "    {:<8} {}", key, description)?;
            }
        }

        Ok(())
    }
}
