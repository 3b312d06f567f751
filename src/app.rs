//! Event loop wiring.
//!
//! [`GalleryApp`] owns the one [`GalleryController`] plus the peripheral
//! overlays and the view. Each incoming [`GalleryEvent`] is turned into a
//! single action, applied, and followed by a render when something changed.

use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::controller::{ControllerConfig, GalleryCommand, GalleryController};
use crate::event::GalleryEvent;
use crate::gallery::RenderFrame;
use crate::help::HelpPanel;
use crate::image_source::GalleryImage;
use crate::input::{self, Action};
use crate::lightbox::Lightbox;
use crate::render::{self, FrameWriter, ImageCache};
use crate::theme::{Theme, ThemeStore};
use crate::thumbnails::ThumbnailStrip;
use crate::view::{OutputFormat, Snapshot, TerminalView};

#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub dir: PathBuf,
    pub frames: usize,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub controller: ControllerConfig,
    pub start_index: usize,
    pub visible_thumbnails: usize,
    pub format: OutputFormat,
    pub theme_store: ThemeStore,
    pub frame_output: Option<FrameOutput>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            start_index: 0,
            visible_thumbnails: 7,
            format: OutputFormat::Text,
            theme_store: ThemeStore::default(),
            frame_output: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct GalleryApp<W: Write> {
    controller: GalleryController,
    lightbox: Lightbox,
    help: HelpPanel,
    theme: Theme,
    theme_store: ThemeStore,
    strip: ThumbnailStrip,
    view: TerminalView<W>,
    frames: Option<(ImageCache, FrameWriter)>,
    config: AppConfig,
}

impl<W: Write> GalleryApp<W> {
    pub fn new(config: AppConfig, events: mpsc::Sender<GalleryEvent>, out: W) -> Self {
        let theme = config.theme_store.load();
        debug!("Theme preference: {}", theme.preference());

        Self {
            controller: GalleryController::new(config.controller.clone(), events),
            lightbox: Lightbox::new(),
            help: HelpPanel::default(),
            theme,
            theme_store: config.theme_store.clone(),
            strip: ThumbnailStrip::new(0, config.visible_thumbnails),
            view: TerminalView::new(out, config.format),
            frames: None,
            config,
        }
    }

    pub fn controller(&self) -> &GalleryController {
        &self.controller
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn help(&self) -> &HelpPanel {
        &self.help
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn strip(&self) -> &ThumbnailStrip {
        &self.strip
    }

    pub fn view(&self) -> &TerminalView<W> {
        &self.view
    }

    /// Initializes the controller, jumps to the requested start image and
    /// draws the first frame.
    pub fn start(&mut self, images: Vec<GalleryImage>) {
        if let Some(output) = &self.config.frame_output {
            match FrameWriter::new(output.dir.clone(), output.frames) {
                Ok(writer) => {
                    let cache = render::preload(&images, output.width, output.height);
                    self.frames = Some((cache, writer));
                }
                Err(e) => warn!("Frame output disabled, cannot use {}: {}", output.dir.display(), e),
            }
        }

        self.strip = ThumbnailStrip::new(images.len(), self.config.visible_thumbnails);
        let mut frame = self.controller.initialize(images);
        if self.config.start_index != 0 {
            frame = self.controller.go_to(self.config.start_index);
        }
        self.on_frame(&frame);
    }

    pub fn handle_event(&mut self, event: GalleryEvent) -> Flow {
        match event {
            GalleryEvent::Tick { generation } => {
                if let Some(frame) = self.controller.handle_command(GalleryCommand::Tick { generation }) {
                    self.on_frame(&frame);
                }
            }
            GalleryEvent::ScrollIntoView { index } => {
                self.strip.scroll_into_view(index);
                self.render();
            }
            GalleryEvent::Input(event) => match input::action_for(&event) {
                Some(Action::Quit) => return Flow::Quit,
                Some(action) => self.apply(action),
                None => debug!("No action for {:?}", event),
            },
            GalleryEvent::Shutdown => return Flow::Quit,
        }
        Flow::Continue
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Gallery(command) => {
                if let Some(frame) = self.controller.handle_command(command) {
                    self.on_frame(&frame);
                }
            }
            Action::LightboxNavigate(delta) => {
                if let Some(frame) = self.lightbox.navigate(&mut self.controller, delta) {
                    self.on_frame(&frame);
                }
            }
            Action::OpenLightbox => {
                self.lightbox.open(&self.controller);
                self.render();
            }
            Action::CloseLightbox => {
                self.lightbox.close();
                self.render();
            }
            Action::ToggleHelp => {
                self.help.toggle();
                self.render();
            }
            Action::OpenHelp => {
                self.help.open();
                self.render();
            }
            Action::CloseHelp => {
                self.help.close();
                self.render();
            }
            Action::CloseOverlays => {
                self.lightbox.close();
                self.help.close();
                self.render();
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                if let Err(e) = self.theme_store.save(self.theme) {
                    warn!("Failed to save theme preference: {}", e);
                }
                self.render();
            }
            Action::ScrollThumbnails(direction) => {
                self.strip.scroll_by(direction);
                self.render();
            }
            Action::Quit => {}
        }
    }

    fn on_frame(&mut self, frame: &RenderFrame) {
        if let Some((cache, writer)) = &mut self.frames {
            if let Err(e) = writer.write(cache, frame) {
                warn!("Failed to write transition frames: {}", e);
            }
        }
        self.render();
    }

    fn render(&mut self) {
        let frame = self.controller.frame();
        let snapshot = Snapshot::new(
            frame.clone(),
            self.controller.state().items(),
            self.strip.visible_range(),
            self.lightbox.view(&frame),
            self.help.is_open(),
            self.theme,
        );
        if let Err(e) = self.view.render(&snapshot) {
            warn!("Failed to render: {}", e);
        }
    }
}

/// Drives the app until a quit request, a shutdown signal or the channel
/// closing.
pub async fn run<W: Write>(app: &mut GalleryApp<W>, mut events: mpsc::Receiver<GalleryEvent>) {
    while let Some(event) = events.recv().await {
        if app.handle_event(event) == Flow::Quit {
            info!("Shutting down gallery");
            return;
        }
    }
    info!("Event channel closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::test_support::images;
    use crate::input::{Button, InputEvent, Key};
    use tempfile::tempdir;

    fn app(config: AppConfig) -> (GalleryApp<Vec<u8>>, mpsc::Receiver<GalleryEvent>) {
        let (tx, rx) = mpsc::channel(64);
        (GalleryApp::new(config, tx, Vec::new()), rx)
    }

    fn key(key: Key) -> GalleryEvent {
        GalleryEvent::Input(InputEvent::Key(key))
    }

    #[tokio::test(start_paused = true)]
    async fn start_renders_first_frame_at_start_index() {
        let (mut app, _rx) = app(AppConfig {
            start_index: 2,
            ..AppConfig::default()
        });
        app.start(images(5));

        assert_eq!(app.controller().state().current_index(), 2);
        assert!(app.controller().is_playing());
        let output = String::from_utf8(app.view().writer().clone()).unwrap();
        assert!(output.contains("3 / 5"));
    }

    #[tokio::test(start_paused = true)]
    async fn escape_closes_every_overlay() {
        let (mut app, _rx) = app(AppConfig::default());
        app.start(images(3));

        app.handle_event(key(Key::Enter));
        app.handle_event(key(Key::Char('?')));
        assert!(app.lightbox().is_open());
        assert!(app.help().is_open());

        app.handle_event(key(Key::Escape));
        assert!(!app.lightbox().is_open());
        assert!(!app.help().is_open());
        assert!(app.controller().is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn lightbox_buttons_navigate_only_while_open() {
        let (mut app, _rx) = app(AppConfig::default());
        app.start(images(3));

        app.handle_event(GalleryEvent::Input(InputEvent::Button(Button::LightboxNext)));
        assert_eq!(app.controller().state().current_index(), 0);
        assert!(app.controller().is_playing());

        app.handle_event(GalleryEvent::Input(InputEvent::Button(Button::Fullscreen)));
        app.handle_event(GalleryEvent::Input(InputEvent::Button(Button::LightboxNext)));
        assert_eq!(app.controller().state().current_index(), 1);
        assert!(!app.controller().is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn theme_toggle_persists() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let store = ThemeStore::new(Some(temp_dir.path().join("theme.json")));
        let (mut app, _rx) = app(AppConfig {
            theme_store: store.clone(),
            ..AppConfig::default()
        });
        app.start(images(2));
        assert_eq!(app.theme(), Theme::Dark);

        app.handle_event(GalleryEvent::Input(InputEvent::Button(Button::ThemeToggle)));
        assert_eq!(app.theme(), Theme::Light);
        assert_eq!(store.load(), Theme::Light);
    }

    #[tokio::test(start_paused = true)]
    async fn scroll_event_moves_thumbnail_window() {
        let (mut app, _rx) = app(AppConfig {
            visible_thumbnails: 3,
            ..AppConfig::default()
        });
        app.start(images(10));

        app.handle_event(GalleryEvent::ScrollIntoView { index: 6 });
        assert_eq!(app.strip().visible_range(), 5..8);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_and_shutdown_stop_the_loop() {
        let (mut app, _rx) = app(AppConfig::default());
        app.start(images(2));

        assert_eq!(app.handle_event(key(Key::Char('x'))), Flow::Continue);
        assert_eq!(app.handle_event(GalleryEvent::Input(InputEvent::Quit)), Flow::Quit);
        assert_eq!(app.handle_event(GalleryEvent::Shutdown), Flow::Quit);
    }

    #[tokio::test(start_paused = true)]
    async fn frame_output_writes_pngs_on_navigation() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let dir = temp_dir.path().join("frames");
        let (mut app, _rx) = app(AppConfig {
            frame_output: Some(FrameOutput {
                dir: dir.clone(),
                frames: 2,
                width: 4,
                height: 4,
            }),
            ..AppConfig::default()
        });
        app.start(images(3));
        app.handle_event(key(Key::ArrowRight));

        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 3);
    }
}
