//! The gallery controller: single authority over the current image, the
//! autoplay timer and the traversal order.
//!
//! Every input channel ends up here. The timer path ([`GalleryController::tick`])
//! advances without pausing; every manual path goes through
//! [`GalleryController::on_user_navigate`], which changes the index and then
//! pauses playback.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::autoplay::{Autoplay, DEFAULT_PERIOD};
use crate::event::GalleryEvent;
use crate::gallery::{GalleryState, RenderFrame};
use crate::image_source::GalleryImage;
use crate::transition::TransitionMode;

/// Delay before the active thumbnail is scrolled into view.
pub const SCROLL_SETTLE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    To(usize),
    By(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryCommand {
    Tick { generation: u64 },
    Navigate(Navigation),
    TogglePlayPause,
    ToggleShuffle,
    CycleTransition,
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub autoplay_period: Duration,
    pub initial_transition: TransitionMode,
    pub shuffle_seed: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            autoplay_period: DEFAULT_PERIOD,
            initial_transition: TransitionMode::default(),
            shuffle_seed: None,
        }
    }
}

#[derive(Debug)]
pub struct GalleryController {
    config: ControllerConfig,
    state: GalleryState,
    autoplay: Autoplay,
    pending_scroll: Option<JoinHandle<()>>,
    events: mpsc::Sender<GalleryEvent>,
    rng: fastrand::Rng,
}

impl GalleryController {
    pub fn new(config: ControllerConfig, events: mpsc::Sender<GalleryEvent>) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Self {
            autoplay: Autoplay::new(config.autoplay_period, events.clone()),
            state: GalleryState::default().with_transition(config.initial_transition),
            pending_scroll: None,
            events,
            rng,
            config,
        }
    }

    /// Captures the display order, resets to the first image and starts
    /// autoplay. Calling it again replaces the state; the old timer is
    /// cancelled before the new one starts.
    pub fn initialize(&mut self, images: Vec<GalleryImage>) -> RenderFrame {
        self.state = GalleryState::new(images).with_transition(self.config.initial_transition);
        self.autoplay.start();
        if !self.state.is_empty() {
            self.schedule_scroll(0);
        }

        info!("Gallery initialized with {} images", self.state.len());
        self.state.frame()
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn frame(&self) -> RenderFrame {
        self.state.frame()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn autoplay(&self) -> &Autoplay {
        &self.autoplay
    }

    /// Shows `index` (wrapped into range). Leaves playback alone.
    pub fn go_to(&mut self, index: usize) -> RenderFrame {
        if let Some(current) = self.state.go_to(index) {
            debug!("Showing image {}", current);
            self.schedule_scroll(current);
        }
        self.state.frame()
    }

    pub fn advance(&mut self, delta: i64) -> RenderFrame {
        match crate::gallery::wrap_index(self.state.current_index(), delta, self.state.len()) {
            Some(target) => self.go_to(target),
            None => self.state.frame(),
        }
    }

    /// Manual navigation: change the index, then stop autoplay.
    pub fn on_user_navigate(&mut self, navigation: Navigation) -> RenderFrame {
        match navigation {
            Navigation::To(index) => {
                self.go_to(index);
            }
            Navigation::By(delta) => {
                self.advance(delta);
            }
        }
        self.pause();
        self.state.frame()
    }

    /// Timer path. Never pauses.
    pub fn tick(&mut self) -> RenderFrame {
        self.advance(1)
    }

    pub fn toggle_play_pause(&mut self) -> RenderFrame {
        if self.state.is_playing() {
            self.pause();
        } else {
            self.play();
        }
        info!("Slideshow {:?}", self.state.playback());
        self.state.frame()
    }

    pub fn toggle_shuffle(&mut self) -> RenderFrame {
        let shuffled = self.state.toggle_shuffle(&mut self.rng);
        info!("Shuffle {}", if shuffled { "enabled" } else { "disabled" });
        if !self.state.is_empty() {
            self.schedule_scroll(0);
        }
        self.state.frame()
    }

    pub fn cycle_transition_mode(&mut self) -> RenderFrame {
        let mode = self.state.cycle_transition();
        info!("Transition mode set to {}", mode.name());
        self.state.frame()
    }

    /// Runs one command. Returns the new frame when something changed, `None`
    /// for a stale or ignored tick.
    pub fn handle_command(&mut self, command: GalleryCommand) -> Option<RenderFrame> {
        debug!("Handling command: {:?}", command);

        let frame = match command {
            GalleryCommand::Tick { generation } => {
                if !self.state.is_playing() || !self.autoplay.accepts(generation) {
                    debug!("Dropping stale tick from generation {}", generation);
                    return None;
                }
                if self.state.is_empty() {
                    return None;
                }
                self.tick()
            }
            GalleryCommand::Navigate(navigation) => self.on_user_navigate(navigation),
            GalleryCommand::TogglePlayPause => self.toggle_play_pause(),
            GalleryCommand::ToggleShuffle => self.toggle_shuffle(),
            GalleryCommand::CycleTransition => self.cycle_transition_mode(),
        };

        Some(frame)
    }

    fn play(&mut self) {
        self.state.set_playing(true);
        self.autoplay.start();
    }

    fn pause(&mut self) {
        self.autoplay.stop();
        self.state.set_playing(false);
    }

    fn schedule_scroll(&mut self, index: usize) {
        if let Some(pending) = self.pending_scroll.take() {
            pending.abort();
        }

        let events = self.events.clone();
        self.pending_scroll = Some(tokio::spawn(async move {
            tokio::time::sleep(SCROLL_SETTLE_DELAY).await;
            let _ = events.send(GalleryEvent::ScrollIntoView { index }).await;
        }));
    }
}

impl Drop for GalleryController {
    fn drop(&mut self) {
        if let Some(pending) = self.pending_scroll.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::test_support::images;
    use crate::gallery::PlaybackState;
    use tokio::time;

    const PERIOD: Duration = Duration::from_secs(4);

    fn controller() -> (GalleryController, mpsc::Receiver<GalleryEvent>) {
        let (tx, rx) = mpsc::channel(64);
        let config = ControllerConfig {
            autoplay_period: PERIOD,
            shuffle_seed: Some(3),
            ..ControllerConfig::default()
        };
        (GalleryController::new(config, tx), rx)
    }

    /// Feeds timer ticks back into the controller until `count` were accepted.
    async fn run_ticks(
        controller: &mut GalleryController,
        rx: &mut mpsc::Receiver<GalleryEvent>,
        count: usize,
    ) {
        let mut accepted = 0;
        while accepted < count {
            let event = rx.recv().await.expect("event channel closed");
            if let GalleryEvent::Tick { generation } = event {
                if controller
                    .handle_command(GalleryCommand::Tick { generation })
                    .is_some()
                {
                    accepted += 1;
                }
            }
        }
    }

    fn count_ticks(rx: &mut mpsc::Receiver<GalleryEvent>) -> usize {
        let mut ticks = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, GalleryEvent::Tick { .. }) {
                ticks += 1;
            }
        }
        ticks
    }

    #[tokio::test(start_paused = true)]
    async fn initialize_starts_playing_at_first_image() {
        let (mut controller, _rx) = controller();
        let frame = controller.initialize(images(5));

        assert_eq!(frame.active_thumbnail, Some(0));
        assert_eq!(frame.playback, PlaybackState::Playing);
        assert!(controller.autoplay().is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_ticks_advance_without_pausing() {
        let (mut controller, mut rx) = controller();
        controller.initialize(images(5));

        run_ticks(&mut controller, &mut rx, 3).await;

        assert_eq!(controller.state().current_index(), 3);
        assert!(controller.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_navigation_always_pauses() {
        for start_playing in [true, false] {
            for navigation in [Navigation::By(1), Navigation::By(-3), Navigation::To(2)] {
                let (mut controller, _rx) = controller();
                controller.initialize(images(5));
                if !start_playing {
                    controller.toggle_play_pause();
                }

                let frame = controller.on_user_navigate(navigation);

                assert_eq!(frame.playback, PlaybackState::Paused);
                assert!(!controller.is_playing());
                assert!(!controller.autoplay().is_active());
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pause_is_visible_before_queued_tick() {
        let (mut controller, mut rx) = controller();
        controller.initialize(images(5));

        // Let a tick land in the channel, then navigate before handling it.
        time::sleep(PERIOD + Duration::from_millis(10)).await;
        controller.on_user_navigate(Navigation::By(1));

        while let Ok(event) = rx.try_recv() {
            if let GalleryEvent::Tick { generation } = event {
                assert_eq!(controller.handle_command(GalleryCommand::Tick { generation }), None);
            }
        }
        assert_eq!(controller.state().current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn double_toggle_keeps_exactly_one_timer() {
        let (mut controller, mut rx) = controller();
        controller.initialize(images(5));

        controller.toggle_play_pause();
        controller.toggle_play_pause();
        assert!(controller.is_playing());
        assert!(controller.autoplay().is_active());

        time::sleep(PERIOD * 3 + PERIOD / 2).await;
        assert_eq!(count_ticks(&mut rx), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_is_ignored() {
        let (mut controller, _rx) = controller();
        controller.initialize(images(5));
        let old = controller.autoplay().generation();

        controller.toggle_play_pause();
        controller.toggle_play_pause();

        assert_eq!(controller.handle_command(GalleryCommand::Tick { generation: old }), None);
        assert_eq!(controller.state().current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shuffle_does_not_change_playback() {
        let (mut controller, _rx) = controller();
        controller.initialize(images(6));
        controller.go_to(4);

        let frame = controller.toggle_shuffle();
        assert!(frame.shuffled);
        assert_eq!(frame.active_thumbnail, Some(0));
        assert!(frame.is_playing());

        let frame = controller.toggle_shuffle();
        assert!(!frame.shuffled);
        assert_eq!(controller.state().items(), images(6).as_slice());
    }

    #[tokio::test(start_paused = true)]
    async fn go_to_schedules_scroll_into_view() {
        let (mut controller, mut rx) = controller();
        controller.initialize(images(5));
        controller.go_to(1);
        controller.go_to(3);

        time::sleep(SCROLL_SETTLE_DELAY * 2).await;

        let mut scrolls = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let GalleryEvent::ScrollIntoView { index } = event {
                scrolls.push(index);
            }
        }
        // Only the latest pending scroll survives.
        assert_eq!(scrolls, vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_gallery_is_inert() {
        let (mut controller, _rx) = controller();
        let frame = controller.initialize(Vec::new());
        assert_eq!(frame.counter, "0 / 0");

        let generation = controller.autoplay().generation();
        assert_eq!(controller.handle_command(GalleryCommand::Tick { generation }), None);

        let frame = controller.on_user_navigate(Navigation::By(-1));
        assert_eq!(frame.main_src, None);
        assert!(!frame.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn reinitialize_does_not_duplicate_timer() {
        let (mut controller, mut rx) = controller();
        controller.initialize(images(3));
        controller.initialize(images(3));

        time::sleep(PERIOD + PERIOD / 2).await;
        assert_eq!(count_ticks(&mut rx), 1);
    }
}
