//! Recurring autoplay timer.
//!
//! [`Autoplay`] is the sole owner of the timer task. Starting always cancels
//! the previous task first, so a controller never has two live timers.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

use crate::event::GalleryEvent;

pub const DEFAULT_PERIOD: Duration = Duration::from_millis(4000);

#[derive(Debug)]
pub struct Autoplay {
    period: Duration,
    events: mpsc::Sender<GalleryEvent>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl Autoplay {
    pub fn new(period: Duration, events: mpsc::Sender<GalleryEvent>) -> Self {
        Self {
            period,
            events,
            handle: None,
            generation: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Generation of the most recently started timer.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Starts a fresh timer whose first tick fires one full period from now.
    /// Any running timer is cancelled first.
    pub fn start(&mut self) {
        self.stop();
        self.generation += 1;

        let generation = self.generation;
        let period = self.period;
        let events = self.events.clone();

        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                trace!("autoplay tick (generation {})", generation);
                if events.send(GalleryEvent::Tick { generation }).await.is_err() {
                    break;
                }
            }
        }));

        debug!("Autoplay started (generation {}, every {:?})", generation, period);
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Autoplay stopped (generation {})", self.generation);
        }
    }

    /// A tick is current only if it came from the live timer.
    pub fn accepts(&self, generation: u64) -> bool {
        self.handle.is_some() && generation == self.generation
    }
}

impl Drop for Autoplay {
    fn drop(&mut self) {
        self.stop();
    }
}
