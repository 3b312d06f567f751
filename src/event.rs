use crate::input::InputEvent;

/// Everything that can wake the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    /// Autoplay period elapsed. `generation` identifies the timer that fired
    /// so ticks from a cancelled timer can be dropped.
    Tick { generation: u64 },
    /// Deferred thumbnail scroll after `index` became active.
    ScrollIntoView { index: usize },
    Input(InputEvent),
    Shutdown,
}
