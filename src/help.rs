/// Key bindings listed in the help overlay.
pub const BINDINGS: [(&str, &str); 8] = [
    ("→ / ←", "next / previous image"),
    ("space", "play / pause slideshow"),
    ("enter", "open lightbox"),
    ("s", "toggle shuffle"),
    ("t", "cycle transition effect"),
    ("?", "toggle this help"),
    ("esc", "close overlays"),
    ("swipe", "next / previous image on touch screens"),
];

#[derive(Debug, Default)]
pub struct HelpPanel {
    open: bool,
}

impl HelpPanel {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_close_is_idempotent() {
        let mut help = HelpPanel::default();
        assert!(help.toggle());
        assert!(!help.toggle());
        help.open();
        help.close();
        help.close();
        assert!(!help.is_open());
    }
}
