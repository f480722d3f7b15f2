//! Input handling for the item.
//!
//! Tracks held buttons and decides which pointer events reach the queue.

use marionette_shared::{ItemConfig, PointerButton, PointerEvent, PointerKind};

/// Pointer state seen by the item.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Buttons currently held.
    buttons_down: u8,
    /// Last pointer position in item pixels.
    pointer: (f64, f64),
    /// Whether the pointer is over the item.
    hovered: bool,
}

impl InputState {
    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a button press.
    pub fn button_down(&mut self, button: PointerButton, x: f64, y: f64) {
        self.buttons_down |= Self::button_mask(button);
        self.pointer = (x, y);
    }

    /// Records a button release.
    pub fn button_up(&mut self, button: PointerButton, x: f64, y: f64) {
        self.buttons_down &= !Self::button_mask(button);
        self.pointer = (x, y);
    }

    /// Records pointer motion.
    pub fn moved(&mut self, x: f64, y: f64) {
        self.hovered = true;
        self.pointer = (x, y);
    }

    /// Records the pointer leaving the item.
    pub fn left(&mut self) {
        self.hovered = false;
    }

    /// Returns true if the button is currently held.
    #[must_use]
    pub fn is_down(&self, button: PointerButton) -> bool {
        (self.buttons_down & Self::button_mask(button)) != 0
    }

    /// Returns true if any button is held.
    #[must_use]
    pub fn any_button_down(&self) -> bool {
        self.buttons_down != 0
    }

    /// Last pointer position.
    #[must_use]
    pub fn pointer(&self) -> (f64, f64) {
        self.pointer
    }

    /// Returns true while the pointer is over the item.
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Returns the bit mask for a button.
    const fn button_mask(button: PointerButton) -> u8 {
        match button {
            PointerButton::None => 0,
            PointerButton::Primary => 1,
            PointerButton::Secondary => 2,
            PointerButton::Middle => 4,
        }
    }
}

/// Enqueue-time filter for pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatingPolicy {
    /// The model follows the pointer.
    pub follow_mouse: bool,
    /// The model reacts to touches.
    pub react_to_touch: bool,
}

impl GatingPolicy {
    /// The policy implied by a configuration.
    #[must_use]
    pub fn from_config(config: &ItemConfig) -> Self {
        Self {
            follow_mouse: config.follow_mouse,
            react_to_touch: config.react_to_touch,
        }
    }

    /// Returns true if the event may be queued.
    ///
    /// Forced events always pass. Otherwise nothing passes with both toggles
    /// off; moves need pointer following or a held button; presses and
    /// releases need the primary button and touch reactions.
    #[must_use]
    pub fn admits(&self, event: &PointerEvent, button_held: bool) -> bool {
        if event.force {
            return true;
        }
        if !self.follow_mouse && !self.react_to_touch {
            return false;
        }
        match event.kind {
            PointerKind::Move => self.follow_mouse || button_held,
            PointerKind::Press | PointerKind::Release => {
                event.button == PointerButton::Primary && self.react_to_touch
            }
        }
    }
}

impl Default for GatingPolicy {
    fn default() -> Self {
        Self::from_config(&ItemConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_tracking() {
        let mut input = InputState::new();

        input.button_down(PointerButton::Primary, 1.0, 2.0);
        input.button_down(PointerButton::Secondary, 1.0, 2.0);
        assert!(input.is_down(PointerButton::Primary));
        assert_eq!(input.pointer(), (1.0, 2.0));

        input.button_up(PointerButton::Primary, 3.0, 4.0);
        assert!(!input.is_down(PointerButton::Primary));
        assert!(input.any_button_down());

        input.button_up(PointerButton::Secondary, 3.0, 4.0);
        assert!(!input.any_button_down());
    }

    #[test]
    fn test_gating_both_off() {
        let policy = GatingPolicy {
            follow_mouse: false,
            react_to_touch: false,
        };
        let event = PointerEvent::moved(5.0, 5.0);

        assert!(!policy.admits(&event, true));
        assert!(policy.admits(&event.forced(), false));
        assert!(!policy.admits(&PointerEvent::press(PointerButton::Primary, 0.0, 0.0), false));
    }

    #[test]
    fn test_gating_moves_need_follow_or_button() {
        let policy = GatingPolicy {
            follow_mouse: false,
            react_to_touch: true,
        };
        let event = PointerEvent::moved(5.0, 5.0);

        assert!(!policy.admits(&event, false));
        assert!(policy.admits(&event, true));
    }

    #[test]
    fn test_gating_presses_need_primary_and_touch() {
        let policy = GatingPolicy::default();
        assert!(policy.admits(&PointerEvent::press(PointerButton::Primary, 0.0, 0.0), false));
        assert!(!policy.admits(&PointerEvent::press(PointerButton::Secondary, 0.0, 0.0), false));

        let no_touch = GatingPolicy {
            follow_mouse: true,
            react_to_touch: false,
        };
        assert!(!no_touch.admits(&PointerEvent::release(PointerButton::Primary, 0.0, 0.0), true));
        assert!(no_touch.admits(&PointerEvent::moved(0.0, 0.0), false));
    }
}
