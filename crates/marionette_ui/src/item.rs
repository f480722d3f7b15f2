//! # Frontend Item
//!
//! The GUI-thread object users configure and feed with input.
//!
//! ## Contract
//!
//! - Setters are idempotent: an unchanged value raises no flag, schedules no
//!   frame and publishes nothing
//! - Changed flags are only cleared by the renderer, through
//!   [`SyncSource::take_changes`]
//! - Queued events are never coalesced, dropped after gating, or reordered

use marionette_core::{EventBus, EventQueue, EventReceiver, EventSender, QueueStats};
use marionette_rendering::{RendererLink, SurfaceSize, SyncSource};
use marionette_shared::{
    AnimationCommand, ChangeSet, ItemConfig, Notification, PointerButton, PointerEvent,
    Priority, Property, PropertyChange, Rgba,
};
use tracing::trace;

use crate::input::{GatingPolicy, InputState};

/// GUI-side state of one animated character.
pub struct FrontendItem {
    /// Configuration snapshot.
    config: ItemConfig,
    /// Properties changed since the last sync.
    changes: ChangeSet,
    /// Pending pointer events.
    pointer_events: EventQueue<PointerEvent>,
    /// Pending animation commands.
    animation_commands: EventQueue<AnimationCommand>,
    /// Held buttons and pointer position.
    input: InputState,
    /// Item size in pixels.
    size: SurfaceSize,
    /// A frame is pending.
    frame_requested: bool,
    /// Back-reference to the renderer.
    renderer: RendererLink,
    /// Where property changes are published.
    notifier: EventSender<Notification>,
}

impl FrontendItem {
    /// Creates an item with default configuration.
    #[must_use]
    pub fn new(notifier: EventSender<Notification>) -> Self {
        Self::with_config(ItemConfig::default(), notifier)
    }

    /// Creates an item with its own notification bus.
    #[must_use]
    pub fn create() -> (Self, EventReceiver<Notification>) {
        let (notifier, notifications) = EventBus::create_pair();
        (Self::new(notifier), notifications)
    }

    /// Creates an item with an initial configuration.
    ///
    /// A non-empty model or background path is flagged as changed so the
    /// first sync builds the scene.
    #[must_use]
    pub fn with_config(config: ItemConfig, notifier: EventSender<Notification>) -> Self {
        let mut changes = ChangeSet::empty();
        if !config.model_path.is_empty() {
            changes.insert(Property::ModelPath);
        }
        if !config.background_path.is_empty() {
            changes.insert(Property::BackgroundPath);
        }

        Self {
            frame_requested: !changes.is_empty(),
            config,
            changes,
            pointer_events: EventQueue::new(),
            animation_commands: EventQueue::new(),
            input: InputState::new(),
            size: SurfaceSize::default(),
            renderer: RendererLink::unbound(),
            notifier,
        }
    }

    /// A blank stand-in that fills the slot while the real item is handed to
    /// the render thread. Reserves no queue space.
    #[must_use]
    pub fn placeholder(notifier: EventSender<Notification>) -> Self {
        Self {
            config: ItemConfig::default(),
            changes: ChangeSet::empty(),
            pointer_events: EventQueue::empty(),
            animation_commands: EventQueue::empty(),
            input: InputState::new(),
            size: SurfaceSize::default(),
            frame_requested: false,
            renderer: RendererLink::unbound(),
            notifier,
        }
    }

    /// A sender on the same bus, for the renderer.
    #[must_use]
    pub fn notifier(&self) -> EventSender<Notification> {
        self.notifier.clone()
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    /// Applies a property change.
    ///
    /// Returns `false` if the value was unchanged (or rejected, like a NaN
    /// lip sync level). Otherwise flags the property, schedules a frame and
    /// publishes [`Notification::PropertyChanged`] with the stored value.
    pub fn set_property(&mut self, change: PropertyChange) -> bool {
        let property = change.property();
        if !self.config.apply(change) {
            return false;
        }
        self.changes.insert(property);
        self.request_frame();
        self.notifier
            .send(Notification::PropertyChanged(self.config.get(property)));
        true
    }

    /// Sets the model directory.
    pub fn set_model_path(&mut self, path: impl Into<String>) -> bool {
        self.set_property(PropertyChange::ModelPath(path.into()))
    }

    /// Sets the background image path; empty for none.
    pub fn set_background_path(&mut self, path: impl Into<String>) -> bool {
        self.set_property(PropertyChange::BackgroundPath(path.into()))
    }

    /// Sets the clear colour.
    pub fn set_background_color(&mut self, color: Rgba) -> bool {
        self.set_property(PropertyChange::BackgroundColor(color))
    }

    /// Sets the group random motions come from.
    pub fn set_random_motion_group(&mut self, group: impl Into<String>) -> bool {
        self.set_property(PropertyChange::RandomMotionGroup(group.into()))
    }

    /// Turns random motions on or off.
    pub fn set_play_random_motions(&mut self, enabled: bool) -> bool {
        self.set_property(PropertyChange::PlayRandomMotions(enabled))
    }

    /// Turns blinking on or off.
    pub fn set_blinking_enabled(&mut self, enabled: bool) -> bool {
        self.set_property(PropertyChange::BlinkingEnabled(enabled))
    }

    /// Turns breathing on or off.
    pub fn set_breathing_enabled(&mut self, enabled: bool) -> bool {
        self.set_property(PropertyChange::BreathingEnabled(enabled))
    }

    /// Turns physics on or off.
    pub fn set_physics_enabled(&mut self, enabled: bool) -> bool {
        self.set_property(PropertyChange::PhysicsEnabled(enabled))
    }

    /// Turns lip sync on or off.
    pub fn set_lip_sync_enabled(&mut self, enabled: bool) -> bool {
        self.set_property(PropertyChange::LipSyncEnabled(enabled))
    }

    /// Sets the lip sync level, clamped into 0.0..=1.0.
    pub fn set_lip_sync_value(&mut self, value: f64) -> bool {
        self.set_property(PropertyChange::LipSyncValue(value))
    }

    /// Turns pointer following on or off.
    pub fn set_follow_mouse(&mut self, enabled: bool) -> bool {
        self.set_property(PropertyChange::FollowMouse(enabled))
    }

    /// Turns touch reactions on or off.
    pub fn set_react_to_touch(&mut self, enabled: bool) -> bool {
        self.set_property(PropertyChange::ReactToTouch(enabled))
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ItemConfig {
        &self.config
    }

    /// Current value of a property.
    #[must_use]
    pub fn property(&self, property: Property) -> PropertyChange {
        self.config.get(property)
    }

    /// Model directory.
    #[must_use]
    pub fn model_path(&self) -> &str {
        &self.config.model_path
    }

    /// Background image path.
    #[must_use]
    pub fn background_path(&self) -> &str {
        &self.config.background_path
    }

    /// Clear colour.
    #[must_use]
    pub fn background_color(&self) -> Rgba {
        self.config.background_color
    }

    /// Lip sync level.
    #[must_use]
    pub fn lip_sync_value(&self) -> f64 {
        self.config.lip_sync_value
    }

    /// Properties changed since the last sync, without clearing them.
    #[must_use]
    pub fn pending_changes(&self) -> ChangeSet {
        self.changes
    }

    // =========================================================================
    // GEOMETRY
    // =========================================================================

    /// Resizes the item. The renderer recreates its surface on the next sync.
    pub fn set_size(&mut self, width: u32, height: u32) {
        let size = SurfaceSize::new(width, height);
        if size != self.size {
            self.size = size;
            self.request_frame();
        }
    }

    /// Item size in pixels.
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Queues a pointer event if the gating policy admits it.
    ///
    /// Returns true if the event was queued.
    pub fn enqueue_pointer_event(&mut self, event: PointerEvent) -> bool {
        let policy = GatingPolicy::from_config(&self.config);
        if !policy.admits(&event, self.input.any_button_down()) {
            trace!(?event, "pointer event gated out");
            return false;
        }
        self.pointer_events.push(event);
        self.request_frame();
        true
    }

    /// The pointer entered the item.
    pub fn hover_enter(&mut self, x: f64, y: f64) -> bool {
        self.hover_move(x, y)
    }

    /// The pointer moved over the item.
    pub fn hover_move(&mut self, x: f64, y: f64) -> bool {
        self.input.moved(x, y);
        self.enqueue_pointer_event(PointerEvent::moved(x, y))
    }

    /// The pointer left the item. Nothing is queued.
    pub fn hover_leave(&mut self) {
        self.input.left();
    }

    /// A button went down over the item.
    pub fn mouse_press(&mut self, button: PointerButton, x: f64, y: f64) -> bool {
        self.input.button_down(button, x, y);
        self.enqueue_pointer_event(PointerEvent::press(button, x, y))
    }

    /// A button went up.
    pub fn mouse_release(&mut self, button: PointerButton, x: f64, y: f64) -> bool {
        self.input.button_up(button, x, y);
        self.enqueue_pointer_event(PointerEvent::release(button, x, y))
    }

    /// Points the model at `(x, y)` in item pixels. Gated like a hover move
    /// unless `force` is set.
    pub fn set_mouse_follow_position(&mut self, x: f64, y: f64, force: bool) -> bool {
        let event = PointerEvent::moved(x, y);
        self.enqueue_pointer_event(if force { event.forced() } else { event })
    }

    /// Points the model back at the item centre. Never gated.
    pub fn reset_mouse_follow_position(&mut self) {
        let x = f64::from(self.size.width) / 2.0;
        let y = f64::from(self.size.height) / 2.0;
        self.enqueue_pointer_event(PointerEvent::moved(x, y).forced());
    }

    /// Pointer state.
    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    // =========================================================================
    // ANIMATION
    // =========================================================================

    /// Queues an animation command.
    pub fn enqueue_animation_command(&mut self, command: AnimationCommand) {
        self.animation_commands.push(command);
        self.request_frame();
    }

    /// Switches expression.
    pub fn set_expression(&mut self, name: impl Into<String>) {
        self.enqueue_animation_command(AnimationCommand::SetExpression { name: name.into() });
    }

    /// Starts a motion.
    pub fn start_motion(
        &mut self,
        group: impl Into<String>,
        name: impl Into<String>,
        priority: Priority,
    ) {
        self.enqueue_animation_command(AnimationCommand::StartMotion {
            group: group.into(),
            name: name.into(),
            priority,
        });
    }

    /// Stops every running motion.
    pub fn stop_all_motions(&mut self) {
        self.enqueue_animation_command(AnimationCommand::StopAll);
    }

    /// Pending pointer events.
    #[must_use]
    pub fn pending_pointer_events(&self) -> usize {
        self.pointer_events.len()
    }

    /// Pending animation commands.
    #[must_use]
    pub fn pending_animation_commands(&self) -> usize {
        self.animation_commands.len()
    }

    /// Pointer queue counters.
    #[must_use]
    pub fn pointer_queue_stats(&self) -> QueueStats {
        self.pointer_events.stats()
    }

    /// Animation queue counters.
    #[must_use]
    pub fn animation_queue_stats(&self) -> QueueStats {
        self.animation_commands.stats()
    }

    // =========================================================================
    // FRAME SCHEDULING
    // =========================================================================

    /// Asks the host for a frame.
    pub fn request_frame(&mut self) {
        self.frame_requested = true;
    }

    /// Returns true if a frame is pending.
    #[must_use]
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Returns and clears the pending-frame flag.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Hit region names of the loaded model.
    #[must_use]
    pub fn hit_areas(&self) -> Vec<String> {
        self.renderer.hit_area_names()
    }

    /// Expression names of the loaded model.
    #[must_use]
    pub fn expressions(&self) -> Vec<String> {
        self.renderer.expression_names()
    }

    /// Motion group names of the loaded model.
    #[must_use]
    pub fn motion_groups(&self) -> Vec<String> {
        self.renderer.motion_group_names()
    }

    /// Motion names in `group`.
    #[must_use]
    pub fn motions(&self, group: &str) -> Vec<String> {
        self.renderer.motion_names(group)
    }

    /// Returns true while a renderer is bound and alive.
    #[must_use]
    pub fn has_renderer(&self) -> bool {
        self.renderer.is_alive()
    }
}

impl SyncSource for FrontendItem {
    fn bind_renderer(&mut self, link: RendererLink) {
        self.renderer = link;
    }

    fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    fn config(&self) -> &ItemConfig {
        &self.config
    }

    fn take_changes(&mut self) -> ChangeSet {
        std::mem::take(&mut self.changes)
    }

    fn take_pointer_events(&mut self) -> Vec<PointerEvent> {
        self.pointer_events.take_all()
    }

    fn take_animation_commands(&mut self) -> Vec<AnimationCommand> {
        self.animation_commands.take_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marionette_shared::PointerKind;

    #[test]
    fn test_last_value_wins() {
        let (mut item, _rx) = FrontendItem::create();
        item.set_lip_sync_value(0.2);
        item.set_lip_sync_value(0.7);
        item.set_lip_sync_value(0.4);

        let changes = item.take_changes();
        assert_eq!(changes.len(), 1);
        assert!(changes.contains(Property::LipSyncValue));
        assert!((SyncSource::config(&item).lip_sync_value - 0.4).abs() < f64::EPSILON);
        assert!(item.take_changes().is_empty());
    }

    #[test]
    fn test_placeholder_is_blank_and_unallocated() {
        let (item, rx) = FrontendItem::create();
        let mut blank = FrontendItem::placeholder(item.notifier());

        assert_eq!(blank.pointer_events.capacity(), 0);
        assert_eq!(blank.animation_commands.capacity(), 0);
        assert!(!blank.frame_requested());
        assert!(blank.pending_changes().is_empty());
        assert!(!blank.has_renderer());

        // Still publishes on the real item's bus
        assert!(blank.set_blinking_enabled(false));
        assert_eq!(
            rx.drain(),
            vec![Notification::PropertyChanged(PropertyChange::BlinkingEnabled(false))]
        );
    }

    #[test]
    fn test_unchanged_value_is_silent() {
        let (mut item, rx) = FrontendItem::create();
        assert!(!item.set_blinking_enabled(true));
        assert!(!item.frame_requested());
        assert!(item.pending_changes().is_empty());
        assert!(rx.drain().is_empty());

        assert!(item.set_blinking_enabled(false));
        assert!(item.frame_requested());
        assert_eq!(
            rx.drain(),
            vec![Notification::PropertyChanged(PropertyChange::BlinkingEnabled(false))]
        );
    }

    #[test]
    fn test_clamped_value_published() {
        let (mut item, rx) = FrontendItem::create();
        assert!(item.set_lip_sync_value(3.0));
        assert!(!item.set_lip_sync_value(f64::NAN));
        assert!(!item.set_lip_sync_value(1.0));

        assert_eq!(item.lip_sync_value(), 1.0);
        assert_eq!(
            rx.drain(),
            vec![Notification::PropertyChanged(PropertyChange::LipSyncValue(1.0))]
        );
    }

    #[test]
    fn test_gated_move_dropped() {
        let (mut item, _rx) = FrontendItem::create();
        item.set_follow_mouse(false);
        item.set_react_to_touch(false);
        item.take_frame_request();

        assert!(!item.hover_move(10.0, 10.0));
        assert_eq!(item.pending_pointer_events(), 0);
        assert!(!item.frame_requested());

        assert!(item.set_mouse_follow_position(10.0, 10.0, true));
        assert_eq!(item.pending_pointer_events(), 1);
        assert!(item.frame_requested());
    }

    #[test]
    fn test_drag_without_follow() {
        let (mut item, _rx) = FrontendItem::create();
        item.set_follow_mouse(false);

        assert!(!item.hover_move(1.0, 1.0));
        assert!(item.mouse_press(PointerButton::Primary, 1.0, 1.0));
        assert!(item.hover_move(2.0, 2.0));
        assert!(item.mouse_release(PointerButton::Primary, 2.0, 2.0));
        assert!(!item.hover_move(3.0, 3.0));

        let kinds: Vec<_> = item.take_pointer_events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![PointerKind::Press, PointerKind::Move, PointerKind::Release]
        );
    }

    #[test]
    fn test_secondary_button_not_queued() {
        let (mut item, _rx) = FrontendItem::create();
        assert!(!item.mouse_press(PointerButton::Secondary, 0.0, 0.0));
        assert!(item.input().is_down(PointerButton::Secondary));
        assert_eq!(item.pending_pointer_events(), 0);
    }

    #[test]
    fn test_reset_follow_targets_centre() {
        let (mut item, _rx) = FrontendItem::create();
        item.set_size(300, 200);
        item.set_follow_mouse(false);
        item.set_react_to_touch(false);

        item.reset_mouse_follow_position();
        let events = item.take_pointer_events();
        assert_eq!(events.len(), 1);
        assert_eq!((events[0].x, events[0].y), (150.0, 100.0));
        assert!(events[0].force);
    }

    #[test]
    fn test_animation_queue_fifo() {
        let (mut item, _rx) = FrontendItem::create();
        item.stop_all_motions();
        item.set_expression("F01");
        item.start_motion("Idle", "Idle_0", Priority::Normal);

        assert_eq!(item.pending_animation_commands(), 3);
        let commands = item.take_animation_commands();
        assert_eq!(commands[0], AnimationCommand::StopAll);
        assert_eq!(
            commands[1],
            AnimationCommand::SetExpression {
                name: "F01".to_string()
            }
        );
        assert_eq!(item.animation_queue_stats().drained, 3);
    }

    #[test]
    fn test_queries_empty_without_renderer() {
        let (item, _rx) = FrontendItem::create();
        assert!(!item.has_renderer());
        assert!(item.hit_areas().is_empty());
        assert!(item.expressions().is_empty());
        assert!(item.motion_groups().is_empty());
        assert!(item.motions("Idle").is_empty());
    }

    #[test]
    fn test_initial_config_flags_scene() {
        let config = ItemConfig {
            model_path: "/models/Hiyori".to_string(),
            ..ItemConfig::default()
        };
        let mut item = FrontendItem::with_config(config, EventSender::detached());

        assert!(item.frame_requested());
        assert!(item.take_changes().invalidates_scene());
    }

    #[test]
    fn test_hover_leave_keeps_queue() {
        let (mut item, _rx) = FrontendItem::create();
        item.hover_enter(4.0, 4.0);
        assert!(item.input().is_hovered());
        item.hover_leave();
        assert!(!item.input().is_hovered());
        assert_eq!(item.pending_pointer_events(), 1);
        assert_eq!(item.pointer_queue_stats().received, 1);
    }
}
