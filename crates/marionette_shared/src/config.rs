//! Configuration snapshot owned by the item.
//!
//! The GUI thread mutates an [`ItemConfig`] through idempotent setters and
//! records every effective change in a [`ChangeSet`]. At the sync point the
//! render thread copies the snapshot and consumes the change set exactly once.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_RANDOM_MOTION_GROUP;

/// Linear RGBA colour with components in 0.0..=1.0.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black, the default background.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a colour from float components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a colour from 8-bit components.
    #[must_use]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }
}

/// Every configurable property of the item.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    /// Directory holding the model assets.
    ModelPath = 0,
    /// Optional background image.
    BackgroundPath = 1,
    /// Clear colour of the surface.
    BackgroundColor = 2,
    /// Group random motions are drawn from.
    RandomMotionGroup = 3,
    /// Whether idle random motions play.
    PlayRandomMotions = 4,
    /// Eye blinking.
    BlinkingEnabled = 5,
    /// Breathing.
    BreathingEnabled = 6,
    /// Physics simulation.
    PhysicsEnabled = 7,
    /// Lip sync.
    LipSyncEnabled = 8,
    /// Lip sync level.
    LipSyncValue = 9,
    /// Whether the model follows the pointer.
    FollowMouse = 10,
    /// Whether the model reacts to touches.
    ReactToTouch = 11,
}

impl Property {
    /// All properties in declaration order.
    pub const ALL: [Self; 12] = [
        Self::ModelPath,
        Self::BackgroundPath,
        Self::BackgroundColor,
        Self::RandomMotionGroup,
        Self::PlayRandomMotions,
        Self::BlinkingEnabled,
        Self::BreathingEnabled,
        Self::PhysicsEnabled,
        Self::LipSyncEnabled,
        Self::LipSyncValue,
        Self::FollowMouse,
        Self::ReactToTouch,
    ];

    /// Bit of this property inside a [`ChangeSet`].
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Name exposed to the scene graph.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ModelPath => "modelPath",
            Self::BackgroundPath => "backgroundPath",
            Self::BackgroundColor => "backgroundColor",
            Self::RandomMotionGroup => "randomMotionGroup",
            Self::PlayRandomMotions => "playRandomMotions",
            Self::BlinkingEnabled => "blinkingEnabled",
            Self::BreathingEnabled => "breathingEnabled",
            Self::PhysicsEnabled => "physicsEnabled",
            Self::LipSyncEnabled => "lipSyncEnabled",
            Self::LipSyncValue => "lipSyncValue",
            Self::FollowMouse => "followMouse",
            Self::ReactToTouch => "reactToTouch",
        }
    }

    /// Returns true if a change forces the render thread to rebuild the scene.
    #[must_use]
    pub const fn invalidates_scene(self) -> bool {
        matches!(self, Self::ModelPath | Self::BackgroundPath)
    }
}

/// A property together with its new value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropertyChange {
    /// New model directory.
    ModelPath(String),
    /// New background image path (empty for none).
    BackgroundPath(String),
    /// New clear colour.
    BackgroundColor(Rgba),
    /// New random motion group.
    RandomMotionGroup(String),
    /// Random motions on/off.
    PlayRandomMotions(bool),
    /// Blinking on/off.
    BlinkingEnabled(bool),
    /// Breathing on/off.
    BreathingEnabled(bool),
    /// Physics on/off.
    PhysicsEnabled(bool),
    /// Lip sync on/off.
    LipSyncEnabled(bool),
    /// Lip sync level, 0.0..=1.0.
    LipSyncValue(f64),
    /// Pointer following on/off.
    FollowMouse(bool),
    /// Touch reactions on/off.
    ReactToTouch(bool),
}

impl PropertyChange {
    /// The property this change targets.
    #[must_use]
    pub const fn property(&self) -> Property {
        match self {
            Self::ModelPath(_) => Property::ModelPath,
            Self::BackgroundPath(_) => Property::BackgroundPath,
            Self::BackgroundColor(_) => Property::BackgroundColor,
            Self::RandomMotionGroup(_) => Property::RandomMotionGroup,
            Self::PlayRandomMotions(_) => Property::PlayRandomMotions,
            Self::BlinkingEnabled(_) => Property::BlinkingEnabled,
            Self::BreathingEnabled(_) => Property::BreathingEnabled,
            Self::PhysicsEnabled(_) => Property::PhysicsEnabled,
            Self::LipSyncEnabled(_) => Property::LipSyncEnabled,
            Self::LipSyncValue(_) => Property::LipSyncValue,
            Self::FollowMouse(_) => Property::FollowMouse,
            Self::ReactToTouch(_) => Property::ReactToTouch,
        }
    }
}

/// Set of properties changed since the last sync.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChangeSet {
    bits: u16,
}

impl ChangeSet {
    /// An empty change set.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Marks a property as changed.
    #[inline]
    pub fn insert(&mut self, property: Property) {
        self.bits |= property.bit();
    }

    /// Returns true if the property is marked.
    #[inline]
    #[must_use]
    pub const fn contains(&self, property: Property) -> bool {
        self.bits & property.bit() != 0
    }

    /// Returns true if nothing changed.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of changed properties.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns true if the model or the background changed.
    #[must_use]
    pub const fn invalidates_scene(&self) -> bool {
        self.contains(Property::ModelPath) || self.contains(Property::BackgroundPath)
    }

    /// Iterates over the changed properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Property> + '_ {
        Property::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

/// Everything the item exposes as configuration.
///
/// Defaults match a freshly constructed item: no model, transparent
/// background, idle group `"Idle"`, blink/breath/physics on, lip sync off,
/// pointer following and touch reactions on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    /// Directory holding the model assets.
    pub model_path: String,
    /// Background image (empty for none).
    pub background_path: String,
    /// Clear colour of the surface.
    pub background_color: Rgba,
    /// Group random motions are drawn from.
    pub random_motion_group: String,
    /// Whether idle random motions play.
    pub play_random_motions: bool,
    /// Eye blinking.
    pub blinking_enabled: bool,
    /// Breathing.
    pub breathing_enabled: bool,
    /// Physics simulation.
    pub physics_enabled: bool,
    /// Lip sync.
    pub lip_sync_enabled: bool,
    /// Lip sync level, 0.0..=1.0.
    pub lip_sync_value: f64,
    /// Whether the model follows the pointer.
    pub follow_mouse: bool,
    /// Whether the model reacts to touches.
    pub react_to_touch: bool,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            background_path: String::new(),
            background_color: Rgba::TRANSPARENT,
            random_motion_group: DEFAULT_RANDOM_MOTION_GROUP.to_owned(),
            play_random_motions: false,
            blinking_enabled: true,
            breathing_enabled: true,
            physics_enabled: true,
            lip_sync_enabled: false,
            lip_sync_value: 0.0,
            follow_mouse: true,
            react_to_touch: true,
        }
    }
}

impl ItemConfig {
    /// Applies a change.
    ///
    /// Returns `false` without touching anything if the value equals the
    /// current one. Lip sync levels are clamped into 0.0..=1.0 and NaN is
    /// rejected.
    pub fn apply(&mut self, change: PropertyChange) -> bool {
        fn store<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        }

        match change {
            PropertyChange::ModelPath(v) => store(&mut self.model_path, v),
            PropertyChange::BackgroundPath(v) => store(&mut self.background_path, v),
            PropertyChange::BackgroundColor(v) => store(&mut self.background_color, v),
            PropertyChange::RandomMotionGroup(v) => store(&mut self.random_motion_group, v),
            PropertyChange::PlayRandomMotions(v) => store(&mut self.play_random_motions, v),
            PropertyChange::BlinkingEnabled(v) => store(&mut self.blinking_enabled, v),
            PropertyChange::BreathingEnabled(v) => store(&mut self.breathing_enabled, v),
            PropertyChange::PhysicsEnabled(v) => store(&mut self.physics_enabled, v),
            PropertyChange::LipSyncEnabled(v) => store(&mut self.lip_sync_enabled, v),
            PropertyChange::LipSyncValue(v) => {
                if v.is_nan() {
                    return false;
                }
                store(&mut self.lip_sync_value, v.clamp(0.0, 1.0))
            }
            PropertyChange::FollowMouse(v) => store(&mut self.follow_mouse, v),
            PropertyChange::ReactToTouch(v) => store(&mut self.react_to_touch, v),
        }
    }

    /// Current value of a property.
    #[must_use]
    pub fn get(&self, property: Property) -> PropertyChange {
        match property {
            Property::ModelPath => PropertyChange::ModelPath(self.model_path.clone()),
            Property::BackgroundPath => PropertyChange::BackgroundPath(self.background_path.clone()),
            Property::BackgroundColor => PropertyChange::BackgroundColor(self.background_color),
            Property::RandomMotionGroup => {
                PropertyChange::RandomMotionGroup(self.random_motion_group.clone())
            }
            Property::PlayRandomMotions => PropertyChange::PlayRandomMotions(self.play_random_motions),
            Property::BlinkingEnabled => PropertyChange::BlinkingEnabled(self.blinking_enabled),
            Property::BreathingEnabled => PropertyChange::BreathingEnabled(self.breathing_enabled),
            Property::PhysicsEnabled => PropertyChange::PhysicsEnabled(self.physics_enabled),
            Property::LipSyncEnabled => PropertyChange::LipSyncEnabled(self.lip_sync_enabled),
            Property::LipSyncValue => PropertyChange::LipSyncValue(self.lip_sync_value),
            Property::FollowMouse => PropertyChange::FollowMouse(self.follow_mouse),
            Property::ReactToTouch => PropertyChange::ReactToTouch(self.react_to_touch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_is_idempotent() {
        let mut config = ItemConfig::default();

        assert!(config.apply(PropertyChange::FollowMouse(false)));
        assert!(!config.apply(PropertyChange::FollowMouse(false)));
        assert!(!config.apply(PropertyChange::RandomMotionGroup("Idle".into())));
        assert!(!config.follow_mouse);
    }

    #[test]
    fn test_lip_sync_value_clamped() {
        let mut config = ItemConfig::default();

        assert!(config.apply(PropertyChange::LipSyncValue(3.5)));
        assert_eq!(config.lip_sync_value, 1.0);
        // Clamps onto the stored value, so nothing changes.
        assert!(!config.apply(PropertyChange::LipSyncValue(2.0)));
        assert!(!config.apply(PropertyChange::LipSyncValue(f64::NAN)));
        assert!(config.apply(PropertyChange::LipSyncValue(-1.0)));
        assert_eq!(config.lip_sync_value, 0.0);
    }

    #[test]
    fn test_get_reflects_apply() {
        let mut config = ItemConfig::default();
        config.apply(PropertyChange::BackgroundColor(Rgba::WHITE));

        assert_eq!(
            config.get(Property::BackgroundColor),
            PropertyChange::BackgroundColor(Rgba::WHITE)
        );
        for property in Property::ALL {
            assert_eq!(config.get(property).property(), property);
        }
    }

    #[test]
    fn test_change_set() {
        let mut set = ChangeSet::empty();
        assert!(set.is_empty());

        set.insert(Property::LipSyncValue);
        set.insert(Property::LipSyncValue);
        assert_eq!(set.len(), 1);
        assert!(!set.invalidates_scene());

        set.insert(Property::BackgroundPath);
        assert!(set.invalidates_scene());
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Property::BackgroundPath, Property::LipSyncValue]
        );
    }

    #[test]
    fn test_config_from_toml() {
        let config: ItemConfig = toml::from_str(
            r#"
            model_path = "assets/Hiyori"
            follow_mouse = false
            background_color = { r = 1.0, g = 0.5, b = 0.0, a = 1.0 }
            "#,
        )
        .unwrap();

        assert_eq!(config.model_path, "assets/Hiyori");
        assert!(!config.follow_mouse);
        assert!(config.react_to_touch);
        assert_eq!(config.random_motion_group, "Idle");
        assert_eq!(config.background_color, Rgba::new(1.0, 0.5, 0.0, 1.0));
    }

    #[test]
    fn test_rgba8() {
        let c = Rgba::from_rgba8(255, 0, 0, 255);
        assert_eq!(c, Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(bytemuck::bytes_of(&c).len(), 16);
    }
}
