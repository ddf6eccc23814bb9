//! Named target presets.
//!
//! Each preset picks a target count.  The record stores the preset by its
//! display name, so the names below are part of the persisted format.

/// A selectable target preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    FreeCount,
    CustomGoal,
    SubhanAllah,
    Alhamdulillah,
    AllahuAkbar,
    Istighfar,
    Tahlil,
    Salawat,
}

impl Preset {
    /// Every preset in menu order.
    pub const ALL: [Preset; 8] = [
        Preset::FreeCount,
        Preset::CustomGoal,
        Preset::SubhanAllah,
        Preset::Alhamdulillah,
        Preset::AllahuAkbar,
        Preset::Istighfar,
        Preset::Tahlil,
        Preset::Salawat,
    ];

    /// Target a custom goal starts at when nothing was set before.
    pub const DEFAULT_CUSTOM_TARGET: u32 = 33;

    pub fn name(self) -> &'static str {
        match self {
            Preset::FreeCount => "Free Count (∞)",
            Preset::CustomGoal => "Custom Goal...",
            Preset::SubhanAllah => "SubhanAllah (33)",
            Preset::Alhamdulillah => "Alhamdulillah (33)",
            Preset::AllahuAkbar => "Allahu Akbar (34)",
            Preset::Istighfar => "Istighfar (100)",
            Preset::Tahlil => "Tahlil (1000)",
            Preset::Salawat => "Salawat (100)",
        }
    }

    /// Looks a preset up by its exact display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Preset::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Resolves the target this preset selects given the current target.
    ///
    /// `CustomGoal` keeps a bounded target as-is and starts an unbounded one
    /// at [`Preset::DEFAULT_CUSTOM_TARGET`].
    pub fn target(self, current_target: u32) -> u32 {
        match self {
            Preset::FreeCount => 0,
            Preset::CustomGoal if current_target == 0 => Self::DEFAULT_CUSTOM_TARGET,
            Preset::CustomGoal => current_target,
            Preset::SubhanAllah | Preset::Alhamdulillah => 33,
            Preset::AllahuAkbar => 34,
            Preset::Istighfar | Preset::Salawat => 100,
            Preset::Tahlil => 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_round_trips_by_name() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
        }
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert_eq!(Preset::from_name("Tasbih (99)"), None);
    }

    #[test]
    fn test_fixed_presets_pick_their_targets() {
        assert_eq!(Preset::FreeCount.target(33), 0);
        assert_eq!(Preset::SubhanAllah.target(0), 33);
        assert_eq!(Preset::AllahuAkbar.target(0), 34);
        assert_eq!(Preset::Istighfar.target(0), 100);
        assert_eq!(Preset::Tahlil.target(0), 1000);
    }

    #[test]
    fn test_custom_goal_keeps_bounded_target_and_defaults_unbounded() {
        assert_eq!(Preset::CustomGoal.target(77), 77);
        assert_eq!(Preset::CustomGoal.target(0), 33);
    }
}
