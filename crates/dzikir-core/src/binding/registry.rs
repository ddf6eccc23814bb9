//! BindingRegistry: the three configured triggers and their enable flags.
//!
//! | Slot          | Code                      | Action                 | Editable |
//! |---------------|---------------------------|------------------------|----------|
//! | `XButton`     | XButton2 / XButton1       | Increment / Decrement  | no       |
//! | `LeftButton`  | primary mouse button      | Increment              | no       |
//! | `Custom`      | any key or button         | Increment              | yes      |
//!
//! Bindings may overlap.  When a press matches several enabled bindings,
//! every one of them fires its own action; there is no "last writer wins".
//!
//! While a recording session is in progress the registry is *suspended*:
//! [`BindingRegistry::resolve`] yields nothing and
//! [`BindingRegistry::required_devices`] is empty, but the enable flags
//! themselves are left alone so a save taken mid-session still persists the
//! user's real configuration.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use super::code::{BindingCode, MouseButton};
use crate::input::DeviceClass;

/// Names one of the three bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingSlot {
    /// Fixed extended-button pair: XButton2 increments, XButton1 decrements.
    XButton,
    /// Fixed primary mouse button, increments.
    LeftButton,
    /// User-recorded key or button, increments.
    Custom,
}

impl BindingSlot {
    pub const ALL: [BindingSlot; 3] = [
        BindingSlot::XButton,
        BindingSlot::LeftButton,
        BindingSlot::Custom,
    ];
}

impl fmt::Display for BindingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingSlot::XButton => f.write_str("xbutton"),
            BindingSlot::LeftButton => f.write_str("left"),
            BindingSlot::Custom => f.write_str("custom"),
        }
    }
}

/// An intent produced by a matching binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Increment,
    Decrement,
}

/// One matching binding and the action it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub slot: BindingSlot,
    pub action: Action,
}

/// A configured trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// The trigger code.  For [`BindingSlot::XButton`] this is the increment
    /// button; its decrement partner is always `XButton1`.
    pub code: BindingCode,
    pub enabled: bool,
    pub display_name: String,
}

impl Binding {
    fn new(code: BindingCode, display_name: impl Into<String>) -> Self {
        Self {
            code,
            enabled: false,
            display_name: display_name.into(),
        }
    }
}

/// Snapshot of the three enable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindingFlags {
    pub x_button: bool,
    pub left_button: bool,
    pub custom: bool,
}

impl BindingFlags {
    /// Returns the flag for `slot`.
    pub fn get(&self, slot: BindingSlot) -> bool {
        match slot {
            BindingSlot::XButton => self.x_button,
            BindingSlot::LeftButton => self.left_button,
            BindingSlot::Custom => self.custom,
        }
    }
}

/// Errors returned by registry mutations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BindingError {
    /// The slot's trigger is fixed and cannot be rebound.
    #[error("the {0} binding is fixed and cannot be rebound")]
    FixedSlot(BindingSlot),
}

/// Holds the three named bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRegistry {
    x_button: Binding,
    left_button: Binding,
    custom: Binding,
    suspended: bool,
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingRegistry {
    /// Creates a registry with every binding disabled and no custom trigger.
    pub fn new() -> Self {
        Self {
            x_button: Binding::new(
                BindingCode::Mouse(MouseButton::XButton2),
                "XButton 2 / XButton 1",
            ),
            left_button: Binding::new(BindingCode::Mouse(MouseButton::Left), "Left Click"),
            custom: Binding::new(BindingCode::None, "None"),
            suspended: false,
        }
    }

    /// Returns the binding in `slot`.
    pub fn get(&self, slot: BindingSlot) -> &Binding {
        match slot {
            BindingSlot::XButton => &self.x_button,
            BindingSlot::LeftButton => &self.left_button,
            BindingSlot::Custom => &self.custom,
        }
    }

    fn get_mut(&mut self, slot: BindingSlot) -> &mut Binding {
        match slot {
            BindingSlot::XButton => &mut self.x_button,
            BindingSlot::LeftButton => &mut self.left_button,
            BindingSlot::Custom => &mut self.custom,
        }
    }

    /// Returns the configured enable flags (independent of suspension).
    pub fn flags(&self) -> BindingFlags {
        BindingFlags {
            x_button: self.x_button.enabled,
            left_button: self.left_button.enabled,
            custom: self.custom.enabled,
        }
    }

    /// Replaces the code and display name of `slot`.
    ///
    /// Returns `Ok(true)` when anything changed.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::FixedSlot`] for the X-button pair and the
    /// primary button, whose triggers are not user-editable.
    pub fn set_binding(
        &mut self,
        slot: BindingSlot,
        code: BindingCode,
        display_name: impl Into<String>,
    ) -> Result<bool, BindingError> {
        if slot != BindingSlot::Custom {
            return Err(BindingError::FixedSlot(slot));
        }
        let display_name = display_name.into();
        let binding = self.get_mut(slot);
        if binding.code == code && binding.display_name == display_name {
            return Ok(false);
        }
        binding.code = code;
        binding.display_name = display_name;
        Ok(true)
    }

    /// Enables or disables `slot`.  Returns `true` when the flag changed.
    pub fn set_enabled(&mut self, slot: BindingSlot, enabled: bool) -> bool {
        let binding = self.get_mut(slot);
        let changed = binding.enabled != enabled;
        binding.enabled = enabled;
        changed
    }

    /// Overwrites all three enable flags at once.  Returns `true` when any changed.
    pub fn apply_flags(&mut self, flags: BindingFlags) -> bool {
        let mut changed = false;
        for slot in BindingSlot::ALL {
            changed |= self.set_enabled(slot, flags.get(slot));
        }
        changed
    }

    /// Gates every binding off and returns the flags in force beforehand.
    pub fn suspend(&mut self) -> BindingFlags {
        self.suspended = true;
        self.flags()
    }

    /// Lifts the suspension and restores `flags` exactly.
    pub fn resume(&mut self, flags: BindingFlags) {
        self.suspended = false;
        self.apply_flags(flags);
    }

    /// Returns `true` while a recording session has the registry suspended.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Resolves a decoded press into the actions of every enabled matching binding.
    ///
    /// `device` is the class of the hook that observed the press; a code that
    /// does not belong to that class never matches.
    pub fn resolve(&self, code: BindingCode, device: DeviceClass) -> Vec<Trigger> {
        let mut triggers = Vec::new();
        if self.suspended || code.device_class() != Some(device) {
            return triggers;
        }

        if self.x_button.enabled {
            match code {
                BindingCode::Mouse(MouseButton::XButton2) => triggers.push(Trigger {
                    slot: BindingSlot::XButton,
                    action: Action::Increment,
                }),
                BindingCode::Mouse(MouseButton::XButton1) => triggers.push(Trigger {
                    slot: BindingSlot::XButton,
                    action: Action::Decrement,
                }),
                _ => {}
            }
        }

        if self.left_button.enabled && code == self.left_button.code {
            triggers.push(Trigger {
                slot: BindingSlot::LeftButton,
                action: Action::Increment,
            });
        }

        if self.custom.enabled && self.custom.code != BindingCode::None && code == self.custom.code
        {
            triggers.push(Trigger {
                slot: BindingSlot::Custom,
                action: Action::Increment,
            });
        }

        triggers
    }

    /// Returns the device classes enabled bindings need hooked.
    ///
    /// Empty while suspended.  A custom binding with no code needs nothing.
    pub fn required_devices(&self) -> BTreeSet<DeviceClass> {
        let mut devices = BTreeSet::new();
        if self.suspended {
            return devices;
        }
        for binding in [&self.x_button, &self.left_button, &self.custom] {
            if binding.enabled {
                if let Some(device) = binding.code.device_class() {
                    devices.insert(device);
                }
            }
        }
        devices
    }
}
