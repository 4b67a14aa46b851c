//! `dim_unfocused` (§4.5, §6 `[layout]`): applies a brightness offset to
//! every tiled, non-focused window on the active workspace, and resets it
//! on teardown or when the config turns dimming off.

use crate::actor::app::WindowId;
use crate::common::collections::HashMap;

#[derive(Debug, Default)]
pub struct Dimmer {
    enabled: bool,
    amount: f64,
    applied: HashMap<WindowId, f64>,
}

impl Dimmer {
    pub fn new(enabled: bool, amount: f64) -> Self { Self { enabled, amount, applied: HashMap::default() } }

    pub fn set_config(&mut self, enabled: bool, amount: f64) {
        self.enabled = enabled;
        self.amount = amount;
    }

    /// Given the tiled windows on the active workspace and which one (if
    /// any) is focused, returns the `(window, offset)` pairs that changed
    /// since the last call — new dims to apply and previously-dimmed
    /// windows that must now be reset to `0.0`.
    pub fn diff(&mut self, tiled: &[WindowId], focused: Option<WindowId>) -> Vec<(WindowId, f64)> {
        let mut target: HashMap<WindowId, f64> = HashMap::default();
        if self.enabled {
            for &w in tiled {
                if Some(w) != focused {
                    target.insert(w, self.amount);
                }
            }
        }

        let mut changes = Vec::new();
        for (&w, &offset) in &target {
            if self.applied.get(&w).copied() != Some(offset) {
                changes.push((w, offset));
            }
        }
        for (&w, _) in self.applied.iter() {
            if !target.contains_key(&w) {
                changes.push((w, 0.0));
            }
        }

        self.applied = target;
        changes
    }

    /// Resets every currently-dimmed window to `0.0` (config reload with
    /// `dim_unfocused = false`, or shutdown).
    pub fn reset_all(&mut self) -> Vec<(WindowId, f64)> {
        let changes: Vec<_> = self.applied.keys().map(|&w| (w, 0.0)).collect();
        self.applied.clear();
        changes
    }
}
