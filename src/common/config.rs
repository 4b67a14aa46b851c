//! INI-style configuration (§4.7, §6). Only a malformed file as a whole
//! (one `Ini::load_from_file` can't parse at all) produces `Error::
//! ConfigParse`; a malformed individual key or value is logged via
//! `tracing::warn!` and the default for that key is kept, so the rest of
//! the file still applies.

use std::path::Path;

use ini::Ini;

use crate::actor::event_tap::{KeyChord, Modifiers};
use crate::common::error::Error;
use crate::core::{Action, MonitorDirection, PositionTarget};
use crate::model::workspace_store::{WorkspaceNumber, is_valid_workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilingMode {
    Hyprland,
    Niri,
}

#[derive(Debug, Clone)]
pub struct LayoutSettings {
    pub inner_gap: f64,
    pub outer_gap: f64,
    pub single_window_padding: f64,
    pub animations: bool,
    pub native_animation: bool,
    pub focus_follows_mouse: bool,
    pub focus_follows_app: bool,
    pub auto_float_dialogs: bool,
    pub force_promotion: bool,
    pub dim_unfocused: f64,
    pub tiling_mode: TilingMode,
    pub niri_column_width: f64,
    pub hyperkey: Option<String>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            inner_gap: 8.0,
            outer_gap: 8.0,
            single_window_padding: 0.0,
            animations: true,
            native_animation: false,
            focus_follows_mouse: false,
            focus_follows_app: true,
            auto_float_dialogs: true,
            force_promotion: false,
            dim_unfocused: 0.0,
            tiling_mode: TilingMode::Hyprland,
            niri_column_width: 0.5,
            hyperkey: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BorderSettings {
    pub enabled: bool,
    pub width: f64,
    pub radius: f64,
    pub active_color: Option<String>,
    pub inactive_color: Option<String>,
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self { enabled: false, width: 2.0, radius: 6.0, active_color: None, inactive_color: None }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Rules {
    pub float: Vec<String>,
    pub exclude: Vec<String>,
    pub sticky: Vec<String>,
    pub swallow: Vec<String>,
    pub swallow_all: bool,
}

impl Rules {
    pub fn matches(list: &[String], name: Option<&str>, bundle_id: Option<&str>) -> bool {
        list.iter().any(|entry| Some(entry.as_str()) == name || Some(entry.as_str()) == bundle_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRule {
    Left,
    Right,
    Workspace(WorkspaceNumber),
}

#[derive(Debug, Clone, Default)]
pub struct AppRules(pub crate::common::collections::HashMap<String, AppRule>);

impl AppRules {
    pub fn get(&self, name: Option<&str>, bundle_id: Option<&str>) -> Option<AppRule> {
        name.and_then(|n| self.0.get(n)).or_else(|| bundle_id.and_then(|b| self.0.get(b))).copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkspaceNames(pub crate::common::collections::HashMap<WorkspaceNumber, String>);

#[derive(Debug, Clone, Default)]
pub struct Bindings {
    pub map: crate::common::collections::HashMap<KeyChord, Action>,
}

impl Bindings {
    /// Workspace switch/move bindings are always active regardless of what
    /// the user configures (§4.7, §6).
    pub fn with_workspace_bindings(mut self, mod_key: Modifiers) -> Self {
        for n in 1..=9u8 {
            let digit_code = 18 + (n as u16 - 1); // placeholder keycodes 1..9
            self.map.insert(
                KeyChord { key_code: digit_code, modifiers: mod_key },
                Action::SwitchWorkspace(n),
            );
            self.map.insert(
                KeyChord { key_code: digit_code, modifiers: mod_key | Modifiers::SHIFT },
                Action::MoveToWorkspace(n),
            );
        }
        self
    }

    /// Merges `user` over `defaults`; on key collision the user's binding
    /// wins, then the always-active workspace bindings are layered on top.
    pub fn resolve(defaults: Bindings, user: Bindings, mod_key: Modifiers) -> Bindings {
        let mut merged = defaults;
        for (chord, action) in user.map {
            merged.map.insert(chord, action);
        }
        merged.with_workspace_bindings(mod_key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutSettings,
    pub border: BorderSettings,
    pub rules: Rules,
    pub app_rules: AppRules,
    pub workspaces: WorkspaceNames,
    pub bindings: Bindings,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, Error> {
        let ini = Ini::load_from_file(path).map_err(|e| Error::ConfigParse { line: 0, reason: e.to_string() })?;
        Ok(Self::from_ini(&ini))
    }

    fn from_ini(ini: &Ini) -> Config {
        let mut config = Config::default();

        if let Some(section) = ini.section(Some("layout")) {
            let layout = &mut config.layout;
            for (key, value) in section.iter() {
                match key {
                    "inner_gap" => parse_f64_into(value, &mut layout.inner_gap),
                    "outer_gap" => parse_f64_into(value, &mut layout.outer_gap),
                    "single_window_padding" => parse_f64_into(value, &mut layout.single_window_padding),
                    "animations" => parse_bool_into(value, &mut layout.animations),
                    "native_animation" => parse_bool_into(value, &mut layout.native_animation),
                    "focus_follows_mouse" => parse_bool_into(value, &mut layout.focus_follows_mouse),
                    "focus_follows_app" => parse_bool_into(value, &mut layout.focus_follows_app),
                    "auto_float_dialogs" => parse_bool_into(value, &mut layout.auto_float_dialogs),
                    "force_promotion" => parse_bool_into(value, &mut layout.force_promotion),
                    "dim_unfocused" => parse_f64_into(value, &mut layout.dim_unfocused),
                    "niri_column_width" => parse_f64_into(value, &mut layout.niri_column_width),
                    "hyperkey" => layout.hyperkey = Some(value.to_string()),
                    "tiling_mode" => {
                        layout.tiling_mode = match value {
                            "niri" => TilingMode::Niri,
                            "hyprland" => TilingMode::Hyprland,
                            other => {
                                tracing::warn!(value = other, "unknown tiling_mode, defaulting to hyprland");
                                TilingMode::Hyprland
                            }
                        }
                    }
                    other => tracing::warn!(key = other, "unknown [layout] key, ignoring"),
                }
            }
        }

        if let Some(section) = ini.section(Some("border")) {
            let border = &mut config.border;
            for (key, value) in section.iter() {
                match key {
                    "enabled" => parse_bool_into(value, &mut border.enabled),
                    "width" => parse_f64_into(value, &mut border.width),
                    "radius" => parse_f64_into(value, &mut border.radius),
                    "active_color" => border.active_color = Some(value.to_string()),
                    "inactive_color" => border.inactive_color = Some(value.to_string()),
                    other => tracing::warn!(key = other, "unknown [border] key, ignoring"),
                }
            }
        }

        if let Some(section) = ini.section(Some("rules")) {
            let rules = &mut config.rules;
            for (key, value) in section.iter() {
                match key {
                    "float" => rules.float = split_list(value),
                    "exclude" => rules.exclude = split_list(value),
                    "sticky" => rules.sticky = split_list(value),
                    "swallow" => rules.swallow = split_list(value),
                    "swallow_all" => parse_bool_into(value, &mut rules.swallow_all),
                    other => tracing::warn!(key = other, "unknown [rules] key, ignoring"),
                }
            }
        }

        if let Some(section) = ini.section(Some("app_rules")) {
            for (app, value) in section.iter() {
                match parse_app_rule(value) {
                    Some(rule) => { config.app_rules.0.insert(app.to_string(), rule); }
                    None => tracing::warn!(app, value, "malformed app_rules entry, skipping"),
                }
            }
        }

        if let Some(section) = ini.section(Some("workspaces")) {
            for (key, name) in section.iter() {
                match key.parse::<WorkspaceNumber>() {
                    Ok(n) if is_valid_workspace(n) => { config.workspaces.0.insert(n, name.to_string()); }
                    _ => tracing::warn!(key, "workspace number out of [1,9], skipping"),
                }
            }
        }

        let mod_key = Modifiers::COMMAND | Modifiers::CONTROL;
        let mut user_bindings = Bindings::default();
        if let Some(section) = ini.section(Some("bindings")) {
            for (key, value) in section.iter() {
                match (parse_key_chord(key, config.layout.hyperkey.as_deref()), parse_action(value)) {
                    (Some(chord), Some(action)) => { user_bindings.map.insert(chord, action); }
                    _ => tracing::warn!(key, value, "malformed binding, skipping"),
                }
            }
        }
        config.bindings = Bindings::resolve(default_bindings(), user_bindings, mod_key);

        config
    }
}

fn parse_f64_into(value: &str, out: &mut f64) {
    match value.parse() {
        Ok(v) => *out = v,
        Err(_) => tracing::warn!(value, "expected a number, keeping default"),
    }
}

fn parse_bool_into(value: &str, out: &mut bool) {
    match value {
        "true" | "1" | "yes" => *out = true,
        "false" | "0" | "no" => *out = false,
        other => tracing::warn!(value = other, "expected a boolean, keeping default"),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

fn parse_app_rule(value: &str) -> Option<AppRule> {
    let value = value.trim();
    match value {
        "left" => Some(AppRule::Left),
        "right" => Some(AppRule::Right),
        _ => {
            let n = value.strip_prefix("workspace ")?.trim().parse().ok()?;
            is_valid_workspace(n).then_some(AppRule::Workspace(n))
        }
    }
}

fn key_code_for_name(name: &str) -> Option<u16> {
    match name {
        "0" => Some(29),
        "1" => Some(18),
        "2" => Some(19),
        "3" => Some(20),
        "4" => Some(21),
        "5" => Some(23),
        "6" => Some(22),
        "7" => Some(26),
        "8" => Some(28),
        "9" => Some(25),
        "return" | "enter" => Some(36),
        "space" => Some(49),
        "tab" => Some(48),
        "escape" => Some(53),
        other if other.len() == 1 && other.chars().next().unwrap().is_ascii_lowercase() => {
            Some(other.as_bytes()[0] as u16)
        }
        _ => None,
    }
}

fn parse_key_chord(spec: &str, hyperkey: Option<&str>) -> Option<KeyChord> {
    let mut modifiers = Modifiers::empty();
    let mut key_name = None;

    for token in spec.split(['+', ',']).map(|t| t.trim()) {
        if token.is_empty() {
            continue;
        }
        match token {
            "cmd" | "command" | "mod" => modifiers |= Modifiers::COMMAND,
            "ctrl" | "control" => modifiers |= Modifiers::CONTROL,
            "alt" | "option" => modifiers |= Modifiers::OPTION,
            "shift" => modifiers |= Modifiers::SHIFT,
            t if Some(t) == hyperkey => modifiers = Modifiers::all(),
            t => key_name = Some(t),
        }
    }

    let key_code = key_code_for_name(key_name?)?;
    Some(KeyChord { key_code, modifiers })
}

fn parse_action(spec: &str) -> Option<Action> {
    let mut parts = spec.split_whitespace();
    let name = parts.next()?;
    let arg = parts.next();

    Some(match name {
        "focus_left" => Action::FocusDirection(crate::layout_engine::Direction::Left),
        "focus_right" => Action::FocusDirection(crate::layout_engine::Direction::Right),
        "focus_up" => Action::FocusDirection(crate::layout_engine::Direction::Up),
        "focus_down" => Action::FocusDirection(crate::layout_engine::Direction::Down),
        "focus_next" => Action::FocusNext,
        "focus_prev" => Action::FocusPrev,
        "swap_master" => Action::SwapMaster,
        "rotate_next" => Action::RotateNext,
        "rotate_prev" => Action::RotatePrev,
        "cycle_layout" => Action::CycleLayout,
        "toggle_float" => Action::ToggleFloat,
        "toggle_fullscreen" => Action::ToggleFullscreen,
        "close" => Action::Close,
        "retile" => Action::Retile,
        "reload_config" => Action::ReloadConfig,
        "focus_monitor" => Action::FocusMonitor(parse_monitor_direction(arg?)?),
        "move_to_monitor" => Action::MoveToMonitor(parse_monitor_direction(arg?)?),
        "position_left" => Action::Position(PositionTarget::Left),
        "position_right" => Action::Position(PositionTarget::Right),
        "position_up" => Action::Position(PositionTarget::Up),
        "position_down" => Action::Position(PositionTarget::Down),
        "position_fill" => Action::Position(PositionTarget::Fill),
        "position_center" => Action::Position(PositionTarget::Center),
        "increase_gap" => Action::IncreaseGap,
        "decrease_gap" => Action::DecreaseGap,
        "grow_focused" => Action::GrowFocused,
        "shrink_focused" => Action::ShrinkFocused,
        "switch_workspace" => Action::SwitchWorkspace(arg?.parse().ok()?),
        "move_to_workspace" => Action::MoveToWorkspace(arg?.parse().ok()?),
        "minimize" => Action::Minimize,
        "set_mark" => Action::SetMark(arg?.to_string()),
        "jump_mark" => Action::JumpMark(arg?.to_string()),
        "niri_consume" => Action::NiriConsume,
        "niri_expel" => Action::NiriExpel,
        _ => return None,
    })
}

fn parse_monitor_direction(arg: &str) -> Option<MonitorDirection> {
    match arg {
        "left" => Some(MonitorDirection::Left),
        "right" => Some(MonitorDirection::Right),
        _ => None,
    }
}

/// The built-in keybinding table (§6), expressed with `mod = cmd+ctrl`.
fn default_bindings() -> Bindings {
    let mut map = crate::common::collections::HashMap::default();
    let mod_key = Modifiers::COMMAND | Modifiers::CONTROL;
    let bind = |map: &mut crate::common::collections::HashMap<KeyChord, Action>, key: &str, action: Action| {
        if let Some(code) = key_code_for_name(key) {
            map.insert(KeyChord { key_code: code, modifiers: mod_key }, action);
        }
    };

    bind(&mut map, "h", Action::FocusDirection(crate::layout_engine::Direction::Left));
    bind(&mut map, "l", Action::FocusDirection(crate::layout_engine::Direction::Right));
    bind(&mut map, "k", Action::FocusDirection(crate::layout_engine::Direction::Up));
    bind(&mut map, "j", Action::FocusDirection(crate::layout_engine::Direction::Down));
    bind(&mut map, "tab", Action::FocusNext);
    bind(&mut map, "return", Action::SwapMaster);
    bind(&mut map, "space", Action::CycleLayout);
    bind(&mut map, "f", Action::ToggleFullscreen);
    bind(&mut map, "q", Action::Close);

    Bindings { map }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_chord_parses_modifiers_and_key() {
        let chord = parse_key_chord("cmd+shift+h", None).unwrap();
        assert_eq!(chord.key_code, b'h' as u16);
        assert!(chord.modifiers.contains(Modifiers::COMMAND));
        assert!(chord.modifiers.contains(Modifiers::SHIFT));
    }

    #[test]
    fn hyperkey_token_sets_every_modifier() {
        let chord = parse_key_chord("hyper+j", Some("hyper")).unwrap();
        assert_eq!(chord.modifiers, Modifiers::all());
    }

    #[test]
    fn action_with_numeric_argument_parses() {
        assert_eq!(parse_action("switch_workspace 3"), Some(Action::SwitchWorkspace(3)));
        assert_eq!(parse_action("set_mark a"), Some(Action::SetMark("a".to_string())));
    }

    #[test]
    fn unknown_action_name_is_none() {
        assert_eq!(parse_action("not_a_real_action"), None);
    }

    #[test]
    fn workspace_bindings_are_always_present_after_resolve() {
        let resolved = Bindings::resolve(Bindings::default(), Bindings::default(), Modifiers::COMMAND);
        assert_eq!(resolved.map.len(), 18);
    }

    #[test]
    fn app_rule_parses_workspace_pin() {
        assert_eq!(parse_app_rule("workspace 3"), Some(AppRule::Workspace(3)));
        assert_eq!(parse_app_rule("workspace 12"), None);
        assert_eq!(parse_app_rule("left"), Some(AppRule::Left));
    }
}
