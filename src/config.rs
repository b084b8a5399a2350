/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or
/// incomplete. All physics tuning lives here so the feel of the game
/// can be adjusted without recompiling.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub tuning: TuningConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct TuningConfig {
    pub tick_rate_ms: u64,
    /// Camera scroll per tick, before speed-portal multipliers.
    pub base_speed: f32,
    /// Vertical acceleration per tick.
    pub gravity: f32,
    pub jump_impulse: f32,
    pub pad_impulse: f32,
    /// Airborne rotation per tick (radians).
    pub spin_rate: f32,
    /// Wall-clock delay before an automatic restart after death.
    pub restart_delay_ms: u64,
    /// Wall-clock delay before the completion panel appears.
    pub reveal_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    tuning: TomlTuning,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlTuning {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_base_speed")]
    base_speed: f32,
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_jump_impulse")]
    jump_impulse: f32,
    #[serde(default = "default_pad_impulse")]
    pad_impulse: f32,
    #[serde(default = "default_spin_rate")]
    spin_rate: f32,
    #[serde(default = "default_restart_delay")]
    restart_delay_ms: u64,
    #[serde(default = "default_reveal_delay")]
    reveal_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_pad_cancel")]
    cancel: Vec<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }       // ~60 ticks/sec
fn default_base_speed() -> f32 { 6.0 }
fn default_gravity() -> f32 { 0.7 }
fn default_jump_impulse() -> f32 { 13.0 }
fn default_pad_impulse() -> f32 { 16.0 }
fn default_spin_rate() -> f32 { 0.22 }
fn default_restart_delay() -> u64 { 500 }
fn default_reveal_delay() -> u64 { 250 }

fn default_pad_jump() -> Vec<String> { vec!["A".into(), "B".into(), "X".into(), "Y".into()] }
fn default_pad_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_pad_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlTuning {
    fn default() -> Self {
        TomlTuning {
            tick_rate_ms: default_tick_rate(),
            base_speed: default_base_speed(),
            gravity: default_gravity(),
            jump_impulse: default_jump_impulse(),
            pad_impulse: default_pad_impulse(),
            spin_rate: default_spin_rate(),
            restart_delay_ms: default_restart_delay(),
            reveal_delay_ms: default_reveal_delay(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            confirm: default_pad_confirm(),
            cancel: default_pad_cancel(),
        }
    }
}

impl Default for TuningConfig {
    fn default() -> Self {
        TuningConfig::from(TomlTuning::default())
    }
}

impl From<TomlTuning> for TuningConfig {
    fn from(t: TomlTuning) -> Self {
        TuningConfig {
            tick_rate_ms: t.tick_rate_ms.max(1),
            base_speed: t.base_speed,
            gravity: t.gravity,
            jump_impulse: t.jump_impulse,
            pad_impulse: t.pad_impulse,
            spin_rate: t.spin_rate,
            restart_delay_ms: t.restart_delay_ms,
            reveal_delay_ms: t.reveal_delay_ms,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            tuning: TuningConfig::from(toml_cfg.tuning),
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_values() {
        let t = TuningConfig::default();
        assert_eq!(t.base_speed, 6.0);
        assert_eq!(t.gravity, 0.7);
        assert_eq!(t.jump_impulse, 13.0);
        assert_eq!(t.pad_impulse, 16.0);
        assert_eq!(t.restart_delay_ms, 500);
    }

    #[test]
    fn partial_toml_fills_missing_keys() {
        let cfg: TomlConfig = toml::from_str(
            r#"
            [tuning]
            base_speed = 8.0
            "#,
        )
        .unwrap();
        let t = TuningConfig::from(cfg.tuning);
        assert_eq!(t.base_speed, 8.0);
        assert_eq!(t.gravity, 0.7);
        assert_eq!(t.tick_rate_ms, 16);
    }

    #[test]
    fn zero_tick_rate_is_clamped() {
        let cfg: TomlConfig = toml::from_str("[tuning]\ntick_rate_ms = 0\n").unwrap();
        assert_eq!(TuningConfig::from(cfg.tuning).tick_rate_ms, 1);
    }
}
