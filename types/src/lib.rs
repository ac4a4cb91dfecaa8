//! Shared configuration types for cadence
//!
//! This crate contains the serializable configuration shared between the
//! simulation core (cadence-core) and the command line front end (cadence-cli).
//! Everything here is plain data; loading and persistence live in the core.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Game Loop Settings
// ─────────────────────────────────────────────────────────────────────────────

fn default_updates_per_second() -> u32 {
    200
}

fn default_frames_per_second() -> u32 {
    144
}

fn default_max_frame_delta_ms() -> u64 {
    250
}

fn default_throughput_window_ms() -> u64 {
    1000
}

fn default_idle_sleep_us() -> u64 {
    500
}

/// Fixed-timestep loop targets.
///
/// Update and render rates are independent: the loop owes one logical update
/// every `1 / updates_per_second` seconds and one redraw request every
/// `1 / frames_per_second` seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopSettings {
    /// Logical ticks per second
    #[serde(default = "default_updates_per_second")]
    pub updates_per_second: u32,

    /// Redraw requests per second
    #[serde(default = "default_frames_per_second")]
    pub frames_per_second: u32,

    /// Upper bound on wall time folded into the accumulators per measurement.
    /// Anything beyond this after a stall is dropped instead of replayed.
    #[serde(default = "default_max_frame_delta_ms")]
    pub max_frame_delta_ms: u64,

    /// Length of the UPS/FPS measurement window
    #[serde(default = "default_throughput_window_ms")]
    pub throughput_window_ms: u64,

    /// Sleep between loop iterations that performed no work (0 = spin)
    #[serde(default = "default_idle_sleep_us")]
    pub idle_sleep_us: u64,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            updates_per_second: default_updates_per_second(),
            frames_per_second: default_frames_per_second(),
            max_frame_delta_ms: default_max_frame_delta_ms(),
            throughput_window_ms: default_throughput_window_ms(),
            idle_sleep_us: default_idle_sleep_us(),
        }
    }
}

impl LoopSettings {
    /// Settings with the given rates and every other field at its default.
    pub fn with_rates(updates_per_second: u32, frames_per_second: u32) -> Self {
        Self {
            updates_per_second,
            frames_per_second,
            ..Self::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Debug Settings
// ─────────────────────────────────────────────────────────────────────────────

fn default_rng_seed() -> u64 {
    0x5eed
}

/// Developer switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugSettings {
    /// Start the Roric fight part way through its script
    #[serde(default)]
    pub roric_debug_mode: bool,

    /// How far into the script the fight starts when debug mode is on
    #[serde(default)]
    pub roric_fight_start_offset_ms: u64,

    /// Seed for cosmetic jitter (particle spread)
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            roric_debug_mode: false,
            roric_fight_start_offset_ms: 0,
            rng_seed: default_rng_seed(),
        }
    }
}

impl DebugSettings {
    /// Offset applied to the fight start, zero unless debug mode is enabled.
    pub fn fight_start_offset_ms(&self) -> u64 {
        if self.roric_debug_mode {
            self.roric_fight_start_offset_ms
        } else {
            0
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level persisted configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub game_loop: LoopSettings,

    #[serde(default)]
    pub debug: DebugSettings,

    /// Directory containing encounter definition files (`roric.toml`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encounter_dir: Option<String>,
}
