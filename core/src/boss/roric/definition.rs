//! Roric fight definition
//!
//! Every timing constant of the fight lives here so it can be tuned from a
//! `roric.toml` in the encounter directory. Missing keys fall back to the
//! shipped values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::RoricPhase;
use crate::boss::{DefinitionError, Phase, PhaseTrigger};

pub const DEFINITION_FILE: &str = "roric.toml";

fn default_modifier() -> f64 {
    1.0
}

/// How and with which parameters one phase is entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseEntry {
    pub phase: RoricPhase,

    /// None only for the opening phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<PhaseTrigger>,

    /// Multiplier on attack cooldowns (lower is faster)
    #[serde(default = "default_modifier")]
    pub cooldown_modifier: f64,

    /// Multiplier on fast projectile speed
    #[serde(default = "default_modifier")]
    pub projectile_speed: f64,
}

impl PhaseEntry {
    fn new(phase: RoricPhase, trigger: Option<PhaseTrigger>, cooldown: f64, speed: f64) -> Self {
        Self {
            phase,
            trigger,
            cooldown_modifier: cooldown,
            projectile_speed: speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShakeSpec {
    pub duration_ticks: u32,
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoricDefinition {
    /// One entry per phase, in fight order
    pub phases: Vec<PhaseEntry>,

    /// Fight-time offsets of the ambient flashes during the bridge
    pub bridge_flashes_ms: Vec<u64>,

    /// Fight-time offsets of the tinted flash + shake during the finale
    pub finale_flashes_ms: Vec<u64>,

    pub skybeam_interval_ms: u64,

    /// Ambient darkness held for the whole bridge
    pub bridge_darkness: u8,

    pub finale_shake: ShakeSpec,

    pub finale_tint: [u8; 4],
}

impl Default for RoricDefinition {
    fn default() -> Self {
        let at = |at_ms| Some(PhaseTrigger::Elapsed { at_ms });
        Self {
            phases: vec![
                PhaseEntry::new(RoricPhase::Intro, None, 1.0, 1.0),
                PhaseEntry::new(RoricPhase::Assault, at(53_000), 1.0, 1.2),
                PhaseEntry::new(RoricPhase::Bridge, at(93_000), 1.0, 1.0),
                PhaseEntry::new(RoricPhase::Storm, at(106_000), 1.0, 1.0),
                PhaseEntry::new(RoricPhase::Finale, at(132_000), 0.7, 1.5),
            ],
            bridge_flashes_ms: vec![
                94_500, 95_300, 96_100, 97_800, 99_400, 101_100, 101_800, 102_600,
            ],
            finale_flashes_ms: vec![
                132_600, 134_200, 135_800, 137_400, 139_100, 140_700, 142_400, 144_100, 145_700,
                147_400, 149_100, 150_800, 152_400, 154_000, 155_600, 157_200, 159_000,
            ],
            skybeam_interval_ms: 1_000,
            bridge_darkness: 240,
            finale_shake: ShakeSpec {
                duration_ticks: 30,
                intensity: 20.0,
            },
            finale_tint: [100, 255, 120, 100],
        }
    }
}

impl RoricDefinition {
    pub fn from_toml_str(raw: &str) -> Result<Self, DefinitionError> {
        let definition: Self = toml::from_str(raw)?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DefinitionError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let definition: Self = toml::from_str(&raw).map_err(|source| DefinitionError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        definition.validate()?;
        Ok(definition)
    }

    /// Load `roric.toml` from `dir` if present, otherwise the shipped definition
    pub fn load_from_dir(dir: Option<&Path>) -> Result<Self, DefinitionError> {
        match dir.map(|d| d.join(DEFINITION_FILE)) {
            Some(path) if path.is_file() => {
                tracing::info!(path = %path.display(), "Loading Roric definition");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        let invalid = |reason: String| Err(DefinitionError::Invalid { reason });

        if self.phases.len() != RoricPhase::ORDER.len() {
            return invalid(format!(
                "expected {} phases, found {}",
                RoricPhase::ORDER.len(),
                self.phases.len()
            ));
        }

        let mut last_elapsed = 0;
        for (i, (entry, expected)) in self.phases.iter().zip(RoricPhase::ORDER).enumerate() {
            if entry.phase != *expected {
                return invalid(format!(
                    "phase #{i} must be {}, found {}",
                    expected.name(),
                    entry.phase.name()
                ));
            }
            match (i, entry.trigger) {
                (0, Some(_)) => {
                    return invalid(format!("opening phase {} cannot have a trigger", expected.name()));
                }
                (0, None) => {}
                (_, None) => {
                    return invalid(format!("phase {} needs a trigger", expected.name()));
                }
                (_, Some(PhaseTrigger::Elapsed { at_ms })) => {
                    if at_ms < last_elapsed {
                        return invalid(format!(
                            "phase {} starts at {at_ms} ms, before the previous phase ({last_elapsed} ms)",
                            expected.name()
                        ));
                    }
                    last_elapsed = at_ms;
                }
                (_, Some(PhaseTrigger::HealthBelow { percent })) => {
                    if !(percent > 0.0 && percent <= 100.0) {
                        return invalid(format!(
                            "phase {} health threshold {percent} is outside (0, 100]",
                            expected.name()
                        ));
                    }
                }
            }
            for (label, value) in [
                ("cooldown_modifier", entry.cooldown_modifier),
                ("projectile_speed", entry.projectile_speed),
            ] {
                if !(value.is_finite() && value > 0.0) {
                    return invalid(format!(
                        "phase {} {label} must be positive, found {value}",
                        expected.name()
                    ));
                }
            }
        }

        for (label, offsets) in [
            ("bridge_flashes_ms", &self.bridge_flashes_ms),
            ("finale_flashes_ms", &self.finale_flashes_ms),
        ] {
            if offsets.windows(2).any(|w| w[1] < w[0]) {
                return invalid(format!("{label} must be ascending"));
            }
        }

        if self.skybeam_interval_ms == 0 {
            return invalid("skybeam_interval_ms must be positive".to_string());
        }
        Ok(())
    }

    pub fn entry(&self, phase: RoricPhase) -> Option<&PhaseEntry> {
        self.phases.iter().find(|e| e.phase == phase)
    }

    pub fn trigger(&self, phase: RoricPhase) -> Option<PhaseTrigger> {
        self.entry(phase).and_then(|e| e.trigger)
    }

    pub fn cooldown_modifier(&self, phase: RoricPhase) -> f64 {
        self.entry(phase).map_or(1.0, |e| e.cooldown_modifier)
    }

    pub fn projectile_speed(&self, phase: RoricPhase) -> f64 {
        self.entry(phase).map_or(1.0, |e| e.projectile_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_definition_is_valid() {
        let definition = RoricDefinition::default();
        definition.validate().unwrap();
        assert_eq!(definition.finale_flashes_ms.len(), 17);
        assert_eq!(definition.cooldown_modifier(RoricPhase::Finale), 0.7);
        assert_eq!(definition.cooldown_modifier(RoricPhase::Storm), 1.0);
    }

    #[test]
    fn empty_toml_uses_shipped_values() {
        let definition = RoricDefinition::from_toml_str("").unwrap();
        assert_eq!(definition, RoricDefinition::default());
    }

    #[test]
    fn overrides_parse() {
        let raw = r#"
            skybeam_interval_ms = 500
            bridge_flashes_ms = [10, 20]

            [[phases]]
            phase = "intro"

            [[phases]]
            phase = "assault"
            trigger = { type = "health_below", percent = 75.0 }

            [[phases]]
            phase = "bridge"
            trigger = { type = "elapsed", at_ms = 1000 }

            [[phases]]
            phase = "storm"
            trigger = { type = "elapsed", at_ms = 2000 }

            [[phases]]
            phase = "finale"
            trigger = { type = "elapsed", at_ms = 3000 }
            cooldown_modifier = 0.5
        "#;
        let definition = RoricDefinition::from_toml_str(raw).unwrap();
        assert_eq!(definition.skybeam_interval_ms, 500);
        assert_eq!(
            definition.trigger(RoricPhase::Assault),
            Some(PhaseTrigger::HealthBelow { percent: 75.0 })
        );
        assert_eq!(definition.cooldown_modifier(RoricPhase::Finale), 0.5);
        assert_eq!(definition.projectile_speed(RoricPhase::Finale), 1.0);
        assert_eq!(definition.finale_flashes_ms.len(), 17);
    }

    #[test]
    fn unsorted_flashes_rejected() {
        let err = RoricDefinition::from_toml_str("bridge_flashes_ms = [200, 100]").unwrap_err();
        assert!(err.to_string().contains("bridge_flashes_ms"));
    }

    #[test]
    fn phases_out_of_order_rejected() {
        let mut definition = RoricDefinition::default();
        definition.phases.swap(1, 2);
        assert!(definition.validate().is_err());
    }

    #[test]
    fn decreasing_phase_starts_rejected() {
        let mut definition = RoricDefinition::default();
        definition.phases[3].trigger = Some(PhaseTrigger::Elapsed { at_ms: 10 });
        assert!(definition.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = std::env::temp_dir().join("cadence-no-such-encounter-dir");
        let definition = RoricDefinition::load_from_dir(Some(&dir)).unwrap();
        assert_eq!(definition, RoricDefinition::default());
    }
}
