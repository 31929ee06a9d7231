//! # Simulator Configuration
//!
//! 정확도 공식의 모든 튜닝 상수를 한 곳에서 관리한다.
//!
//! ## 사용법
//! ```rust
//! use cl_core::simulator::SimulatorConfig;
//!
//! let config = SimulatorConfig::default();
//! let harsh = SimulatorConfig::harsh();
//! assert!(harsh.naive_penalty_per_step > config.naive_penalty_per_step);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};

use crate::error::{Result, SimError};

pub const CONFIG_PATH_ENV: &str = "CL_SIM_CONFIG_PATH";

/// Accuracy formula constants plus training-run pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    // === Unseen seasons ===
    /// 미학습 시즌 정확도 하한 (기본: 10.0)
    pub untrained_min: f64,
    /// 미학습 시즌 정확도 상한, exclusive (기본: 20.0)
    pub untrained_max: f64,

    // === Baseline ===
    /// 기본 정확도 (기본: 88.0)
    pub baseline: f64,
    /// baseline 노이즈 폭 U[0, n) (기본: 5.0)
    pub baseline_noise: f64,
    /// 증강 플래그 1개당 보너스 (기본: 1.2)
    pub augmentation_bonus: f64,
    /// 현재 시즌 정확도 상한 (기본: 99.0)
    pub current_task_cap: f64,

    // === Naive fine-tuning ===
    /// 거리 1당 감점 (기본: 25.0)
    pub naive_penalty_per_step: f64,
    /// 추가 감점 노이즈 폭 (기본: 10.0)
    pub naive_noise: f64,
    /// 하한 (기본: 20.0)
    pub naive_floor: f64,

    // === EWC ===
    /// 거리 1당 감점 (기본: 2.0)
    pub ewc_penalty_per_step: f64,
    /// 추가 감점 노이즈 폭 (기본: 2.0)
    pub ewc_noise: f64,
    /// 증강 플래그 1개당 안정성 오프셋 (기본: 0.3)
    pub ewc_stability_offset: f64,
    /// 하한 (기본: 80.0)
    pub ewc_floor: f64,

    // === Training run pacing ===
    /// Progress updates per train step, including 0% and 100% (기본: 21)
    pub progress_ticks: u8,
    /// Artificial delay between progress updates (기본: 120ms)
    pub tick_delay_ms: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            untrained_min: 10.0,
            untrained_max: 20.0,

            baseline: 88.0,
            baseline_noise: 5.0,
            augmentation_bonus: 1.2,
            current_task_cap: 99.0,

            naive_penalty_per_step: 25.0,
            naive_noise: 10.0,
            naive_floor: 20.0,

            ewc_penalty_per_step: 2.0,
            ewc_noise: 2.0,
            ewc_stability_offset: 0.3,
            ewc_floor: 80.0,

            progress_ticks: 21,
            tick_delay_ms: 120,
        }
    }
}

impl SimulatorConfig {
    pub fn realistic() -> Self {
        Self::default()
    }

    /// 더 가파른 망각 (naive 감점 증가)
    pub fn harsh() -> Self {
        let mut cfg = Self::default();
        cfg.naive_penalty_per_step = 32.0;
        cfg.naive_noise = 12.0;
        cfg.ewc_penalty_per_step = 3.0;
        cfg
    }

    /// 완만한 망각
    pub fn gentle() -> Self {
        let mut cfg = Self::default();
        cfg.naive_penalty_per_step = 15.0;
        cfg.naive_noise = 6.0;
        cfg.ewc_penalty_per_step = 1.0;
        cfg.ewc_noise = 1.0;
        cfg
    }

    /// 테스트용: 노이즈 제거, 지연 없음
    pub fn deterministic() -> Self {
        let mut cfg = Self::default();
        cfg.untrained_max = cfg.untrained_min;
        cfg.baseline_noise = 0.0;
        cfg.naive_noise = 0.0;
        cfg.ewc_noise = 0.0;
        cfg.tick_delay_ms = 0;
        cfg
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "realistic" | "default" => Some(Self::realistic()),
            "harsh" => Some(Self::harsh()),
            "gentle" => Some(Self::gentle()),
            "deterministic" => Some(Self::deterministic()),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("untrained_min", self.untrained_min),
            ("baseline", self.baseline),
            ("baseline_noise", self.baseline_noise),
            ("augmentation_bonus", self.augmentation_bonus),
            ("naive_penalty_per_step", self.naive_penalty_per_step),
            ("naive_noise", self.naive_noise),
            ("naive_floor", self.naive_floor),
            ("ewc_penalty_per_step", self.ewc_penalty_per_step),
            ("ewc_noise", self.ewc_noise),
            ("ewc_stability_offset", self.ewc_stability_offset),
            ("ewc_floor", self.ewc_floor),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidConfig(format!("{name} must be >= 0, got {value}")));
            }
        }

        if self.untrained_max < self.untrained_min || self.untrained_max > 100.0 {
            return Err(SimError::InvalidConfig(format!(
                "untrained range [{}, {}) must be ordered and within 0-100",
                self.untrained_min, self.untrained_max
            )));
        }
        if !(0.0..=100.0).contains(&self.current_task_cap) {
            return Err(SimError::InvalidConfig(format!(
                "current_task_cap must be within 0-100, got {}",
                self.current_task_cap
            )));
        }
        for (name, floor) in [("naive_floor", self.naive_floor), ("ewc_floor", self.ewc_floor)] {
            if floor > self.current_task_cap {
                return Err(SimError::InvalidConfig(format!(
                    "{name} ({floor}) exceeds current_task_cap ({})",
                    self.current_task_cap
                )));
            }
        }
        if self.progress_ticks < 2 {
            return Err(SimError::InvalidConfig(format!(
                "progress_ticks must be >= 2, got {}",
                self.progress_ticks
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load and validate a config file. `.yaml`/`.yml` are read as YAML,
    /// anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let config = if is_yaml { Self::from_yaml(&content)? } else { Self::from_json(&content)? };
        config.validate()?;
        Ok(config)
    }
}

/// Config from the file named by `CL_SIM_CONFIG_PATH`, or defaults when unset.
pub fn config_from_env() -> Result<SimulatorConfig> {
    config_from_env_var(CONFIG_PATH_ENV)
}

/// Config from the file named by env var `name`. Unset or blank gives defaults.
pub fn config_from_env_var(name: &str) -> Result<SimulatorConfig> {
    let Ok(path) = env::var(name) else {
        return Ok(SimulatorConfig::default());
    };

    let path = path.trim();
    if path.is_empty() {
        return Ok(SimulatorConfig::default());
    }

    log::debug!("Loading simulator config from {name}='{path}'");
    SimulatorConfig::from_path(path)
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let cfg = SimulatorConfig::default();
        assert!((cfg.baseline - 88.0).abs() < 1e-9);
        assert!((cfg.augmentation_bonus - 1.2).abs() < 1e-9);
        assert_eq!(cfg.progress_ticks, 21);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        for name in ["realistic", "harsh", "gentle", "deterministic"] {
            let cfg = SimulatorConfig::by_name(name).unwrap();
            assert!(cfg.validate().is_ok(), "{name} preset should validate");
        }
        assert!(SimulatorConfig::by_name("chaotic").is_none());
    }

    #[test]
    fn test_harsh_forgets_faster() {
        let realistic = SimulatorConfig::realistic();
        let harsh = SimulatorConfig::harsh();
        let gentle = SimulatorConfig::gentle();

        assert!(harsh.naive_penalty_per_step > realistic.naive_penalty_per_step);
        assert!(gentle.naive_penalty_per_step < realistic.naive_penalty_per_step);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = SimulatorConfig::default();
        cfg.ewc_floor = 120.0;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));

        let mut cfg = SimulatorConfig::default();
        cfg.untrained_max = 5.0;
        assert!(cfg.validate().is_err());

        let mut cfg = SimulatorConfig::default();
        cfg.naive_noise = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = SimulatorConfig::default();
        cfg.progress_ticks = 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = SimulatorConfig::from_json(r#"{"naive_floor": 30.0}"#).unwrap();
        assert!((cfg.naive_floor - 30.0).abs() < 1e-9);
        assert!((cfg.ewc_floor - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_path_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("sim.yaml");
        let mut file = fs::File::create(&yaml_path).unwrap();
        writeln!(file, "ewc_penalty_per_step: 4.5\ntick_delay_ms: 0").unwrap();
        let cfg = SimulatorConfig::from_path(&yaml_path).unwrap();
        assert!((cfg.ewc_penalty_per_step - 4.5).abs() < 1e-9);
        assert_eq!(cfg.tick_delay_ms, 0);

        let json_path = dir.path().join("sim.json");
        fs::write(&json_path, r#"{"ewc_floor": 150.0}"#).unwrap();
        assert!(matches!(SimulatorConfig::from_path(&json_path), Err(SimError::InvalidConfig(_))));

        let missing = dir.path().join("missing.json");
        assert!(matches!(SimulatorConfig::from_path(missing), Err(SimError::Io(_))));
    }

    #[test]
    fn test_config_from_env_var() {
        // Own variable name so parallel tests reading CL_SIM_CONFIG_PATH are unaffected.
        const VAR: &str = "CL_SIM_CONFIG_PATH_LOADER_TEST";
        let dir = tempfile::tempdir().unwrap();

        env::remove_var(VAR);
        assert_eq!(config_from_env_var(VAR).unwrap(), SimulatorConfig::default());

        env::set_var(VAR, "   ");
        assert_eq!(config_from_env_var(VAR).unwrap(), SimulatorConfig::default());

        let valid = dir.path().join("valid.json");
        fs::write(&valid, r#"{"naive_floor": 25.0, "tick_delay_ms": 0}"#).unwrap();
        env::set_var(VAR, &valid);
        let cfg = config_from_env_var(VAR).unwrap();
        assert!((cfg.naive_floor - 25.0).abs() < 1e-9);
        assert_eq!(cfg.tick_delay_ms, 0);

        let invalid = dir.path().join("invalid.yaml");
        fs::write(&invalid, "ewc_floor: 140.0\n").unwrap();
        env::set_var(VAR, &invalid);
        assert!(matches!(config_from_env_var(VAR), Err(SimError::InvalidConfig(_))));

        env::remove_var(VAR);
    }
}
