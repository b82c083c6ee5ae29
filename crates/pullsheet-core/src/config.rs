#![forbid(unsafe_code)]

//! Tunable parameters for the pullable container.
//!
//! The close thresholds and the snap spring are tuning knobs, not contract:
//! every field has a default and can be overridden from the environment or,
//! with the `config-file` feature, from a TOML or JSON document.
//!
//! ```toml
//! close_fraction = 0.4
//! close_velocity = 1200.0
//! snap_stiffness = 400.0
//! snap_damping_ratio = 0.8
//! ```

use crate::error::ConfigError;
use crate::release::ReleaseThresholds;

/// Upper clamp for `close_velocity` (points per second).
const MAX_CLOSE_VELOCITY: f64 = 20_000.0;

/// Stiffness range accepted for the snap spring.
const MIN_SNAP_STIFFNESS: f64 = 1.0;
const MAX_SNAP_STIFFNESS: f64 = 5_000.0;

/// Damping ratio range accepted for the snap spring.
const MIN_SNAP_DAMPING_RATIO: f64 = 0.05;
const MAX_SNAP_DAMPING_RATIO: f64 = 4.0;

/// Initial spring velocity range, in multiples of the travel distance per second.
const MAX_SNAP_INITIAL_VELOCITY: f64 = 50.0;

/// Configuration for the drag controller and its snap animation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "config-file",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SheetConfig {
    /// Release below `default_height × close_fraction` closes (default: 0.5).
    pub close_fraction: f64,
    /// Downward release velocity, points/sec, that closes regardless of
    /// height (default: 1500.0).
    pub close_velocity: f64,
    /// Snap spring stiffness (default: 400.0).
    pub snap_stiffness: f64,
    /// Snap spring damping ratio; 1.0 is critical (default: 0.8).
    pub snap_damping_ratio: f64,
    /// Initial snap velocity as a multiple of the travel distance per second
    /// (default: 2.0).
    pub snap_initial_velocity: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            close_fraction: 0.5,
            close_velocity: 1500.0,
            snap_stiffness: 400.0,
            snap_damping_ratio: 0.8,
            snap_initial_velocity: 2.0,
        }
    }
}

impl SheetConfig {
    #[must_use]
    pub fn with_close_fraction(mut self, fraction: f64) -> Self {
        self.close_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_close_velocity(mut self, velocity: f64) -> Self {
        self.close_velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_snap_spring(mut self, stiffness: f64, damping_ratio: f64) -> Self {
        self.snap_stiffness = stiffness;
        self.snap_damping_ratio = damping_ratio;
        self
    }

    #[must_use]
    pub fn with_snap_initial_velocity(mut self, velocity: f64) -> Self {
        self.snap_initial_velocity = velocity;
        self
    }

    /// Thresholds consumed by the release decision.
    #[must_use]
    pub fn release_thresholds(&self) -> ReleaseThresholds {
        ReleaseThresholds {
            close_fraction: self.close_fraction,
            close_velocity: self.close_velocity,
        }
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `PULLSHEET_CLOSE_FRACTION`
    /// - `PULLSHEET_CLOSE_VELOCITY` (points/sec)
    /// - `PULLSHEET_SNAP_STIFFNESS`
    /// - `PULLSHEET_SNAP_DAMPING_RATIO`
    /// - `PULLSHEET_SNAP_INITIAL_VELOCITY`
    ///
    /// Unparseable values are logged and ignored. The result is
    /// [`validated`](Self::validated).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading through `get_env`.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let fields: [(&str, &mut f64); 5] = [
            ("PULLSHEET_CLOSE_FRACTION", &mut config.close_fraction),
            ("PULLSHEET_CLOSE_VELOCITY", &mut config.close_velocity),
            ("PULLSHEET_SNAP_STIFFNESS", &mut config.snap_stiffness),
            ("PULLSHEET_SNAP_DAMPING_RATIO", &mut config.snap_damping_ratio),
            (
                "PULLSHEET_SNAP_INITIAL_VELOCITY",
                &mut config.snap_initial_velocity,
            ),
        ];

        for (key, slot) in fields {
            let Some(raw) = get_env(key) else {
                continue;
            };
            match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => *slot = value,
                _ => {
                    tracing::warn!(
                        target: "pullsheet.config",
                        key,
                        value = %raw,
                        "ignoring unparseable config value"
                    );
                }
            }
        }

        config.validated()
    }

    /// Clamp every field into its accepted range.
    ///
    /// - `close_fraction` to `[0, 1]`
    /// - `close_velocity` to `[0, 20000]`
    /// - `snap_stiffness` to `[1, 5000]`
    /// - `snap_damping_ratio` to `[0.05, 4]`
    /// - `snap_initial_velocity` to `[0, 50]`
    ///
    /// Non-finite values fall back to the default for that field.
    #[must_use]
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        Self {
            close_fraction: clamp_or(self.close_fraction, 0.0, 1.0, defaults.close_fraction),
            close_velocity: clamp_or(
                self.close_velocity,
                0.0,
                MAX_CLOSE_VELOCITY,
                defaults.close_velocity,
            ),
            snap_stiffness: clamp_or(
                self.snap_stiffness,
                MIN_SNAP_STIFFNESS,
                MAX_SNAP_STIFFNESS,
                defaults.snap_stiffness,
            ),
            snap_damping_ratio: clamp_or(
                self.snap_damping_ratio,
                MIN_SNAP_DAMPING_RATIO,
                MAX_SNAP_DAMPING_RATIO,
                defaults.snap_damping_ratio,
            ),
            snap_initial_velocity: clamp_or(
                self.snap_initial_velocity,
                0.0,
                MAX_SNAP_INITIAL_VELOCITY,
                defaults.snap_initial_velocity,
            ),
        }
    }

    /// Report every out-of-range field. An empty vector means the config is
    /// valid as-is.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.close_fraction) {
            errors.push(format!(
                "close_fraction must be in [0, 1], got {}",
                self.close_fraction
            ));
        }
        if !(0.0..=MAX_CLOSE_VELOCITY).contains(&self.close_velocity) {
            errors.push(format!(
                "close_velocity must be in [0, {MAX_CLOSE_VELOCITY}], got {}",
                self.close_velocity
            ));
        }
        if !(MIN_SNAP_STIFFNESS..=MAX_SNAP_STIFFNESS).contains(&self.snap_stiffness) {
            errors.push(format!(
                "snap_stiffness must be in [{MIN_SNAP_STIFFNESS}, {MAX_SNAP_STIFFNESS}], got {}",
                self.snap_stiffness
            ));
        }
        if !(MIN_SNAP_DAMPING_RATIO..=MAX_SNAP_DAMPING_RATIO).contains(&self.snap_damping_ratio) {
            errors.push(format!(
                "snap_damping_ratio must be in [{MIN_SNAP_DAMPING_RATIO}, {MAX_SNAP_DAMPING_RATIO}], got {}",
                self.snap_damping_ratio
            ));
        }
        if !(0.0..=MAX_SNAP_INITIAL_VELOCITY).contains(&self.snap_initial_velocity) {
            errors.push(format!(
                "snap_initial_velocity must be in [0, {MAX_SNAP_INITIAL_VELOCITY}], got {}",
                self.snap_initial_velocity
            ));
        }

        errors
    }

    /// Fail with [`ConfigError::Validation`] unless [`validate`](Self::validate)
    /// is clean.
    pub fn ensure_valid(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string. Missing fields take their defaults.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.ensure_valid()
    }

    /// Load from a JSON string. Missing fields take their defaults.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.ensure_valid()
    }
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
