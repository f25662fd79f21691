use std::env;
use std::str::FromStr;

use crate::algorithm::Algorithm;
use crate::error::ConfigError;

pub const MIN_SIZE: usize = 10;
pub const MAX_SIZE: usize = 100;
pub const SIZE_STEP: usize = 5;
pub const DEFAULT_SIZE: usize = 30;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 100;
pub const DEFAULT_SPEED: u8 = 50;

// bar magnitudes, inclusive
pub const MIN_VALUE: u32 = 10;
pub const MAX_VALUE: u32 = 309;

pub const SETTLE_DELAY_MS: u64 = 50;

const fn on_grid(x: usize) -> bool {
    x >= MIN_SIZE && x <= MAX_SIZE && (x - MIN_SIZE) % SIZE_STEP == 0
}

const _: () = {
    assert!(on_grid(MAX_SIZE), "MAX_SIZE must be reachable from MIN_SIZE in SIZE_STEP increments");
    assert!(on_grid(DEFAULT_SIZE), "DEFAULT_SIZE must be a selectable size");
    assert!(MIN_SPEED >= 1 && MAX_SPEED <= 100, "speed maps to 101 - speed milliseconds");
    assert!(DEFAULT_SPEED >= MIN_SPEED && DEFAULT_SPEED <= MAX_SPEED);
    assert!(MIN_VALUE > 0 && MIN_VALUE < MAX_VALUE, "values must be positive");
};

/// Per-comparison pause for a speed setting: speed 1 waits ~100ms, speed 100 ~1ms.
pub fn step_delay_ms(speed: u8) -> u64 {
    101 - speed.clamp(MIN_SPEED, MAX_SPEED) as u64
}

pub fn validate_size(size: usize) -> Result<usize, ConfigError> {
    if on_grid(size) {
        Ok(size)
    } else {
        Err(ConfigError::InvalidSize(size))
    }
}

pub fn validate_speed(speed: u8) -> Result<u8, ConfigError> {
    if (MIN_SPEED..=MAX_SPEED).contains(&speed) {
        Ok(speed)
    } else {
        Err(ConfigError::InvalidSpeed(speed as u64))
    }
}

/// Whether runs actually sleep at their suspension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    #[default]
    Realtime,
    /// Delays return immediately. Used by headless runs, tests and benches.
    Immediate,
}

impl FromStr for Pacing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "realtime" => Ok(Pacing::Realtime),
            "immediate" => Ok(Pacing::Immediate),
            _ => Err(ConfigError::InvalidPacing(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub size: usize,
    pub speed: u8,
    pub algorithm: Algorithm,
    /// Fixed seed for element generation; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub pacing: Pacing,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            size: DEFAULT_SIZE,
            speed: DEFAULT_SPEED,
            algorithm: Algorithm::default(),
            seed: None,
            pacing: Pacing::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_size(self.size)?;
        validate_speed(self.speed)?;
        Ok(())
    }

    /// Defaults overridden by `SORTVIS_SIZE`, `SORTVIS_SPEED`, `SORTVIS_ALGORITHM`,
    /// `SORTVIS_SEED` and `SORTVIS_PACING`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(raw) = lookup("SORTVIS_SIZE") {
            let size = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Unparsable { key: "SORTVIS_SIZE", value: raw.clone() })?;
            settings.size = validate_size(size)?;
        }
        if let Some(raw) = lookup("SORTVIS_SPEED") {
            let speed = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Unparsable { key: "SORTVIS_SPEED", value: raw.clone() })?;
            let speed = u8::try_from(speed).map_err(|_| ConfigError::InvalidSpeed(speed))?;
            settings.speed = validate_speed(speed)?;
        }
        if let Some(raw) = lookup("SORTVIS_ALGORITHM") {
            settings.algorithm = raw.parse()?;
        }
        if let Some(raw) = lookup("SORTVIS_SEED") {
            let seed = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Unparsable { key: "SORTVIS_SEED", value: raw.clone() })?;
            settings.seed = Some(seed);
        }
        if let Some(raw) = lookup("SORTVIS_PACING") {
            settings.pacing = raw.parse()?;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_step_delay() {
        assert_eq!(step_delay_ms(1), 100);
        assert_eq!(step_delay_ms(50), 51);
        assert_eq!(step_delay_ms(100), 1);
        // out of range speeds are clamped, never underflow
        assert_eq!(step_delay_ms(0), 100);
        assert_eq!(step_delay_ms(255), 1);
    }

    #[test]
    fn test_size_grid() {
        for size in (MIN_SIZE..=MAX_SIZE).step_by(SIZE_STEP) {
            assert_eq!(validate_size(size), Ok(size));
        }
        for size in [0, 5, 9, 11, 32, 99, 105, 1000] {
            assert_eq!(validate_size(size), Err(ConfigError::InvalidSize(size)));
        }
    }

    #[test]
    fn test_speed_range() {
        assert_eq!(validate_speed(1), Ok(1));
        assert_eq!(validate_speed(100), Ok(100));
        assert_eq!(validate_speed(0), Err(ConfigError::InvalidSpeed(0)));
        assert_eq!(validate_speed(101), Err(ConfigError::InvalidSpeed(101)));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.size, 30);
        assert_eq!(settings.speed, 50);
        assert_eq!(settings.algorithm, Algorithm::Bubble);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("SORTVIS_SIZE", "55"),
            ("SORTVIS_SPEED", "100"),
            ("SORTVIS_ALGORITHM", "Quick"),
            ("SORTVIS_SEED", "12345"),
            ("SORTVIS_PACING", "immediate"),
        ]))
        .unwrap();
        assert_eq!(settings.size, 55);
        assert_eq!(settings.speed, 100);
        assert_eq!(settings.algorithm, Algorithm::Quick);
        assert_eq!(settings.seed, Some(12345));
        assert_eq!(settings.pacing, Pacing::Immediate);
    }

    #[test]
    fn test_rejected_overrides() {
        let err = Settings::from_lookup(lookup_from(&[("SORTVIS_SIZE", "12")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidSize(12));

        let err = Settings::from_lookup(lookup_from(&[("SORTVIS_SPEED", "300")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidSpeed(300));

        let err = Settings::from_lookup(lookup_from(&[("SORTVIS_SEED", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::Unparsable { key: "SORTVIS_SEED", .. }));

        let err = Settings::from_lookup(lookup_from(&[("SORTVIS_ALGORITHM", "bogo")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownAlgorithm("bogo".to_string()));

        let err = Settings::from_lookup(lookup_from(&[("SORTVIS_PACING", "fast")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPacing("fast".to_string()));
    }
}
