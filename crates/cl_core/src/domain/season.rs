// 시즌(환경 조건) 정의 - 고정된 4단계 분포 변화
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SimError;

/// One of the four fixed environmental conditions, in training order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Season {
    Baseline = 1,
    BrightnessContrast = 2,
    BlurLowLight = 3,
    NoiseDesaturation = 4,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Baseline,
        Season::BrightnessContrast,
        Season::BlurLowLight,
        Season::NoiseDesaturation,
    ];

    pub const FIRST: Season = Season::Baseline;
    pub const LAST: Season = Season::NoiseDesaturation;

    /// 1-based ordinal
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Zero-based slot, handy for per-season arrays.
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn next(self) -> Option<Season> {
        Season::try_from(self.number() + 1).ok()
    }

    /// Seasons from the first one up to and including `self`.
    pub fn up_to(self) -> impl Iterator<Item = Season> {
        Season::ALL.into_iter().take(self.number() as usize)
    }

    /// Number of seasons between `self` and a later season (0 when equal).
    pub fn distance_to(self, later: Season) -> u8 {
        later.number().saturating_sub(self.number())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Season::Baseline => "Season 1: Baseline",
            Season::BrightnessContrast => "Season 2: Brightness/Contrast Shift",
            Season::BlurLowLight => "Season 3: Blur/Low-Light Shift",
            Season::NoiseDesaturation => "Season 4: Noise/Desaturation Shift",
        }
    }

    /// Short description of the capture conditions the season stands for.
    pub fn condition(&self) -> &'static str {
        match self {
            Season::Baseline => "clear daylight field images",
            Season::BrightnessContrast => "harsh midday sun, washed-out contrast",
            Season::BlurLowLight => "overcast dusk, motion blur and low light",
            Season::NoiseDesaturation => "sensor noise and faded colour late in the season",
        }
    }
}

impl TryFrom<u8> for Season {
    type Error = SimError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Season::Baseline),
            2 => Ok(Season::BrightnessContrast),
            3 => Ok(Season::BlurLowLight),
            4 => Ok(Season::NoiseDesaturation),
            other => Err(SimError::InvalidSeason(other)),
        }
    }
}

impl From<Season> for u8 {
    fn from(season: Season) -> Self {
        season.number()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "S{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_bounds() {
        assert!(matches!(Season::try_from(0), Err(SimError::InvalidSeason(0))));
        assert_eq!(Season::try_from(3).unwrap(), Season::BlurLowLight);
        assert!(Season::try_from(5).is_err());
    }

    #[test]
    fn test_next_stops_at_last() {
        assert_eq!(Season::Baseline.next(), Some(Season::BrightnessContrast));
        assert_eq!(Season::LAST.next(), None);
    }

    #[test]
    fn test_up_to_and_distance() {
        let seasons: Vec<_> = Season::BlurLowLight.up_to().collect();
        assert_eq!(seasons, vec![Season::Baseline, Season::BrightnessContrast, Season::BlurLowLight]);
        assert_eq!(Season::Baseline.distance_to(Season::BlurLowLight), 2);
        assert_eq!(Season::BlurLowLight.distance_to(Season::Baseline), 0);
    }

    #[test]
    fn test_serde_as_number() {
        assert_eq!(serde_json::to_string(&Season::NoiseDesaturation).unwrap(), "4");
        let season: Season = serde_json::from_str("2").unwrap();
        assert_eq!(season, Season::BrightnessContrast);
        assert!(serde_json::from_str::<Season>("9").is_err());
    }
}
