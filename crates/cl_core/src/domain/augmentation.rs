// 데이터 증강 플래그 (5종, 서로 독립)
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Augmentation {
    Rotation,
    Shear,
    Zoom,
    Flip,
    Elastic,
}

impl Augmentation {
    pub const ALL: [Augmentation; 5] = [
        Augmentation::Rotation,
        Augmentation::Shear,
        Augmentation::Zoom,
        Augmentation::Flip,
        Augmentation::Elastic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Augmentation::Rotation => "rotation",
            Augmentation::Shear => "shear",
            Augmentation::Zoom => "zoom",
            Augmentation::Flip => "flip",
            Augmentation::Elastic => "elastic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Augmentation::Rotation => "Random Rotation",
            Augmentation::Shear => "Shear Transform",
            Augmentation::Zoom => "Random Zoom",
            Augmentation::Flip => "Horizontal Flip",
            Augmentation::Elastic => "Elastic Deformation",
        }
    }
}

impl FromStr for Augmentation {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rotation" | "rotate" => Ok(Augmentation::Rotation),
            "shear" => Ok(Augmentation::Shear),
            "zoom" => Ok(Augmentation::Zoom),
            "flip" => Ok(Augmentation::Flip),
            "elastic" => Ok(Augmentation::Elastic),
            other => Err(SimError::UnknownAugmentation(other.to_string())),
        }
    }
}

impl fmt::Display for Augmentation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enabled/disabled state for each augmentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentationSettings {
    #[serde(default)]
    pub rotation: bool,
    #[serde(default)]
    pub shear: bool,
    #[serde(default)]
    pub zoom: bool,
    #[serde(default)]
    pub flip: bool,
    #[serde(default)]
    pub elastic: bool,
}

impl AugmentationSettings {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self { rotation: true, shear: true, zoom: true, flip: true, elastic: true }
    }

    pub fn is_enabled(&self, aug: Augmentation) -> bool {
        match aug {
            Augmentation::Rotation => self.rotation,
            Augmentation::Shear => self.shear,
            Augmentation::Zoom => self.zoom,
            Augmentation::Flip => self.flip,
            Augmentation::Elastic => self.elastic,
        }
    }

    fn slot_mut(&mut self, aug: Augmentation) -> &mut bool {
        match aug {
            Augmentation::Rotation => &mut self.rotation,
            Augmentation::Shear => &mut self.shear,
            Augmentation::Zoom => &mut self.zoom,
            Augmentation::Flip => &mut self.flip,
            Augmentation::Elastic => &mut self.elastic,
        }
    }

    /// Copy with a single flag set.
    pub fn with(mut self, aug: Augmentation, enabled: bool) -> Self {
        *self.slot_mut(aug) = enabled;
        self
    }

    /// Copy with a single flag flipped.
    pub fn toggled(self, aug: Augmentation) -> Self {
        let current = self.is_enabled(aug);
        self.with(aug, !current)
    }

    pub fn enabled(&self) -> impl Iterator<Item = Augmentation> + '_ {
        Augmentation::ALL.into_iter().filter(move |aug| self.is_enabled(*aug))
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }

    /// Parse a comma separated list such as `"rotation,flip"`.
    /// `"all"` enables every flag, `"none"` or an empty string enables none.
    pub fn parse_list(list: &str) -> Result<Self, SimError> {
        let list = list.trim();
        if list.eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }
        if list.eq_ignore_ascii_case("none") {
            return Ok(Self::none());
        }

        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .try_fold(Self::none(), |acc, name| -> Result<Self, SimError> {
                Ok(acc.with(name.parse()?, true))
            })
    }
}

impl FromStr for AugmentationSettings {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_list(s)
    }
}
