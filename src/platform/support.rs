use std::{fmt, str::FromStr};

use crate::foundation::error::{VrcPngError, VrcPngResult};

/// Catalog tag for PC (Windows standalone) builds.
pub const PC_PLATFORM_TAG: &str = "standalonewindows";
/// Catalog tag for Quest (Android) builds.
pub const QUEST_PLATFORM_TAG: &str = "android";

/// Which client platforms an avatar ships builds for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformSupport {
    /// PC and Quest.
    Both,
    /// PC only.
    PcOnly,
    /// Quest only.
    QuestOnly,
}

impl PlatformSupport {
    /// Map the command-line ordinal (0 = both, 1 = PC, 2 = Quest).
    pub fn from_index(index: u8) -> VrcPngResult<Self> {
        match index {
            0 => Ok(Self::Both),
            1 => Ok(Self::PcOnly),
            2 => Ok(Self::QuestOnly),
            other => Err(VrcPngError::unsupported_platform(format!(
                "platform index {other} is not one of 0 (both), 1 (pc), 2 (quest)"
            ))),
        }
    }

    /// Classify from the presence of PC and Quest builds.
    ///
    /// A record with neither build is treated as `Both`.
    pub fn from_flags(has_pc: bool, has_quest: bool) -> Self {
        match (has_pc, has_quest) {
            (true, false) => Self::PcOnly,
            (false, true) => Self::QuestOnly,
            _ => Self::Both,
        }
    }

    /// Classify from a list of catalog platform tags.
    pub fn from_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Self {
        let (mut pc, mut quest) = (false, false);
        for tag in tags {
            match tag {
                PC_PLATFORM_TAG => pc = true,
                QUEST_PLATFORM_TAG => quest = true,
                _ => {}
            }
        }
        Self::from_flags(pc, quest)
    }

    /// Command-line ordinal of this classification.
    pub fn index(self) -> u8 {
        match self {
            Self::Both => 0,
            Self::PcOnly => 1,
            Self::QuestOnly => 2,
        }
    }

    /// Frame of the platform sprite sheet that shows this classification.
    pub fn sprite_band(self) -> u32 {
        match self {
            Self::Both => 0,
            Self::PcOnly => 1,
            Self::QuestOnly => 2,
        }
    }
}

impl fmt::Display for PlatformSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Both => "both",
            Self::PcOnly => "pc",
            Self::QuestOnly => "quest",
        })
    }
}

impl FromStr for PlatformSupport {
    type Err = VrcPngError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "both" | "pc+quest" => Ok(Self::Both),
            "pc" | "pc_only" | PC_PLATFORM_TAG => Ok(Self::PcOnly),
            "quest" | "quest_only" | QUEST_PLATFORM_TAG => Ok(Self::QuestOnly),
            other => match other.parse::<u8>() {
                Ok(i) => Self::from_index(i),
                Err(_) => Err(VrcPngError::unsupported_platform(format!(
                    "unknown platform '{other}'"
                ))),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/platform/support.rs"]
mod tests;
