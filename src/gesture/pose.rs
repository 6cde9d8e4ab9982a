use super::fingers::FingerCount;
use std::fmt;
use std::ops::RangeInclusive;

/// Coarse hand pose recognised in a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HandPose {
    #[default]
    None,
    // Declared for gesture recognition over frame sequences, which the
    // classifier never produces yet.
    #[allow(dead_code)]
    WaveLeft,
    #[allow(dead_code)]
    WaveRight,
    #[allow(dead_code)]
    DoubleTap,
    Fist,
    FingersSpread,
}

impl HandPose {
    pub const fn code(self) -> u8 {
        match self {
            HandPose::None => 0,
            HandPose::WaveLeft => 1,
            HandPose::WaveRight => 2,
            HandPose::DoubleTap => 3,
            HandPose::Fist => 4,
            HandPose::FingersSpread => 5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            HandPose::None => "not found",
            HandPose::WaveLeft => "wave left",
            HandPose::WaveRight => "wave right",
            HandPose::DoubleTap => "double tap",
            HandPose::Fist => "fist",
            HandPose::FingersSpread => "fingers spread",
        }
    }
}

impl fmt::Display for HandPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from finger-gap count to pose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseRules {
    pub fist_gaps: usize,
    pub spread_gaps: RangeInclusive<usize>,
}

impl Default for PoseRules {
    fn default() -> Self {
        Self {
            fist_gaps: 0,
            spread_gaps: 4..=5,
        }
    }
}

/// Classify one frame. `fingers` is `None` when no shape was found.
pub fn classify(fingers: Option<FingerCount>, rules: &PoseRules) -> HandPose {
    match fingers {
        Some(FingerCount::Gaps(gaps)) if gaps == rules.fist_gaps => HandPose::Fist,
        Some(FingerCount::Gaps(gaps)) if rules.spread_gaps.contains(&gaps) => HandPose::FingersSpread,
        _ => HandPose::None,
    }
}
