use serde::{Deserialize, Serialize};

use crate::data::table::Phase;

/// Every phase, as recorded.
pub const ORIGINAL_PHASES: [Phase; 5] = Phase::ALL;

/// Phase 0 is the baseline stage: it is short and opens with an outlier in
/// every run, so the cleaned view drops it. This is a fixed policy, not a
/// detection result.
pub const EXCLUDED_BASELINE: Phase = Phase::Baseline;

pub const AFTER_REMOVAL_PHASES: [Phase; 4] =
    [Phase::Stage1, Phase::Stage2, Phase::Stage3, Phase::Stage4];

pub const RAW_EXPLANATION: &str = "\
#### My thoughts on the original data:
- There is an Outlier at the beginning of Phase 0 for each test.
- In comparison to all other phases, Phase 0 lasts a short time.
  This makes me assume that Phase 0 is just a baseline, and testing
  begins during Phase 1.
";

pub const CLEANED_EXPLANATION: &str = "\
#### Action taken:
- Phase 0 was removed from the training data set.
";

pub const EXPLORATION_NOTES: &str = "\
#### Features with most similar trends:
- Columns 11 & 12 (target)
- Columns 4 & 5
- Columns 6 & 7

#### Effect of feature outliers on target (Column 12):
- Outliers in Phase 1 of training set 3 for
  Columns 4, 5 influence target.
- Outliers in Phase 1 of training set 1 for
  Column 1 don't influence target.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Original,
    AfterRemoval,
}

impl ViewMode {
    pub const ALL: [ViewMode; 2] = [ViewMode::Original, ViewMode::AfterRemoval];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Original => "Original Data",
            ViewMode::AfterRemoval => "After Outlier Removal",
        }
    }
}

/// Phase set and explanatory text for a view mode.
pub fn resolve_view(mode: ViewMode) -> (&'static [Phase], &'static str) {
    match mode {
        ViewMode::Original => (&ORIGINAL_PHASES, RAW_EXPLANATION),
        ViewMode::AfterRemoval => (&AFTER_REMOVAL_PHASES, CLEANED_EXPLANATION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_shows_every_phase() {
        let (phases, text) = resolve_view(ViewMode::Original);
        let numbers: Vec<u8> = phases.iter().map(|p| p.number()).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3, 4]);
        assert_eq!(text, RAW_EXPLANATION);
    }

    #[test]
    fn after_removal_drops_baseline() {
        let (phases, text) = resolve_view(ViewMode::AfterRemoval);
        assert_eq!(phases, &[Phase::Stage1, Phase::Stage2, Phase::Stage3, Phase::Stage4]);
        assert!(!phases.contains(&EXCLUDED_BASELINE));
        assert_eq!(text, CLEANED_EXPLANATION);
    }
}
