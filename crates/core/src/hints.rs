use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::CropType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKey {
    Upload,
    CropType,
    Analysis,
    CoconutMaturity,
    Simulation,
    DroneControls,
    Pesticide,
    Spray,
    InspectionTool,
    CoconutInspection,
    MaturityLevels,
    CoconutCount,
}

impl HintKey {
    /// Full catalog, in the order random picks index into.
    pub const ALL: [Self; 12] = [
        Self::Upload,
        Self::CropType,
        Self::Analysis,
        Self::CoconutMaturity,
        Self::Simulation,
        Self::DroneControls,
        Self::Pesticide,
        Self::Spray,
        Self::InspectionTool,
        Self::CoconutInspection,
        Self::MaturityLevels,
        Self::CoconutCount,
    ];

    pub const fn text(self) -> &'static str {
        match self {
            Self::Upload => "Try uploading a photo of your crop. Photos with good lighting will provide better results.",
            Self::CropType => "Make sure to select the right crop type before analysis.",
            Self::Analysis => "After analysis, you'll see potential diseases with confidence scores.",
            Self::CoconutMaturity => "For coconut trees, the system will analyze maturity level, count coconuts, and indicate harvest readiness.",
            Self::Simulation => "Activate the AGROD simulation to practice applying pesticides or inspect coconut trees.",
            Self::DroneControls => "Use arrow keys or buttons to move the AGROD over the field.",
            Self::Pesticide => "Select an appropriate pesticide before spraying.",
            Self::Spray => "Position the AGROD over a yellow disease spot and click spray.",
            Self::InspectionTool => "Select an inspection tool to analyze coconut tree maturity and harvest readiness.",
            Self::CoconutInspection => "Move the AGROD to each coconut tree and press the inspection button to check its maturity level.",
            Self::MaturityLevels => "Tree maturity is shown with colors: blue (immature), orange (mature), green (ready for harvest).",
            Self::CoconutCount => "The analysis provides the estimated number of coconuts on each tree.",
        }
    }
}

/// Milestones the hint decision tree reads. `moved_drone` and
/// `sprayed_pesticide` are recorded but never consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub uploaded_image: bool,
    pub ran_analysis: bool,
    pub activated_simulation: bool,
    pub selected_pesticide: bool,
    pub moved_drone: bool,
    pub sprayed_pesticide: bool,
}

/// Analysis facts the decision tree needs besides progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HintContext {
    pub crop: CropType,
    pub healthy: bool,
    pub maturity_analysis: bool,
}

#[derive(Debug)]
pub struct HintEngine {
    rng: StdRng,
}

impl HintEngine {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_hint(&mut self, progress: &Progress, context: &HintContext) -> String {
        if !progress.uploaded_image {
            return HintKey::Upload.text().to_string();
        }

        if !progress.ran_analysis {
            let mut message = join(&[HintKey::Analysis, HintKey::CropType]);
            if context.crop == CropType::Coconut {
                message.push(' ');
                message.push_str(HintKey::CoconutMaturity.text());
            }
            return message;
        }

        if !progress.activated_simulation && (!context.healthy || context.maturity_analysis) {
            return HintKey::Simulation.text().to_string();
        }

        if progress.activated_simulation && !progress.selected_pesticide {
            let key = if context.maturity_analysis {
                HintKey::InspectionTool
            } else {
                HintKey::Pesticide
            };
            return key.text().to_string();
        }

        if progress.activated_simulation && progress.selected_pesticide {
            let follow_up = if context.maturity_analysis {
                if self.rng.gen_bool(0.5) {
                    HintKey::CoconutInspection
                } else {
                    HintKey::MaturityLevels
                }
            } else {
                HintKey::Spray
            };
            return join(&[HintKey::DroneControls, follow_up]);
        }

        let index = self.rng.gen_range(0..HintKey::ALL.len());
        HintKey::ALL[index].text().to_string()
    }
}

fn join(keys: &[HintKey]) -> String {
    keys.iter()
        .map(|key| key.text())
        .collect::<Vec<_>>()
        .join(" ")
}
