use std::fmt::Display;
use std::time::Duration;

use crate::hints::{HintContext, HintEngine, Progress};
use crate::model::{CropType, DetectionRequest, DetectionResult, UploadedImage};
use crate::notify::{Level, Notices};
use crate::simulation::{
    FieldCollaborator, FieldSimulation, KeyOutcome, SimKey, SprayOutcome, CONGRATULATION_DELAY,
};
use crate::view::{self, DiagnosisView, SimulationCopy, ToolSelector};

pub const MISSING_IMAGE_WARNING: &str = "Please upload an image first";
pub const HINT_CAPTION: &str = "Need a hint?";
pub const HINT_AGAIN_CAPTION: &str = "Click for another hint";

/// State of the simulation enable switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationToggle {
    pub enabled: bool,
    pub checked: bool,
}

/// Owns the upload, analysis and result state and drives the optional
/// field collaborator.
#[derive(Debug)]
pub struct DetectionController<F: FieldCollaborator> {
    crop: CropType,
    image: Option<UploadedImage>,
    busy: bool,
    result: Option<DetectionResult>,
    diagnosis: Option<DiagnosisView>,
    selector: ToolSelector,
    simulation_copy: SimulationCopy,
    toggle: SimulationToggle,
    progress: Progress,
    hints: HintEngine,
    hint_used: bool,
    notices: Notices,
    field: Option<F>,
}

impl<F: FieldCollaborator> DetectionController<F> {
    pub fn new(field: Option<F>, crop: CropType, hint_seed: u64) -> Self {
        Self {
            crop,
            image: None,
            busy: false,
            result: None,
            diagnosis: None,
            selector: ToolSelector::default(),
            simulation_copy: SimulationCopy::TREATMENT,
            toggle: SimulationToggle::default(),
            progress: Progress::default(),
            hints: HintEngine::with_seed(hint_seed),
            hint_used: false,
            notices: Notices::new(),
            field,
        }
    }

    pub const fn crop(&self) -> CropType {
        self.crop
    }

    pub const fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    pub const fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    pub const fn diagnosis(&self) -> Option<&DiagnosisView> {
        self.diagnosis.as_ref()
    }

    pub const fn selector(&self) -> &ToolSelector {
        &self.selector
    }

    pub const fn simulation_copy(&self) -> SimulationCopy {
        self.simulation_copy
    }

    pub const fn toggle(&self) -> SimulationToggle {
        self.toggle
    }

    pub const fn progress(&self) -> Progress {
        self.progress
    }

    pub const fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    pub const fn field(&self) -> Option<&F> {
        self.field.as_ref()
    }

    pub fn field_mut(&mut self) -> Option<&mut F> {
        self.field.as_mut()
    }

    /// The hint trigger only appears once a result has been shown.
    pub const fn hint_available(&self) -> bool {
        self.diagnosis.is_some()
    }

    pub const fn hint_caption(&self) -> &'static str {
        if self.hint_used {
            HINT_AGAIN_CAPTION
        } else {
            HINT_CAPTION
        }
    }

    pub fn select_crop(&mut self, crop: CropType) {
        self.crop = crop;
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn cycle_crop(&mut self, step: isize) {
        let len = CropType::ALL.len() as isize;
        let next = (self.crop.index() as isize + step).rem_euclid(len) as usize;
        if let Some(crop) = CropType::from_index(next) {
            self.crop = crop;
        }
    }

    /// Replaces the uploaded image and clears everything derived from the
    /// previous one.
    pub fn upload_image(&mut self, image: UploadedImage) {
        tracing::info!(file = %image.file_name, bytes = image.byte_len, "image uploaded");

        if self.toggle.checked {
            if let Some(field) = self.field.as_mut() {
                field.stop();
            }
        }

        self.image = Some(image);
        self.diagnosis = None;
        self.result = None;
        self.toggle = SimulationToggle {
            enabled: false,
            checked: false,
        };
        self.progress.uploaded_image = true;
        self.progress.ran_analysis = false;
        self.progress.activated_simulation = false;
    }

    /// Returns the request to post, or `None` when there is nothing to
    /// analyze or a request is already in flight.
    pub fn begin_analysis(&mut self, now: Duration) -> Option<DetectionRequest> {
        if self.busy {
            return None;
        }

        let Some(image) = self.image.as_ref() else {
            tracing::warn!("analysis requested without an image");
            self.notices.post(MISSING_IMAGE_WARNING, Level::Warning, now);
            return None;
        };

        self.busy = true;
        tracing::info!(crop = self.crop.as_str(), "analysis started");
        Some(DetectionRequest {
            image: image.data_uri.clone(),
            crop_type: self.crop,
        })
    }

    pub fn finish_analysis<E: Display>(&mut self, outcome: Result<DetectionResult, E>, now: Duration) {
        self.busy = false;
        match outcome {
            Ok(result) => {
                tracing::info!(diseases = ?result.diseases, "analysis finished");
                self.process_results(result);
            }
            Err(error) => {
                tracing::warn!(%error, "analysis failed");
                self.notices
                    .post(format!("Error analyzing image: {error}"), Level::Danger, now);
            }
        }
    }

    pub fn process_results(&mut self, result: DetectionResult) {
        let rendering = view::render_result(&result);

        if let Some(selector) = rendering.selector {
            self.selector = selector;
            self.progress.selected_pesticide = false;
        }
        if let Some(copy) = rendering.simulation_copy {
            self.simulation_copy = copy;
        }

        self.toggle.enabled = rendering.simulation_enabled;
        if !self.toggle.enabled && self.toggle.checked {
            self.toggle.checked = false;
            self.progress.activated_simulation = false;
            if let Some(field) = self.field.as_mut() {
                field.stop();
            }
        }

        self.diagnosis = Some(rendering.diagnosis);
        self.progress.ran_analysis = true;

        if let Some(field) = self.field.as_mut() {
            field.initialize(result.field_data.as_ref());
        }
        self.result = Some(result);
    }

    /// Flips the simulation switch. Returns whether the change took effect.
    pub fn set_simulation(&mut self, enabled: bool) -> bool {
        if !self.toggle.enabled || self.toggle.checked == enabled {
            return false;
        }

        self.toggle.checked = enabled;
        self.progress.activated_simulation = enabled;
        if let Some(field) = self.field.as_mut() {
            if enabled {
                field.start();
            } else {
                field.stop();
            }
        }
        tracing::debug!(enabled, "simulation toggled");
        true
    }

    pub fn select_tool(&mut self, index: Option<usize>) {
        self.selector.select(index);
        self.progress.selected_pesticide = self.selector.selected.is_some();
    }

    pub fn cycle_tool(&mut self, step: isize) {
        self.selector.cycle(step);
        self.progress.selected_pesticide = self.selector.selected.is_some();
    }

    pub fn request_hint(&mut self, now: Duration) -> String {
        let context = HintContext {
            crop: self.crop,
            healthy: self.result.as_ref().is_some_and(DetectionResult::is_healthy),
            maturity_analysis: self
                .result
                .as_ref()
                .is_some_and(DetectionResult::is_maturity_analysis),
        };
        let hint = self.hints.next_hint(&self.progress, &context);
        self.notices.post(hint.clone(), Level::Info, now);
        self.hint_used = true;
        hint
    }

    pub fn tick(&mut self, now: Duration) {
        self.notices.tick(now);
    }

    /// Whether the drone panel is showing, i.e. the switch is on and a
    /// field is attached.
    pub const fn simulation_running(&self) -> bool {
        self.toggle.checked && self.field.is_some()
    }
}

impl DetectionController<FieldSimulation> {
    pub fn move_drone(&mut self, dx: i32, dy: i32) -> bool {
        let moved = self
            .field
            .as_mut()
            .is_some_and(|field| field.move_drone(dx, dy));
        if moved {
            self.progress.moved_drone = true;
        }
        moved
    }

    pub fn spray(&mut self, now: Duration) -> SprayOutcome {
        let tool = self.selector.selected_value().map(ToString::to_string);
        let outcome = match self.field.as_mut() {
            Some(field) => field.spray(tool.as_deref()),
            None => SprayOutcome::Inactive,
        };
        self.report_spray(&outcome, now);
        outcome
    }

    /// Routes a drone key. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: SimKey, now: Duration) -> bool {
        let tool = self.selector.selected_value().map(ToString::to_string);
        let Some(field) = self.field.as_mut() else {
            return false;
        };

        let (outcome, spray) = field.handle_key(key, tool.as_deref());
        if outcome == KeyOutcome::Moved {
            self.progress.moved_drone = true;
        }
        if let Some(spray) = spray {
            self.report_spray(&spray, now);
        }
        outcome.consumed()
    }

    pub fn advance_frame(&mut self) {
        if let Some(field) = self.field.as_mut() {
            field.advance_frame();
        }
    }

    fn report_spray(&mut self, outcome: &SprayOutcome, now: Duration) {
        if matches!(outcome, SprayOutcome::Treated { .. }) {
            self.progress.sprayed_pesticide = true;
        }
        if let Some((level, message)) = outcome.message() {
            self.notices.post(message, level, now);
        }
        if let Some((level, message)) = outcome.delayed_message() {
            self.notices
                .post_later(message, level, now, CONGRATULATION_DELAY);
        }
    }
}
