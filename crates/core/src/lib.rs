//! Crop disease detection and drone field simulation state, shared by the
//! terminal and browser front ends.
//!
//! Nothing in this crate performs I/O or reads a clock. Callers pass time
//! as a [`std::time::Duration`] since session start and seed the hint RNG.

pub mod animation;
pub mod controller;
pub mod hints;
pub mod model;
pub mod notify;
pub mod raster;
pub mod simulation;
pub mod view;

pub use controller::{DetectionController, SimulationToggle};
pub use model::{CropType, DetectionRequest, DetectionResult, FieldData, UploadedImage};
pub use notify::{Level, Notice, Notices};
pub use raster::Raster;
pub use simulation::{FieldCollaborator, FieldSimulation, Scene, Shape, SimKey};

/// The controller with the field simulation attached.
pub type Session = DetectionController<FieldSimulation>;

impl Session {
    pub fn with_simulation(crop: CropType, hint_seed: u64) -> Self {
        Self::new(Some(FieldSimulation::new()), crop, hint_seed)
    }
}
