use agrod_core::animation::{AnimationMode, FrameClock};
use agrod_core::{DetectionRequest, Level, Session};
use agrod_tui::upload::load_image;
use agrod_tui::AppConfig;
use std::path::Path;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    WaitingForCommand,
    EnteringPath,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub session: Session,
    pub input_state: InputState,
    pub current_input: String,
    pub status_message: String,
    pub show_help: bool,
    pub throbber: ThrobberState,
    /// Request waiting for the event loop to send it.
    pub pending_request: Option<DetectionRequest>,
    pub endpoint: String,
    started: Instant,
    frame_clock: FrameClock,
}

impl App {
    pub fn new(config: &AppConfig, seed: u64) -> Self {
        Self {
            running: true,
            session: Session::with_simulation(config.crop, seed),
            input_state: InputState::WaitingForCommand,
            current_input: String::new(),
            status_message: String::new(),
            show_help: false,
            throbber: ThrobberState::default(),
            pending_request: None,
            endpoint: config.endpoint.clone(),
            started: Instant::now(),
            frame_clock: FrameClock::default(),
        }
    }

    /// Time since the session started.
    pub fn now(&self) -> Duration {
        self.started.elapsed()
    }

    /// Per-loop housekeeping before a draw: notice expiry and the spinner.
    pub fn update(&mut self) {
        let now = self.now();
        self.session.tick(now);

        if self.session.is_busy() {
            self.throbber.calc_next();
        }
    }

    /// Steps the spray animation once the current frame is on screen.
    pub fn advance_animation(&mut self) {
        let now = self.now();
        self.advance_animation_to(now);
    }

    fn advance_animation_to(&mut self, now: Duration) {
        let mode = if self.session.simulation_running() {
            AnimationMode::Running
        } else {
            AnimationMode::Paused
        };
        for _ in 0..self.frame_clock.advance(now, mode) {
            self.session.advance_frame();
        }
    }

    pub fn open_path_prompt(&mut self) {
        self.input_state = InputState::EnteringPath;
        self.current_input.clear();
    }

    pub fn cancel_path_prompt(&mut self) {
        self.input_state = InputState::WaitingForCommand;
        self.current_input.clear();
    }

    /// Loads the typed path. An empty path is a no-op.
    pub fn submit_path(&mut self) {
        let typed = self.current_input.trim().to_string();
        self.cancel_path_prompt();
        if typed.is_empty() {
            return;
        }

        match load_image(Path::new(&typed)) {
            Ok(image) => {
                self.status_message = format!(
                    "Loaded {} ({} KB)",
                    image.file_name,
                    image.byte_len.div_ceil(1024)
                );
                self.session.upload_image(image);
            }
            Err(e) => {
                tracing::warn!(error = %e, "image upload failed");
                let now = self.now();
                self.session.notices_mut().post(e.to_string(), Level::Danger, now);
            }
        }
    }

    pub fn request_analysis(&mut self) {
        let now = self.now();
        if let Some(request) = self.session.begin_analysis(now) {
            self.pending_request = Some(request);
        }
    }

    pub fn toggle_simulation(&mut self) {
        let enable = !self.session.toggle().checked;
        if !self.session.set_simulation(enable) {
            self.status_message = "Simulation is not available for this result".to_string();
            return;
        }
        self.status_message = if enable {
            "Simulation running: arrows move the drone, space sprays".to_string()
        } else {
            "Simulation stopped".to_string()
        };
    }

    pub fn request_hint(&mut self) {
        let now = self.now();
        self.session.request_hint(now);
    }

    pub fn dismiss_newest_notice(&mut self) {
        if let Some(id) = self.session.notices().active().first().map(|notice| notice.id) {
            self.session.notices_mut().dismiss(id);
        }
    }
}
