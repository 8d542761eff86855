use agrod_core::DetectionResult;
use agrod_tui::ClientError;
use std::convert::TryFrom;
use std::fmt;

use crate::app::App;

// Lifecycle of the one in-flight detection request
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AnalysisState {
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Requesting => write!(f, "Requesting"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug)]
pub enum AnalysisEvent {
    Start,
    Success(Box<DetectionResult>),
    Error(ClientError),
    Reset,
}

impl AnalysisEvent {
    const fn name(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Success(_) => "Success",
            Self::Error(_) => "Error",
            Self::Reset => "Reset",
        }
    }
}

impl From<Result<DetectionResult, ClientError>> for AnalysisEvent {
    fn from(outcome: Result<DetectionResult, ClientError>) -> Self {
        match outcome {
            Ok(result) => Self::Success(Box::new(result)),
            Err(error) => Self::Error(error),
        }
    }
}

#[derive(Debug)]
pub struct StateTransitionError {
    from: AnalysisState,
    event: &'static str,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

pub struct AnalysisMachine {
    state: AnalysisState,
}

impl AnalysisMachine {
    pub const fn new() -> Self {
        Self {
            state: AnalysisState::Idle,
        }
    }

    pub const fn state(&self) -> AnalysisState {
        self.state
    }

    // Apply an event to the machine and the app
    pub fn process_event(
        &mut self,
        event: AnalysisEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(AnalysisState);

impl TryFrom<(AnalysisState, AnalysisEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (AnalysisState, AnalysisEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (AnalysisState::Idle, AnalysisEvent::Start) => {
                let file = app
                    .session
                    .image()
                    .map_or("image", |image| image.file_name.as_str());
                app.status_message = format!("Analyzing {file} via {}", app.endpoint);
                Ok(Self(AnalysisState::Requesting))
            }
            (AnalysisState::Requesting, AnalysisEvent::Success(result)) => {
                let now = app.now();
                app.session.finish_analysis::<ClientError>(Ok(*result), now);
                app.status_message = "Analysis complete".to_string();
                Ok(Self(AnalysisState::Succeeded))
            }
            (AnalysisState::Requesting, AnalysisEvent::Error(error)) => {
                let now = app.now();
                app.session.finish_analysis(Err(error), now);
                app.status_message = "Analysis failed".to_string();
                Ok(Self(AnalysisState::Failed))
            }
            (AnalysisState::Succeeded | AnalysisState::Failed, AnalysisEvent::Reset) => {
                Ok(Self(AnalysisState::Idle))
            }
            (from, event) => Err(StateTransitionError {
                from,
                event: event.name(),
            }),
        }
    }
}
