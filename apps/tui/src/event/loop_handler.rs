use agrod_core::DetectionResult;
use agrod_tui::{ClientError, DetectClient};
use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use tokio::sync::mpsc;

use crate::app::{handle_input, App};
use crate::event::analysis::{AnalysisEvent, AnalysisMachine};
use crate::ui;

type Outcome = std::result::Result<DetectionResult, ClientError>;

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    client: DetectClient,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 16;

    let mut machine = AnalysisMachine::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();

    loop {
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }
        app.advance_animation();

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_))
                | Err(_) => {
                    // Ignore non-key events for now
                }
            }
        }

        // Hand a freshly requested analysis to a background task
        if let Some(request) = app.pending_request.take() {
            if let Err(e) = machine.process_event(AnalysisEvent::Start, app) {
                tracing::warn!(error = %e, "analysis request dropped");
                continue;
            }

            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = client.detect(&request).await;
                if tx.send(outcome).is_err() {
                    tracing::debug!("event loop gone before analysis finished");
                }
            });
        }

        while let Ok(outcome) = rx.try_recv() {
            if let Err(e) = machine.process_event(AnalysisEvent::from(outcome), app) {
                tracing::warn!(error = %e, "unexpected analysis result");
            }
            if let Err(e) = machine.process_event(AnalysisEvent::Reset, app) {
                tracing::debug!(error = %e, "analysis reset skipped");
            }
        }
    }

    Ok(())
}
