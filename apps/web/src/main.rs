mod detect;
mod picker;
mod view;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use agrod_core::animation::{AnimationMode, FrameClock};
use agrod_core::{CropType, Session, SimKey};
use ratzilla::event::KeyCode;
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;

/// Milliseconds from `performance.now()`, as session time.
pub fn now() -> Duration {
    let millis = web_sys::window()
        .and_then(|window| window.performance())
        .map_or(0.0, |performance| performance.now());
    Duration::from_secs_f64(millis.max(0.0) / 1000.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hint_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

fn main() -> io::Result<()> {
    let session = Rc::new(RefCell::new(Session::with_simulation(
        CropType::default(),
        hint_seed(),
    )));
    let show_help = Rc::new(RefCell::new(false));

    let picker = match picker::install(session.clone()) {
        Ok(input) => Some(input),
        Err(error) => {
            web_sys::console::error_1(&error);
            None
        }
    };

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let session = session.clone();
        let show_help = show_help.clone();
        move |event| handle_key(event.code, &session, &show_help, picker.as_ref())
    });

    let mut frame_clock = FrameClock::default();
    terminal.draw_web(move |f| {
        let now = now();
        session.borrow_mut().tick(now);
        view::render(&session.borrow(), *show_help.borrow(), f);

        // Spray frames advance only after the current one has been drawn.
        let mut session = session.borrow_mut();
        let mode = if session.simulation_running() {
            AnimationMode::Running
        } else {
            AnimationMode::Paused
        };
        for _ in 0..frame_clock.advance(now, mode) {
            session.advance_frame();
        }
    });

    Ok(())
}

fn sim_key(code: &KeyCode) -> Option<SimKey> {
    match code {
        KeyCode::Up => Some(SimKey::Up),
        KeyCode::Down => Some(SimKey::Down),
        KeyCode::Left => Some(SimKey::Left),
        KeyCode::Right => Some(SimKey::Right),
        KeyCode::Char(' ') => Some(SimKey::Space),
        _ => None,
    }
}

fn handle_key(
    code: KeyCode,
    session: &Rc<RefCell<Session>>,
    show_help: &Rc<RefCell<bool>>,
    picker: Option<&HtmlInputElement>,
) {
    if matches!(code, KeyCode::F(1)) || (*show_help.borrow() && matches!(code, KeyCode::Esc)) {
        let mut help = show_help.borrow_mut();
        *help = !*help;
        return;
    }

    let now = now();
    if session.borrow().simulation_running() {
        if let Some(key) = sim_key(&code) {
            if session.borrow_mut().handle_key(key, now) {
                return;
            }
        }
    }

    match code {
        KeyCode::Char('o') => {
            if let Some(input) = picker {
                input.click();
            }
        }
        KeyCode::Char('c') => session.borrow_mut().cycle_crop(1),
        KeyCode::Char('a') => {
            let request = session.borrow_mut().begin_analysis(now);
            if let Some(request) = request {
                spawn_local(analyze(request, session.clone()));
            }
        }
        KeyCode::Char('s') => {
            let mut session = session.borrow_mut();
            let enable = !session.toggle().checked;
            session.set_simulation(enable);
        }
        KeyCode::Char('t') => session.borrow_mut().cycle_tool(1),
        KeyCode::Char('T') => session.borrow_mut().cycle_tool(-1),
        KeyCode::Char('h') => {
            session.borrow_mut().request_hint(now);
        }
        KeyCode::Char('x') => {
            let mut session = session.borrow_mut();
            if let Some(id) = session.notices().active().first().map(|notice| notice.id) {
                session.notices_mut().dismiss(id);
            }
        }
        _ => {}
    }
}

async fn analyze(request: agrod_core::DetectionRequest, session: Rc<RefCell<Session>>) {
    let outcome = detect::detect(&request).await;
    if let Err(error) = &outcome {
        web_sys::console::error_1(&format!("Error analyzing image: {error}").into());
    }
    session.borrow_mut().finish_analysis(outcome, now());
}
