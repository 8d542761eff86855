use crate::app::input::helpers::sim_key;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_main_input(app: &mut App, key: KeyCode) {
    if app.session.simulation_running() {
        if let Some(sim_key) = sim_key(key) {
            let now = app.now();
            if app.session.handle_key(sim_key, now) {
                return;
            }
        }
    }

    match key {
        KeyCode::Char('o') => app.open_path_prompt(),
        KeyCode::Char('c') => {
            app.session.cycle_crop(1);
            app.status_message = format!("Crop type: {}", app.session.crop().label());
        }
        KeyCode::Char('a') => app.request_analysis(),
        KeyCode::Char('s') => app.toggle_simulation(),
        KeyCode::Char('t') => app.session.cycle_tool(1),
        KeyCode::Char('T') => app.session.cycle_tool(-1),
        KeyCode::Char('h') => app.request_hint(),
        KeyCode::Char('x') => app.dismiss_newest_notice(),
        KeyCode::Char('q') => {
            app.running = false;
        }
        _ => {}
    }
}
