use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_path_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char(c) => app.current_input.push(c),
        KeyCode::Backspace => {
            app.current_input.pop();
        }
        KeyCode::Enter => app.submit_path(),
        KeyCode::Esc => app.cancel_path_prompt(),
        _ => {}
    }
}
