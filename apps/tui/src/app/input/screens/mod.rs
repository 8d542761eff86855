use crate::app::state::{App, InputState};
use crossterm::event::KeyCode;

mod help;
mod main;
mod path;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    match app.input_state {
        InputState::EnteringPath => path::handle_path_input(app, key),
        InputState::WaitingForCommand => main::handle_main_input(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrod_tui::config::config_from;

    fn app() -> App {
        let config = config_from(|_| None).unwrap_or_else(|e| panic!("default config: {e}"));
        App::new(&config, 1)
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            dispatch_input(app, *key);
        }
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = app();
        press(&mut app, &[KeyCode::F(1), KeyCode::Char('q')]);
        assert!(app.show_help);
        assert!(app.running);

        press(&mut app, &[KeyCode::Esc, KeyCode::Char('q')]);
        assert!(!app.show_help);
        assert!(!app.running);
    }

    #[test]
    fn path_prompt_collects_characters() {
        let mut app = app();
        press(
            &mut app,
            &[
                KeyCode::Char('o'),
                KeyCode::Char('a'),
                KeyCode::Char('b'),
                KeyCode::Backspace,
                KeyCode::Char('q'),
            ],
        );
        assert_eq!(app.input_state, InputState::EnteringPath);
        assert_eq!(app.current_input, "aq");
        assert!(app.running);

        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.input_state, InputState::WaitingForCommand);
        assert!(app.current_input.is_empty());
    }

    #[test]
    fn crop_key_cycles_crop_type() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('c')]);
        assert_eq!(app.session.crop(), agrod_core::CropType::Coconut);
        press(&mut app, &[KeyCode::Char('c')]);
        assert_eq!(app.session.crop(), agrod_core::CropType::Cotton);
    }

    #[test]
    fn drone_keys_fall_through_when_simulation_is_off() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char(' '), KeyCode::Left]);
        assert!(app.session.notices().is_empty());
        assert!(app.running);
    }
}
