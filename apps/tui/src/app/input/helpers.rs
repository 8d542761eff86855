use agrod_core::SimKey;
use crossterm::event::KeyCode;

/// Keys the drone simulation claims while it runs.
pub const fn sim_key(key: KeyCode) -> Option<SimKey> {
    match key {
        KeyCode::Up => Some(SimKey::Up),
        KeyCode::Down => Some(SimKey::Down),
        KeyCode::Left => Some(SimKey::Left),
        KeyCode::Right => Some(SimKey::Right),
        KeyCode::Char(' ') => Some(SimKey::Space),
        _ => None,
    }
}
