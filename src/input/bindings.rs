use bracket_terminal::prelude::{BTerm, VirtualKeyCode};

use super::Key;

pub fn key_for(code: VirtualKeyCode) -> Option<Key> {
    match code {
        VirtualKeyCode::Left | VirtualKeyCode::A => Some(Key::Left),
        VirtualKeyCode::Right | VirtualKeyCode::D => Some(Key::Right),
        VirtualKeyCode::Up | VirtualKeyCode::W => Some(Key::Up),
        VirtualKeyCode::Down | VirtualKeyCode::S => Some(Key::Down),
        VirtualKeyCode::Space | VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter => {
            Some(Key::Confirm)
        }
        VirtualKeyCode::Escape => Some(Key::Cancel),
        _ => None,
    }
}

/// Keys held this frame. The terminal backend only reports the key delivered
/// this frame (auto-repeat keeps it alive while held), so the set has at most one entry.
pub fn held_keys(ctx: &BTerm) -> Vec<Key> {
    ctx.key.and_then(key_for).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_share_directions() {
        assert_eq!(key_for(VirtualKeyCode::A), Some(Key::Left));
        assert_eq!(key_for(VirtualKeyCode::Left), Some(Key::Left));
        assert_eq!(key_for(VirtualKeyCode::W), Some(Key::Up));
        assert_eq!(key_for(VirtualKeyCode::Return), Some(Key::Confirm));
        assert_eq!(key_for(VirtualKeyCode::Escape), Some(Key::Cancel));
        assert_eq!(key_for(VirtualKeyCode::Tab), None);
    }
}
