use skiff_proto::Direction;
use std::collections::HashSet;

use crate::intent::Intent;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Other(String),
}

impl Key {
    /// Accepts DOM key codes (`KeyW`, `Space`) and bare letters.
    pub fn parse(code: &str) -> Self {
        match code {
            "KeyW" | "w" | "W" => Key::W,
            "KeyA" | "a" | "A" => Key::A,
            "KeyS" | "s" | "S" => Key::S,
            "KeyD" | "d" | "D" => Key::D,
            "Space" | "space" | " " => Key::Space,
            other => Key::Other(other.to_string()),
        }
    }

    /// Camera binding for this key, one step of `step` per key-down edge.
    pub fn intent(&self, step: u8) -> Option<Intent> {
        let direction = match self {
            Key::W => Direction::Up,
            Key::S => Direction::Down,
            Key::A => Direction::Left,
            Key::D => Direction::Right,
            Key::Space => return Some(Intent::Center),
            Key::Other(_) => return None,
        };
        Some(Intent::Camera { direction, step })
    }
}

/// Keys currently held; auto-repeat key-downs are not new edges.
#[derive(Debug, Default)]
pub struct PressedKeys {
    held: HashSet<Key>,
}

impl PressedKeys {
    /// True only on the first key-down since the last key-up.
    pub fn down(&mut self, key: &Key) -> bool {
        self.held.insert(key.clone())
    }

    pub fn up(&mut self, key: &Key) {
        self.held.remove(key);
    }

    pub fn is_held(&self, key: &Key) -> bool {
        self.held.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_keydown_is_an_edge() {
        let mut keys = PressedKeys::default();
        assert!(keys.down(&Key::W));
        assert!(!keys.down(&Key::W));
        assert!(keys.is_held(&Key::W));
        keys.up(&Key::W);
        assert!(keys.down(&Key::W));
    }

    #[test]
    fn bindings() {
        assert_eq!(Key::parse("KeyA").intent(2), Some(Intent::Camera { direction: Direction::Left, step: 2 }));
        assert_eq!(Key::parse("Space").intent(2), Some(Intent::Center));
        assert_eq!(Key::parse("KeyQ").intent(2), None);
    }
}
