use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use tracing::warn;

use super::Key;

/// One entry per frame: a held key, or `None` for an idle frame.
pub struct ScriptedInput {
    frames: Vec<Option<Key>>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut frames = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            for ch in trimmed.chars().filter(|ch| !ch.is_whitespace()) {
                match char_to_frame(ch) {
                    Some(frame) => frames.push(frame),
                    None => warn!("unknown key in script: {ch:?}"),
                }
            }
        }
        Ok(Self { frames, cursor: 0 })
    }

    /// Held keys for the next frame, or `None` once the script is exhausted.
    pub fn next_frame(&mut self) -> Option<Vec<Key>> {
        let frame = self.frames.get(self.cursor)?;
        self.cursor += 1;
        Some(frame.iter().copied().collect())
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }
}

fn char_to_frame(c: char) -> Option<Option<Key>> {
    match c {
        'w' | 'W' => Some(Some(Key::Up)),
        'a' | 'A' => Some(Some(Key::Left)),
        's' | 'S' => Some(Some(Key::Down)),
        'd' | 'D' => Some(Some(Key::Right)),
        'e' | 'E' => Some(Some(Key::Confirm)),
        'q' | 'Q' | '\x1B' => Some(Some(Key::Cancel)),
        '.' => Some(None),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let script = "# walk into the grass\n\ndd..\n  e q\n";
        let mut input = ScriptedInput::from_reader(script.as_bytes()).expect("script");
        assert_eq!(input.next_frame(), Some(vec![Key::Right]));
        assert_eq!(input.next_frame(), Some(vec![Key::Right]));
        assert_eq!(input.next_frame(), Some(vec![]));
        assert_eq!(input.next_frame(), Some(vec![]));
        assert_eq!(input.next_frame(), Some(vec![Key::Confirm]));
        assert_eq!(input.next_frame(), Some(vec![Key::Cancel]));
        assert!(input.is_finished());
        assert_eq!(input.next_frame(), None);
    }
}
