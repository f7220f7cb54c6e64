// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const MAX_INSTRUCTIONS_CHARS: usize = 500;
pub const WARNING_THRESHOLD_CHARS: usize = 450;

pub const INSTRUCTION_EXAMPLES: [&str; 3] = [
    "Prefers soft foods due to dentures",
    "Likes meals served warm, not hot",
    "No pork products for religious reasons",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthLevel {
    Normal,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Instructions {
    text: String,
}

impl Instructions {
    pub fn new(text: &str) -> Self {
        let mut instructions = Self::default();
        instructions.set_text(text);
        instructions
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn set_text(&mut self, value: &str) -> bool {
        let clamped = match value.char_indices().nth(MAX_INSTRUCTIONS_CHARS) {
            Some((cut, _)) => &value[..cut],
            None => value,
        };
        if clamped == self.text {
            return false;
        }
        self.text = clamped.to_owned();
        true
    }

    pub fn push_char(&mut self, ch: char) -> bool {
        if self.len() >= MAX_INSTRUCTIONS_CHARS {
            return false;
        }
        self.text.push(ch);
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.text.pop().is_some()
    }

    pub fn level(&self) -> LengthLevel {
        if self.len() >= WARNING_THRESHOLD_CHARS {
            LengthLevel::Warning
        } else {
            LengthLevel::Normal
        }
    }

    pub fn counter_label(&self) -> String {
        format!("{}/{}", self.len(), MAX_INSTRUCTIONS_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::{Instructions, LengthLevel, MAX_INSTRUCTIONS_CHARS};

    #[test]
    fn long_input_is_truncated_to_prefix() {
        let input: String = (0..600)
            .map(|index| char::from(b'a' + (index % 26) as u8))
            .collect();
        let mut instructions = Instructions::default();

        assert!(instructions.set_text(&input));
        assert_eq!(instructions.len(), MAX_INSTRUCTIONS_CHARS);
        assert_eq!(instructions.text(), &input[..500]);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let input = "ü".repeat(520);
        let instructions = Instructions::new(&input);
        assert_eq!(instructions.len(), 500);
        assert_eq!(instructions.text().len(), 1000);
    }

    #[test]
    fn push_char_stops_at_limit() {
        let mut instructions = Instructions::new(&"x".repeat(499));
        assert!(instructions.push_char('y'));
        assert!(!instructions.push_char('z'));
        assert_eq!(instructions.len(), 500);
        assert!(instructions.text().ends_with('y'));
    }

    #[test]
    fn backspace_removes_last_character() {
        let mut instructions = Instructions::new("warm");
        assert!(instructions.backspace());
        assert_eq!(instructions.text(), "war");

        let mut empty = Instructions::default();
        assert!(!empty.backspace());
    }

    #[test]
    fn unchanged_text_reports_no_change() {
        let mut instructions = Instructions::new("soft foods");
        assert!(!instructions.set_text("soft foods"));
        assert!(instructions.set_text(""));
        assert!(instructions.is_empty());
    }

    #[test]
    fn warning_level_starts_at_threshold() {
        assert_eq!(
            Instructions::new(&"x".repeat(449)).level(),
            LengthLevel::Normal
        );
        assert_eq!(
            Instructions::new(&"x".repeat(450)).level(),
            LengthLevel::Warning
        );
        assert_eq!(Instructions::new("abc").counter_label(), "3/500");
    }
}
