use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines stimuli and their display payload
pub trait Stimulus: Clone + Send + Sync + std::fmt::Debug {
    /// Human readable form used by transcripts and terminal front ends.
    fn display(&self) -> String;
}

/// Stroop colour pool. Levels use a prefix of `Colour::POOL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Colour {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl Colour {
    pub const POOL: [Colour; 6] = [
        Colour::Red,
        Colour::Blue,
        Colour::Green,
        Colour::Yellow,
        Colour::Purple,
        Colour::Orange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Colour::Red => "Red",
            Colour::Blue => "Blue",
            Colour::Green => "Green",
            Colour::Yellow => "Yellow",
            Colour::Purple => "Purple",
            Colour::Orange => "Orange",
        }
    }

    pub fn rgba(self) -> [u8; 4] {
        match self {
            Colour::Red => [0xd9, 0x41, 0x41, 255],
            Colour::Blue => [0x2c, 0x7b, 0xe5, 255],
            Colour::Green => [0x28, 0xa7, 0x45, 255],
            Colour::Yellow => [0xf6, 0xc3, 0x43, 255],
            Colour::Purple => [0x9b, 0x51, 0xe0, 255],
            Colour::Orange => [0xf2, 0x99, 0x4a, 255],
        }
    }

    /// Case-insensitive lookup by name or leading letter.
    pub fn parse(input: &str) -> Option<Colour> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        Self::POOL.into_iter().find(|c| {
            c.name().eq_ignore_ascii_case(input)
                || (input.len() == 1 && c.name()[..1].eq_ignore_ascii_case(input))
        })
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dual n-back cue: one lit grid cell plus one letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLetter {
    pub cell: u8,
    pub letter: char,
}

impl Stimulus for GridLetter {
    fn display(&self) -> String {
        format!("Cell {} · {}", self.cell + 1, self.letter)
    }
}

/// Stroop cue: a colour word printed in a (different) ink colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColourWord {
    pub word: Colour,
    pub ink: Colour,
}

impl Stimulus for ColourWord {
    fn display(&self) -> String {
        format!("{} in {}", self.word.name().to_uppercase(), self.ink)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn from_left(left: bool) -> Self {
        if left { Side::Left } else { Side::Right }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Task-switch rules. Each maps the shared prompt to a left/right answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwitchRule {
    Letter,
    Number,
}

impl SwitchRule {
    pub fn label(self) -> &'static str {
        match self {
            SwitchRule::Letter => "Letter rule",
            SwitchRule::Number => "Number rule",
        }
    }

    pub fn question(self) -> &'static str {
        match self {
            SwitchRule::Letter => "Is the letter a vowel?",
            SwitchRule::Number => "Is the number odd?",
        }
    }

    pub fn side_label(self, side: Side) -> &'static str {
        match (self, side) {
            (SwitchRule::Letter, Side::Left) => "Vowel",
            (SwitchRule::Letter, Side::Right) => "Consonant",
            (SwitchRule::Number, Side::Left) => "Odd",
            (SwitchRule::Number, Side::Right) => "Even",
        }
    }

    /// True when the rule's answer is the left option.
    pub fn evaluate(self, letter: char, number: u8) -> bool {
        match self {
            SwitchRule::Letter => matches!(letter.to_ascii_uppercase(), 'A' | 'E' | 'I' | 'O' | 'U'),
            SwitchRule::Number => number % 2 == 1,
        }
    }
}

/// Task-switch cue: a letter/number pair judged under the active rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePrompt {
    pub rule: SwitchRule,
    pub letter: char,
    pub number: u8,
}

impl RulePrompt {
    pub fn correct_side(&self) -> Side {
        Side::from_left(self.rule.evaluate(self.letter, self.number))
    }
}

impl Stimulus for RulePrompt {
    fn display(&self) -> String {
        format!("{}{} ({})", self.letter, self.number, self.rule.label())
    }
}
