//! Plain-text presentation for interactive play.

use synapse_core::{Colour, Outcome, Side, Stimulus};
use synapse_experiment::{DualNBack, Exercise, MatchMarks, StroopFocus, TaskSwitch, TrialCue};

/// Per-exercise rendering and input parsing for the terminal front end.
pub trait TerminalPrompt: Exercise {
    fn instructions(&self, level: u32) -> String;

    fn render(&self, cue: &TrialCue<Self::Stimulus>) -> String;

    /// `None` when the line is not a valid answer for this exercise.
    fn parse(&self, line: &str) -> Option<Self::Response>;
}

fn header<S>(cue: &TrialCue<S>) -> String {
    let (trial, total) = cue.progress();
    format!(
        "Trial {trial}/{total} · level {} · {:.1} sec",
        cue.settings.level,
        cue.time_limit().as_secs_f64()
    )
}

impl TerminalPrompt for DualNBack {
    fn instructions(&self, level: u32) -> String {
        format!(
            "Mark whether the lit cell and the letter match the cue {level} back.\n\
             Type p (position), l (letter), pl (both) or just press enter for neither."
        )
    }

    fn render(&self, cue: &TrialCue<Self::Stimulus>) -> String {
        let size = self.config().grid_size;
        let mut out = header(cue);
        for row in 0..size {
            out.push_str("\n   ");
            for col in 0..size {
                let cell = row * size + col;
                if cell == cue.trial.stimulus.cell {
                    out.push(' ');
                    out.push(cue.trial.stimulus.letter);
                } else {
                    out.push_str(" ·");
                }
            }
        }
        out
    }

    fn parse(&self, line: &str) -> Option<MatchMarks> {
        let line = line.trim().to_ascii_lowercase();
        if !line.chars().all(|c| matches!(c, 'p' | 'l' | ' ')) {
            return None;
        }
        Some(MatchMarks {
            position: line.contains('p'),
            letter: line.contains('l'),
        })
    }
}

fn paint(text: &str, colour: Colour) -> String {
    let [r, g, b, _] = colour.rgba();
    format!("\x1b[1;38;2;{r};{g};{b}m{text}\x1b[0m")
}

impl TerminalPrompt for StroopFocus {
    fn instructions(&self, level: u32) -> String {
        let names: Vec<&str> = self.palette(level).iter().map(|c| c.name()).collect();
        format!(
            "Name the ink colour, not the word.\nColours: {} (a leading letter is enough).",
            names.join(", ")
        )
    }

    fn render(&self, cue: &TrialCue<Self::Stimulus>) -> String {
        let word = cue.trial.stimulus.word.name().to_ascii_uppercase();
        format!("{}\n   {}", header(cue), paint(&word, cue.trial.stimulus.ink))
    }

    fn parse(&self, line: &str) -> Option<Option<Colour>> {
        Colour::parse(line).map(Some)
    }
}

impl TerminalPrompt for TaskSwitch {
    fn instructions(&self, _level: u32) -> String {
        "Judge the letter or the number, whichever the rule names.\n\
         Type l for the left answer or r for the right answer."
            .to_string()
    }

    fn render(&self, cue: &TrialCue<Self::Stimulus>) -> String {
        let prompt = &cue.trial.stimulus;
        format!(
            "{}\n   {}  {}{}\n   [l] {}   [r] {}",
            header(cue),
            prompt.rule.question(),
            prompt.letter,
            prompt.number,
            prompt.rule.side_label(Side::Left),
            prompt.rule.side_label(Side::Right)
        )
    }

    fn parse(&self, line: &str) -> Option<Option<Side>> {
        match line.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Some(Some(Side::Left)),
            "r" | "right" => Some(Some(Side::Right)),
            _ => None,
        }
    }
}

/// One-line verdict shown after a trial is scored.
pub fn feedback<S: Stimulus>(stimulus: &S, outcome: &Outcome) -> String {
    if outcome.timed_out {
        format!("  ✗ time's up ({})", stimulus.display())
    } else if outcome.all_correct() {
        format!("  ✓ correct in {:.0} ms", outcome.response_ms)
    } else {
        format!(
            "  ✗ {}/{} correct ({})",
            outcome.correct_count(),
            outcome.scores.len(),
            stimulus.display()
        )
    }
}
