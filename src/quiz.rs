// ABOUTME: Quiz block model for deck slides
// ABOUTME: Tracks one-shot answer rounds, option marks and the feedback banner

use std::fmt;

/// Whether an answer was right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn class_name(&self) -> &'static str {
        match self {
            Verdict::Correct => "correct",
            Verdict::Incorrect => "incorrect",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Feedback copy shown after an answer.
#[derive(Debug, Clone)]
pub struct QuizMessages {
    pub correct: String,
    pub incorrect: String,
}

impl Default for QuizMessages {
    fn default() -> Self {
        Self {
            correct: "✅ Correct! This is the right approach. Always verify with the official source before taking any action.".to_string(),
            incorrect: "❌ Incorrect. Be cautious! Never click on links or provide personal information in response to unsolicited messages.".to_string(),
        }
    }
}

/// One clickable answer (`.quiz-option`).
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOption {
    pub label: String,
    /// Value of the `data-correct` attribute.
    pub correct: bool,
    pub enabled: bool,
    pub mark: Option<Verdict>,
}

impl QuizOption {
    pub fn new(label: impl Into<String>, correct: bool) -> Self {
        Self {
            label: label.into(),
            correct,
            enabled: true,
            mark: None,
        }
    }
}

/// The `.quiz-feedback` banner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feedback {
    pub text: String,
    pub verdict: Option<Verdict>,
    pub visible: bool,
}

impl Feedback {
    /// Class attribute as the stylesheet expects it.
    pub fn class_name(&self) -> String {
        match (self.verdict, self.visible) {
            (Some(verdict), true) => format!("quiz-feedback {} show", verdict),
            _ => "quiz-feedback".to_string(),
        }
    }
}

/// A quiz block: its options and feedback banner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quiz {
    pub options: Vec<QuizOption>,
    pub feedback: Feedback,
}

impl Quiz {
    pub fn new(options: Vec<QuizOption>) -> Self {
        Self {
            options,
            feedback: Feedback::default(),
        }
    }

    /// True while an answer is on display and options are locked.
    pub fn is_answered(&self) -> bool {
        self.options.iter().any(|option| !option.enabled)
    }

    /// Answer with the option at `index`.
    ///
    /// Returns `None` when the option does not exist or is disabled; the
    /// block is left untouched in that case. On success every option of the
    /// block is disabled until [`Quiz::reset`].
    pub fn answer(&mut self, index: usize, messages: &QuizMessages) -> Option<Verdict> {
        if !self.options.get(index)?.enabled {
            return None;
        }

        let verdict = if self.options[index].correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };

        for option in &mut self.options {
            option.enabled = false;
        }

        self.feedback = Feedback {
            text: match verdict {
                Verdict::Correct => messages.correct.clone(),
                Verdict::Incorrect => messages.incorrect.clone(),
            },
            verdict: Some(verdict),
            visible: true,
        };

        self.options[index].mark = Some(verdict);
        if verdict == Verdict::Incorrect {
            if let Some(right) = self.options.iter_mut().find(|option| option.correct) {
                right.mark = Some(Verdict::Correct);
            }
        }

        Some(verdict)
    }

    /// Make every option clickable again and clear the banner.
    pub fn reset(&mut self) {
        for option in &mut self.options {
            option.enabled = true;
            option.mark = None;
        }
        self.feedback = Feedback::default();
    }
}
