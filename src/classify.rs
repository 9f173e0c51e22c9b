//! Letter counting and the localization-impact verdict

use std::fmt;

/// Whether an image carries text that localization would have to touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Yes,
    No,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Yes => write!(f, "YES"),
            Verdict::No => write!(f, "NO"),
        }
    }
}

/// Outcome of classifying one image's recognized text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub verdict: Verdict,
    pub letter_count: usize,
}

impl Classification {
    /// Log line for this classification, newline included
    pub fn record(&self, file_name: &str) -> String {
        format!("{} : Loc Impact - {}\n", file_name, self.verdict)
    }
}

/// Number of alphabetic characters (Unicode `Alphabetic`) in `text`
pub fn letter_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

/// `Yes` when `text` holds at least `threshold` letters
pub fn classify(text: &str, threshold: usize) -> Classification {
    let letter_count = letter_count(text);
    let verdict = if letter_count >= threshold {
        Verdict::Yes
    } else {
        Verdict::No
    };
    Classification {
        verdict,
        letter_count,
    }
}
