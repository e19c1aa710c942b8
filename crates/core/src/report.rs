use std::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;

/// Feedback bucket derived from final accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// 100%
    Perfect,
    /// 70% and up
    Good,
    /// 40% and up
    NeedsPractice,
    Struggling,
}

const PERFECT_REMARKS: [&str; 3] = [
    "Full marks! Brilliant work, congratulations!",
    "Perfect score! Carry this momentum into the next challenge!",
    "Every answer right! Your hard work really paid off!",
];

const GOOD_REMARKS: [&str; 3] = [
    "Well done! Keep it up!",
    "Just one step away from a perfect score. Great job!",
    "Impressive! You're very close to mastering this.",
];

const NEEDS_PRACTICE_REMARKS: [&str; 3] = [
    "A bit more practice will get you there. Don't give up!",
    "You're making steady progress. Let's work on the weak spots!",
    "Good effort! Reviewing is the key now.",
];

const STRUGGLING_REMARKS: [&str; 3] = [
    "Keep going! Revisiting the basics can help a lot.",
    "No worries, there's only room to grow from here!",
    "Take it slowly and build your understanding one step at a time.",
];

impl Tier {
    /// Classify an accuracy percentage.
    #[must_use]
    pub fn from_accuracy(accuracy_percent: u32) -> Self {
        match accuracy_percent {
            100.. => Tier::Perfect,
            70..=99 => Tier::Good,
            40..=69 => Tier::NeedsPractice,
            _ => Tier::Struggling,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Perfect => "perfect",
            Tier::Good => "good",
            Tier::NeedsPractice => "needs-practice",
            Tier::Struggling => "struggling",
        }
    }

    #[must_use]
    pub fn remarks(self) -> &'static [&'static str] {
        match self {
            Tier::Perfect => &PERFECT_REMARKS,
            Tier::Good => &GOOD_REMARKS,
            Tier::NeedsPractice => &NEEDS_PRACTICE_REMARKS,
            Tier::Struggling => &STRUGGLING_REMARKS,
        }
    }

    /// Pick a remark at random, addressed to `display_name` when one is given.
    pub fn remark<R>(self, rng: &mut R, display_name: Option<&str>) -> String
    where
        R: Rng + ?Sized,
    {
        let remark = self.remarks().choose(rng).copied().unwrap_or_default();
        match display_name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => format!("{name}, {remark}"),
            None => remark.to_owned(),
        }
    }

    /// Whether this tier earns the celebration effect.
    #[must_use]
    pub fn celebrates(self) -> bool {
        matches!(self, Tier::Perfect)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final accuracy for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSummary {
    pub accuracy_percent: u32,
    pub tier: Tier,
}

/// Compute accuracy (rounded half up) and its tier; zero answers count as 0%.
#[must_use]
pub fn summarize(correct: usize, total: usize) -> ResultSummary {
    let accuracy_percent = if total == 0 {
        0
    } else {
        let correct = correct.min(total) as u64;
        let total = total as u64;
        u32::try_from((200 * correct + total) / (2 * total)).unwrap_or(100)
    };
    ResultSummary {
        accuracy_percent,
        tier: Tier::from_accuracy(accuracy_percent),
    }
}
