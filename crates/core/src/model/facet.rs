use std::fmt;
use std::str::FromStr;

use crate::model::question::QuestionRecord;

/// One of the three classification axes used to filter questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Category,
    Grade,
    Subject,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Category, Facet::Grade, Facet::Subject];

    /// Returns the record's value on this axis.
    #[must_use]
    pub fn value_of(self, record: &QuestionRecord) -> &str {
        match self {
            Facet::Category => record.category(),
            Facet::Grade => record.grade(),
            Facet::Subject => record.subject(),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Category => "category",
            Facet::Grade => "grade",
            Facet::Subject => "subject",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selected value on a facet axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacetChoice {
    #[default]
    All,
    Value(String),
}

impl FacetChoice {
    #[must_use]
    pub fn value(raw: impl Into<String>) -> Self {
        Self::Value(raw.into())
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, FacetChoice::All)
    }

    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            FacetChoice::All => true,
            FacetChoice::Value(v) => v == candidate,
        }
    }
}

impl fmt::Display for FacetChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetChoice::All => f.write_str("all"),
            FacetChoice::Value(v) => f.write_str(v),
        }
    }
}

impl FromStr for FacetChoice {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(FacetChoice::All)
        } else {
            Ok(FacetChoice::Value(s.to_owned()))
        }
    }
}

/// The user's current filter: one choice per facet, `All` by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub category: FacetChoice,
    pub grade: FacetChoice,
    pub subject: FacetChoice,
}

impl FilterSelection {
    #[must_use]
    pub fn get(&self, facet: Facet) -> &FacetChoice {
        match facet {
            Facet::Category => &self.category,
            Facet::Grade => &self.grade,
            Facet::Subject => &self.subject,
        }
    }

    pub fn set(&mut self, facet: Facet, choice: FacetChoice) {
        match facet {
            Facet::Category => self.category = choice,
            Facet::Grade => self.grade = choice,
            Facet::Subject => self.subject = choice,
        }
    }

    #[must_use]
    pub fn with(mut self, facet: Facet, choice: FacetChoice) -> Self {
        self.set(facet, choice);
        self
    }

    #[must_use]
    pub fn matches(&self, record: &QuestionRecord) -> bool {
        Facet::ALL
            .iter()
            .all(|facet| self.get(*facet).matches(facet.value_of(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_case_insensitively() {
        assert_eq!("all".parse::<FacetChoice>().unwrap(), FacetChoice::All);
        assert_eq!("ALL".parse::<FacetChoice>().unwrap(), FacetChoice::All);
        assert_eq!("".parse::<FacetChoice>().unwrap(), FacetChoice::All);
        assert_eq!(
            " History ".parse::<FacetChoice>().unwrap(),
            FacetChoice::value("History")
        );
    }

    #[test]
    fn all_matches_anything_including_blank() {
        assert!(FacetChoice::All.matches(""));
        assert!(FacetChoice::All.matches("Math"));
        assert!(!FacetChoice::value("Math").matches(""));
    }

    #[test]
    fn selection_set_replaces_one_axis() {
        let selection = FilterSelection::default()
            .with(Facet::Grade, FacetChoice::value("Year 11"))
            .with(Facet::Subject, FacetChoice::value("Algebra"));
        assert!(selection.category.is_all());
        assert_eq!(selection.get(Facet::Grade), &FacetChoice::value("Year 11"));
        assert_eq!(selection.get(Facet::Subject).to_string(), "Algebra");
    }
}
