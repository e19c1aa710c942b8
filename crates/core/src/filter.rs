//! Facet filtering over the question catalog.

use std::collections::BTreeSet;

use crate::catalog::QuestionCatalog;
use crate::model::{Facet, FacetChoice, FilterSelection, QuestionRecord};

/// Returns every record matching all three axes of `selection`, in catalog order.
#[must_use]
pub fn apply_filter<'a>(
    catalog: &'a QuestionCatalog,
    selection: &FilterSelection,
) -> Vec<&'a QuestionRecord> {
    catalog
        .questions()
        .iter()
        .filter(|q| selection.matches(q))
        .collect()
}

/// Distinct values present on `facet`, sorted, preceded by `FacetChoice::All`.
///
/// Records with a blank value on the axis contribute nothing.
#[must_use]
pub fn facet_values(catalog: &QuestionCatalog, facet: Facet) -> Vec<FacetChoice> {
    let distinct: BTreeSet<&str> = catalog
        .questions()
        .iter()
        .map(|q| facet.value_of(q))
        .filter(|v| !v.is_empty())
        .collect();

    std::iter::once(FacetChoice::All)
        .chain(distinct.into_iter().map(FacetChoice::value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionDraft;

    fn question(id: &str, category: &str, grade: &str, subject: &str) -> QuestionDraft {
        QuestionDraft {
            id: id.into(),
            category: category.into(),
            grade: grade.into(),
            subject: subject.into(),
            prompt: "p".into(),
            options: vec!["a".into(), "b".into()],
            answer: "a".into(),
            ..QuestionDraft::default()
        }
    }

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::from_drafts(vec![
            question("M1", "math", "g1", "algebra"),
            question("M2", "math", "g2", "geometry"),
            question("H1", "history", "g1", "world"),
            question("H2", "history", "g2", "world"),
            question("H3", "history", "g3", "japan"),
            question("H4", "history", "", "japan"),
        ])
        .unwrap()
    }

    #[test]
    fn default_selection_returns_everything() {
        let catalog = catalog();
        assert_eq!(apply_filter(&catalog, &FilterSelection::default()).len(), 6);
    }

    #[test]
    fn category_filter_selects_matching_subset() {
        let catalog = catalog();
        let selection =
            FilterSelection::default().with(Facet::Category, FacetChoice::value("math"));
        let ids: Vec<_> = apply_filter(&catalog, &selection)
            .iter()
            .map(|q| q.id().as_str())
            .collect();
        assert_eq!(ids, vec!["M1", "M2"]);
    }

    #[test]
    fn axes_combine_with_and() {
        let catalog = catalog();
        let selection = FilterSelection::default()
            .with(Facet::Category, FacetChoice::value("history"))
            .with(Facet::Subject, FacetChoice::value("world"))
            .with(Facet::Grade, FacetChoice::value("g2"));
        let subset = apply_filter(&catalog, &selection);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].id().as_str(), "H2");
    }

    #[test]
    fn unknown_value_yields_empty_subset() {
        let catalog = catalog();
        let selection =
            FilterSelection::default().with(Facet::Category, FacetChoice::value("art"));
        assert!(apply_filter(&catalog, &selection).is_empty());
    }

    #[test]
    fn facet_values_are_sorted_distinct_with_all_first() {
        let catalog = catalog();
        assert_eq!(
            facet_values(&catalog, Facet::Category),
            vec![
                FacetChoice::All,
                FacetChoice::value("history"),
                FacetChoice::value("math"),
            ]
        );
        assert_eq!(
            facet_values(&catalog, Facet::Grade),
            vec![
                FacetChoice::All,
                FacetChoice::value("g1"),
                FacetChoice::value("g2"),
                FacetChoice::value("g3"),
            ]
        );
    }
}
