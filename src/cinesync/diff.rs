//! # Diff Engine
//!
//! Pure, in-memory computation of the minimal change between desired and
//! existing state. Two algorithms, one per target kind:
//!
//! - [`field_diff`]: records. Only fields named by the desired record are
//!   compared, so fields that exist only in the stored record (review lists
//!   grown by users, server-side timestamps) never appear in a delta.
//! - [`substring_diff`]: text. Literal replacements applied in order; an
//!   `old` string that does not occur is simply a no-op.
//!
//! Nothing here touches a store or a file.

use crate::model::{FieldValue, Record, Replacement};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub field: String,
    pub previous: Option<FieldValue>,
    pub value: FieldValue,
}

/// The fields that must be written to bring a stored record up to date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldDelta {
    changes: Vec<FieldChange>,
}

impl FieldDelta {
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.changes.iter().map(|c| c.field.as_str()).collect()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.changes
            .iter()
            .find(|c| c.field == field)
            .map(|c| &c.value)
    }

    /// Delta describing a brand new record: every field, nothing previous.
    pub fn creation(record: &Record) -> Self {
        Self {
            changes: record
                .iter()
                .map(|(field, value)| FieldChange {
                    field: field.to_string(),
                    previous: None,
                    value: value.clone(),
                })
                .collect(),
        }
    }
}

/// Compares every desired field with the existing one.
///
/// A field missing from `existing` always differs. Lists compare with order
/// significance, so `["Drama", "Action"]` is a change against
/// `["Action", "Drama"]`. The delta follows the desired field order.
pub fn field_diff(desired: &Record, existing: &Record) -> FieldDelta {
    let changes = desired
        .iter()
        .filter_map(|(field, value)| {
            let current = existing.get(field);
            if current == Some(value) {
                return None;
            }
            Some(FieldChange {
                field: field.to_string(),
                previous: current.cloned(),
                value: value.clone(),
            })
        })
        .collect();

    FieldDelta { changes }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementHit {
    pub old: String,
    pub new: String,
    pub occurrences: usize,
}

/// Outcome of running the replacement pairs over one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringDelta {
    pub content: String,
    pub hits: Vec<ReplacementHit>,
    changed: bool,
}

impl SubstringDelta {
    /// True when the final content differs from the original.
    pub fn is_changed(&self) -> bool {
        self.changed
    }
}

/// Applies each pair to the output of the previous one.
///
/// Every occurrence of `old` is replaced. Pairs with an empty `old`, or
/// whose `old` equals `new`, never match.
pub fn substring_diff(original: &str, replacements: &[Replacement]) -> SubstringDelta {
    let mut content = original.to_string();
    let mut hits = Vec::new();

    for pair in replacements {
        if pair.old.is_empty() || pair.old == pair.new {
            continue;
        }
        let occurrences = content.matches(pair.old.as_str()).count();
        if occurrences == 0 {
            continue;
        }
        content = content.replace(pair.old.as_str(), &pair.new);
        hits.push(ReplacementHit {
            old: pair.old.clone(),
            new: pair.new.clone(),
            occurrences,
        });
    }

    let changed = content != original;
    SubstringDelta {
        content,
        hits,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str) -> Record {
        Record::new().with("title", title)
    }

    #[test]
    fn identical_records_produce_empty_delta() {
        let desired = movie("X").with("rating", "PG");
        assert!(field_diff(&desired, &desired.clone()).is_empty());
    }

    #[test]
    fn only_the_differing_field_is_in_the_delta() {
        let existing = movie("X")
            .with("rating", "PG")
            .with("director", "Nolan");
        let desired = movie("X")
            .with("rating", "PG13")
            .with("director", "Nolan");

        let delta = field_diff(&desired, &existing);
        assert_eq!(delta.fields(), vec!["rating"]);
        assert_eq!(delta.get("rating"), Some(&FieldValue::from("PG13")));
        assert_eq!(
            delta.changes()[0].previous,
            Some(FieldValue::from("PG"))
        );
    }

    #[test]
    fn fields_absent_from_desired_are_never_in_the_delta() {
        let existing = movie("X").with("reviews", vec!["A", "B", "C"]);
        let desired = movie("X");

        let delta = field_diff(&desired, &existing);
        assert!(delta.is_empty());
    }

    #[test]
    fn missing_existing_field_counts_as_different() {
        let existing = movie("X");
        let desired = movie("X").with("trailer", "https://example.test/t");

        let delta = field_diff(&desired, &existing);
        assert_eq!(delta.fields(), vec!["trailer"]);
        assert_eq!(delta.changes()[0].previous, None);
    }

    #[test]
    fn list_order_is_significant() {
        let existing = movie("X").with("genres", vec!["Action", "Drama"]);
        let desired = movie("X").with("genres", vec!["Drama", "Action"]);

        assert_eq!(field_diff(&desired, &existing).fields(), vec!["genres"]);
    }

    #[test]
    fn delta_follows_desired_order() {
        let existing = movie("X");
        let desired = movie("X")
            .with("trailer", "t")
            .with("poster", "p")
            .with("rating", "R");

        let delta = field_diff(&desired, &existing);
        assert_eq!(delta.fields(), vec!["trailer", "poster", "rating"]);
    }

    #[test]
    fn type_change_is_a_difference() {
        let existing = movie("X").with("year", "2010");
        let desired = movie("X").with("year", 2010i64);
        assert_eq!(field_diff(&desired, &existing).len(), 1);
    }

    #[test]
    fn creation_delta_lists_every_field() {
        let record = movie("X").with("rating", "G");
        let delta = FieldDelta::creation(&record);
        assert_eq!(delta.fields(), vec!["title", "rating"]);
        assert!(delta.changes().iter().all(|c| c.previous.is_none()));
    }

    #[test]
    fn absent_substring_is_a_noop() {
        let content = "NEXT_PUBLIC_API_HOST=10.0.0.2\n";
        let pairs = [Replacement::new("http://1.2.3.4:3000", "http://5.6.7.8:3000")];

        let delta = substring_diff(content, &pairs);
        assert!(!delta.is_changed());
        assert!(delta.hits.is_empty());
        assert_eq!(delta.content, content);
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let content = "a=http://1.2.3.4:3000\nb=http://1.2.3.4:3000\nc=http://1.2.3.4:8080\n";
        let pairs = [
            Replacement::new("http://1.2.3.4:3000", "http://5.6.7.8:3000"),
            Replacement::new("http://1.2.3.4:8080", "http://5.6.7.8:8080"),
        ];

        let delta = substring_diff(content, &pairs);
        assert!(delta.is_changed());
        assert_eq!(
            delta.content,
            "a=http://5.6.7.8:3000\nb=http://5.6.7.8:3000\nc=http://5.6.7.8:8080\n"
        );
        assert_eq!(delta.hits[0].occurrences, 2);
        assert_eq!(delta.hits[1].occurrences, 1);
    }

    #[test]
    fn pairs_apply_to_previous_output() {
        let delta = substring_diff(
            "one",
            &[Replacement::new("one", "two"), Replacement::new("two", "three")],
        );
        assert_eq!(delta.content, "three");
        assert_eq!(delta.hits.len(), 2);
    }

    #[test]
    fn empty_and_identity_pairs_never_match() {
        let delta = substring_diff(
            "abc",
            &[Replacement::new("", "x"), Replacement::new("b", "b")],
        );
        assert!(!delta.is_changed());
        assert!(delta.hits.is_empty());
        assert_eq!(delta.content, "abc");
    }

    #[test]
    fn round_trip_replacements_leave_file_unchanged() {
        let delta = substring_diff(
            "host=a",
            &[Replacement::new("a", "b"), Replacement::new("b", "a")],
        );
        assert_eq!(delta.content, "host=a");
        assert!(!delta.is_changed());
    }
}
