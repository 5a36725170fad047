//! Read-only student roster.
//!
//! The store is built once at startup and never mutated. Lookups are a
//! linear scan in store order so that "first match wins" is reproducible.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One student's administrative record.
///
/// Field order is significant: it is the key order of the serialized
/// evidence shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    pub id: String,
    pub grade: String,
    /// Attendance rate as displayed, e.g. `"95%"`.
    pub attendance: String,
    pub marks: u32,
}

impl StudentRecord {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        grade: impl Into<String>,
        attendance: impl Into<String>,
        marks: u32,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            grade: grade.into(),
            attendance: attendance.into(),
            marks,
        }
    }

    /// First whitespace-separated token of the name.
    pub fn first_name(&self) -> &str {
        self.name.split(' ').next().unwrap_or_default()
    }

    /// Whether a lower-cased query mentions this student by full or first name.
    pub fn is_mentioned_in(&self, lower_query: &str) -> bool {
        let full = self.name.to_lowercase();
        let first = self.first_name().to_lowercase();
        (!full.is_empty() && lower_query.contains(&full))
            || (!first.is_empty() && lower_query.contains(&first))
    }
}

/// Immutable, ordered collection of student records.
///
/// Cloning is cheap; clones share the same backing slice.
#[derive(Clone, Debug)]
pub struct RecordStore {
    records: Arc<[StudentRecord]>,
}

impl RecordStore {
    pub fn new(records: Vec<StudentRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// The four demo students the assistant ships with.
    pub fn seeded() -> Self {
        Self::new(vec![
            StudentRecord::new("Alice Johnson", "S001", "A", "95%", 92),
            StudentRecord::new("Bob Smith", "S002", "B+", "88%", 85),
            StudentRecord::new("Carol Williams", "S003", "A-", "92%", 89),
            StudentRecord::new("David Brown", "S004", "B", "78%", 80),
        ])
    }

    pub fn as_slice(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StudentRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record, in store order, mentioned by the given query.
    pub fn find_mentioned(&self, query: &str) -> Option<&StudentRecord> {
        find_mentioned(&self.records, query)
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a StudentRecord;
    type IntoIter = std::slice::Iter<'a, StudentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Linear scan over `records`; the query is lower-cased before matching.
pub fn find_mentioned<'a>(records: &'a [StudentRecord], query: &str) -> Option<&'a StudentRecord> {
    let lower = query.to_lowercase();
    records.iter().find(|r| r.is_mentioned_in(&lower))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_order_and_contents() {
        let store = RecordStore::seeded();
        assert_eq!(store.len(), 4);
        let ids: Vec<&str> = store.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["S001", "S002", "S003", "S004"]);
        assert_eq!(store.as_slice()[1].grade, "B+");
        assert_eq!(store.as_slice()[3].marks, 80);
    }

    #[test]
    fn test_first_name() {
        let r = StudentRecord::new("Carol Williams", "S003", "A-", "92%", 89);
        assert_eq!(r.first_name(), "Carol");

        let mono = StudentRecord::new("Prince", "S9", "C", "50%", 40);
        assert_eq!(mono.first_name(), "Prince");
    }

    #[test]
    fn test_find_by_full_name_case_insensitive() {
        let store = RecordStore::seeded();
        let r = store.find_mentioned("WHAT ABOUT DAVID BROWN?").unwrap();
        assert_eq!(r.id, "S004");
    }

    #[test]
    fn test_find_by_first_name() {
        let store = RecordStore::seeded();
        assert_eq!(store.find_mentioned("how is bob doing").unwrap().id, "S002");
    }

    #[test]
    fn test_find_no_match() {
        let store = RecordStore::seeded();
        assert!(store.find_mentioned("how is eve doing").is_none());
    }

    #[test]
    fn test_first_in_store_order_wins() {
        let store = RecordStore::seeded();
        let r = store.find_mentioned("compare david and alice").unwrap();
        assert_eq!(r.id, "S001");
    }

    #[test]
    fn test_empty_name_never_matches() {
        let store = RecordStore::new(vec![
            StudentRecord::new("", "X0", "F", "0%", 0),
            StudentRecord::new("Bob Smith", "S002", "B+", "88%", 85),
        ]);
        assert_eq!(store.find_mentioned("bob").unwrap().id, "S002");
        assert!(store.find_mentioned("nobody here").is_none());
    }

    #[test]
    fn test_clones_share_records() {
        let store = RecordStore::seeded();
        let clone = store.clone();
        assert!(std::ptr::eq(store.as_slice(), clone.as_slice()));
    }

    #[test]
    fn test_serialized_key_order() {
        let r = StudentRecord::new("Alice Johnson", "S001", "A", "95%", 92);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Alice Johnson","id":"S001","grade":"A","attendance":"95%","marks":92}"#
        );
    }
}
