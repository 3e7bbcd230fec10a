use std::collections::BTreeSet;

use crate::error::{DashboardError, Result};
use crate::models::EventRecord;

/// The cleaned event table. Built once at load and never mutated.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<EventRecord>,
}

impl Dataset {
    /// Wrap cleaned records. An empty table is rejected here so every
    /// consumer can rely on min/max existing.
    pub fn new(records: Vec<EventRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(DashboardError::MissingData(
                "no events remain after cleaning".to_string(),
            ));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, de-duplicated derived regions.
    pub fn unique_regions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.region.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a EventRecord;
    type IntoIter = std::slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::event;
    use super::*;

    #[test]
    fn test_empty_dataset_is_rejected() {
        let err = Dataset::new(Vec::new()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingData(_)));
    }

    #[test]
    fn test_unique_regions_sorted() {
        let dataset = Dataset::new(vec![
            event(1, 2.0, 5.0, "Nevada"),
            event(2, 3.0, 7.0, "Alaska"),
            event(3, 4.0, 9.0, "Nevada"),
            event(4, 1.0, 1.0, "CA"),
        ])
        .unwrap();

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.unique_regions(), vec!["Alaska", "CA", "Nevada"]);
    }
}
