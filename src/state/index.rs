use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::data::{GroupedPhotos, PhotoRecord};

/// The canonical in-memory photo collection.
///
/// Records are held twice: grouped by calendar day for the calendar and
/// date-filtered views, and flat for cross-date views and id lookups. The
/// two sides are kept consistent by construction: `replace_all` re-buckets
/// every record by its own timestamp, and `remove_by_id` touches both.
///
/// The index stores no ordering guarantee beyond the grouping; views sort
/// at render time via `visible` and `by_title`.
#[derive(Debug, Clone, Default)]
pub struct PhotoIndex {
    by_date: BTreeMap<NaiveDate, Vec<PhotoRecord>>,
    flat: Vec<PhotoRecord>,
}

impl PhotoIndex {
    /// Discard all prior state and rebuild from a server listing.
    ///
    /// Buckets are derived from each record's own `taken_at` day, not from
    /// the wire keys, so a record can never sit in a bucket that disagrees
    /// with its timestamp.
    pub fn replace_all(&mut self, grouped: GroupedPhotos) {
        self.by_date.clear();
        self.flat.clear();

        for records in grouped.into_values() {
            for record in records {
                self.by_date
                    .entry(record.date_key())
                    .or_default()
                    .push(record.clone());
                self.flat.push(record);
            }
        }
    }

    /// Remove one record from both sides of the index, dropping its date
    /// bucket if it becomes empty. Calling this with an absent id is a no-op.
    pub fn remove_by_id(&mut self, id: &str) -> Option<PhotoRecord> {
        let position = self.flat.iter().position(|record| record.id == id)?;
        let removed = self.flat.remove(position);

        let day = removed.date_key();
        if let Some(bucket) = self.by_date.get_mut(&day) {
            bucket.retain(|record| record.id != id);
            if bucket.is_empty() {
                self.by_date.remove(&day);
            }
        }

        Some(removed)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&PhotoRecord> {
        self.flat.iter().find(|record| record.id == id)
    }

    /// Records of one calendar day, in stored order
    pub fn for_date(&self, day: NaiveDate) -> &[PhotoRecord] {
        self.by_date.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_photos_on(&self, day: NaiveDate) -> bool {
        !self.for_date(day).is_empty()
    }

    /// The record set a view should show, sorted newest first.
    ///
    /// A date filter narrows to that day's bucket; a filter pointing at a
    /// day with no photos falls back to the full set, matching the
    /// calendar's "select any day" behavior.
    pub fn visible(&self, filter: Option<NaiveDate>) -> Vec<&PhotoRecord> {
        let mut records: Vec<&PhotoRecord> = match filter {
            Some(day) if self.has_photos_on(day) => self.for_date(day).iter().collect(),
            _ => self.flat.iter().collect(),
        };
        records.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
        records
    }

    /// All records sorted by title, for the edit selector
    pub fn by_title(&self) -> Vec<&PhotoRecord> {
        let mut records: Vec<&PhotoRecord> = self.flat.iter().collect();
        records.sort_by(|a, b| a.title.cmp(&b.title));
        records
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.flat
    }

    pub fn clear(&mut self) {
        self.by_date.clear();
        self.flat.clear();
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// Number of distinct days carrying at least one photo
    pub fn day_count(&self) -> usize {
        self.by_date.len()
    }

    pub fn oldest(&self) -> Option<&PhotoRecord> {
        self.flat.iter().min_by_key(|record| record.taken_at)
    }

    pub fn newest(&self) -> Option<&PhotoRecord> {
        self.flat.iter().max_by_key(|record| record.taken_at)
    }

    #[cfg(test)]
    fn bucket_sizes(&self) -> usize {
        self.by_date.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(id: &str, title: &str, taken_at: &str) -> PhotoRecord {
        PhotoRecord {
            id: id.to_string(),
            file_name: format!("{id}.jpg"),
            title: title.to_string(),
            taken_at: NaiveDateTime::parse_from_str(taken_at, "%Y-%m-%dT%H:%M:%S").unwrap(),
            location: String::new(),
            description: String::new(),
        }
    }

    fn grouped(records: Vec<PhotoRecord>) -> GroupedPhotos {
        let mut grouped = GroupedPhotos::new();
        for r in records {
            grouped
                .entry(r.date_key().format("%Y-%m-%d").to_string())
                .or_default()
                .push(r);
        }
        grouped
    }

    fn sample_index() -> PhotoIndex {
        let mut index = PhotoIndex::default();
        index.replace_all(grouped(vec![
            record("a", "Breakfast", "2024-01-05T10:00:00"),
            record("b", "Afternoon", "2024-01-05T15:00:00"),
            record("c", "Old hike", "2023-11-20T09:30:00"),
        ]));
        index
    }

    #[test]
    fn test_replace_all_flat_matches_buckets() {
        let index = sample_index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.len(), index.bucket_sizes());
        assert_eq!(index.day_count(), 2);
    }

    #[test]
    fn test_replace_all_rebuckets_by_record_day() {
        // A server grouping that disagrees with the record's own timestamp
        // must not be trusted
        let mut grouped = GroupedPhotos::new();
        grouped.insert(
            "1999-01-01".to_string(),
            vec![record("a", "Misfiled", "2024-01-05T10:00:00")],
        );

        let mut index = PhotoIndex::default();
        index.replace_all(grouped);

        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(index.for_date(day).len(), 1);
        assert!(!index.has_photos_on(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()));
    }

    #[test]
    fn test_replace_all_discards_previous_state() {
        let mut index = sample_index();
        index.replace_all(grouped(vec![record("z", "Only one", "2024-02-01T12:00:00")]));
        assert_eq!(index.len(), 1);
        assert!(index.find_by_id("a").is_none());
    }

    #[test]
    fn test_remove_by_id_is_idempotent() {
        let mut index = sample_index();
        assert!(index.remove_by_id("a").is_some());

        let flat_before = index.records().to_vec();
        assert!(index.remove_by_id("a").is_none());
        assert_eq!(index.records(), flat_before.as_slice());
        assert_eq!(index.len(), index.bucket_sizes());
    }

    #[test]
    fn test_remove_by_id_drops_empty_bucket() {
        let mut index = sample_index();
        let day = NaiveDate::from_ymd_opt(2023, 11, 20).unwrap();
        assert!(index.has_photos_on(day));

        index.remove_by_id("c");
        assert!(!index.has_photos_on(day));
        assert_eq!(index.day_count(), 1);
    }

    #[test]
    fn test_visible_sorted_newest_first() {
        let index = sample_index();
        let records = index.visible(None);
        let times: Vec<_> = records.iter().map(|r| r.taken_at).collect();

        for pair in times.windows(2) {
            assert!(pair[0] >= pair[1], "expected non-increasing order");
        }
        assert_eq!(records[0].id, "b");
    }

    #[test]
    fn test_visible_with_date_filter() {
        let index = sample_index();
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

        let records = index.visible(Some(day));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "b"); // 15:00 before 10:00
        assert_eq!(records[1].id, "a");
    }

    #[test]
    fn test_visible_filter_without_photos_shows_all() {
        let index = sample_index();
        let empty_day = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        assert_eq!(index.visible(Some(empty_day)).len(), 3);
    }

    #[test]
    fn test_by_title_sorted_alphabetically() {
        let index = sample_index();
        let titles: Vec<_> = index.by_title().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Afternoon", "Breakfast", "Old hike"]);
    }

    #[test]
    fn test_clear_empties_both_sides() {
        let mut index = sample_index();
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.day_count(), 0);
        assert_eq!(index.visible(None).len(), 0);
    }
}
