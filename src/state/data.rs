/// Shared data structures for the application state
///
/// These structs mirror the photo server's wire format. Field names are
/// renamed so the Rust side stays snake_case while the JSON stays intact;
/// extra server-side bookkeeping fields are ignored on deserialize.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One uploaded photograph, as stored on the server.
///
/// `location` and `description` are optional free text; the server stores
/// them as empty strings when unset, so they are plain `String`s here and
/// emptiness means "not provided".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Opaque identifier, stable across edits
    pub id: String,
    /// Name of the stored image resource under `/photos/`
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub title: String,
    /// The date and time the photo is associated with (not the upload time)
    #[serde(rename = "photoDateTime")]
    pub taken_at: NaiveDateTime,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

impl PhotoRecord {
    /// Calendar day this record belongs to, the key of its index bucket
    pub fn date_key(&self) -> NaiveDate {
        self.taken_at.date()
    }
}

/// The server's grouped listing: date key (`YYYY-MM-DD`) to the photos of
/// that day, as returned by `GET /api/photos`.
pub type GroupedPhotos = HashMap<String, Vec<PhotoRecord>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_record() {
        // Server rows carry extra bookkeeping fields we do not model
        let json = r#"{
            "id": "abc-123",
            "fileName": "abc_cat.jpg",
            "title": "A cat",
            "photoDateTime": "2024-01-05T10:00:00",
            "location": "",
            "description": "Morning walk",
            "fileSize": 12345,
            "uploadTime": "2024-01-05T11:22:33",
            "originalName": "cat.jpg"
        }"#;

        let record: PhotoRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "abc-123");
        assert_eq!(record.file_name, "abc_cat.jpg");
        assert_eq!(record.location, "");
        assert_eq!(record.date_key(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_serialize_keeps_wire_names() {
        let record = PhotoRecord {
            id: "id-1".into(),
            file_name: "p.jpg".into(),
            title: "T".into(),
            taken_at: NaiveDateTime::parse_from_str("2024-01-05T15:00:00", "%Y-%m-%dT%H:%M:%S")
                .unwrap(),
            location: String::new(),
            description: String::new(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"fileName\":\"p.jpg\""));
        assert!(json.contains("\"photoDateTime\":\"2024-01-05T15:00:00\""));
    }

    #[test]
    fn test_missing_optional_fields_default_empty() {
        let json = r#"{
            "id": "x",
            "fileName": "x.png",
            "title": "X",
            "photoDateTime": "2023-12-31T23:59:00"
        }"#;

        let record: PhotoRecord = serde_json::from_str(json).unwrap();
        assert!(record.location.is_empty());
        assert!(record.description.is_empty());
    }
}
