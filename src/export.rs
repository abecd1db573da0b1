/// JSON export of the whole journal
///
/// Fetches the flat metadata from the server and writes it as a pretty
/// printed document; the filename is stamped with the current date.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::api::Gateway;
use crate::state::data::PhotoRecord;

/// The exported document shape
#[derive(Debug, Serialize)]
pub struct ExportDocument {
    #[serde(rename = "totalPhotos")]
    pub total_photos: usize,
    pub photos: BTreeMap<String, PhotoRecord>,
}

impl ExportDocument {
    pub fn new(photos: BTreeMap<String, PhotoRecord>) -> Self {
        Self {
            total_photos: photos.len(),
            photos,
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Suggested name for the save dialog
pub fn default_file_name(today: NaiveDate) -> String {
    format!("photo-journal-data-{}.json", today.format("%Y-%m-%d"))
}

/// Fetch the current metadata and write it to `destination`.
///
/// Unlike the photo listing, a metadata fetch failure here is surfaced to
/// the caller; an export must never silently produce an empty document.
pub async fn write_journal(gateway: Gateway, destination: PathBuf) -> Result<usize, String> {
    let metadata = gateway.raw_metadata().await.map_err(|e| e.to_string())?;
    let document = ExportDocument::new(metadata);
    let json = document.to_pretty_json().map_err(|e| e.to_string())?;

    tokio::fs::write(&destination, json)
        .await
        .map_err(|e| format!("could not write {}: {e}", destination.display()))?;

    log::info!(
        "exported {} photo record(s) to {}",
        document.total_photos,
        destination.display()
    );
    Ok(document.total_photos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_default_file_name_is_date_stamped() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(default_file_name(today), "photo-journal-data-2024-03-10.json");
    }

    #[test]
    fn test_document_counts_records() {
        let mut photos = BTreeMap::new();
        photos.insert(
            "a".to_string(),
            PhotoRecord {
                id: "a".to_string(),
                file_name: "a.jpg".to_string(),
                title: "One".to_string(),
                taken_at: NaiveDateTime::parse_from_str(
                    "2024-01-05T10:00:00",
                    "%Y-%m-%dT%H:%M:%S",
                )
                .unwrap(),
                location: String::new(),
                description: String::new(),
            },
        );

        let document = ExportDocument::new(photos);
        assert_eq!(document.total_photos, 1);

        let json = document.to_pretty_json().unwrap();
        assert!(json.contains("\"totalPhotos\": 1"));
        assert!(json.contains("\"fileName\": \"a.jpg\""));
    }
}
