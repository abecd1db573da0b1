/// Raw data section: library stats plus the pretty-printed metadata JSON
///
/// The JSON mirrors the export document shape so what the viewer shows is
/// exactly what "Download JSON" writes.

use std::collections::BTreeMap;

use iced::widget::{column, container, text};
use iced::{Element, Font, Length};

use crate::state::data::PhotoRecord;
use crate::state::index::PhotoIndex;
use crate::Message;

pub fn view<'a>(
    metadata: Option<&'a BTreeMap<String, PhotoRecord>>,
    fetch_failed: bool,
    index: &PhotoIndex,
) -> Element<'a, Message> {
    let body: Element<'a, Message> = if fetch_failed {
        text("Error loading data.").style(text::danger).into()
    } else if let Some(metadata) = metadata {
        text(pretty_json(metadata))
            .font(Font::MONOSPACE)
            .size(13)
            .into()
    } else {
        text("Loading…").style(text::secondary).into()
    };

    column![
        text("Data").size(28),
        text(stats_line(index)).size(14).style(text::secondary),
        container(body)
            .width(Length::Fill)
            .padding(14)
            .style(container::rounded_box),
    ]
    .spacing(14)
    .into()
}

fn stats_line(index: &PhotoIndex) -> String {
    if index.is_empty() {
        return "No photos in the library yet.".to_string();
    }
    match (index.oldest(), index.newest()) {
        (Some(oldest), Some(newest)) => format!(
            "{} photo(s) across {} day(s); oldest {}, newest {}",
            index.len(),
            index.day_count(),
            oldest.taken_at.format("%Y-%m-%d %H:%M"),
            newest.taken_at.format("%Y-%m-%d %H:%M"),
        ),
        _ => "No photos in the library yet.".to_string(),
    }
}

fn pretty_json(metadata: &BTreeMap<String, PhotoRecord>) -> String {
    let document = serde_json::json!({
        "totalPhotos": metadata.len(),
        "photos": metadata,
    });
    serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::GroupedPhotos;
    use chrono::NaiveDateTime;

    fn record(id: &str, taken_at: &str) -> PhotoRecord {
        PhotoRecord {
            id: id.to_string(),
            file_name: format!("{id}.jpg"),
            title: "T".to_string(),
            taken_at: NaiveDateTime::parse_from_str(taken_at, "%Y-%m-%dT%H:%M:%S").unwrap(),
            location: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_stats_line_empty_library() {
        assert_eq!(
            stats_line(&PhotoIndex::default()),
            "No photos in the library yet."
        );
    }

    #[test]
    fn test_stats_line_reports_range() {
        let mut grouped = GroupedPhotos::new();
        grouped.insert(
            "x".to_string(),
            vec![
                record("a", "2023-11-20T09:30:00"),
                record("b", "2024-01-05T15:00:00"),
            ],
        );
        let mut index = PhotoIndex::default();
        index.replace_all(grouped);

        let line = stats_line(&index);
        assert!(line.starts_with("2 photo(s) across 2 day(s)"));
        assert!(line.contains("oldest 2023-11-20 09:30"));
        assert!(line.contains("newest 2024-01-05 15:00"));
    }

    #[test]
    fn test_pretty_json_matches_export_shape() {
        let mut metadata = BTreeMap::new();
        metadata.insert("a".to_string(), record("a", "2024-01-05T10:00:00"));

        let json = pretty_json(&metadata);
        assert!(json.contains("\"totalPhotos\": 1"));
        assert!(json.contains("\"fileName\": \"a.jpg\""));
    }
}
