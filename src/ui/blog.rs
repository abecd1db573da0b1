/// Blog feed view: the record set linearized newest-first
///
/// A date heading is inserted whenever the calendar day changes between
/// consecutive records; same-day neighbors get a thin rule, a day boundary
/// gets a heavier one. Descriptions wrap around the photo: the first
/// paragraph goes above it, the rest below.

use chrono::NaiveDate;
use iced::widget::{column, horizontal_rule, text};
use iced::{Element, Length};

use super::{empty_state, loading_placeholder, ImageCache};
use crate::state::data::PhotoRecord;
use crate::Message;

/// One renderable piece of the feed, in display order
#[derive(Debug, PartialEq)]
pub enum FeedItem<'a> {
    DateHeading(NaiveDate),
    Entry(&'a PhotoRecord),
    /// Thin separator between entries of the same day
    LightRule,
    /// Prominent separator across a day boundary
    HeavyRule,
}

/// Linearize an already-sorted record set into feed items
pub fn build_feed<'a>(records: &[&'a PhotoRecord]) -> Vec<FeedItem<'a>> {
    let mut items = Vec::new();
    let mut current_day: Option<NaiveDate> = None;

    for (position, record) in records.iter().enumerate() {
        let day = record.date_key();
        if current_day != Some(day) {
            items.push(FeedItem::DateHeading(day));
            current_day = Some(day);
        }
        items.push(FeedItem::Entry(record));

        if let Some(next) = records.get(position + 1) {
            if next.date_key() == day {
                items.push(FeedItem::LightRule);
            } else {
                items.push(FeedItem::HeavyRule);
            }
        }
    }

    items
}

/// Non-empty description paragraphs, split on newlines
pub fn paragraphs(description: &str) -> Vec<&str> {
    description
        .split('\n')
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .collect()
}

/// Pieces of one entry, top to bottom. The photo sits between the first
/// description paragraph and the remaining ones.
#[derive(Debug, PartialEq)]
enum EntrySegment<'a> {
    Title,
    Meta,
    Paragraph(&'a str),
    Photo,
}

fn entry_segments(record: &PhotoRecord) -> Vec<EntrySegment<'_>> {
    let mut segments = vec![EntrySegment::Title, EntrySegment::Meta];

    let parts = paragraphs(&record.description);
    if let Some(first) = parts.first() {
        segments.push(EntrySegment::Paragraph(first));
    }
    segments.push(EntrySegment::Photo);
    for part in parts.iter().skip(1) {
        segments.push(EntrySegment::Paragraph(part));
    }

    segments
}

fn meta_line(record: &PhotoRecord) -> String {
    let time = record.taken_at.format("%I:%M %p").to_string();
    if record.location.trim().is_empty() {
        time
    } else {
        format!("{time} • {}", record.location.trim())
    }
}

pub fn view<'a>(records: &[&'a PhotoRecord], images: &ImageCache) -> Element<'a, Message> {
    if records.is_empty() {
        return empty_state("📸 No photos uploaded yet. Upload some to start your journal!");
    }

    let mut feed = column![].spacing(18).max_width(760);
    for item in build_feed(records) {
        let element: Element<'a, Message> = match item {
            FeedItem::DateHeading(day) => text(day.format("%A, %B %-d, %Y").to_string())
                .size(22)
                .into(),
            FeedItem::Entry(record) => entry(record, images),
            FeedItem::LightRule => horizontal_rule(1).into(),
            FeedItem::HeavyRule => horizontal_rule(3).into(),
        };
        feed = feed.push(element);
    }
    feed.into()
}

fn entry<'a>(record: &'a PhotoRecord, images: &ImageCache) -> Element<'a, Message> {
    let mut body = column![].spacing(10);
    for segment in entry_segments(record) {
        let element: Element<'a, Message> = match segment {
            EntrySegment::Title => text(record.title.clone()).size(26).into(),
            EntrySegment::Meta => text(meta_line(record)).size(14).style(text::secondary).into(),
            EntrySegment::Paragraph(part) => text(part.to_string()).size(16).into(),
            EntrySegment::Photo => photo(record, images),
        };
        body = body.push(element);
    }
    body.into()
}

fn photo<'a>(record: &PhotoRecord, images: &ImageCache) -> Element<'a, Message> {
    match images.get(&record.file_name) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fill)
            .into(),
        None => loading_placeholder(Length::Fill, Length::Fixed(240.0)),
    }
}
