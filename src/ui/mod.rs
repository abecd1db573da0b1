/// UI chrome and shared view helpers
///
/// Navigation, the transient status banner, the modal overlay used by the
/// image viewer and the delete confirmation, plus the per-section render
/// modules. Every view here is a pure function of the current state.

pub mod blog;
pub mod calendar;
pub mod edit;
pub mod gallery;
pub mod inspector;
pub mod upload;

use iced::widget::{
    button, center, column, container, horizontal_space, mouse_area, opaque, row, stack, text,
};
use iced::{Alignment, Border, Color, Element, Length, Theme};
use std::collections::HashMap;

use crate::Message;

/// Downloaded image bytes as iced handles, keyed by server file name
pub type ImageCache = HashMap<String, iced::widget::image::Handle>;

/// The application's main sections, one nav button each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Upload,
    Bulk,
    Calendar,
    Blog,
    Gallery,
    Edit,
    Data,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Upload,
        Section::Bulk,
        Section::Calendar,
        Section::Blog,
        Section::Gallery,
        Section::Edit,
        Section::Data,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Upload => "Upload",
            Section::Bulk => "Bulk Upload",
            Section::Calendar => "Calendar",
            Section::Blog => "Journal",
            Section::Gallery => "Gallery",
            Section::Edit => "Edit Photos",
            Section::Data => "Data",
        }
    }
}

/// Seconds a status banner stays on screen
const BANNER_SECONDS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// A transient status message, dismissed by clock ticks
#[derive(Debug, Clone)]
pub struct StatusBanner {
    pub text: String,
    pub kind: BannerKind,
    remaining: u8,
}

impl StatusBanner {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: BannerKind::Success,
            remaining: BANNER_SECONDS,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: BannerKind::Error,
            remaining: BANNER_SECONDS,
        }
    }

    /// Count down one tick; true once the banner should disappear
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

pub fn banner_view<'a>(banner: &StatusBanner) -> Element<'a, Message> {
    let kind = banner.kind;
    container(text(banner.text.clone()).size(14))
        .width(Length::Fill)
        .padding(10)
        .style(move |theme: &Theme| {
            let palette = theme.extended_palette();
            let pair = match kind {
                BannerKind::Success => palette.success.base,
                BannerKind::Error => palette.danger.base,
            };
            container::Style {
                background: Some(pair.color.into()),
                text_color: Some(pair.text),
                border: Border {
                    radius: 8.0.into(),
                    ..Border::default()
                },
                ..container::Style::default()
            }
        })
        .into()
}

/// Top navigation: section buttons plus the global actions
pub fn nav_bar<'a>(active: Section, dark_mode: bool) -> Element<'a, Message> {
    let mut sections = row![].spacing(4);
    for section in Section::ALL {
        let style: fn(&Theme, button::Status) -> button::Style = if section == active {
            button::primary
        } else {
            button::text
        };
        sections = sections.push(
            button(text(section.label()).size(14))
                .style(style)
                .on_press(Message::SectionSelected(section)),
        );
    }

    row![
        sections,
        horizontal_space(),
        button(text("Refresh").size(14))
            .style(button::secondary)
            .on_press(Message::RefreshRequested),
        button(text("Download JSON").size(14))
            .style(button::secondary)
            .on_press(Message::ExportRequested),
        button(text("Delete All").size(14))
            .style(button::danger)
            .on_press(Message::DeleteAllRequested),
        button(text(if dark_mode { "🌙" } else { "☀️" }).size(14))
            .style(button::text)
            .on_press(Message::DarkModeToggled),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

/// Centered placeholder message for sections with nothing to show
pub fn empty_state<'a>(message: &'a str) -> Element<'a, Message> {
    container(text(message).size(18).style(text::secondary))
        .width(Length::Fill)
        .align_x(Alignment::Center)
        .padding(60)
        .into()
}

/// Placeholder box shown while an image is still downloading
pub fn loading_placeholder<'a>(width: Length, height: Length) -> Element<'a, Message> {
    container(text("Loading…").size(14).style(text::secondary))
        .width(width)
        .height(height)
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .style(container::rounded_box)
        .into()
}

/// Stack a dimmed, click-away overlay on top of the base view
pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    overlay: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message> {
    let base: Element<'a, Message> = base.into();
    let overlay: Element<'a, Message> = overlay.into();

    stack![
        base,
        opaque(
            mouse_area(center(opaque(overlay)).style(|_theme| {
                container::Style {
                    background: Some(
                        Color {
                            a: 0.7,
                            ..Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

/// In-app confirmation card; resolves through `Message::ConfirmResolved`
pub fn confirm_dialog<'a>(message: &'a str) -> Element<'a, Message> {
    container(
        column![
            text(message).size(18),
            row![
                button("Yes, Delete")
                    .style(button::danger)
                    .on_press(Message::ConfirmResolved(true)),
                button("Cancel")
                    .style(button::secondary)
                    .on_press(Message::ConfirmResolved(false)),
            ]
            .spacing(16),
        ]
        .spacing(24)
        .align_x(Alignment::Center),
    )
    .padding(30)
    .max_width(420)
    .style(container::rounded_box)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_expires_after_four_ticks() {
        let mut banner = StatusBanner::success("Done");
        assert!(!banner.tick());
        assert!(!banner.tick());
        assert!(!banner.tick());
        assert!(banner.tick());
    }

    #[test]
    fn test_section_labels_are_distinct() {
        let labels: std::collections::HashSet<_> =
            Section::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels.len(), Section::ALL.len());
    }
}
