/// Edit section: photo selector plus the metadata edit form
///
/// The selector lists every photo sorted by title. Choosing one loads the
/// form and zeroes the pending rotation; choosing the leading "none" entry
/// clears the form. The rotation button only turns the preview; the pixels
/// are rotated server-side on save.

use std::fmt;

use iced::widget::{button, column, pick_list, row, text, text_editor, text_input};
use iced::{Alignment, Degrees, Element, Length, Rotation};

use super::{loading_placeholder, ImageCache};
use crate::state::data::PhotoRecord;
use crate::state::forms::{EditForm, EditStage};
use crate::state::index::PhotoIndex;
use crate::Message;

/// One entry of the selector; the leading entry carries no id and stands
/// for "no selection"
#[derive(Debug, Clone, PartialEq)]
pub struct EditChoice {
    pub id: Option<String>,
    label: String,
}

impl EditChoice {
    pub fn none() -> Self {
        Self {
            id: None,
            label: "-- Select a photo --".to_string(),
        }
    }

    pub fn for_record(record: &PhotoRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            label: format!(
                "{} ({})",
                record.title,
                record.taken_at.format("%-m/%-d/%Y")
            ),
        }
    }
}

impl fmt::Display for EditChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// All selector entries, sorted by title rather than date
pub fn choices(index: &PhotoIndex) -> Vec<EditChoice> {
    std::iter::once(EditChoice::none())
        .chain(index.by_title().into_iter().map(EditChoice::for_record))
        .collect()
}

fn selected_choice(form: &EditForm, index: &PhotoIndex) -> EditChoice {
    form.target
        .as_ref()
        .and_then(|id| index.find_by_id(id))
        .map(EditChoice::for_record)
        .unwrap_or_else(EditChoice::none)
}

pub fn view<'a>(
    form: &'a EditForm,
    index: &PhotoIndex,
    images: &ImageCache,
) -> Element<'a, Message> {
    let selector = pick_list(
        choices(index),
        Some(selected_choice(form, index)),
        Message::EditTargetSelected,
    )
    .width(Length::Fixed(420.0));

    let mut content = column![text("Edit Photos").size(28), selector].spacing(14);

    if let Some(id) = &form.target {
        if let Some(record) = index.find_by_id(id) {
            content = content.push(preview(record, form.rotation, images));
        }

        content = content
            .push(
                text_input("Photo title", &form.title)
                    .on_input(Message::EditTitleChanged)
                    .padding(8),
            )
            .push(
                row![
                    text_input("Date (YYYY-MM-DD)", &form.date)
                        .on_input(Message::EditDateChanged)
                        .padding(8),
                    text_input("Time (HH:MM)", &form.time)
                        .on_input(Message::EditTimeChanged)
                        .padding(8),
                ]
                .spacing(10),
            )
            .push(
                text_input("Location", &form.location)
                    .on_input(Message::EditLocationChanged)
                    .padding(8),
            )
            .push(
                text_editor(&form.description)
                    .placeholder("Description")
                    .on_action(Message::EditDescriptionEdited)
                    .padding(8),
            )
            .push(
                row![
                    button("Rotate 90°")
                        .style(button::secondary)
                        .on_press(Message::RotatePressed),
                    button(if form.in_flight { "Saving…" } else { "Save Changes" })
                        .style(button::primary)
                        .on_press_maybe(form.is_valid().then_some(Message::SaveEditPressed)),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            );

        if form.stage() == EditStage::Dirty {
            content = content.push(text("Unsaved changes").size(13).style(text::danger));
        }
    }

    content.max_width(560).into()
}

fn preview<'a>(record: &PhotoRecord, rotation: u32, images: &ImageCache) -> Element<'a, Message> {
    match images.get(&record.file_name) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fixed(360.0))
            .height(Length::Fixed(280.0))
            .content_fit(iced::ContentFit::Contain)
            .rotation(Rotation::Floating(Degrees(rotation as f32).into()))
            .into(),
        None => loading_placeholder(Length::Fixed(360.0), Length::Fixed(280.0)),
    }
}
