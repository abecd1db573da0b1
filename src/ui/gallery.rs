/// Grid gallery view and the full-screen viewer content
///
/// Thumbnails flow in a wrapping grid; each tile opens the modal viewer
/// and carries a delete affordance in its corner.

use iced::widget::{button, column, container, mouse_area, stack, text};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use super::{empty_state, loading_placeholder, ImageCache};
use crate::state::data::PhotoRecord;
use crate::Message;

const TILE_SIZE: f32 = 180.0;

pub fn view<'a>(records: &[&'a PhotoRecord], images: &ImageCache) -> Element<'a, Message> {
    if records.is_empty() {
        return empty_state("📸 No photos in gallery yet. Upload some photos to see them here!");
    }

    let tiles: Vec<Element<'a, Message>> = records
        .iter()
        .map(|record| tile(record, images))
        .collect();

    Wrap::with_elements(tiles)
        .spacing(12.0)
        .line_spacing(12.0)
        .into()
}

fn tile<'a>(record: &PhotoRecord, images: &ImageCache) -> Element<'a, Message> {
    let thumbnail: Element<'a, Message> = match images.get(&record.file_name) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fixed(TILE_SIZE))
            .height(Length::Fixed(TILE_SIZE))
            .content_fit(ContentFit::Cover)
            .into(),
        None => loading_placeholder(Length::Fixed(TILE_SIZE), Length::Fixed(TILE_SIZE)),
    };

    let open = mouse_area(thumbnail).on_press(Message::ViewerOpened(record.id.clone()));

    let delete = button(text("×").size(16))
        .style(button::danger)
        .padding(4)
        .on_press(Message::DeleteRequested(record.id.clone()));

    stack![
        open,
        container(delete)
            .width(Length::Fill)
            .align_x(Alignment::End)
            .padding(4),
    ]
    .width(Length::Fixed(TILE_SIZE))
    .height(Length::Fixed(TILE_SIZE))
    .into()
}

/// Content of the full-screen modal: the photo plus a title/date caption
pub fn viewer<'a>(record: &PhotoRecord, images: &ImageCache) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match images.get(&record.file_name) {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fixed(880.0))
            .height(Length::Fixed(560.0))
            .content_fit(ContentFit::Contain)
            .into(),
        None => loading_placeholder(Length::Fixed(880.0), Length::Fixed(560.0)),
    };

    column![
        picture,
        text(record.title.clone()).size(20),
        text(record.taken_at.format("%b %-d, %Y, %I:%M %p").to_string())
            .size(14)
            .style(text::secondary),
    ]
    .spacing(8)
    .align_x(Alignment::Center)
    .into()
}
