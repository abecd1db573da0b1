/// Upload sections: the single-upload form and the bulk staging area
///
/// Both stage files through the picker or window drag-and-drop, filtered
/// to images. The single form requires title, date and time before its
/// submit button enables; bulk only needs at least one staged file.

use std::path::PathBuf;

use iced::widget::{button, column, row, text, text_editor, text_input};
use iced::Element;

use crate::state::forms::{BulkForm, UploadForm};
use crate::Message;

pub fn single<'a>(form: &'a UploadForm) -> Element<'a, Message> {
    column![
        text("Upload & Create Post").size(28),
        text("Pick image files or drop them anywhere in the window.")
            .size(14)
            .style(text::secondary),
        button("Choose Photos…")
            .style(button::secondary)
            .on_press(Message::ChooseFilesPressed),
        staged_list(&form.staged),
        text_input("Photo title", &form.title)
            .on_input(Message::UploadTitleChanged)
            .padding(8),
        row![
            text_input("Date (YYYY-MM-DD)", &form.date)
                .on_input(Message::UploadDateChanged)
                .padding(8),
            text_input("Time (HH:MM)", &form.time)
                .on_input(Message::UploadTimeChanged)
                .padding(8),
        ]
        .spacing(10),
        text_input("Location (optional)", &form.location)
            .on_input(Message::UploadLocationChanged)
            .padding(8),
        text_editor(&form.description)
            .placeholder("Description (optional)")
            .on_action(Message::UploadDescriptionEdited)
            .padding(8),
        button(if form.in_flight { "Uploading…" } else { "Upload Photos" })
            .style(button::primary)
            .on_press_maybe(form.is_valid().then_some(Message::SubmitUploadPressed)),
    ]
    .spacing(12)
    .max_width(560)
    .into()
}

pub fn bulk<'a>(form: &'a BulkForm) -> Element<'a, Message> {
    column![
        text("Bulk Upload").size(28),
        text("Stage as many image files as you like; the server names and dates them.")
            .size(14)
            .style(text::secondary),
        button("Choose Photos…")
            .style(button::secondary)
            .on_press(Message::ChooseBulkFilesPressed),
        staged_list(&form.staged),
        button(if form.in_flight { "Uploading…" } else { "Upload All" })
            .style(button::primary)
            .on_press_maybe(form.can_submit().then_some(Message::SubmitBulkPressed)),
    ]
    .spacing(12)
    .max_width(560)
    .into()
}

fn staged_list<'a>(staged: &[PathBuf]) -> Element<'a, Message> {
    if staged.is_empty() {
        return text("No files staged.").size(14).style(text::secondary).into();
    }

    let mut list = column![text(format!("{} file(s) staged:", staged.len())).size(14)].spacing(4);
    for file in staged {
        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        list = list.push(text(name).size(13).style(text::secondary));
    }
    list.into()
}
