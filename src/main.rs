use chrono::{Local, NaiveDate, NaiveDateTime};
use iced::widget::{column, container, scrollable, text, text_editor};
use iced::{Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

mod api;
mod export;
mod prefs;
mod state;
mod ui;

use api::{Gateway, UpdateRequest, UploadFields};
use prefs::Preferences;
use state::data::{GroupedPhotos, PhotoRecord};
use state::forms::{BulkForm, EditForm, UploadForm, UploadOutcome, IMAGE_EXTENSIONS};
use state::index::PhotoIndex;
use ui::calendar::MonthCursor;
use ui::edit::EditChoice;
use ui::{ImageCache, Section, StatusBanner};

/// A destructive action awaiting the user's confirmation
#[derive(Debug, Clone)]
enum PendingAction {
    DeleteOne(String),
    DeleteAll,
}

impl PendingAction {
    fn prompt(&self) -> &'static str {
        match self {
            PendingAction::DeleteOne(_) => {
                "Are you sure you want to delete this photo? This cannot be undone."
            }
            PendingAction::DeleteAll => {
                "Are you sure you want to permanently delete ALL photos? This action cannot be undone."
            }
        }
    }
}

/// Main application state.
///
/// Every mutation of the photo index happens synchronously inside
/// `update`; async work only ever reports back as messages, so no index
/// mutation spans a suspension point.
struct PhotoJournal {
    gateway: Gateway,
    /// The canonical photo collection all views project from
    index: PhotoIndex,
    /// Flat metadata for the data section; `None` until first fetched
    metadata: Option<BTreeMap<String, PhotoRecord>>,
    metadata_failed: bool,
    /// Downloaded image handles keyed by server file name
    images: ImageCache,
    /// File names with a fetch already in flight
    pending_images: HashSet<String>,
    section: Section,
    calendar: MonthCursor,
    /// Active calendar day filter; `None` shows everything
    selected_date: Option<NaiveDate>,
    upload: UploadForm,
    bulk: BulkForm,
    edit: EditForm,
    /// Photo id currently open in the full-screen viewer
    viewer: Option<String>,
    pending_confirm: Option<PendingAction>,
    banner: Option<StatusBanner>,
    preferences: Preferences,
    preferences_path: PathBuf,
    now: NaiveDateTime,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// One-second clock tick driving the header time and banner dismissal
    Tick,
    SectionSelected(Section),
    DarkModeToggled,
    RefreshRequested,
    EscapePressed,
    FileDropped(PathBuf),

    PhotosLoaded(GroupedPhotos),
    MetadataLoaded(Result<BTreeMap<String, PhotoRecord>, String>),
    ImageFetched(String, Result<Vec<u8>, String>),

    PreviousMonthPressed,
    NextMonthPressed,
    CalendarDayPressed(NaiveDate),

    ViewerOpened(String),
    ViewerClosed,

    ChooseFilesPressed,
    UploadTitleChanged(String),
    UploadDateChanged(String),
    UploadTimeChanged(String),
    UploadLocationChanged(String),
    UploadDescriptionEdited(text_editor::Action),
    SubmitUploadPressed,
    UploadFinished(UploadOutcome),

    ChooseBulkFilesPressed,
    SubmitBulkPressed,
    BulkFinished(Result<String, String>),

    EditTargetSelected(EditChoice),
    EditTitleChanged(String),
    EditDateChanged(String),
    EditTimeChanged(String),
    EditLocationChanged(String),
    EditDescriptionEdited(text_editor::Action),
    RotatePressed,
    SaveEditPressed,
    /// Carries the saved photo's file name so its cached image can be
    /// evicted (the server may have rotated the stored pixels)
    EditSaved(Result<String, String>),

    DeleteRequested(String),
    DeleteAllRequested,
    ConfirmResolved(bool),
    DeleteFinished(String, Result<(), String>),
    DeleteAllFinished(usize, Result<(), String>),

    ExportRequested,
    ExportFinished(Result<usize, String>),
}

impl PhotoJournal {
    fn new() -> (Self, Task<Message>) {
        let preferences_path = prefs::preferences_path();
        let preferences = Preferences::load_or_init(&preferences_path);
        let gateway = Gateway::from_env();
        let now = Local::now().naive_local();

        log::info!("photo journal starting against {}", gateway.base_url());

        let app = PhotoJournal {
            gateway,
            index: PhotoIndex::default(),
            metadata: None,
            metadata_failed: false,
            images: ImageCache::new(),
            pending_images: HashSet::new(),
            section: Section::Upload,
            calendar: MonthCursor::at(now.date()),
            selected_date: None,
            upload: UploadForm::new(now),
            bulk: BulkForm::default(),
            edit: EditForm::default(),
            viewer: None,
            pending_confirm: None,
            banner: None,
            preferences,
            preferences_path,
            now,
        };

        let startup = app.refresh_tasks();
        (app, startup)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                self.now = Local::now().naive_local();
                if let Some(banner) = &mut self.banner {
                    if banner.tick() {
                        self.banner = None;
                    }
                }
                Task::none()
            }

            Message::SectionSelected(section) => {
                self.section = section;
                Task::none()
            }

            Message::DarkModeToggled => {
                self.preferences.dark_mode = !self.preferences.dark_mode;
                if let Err(e) = self.preferences.save(&self.preferences_path) {
                    log::warn!("could not persist display preference: {e}");
                }
                Task::none()
            }

            Message::RefreshRequested => {
                self.banner = Some(StatusBanner::success("Refreshing data from server..."));
                self.refresh_tasks()
            }

            Message::EscapePressed => {
                // Escape closes the image viewer, like clicking outside it
                self.viewer = None;
                Task::none()
            }

            Message::FileDropped(path) => {
                match self.section {
                    Section::Upload => self.upload.add_dropped(path),
                    Section::Bulk => self.bulk.add_dropped(path),
                    _ => {}
                }
                Task::none()
            }

            Message::PhotosLoaded(grouped) => {
                self.index.replace_all(grouped);
                log::info!("photo index refreshed: {} record(s)", self.index.len());

                // Every refresh rebuilds the selector, which resets the
                // edit flow to idle
                self.edit.reset();
                if let Some(id) = &self.viewer {
                    if self.index.find_by_id(id).is_none() {
                        self.viewer = None;
                    }
                }
                self.image_prefetch_tasks()
            }

            Message::MetadataLoaded(result) => {
                match result {
                    Ok(metadata) => {
                        self.metadata = Some(metadata);
                        self.metadata_failed = false;
                    }
                    Err(e) => {
                        log::error!("metadata fetch failed: {e}");
                        self.metadata_failed = true;
                    }
                }
                Task::none()
            }

            Message::ImageFetched(file_name, result) => {
                self.pending_images.remove(&file_name);
                match result {
                    Ok(bytes) => {
                        self.images
                            .insert(file_name, iced::widget::image::Handle::from_bytes(bytes));
                    }
                    Err(e) => log::warn!("image fetch for {file_name} failed: {e}"),
                }
                Task::none()
            }

            Message::PreviousMonthPressed => {
                self.calendar.previous();
                Task::none()
            }

            Message::NextMonthPressed => {
                self.calendar.next();
                Task::none()
            }

            Message::CalendarDayPressed(date) => {
                ui::calendar::toggle_filter(&mut self.selected_date, date);
                Task::none()
            }

            Message::ViewerOpened(id) => {
                self.viewer = Some(id);
                Task::none()
            }

            Message::ViewerClosed => {
                self.viewer = None;
                Task::none()
            }

            Message::ChooseFilesPressed => {
                let picked = FileDialog::new()
                    .set_title("Select Photos")
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_files();
                if let Some(paths) = picked {
                    self.upload.stage(paths);
                }
                Task::none()
            }

            Message::UploadTitleChanged(value) => {
                self.upload.title = value;
                Task::none()
            }
            Message::UploadDateChanged(value) => {
                self.upload.date = value;
                Task::none()
            }
            Message::UploadTimeChanged(value) => {
                self.upload.time = value;
                Task::none()
            }
            Message::UploadLocationChanged(value) => {
                self.upload.location = value;
                Task::none()
            }
            Message::UploadDescriptionEdited(action) => {
                self.upload.description.perform(action);
                Task::none()
            }

            Message::SubmitUploadPressed => {
                if !self.upload.is_valid() {
                    return Task::none();
                }
                self.upload.in_flight = true;

                let fields = UploadFields {
                    title: self.upload.title.trim().to_string(),
                    date: self.upload.date.trim().to_string(),
                    time: self.upload.time.trim().to_string(),
                    location: self.upload.location.trim().to_string(),
                    description: self.upload.description.text().trim_end().to_string(),
                };
                let files = self.upload.staged.clone();
                let gateway = self.gateway.clone();

                Task::perform(
                    upload_files_sequentially(gateway, files, fields),
                    Message::UploadFinished,
                )
            }

            Message::UploadFinished(outcome) => {
                self.upload.in_flight = false;
                self.banner = Some(if outcome.is_failure() {
                    StatusBanner::error(outcome.status_line())
                } else {
                    StatusBanner::success(outcome.status_line())
                });

                if outcome.any_succeeded() {
                    self.upload.clear_after_success();
                    self.refresh_tasks()
                } else {
                    Task::none()
                }
            }

            Message::ChooseBulkFilesPressed => {
                let picked = FileDialog::new()
                    .set_title("Select Photos")
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_files();
                if let Some(paths) = picked {
                    self.bulk.stage(paths);
                }
                Task::none()
            }

            Message::SubmitBulkPressed => {
                if !self.bulk.can_submit() {
                    return Task::none();
                }
                self.bulk.in_flight = true;

                let files = self.bulk.staged.clone();
                let gateway = self.gateway.clone();
                Task::perform(
                    async move { gateway.bulk_upload(&files).await.map_err(|e| e.to_string()) },
                    Message::BulkFinished,
                )
            }

            Message::BulkFinished(result) => {
                self.bulk.in_flight = false;
                match result {
                    Ok(message) => {
                        self.bulk.staged.clear();
                        self.banner = Some(StatusBanner::success(message));
                        self.refresh_tasks()
                    }
                    Err(e) => {
                        // Staged files stay put so the user can retry
                        self.banner =
                            Some(StatusBanner::error(format!("Error during bulk upload: {e}")));
                        Task::none()
                    }
                }
            }

            Message::EditTargetSelected(choice) => {
                match choice.id {
                    None => self.edit.reset(),
                    Some(id) => match self.index.find_by_id(&id) {
                        Some(record) => self.edit.load(record),
                        None => {
                            self.edit.reset();
                            self.banner = Some(StatusBanner::error("Selected photo not found."));
                        }
                    },
                }
                Task::none()
            }

            Message::EditTitleChanged(value) => {
                self.edit.title = value;
                self.edit.touch();
                Task::none()
            }
            Message::EditDateChanged(value) => {
                self.edit.date = value;
                self.edit.touch();
                Task::none()
            }
            Message::EditTimeChanged(value) => {
                self.edit.time = value;
                self.edit.touch();
                Task::none()
            }
            Message::EditLocationChanged(value) => {
                self.edit.location = value;
                self.edit.touch();
                Task::none()
            }
            Message::EditDescriptionEdited(action) => {
                self.edit.description.perform(action);
                self.edit.touch();
                Task::none()
            }

            Message::RotatePressed => {
                self.edit.rotate();
                Task::none()
            }

            Message::SaveEditPressed => {
                if !self.edit.is_valid() {
                    return Task::none();
                }
                let (Some(id), Some(taken_at)) =
                    (self.edit.target.clone(), self.edit.photo_date_time())
                else {
                    return Task::none();
                };
                let Some(record) = self.index.find_by_id(&id) else {
                    return Task::none();
                };
                let file_name = record.file_name.clone();

                self.edit.in_flight = true;
                let request = UpdateRequest {
                    id,
                    title: self.edit.title.trim().to_string(),
                    photo_date_time: taken_at,
                    location: self.edit.location.trim().to_string(),
                    description: self.edit.description.text().trim_end().to_string(),
                    rotation: self.edit.rotation,
                };
                let gateway = self.gateway.clone();

                Task::perform(
                    async move {
                        gateway
                            .update_metadata(&request)
                            .await
                            .map(|_| file_name)
                            .map_err(|e| e.to_string())
                    },
                    Message::EditSaved,
                )
            }

            Message::EditSaved(result) => {
                self.edit.in_flight = false;
                match result {
                    Ok(file_name) => {
                        // The stored pixels may have been rotated; refetch
                        self.images.remove(&file_name);
                        self.pending_images.remove(&file_name);
                        self.banner =
                            Some(StatusBanner::success("Photo metadata updated successfully!"));
                        self.refresh_tasks()
                    }
                    Err(e) => {
                        // Unsaved changes stay in the form
                        self.banner =
                            Some(StatusBanner::error(format!("Error updating photo: {e}")));
                        Task::none()
                    }
                }
            }

            Message::DeleteRequested(id) => {
                self.pending_confirm = Some(PendingAction::DeleteOne(id));
                Task::none()
            }

            Message::DeleteAllRequested => {
                self.pending_confirm = Some(PendingAction::DeleteAll);
                Task::none()
            }

            Message::ConfirmResolved(confirmed) => {
                let Some(action) = self.pending_confirm.take() else {
                    return Task::none();
                };
                if !confirmed {
                    return Task::none();
                }

                let gateway = self.gateway.clone();
                match action {
                    PendingAction::DeleteOne(id) => Task::perform(
                        async move {
                            let result = gateway.delete_photo(&id).await.map_err(|e| e.to_string());
                            (id, result)
                        },
                        |(id, result)| Message::DeleteFinished(id, result),
                    ),
                    PendingAction::DeleteAll => {
                        let count = self.index.len();
                        Task::perform(
                            async move {
                                gateway.delete_all_photos().await.map_err(|e| e.to_string())
                            },
                            move |result| Message::DeleteAllFinished(count, result),
                        )
                    }
                }
            }

            Message::DeleteFinished(id, result) => match result {
                Ok(()) => {
                    // Optimistic local removal; no listing reload needed
                    if let Some(removed) = self.index.remove_by_id(&id) {
                        self.images.remove(&removed.file_name);
                        self.pending_images.remove(&removed.file_name);
                    }
                    if self.viewer.as_deref() == Some(id.as_str()) {
                        self.viewer = None;
                    }
                    if self.edit.target.as_deref() == Some(id.as_str()) {
                        self.edit.reset();
                    }
                    self.banner = Some(StatusBanner::success("Photo deleted successfully!"));
                    self.metadata_task()
                }
                Err(e) => {
                    self.banner = Some(StatusBanner::error(format!("Error deleting photo: {e}")));
                    Task::none()
                }
            },

            Message::DeleteAllFinished(count, result) => match result {
                Ok(()) => {
                    self.index.clear();
                    self.images.clear();
                    self.pending_images.clear();
                    self.viewer = None;
                    self.edit.reset();
                    self.banner =
                        Some(StatusBanner::success(format!("Successfully deleted {count} photos!")));
                    self.metadata_task()
                }
                Err(e) => {
                    self.banner = Some(StatusBanner::error(format!("Error deleting photos: {e}")));
                    Task::none()
                }
            },

            Message::ExportRequested => {
                let suggested = export::default_file_name(self.now.date());
                let Some(destination) = FileDialog::new()
                    .set_title("Save Journal Data")
                    .set_file_name(&suggested)
                    .add_filter("JSON", &["json"])
                    .save_file()
                else {
                    return Task::none();
                };

                let gateway = self.gateway.clone();
                Task::perform(
                    export::write_journal(gateway, destination),
                    Message::ExportFinished,
                )
            }

            Message::ExportFinished(result) => {
                match result {
                    Ok(_count) => {
                        self.banner =
                            Some(StatusBanner::success("JSON data downloaded successfully!"));
                    }
                    Err(e) => {
                        log::error!("export failed: {e}");
                        self.banner = Some(StatusBanner::error("Error downloading JSON data."));
                    }
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let records = self.index.visible(self.selected_date);

        let body: Element<Message> = match self.section {
            Section::Upload => ui::upload::single(&self.upload),
            Section::Bulk => ui::upload::bulk(&self.bulk),
            Section::Calendar => ui::calendar::view(
                self.calendar,
                &self.index,
                self.selected_date,
                self.now.date(),
            ),
            Section::Blog => ui::blog::view(&records, &self.images),
            Section::Gallery => ui::gallery::view(&records, &self.images),
            Section::Edit => ui::edit::view(&self.edit, &self.index, &self.images),
            Section::Data => {
                ui::inspector::view(self.metadata.as_ref(), self.metadata_failed, &self.index)
            }
        };

        let mut page = column![
            ui::nav_bar(self.section, self.preferences.dark_mode),
            text(self.now.format("%A, %B %-d, %Y, %I:%M:%S %p").to_string())
                .size(14)
                .style(text::secondary),
        ]
        .spacing(12);

        if let Some(banner) = &self.banner {
            page = page.push(ui::banner_view(banner));
        }

        page = page.push(
            scrollable(container(body).width(Length::Fill).padding(4)).height(Length::Fill),
        );

        let base = container(page)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(16);

        if let Some(action) = &self.pending_confirm {
            return ui::modal(
                base,
                ui::confirm_dialog(action.prompt()),
                Message::ConfirmResolved(false),
            );
        }

        if let Some(id) = &self.viewer {
            if let Some(record) = self.index.find_by_id(id) {
                return ui::modal(
                    base,
                    ui::gallery::viewer(record, &self.images),
                    Message::ViewerClosed,
                );
            }
        }

        base.into()
    }

    /// Set the application theme from the persisted preference
    fn theme(&self) -> Theme {
        if self.preferences.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(Duration::from_secs(1)).map(|_| Message::Tick),
            iced::event::listen_with(handle_event),
        ])
    }

    /// Reload both the grouped listing and the flat metadata
    fn refresh_tasks(&self) -> Task<Message> {
        let gateway = self.gateway.clone();
        let listing = Task::perform(
            async move { gateway.list_photos().await },
            Message::PhotosLoaded,
        );
        Task::batch([listing, self.metadata_task()])
    }

    fn metadata_task(&self) -> Task<Message> {
        let gateway = self.gateway.clone();
        Task::perform(
            async move { gateway.raw_metadata().await.map_err(|e| e.to_string()) },
            Message::MetadataLoaded,
        )
    }

    /// Start downloads for every image the cache does not hold yet
    fn image_prefetch_tasks(&mut self) -> Task<Message> {
        let mut tasks = Vec::new();
        for record in self.index.records() {
            let file_name = record.file_name.clone();
            if self.images.contains_key(&file_name) || self.pending_images.contains(&file_name) {
                continue;
            }
            self.pending_images.insert(file_name.clone());

            let gateway = self.gateway.clone();
            tasks.push(Task::perform(
                async move {
                    let result = gateway
                        .fetch_image(&file_name)
                        .await
                        .map_err(|e| e.to_string());
                    (file_name, result)
                },
                |(file_name, result)| Message::ImageFetched(file_name, result),
            ));
        }
        Task::batch(tasks)
    }
}

fn handle_event(
    event: Event,
    _status: iced::event::Status,
    _window: iced::window::Id,
) -> Option<Message> {
    match event {
        Event::Window(iced::window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        Event::Keyboard(iced::keyboard::Event::KeyPressed {
            key: iced::keyboard::Key::Named(iced::keyboard::key::Named::Escape),
            ..
        }) => Some(Message::EscapePressed),
        _ => None,
    }
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("Photo Journal", PhotoJournal::update, PhotoJournal::view)
        .subscription(PhotoJournal::subscription)
        .theme(PhotoJournal::theme)
        .centered()
        .run_with(PhotoJournal::new)
}

/// Upload staged files one request at a time, tallying outcomes.
///
/// Sequential by design: per-file success/failure accounting stays simple
/// and at most one upload is in flight at any moment.
async fn upload_files_sequentially(
    gateway: Gateway,
    files: Vec<PathBuf>,
    fields: UploadFields,
) -> UploadOutcome {
    let mut outcome = UploadOutcome::default();
    for file in files {
        match gateway.upload_single(&file, &fields).await {
            Ok(()) => outcome.uploaded += 1,
            Err(e) => {
                outcome.failed += 1;
                log::error!("upload of {} failed: {e}", file.display());
            }
        }
    }
    outcome
}
