/// Form state for the upload, bulk-upload and edit flows
///
/// All pending, not-yet-submitted user input lives here: staged files,
/// text fields, and the metadata edit with its rotation delta. Nothing in
/// this module talks to the network; orchestration happens in `main.rs`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use iced::widget::text_editor;
use std::path::{Path, PathBuf};

use super::data::PhotoRecord;

/// Extensions offered by the file picker dialogs
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff"];

/// Whether a staged path looks like an image, by extension
pub fn is_image_file(path: &Path) -> bool {
    image::ImageFormat::from_path(path).is_ok()
}

/// Keep only image files, preserving order
pub fn filter_images(files: Vec<PathBuf>) -> Vec<PathBuf> {
    files.into_iter().filter(|f| is_image_file(f)).collect()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// The single-upload form: one metadata set applied to every staged file
pub struct UploadForm {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: text_editor::Content,
    pub staged: Vec<PathBuf>,
    pub in_flight: bool,
}

impl UploadForm {
    /// A fresh form with date and time prefilled from the clock
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            title: String::new(),
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M").to_string(),
            location: String::new(),
            description: text_editor::Content::new(),
            staged: Vec::new(),
            in_flight: false,
        }
    }

    /// Replace the staged set with a fresh picker selection
    pub fn stage(&mut self, files: Vec<PathBuf>) {
        self.staged = filter_images(files);
    }

    /// Add one dropped file; non-images and duplicates are ignored
    pub fn add_dropped(&mut self, file: PathBuf) {
        if is_image_file(&file) && !self.staged.contains(&file) {
            self.staged.push(file);
        }
    }

    /// Submit is enabled only when every constraint holds at once
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
            && self.parsed_date().is_some()
            && self.parsed_time().is_some()
            && !self.staged.is_empty()
            && !self.in_flight
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn parsed_time(&self) -> Option<NaiveTime> {
        parse_time(&self.time)
    }

    /// Clear the fields the original form clears after a successful upload;
    /// date and time stay put for the next entry
    pub fn clear_after_success(&mut self) {
        self.title.clear();
        self.location.clear();
        self.description = text_editor::Content::new();
        self.staged.clear();
    }
}

/// The bulk-upload form: files only, the server names and dates them
#[derive(Default)]
pub struct BulkForm {
    pub staged: Vec<PathBuf>,
    pub in_flight: bool,
}

impl BulkForm {
    pub fn stage(&mut self, files: Vec<PathBuf>) {
        self.staged = filter_images(files);
    }

    pub fn add_dropped(&mut self, file: PathBuf) {
        if is_image_file(&file) && !self.staged.contains(&file) {
            self.staged.push(file);
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.staged.is_empty() && !self.in_flight
    }
}

/// Tally of a sequential multi-file upload run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOutcome {
    pub uploaded: usize,
    pub failed: usize,
}

impl UploadOutcome {
    pub fn any_succeeded(&self) -> bool {
        self.uploaded > 0
    }

    pub fn is_failure(&self) -> bool {
        self.failed > 0
    }

    /// Status banner wording; partial failures report both counts
    pub fn status_line(&self) -> String {
        if self.failed > 0 {
            if self.uploaded > 0 {
                format!(
                    "{} file(s) failed to upload. {} uploaded successfully.",
                    self.failed, self.uploaded
                )
            } else {
                format!("{} file(s) failed to upload.", self.failed)
            }
        } else {
            format!("Successfully uploaded {} photo(s)!", self.uploaded)
        }
    }
}

/// Where the edit flow currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStage {
    /// No photo selected, form hidden
    Idle,
    /// A photo is loaded into the form, nothing changed yet
    Loaded,
    /// Unsaved field edits and/or a pending rotation delta
    Dirty,
}

/// The metadata edit form for one selected photo.
///
/// Rotation is a pending delta in degrees, applied server-side on save;
/// it always starts at zero when a photo is (re)selected.
#[derive(Default)]
pub struct EditForm {
    pub target: Option<String>,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: text_editor::Content,
    pub rotation: u32,
    dirty: bool,
    pub in_flight: bool,
}

impl EditForm {
    /// Back to idle, discarding any unsaved changes
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Populate the form from a record, zeroing the rotation delta
    pub fn load(&mut self, record: &PhotoRecord) {
        self.target = Some(record.id.clone());
        self.title = record.title.clone();
        self.date = record.taken_at.format("%Y-%m-%d").to_string();
        self.time = record.taken_at.format("%H:%M").to_string();
        self.location = record.location.clone();
        self.description = text_editor::Content::with_text(&record.description);
        self.rotation = 0;
        self.dirty = false;
        self.in_flight = false;
    }

    /// Mark the loaded record as edited
    pub fn touch(&mut self) {
        if self.target.is_some() {
            self.dirty = true;
        }
    }

    /// Advance the preview rotation by 90 degrees clockwise
    pub fn rotate(&mut self) {
        if self.target.is_some() {
            self.rotation = (self.rotation + 90) % 360;
            self.dirty = true;
        }
    }

    pub fn stage(&self) -> EditStage {
        if self.target.is_none() {
            EditStage::Idle
        } else if self.dirty {
            EditStage::Dirty
        } else {
            EditStage::Loaded
        }
    }

    pub fn is_valid(&self) -> bool {
        self.target.is_some()
            && !self.title.trim().is_empty()
            && self.photo_date_time().is_some()
            && !self.in_flight
    }

    /// The edited timestamp, recombined from the date and time fields
    pub fn photo_date_time(&self) -> Option<NaiveDateTime> {
        Some(NaiveDateTime::new(
            parse_date(&self.date)?,
            parse_time(&self.time)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, taken_at: &str) -> PhotoRecord {
        PhotoRecord {
            id: id.to_string(),
            file_name: format!("{id}.jpg"),
            title: title.to_string(),
            taken_at: NaiveDateTime::parse_from_str(taken_at, "%Y-%m-%dT%H:%M:%S").unwrap(),
            location: "Park".to_string(),
            description: "First\nSecond".to_string(),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-03-10T08:30:00", "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_filter_images_drops_non_images() {
        let files = vec![
            PathBuf::from("a.jpg"),
            PathBuf::from("notes.txt"),
            PathBuf::from("b.PNG"),
        ];
        let kept = filter_images(files);
        assert_eq!(kept, vec![PathBuf::from("a.jpg"), PathBuf::from("b.PNG")]);
    }

    #[test]
    fn test_upload_form_prefills_date_and_time() {
        let form = UploadForm::new(now());
        assert_eq!(form.date, "2024-03-10");
        assert_eq!(form.time, "08:30");
    }

    #[test]
    fn test_upload_form_validity_requires_everything() {
        let mut form = UploadForm::new(now());
        assert!(!form.is_valid()); // no title, no files

        form.title = "Trip".to_string();
        assert!(!form.is_valid()); // still no files

        form.stage(vec![PathBuf::from("a.jpg")]);
        assert!(form.is_valid());

        form.date = "not-a-date".to_string();
        assert!(!form.is_valid());

        form.date = "2024-03-10".to_string();
        form.in_flight = true;
        assert!(!form.is_valid());
    }

    #[test]
    fn test_upload_clear_after_success_keeps_date_and_time() {
        let mut form = UploadForm::new(now());
        form.title = "Trip".to_string();
        form.location = "Beach".to_string();
        form.stage(vec![PathBuf::from("a.jpg")]);

        form.clear_after_success();
        assert!(form.title.is_empty());
        assert!(form.location.is_empty());
        assert!(form.staged.is_empty());
        assert_eq!(form.date, "2024-03-10");
        assert_eq!(form.time, "08:30");
    }

    #[test]
    fn test_add_dropped_ignores_non_images_and_duplicates() {
        let mut form = UploadForm::new(now());
        form.add_dropped(PathBuf::from("a.jpg"));
        form.add_dropped(PathBuf::from("a.jpg"));
        form.add_dropped(PathBuf::from("readme.md"));
        assert_eq!(form.staged, vec![PathBuf::from("a.jpg")]);
    }

    #[test]
    fn test_bulk_submit_needs_staged_files() {
        let mut form = BulkForm::default();
        assert!(!form.can_submit());

        form.stage(vec![PathBuf::from("a.jpg"), PathBuf::from("b.txt")]);
        assert_eq!(form.staged.len(), 1);
        assert!(form.can_submit());

        form.in_flight = true;
        assert!(!form.can_submit());
    }

    #[test]
    fn test_outcome_wording_on_partial_failure() {
        let outcome = UploadOutcome { uploaded: 2, failed: 1 };
        assert!(outcome.is_failure());
        assert!(outcome.any_succeeded());

        let line = outcome.status_line();
        assert!(line.contains("1 file(s) failed"));
        assert!(line.contains("2 uploaded successfully"));
    }

    #[test]
    fn test_outcome_wording_on_full_success() {
        let outcome = UploadOutcome { uploaded: 3, failed: 0 };
        assert_eq!(outcome.status_line(), "Successfully uploaded 3 photo(s)!");
    }

    #[test]
    fn test_edit_stage_transitions() {
        let mut form = EditForm::default();
        assert_eq!(form.stage(), EditStage::Idle);

        form.load(&record("a", "Cat", "2024-01-05T10:00:00"));
        assert_eq!(form.stage(), EditStage::Loaded);
        assert_eq!(form.rotation, 0);
        assert_eq!(form.title, "Cat");

        form.rotate();
        assert_eq!(form.stage(), EditStage::Dirty);
        assert_eq!(form.rotation, 90);

        // Reselecting discards unsaved changes and zeroes the rotation
        form.load(&record("b", "Dog", "2024-01-06T11:00:00"));
        assert_eq!(form.stage(), EditStage::Loaded);
        assert_eq!(form.rotation, 0);

        form.reset();
        assert_eq!(form.stage(), EditStage::Idle);
    }

    #[test]
    fn test_rotation_wraps_back_to_zero() {
        let mut form = EditForm::default();
        form.load(&record("a", "Cat", "2024-01-05T10:00:00"));
        for _ in 0..4 {
            form.rotate();
        }
        assert_eq!(form.rotation, 0);
        assert_eq!(form.stage(), EditStage::Dirty);
    }

    #[test]
    fn test_edit_photo_date_time_recombines_fields() {
        let mut form = EditForm::default();
        form.load(&record("a", "Cat", "2024-01-05T10:15:00"));
        form.date = "2024-02-01".to_string();
        form.time = "18:45".to_string();

        let expected =
            NaiveDateTime::parse_from_str("2024-02-01T18:45:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        assert_eq!(form.photo_date_time(), Some(expected));
    }

    #[test]
    fn test_edit_touch_only_marks_loaded_forms() {
        let mut form = EditForm::default();
        form.touch();
        assert_eq!(form.stage(), EditStage::Idle);
    }
}
