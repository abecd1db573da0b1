/// State management module
///
/// This module holds the application's domain state:
/// - Photo records and wire shapes (data.rs)
/// - The grouped + flat photo index every view reads (index.rs)
/// - Upload, bulk-upload and edit form state (forms.rs)

pub mod data;
pub mod forms;
pub mod index;
