pub mod label_set;
pub mod upload;

pub use label_set::LabelSet;
pub use upload::{is_allowed_content_type, UploadRecord, ALLOWED_CONTENT_TYPES};
