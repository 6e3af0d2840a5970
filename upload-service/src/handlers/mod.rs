pub mod fallback;
pub mod health;
pub mod uploads;

pub use fallback::{handle_panic, not_found};
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use uploads::{
    get_upload, get_upload_content, list_uploads, list_uploads_by_category,
    list_uploads_paginated, upload_image,
};
