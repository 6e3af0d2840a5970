pub mod uploads;

pub use uploads::{
    CategoryFilterRequest, PageRequest, PaginatedUploadsResponse, PaginationParams,
    UploadAcceptedResponse, UploadResponse,
};
