//! HTTP adapter for object storage endpoints.

mod dto;
mod handlers;
mod routes;
mod upload;

pub use dto::{DownloadQuery, FileListResponse, ListFilesQuery, SignedUrlResponse};
pub use handlers::StorageHandlers;
pub use routes::{download_routes, storage_routes};
pub use upload::{read_upload, UploadForm, UploadedFile, DEFAULT_FOLDER, FOLDER_FIELD};
