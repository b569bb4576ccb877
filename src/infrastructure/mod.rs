pub mod dataset_reader;
pub mod observability;
pub mod persistence;
pub mod upload_store;

pub use dataset_reader::CsvDatasetReader;
pub use persistence::FsModelStore;
pub use upload_store::UploadStore;
