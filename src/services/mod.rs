pub mod datasource;
pub mod jobs;
pub mod source_reader;
pub mod staging;
pub mod upload_source;
