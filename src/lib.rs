pub mod config;
pub mod form;
pub mod media;
pub mod observability;
pub mod provider;
pub mod storage;
