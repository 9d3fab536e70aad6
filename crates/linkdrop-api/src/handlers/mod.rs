pub mod delete;
pub mod download;
pub mod home;
pub mod ping;
pub mod upload;
