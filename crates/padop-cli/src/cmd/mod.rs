pub mod config;
pub mod facts;
pub mod handle;
pub mod init;
pub mod status;
