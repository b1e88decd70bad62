pub mod alerts;
pub mod config;
pub mod conflicts;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod refresh;
pub mod serve;
pub mod staff;
