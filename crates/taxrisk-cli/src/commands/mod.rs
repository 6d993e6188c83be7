pub mod analysis;
pub mod analyze;
pub mod audit;
pub mod clear;
pub mod config;
pub mod dashboard;
pub mod dispatch;
pub mod export;
pub mod import;
pub mod init;
pub mod quarterly;
pub mod report;
pub mod search;
pub mod serve;
pub mod shared;
