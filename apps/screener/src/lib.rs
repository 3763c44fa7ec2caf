pub mod analyzer;
pub mod config;
pub mod controller;
pub mod errors;
pub mod models;
pub mod projection;
pub mod report;
pub mod theme;
