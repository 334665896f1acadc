pub mod admin;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod links;
pub mod mail;
pub mod messages;
pub mod settings;
pub mod state;
pub mod storage;
pub mod teachers;
