pub mod chat;
pub mod content;
pub mod headings;
pub mod models;
pub mod navigation;
pub mod notification;
pub mod storage;
pub mod ui;
