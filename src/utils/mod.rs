pub mod datetime;
pub mod highlight;
pub mod html_parser;
pub mod theme_loader;
