pub mod categories;
pub mod press_releases;
pub mod prices;
pub mod report_images;
pub mod reports;
