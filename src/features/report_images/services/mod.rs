mod report_image_service;

pub use report_image_service::ReportImageService;
