mod report_image;

pub use report_image::ReportImage;
