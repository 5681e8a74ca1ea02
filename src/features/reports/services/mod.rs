mod excel_import_service;
mod image_upload_service;
mod report_service;

pub use excel_import_service::{is_excel_content_type, ExcelImportService};
pub use image_upload_service::ImageUploadService;
pub use report_service::ReportService;
