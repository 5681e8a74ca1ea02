mod report_image_dto;

pub use report_image_dto::{ReportImageInput, ReportImageResponseDto, UpsertReportImageDto};
