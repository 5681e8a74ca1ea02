mod report_dto;

pub use report_dto::{
    CreateReportWithImagesDto, FileUploadForm, LatestReportDto, ReportBundleDto, ReportDetailDto,
    ReportListItemDto, ReportMetaDto, ReportPayloadDto, ReportResponseDto, ReportWithImagesDto,
    UploadImageResponseDto,
};
