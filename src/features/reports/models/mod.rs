mod report;

pub use report::{LatestReportRow, Report, ReportDetailRow, ReportListRow, ReportMetaRow};
