mod report_handler;

pub use report_handler::{
    __path_create_report, __path_create_reports_bulk, __path_delete_report,
    __path_generate_payload_from_excel, __path_get_report, __path_get_report_bundle,
    __path_get_report_by_url, __path_get_report_meta, __path_latest_reports, __path_list_reports,
    __path_list_reports_by_category, __path_report_category_counts, __path_search_reports,
    __path_update_report, __path_upload_report_image, create_report, create_reports_bulk,
    delete_report, generate_payload_from_excel, get_report, get_report_bundle, get_report_by_url,
    get_report_meta, latest_reports, list_reports, list_reports_by_category,
    report_category_counts, search_reports, update_report, upload_report_image, ReportState,
};
