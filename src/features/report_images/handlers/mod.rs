mod report_image_handler;

pub use report_image_handler::{
    __path_delete_report_image, __path_search_report_images, __path_upsert_report_image,
    delete_report_image, search_report_images, upsert_report_image,
};
