pub mod category_handler;

pub use category_handler::{
    __path_create_categories_bulk, __path_create_category, __path_get_category,
    __path_get_category_by_url, __path_list_categories, create_categories_bulk, create_category,
    get_category, get_category_by_url, list_categories,
};
