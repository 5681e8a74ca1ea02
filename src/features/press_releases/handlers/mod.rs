mod press_release_handler;

pub use press_release_handler::{
    __path_create_press_release, __path_delete_press_release, __path_get_press_release,
    __path_get_press_release_by_url, __path_get_press_release_meta, __path_latest_press_releases,
    __path_list_press_releases, __path_list_press_releases_by_category,
    __path_press_release_category_counts, __path_search_press_releases,
    __path_update_press_release, create_press_release, delete_press_release, get_press_release,
    get_press_release_by_url, get_press_release_meta, latest_press_releases,
    list_press_releases, list_press_releases_by_category, press_release_category_counts,
    search_press_releases, update_press_release,
};
