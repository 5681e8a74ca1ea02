mod press_release_service;

pub use press_release_service::PressReleaseService;
