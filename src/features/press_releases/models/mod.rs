mod press_release;

pub use press_release::{
    LatestPressReleaseRow, PressRelease, PressReleaseDetailRow, PressReleaseListRow,
    PressReleaseMetaRow,
};
