mod press_release_dto;

pub use press_release_dto::{
    LatestPressReleaseDto, PressReleaseDetailDto, PressReleaseListItemDto, PressReleaseMetaDto,
    PressReleasePayloadDto, PressReleaseResponseDto,
};
