mod price_dto;

pub use price_dto::PriceResponseDto;
