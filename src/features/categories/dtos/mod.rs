pub mod category_dto;

pub use category_dto::{CategoryCountDto, CategoryResponseDto, CreateCategoryDto};
