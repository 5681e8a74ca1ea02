mod category;

pub use category::{Category, CategoryCount};
