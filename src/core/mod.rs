pub mod catalog;
pub mod manifest_check;

pub use crate::domain::model::{Model, ModelDisplay, Pricing};
pub use crate::domain::ports::{ConfigProvider, ModelCatalog};
pub use crate::utils::error::Result;
