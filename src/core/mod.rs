pub mod depth;
pub mod etl;
pub mod loader;
pub mod marker;
pub mod pipeline;

pub use crate::domain::model::{Datasets, MapDataset};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
