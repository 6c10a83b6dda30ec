pub mod archive;
pub mod engine;
pub mod runner;

pub use crate::domain::model::{Report, TaskSummary};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
