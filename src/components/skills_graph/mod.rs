mod component;
mod config;
mod geometry;
mod render;
mod state;
mod subscription;
mod types;

pub use component::SkillsGraph;
pub use config::GraphConfig;
pub use types::GraphDataset;
