pub mod cleaning_pipeline;
pub mod preview_sampler;
pub mod rule_engine;
