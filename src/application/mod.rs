pub mod use_cases;

pub use use_cases::cleaning_pipeline::CleaningPipeline;
pub use use_cases::preview_sampler::{PreviewSampler, DEFAULT_PREVIEW_ROWS};
pub use use_cases::rule_engine::{
    normalize_whitespace, CleaningRule, RemoveBlankRows, RemoveDuplicates, RuleEngine, TrimSpaces,
};
