pub mod assessment_service;
pub mod llm_service;
pub mod normalizer;
pub mod prompt_builder;
