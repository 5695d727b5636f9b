pub mod assessment_dto;
pub mod generation_dto;
