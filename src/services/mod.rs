//! Business logic services

pub mod authorization;
pub mod competition_service;
pub mod entry_service;
pub mod export_service;
pub mod lifecycle_service;
pub mod rating_service;
pub mod rubric_service;
pub mod scoring;

pub use competition_service::CompetitionService;
pub use entry_service::EntryService;
pub use export_service::ExportService;
pub use lifecycle_service::{LifecycleService, SweepStats};
pub use rating_service::RatingService;
pub use rubric_service::RubricService;
