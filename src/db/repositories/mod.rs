//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod competition_repo;
pub mod entry_repo;
pub mod judge_repo;
pub mod rating_repo;
pub mod rubric_repo;

pub use competition_repo::CompetitionRepository;
pub use entry_repo::EntryRepository;
pub use judge_repo::JudgeRepository;
pub use rating_repo::RatingRepository;
pub use rubric_repo::RubricRepository;
