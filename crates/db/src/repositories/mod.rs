//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod assessment_repo;
pub mod criterion_repo;
pub mod member_repo;
pub mod profile_repo;
pub mod score_repo;
pub mod session_repo;
pub mod user_repo;

pub use assessment_repo::AssessmentRepo;
pub use criterion_repo::CriterionRepo;
pub use member_repo::MemberRepo;
pub use profile_repo::ProfileRepo;
pub use score_repo::ScoreRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
