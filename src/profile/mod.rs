//! Candidate profile: typed records and the validating loader

pub mod model;
pub mod store;

pub use model::{
    Bullet, CandidateProfile, DateRange, Education, Experience, Metadata, Project,
};
pub use store::ProfileStore;
