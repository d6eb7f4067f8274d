pub mod response;
pub mod user;

pub use response::MessageResponse;
pub use user::{Education, Experience, Language, Project, SkillGroup, User};
