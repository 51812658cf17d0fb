pub mod course_api;
pub mod course_client;

pub use course_api::{extract_id, CourseApi, Session};
pub use course_client::CourseClient;
