pub mod course_flow;
pub mod item_ctx;

pub use course_flow::{CourseFlow, ItemOutcome, PublishedCourse};
pub use item_ctx::ItemCtx;
