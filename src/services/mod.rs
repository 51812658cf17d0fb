pub mod course_creation;
pub mod course_publish;
pub mod course_rename;
pub mod material_upload;
pub mod reconciliation_writer;
pub mod session;

pub use course_creation::CourseCreator;
pub use course_publish::CoursePublisher;
pub use course_rename::CourseRenamer;
pub use material_upload::MaterialUploader;
pub use reconciliation_writer::ReconciliationWriter;
pub use session::{Identity, SessionManager};
