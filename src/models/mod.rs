pub mod document;
pub mod ids;
pub mod loaders;

pub use document::{derive_display_name, DocumentRef};
pub use ids::{CourseId, MaterialId};
pub use loaders::{load_all_documents, load_first_document};
