pub mod camera;
pub mod config_storage;
pub mod files;
pub mod paths;
pub mod session_file;
pub mod supabase;

pub use crate::camera::CommandCamera;
pub use crate::config_storage::ConfigStorage;
pub use crate::session_file::FileSessionStore;
pub use crate::supabase::{SupabaseApplicationRepository, SupabaseClient, SupabaseDocumentStore};
