pub mod directory;
pub mod fixed;

pub use directory::{DirectoryLookup, SupabaseDirectory};
pub use fixed::StaticDirectory;
