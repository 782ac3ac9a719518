pub mod error;
pub mod inflector;
pub mod layout;
pub mod resource;

pub use error::ScaffoldError;
pub use layout::{ConfigSource, ProjectLayout, ResolvedLayout, LAYOUT_FILE_NAME};
pub use resource::{ArtifactKind, ResourceName};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
