mod workspace;

pub use workspace::{LoadError, SaveError, Workspace};
