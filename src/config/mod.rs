pub mod traits;
pub mod loader;
pub mod platform;

pub use loader::{load_configs, IncludeLoader};
pub use platform::{Modality, PlatformConfig};
pub use traits::ConfigSection;
