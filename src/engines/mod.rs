pub mod platforms;

pub use platforms::{get_platform, Evaluate, Platform};
