use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + DeserializeOwned + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<()>;
}
