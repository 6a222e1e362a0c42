pub mod io;

pub use io::{create_directory, create_directory_timestamp, save_configs};
