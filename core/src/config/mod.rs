mod load;
mod types;

pub use load::{load_default, load_from_path, CONFIG_FILE_NAME};
pub use types::*;
