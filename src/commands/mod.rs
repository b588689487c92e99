pub mod folder;
pub mod prompt;
pub mod serve;
pub mod tag;

use crate::config::Config;
use crate::library::Library;
use crate::utils::error::AppResult;

/// Opens the shared library from the configured database path.
pub(crate) fn open_library(config: &Config) -> AppResult<Library> {
    Library::open(&config.general.database_path)
}
