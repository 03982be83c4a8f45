mod config;
mod error;
mod fetch;
mod gallery;
mod links;
mod video;

pub use config::{Config, Overrides};
pub use error::{Error, FetchError, Result, ValidationError};
pub use fetch::{FileSource, HttpSource, VideoSource};
pub use gallery::{Direction, FolderGroup, SortField, SortKey, VideoList, ViewMode};
pub use links::{
    open_in_browser, parse_base_url, player_url, resolve, thumbnail_url, DEFAULT_BASE_URL,
};
pub use video::{folder_key, folder_name, normalize_path, VideoRecord};
