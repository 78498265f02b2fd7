//! Shared building blocks for the NFG server and operator CLI.
//!
//! Nothing in here touches the network or the database.

pub mod error;
pub mod image;
pub mod password;
pub mod text;

pub use error::ImageError;
pub use text::{extract_youtube_id, slugify, split_list};
