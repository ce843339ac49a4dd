//! Plain-text download of a finished story.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const STORY_FILE_NAME: &str = "story.txt";
pub const STORY_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// `Content-Disposition` value for serving a story as a download.
pub fn content_disposition() -> String {
    format!("attachment; filename=\"{}\"", STORY_FILE_NAME)
}

/// Writes the story as-is. A directory target gets a `story.txt` inside it.
pub fn write_story(target: &Path, story: &str) -> io::Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(STORY_FILE_NAME)
    } else {
        target.to_path_buf()
    };
    fs::write(&path, story)?;
    log::info!("Wrote {} bytes to {}", story.len(), path.display());
    Ok(path)
}
