use anyhow::{anyhow, Context, Result};

use crate::backend::MovieRecord;

/// Open a URL in the user's default browser
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url)
        .with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

/// Open a movie's TMDb page. Fails when the record carries no TMDb id
/// (some sparse upstream records don't).
pub fn open_movie(record: &MovieRecord) -> Result<String> {
    let url = record
        .tmdb_url()
        .ok_or_else(|| anyhow!("'{}' has no TMDb id to open", record.title))?;
    open_url(&url)?;
    Ok(url)
}
