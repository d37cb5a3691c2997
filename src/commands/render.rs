//! Render the directory page to a file or stdout

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::helpers::Location;
use crate::Directory;

/// Render the page for `query` and write it out
///
/// The page is written even when the index fails to load, it then carries
/// the error message; the command still fails afterwards.
pub fn run(directory: &Directory, query: &str, output: Option<&Path>) -> Result<()> {
    let location = Location::parse(&format!("/?{}", query.trim_start_matches('?')));
    let (page, result) = directory.render_page(&location);
    let html = page.to_html();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &html)?;
            tracing::info!("Wrote {:?}", path);
        }
        None => print!("{}", html),
    }

    let posts = result?;
    tracing::info!("Rendered {} posts", posts.len());
    Ok(())
}
