//! List tag counts

use anyhow::Result;

use crate::content::tag_counts;
use crate::Directory;

/// Print every tag with its post count, most used first
pub fn run(directory: &Directory) -> Result<()> {
    let posts = directory.loader().load()?;
    let tags = tag_counts(&posts);

    println!("Tags ({}):", tags.len());
    for tc in tags {
        println!("  {} ({})", tc.tag, tc.count);
    }

    Ok(())
}
