//! Report index entries that render incompletely

use anyhow::Result;

use crate::content::IndexEntry;
use crate::Directory;

/// An index entry with the problems found in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Position in index.json
    pub index: usize,
    pub title: Option<String>,
    pub problems: Vec<&'static str>,
}

/// Collect problems over all index entries
pub fn inspect(entries: &[IndexEntry]) -> Vec<Finding> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let (title, problems) = match entry {
                IndexEntry::Post(post) => (post.title.clone(), post.problems()),
                IndexEntry::Stray(_) => (None, vec!["entry is not an object"]),
            };
            (!problems.is_empty()).then_some(Finding {
                index,
                title,
                problems,
            })
        })
        .collect()
}

/// Load the index and fail when any entry is malformed
pub fn run(directory: &Directory) -> Result<()> {
    let entries = directory.loader().load_entries()?;
    let findings = inspect(&entries);

    if findings.is_empty() {
        println!("{} posts, no problems found", entries.len());
        return Ok(());
    }

    println!("Problems ({}):", findings.len());
    for finding in &findings {
        let title = finding.title.as_deref().unwrap_or("(untitled)");
        tracing::warn!("Entry #{} is malformed", finding.index);
        println!(
            "  #{} {}: {}",
            finding.index,
            title,
            finding.problems.join(", ")
        );
    }

    anyhow::bail!(
        "{} of {} entries are malformed",
        findings.len(),
        entries.len()
    )
}
