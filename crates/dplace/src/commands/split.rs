//! Split command implementation.
//!
//! Prints the mentions of each reference field, one per line, as
//! `key<TAB>locator`.

use anyhow::Result;

use dplace_refs::split;

/// Execute the split command
pub fn execute(fields: &[String]) -> Result<()> {
    for field in fields {
        for mention in split(field) {
            println!("{}\t{}", mention.key, mention.locator.as_deref().unwrap_or(""));
        }
    }
    Ok(())
}
