//! Interactive collision confirmation.

use dialoguer::Confirm;
use retar::edit::CollisionPrompt;

/// Asks on the terminal whether a duplicate should be stored renamed.
pub struct ConfirmPrompt;

impl CollisionPrompt for ConfirmPrompt {
    fn confirm(&self, name: &str) -> bool {
        Confirm::new()
            .with_prompt(format!(
                "File with the same name already exists in the tarball: {}. Append it?",
                name
            ))
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}
