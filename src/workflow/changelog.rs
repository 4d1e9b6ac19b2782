use tracing::{debug, info};

use crate::context::AppContext;
use crate::domain::revision::{EntryLimit, RevisionEntry};
use crate::error::AppResult;
use crate::services::IdentityService;

const BULLET: &str = "    * ";
/// Continuation lines line up with the text after the bullet.
const CONTINUATION: &str = "\n      ";

pub async fn generate_changelog(ctx: &AppContext, limit: EntryLimit) -> AppResult<String> {
    let entries = ctx.history.fetch_log(limit).await?;
    info!(
        count = entries.len(),
        workspace = %ctx.config.workspace_root.display(),
        "fetched revision history"
    );
    Ok(assemble(&entries, ctx.identities.as_ref()).await)
}

/// Renders entries as ChangeLog blocks.
///
/// Consecutive entries with the same date and author share one header. Each
/// block lists its messages in the reverse of the order they were supplied.
pub async fn assemble(entries: &[RevisionEntry], identities: &dyn IdentityService) -> String {
    let mut writer = ChangelogWriter::default();
    for entry in entries {
        let date = entry.display_date();
        let identity = identities.resolve(&entry.author).await;
        let Some(message) = format_message(&entry.message) else {
            debug!(revision = %entry.revision, "skipping entry with empty message");
            continue;
        };
        writer.push(date, identity, message);
    }
    writer.finish()
}

/// Bulleted, indented form of a commit message; `None` when it is blank.
pub fn format_message(message: &str) -> Option<String> {
    let message = message.trim();
    if message.is_empty() {
        return None;
    }

    let mut formatted = format!("{BULLET}{message}");
    // A lone blank line is a subject/body separator; drop it.
    if formatted.matches("\n\n").count() == 1 {
        formatted = formatted.replacen("\n\n", "\n", 1);
    }
    Some(formatted.replace('\n', CONTINUATION))
}

struct Group {
    date: String,
    identity: String,
    messages: Vec<String>,
}

#[derive(Default)]
struct ChangelogWriter {
    output: String,
    group: Option<Group>,
}

impl ChangelogWriter {
    fn push(&mut self, date: &str, identity: String, message: String) {
        match &mut self.group {
            Some(group) if group.date == date && group.identity == identity => {
                group.messages.push(message)
            }
            _ => {
                self.flush();
                self.group = Some(Group {
                    date: date.to_string(),
                    identity,
                    messages: vec![message],
                });
            }
        }
    }

    fn flush(&mut self) {
        let Some(group) = self.group.take() else {
            return;
        };
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output.push_str(&group.date);
        self.output.push(' ');
        self.output.push_str(&group.identity);
        self.output.push('\n');
        for message in group.messages.iter().rev() {
            self.output.push_str(message);
            self.output.push('\n');
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output
    }
}
