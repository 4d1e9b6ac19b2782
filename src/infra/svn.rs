use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::domain::revision::{EntryLimit, RevisionEntry};
use crate::error::{AppError, AppResult};
use crate::services::HistorySource;

/// History source backed by `svn log --xml` in a working copy.
pub struct SvnCli {
    binary: String,
    workspace_root: PathBuf,
}

impl SvnCli {
    pub fn new(binary: impl Into<String>, workspace_root: PathBuf) -> Self {
        Self {
            binary: binary.into(),
            workspace_root,
        }
    }

    fn log_args(limit: EntryLimit) -> Vec<String> {
        let mut args = vec![
            "log".to_string(),
            "--xml".to_string(),
            "-r".to_string(),
            "HEAD:0".to_string(),
        ];
        if let EntryLimit::Last(count) = limit {
            args.push("-l".to_string());
            args.push(count.to_string());
        }
        args
    }

    async fn run(&self, args: &[String]) -> AppResult<String> {
        debug!(binary = %self.binary, ?args, "running svn");
        let output = Command::new(&self.binary)
            .args(args)
            .arg("--non-interactive")
            .current_dir(&self.workspace_root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    AppError::VersionControl(format!("svn binary not found: {}", self.binary))
                } else {
                    AppError::Io(err)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(exit_code = output.status.code().unwrap_or(-1), %stderr, "svn log failed");
            return Err(AppError::VersionControl(format!(
                "could not find a subversion repository here: {stderr}"
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl HistorySource for SvnCli {
    #[instrument(skip(self), fields(workspace = %self.workspace_root.display()))]
    async fn fetch_log(&self, limit: EntryLimit) -> AppResult<Vec<RevisionEntry>> {
        let xml = self.run(&Self::log_args(limit)).await?;
        Ok(parse_log(&xml))
    }
}

/// Entries of an `svn log --xml` document, in document order.
pub fn parse_log(xml: &str) -> Vec<RevisionEntry> {
    let mut entries = Vec::new();
    for part in xml.split("<logentry").skip(1) {
        let entry_xml = match part.find("</logentry>") {
            Some(pos) => &part[..pos],
            None => part,
        };
        let Some(revision) = extract_attribute(entry_xml, "revision")
            .filter(|rev| rev.parse::<u64>().is_ok())
        else {
            warn!("skipping svn log entry without a revision number");
            continue;
        };
        entries.push(RevisionEntry::new(
            revision,
            extract_tag_content(entry_xml, "author").unwrap_or_default(),
            extract_tag_content(entry_xml, "date").unwrap_or_default(),
            extract_tag_content(entry_xml, "msg").unwrap_or_default(),
        ));
    }
    debug!(count = entries.len(), "parsed svn log entries");
    entries
}

fn extract_tag_content(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut search_from = 0;
    while let Some(rel_pos) = xml[search_from..].find(&open) {
        let start = search_from + rel_pos;
        let after_open = &xml[start + open.len()..];
        match after_open.chars().next() {
            Some('>') => {}
            Some(c) if c.is_ascii_whitespace() => {}
            Some('/') => return Some(String::new()),
            _ => {
                search_from = start + open.len();
                continue;
            }
        }
        let content_start = after_open.find('>')? + 1;
        let content = &after_open[content_start..];
        let end = content.find(&close)?;
        return Some(xml_unescape(&content[..end]));
    }
    None
}

fn extract_attribute(fragment: &str, attr: &str) -> Option<String> {
    let tag_end = fragment.find('>').unwrap_or(fragment.len());
    let head = &fragment[..tag_end];
    for quote in ['"', '\''] {
        let pattern = format!("{attr}={quote}");
        if let Some(pos) = head.find(&pattern) {
            let value = &head[pos + pattern.len()..];
            let end = value.find(quote)?;
            return Some(value[..end].to_string());
        }
    }
    None
}

fn xml_unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
