//! Idempotent merge of a fetched hosts payload into existing hosts content.
//!
//! Two strategies. Block-replace swaps the sentinel-delimited managed block
//! in place and is byte-stable under repeated application. Line-filter drops
//! lines that name a managed domain and re-appends the payload's data lines;
//! it survives hosts files whose sentinels were mangled by manual edits, at
//! the cost of not keeping a visually distinct managed region.
//!
//! Neither strategy touches the filesystem; callers pass content in and
//! write the result back as a whole file.

use std::collections::BTreeSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};

/// First line of the managed block.
pub const BLOCK_BEGIN: &str = "# fetch-github-hosts begin";

/// Last line of the managed block.
pub const BLOCK_END: &str = "# fetch-github-hosts end";

#[cfg(windows)]
const PLATFORM_EOL: &str = "\r\n";
#[cfg(not(windows))]
const PLATFORM_EOL: &str = "\n";

/// How the fetched payload is folded into the hosts file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Replace the sentinel-delimited managed block in place.
    Block,
    /// Drop lines naming a managed domain, then append the fetched entries.
    Filter,
}

/// Shape check: the payload must contain the begin/end sentinel pair, in
/// order, before anything touches the hosts file.
pub fn validate_payload(payload: &str) -> Result<()> {
    let begin = payload
        .find(BLOCK_BEGIN)
        .ok_or_else(|| FetchError::Validation(format!("missing '{BLOCK_BEGIN}' sentinel")))?;
    if payload[begin..].find(BLOCK_END).is_none() {
        return Err(FetchError::Validation(format!(
            "missing '{BLOCK_END}' sentinel after begin"
        )));
    }
    Ok(())
}

/// Merge `payload` into `current` with the given strategy.
pub fn merge(current: &str, payload: &str, strategy: MergeStrategy) -> Result<String> {
    match strategy {
        MergeStrategy::Block => merge_block(current, payload),
        MergeStrategy::Filter => merge_filter(current, payload),
    }
}

/// Block-replace: swap the existing managed block for the payload, or append
/// the payload after two newlines when no block exists yet.
///
/// Idempotent because the second application finds its own prior output and
/// replaces it byte-for-byte.
pub fn merge_block(current: &str, payload: &str) -> Result<String> {
    let payload = payload.trim_matches('\n');
    validate_payload(payload)?;

    match find_block(current) {
        Some((start, end)) => {
            let mut out = String::with_capacity(current.len() + payload.len());
            out.push_str(&current[..start]);
            out.push_str(payload);
            out.push_str(&current[end..]);
            Ok(out)
        }
        None => Ok(format!("{current}\n\n{payload}\n")),
    }
}

/// Byte range of the managed block in `content`, sentinels included.
/// `None` unless both sentinels are present in order.
fn find_block(content: &str) -> Option<(usize, usize)> {
    let start = content.find(BLOCK_BEGIN)?;
    let end = content[start..].find(BLOCK_END)? + start + BLOCK_END.len();
    Some((start, end))
}

/// Line-filter: keep every comment/blank line and every entry that does not
/// name a managed domain, preserving order and terminator style, then append
/// the payload's data lines.
///
/// A line is dropped only when one of its hostname tokens equals a managed
/// domain exactly; substring matches (e.g. `sub.github.com.internal`) are
/// kept.
pub fn merge_filter(current: &str, payload: &str) -> Result<String> {
    validate_payload(payload)?;

    let eol = line_ending_of(current);
    let managed = managed_domains(payload);

    let mut lines: Vec<&str> = Vec::new();
    for line in current.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            lines.push(line);
            continue;
        }
        if names_managed_domain(line, &managed) {
            continue;
        }
        lines.push(line);
    }

    for line in payload.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push(line);
    }

    let mut out = lines.join(eol);
    out.push_str(eol);
    Ok(out)
}

/// Terminator used when rebuilding the file: whatever `content` already
/// uses, or the platform default for empty content.
fn line_ending_of(content: &str) -> &'static str {
    if content.contains("\r\n") {
        "\r\n"
    } else if content.contains('\n') {
        "\n"
    } else {
        PLATFORM_EOL
    }
}

/// Hostname tokens of the payload's data lines (everything after the address
/// column).
fn managed_domains(payload: &str) -> BTreeSet<&str> {
    let mut set = BTreeSet::new();
    for line in payload.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        set.extend(trimmed.split_whitespace().skip(1));
    }
    set
}

fn names_managed_domain(line: &str, managed: &BTreeSet<&str>) -> bool {
    line.split_whitespace().skip(1).any(|t| managed.contains(t))
}
