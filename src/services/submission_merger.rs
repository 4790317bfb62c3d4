//! 花名册与提交记录合并
//!
//! 每个花名册条目输出一行，顺序与花名册一致。

use crate::models::row::{NOTE_NO_SUBMISSION, STATUS_NOT_SUBMITTED, STATUS_SUBMITTED};
use crate::models::{RosterEntry, StudentRow, SubmissionRecord};
use crate::services::username_extractor::UsernameExtractor;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use tracing::debug;

pub const NOTE_NO_HANDLE: &str = "No GitHub username found in submission";

/// 从一条提交记录中得到的字段
#[derive(Debug, Clone, PartialEq, Eq)]
struct Derived {
    status: String,
    submitted_at: String,
    submission_url: String,
    handle: String,
}

/// 合并服务
pub struct SubmissionMerger<'a> {
    extractor: &'a UsernameExtractor,
}

impl<'a> SubmissionMerger<'a> {
    pub fn new(extractor: &'a UsernameExtractor) -> Self {
        Self { extractor }
    }

    /// 合并花名册与主作业、备用作业的提交记录
    ///
    /// 主作业没有提交，或有提交但提取不到用户名时，查备用作业；备用作业的值整体覆盖主作业。
    pub fn merge(
        &self,
        roster: &[RosterEntry],
        primary: &[SubmissionRecord],
        fallback: &[SubmissionRecord],
    ) -> Vec<StudentRow> {
        let primary = index_by_user(primary);
        let fallback = index_by_user(fallback);

        roster
            .iter()
            .map(|entry| self.merge_one(entry, &primary, &fallback))
            .collect()
    }

    fn merge_one(
        &self,
        entry: &RosterEntry,
        primary: &HashMap<u64, &SubmissionRecord>,
        fallback: &HashMap<u64, &SubmissionRecord>,
    ) -> StudentRow {
        let mut row = StudentRow {
            name: entry.name.clone(),
            id: entry.id,
            status: STATUS_NOT_SUBMITTED.to_string(),
            ..Default::default()
        };

        let mut found = false;
        if let Some(record) = primary.get(&entry.id) {
            apply(&mut row, self.derive(record));
            found = true;
        }

        if !found || row.raw_handle.is_empty() {
            if let Some(record) = fallback.get(&entry.id) {
                debug!("{} ({}) 使用备用作业的提交", entry.name, entry.id);
                apply(&mut row, self.derive(record));
                found = true;
            }
        }

        if !found {
            row.add_note(NOTE_NO_SUBMISSION);
        } else if row.raw_handle.is_empty() {
            row.add_note(NOTE_NO_HANDLE);
        }

        row
    }

    fn derive(&self, record: &SubmissionRecord) -> Derived {
        let status = record
            .workflow_state
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(STATUS_SUBMITTED)
            .to_string();

        let submitted_at = record
            .submitted_at
            .as_deref()
            .map(normalize_timestamp)
            .unwrap_or_default();

        let mut submission_url = record.url.as_deref().unwrap_or("").trim().to_string();
        let mut handle = if submission_url.is_empty() {
            String::new()
        } else {
            self.extractor.extract(&submission_url)
        };

        if handle.is_empty() {
            if let Some(pages) = record
                .body
                .as_deref()
                .and_then(|body| self.extractor.find_pages_url(body))
            {
                handle = self.extractor.extract(pages);
                if submission_url.is_empty() {
                    submission_url = pages.to_string();
                }
            }
        }

        Derived {
            status,
            submitted_at,
            submission_url,
            handle,
        }
    }
}

fn apply(row: &mut StudentRow, derived: Derived) {
    row.status = derived.status;
    row.submitted_at = derived.submitted_at;
    row.submission_url = derived.submission_url;
    row.raw_handle = derived.handle;
}

fn index_by_user(records: &[SubmissionRecord]) -> HashMap<u64, &SubmissionRecord> {
    records.iter().map(|r| (r.user_id, r)).collect()
}

/// 统一为 UTC 的 RFC 3339；无法解析时原样保留
fn normalize_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|_| raw.to_string())
}
