use regex::Regex;
use repo_rubric_check::clients::{GitHubApi, LmsApi};
use repo_rubric_check::error::{ConfigError, RemoteError};
use repo_rubric_check::models::row::{NOTE_NO_SUBMISSION, STATUS_NOT_SUBMITTED};
use repo_rubric_check::models::{Cell, RosterEntry, SubmissionRecord};
use repo_rubric_check::services::SheetTable;
use repo_rubric_check::{run_pipeline, App, Config, MapSecretStore};
use serde_json::{json, Map, Value};
use std::cell::Cell as Counter;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

// ========== 内存实现 ==========

#[derive(Default)]
struct FakeLms {
    roster: Vec<RosterEntry>,
    submissions: HashMap<String, Vec<SubmissionRecord>>,
    fail_roster: bool,
    fail_assignment: Option<&'static str>,
}

impl LmsApi for FakeLms {
    async fn fetch_roster(&self, _course_id: &str) -> Result<Vec<RosterEntry>, RemoteError> {
        if self.fail_roster {
            return Err(RemoteError::BadStatus {
                endpoint: "/users".to_string(),
                status: 401,
                body: "unauthorized".to_string(),
            });
        }
        Ok(self.roster.clone())
    }

    async fn fetch_submissions(
        &self,
        _course_id: &str,
        assignment_id: &str,
    ) -> Result<Vec<SubmissionRecord>, RemoteError> {
        if self.fail_assignment == Some(assignment_id) {
            return Err(RemoteError::BadStatus {
                endpoint: format!("/assignments/{}/submissions", assignment_id),
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(self.submissions.get(assignment_id).cloned().unwrap_or_default())
    }
}

/// 账号与仓库名都按小写匹配，和真实平台一致
#[derive(Default)]
struct FakeGitHub {
    accounts: Vec<&'static str>,
    /// (小写用户名, 小写仓库名) → (规范仓库名, 文件内容)
    repos: HashMap<(String, String), (String, HashMap<String, String>)>,
    broken_owners: Vec<&'static str>,
    queries: Counter<usize>,
}

impl FakeGitHub {
    fn add_repo(&mut self, owner: &str, name: &str, files: &[(&str, &str)]) {
        self.repos.insert(
            (owner.to_lowercase(), name.to_lowercase()),
            (
                name.to_string(),
                files
                    .iter()
                    .map(|(p, t)| (p.to_string(), t.to_string()))
                    .collect(),
            ),
        );
    }
}

impl GitHubApi for FakeGitHub {
    async fn lookup_user(&self, handle: &str) -> Result<Option<String>, RemoteError> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.eq_ignore_ascii_case(handle))
            .map(|a| a.to_string()))
    }

    /// 解析查询文本中的别名，按真实接口的形状拼出响应
    async fn run_query(&self, query: &str, variables: Value) -> Result<Value, RemoteError> {
        self.queries.set(self.queries.get() + 1);

        let owner = variables["owner"].as_str().unwrap_or_default().to_string();
        if self.broken_owners.iter().any(|o| *o == owner) {
            return Err(RemoteError::BadStatus {
                endpoint: "/graphql".to_string(),
                status: 502,
                body: "bad gateway".to_string(),
            });
        }

        let repo_re = Regex::new(r#"(repo\d+): repository\(owner: \$owner, name: "([^"]+)"\)"#).unwrap();
        let file_re = Regex::new(r#"(file\d+): object\(expression: "HEAD:([^"]+)"\)"#).unwrap();

        let mut files: Vec<(String, String)> = Vec::new();
        for cap in file_re.captures_iter(query) {
            let slot = (cap[1].to_string(), cap[2].to_string());
            if !files.contains(&slot) {
                files.push(slot);
            }
        }

        let mut data = Map::new();
        for cap in repo_re.captures_iter(query) {
            let alias = cap[1].to_string();
            let name = cap[2].to_string();
            let key = (owner.to_lowercase(), name.to_lowercase());
            let value = match self.repos.get(&key) {
                None => Value::Null,
                Some((canonical, contents)) => {
                    let mut repo = Map::new();
                    repo.insert(
                        "url".to_string(),
                        json!(format!("https://github.com/{}/{}", owner, canonical)),
                    );
                    for (file_alias, path) in &files {
                        let file = contents
                            .get(path)
                            .map(|t| json!({ "text": t }))
                            .unwrap_or(Value::Null);
                        repo.insert(file_alias.clone(), file);
                    }
                    Value::Object(repo)
                }
            };
            data.insert(alias, value);
        }

        Ok(json!({ "data": data }))
    }
}

// ========== 辅助函数 ==========

fn test_config() -> Config {
    Config {
        course_id: "101".to_string(),
        primary_assignment_id: "1".to_string(),
        fallback_assignment_id: "2".to_string(),
        request_delay_ms: 0,
        ..Default::default()
    }
}

fn student(id: u64, name: &str) -> RosterEntry {
    RosterEntry {
        id,
        name: name.to_string(),
    }
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

const INDEX_HTML: &str = r#"<html><head><meta name="viewport" content="width=device-width"><link rel="stylesheet" href="styles/styles.css"></head><body><nav></nav><footer></footer></body></html>"#;
const STYLES_CSS: &str = "nav { display: flex; justify-content: SPACE-EVENLY; }";

// ========== 测试 ==========

#[tokio::test]
async fn test_three_students_end_to_end() {
    let lms = FakeLms {
        roster: vec![student(1, "Alice"), student(2, "Bob"), student(3, "Carol")],
        submissions: HashMap::from([
            (
                "1".to_string(),
                vec![
                    SubmissionRecord {
                        user_id: 1,
                        workflow_state: Some("submitted".to_string()),
                        submitted_at: Some("2026-01-10T10:00:00Z".to_string()),
                        url: Some("https://alice.github.io/wdd130/".to_string()),
                        body: None,
                    },
                    SubmissionRecord {
                        user_id: 2,
                        workflow_state: Some("submitted".to_string()),
                        ..Default::default()
                    },
                ],
            ),
            (
                "2".to_string(),
                vec![SubmissionRecord {
                    user_id: 2,
                    workflow_state: Some("graded".to_string()),
                    body: Some(r#"<a href="https://BobB.github.io/wdd130/">site</a>"#.to_string()),
                    ..Default::default()
                }],
            ),
        ]),
        ..Default::default()
    };

    let mut github = FakeGitHub {
        accounts: vec!["Alice", "BobB"],
        ..Default::default()
    };
    github.add_repo(
        "Alice",
        "wdd130",
        &[("index.html", INDEX_HTML), ("styles/styles.css", STYLES_CSS)],
    );
    github.add_repo("BobB", "wdd130", &[("index.html", "<html></html>")]);

    let config = test_config();
    let mut sheet = SheetTable::new();
    let stats = run_pipeline(&config, &lms, &github, &mut sheet).await.unwrap();

    assert_eq!(sheet.header.len(), 21);
    assert_eq!(sheet.rows.len(), 3);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.checked, 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(github.queries.get(), 2);

    // Alice: 主作业直接给出 URL，所有规则通过
    assert_eq!(sheet.cell(0, "GitHub Username"), Some(&text("Alice")));
    assert_eq!(sheet.cell(0, "Repo Found"), Some(&Cell::Flag(true)));
    assert_eq!(
        sheet.cell(0, "Repo URL"),
        Some(&text("https://github.com/Alice/wdd130"))
    );
    assert_eq!(sheet.cell(0, "Uses space-evenly"), Some(&Cell::Flag(true)));
    assert_eq!(sheet.cell(0, "Has Viewport Meta"), Some(&Cell::Flag(true)));
    assert_eq!(sheet.cell(0, "Submitted At"), Some(&text("2026-01-10T10:00:00Z")));
    assert_eq!(sheet.cell(0, "Alt Repo Found"), Some(&Cell::Flag(false)));

    // Bob: 用户名来自备用作业的正文
    assert_eq!(sheet.cell(1, "GitHub Username"), Some(&text("BobB")));
    assert_eq!(sheet.cell(1, "Submission Status"), Some(&text("graded")));
    assert_eq!(sheet.cell(1, "Has index.html"), Some(&Cell::Flag(true)));
    assert_eq!(sheet.cell(1, "Has Nav"), Some(&Cell::Flag(false)));

    // Carol: 两份作业都没有提交
    assert_eq!(sheet.cell(2, "Submission Status"), Some(&text(STATUS_NOT_SUBMITTED)));
    assert_eq!(sheet.cell(2, "Notes"), Some(&text(NOTE_NO_SUBMISSION)));
    assert_eq!(sheet.cell(2, "Repo Found"), Some(&Cell::Flag(false)));
}

/// 候选 0 与 2 存在、1 不存在时，备选结果对应候选 2
#[tokio::test]
async fn test_primary_and_alternative_positions() {
    let lms = FakeLms {
        roster: vec![student(1, "Dana")],
        submissions: HashMap::from([(
            "1".to_string(),
            vec![SubmissionRecord {
                user_id: 1,
                url: Some("https://github.com/dana".to_string()),
                ..Default::default()
            }],
        )]),
        ..Default::default()
    };

    let mut github = FakeGitHub {
        accounts: vec!["Dana"],
        ..Default::default()
    };
    github.add_repo("Dana", "wdd130", &[]);
    github.add_repo("Dana", "wdd130-site", &[("index.html", "<nav>")]);

    let config = test_config();
    let mut sheet = SheetTable::new();
    run_pipeline(&config, &lms, &github, &mut sheet).await.unwrap();

    assert_eq!(
        sheet.cell(0, "Repo URL"),
        Some(&text("https://github.com/Dana/wdd130"))
    );
    assert_eq!(sheet.cell(0, "Alt Repo Found"), Some(&Cell::Flag(true)));
    assert_eq!(
        sheet.cell(0, "Alt Repo URL"),
        Some(&text("https://github.com/Dana/wdd130-site"))
    );
    // 规则列只反映主仓库
    assert_eq!(sheet.cell(0, "Has index.html"), Some(&Cell::Flag(false)));
}

/// 只差大小写的候选名指向同一个仓库，不算备选
#[tokio::test]
async fn test_case_variant_names_share_one_repository() {
    let lms = FakeLms {
        roster: vec![student(1, "Eve")],
        submissions: HashMap::from([(
            "1".to_string(),
            vec![SubmissionRecord {
                user_id: 1,
                url: Some("https://eve.github.io/wdd130/".to_string()),
                ..Default::default()
            }],
        )]),
        ..Default::default()
    };

    let mut github = FakeGitHub {
        accounts: vec!["eve"],
        ..Default::default()
    };
    github.add_repo("eve", "wdd130", &[("index.html", INDEX_HTML)]);

    let mut config = test_config();
    config.rubric.repo_names = vec!["wdd130".to_string(), "WDD130".to_string()];
    let mut sheet = SheetTable::new();
    run_pipeline(&config, &lms, &github, &mut sheet).await.unwrap();

    assert_eq!(sheet.cell(0, "Repo Found"), Some(&Cell::Flag(true)));
    assert_eq!(
        sheet.cell(0, "Repo URL"),
        Some(&text("https://github.com/eve/wdd130"))
    );
    assert_eq!(sheet.cell(0, "Alt Repo Found"), Some(&Cell::Flag(false)));
    assert_eq!(sheet.cell(0, "Alt Repo URL"), Some(&text("")));
}

/// 一个学生的查询失败不影响其他学生
#[tokio::test]
async fn test_row_failure_is_isolated() {
    let submission = |id: u64, url: &str| SubmissionRecord {
        user_id: id,
        url: Some(url.to_string()),
        ..Default::default()
    };

    let lms = FakeLms {
        roster: vec![student(1, "Ann"), student(2, "Ben"), student(3, "Cat")],
        submissions: HashMap::from([(
            "1".to_string(),
            vec![
                submission(1, "https://ann.github.io"),
                submission(2, "https://ben.github.io"),
                submission(3, "https://cat.github.io"),
            ],
        )]),
        ..Default::default()
    };

    let mut github = FakeGitHub {
        accounts: vec!["ann", "ben", "cat"],
        broken_owners: vec!["ben"],
        ..Default::default()
    };
    github.add_repo("ann", "wdd130", &[]);
    github.add_repo("cat", "wdd130", &[]);

    let config = test_config();
    let mut sheet = SheetTable::new();
    let stats = run_pipeline(&config, &lms, &github, &mut sheet).await.unwrap();

    assert_eq!(stats.checked, 2);
    assert_eq!(stats.failed, 1);

    assert_eq!(sheet.cell(0, "Repo Found"), Some(&Cell::Flag(true)));
    assert_eq!(sheet.cell(2, "Repo Found"), Some(&Cell::Flag(true)));

    assert_eq!(sheet.cell(1, "Repo Found"), Some(&Cell::Flag(false)));
    match sheet.cell(1, "Notes") {
        Some(Cell::Text(note)) => assert!(note.starts_with("Error: ")),
        other => panic!("unexpected notes cell: {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_user_and_missing_repo_notes() {
    let lms = FakeLms {
        roster: vec![student(1, "Ghost"), student(2, "Empty")],
        submissions: HashMap::from([(
            "1".to_string(),
            vec![
                SubmissionRecord {
                    user_id: 1,
                    url: Some("https://ghost.github.io".to_string()),
                    ..Default::default()
                },
                SubmissionRecord {
                    user_id: 2,
                    url: Some("https://empty.github.io".to_string()),
                    ..Default::default()
                },
            ],
        )]),
        ..Default::default()
    };

    let github = FakeGitHub {
        accounts: vec!["Empty"],
        ..Default::default()
    };

    let config = test_config();
    let mut sheet = SheetTable::new();
    run_pipeline(&config, &lms, &github, &mut sheet).await.unwrap();

    // 账号不存在时不发聚合查询
    assert_eq!(github.queries.get(), 1);
    assert_eq!(sheet.cell(0, "Notes"), Some(&text("GitHub user not found")));
    assert_eq!(sheet.cell(0, "GitHub Username"), Some(&text("ghost")));
    assert_eq!(sheet.cell(1, "Notes"), Some(&text("Repository not found")));
    assert_eq!(sheet.cell(1, "GitHub Username"), Some(&text("Empty")));
}

#[tokio::test]
async fn test_roster_failure_aborts_run() {
    let lms = FakeLms {
        fail_roster: true,
        ..Default::default()
    };
    let github = FakeGitHub::default();

    let config = test_config();
    let mut sheet = SheetTable::new();
    let result = run_pipeline(&config, &lms, &github, &mut sheet).await;

    assert!(result.is_err());
    assert!(sheet.rows.is_empty());
}

#[tokio::test]
async fn test_fallback_submissions_failure_aborts_run() {
    let lms = FakeLms {
        roster: vec![student(1, "Ann")],
        fail_assignment: Some("2"),
        ..Default::default()
    };
    let github = FakeGitHub::default();

    let config = test_config();
    let mut sheet = SheetTable::new();
    let result = run_pipeline(&config, &lms, &github, &mut sheet).await;

    assert!(result.is_err());
    assert!(sheet.rows.is_empty());
    assert_eq!(github.queries.get(), 0);
}

fn paced_lms(names: &[(u64, &str, Option<&str>)]) -> FakeLms {
    FakeLms {
        roster: names.iter().map(|(id, name, _)| student(*id, name)).collect(),
        submissions: HashMap::from([(
            "1".to_string(),
            names
                .iter()
                .filter_map(|(id, _, url)| {
                    url.map(|u| SubmissionRecord {
                        user_id: *id,
                        url: Some(u.to_string()),
                        ..Default::default()
                    })
                })
                .collect(),
        )]),
        ..Default::default()
    }
}

/// 两次检查之间等待一次；没有用户名的行不等待
#[tokio::test(start_paused = true)]
async fn test_delay_between_checked_rows_only() {
    let lms = paced_lms(&[
        (1, "Ann", Some("https://ann.github.io")),
        (2, "NoSub", None),
        (3, "Ben", Some("https://ben.github.io")),
        (4, "NoSub2", None),
    ]);
    let github = FakeGitHub {
        accounts: vec!["ann", "ben"],
        ..Default::default()
    };

    let mut config = test_config();
    config.request_delay_ms = 1000;
    let mut sheet = SheetTable::new();

    let start = Instant::now();
    let stats = run_pipeline(&config, &lms, &github, &mut sheet).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(stats.checked, 2);
    assert_eq!(stats.skipped, 2);
    assert!(elapsed >= Duration::from_millis(1000), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(2000), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_single_checked_row_does_not_wait() {
    let lms = paced_lms(&[
        (1, "Ann", Some("https://ann.github.io")),
        (2, "NoSub", None),
        (3, "NoSub2", None),
    ]);
    let github = FakeGitHub {
        accounts: vec!["ann"],
        ..Default::default()
    };

    let mut config = test_config();
    config.request_delay_ms = 1000;
    let mut sheet = SheetTable::new();

    let start = Instant::now();
    let stats = run_pipeline(&config, &lms, &github, &mut sheet).await.unwrap();

    assert_eq!(stats.checked, 1);
    assert_eq!(stats.skipped, 2);
    assert!(start.elapsed() < Duration::from_millis(1000));
}

#[test]
fn test_missing_credential_is_fatal() {
    let store = MapSecretStore::new().with("CANVAS_API_TOKEN", "canvas-token");

    let err = tokio_test::block_on(async {
        let app = App::initialize(test_config(), store).await.unwrap();
        app.run().await.unwrap_err()
    });

    let config_err = err.downcast_ref::<ConfigError>().expect("应为配置错误");
    assert!(matches!(
        config_err,
        ConfigError::MissingCredential { name } if name == "GITHUB_TOKEN"
    ));
}
