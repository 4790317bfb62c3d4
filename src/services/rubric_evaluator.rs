//! 评分服务
//!
//! 把聚合查询的快照转换为主仓库 / 备选仓库的判定结果。

use crate::models::{Check, EvaluationOutcome, ProjectProbe, RubricConfig, RubricRule, Verdict};
use crate::services::batch_query::ProjectSnapshot;

/// 评分服务
pub struct RubricEvaluator<'a> {
    rubric: &'a RubricConfig,
}

impl<'a> RubricEvaluator<'a> {
    pub fn new(rubric: &'a RubricConfig) -> Self {
        Self { rubric }
    }

    /// 按候选顺序评估
    ///
    /// 第一个存在的仓库成为主仓库；之后每个存在的仓库都会覆盖备选槽位，
    /// 因此三个以上候选同时存在时只保留最后一个。与主仓库地址相同的候选不计入备选。
    pub fn evaluate(&self, snapshots: &[Option<ProjectSnapshot>]) -> EvaluationOutcome {
        let mut primary: Option<ProjectProbe> = None;
        let mut alternative: Option<ProjectProbe> = None;

        for snapshot in snapshots.iter().flatten() {
            match &primary {
                None => primary = Some(self.probe(snapshot)),
                // 仓库名不区分大小写，大小写不同的候选会指向同一个仓库
                Some(p) if p.url.eq_ignore_ascii_case(&snapshot.url) => {}
                Some(_) => alternative = Some(self.probe(snapshot)),
            }
        }

        match primary {
            Some(primary) => EvaluationOutcome {
                primary,
                alternative,
            },
            None => EvaluationOutcome::not_found(
                self.rubric.repo_names.first().cloned().unwrap_or_default(),
            ),
        }
    }

    fn probe(&self, snapshot: &ProjectSnapshot) -> ProjectProbe {
        ProjectProbe {
            name: snapshot.name.clone(),
            exists: true,
            url: snapshot.url.clone(),
            verdicts: self
                .rubric
                .checks()
                .map(|check| Verdict {
                    label: check.label.clone(),
                    passed: check_passes(check, snapshot),
                })
                .collect(),
        }
    }
}

/// 单条检查
///
/// 文件存在检查只看文件是否出现；内容检查要求文件存在且文本包含 needle（均转小写后比较）。
pub fn check_passes(check: &Check, snapshot: &ProjectSnapshot) -> bool {
    match &check.rule {
        RubricRule::FileExists { path } => snapshot.file(path).is_some(),
        RubricRule::CodeSearch { file, needle } => snapshot
            .file(file)
            .and_then(|f| f.text.as_deref())
            .map(|text| text.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
    }
}
