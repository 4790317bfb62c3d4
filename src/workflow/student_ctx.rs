//! 学生处理上下文
//!
//! 封装"我正在检查第几个学生"这一信息

use std::fmt::Display;

/// 学生处理上下文
#[derive(Debug, Clone)]
pub struct StudentCtx {
    /// 行号（从1开始，仅用于日志显示）
    pub row_index: usize,

    /// 总行数
    pub total: usize,

    /// 学生姓名
    pub name: String,

    /// 从提交中提取的用户名
    pub handle: String,
}

impl StudentCtx {
    pub fn new(row_index: usize, total: usize, name: String, handle: String) -> Self {
        Self {
            row_index,
            total,
            name,
            handle,
        }
    }
}

impl Display for StudentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[学生 {}/{} {} @{}]",
            self.row_index, self.total, self.name, self.handle
        )
    }
}
