//! 结果表写入服务
//!
//! 外部表格层提供一个固定列的表；本模块只负责按行写入，不关心显示格式。

use crate::error::FileError;
use crate::models::Cell;
use serde::Serialize;
use std::fs;
use tracing::debug;

/// 结果表
///
/// 每次运行先整体替换所有行，再逐行更新检查结果。
pub trait ResultSink {
    /// 用新的表头和行整体替换表内容
    fn replace_rows(&mut self, header: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<(), FileError>;

    /// 更新第 `index` 行（从 0 开始，不含表头）
    fn update_row(&mut self, index: usize, row: Vec<Cell>) -> Result<(), FileError>;
}

/// 内存中的表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SheetTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按列名读取单元格
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.header.iter().position(|h| h == column)?;
        self.rows.get(row)?.get(col)
    }
}

impl ResultSink for SheetTable {
    fn replace_rows(&mut self, header: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<(), FileError> {
        self.header = header;
        self.rows = rows;
        Ok(())
    }

    fn update_row(&mut self, index: usize, row: Vec<Cell>) -> Result<(), FileError> {
        if index >= self.rows.len() {
            self.rows.resize(index + 1, Vec::new());
        }
        self.rows[index] = row;
        Ok(())
    }
}

/// JSON 文件表
///
/// 每次变更都重写整个文件，中途中断时已完成的行仍然保留。
pub struct JsonSheetWriter {
    path: String,
    table: SheetTable,
}

impl JsonSheetWriter {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            table: SheetTable::new(),
        }
    }

    pub fn table(&self) -> &SheetTable {
        &self.table
    }

    fn flush(&self) -> Result<(), FileError> {
        let json = serde_json::to_string_pretty(&self.table).map_err(|e| {
            FileError::SerializeFailed {
                path: self.path.clone(),
                source: e,
            }
        })?;

        fs::write(&self.path, json).map_err(|e| FileError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })?;

        debug!("结果表已写入: {} ({} 行)", self.path, self.table.rows.len());
        Ok(())
    }
}

impl ResultSink for JsonSheetWriter {
    fn replace_rows(&mut self, header: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<(), FileError> {
        self.table.replace_rows(header, rows)?;
        self.flush()
    }

    fn update_row(&mut self, index: usize, row: Vec<Cell>) -> Result<(), FileError> {
        self.table.update_row(index, row)?;
        self.flush()
    }
}
