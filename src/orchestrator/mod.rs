//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量处理器
//! - 读取凭据、创建客户端
//! - 读取花名册与提交记录并合并
//! - 顺序处理所有学生，学生之间固定等待
//! - 输出全局统计信息
//!
//! ### `student_processor` - 单个学生处理器
//! - 执行一个学生的检查流程
//! - 捕获错误并写入该行备注
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<StudentRow>)
//!     ↓
//! student_processor (处理单个 StudentRow)
//!     ↓
//! workflow::RepoCheckFlow (账号 → 聚合查询 → 评分)
//!     ↓
//! services (能力层：extract / resolve / query / evaluate)
//!     ↓
//! clients (外部平台：LMS / GitHub)
//! ```

pub mod batch_processor;
pub mod student_processor;

// 重新导出主要类型
pub use batch_processor::{run_batch, run_pipeline, App, BatchStats};
pub use student_processor::{process_student, StudentStatus};
