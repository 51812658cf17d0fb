//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文档处理器
//! - 登录一次，得到整个批次共用的会话
//! - 逐个处理文档（Vec<DocumentRef>），文档之间固定间隔
//! - 汇总每个文档的结果
//!
//! ### `cancel` - 用户中断
//! - 协作式取消，只在文档之间生效
//!
//! ## 层次关系
//!
//! ```text
//! app (交互菜单)
//!     ↓
//! batch_processor (处理 Vec<DocumentRef>)
//!     ↓
//! workflow::CourseFlow (处理单个文档)
//!     ↓
//! services (能力层：登录 / 上传 / 创建 / 重命名 / 发布)
//!     ↓
//! clients (课程服务 HTTP 客户端)
//! ```

pub mod batch_processor;
pub mod cancel;

pub use batch_processor::{BatchAbort, BatchProcessor, BatchSummary, ItemReport};
pub use cancel::CancelSignal;
