// ==========================================
// 订单库存分配系统 - 核心库
// ==========================================
// 系统定位: 决策支持系统 (人工最终控制权)
// 核心: 优先级评分 + 两轮分配算法 + 人工分配校验
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 接入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AssignReason, OrderPriority, OrderStatus};

// 领域实体
pub use domain::{AllocationLedger, Customer, Order, Product};

// 引擎
pub use engine::{AllocationSummary, PriorityScorer, StockAllocator};

// 接入
pub use importer::{IngestSummary, MockOrderSource, OrderImporter, OrderRecord, OrderSource};

// 配置
pub use config::AllocationConfig;

// API
pub use api::{AllocationApi, ApiError, ApiResult, ManualAllocationValidator, StockSummary};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "订单库存分配系统";

// ==========================================
// 预编译检查
// ==========================================
