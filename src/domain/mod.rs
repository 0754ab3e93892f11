// ==========================================
// 订单库存分配系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型与台账聚合
// 红线: 不含引擎逻辑,不含外部数据接入逻辑
// ==========================================

pub mod customer;
pub mod ledger;
pub mod order;
pub mod types;

// 重导出核心类型
pub use customer::Customer;
pub use ledger::AllocationLedger;
pub use order::{Order, Product};
pub use types::{AssignReason, OrderPriority, OrderStatus};
