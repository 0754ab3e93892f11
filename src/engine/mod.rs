// ==========================================
// 订单库存分配系统 - 引擎层
// ==========================================
// 职责: 实现分配业务规则,只操作内存台账
// 红线: 引擎无状态,所有分配必须输出 assign_reason
// ==========================================

pub mod allocator;
pub mod priority;

// 重导出核心引擎
pub use allocator::{AllocationSummary, StockAllocator};
pub use priority::PriorityScorer;
