// ==========================================
// 订单库存分配系统 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: JSON 配置文件（可选）
// ==========================================

pub mod allocation_config;

// 重导出核心配置类型
pub use allocation_config::{AllocationConfig, CONFIG_PATH_ENV};
