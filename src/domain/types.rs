// ==========================================
// 订单库存分配系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与外部数据源一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 订单状态 (Order Status)
// ==========================================
// 用于优先级评分: EMERGENCY > OVER_DUE > NEW
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,       // 新订单
    OverDue,   // 逾期订单
    Emergency, // 紧急订单
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::New => write!(f, "NEW"),
            OrderStatus::OverDue => write!(f, "OVER_DUE"),
            OrderStatus::Emergency => write!(f, "EMERGENCY"),
        }
    }
}

// ==========================================
// 订单优先级标志 (Order Priority)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderPriority {
    Normal, // 普通
    High,   // 加急
}

impl fmt::Display for OrderPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderPriority::Normal => write!(f, "NORMAL"),
            OrderPriority::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 分配原因 (Assign Reason)
// ==========================================
// 每次分配必须输出原因 (可解释性)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignReason {
    FairnessFloor, // 第一轮: 公平保底分配
    GreedyFill,    // 第二轮: 按优先级贪心分配
    Manual,        // 人工分配
}

impl fmt::Display for AssignReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignReason::FairnessFloor => write!(f, "FAIRNESS_FLOOR"),
            AssignReason::GreedyFill => write!(f, "GREEDY_FILL"),
            AssignReason::Manual => write!(f, "MANUAL"),
        }
    }
}
