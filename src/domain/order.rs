// ==========================================
// 订单库存分配系统 - 订单领域模型
// ==========================================
// 红线: 订单请求字段创建后不可变,引擎只改 allocated_qty
// 红线: 订单通过 customer_id 引用客户,不持有可变客户副本
// ==========================================

use crate::domain::types::{AssignReason, OrderPriority, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 产品主数据
// ==========================================
// 单产品库存池,创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String, // 产品唯一标识
    pub name: String,       // 产品名称
    pub remark: String,     // 产品备注
}

// ==========================================
// Order - 订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    // ===== 主键 =====
    pub order_id: String, // 订单唯一标识

    // ===== 评分维度 =====
    pub status: OrderStatus,     // 订单状态（NEW/OVER_DUE/EMERGENCY）
    pub priority: OrderPriority, // 优先级标志（NORMAL/HIGH）

    // ===== 关联 =====
    pub customer_id: String, // 客户引用（台账内唯一实体）
    pub product: Product,    // 产品快照（不可变）

    // ===== 请求字段（创建后不可变）=====
    pub price_per_unit: f64, // 单价（> 0）
    pub requested_qty: u32,  // 请求数量

    // ===== 分配字段（仅引擎可变更）=====
    pub allocated_qty: u32,                 // 已分配数量（0 <= allocated_qty <= requested_qty）
    pub assign_reason: Option<AssignReason>, // 最近一次分配原因（可解释性）

    // ===== 时间信息 =====
    pub created_at: DateTime<Utc>, // 创建时间（评分年龄与同分排序依据）
}

impl Order {
    /// 未满足的请求数量
    pub fn remaining_request(&self) -> u32 {
        self.requested_qty.saturating_sub(self.allocated_qty)
    }

    /// 已分配金额
    pub fn allocated_cost(&self) -> f64 {
        self.allocated_qty as f64 * self.price_per_unit
    }
}
