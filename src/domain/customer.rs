// ==========================================
// 订单库存分配系统 - 客户领域模型
// ==========================================
// 红线: 客户实体在台账中只存一份,订单只按 id 引用
// 用途: 信用额度的唯一事实层,不可被订单副本反向污染
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Customer - 客户主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,     // 客户唯一标识
    pub name: String,            // 客户显示名称
    pub credit_limit: f64,       // 信用额度上限（创建时固定）
    pub credit_remaining: f64,   // 剩余信用额度（0 <= credit_remaining <= credit_limit）
}

impl Customer {
    pub fn new(customer_id: &str, name: &str, credit_limit: f64) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            name: name.to_string(),
            credit_limit,
            credit_remaining: credit_limit,
        }
    }

    /// 已占用信用额度
    pub fn credit_used(&self) -> f64 {
        self.credit_limit - self.credit_remaining
    }

    /// 按单价计算剩余额度可负担的最大件数
    ///
    /// # 参数
    /// - `price_per_unit`: 单价（> 0）
    ///
    /// # 返回
    /// floor(credit_remaining / price_per_unit)，单价非法时返回 0
    pub fn affordable_units(&self, price_per_unit: f64) -> u32 {
        if !price_per_unit.is_finite() || price_per_unit <= 0.0 {
            return 0;
        }
        let units = (self.credit_remaining / price_per_unit).floor();
        if units.is_finite() && units > 0.0 {
            units as u32
        } else {
            0
        }
    }

    /// 占用信用额度（分配时调用）
    pub fn consume_credit(&mut self, amount: f64) {
        self.credit_remaining -= amount;
    }

    /// 恢复全部信用额度（重算/重置时调用）
    pub fn restore_all_credit(&mut self) {
        self.credit_remaining = self.credit_limit;
    }
}
