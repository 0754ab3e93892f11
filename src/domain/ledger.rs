// ==========================================
// 订单库存分配系统 - 分配台账聚合
// ==========================================
// 红线: 库存/信用字段只能由引擎操作变更（人工分配/自动分配/重置）
// 不变量: remaining_stock + Σ allocated_qty = total_stock
// 不变量: 每个客户 Σ(allocated_qty × price_per_unit) = credit_limit − credit_remaining
// ==========================================

use crate::domain::customer::Customer;
use crate::domain::order::Order;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// AllocationLedger - 分配台账
// ==========================================
// 内存聚合: 库存池 + 客户信用 + 订单集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLedger {
    pub total_stock: u32,     // 库存总量（固定容量）
    pub remaining_stock: u32, // 剩余库存（0 <= remaining_stock <= total_stock）

    /// 订单集合（保持到达顺序，订单不删除）
    pub orders: Vec<Order>,

    /// 客户实体（每个 customer_id 只存一份，信用额度的唯一事实层）
    pub customers: HashMap<String, Customer>,
}

impl AllocationLedger {
    /// 创建空台账
    ///
    /// # 参数
    /// - `total_stock`: 库存总量
    pub fn new(total_stock: u32) -> Self {
        Self {
            total_stock,
            remaining_stock: total_stock,
            orders: Vec::new(),
            customers: HashMap::new(),
        }
    }

    // ==========================================
    // 查询方法
    // ==========================================

    /// 已分配总量（派生值）
    pub fn total_allocated(&self) -> u32 {
        self.total_stock - self.remaining_stock
    }

    /// 剩余库存是否可承接指定增量
    pub fn can_take_stock(&self, units: u32) -> bool {
        units <= self.remaining_stock
    }

    pub fn find_order(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }

    pub fn find_order_mut(&mut self, order_id: &str) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| o.order_id == order_id)
    }

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.get(customer_id)
    }

    pub fn customer_mut(&mut self, customer_id: &str) -> Option<&mut Customer> {
        self.customers.get_mut(customer_id)
    }

    /// 指定客户的全部订单
    pub fn orders_of_customer<'a>(
        &'a self,
        customer_id: &'a str,
    ) -> impl Iterator<Item = &'a Order> {
        self.orders.iter().filter(move |o| o.customer_id == customer_id)
    }

    // ==========================================
    // 不变量校验（测试/调试辅助）
    // ==========================================

    /// 校验台账不变量
    ///
    /// # 返回
    /// - Ok(()): 全部不变量成立
    /// - Err(String): 第一个违反的不变量描述
    pub fn verify_invariants(&self) -> Result<(), String> {
        // 1. 库存不变量: remaining_stock + Σ allocated_qty = total_stock
        if self.remaining_stock > self.total_stock {
            return Err(format!(
                "剩余库存超过总量: remaining={}, total={}",
                self.remaining_stock, self.total_stock
            ));
        }
        let allocated_sum: u32 = self.orders.iter().map(|o| o.allocated_qty).sum();
        if self.remaining_stock + allocated_sum != self.total_stock {
            return Err(format!(
                "库存守恒被破坏: remaining={} + allocated={} != total={}",
                self.remaining_stock, allocated_sum, self.total_stock
            ));
        }

        // 2. 请求边界不变量: 0 <= allocated_qty <= requested_qty
        for order in &self.orders {
            if order.allocated_qty > order.requested_qty {
                return Err(format!(
                    "订单超量分配: order_id={}, allocated={}, requested={}",
                    order.order_id, order.allocated_qty, order.requested_qty
                ));
            }
        }

        // 3. 信用不变量: credit_limit − credit_remaining = 该客户订单分配金额合计
        for customer in self.customers.values() {
            if customer.credit_remaining < -1e-6
                || customer.credit_remaining > customer.credit_limit + 1e-6
            {
                return Err(format!(
                    "客户信用越界: customer_id={}, remaining={:.2}, limit={:.2}",
                    customer.customer_id, customer.credit_remaining, customer.credit_limit
                ));
            }
            let allocated_cost: f64 = self
                .orders_of_customer(&customer.customer_id)
                .map(|o| o.allocated_cost())
                .sum();
            if (customer.credit_used() - allocated_cost).abs() > 1e-6 {
                return Err(format!(
                    "客户信用守恒被破坏: customer_id={}, used={:.2}, allocated_cost={:.2}",
                    customer.customer_id,
                    customer.credit_used(),
                    allocated_cost
                ));
            }
        }

        // 4. 订单必须引用台账内存在的客户
        for order in &self.orders {
            if !self.customers.contains_key(&order.customer_id) {
                return Err(format!(
                    "订单引用未注册客户: order_id={}, customer_id={}",
                    order.order_id, order.customer_id
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Product;
    use crate::domain::types::{OrderPriority, OrderStatus};
    use chrono::Utc;

    fn test_order(order_id: &str, customer_id: &str, requested: u32, allocated: u32) -> Order {
        Order {
            order_id: order_id.to_string(),
            status: OrderStatus::New,
            priority: OrderPriority::Normal,
            customer_id: customer_id.to_string(),
            product: Product {
                product_id: "SALMON-001".to_string(),
                name: "Salmon".to_string(),
                remark: "1 day delivery Product".to_string(),
            },
            price_per_unit: 100.0,
            requested_qty: requested,
            allocated_qty: allocated,
            assign_reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_ledger_invariants() {
        let ledger = AllocationLedger::new(200);
        assert_eq!(ledger.total_allocated(), 0);
        assert!(ledger.can_take_stock(200));
        assert!(!ledger.can_take_stock(201));
        assert!(ledger.verify_invariants().is_ok());
    }

    #[test]
    fn test_invariant_detects_stock_leak() {
        let mut ledger = AllocationLedger::new(10);
        ledger
            .customers
            .insert("CUST-01".to_string(), Customer::new("CUST-01", "Balerion01", 1000.0));
        // 分配了 3 件但没有扣减库存
        ledger.orders.push(test_order("ORDER-001", "CUST-01", 5, 3));
        assert!(ledger.verify_invariants().is_err());
    }

    #[test]
    fn test_invariant_detects_credit_divergence() {
        let mut ledger = AllocationLedger::new(10);
        let mut customer = Customer::new("CUST-01", "Balerion01", 1000.0);
        customer.consume_credit(300.0);
        ledger.customers.insert("CUST-01".to_string(), customer);
        // 订单分配金额 300 与客户已用额度一致
        ledger.orders.push(test_order("ORDER-001", "CUST-01", 5, 3));
        ledger.remaining_stock = 7;
        assert!(ledger.verify_invariants().is_ok());

        // 信用占用被篡改后应当被检出
        ledger.customer_mut("CUST-01").unwrap().credit_remaining = 900.0;
        assert!(ledger.verify_invariants().is_err());
    }

    #[test]
    fn test_find_order_and_customer_lookup() {
        let mut ledger = AllocationLedger::new(10);
        ledger
            .customers
            .insert("CUST-01".to_string(), Customer::new("CUST-01", "Balerion01", 1000.0));
        ledger.orders.push(test_order("ORDER-001", "CUST-01", 5, 0));

        assert!(ledger.find_order("ORDER-001").is_some());
        assert!(ledger.find_order("ORDER-999").is_none());
        assert_eq!(ledger.orders_of_customer("CUST-01").count(), 1);
    }
}
