// ==========================================
// 订单库存分配系统 - 人工分配校验器
// ==========================================
// 职责: 校验并应用单笔人工分配调整
// 红线: 校验先于变更;任一校验失败时台账逐字节不变
// 红线: 订单、库存、客户信用三处变更要么全部生效,要么全不生效
// ==========================================

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::ledger::AllocationLedger;
use crate::domain::types::AssignReason;

// ==========================================
// ManualAllocationOutcome - 人工分配结果
// ==========================================

/// 一次成功的人工分配调整的明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualAllocationOutcome {
    pub order_id: String,
    pub previous_qty: u32, // 调整前已分配数量
    pub new_qty: u32,      // 调整后已分配数量（已按 [0, requested_qty] 截断）
    pub stock_delta: i64,  // 库存变化量（负数表示释放回库存池）
    pub cost_delta: f64,   // 信用变化金额（负数表示信用回流）
}

// ==========================================
// ManualAllocationValidator - 人工分配校验器
// ==========================================

/// 人工分配校验器
///
/// 校验顺序:
/// 1. 订单存在性（不存在时不再读取其他状态）
/// 2. 目标数量截断到 [0, requested_qty]（不是错误）
/// 3. 库存增量校验（只拦增加,释放直接放行）
/// 4. 信用增量校验（只拦增加,信用回流直接放行）
pub struct ManualAllocationValidator {
    // 无状态引擎,不需要注入依赖
}

impl ManualAllocationValidator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 校验并应用一笔人工分配调整
    ///
    /// # 参数
    /// - `ledger`: 分配台账
    /// - `order_id`: 目标订单
    /// - `quantity`: 目标分配数量（允许为负或超过请求量,会被截断）
    ///
    /// # 返回
    /// - Ok(ManualAllocationOutcome): 调整明细
    /// - Err(ApiError): 校验失败,台账未被改动
    pub fn validate_and_apply(
        &self,
        ledger: &mut AllocationLedger,
        order_id: &str,
        quantity: i64,
    ) -> ApiResult<ManualAllocationOutcome> {
        // 1. 订单存在性
        let (previous_qty, requested_qty, price_per_unit, customer_id) =
            match ledger.find_order(order_id) {
                Some(order) => (
                    order.allocated_qty,
                    order.requested_qty,
                    order.price_per_unit,
                    order.customer_id.clone(),
                ),
                None => {
                    return Err(ApiError::OrderNotFound {
                        order_id: order_id.to_string(),
                    })
                }
            };

        // 2. 截断目标数量（负数与超请求都不是错误）
        let new_qty = quantity.clamp(0, requested_qty as i64) as u32;

        // 3. 库存增量校验（释放时 delta < 0,直接放行）
        let stock_delta = new_qty as i64 - previous_qty as i64;
        if stock_delta > ledger.remaining_stock as i64 {
            return Err(ApiError::InsufficientStock {
                available_stock: ledger.remaining_stock,
                required_stock: stock_delta as u32,
            });
        }

        // 4. 信用增量校验（信用回流时 cost_delta < 0,直接放行）
        let cost_delta = stock_delta as f64 * price_per_unit;
        let (customer_name, available_credit) = match ledger.customer(&customer_id) {
            Some(c) => (c.name.clone(), c.credit_remaining),
            None => {
                // 订单引用未注册客户属于构造期契约违反
                return Err(ApiError::InternalError(format!(
                    "订单引用未注册客户: order_id={}, customer_id={}",
                    order_id, customer_id
                )));
            }
        };
        if cost_delta > 0.0 && cost_delta > available_credit {
            return Err(ApiError::CreditLimitExceeded {
                customer_name,
                available_credit,
                required_credit: cost_delta,
            });
        }

        // 5. 校验全部通过,三处变更一并生效
        if let Some(order) = ledger.find_order_mut(order_id) {
            order.allocated_qty = new_qty;
            order.assign_reason = Some(AssignReason::Manual);
        }
        ledger.remaining_stock = (ledger.remaining_stock as i64 - stock_delta) as u32;
        if let Some(customer) = ledger.customer_mut(&customer_id) {
            customer.consume_credit(cost_delta);
        }

        tracing::debug!(
            order_id,
            previous_qty,
            new_qty,
            stock_delta,
            cost_delta,
            "人工分配已应用"
        );

        Ok(ManualAllocationOutcome {
            order_id: order_id.to_string(),
            previous_qty,
            new_qty,
            stock_delta,
            cost_delta,
        })
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for ManualAllocationValidator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::Customer;
    use crate::domain::order::{Order, Product};
    use crate::domain::types::{OrderPriority, OrderStatus};
    use chrono::Utc;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn test_ledger(total_stock: u32, credit_limit: f64, price: f64, requested: u32) -> AllocationLedger {
        let mut ledger = AllocationLedger::new(total_stock);
        ledger.customers.insert(
            "CUST-01".to_string(),
            Customer::new("CUST-01", "Balerion01", credit_limit),
        );
        ledger.orders.push(Order {
            order_id: "ORDER-001".to_string(),
            status: OrderStatus::New,
            priority: OrderPriority::Normal,
            customer_id: "CUST-01".to_string(),
            product: Product {
                product_id: "SALMON-001".to_string(),
                name: "Salmon".to_string(),
                remark: "1 day delivery Product".to_string(),
            },
            price_per_unit: price,
            requested_qty: requested,
            allocated_qty: 0,
            assign_reason: None,
            created_at: Utc::now(),
        });
        ledger
    }

    #[test]
    fn test_allocate_success() {
        let validator = ManualAllocationValidator::new();
        let mut ledger = test_ledger(10, 1000.0, 100.0, 5);

        let outcome = validator
            .validate_and_apply(&mut ledger, "ORDER-001", 3)
            .unwrap();

        assert_eq!(outcome.previous_qty, 0);
        assert_eq!(outcome.new_qty, 3);
        assert_eq!(outcome.stock_delta, 3);
        assert_eq!(outcome.cost_delta, 300.0);
        assert_eq!(ledger.remaining_stock, 7);
        assert_eq!(ledger.customer("CUST-01").unwrap().credit_remaining, 700.0);
        assert_eq!(
            ledger.find_order("ORDER-001").unwrap().assign_reason,
            Some(AssignReason::Manual)
        );
        assert!(ledger.verify_invariants().is_ok());
    }

    #[test]
    fn test_quantity_clamped_not_rejected() {
        // 超过请求量截断到 requested_qty,不报错
        let validator = ManualAllocationValidator::new();
        let mut ledger = test_ledger(10, 1000.0, 100.0, 5);

        let outcome = validator
            .validate_and_apply(&mut ledger, "ORDER-001", 20)
            .unwrap();
        assert_eq!(outcome.new_qty, 5);

        // 负数截断到 0（等价于全量释放）
        let outcome = validator
            .validate_and_apply(&mut ledger, "ORDER-001", -7)
            .unwrap();
        assert_eq!(outcome.new_qty, 0);
        assert_eq!(outcome.stock_delta, -5);
        assert_eq!(ledger.remaining_stock, 10);
        assert!(ledger.verify_invariants().is_ok());
    }

    #[test]
    fn test_release_returns_stock_and_credit() {
        // 减少分配是合法路径: 库存与信用一并回流
        let validator = ManualAllocationValidator::new();
        let mut ledger = test_ledger(10, 1000.0, 100.0, 5);

        validator
            .validate_and_apply(&mut ledger, "ORDER-001", 5)
            .unwrap();
        assert_eq!(ledger.remaining_stock, 5);
        assert_eq!(ledger.customer("CUST-01").unwrap().credit_remaining, 500.0);

        let outcome = validator
            .validate_and_apply(&mut ledger, "ORDER-001", 2)
            .unwrap();
        assert_eq!(outcome.stock_delta, -3);
        assert_eq!(outcome.cost_delta, -300.0);
        assert_eq!(ledger.remaining_stock, 8);
        assert_eq!(ledger.customer("CUST-01").unwrap().credit_remaining, 800.0);
        assert!(ledger.verify_invariants().is_ok());
    }

    #[test]
    fn test_order_not_found() {
        let validator = ManualAllocationValidator::new();
        let mut ledger = test_ledger(10, 1000.0, 100.0, 5);
        let snapshot = ledger.clone();

        let err = validator
            .validate_and_apply(&mut ledger, "ORDER-999", 3)
            .unwrap_err();
        assert!(matches!(err, ApiError::OrderNotFound { .. }));
        assert_eq!(ledger, snapshot); // 台账逐字节不变
    }

    #[test]
    fn test_insufficient_stock_rejected_without_mutation() {
        let validator = ManualAllocationValidator::new();
        let mut ledger = test_ledger(2, 10_000.0, 100.0, 5);
        let snapshot = ledger.clone();

        let err = validator
            .validate_and_apply(&mut ledger, "ORDER-001", 5)
            .unwrap_err();
        match err {
            ApiError::InsufficientStock {
                available_stock,
                required_stock,
            } => {
                assert_eq!(available_stock, 2);
                assert_eq!(required_stock, 5);
            }
            other => panic!("预期 InsufficientStock, 实际 {:?}", other),
        }
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_credit_limit_exceeded_rejected_without_mutation() {
        let validator = ManualAllocationValidator::new();
        let mut ledger = test_ledger(10, 250.0, 100.0, 5);
        let snapshot = ledger.clone();

        let err = validator
            .validate_and_apply(&mut ledger, "ORDER-001", 3)
            .unwrap_err();
        match err {
            ApiError::CreditLimitExceeded {
                customer_name,
                available_credit,
                required_credit,
            } => {
                assert_eq!(customer_name, "Balerion01");
                assert_eq!(available_credit, 250.0);
                assert_eq!(required_credit, 300.0);
            }
            other => panic!("预期 CreditLimitExceeded, 实际 {:?}", other),
        }
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_cost_delta_exactly_equal_to_credit_succeeds() {
        // cost_delta == credit_remaining 时放行,额度归零
        let validator = ManualAllocationValidator::new();
        let mut ledger = test_ledger(10, 300.0, 100.0, 5);

        let outcome = validator
            .validate_and_apply(&mut ledger, "ORDER-001", 3)
            .unwrap();
        assert_eq!(outcome.new_qty, 3);
        assert_eq!(ledger.customer("CUST-01").unwrap().credit_remaining, 0.0);
        assert!(ledger.verify_invariants().is_ok());
    }

    #[test]
    fn test_no_effect_on_other_orders() {
        // 人工分配不重排、不触碰其他订单
        let validator = ManualAllocationValidator::new();
        let mut ledger = test_ledger(10, 10_000.0, 100.0, 5);
        ledger.orders.push(Order {
            order_id: "ORDER-002".to_string(),
            status: OrderStatus::Emergency,
            priority: OrderPriority::High,
            customer_id: "CUST-01".to_string(),
            product: Product {
                product_id: "SALMON-001".to_string(),
                name: "Salmon".to_string(),
                remark: "1 day delivery Product".to_string(),
            },
            price_per_unit: 100.0,
            requested_qty: 5,
            allocated_qty: 0,
            assign_reason: None,
            created_at: Utc::now(),
        });

        validator
            .validate_and_apply(&mut ledger, "ORDER-001", 4)
            .unwrap();

        let other = ledger.find_order("ORDER-002").unwrap();
        assert_eq!(other.allocated_qty, 0);
        assert_eq!(other.assign_reason, None);
    }
}
