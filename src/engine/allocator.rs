// ==========================================
// 订单库存分配系统 - 自动分配引擎
// ==========================================
// 职责: 全量重算库存分配（先重置,后两轮分配）
// 红线: 两轮顺序不可调换（先保底后贪心）,轮内 remaining_stock=0 立即终止
// 红线: 信用额度读写只经过台账内唯一客户实体
// ==========================================
// 输入: 分配台账 + 评分基准时间
// 输出: 全部订单的新分配快照 + 分配摘要
// ==========================================

use crate::domain::ledger::AllocationLedger;
use crate::domain::types::AssignReason;
use crate::engine::priority::PriorityScorer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::instrument;

// ==========================================
// StockAllocator - 自动分配引擎
// ==========================================
pub struct StockAllocator {
    // 无状态引擎,不需要注入依赖
}

/// 单次自动分配结果摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub ranked_orders: Vec<String>, // 本轮的统一分配顺序（order_id,优先级从高到低）
    pub pass1_granted: u32,         // 第一轮（公平保底）分配件数
    pub pass2_granted: u32,         // 第二轮（贪心）分配件数
    pub total_allocated: u32,       // 分配总件数
    pub remaining_stock: u32,       // 分配后剩余库存
}

impl StockAllocator {
    /// 构造函数
    ///
    /// # 返回
    /// 新的 StockAllocator 实例
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 全量自动分配
    ///
    /// 算法:
    /// 1) 重置: 全部订单归零,全部客户信用恢复,库存回满
    /// 2) 排名: 按优先级分数降序,同分按 created_at 升序
    /// 3) 第一轮（公平保底）: 每个客户最多 1 件,保证可负担客户先拿到最小份额
    /// 4) 第二轮（贪心）: 按排名尽量满足剩余请求,直至库存耗尽
    ///
    /// 对良构台账是全函数,无失败路径;信用/库存不足的订单分到 0 件。
    ///
    /// # 参数
    /// - `ledger`: 分配台账（会被整体改写）
    /// - `now`: 评分基准时间
    ///
    /// # 返回
    /// 分配摘要
    #[instrument(skip(self, ledger), fields(
        order_count = ledger.orders.len(),
        customer_count = ledger.customers.len(),
        total_stock = ledger.total_stock
    ))]
    pub fn auto_allocate(
        &self,
        ledger: &mut AllocationLedger,
        now: DateTime<Utc>,
    ) -> AllocationSummary {
        // 1. 重置
        self.reset(ledger);

        // 2. 排名（两轮共用同一顺序）
        let scorer = PriorityScorer::new();
        let ranked = scorer.rank(&ledger.orders, now);

        // 3. 第一轮: 公平保底
        let pass1_granted = self.run_fairness_pass(ledger, &ranked);

        // 4. 第二轮: 贪心分配
        let pass2_granted = self.run_greedy_pass(ledger, &ranked);

        let summary = AllocationSummary {
            ranked_orders: ranked,
            pass1_granted,
            pass2_granted,
            total_allocated: ledger.total_allocated(),
            remaining_stock: ledger.remaining_stock,
        };

        tracing::info!(
            pass1_granted = summary.pass1_granted,
            pass2_granted = summary.pass2_granted,
            remaining_stock = summary.remaining_stock,
            "自动分配完成"
        );

        summary
    }

    /// 重置分配状态
    ///
    /// 全部订单 allocated_qty=0,全部客户信用恢复,库存回满。
    /// 重置后保持终态,直到下一次自动分配或人工分配。
    pub fn reset(&self, ledger: &mut AllocationLedger) {
        for order in &mut ledger.orders {
            order.allocated_qty = 0;
            order.assign_reason = None;
        }
        for customer in ledger.customers.values_mut() {
            customer.restore_all_credit();
        }
        ledger.remaining_stock = ledger.total_stock;
    }

    // ==========================================
    // 两轮分配
    // ==========================================

    /// 第一轮: 公平保底
    ///
    /// 按排名遍历一次;每个客户在本轮内只被触达一次,
    /// grant = min(1, remaining_stock, requested_qty, floor(credit/price))。
    /// 目的: 任何可负担、库存允许的客户,在高优先级客户吞掉全部库存之前
    /// 先拿到最小份额。
    fn run_fairness_pass(&self, ledger: &mut AllocationLedger, ranked: &[String]) -> u32 {
        // 本轮已触达客户集合,每次运行重新建立
        let mut touched: HashSet<String> = HashSet::new();
        let mut granted_total = 0u32;

        for order_id in ranked {
            if ledger.remaining_stock == 0 {
                break;
            }

            let (customer_id, price, requested) = match ledger.find_order(order_id) {
                Some(o) => (o.customer_id.clone(), o.price_per_unit, o.requested_qty),
                None => continue,
            };

            if touched.contains(&customer_id) {
                continue;
            }

            let affordable = ledger
                .customer(&customer_id)
                .map(|c| c.affordable_units(price))
                .unwrap_or(0);
            let grant = 1u32
                .min(ledger.remaining_stock)
                .min(requested)
                .min(affordable);

            if grant > 0 {
                self.apply_grant(ledger, order_id, grant, AssignReason::FairnessFloor);
                granted_total += grant;
                touched.insert(customer_id);
            }
        }

        granted_total
    }

    /// 第二轮: 贪心分配
    ///
    /// 按同一排名再遍历一次,不再有单客户上限:
    /// grant = min(剩余请求, remaining_stock, floor(credit/price))。
    fn run_greedy_pass(&self, ledger: &mut AllocationLedger, ranked: &[String]) -> u32 {
        let mut granted_total = 0u32;

        for order_id in ranked {
            if ledger.remaining_stock == 0 {
                break;
            }

            let (customer_id, price, remaining_request) = match ledger.find_order(order_id) {
                Some(o) => (o.customer_id.clone(), o.price_per_unit, o.remaining_request()),
                None => continue,
            };

            if remaining_request == 0 {
                continue;
            }

            let affordable = ledger
                .customer(&customer_id)
                .map(|c| c.affordable_units(price))
                .unwrap_or(0);
            let grant = remaining_request
                .min(ledger.remaining_stock)
                .min(affordable);

            if grant > 0 {
                self.apply_grant(ledger, order_id, grant, AssignReason::GreedyFill);
                granted_total += grant;
            }
        }

        granted_total
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 应用一次分配: 订单、库存、客户信用三处同步变更
    fn apply_grant(
        &self,
        ledger: &mut AllocationLedger,
        order_id: &str,
        grant: u32,
        reason: AssignReason,
    ) {
        let (customer_id, cost) = {
            let order = match ledger.find_order_mut(order_id) {
                Some(o) => o,
                None => return,
            };
            order.allocated_qty += grant;
            order.assign_reason = Some(reason);
            (order.customer_id.clone(), grant as f64 * order.price_per_unit)
        };

        if let Some(customer) = ledger.customer_mut(&customer_id) {
            customer.consume_credit(cost);
        }
        ledger.remaining_stock -= grant;
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for StockAllocator {
    fn default() -> Self {
        Self::new()
    }
}
