// ==========================================
// 订单库存分配系统 - 订单接入门
// ==========================================
// 职责: 外部订单批次接入台账,维护分页状态
// 红线: 接入不做唯一性校验;同一 customer_id 的快照必须归并到
//       台账内唯一客户实体,不论到达顺序
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::customer::Customer;
use crate::domain::ledger::AllocationLedger;
use crate::domain::order::{Order, Product};
use crate::domain::types::{OrderPriority, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// OrderRecord - 接入订单记录
// ==========================================
// 外部数据源提供的不可变订单记录,内嵌客户/产品快照。
// 接入时快照被拆开: 客户归并进台账实体表,订单只保留 customer_id 引用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub status: OrderStatus,
    pub priority: OrderPriority,
    pub customer: Customer, // 客户快照（首次出现时登记,之后归并）
    pub product: Product,
    pub price_per_unit: f64,
    pub requested_qty: u32,
    pub created_at: DateTime<Utc>,
}

/// 单批次接入结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    pub batch_id: String,    // 批次标识
    pub accepted: usize,     // 实际接入条数（可能被 max_orders 截断）
    pub page: usize,         // 接入后的页号
    pub has_more_data: bool, // 是否还允许继续接入
}

// ==========================================
// OrderSource Trait
// ==========================================
// 用途: 订单数据源接口（拉取模式）
// 实现者: MockOrderSource（演示/测试数据）
pub trait OrderSource: Send {
    /// 产出下一批订单记录
    ///
    /// # 参数
    /// - `size`: 期望批次大小（数据源可以少给,给空表示枯竭）
    /// - `now`: 生成基准时间
    fn next_batch(&mut self, size: usize, now: DateTime<Utc>) -> Vec<OrderRecord>;

    /// 回到数据源起点（版本键变化触发整体重建时调用）
    fn reset(&mut self) {}
}

// ==========================================
// OrderImporter - 订单接入门
// ==========================================
pub struct OrderImporter {
    page_size: usize,
    max_orders: usize,
    current_page: usize,
    total_ingested: usize,
    has_more_data: bool,
}

impl OrderImporter {
    /// 构造函数
    ///
    /// # 参数
    /// - `config`: 分配配置（page_size / max_orders）
    pub fn new(config: &AllocationConfig) -> Self {
        Self {
            page_size: config.page_size,
            max_orders: config.max_orders,
            current_page: 0,
            total_ingested: 0,
            has_more_data: config.max_orders > 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_ingested(&self) -> usize {
        self.total_ingested
    }

    pub fn has_more_data(&self) -> bool {
        self.has_more_data
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 接入一批订单记录
    ///
    /// 规则:
    /// 1) 超出 max_orders 的部分被截断（不是错误）
    /// 2) 批内按 created_at 升序追加
    /// 3) 客户快照归并: 首个快照登记为台账实体,后续同 id 快照丢弃
    /// 4) 新订单 allocated_qty=0,等待下一次分配
    ///
    /// # 参数
    /// - `ledger`: 分配台账
    /// - `batch`: 订单记录批次
    ///
    /// # 返回
    /// 接入结果摘要
    pub fn ingest_batch(
        &mut self,
        ledger: &mut AllocationLedger,
        mut batch: Vec<OrderRecord>,
    ) -> IngestSummary {
        let batch_id = Uuid::new_v4().to_string();

        let capacity_left = self.max_orders.saturating_sub(self.total_ingested);
        if batch.len() > capacity_left {
            tracing::warn!(
                batch_id = %batch_id,
                dropped = batch.len() - capacity_left,
                "批次超出订单总量上限,超出部分被截断"
            );
            batch.truncate(capacity_left);
        }

        batch.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let accepted = batch.len();
        for record in batch {
            let customer_id = record.customer.customer_id.clone();

            // 客户实体只存一份: 首次出现登记,之后归并到已有实体
            ledger
                .customers
                .entry(customer_id.clone())
                .or_insert(record.customer);

            ledger.orders.push(Order {
                order_id: record.order_id,
                status: record.status,
                priority: record.priority,
                customer_id,
                product: record.product,
                price_per_unit: record.price_per_unit,
                requested_qty: record.requested_qty,
                allocated_qty: 0,
                assign_reason: None,
                created_at: record.created_at,
            });
        }

        if accepted > 0 {
            self.current_page += 1;
        }
        self.total_ingested += accepted;
        if self.total_ingested >= self.max_orders {
            self.has_more_data = false;
        }

        tracing::info!(
            batch_id = %batch_id,
            accepted,
            page = self.current_page,
            total_ingested = self.total_ingested,
            "订单批次接入完成"
        );

        IngestSummary {
            batch_id,
            accepted,
            page: self.current_page,
            has_more_data: self.has_more_data,
        }
    }

    /// 从数据源拉取并接入下一页
    ///
    /// # 参数
    /// - `ledger`: 分配台账
    /// - `source`: 订单数据源
    /// - `now`: 生成基准时间
    pub fn load_more(
        &mut self,
        ledger: &mut AllocationLedger,
        source: &mut dyn OrderSource,
        now: DateTime<Utc>,
    ) -> IngestSummary {
        if !self.has_more_data {
            return IngestSummary {
                batch_id: Uuid::new_v4().to_string(),
                accepted: 0,
                page: self.current_page,
                has_more_data: false,
            };
        }

        let want = self
            .page_size
            .min(self.max_orders.saturating_sub(self.total_ingested));
        let batch = source.next_batch(want, now);
        if batch.is_empty() {
            // 数据源枯竭
            self.has_more_data = false;
            return IngestSummary {
                batch_id: Uuid::new_v4().to_string(),
                accepted: 0,
                page: self.current_page,
                has_more_data: false,
            };
        }

        self.ingest_batch(ledger, batch)
    }
}
