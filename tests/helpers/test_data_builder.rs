// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use stock_allocation::config::AllocationConfig;
use stock_allocation::domain::customer::Customer;
use stock_allocation::domain::ledger::AllocationLedger;
use stock_allocation::domain::order::Product;
use stock_allocation::domain::types::{OrderPriority, OrderStatus};
use stock_allocation::importer::{OrderImporter, OrderRecord};

// ==========================================
// OrderRecord 构建器
// ==========================================

pub struct OrderRecordBuilder {
    order_id: String,
    status: OrderStatus,
    priority: OrderPriority,
    customer: Customer,
    price_per_unit: f64,
    requested_qty: u32,
    created_at: DateTime<Utc>,
}

impl OrderRecordBuilder {
    pub fn new(order_id: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            status: OrderStatus::New,
            priority: OrderPriority::Normal,
            customer: Customer::new("CUST-01", "Balerion01", 10_000.0),
            price_per_unit: 100.0,
            requested_qty: 5,
            created_at: Utc::now(),
        }
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn priority(mut self, priority: OrderPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn customer(mut self, customer_id: &str, name: &str, credit_limit: f64) -> Self {
        self.customer = Customer::new(customer_id, name, credit_limit);
        self
    }

    pub fn price(mut self, price_per_unit: f64) -> Self {
        self.price_per_unit = price_per_unit;
        self
    }

    pub fn requested(mut self, requested_qty: u32) -> Self {
        self.requested_qty = requested_qty;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn build(self) -> OrderRecord {
        OrderRecord {
            order_id: self.order_id,
            status: self.status,
            priority: self.priority,
            customer: self.customer,
            product: Product {
                product_id: "SALMON-001".to_string(),
                name: "Salmon".to_string(),
                remark: "1 day delivery Product".to_string(),
            },
            price_per_unit: self.price_per_unit,
            requested_qty: self.requested_qty,
            created_at: self.created_at,
        }
    }
}

// ==========================================
// 台账构建辅助
// ==========================================

/// 通过接入门把记录灌进新台账（与生产路径一致）
pub fn ledger_from_records(total_stock: u32, records: Vec<OrderRecord>) -> AllocationLedger {
    let config = AllocationConfig {
        total_stock,
        page_size: records.len().max(1),
        max_orders: records.len().max(1),
    };
    let mut importer = OrderImporter::new(&config);
    let mut ledger = AllocationLedger::new(total_stock);
    importer.ingest_batch(&mut ledger, records);
    ledger
}
