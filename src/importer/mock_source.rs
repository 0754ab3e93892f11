// ==========================================
// 订单库存分配系统 - 演示订单数据源
// ==========================================
// 用途: 为演示程序与测试生成确定性订单批次
// 红线: 随机分布只是测试数据口径,不属于引擎契约;
//       此处用下标模式代替随机数,保证可复现
// ==========================================

use crate::domain::customer::Customer;
use crate::domain::order::Product;
use crate::domain::types::{OrderPriority, OrderStatus};
use crate::importer::order_importer::{OrderRecord, OrderSource};
use chrono::{DateTime, Duration, Utc};

const MOCK_CUSTOMER_COUNT: usize = 20;

// 状态循环: 约三成 NEW,其余 OVER_DUE / EMERGENCY 均分
const STATUS_CYCLE: &[OrderStatus] = &[
    OrderStatus::New,
    OrderStatus::OverDue,
    OrderStatus::Emergency,
    OrderStatus::OverDue,
    OrderStatus::New,
    OrderStatus::Emergency,
    OrderStatus::OverDue,
];

// ==========================================
// MockOrderSource - 演示订单数据源
// ==========================================
pub struct MockOrderSource {
    next_index: usize,
    customers: Vec<Customer>,
}

impl MockOrderSource {
    /// 构造函数
    ///
    /// 预生成 20 个演示客户（Balerion01..Balerion20）,
    /// 信用额度按下标模式落在 1000~6000 区间。
    pub fn new() -> Self {
        let customers = (0..MOCK_CUSTOMER_COUNT)
            .map(|i| {
                let customer_id = format!("CUST-{:02}", i + 1);
                let name = format!("Balerion{:02}", i + 1);
                let credit_limit = 1000.0 + ((i * 997) % 5001) as f64;
                Customer::new(&customer_id, &name, credit_limit)
            })
            .collect();

        Self {
            next_index: 0,
            customers,
        }
    }

    /// 演示客户列表
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// 生成下标为 index 的演示订单记录
    fn generate_record(&self, index: usize, now: DateTime<Utc>) -> OrderRecord {
        let customer = &self.customers[(index * 7) % self.customers.len()];

        OrderRecord {
            order_id: format!("ORDER-{:03}", index + 1),
            status: STATUS_CYCLE[index % STATUS_CYCLE.len()],
            priority: if index % 5 == 0 {
                OrderPriority::High
            } else {
                OrderPriority::Normal
            },
            customer: customer.clone(),
            product: Product {
                product_id: "SALMON-001".to_string(),
                name: "Salmon".to_string(),
                remark: "1 day delivery Product".to_string(),
            },
            price_per_unit: 400.0 + ((index * 37) % 201) as f64,
            requested_qty: 5 + (index % 5) as u32,
            created_at: now
                - Duration::days(((index * 13) % 30) as i64)
                - Duration::hours(((index * 5) % 24) as i64),
        }
    }
}

impl OrderSource for MockOrderSource {
    fn next_batch(&mut self, size: usize, now: DateTime<Utc>) -> Vec<OrderRecord> {
        let start = self.next_index;
        self.next_index += size;
        (start..start + size)
            .map(|i| self.generate_record(i, now))
            .collect()
    }

    fn reset(&mut self) {
        self.next_index = 0;
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for MockOrderSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_are_deterministic() {
        let now = Utc::now();
        let mut a = MockOrderSource::new();
        let mut b = MockOrderSource::new();

        assert_eq!(a.next_batch(10, now), b.next_batch(10, now));
    }

    #[test]
    fn test_order_ids_are_sequential_across_batches() {
        let now = Utc::now();
        let mut source = MockOrderSource::new();

        let first = source.next_batch(3, now);
        let second = source.next_batch(2, now);
        assert_eq!(first[0].order_id, "ORDER-001");
        assert_eq!(first[2].order_id, "ORDER-003");
        assert_eq!(second[0].order_id, "ORDER-004");
    }

    #[test]
    fn test_generated_values_within_demo_ranges() {
        let now = Utc::now();
        let mut source = MockOrderSource::new();

        for record in source.next_batch(70, now) {
            assert!(record.price_per_unit >= 400.0 && record.price_per_unit <= 600.0);
            assert!(record.requested_qty >= 5 && record.requested_qty <= 9);
            assert!(record.customer.credit_limit >= 1000.0);
            assert!(record.created_at <= now);
            assert!(now - record.created_at <= Duration::days(31));
        }
    }

    #[test]
    fn test_customer_snapshot_stable_per_id() {
        // 同一客户 id 的快照在所有批次中一致（额度不漂移）
        let now = Utc::now();
        let mut source = MockOrderSource::new();
        let records = source.next_batch(70, now);

        let mut seen: std::collections::HashMap<String, f64> = std::collections::HashMap::new();
        for record in &records {
            let limit = seen
                .entry(record.customer.customer_id.clone())
                .or_insert(record.customer.credit_limit);
            assert_eq!(*limit, record.customer.credit_limit);
        }
        assert!(seen.len() <= MOCK_CUSTOMER_COUNT);
    }
}
