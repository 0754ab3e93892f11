// ==========================================
// 订单库存分配系统 - 优先级评分引擎
// ==========================================
// 职责: 订单优先级评分与排名
// 红线: 纯函数,给定 now 结果确定,无副作用
// ==========================================
// 评分构成:
//   状态分: EMERGENCY=100, OVER_DUE=50, NEW=25
//   加急分: HIGH +25
//   年龄分: min(账龄天数 × 2, 20)
// ==========================================

use crate::domain::order::Order;
use crate::domain::types::{OrderPriority, OrderStatus};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
const AGE_SCORE_CAP: f64 = 20.0;

// ==========================================
// PriorityScorer - 优先级评分引擎
// ==========================================
pub struct PriorityScorer {
    // 无状态引擎,不需要注入依赖
}

impl PriorityScorer {
    /// 构造函数
    ///
    /// # 返回
    /// 新的 PriorityScorer 实例
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算订单优先级分数
    ///
    /// # 参数
    /// - `order`: 待评分订单
    /// - `now`: 评分基准时间
    ///
    /// # 返回
    /// 分数越高优先级越高
    pub fn score(&self, order: &Order, now: DateTime<Utc>) -> f64 {
        let mut score = match order.status {
            OrderStatus::Emergency => 100.0,
            OrderStatus::OverDue => 50.0,
            OrderStatus::New => 25.0,
        };

        if order.priority == OrderPriority::High {
            score += 25.0;
        }

        // 账龄允许带小数天；未来时间戳按 0 天处理
        let age_ms = (now - order.created_at).num_milliseconds().max(0) as f64;
        let age_in_days = age_ms / MS_PER_DAY;
        score += (age_in_days * 2.0).min(AGE_SCORE_CAP);

        score
    }

    /// 比较两个订单的优先级
    ///
    /// 排序键:
    /// 1) 分数降序
    /// 2) created_at 升序 (老订单优先,保证排序稳定可解释)
    ///
    /// # 返回
    /// Ordering::Less 表示 a 优先于 b
    pub fn compare(&self, a: &Order, b: &Order, now: DateTime<Utc>) -> Ordering {
        let sa = self.score(a, now);
        let sb = self.score(b, now);

        match sb.total_cmp(&sa) {
            Ordering::Equal => a.created_at.cmp(&b.created_at),
            other => other,
        }
    }

    /// 生成订单排名（两轮分配的统一分配顺序）
    ///
    /// 预计算 score，避免排序比较中重复计算。
    ///
    /// # 参数
    /// - `orders`: 待排名订单集合
    /// - `now`: 评分基准时间
    ///
    /// # 返回
    /// 按优先级从高到低排列的 order_id 列表
    pub fn rank(&self, orders: &[Order], now: DateTime<Utc>) -> Vec<String> {
        let mut score_by_id: HashMap<&str, f64> = HashMap::with_capacity(orders.len());
        for order in orders {
            score_by_id.insert(order.order_id.as_str(), self.score(order, now));
        }

        let mut ranked: Vec<&Order> = orders.iter().collect();
        ranked.sort_by(|a, b| {
            let sa = score_by_id.get(a.order_id.as_str()).copied().unwrap_or(0.0);
            let sb = score_by_id.get(b.order_id.as_str()).copied().unwrap_or(0.0);
            match sb.total_cmp(&sa) {
                Ordering::Equal => a.created_at.cmp(&b.created_at),
                other => other,
            }
        });

        ranked.into_iter().map(|o| o.order_id.clone()).collect()
    }

    /// 生成评分原因 (可解释性)
    ///
    /// # 返回
    /// JSON 格式的评分原因字符串
    pub fn generate_score_reason(&self, order: &Order, now: DateTime<Utc>) -> String {
        let status_score = match order.status {
            OrderStatus::Emergency => 100.0,
            OrderStatus::OverDue => 50.0,
            OrderStatus::New => 25.0,
        };
        let priority_score = if order.priority == OrderPriority::High {
            25.0
        } else {
            0.0
        };
        let age_ms = (now - order.created_at).num_milliseconds().max(0) as f64;
        let age_score = (age_ms / MS_PER_DAY * 2.0).min(AGE_SCORE_CAP);

        format!(
            r#"{{"status":"{}","status_score":{},"priority":"{}","priority_score":{},"age_score":{:.3},"total":{:.3}}}"#,
            order.status,
            status_score,
            order.priority,
            priority_score,
            age_score,
            status_score + priority_score + age_score
        )
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for PriorityScorer {
    fn default() -> Self {
        Self::new()
    }
}
