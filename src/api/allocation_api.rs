// ==========================================
// 订单库存分配系统 - 分配API
// ==========================================
// 职责: 提供分配业务操作入口,供宿主（CLI/服务）调用
// 红线: 台账由单一互斥边界保护,自动分配与人工分配绝不交错
// 红线: 每个操作持锁运行到完成,不可中途取消
// ==========================================

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{ManualAllocationOutcome, ManualAllocationValidator};
use crate::config::AllocationConfig;
use crate::domain::ledger::AllocationLedger;
use crate::domain::order::Order;
use crate::engine::allocator::{AllocationSummary, StockAllocator};
use crate::engine::priority::PriorityScorer;
use crate::importer::order_importer::{IngestSummary, OrderImporter, OrderRecord, OrderSource};

/// 初始版本键
const DEFAULT_VERSION_KEY: &str = "v1.0.0";

// ==========================================
// StockSummary - 库存概览
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSummary {
    pub version_key: String,
    pub total_stock: u32,
    pub remaining_stock: u32,
    pub total_allocated: u32,
    pub order_count: usize,
    pub customer_count: usize,
    pub current_page: usize,
    pub has_more_data: bool,
}

// 互斥边界内的全部可变状态
struct AllocationState {
    ledger: AllocationLedger,
    importer: OrderImporter,
    source: Box<dyn OrderSource>,
    version_key: String,
}

// ==========================================
// AllocationApi - 分配API
// ==========================================
pub struct AllocationApi {
    // 单一互斥边界: 台账、接入分页、数据源一起加锁,
    // 保证任意操作（含先重置后分配的自动分配）原子可见
    state: Mutex<AllocationState>,
    config: AllocationConfig,
    scorer: PriorityScorer,
    allocator: StockAllocator,
    validator: ManualAllocationValidator,
}

impl AllocationApi {
    /// 创建新的 AllocationApi 实例
    ///
    /// # 参数
    /// - `config`: 分配配置（构造期校验,非法配置直接拒绝）
    /// - `source`: 订单数据源
    pub fn new(config: AllocationConfig, source: Box<dyn OrderSource>) -> ApiResult<Self> {
        config.validate().map_err(ApiError::InvalidConfig)?;

        let state = AllocationState {
            ledger: AllocationLedger::new(config.total_stock),
            importer: OrderImporter::new(&config),
            source,
            version_key: DEFAULT_VERSION_KEY.to_string(),
        };

        Ok(Self {
            state: Mutex::new(state),
            config,
            scorer: PriorityScorer::new(),
            allocator: StockAllocator::new(),
            validator: ManualAllocationValidator::new(),
        })
    }

    fn lock_state(&self) -> ApiResult<std::sync::MutexGuard<'_, AllocationState>> {
        self.state
            .lock()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))
    }

    // ==========================================
    // 分配操作
    // ==========================================

    /// 人工分配单笔订单
    ///
    /// # 参数
    /// - `order_id`: 目标订单
    /// - `quantity`: 目标分配数量（允许为负或超请求量,截断处理）
    pub fn allocate(&self, order_id: &str, quantity: i64) -> ApiResult<ManualAllocationOutcome> {
        let mut state = self.lock_state()?;
        self.validator
            .validate_and_apply(&mut state.ledger, order_id, quantity)
    }

    /// 全量自动分配（先重置,后两轮分配,覆盖一切既有分配）
    pub fn auto_allocate(&self, now: DateTime<Utc>) -> ApiResult<AllocationSummary> {
        let mut state = self.lock_state()?;
        Ok(self.allocator.auto_allocate(&mut state.ledger, now))
    }

    /// 重置分配状态（订单归零、信用恢复、库存回满）
    pub fn reset(&self) -> ApiResult<()> {
        let mut state = self.lock_state()?;
        self.allocator.reset(&mut state.ledger);
        Ok(())
    }

    // ==========================================
    // 接入操作
    // ==========================================

    /// 从数据源拉取并接入下一页订单
    pub fn load_more_orders(&self, now: DateTime<Utc>) -> ApiResult<IngestSummary> {
        let mut state = self.lock_state()?;
        let AllocationState {
            ledger,
            importer,
            source,
            ..
        } = &mut *state;
        Ok(importer.load_more(ledger, source.as_mut(), now))
    }

    /// 直接接入一批外部订单记录（推送路径）
    pub fn ingest(&self, batch: Vec<OrderRecord>) -> ApiResult<IngestSummary> {
        let mut state = self.lock_state()?;
        let AllocationState {
            ledger, importer, ..
        } = &mut *state;
        Ok(importer.ingest_batch(ledger, batch))
    }

    // ==========================================
    // 版本键
    // ==========================================

    /// 设置版本键;版本变化时整体重建台账与接入状态
    ///
    /// # 返回
    /// true 表示发生了重建
    pub fn set_version_key(&self, version_key: &str) -> ApiResult<bool> {
        let mut state = self.lock_state()?;
        if state.version_key == version_key {
            return Ok(false);
        }

        tracing::info!(
            from = %state.version_key,
            to = %version_key,
            "版本键变化,重建分配台账"
        );

        state.ledger = AllocationLedger::new(self.config.total_stock);
        state.importer = OrderImporter::new(&self.config);
        state.source.reset();
        state.version_key = version_key.to_string();
        Ok(true)
    }

    pub fn version_key(&self) -> ApiResult<String> {
        Ok(self.lock_state()?.version_key.clone())
    }

    // ==========================================
    // 读快照
    // ==========================================

    /// 订单优先级分数
    pub fn score(&self, order_id: &str, now: DateTime<Utc>) -> ApiResult<f64> {
        let state = self.lock_state()?;
        match state.ledger.find_order(order_id) {
            Some(order) => Ok(self.scorer.score(order, now)),
            None => Err(ApiError::OrderNotFound {
                order_id: order_id.to_string(),
            }),
        }
    }

    /// 按优先级排列的订单快照（展示层排序口径与分配排名一致）
    pub fn list_orders_ranked(&self, now: DateTime<Utc>) -> ApiResult<Vec<Order>> {
        let state = self.lock_state()?;
        let mut orders = state.ledger.orders.clone();
        orders.sort_by(|a, b| self.scorer.compare(a, b, now));
        Ok(orders)
    }

    /// 库存概览快照
    pub fn stock_summary(&self) -> ApiResult<StockSummary> {
        let state = self.lock_state()?;
        Ok(StockSummary {
            version_key: state.version_key.clone(),
            total_stock: state.ledger.total_stock,
            remaining_stock: state.ledger.remaining_stock,
            total_allocated: state.ledger.total_allocated(),
            order_count: state.ledger.orders.len(),
            customer_count: state.ledger.customers.len(),
            current_page: state.importer.current_page(),
            has_more_data: state.importer.has_more_data(),
        })
    }

    /// 完整台账快照（克隆,供只读消费方使用）
    pub fn ledger_snapshot(&self) -> ApiResult<AllocationLedger> {
        Ok(self.lock_state()?.ledger.clone())
    }
}
