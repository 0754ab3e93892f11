// ==========================================
// 订单库存分配系统 - 演示主入口
// ==========================================
// 系统定位: 决策支持系统
// 用途: 接入演示订单 → 自动分配 → 人工调整 → 打印分配快照
// ==========================================

use chrono::Utc;
use stock_allocation::config::AllocationConfig;
use stock_allocation::importer::MockOrderSource;
use stock_allocation::{logging, AllocationApi};

fn main() {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("订单库存分配系统 - 决策支持系统");
    tracing::info!("系统版本: {}", stock_allocation::VERSION);
    tracing::info!("==================================================");

    // 加载配置
    let config = AllocationConfig::load_or_default();
    tracing::info!(
        total_stock = config.total_stock,
        page_size = config.page_size,
        max_orders = config.max_orders,
        "配置已加载"
    );

    // 创建API（演示数据源）
    let api = AllocationApi::new(config, Box::new(MockOrderSource::new()))
        .expect("无法初始化AllocationApi");

    let now = Utc::now();

    // 接入全部演示订单
    loop {
        let ingest = api.load_more_orders(now).expect("订单接入失败");
        tracing::info!(
            batch_id = %ingest.batch_id,
            accepted = ingest.accepted,
            page = ingest.page,
            "接入订单批次"
        );
        if !ingest.has_more_data {
            break;
        }
    }

    // 全量自动分配
    let summary = api.auto_allocate(now).expect("自动分配失败");
    tracing::info!(
        pass1_granted = summary.pass1_granted,
        pass2_granted = summary.pass2_granted,
        total_allocated = summary.total_allocated,
        remaining_stock = summary.remaining_stock,
        "自动分配完成"
    );

    // 人工调整演示: 把排名第一的订单改为 1 件
    if let Some(top_order_id) = summary.ranked_orders.first() {
        match api.allocate(top_order_id, 1) {
            Ok(outcome) => tracing::info!(
                order_id = %outcome.order_id,
                previous_qty = outcome.previous_qty,
                new_qty = outcome.new_qty,
                "人工分配已应用"
            ),
            Err(e) => tracing::warn!(order_id = %top_order_id, error = %e, "人工分配被拒绝"),
        }
    }

    // 打印最终快照
    let stock = api.stock_summary().expect("读取库存概览失败");
    tracing::info!(
        total_stock = stock.total_stock,
        remaining_stock = stock.remaining_stock,
        total_allocated = stock.total_allocated,
        order_count = stock.order_count,
        customer_count = stock.customer_count,
        "最终库存概览"
    );

    for order in api.list_orders_ranked(now).expect("读取订单快照失败") {
        let reason = order
            .assign_reason
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        tracing::info!(
            order_id = %order.order_id,
            status = %order.status,
            priority = %order.priority,
            customer_id = %order.customer_id,
            requested = order.requested_qty,
            allocated = order.allocated_qty,
            reason = %reason,
            "订单分配结果"
        );
    }
}
