// ==========================================
// 订单库存分配系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,携带可解释的结构化字段
// 红线: 分配类错误不落盘、不改台账,调用方可本地恢复
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因（可解释性）
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 分配校验错误（不改变台账状态）
    // ==========================================
    /// 订单不存在
    #[error("订单未找到: order_id={order_id}")]
    OrderNotFound { order_id: String },

    /// 库存不足
    #[error("剩余库存不足: 可用{available_stock}件, 需要{required_stock}件")]
    InsufficientStock {
        available_stock: u32,
        required_stock: u32,
    },

    /// 超出客户信用额度
    #[error("超出客户信用额度: customer={customer_name}, 可用额度{available_credit:.2}, 需要{required_credit:.2}")]
    CreditLimitExceeded {
        customer_name: String,
        available_credit: f64,
        required_credit: f64,
    },

    // ==========================================
    // 配置与通用错误
    // ==========================================
    #[error("无效配置: {0}")]
    InvalidConfig(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
