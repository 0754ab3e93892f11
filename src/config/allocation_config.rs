// ==========================================
// 订单库存分配系统 - 配置管理
// ==========================================
// 职责: 配置加载、默认值、合法性校验
// 存储: JSON 配置文件（可选）,缺省时使用内置默认值
// ==========================================

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "STOCK_ALLOCATION_CONFIG";

// ==========================================
// AllocationConfig - 分配配置
// ==========================================
// total_stock 决定台账容量;page_size/max_orders 只约束接入层喂入数据量,
// 不影响引擎行为。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub total_stock: u32,  // 库存总量
    pub page_size: usize,  // 接入分页大小
    pub max_orders: usize, // 订单总量上限
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            total_stock: 200,
            page_size: 10,
            max_orders: 70,
        }
    }
}

impl AllocationConfig {
    /// 从 JSON 文件加载配置
    ///
    /// # 参数
    /// - `path`: 配置文件路径
    ///
    /// # 返回
    /// - Ok(AllocationConfig): 加载并通过校验的配置
    /// - Err: 文件读取/解析/校验失败
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = fs::read_to_string(path)?;
        let config: AllocationConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置,失败时回落到默认值
    ///
    /// 查找顺序:
    /// 1) 环境变量 STOCK_ALLOCATION_CONFIG 指定的路径
    /// 2) 平台配置目录下 stock-allocation/config.json
    /// 3) 内置默认值
    pub fn load_or_default() -> Self {
        let candidate = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(Self::default_config_path);

        if let Some(path) = candidate {
            if path.exists() {
                match Self::from_json_file(&path) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "已加载配置文件");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "配置文件加载失败,使用默认配置");
                    }
                }
            }
        }

        Self::default()
    }

    /// 平台配置目录下的默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stock-allocation").join("config.json"))
    }

    /// 配置合法性校验
    ///
    /// # 返回
    /// - Ok(()): 配置合法
    /// - Err(String): 第一个不合法项的描述
    pub fn validate(&self) -> Result<(), String> {
        if self.total_stock == 0 {
            return Err("total_stock 必须为正整数".to_string());
        }
        if self.page_size == 0 {
            return Err("page_size 必须为正整数".to_string());
        }
        if self.max_orders < self.page_size {
            return Err(format!(
                "max_orders({}) 不能小于 page_size({})",
                self.max_orders, self.page_size
            ));
        }
        Ok(())
    }
}
