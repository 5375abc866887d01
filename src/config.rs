use bigdecimal::BigDecimal;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// 销售数据 CSV 路径
    pub data_path: PathBuf,
    /// 每月固定运营成本
    pub monthly_operating_cost: BigDecimal,
}

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/vendas_simuladas.csv";
const DEFAULT_OPERATING_COST: i64 = 500;

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            dashboard: DashboardConfig {
                data_path: PathBuf::from(DEFAULT_DATA_PATH),
                monthly_operating_cost: BigDecimal::from(DEFAULT_OPERATING_COST),
            },
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 -> dashboard.toml (可选) -> 环境变量 (如 DASHBOARD_SERVER__PORT)
    pub fn load() -> Result<Self> {
        Self::load_from("dashboard")
    }

    pub fn load_from(file_stem: &str) -> Result<Self> {
        let settings = Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("dashboard.data_path", DEFAULT_DATA_PATH)?
            .set_default("dashboard.monthly_operating_cost", DEFAULT_OPERATING_COST.to_string())?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
