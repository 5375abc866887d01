use thiserror::Error;

/// 统一结果类型
pub type Result<T> = std::result::Result<T, DashboardError>;

/// 看板错误
#[derive(Debug, Error)]
pub enum DashboardError {
    /// 数据文件无法读取
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV 读写失败
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// 数据格式错误 (缺列、日期无法解析等)
    #[error("Data format error at line {line}: {message}")]
    DataFormat { line: u64, message: String },

    /// 过滤条件非法
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// 配置加载失败
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl DashboardError {
    pub fn data_format(line: u64, message: impl Into<String>) -> Self {
        Self::DataFormat {
            line,
            message: message.into(),
        }
    }

    /// 是否由调用方输入引起
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidFilter(_))
    }
}
