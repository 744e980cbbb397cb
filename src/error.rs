use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsistencyError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("未配置App ID。请执行 `consistency-ai config --set-app-id YOUR_APP_ID`，或设置环境变量 APP_ID")]
    MissingAppId,

    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("Excel读取错误: {0}")]
    ExcelRead(String),

    #[error("未找到可核验的数据行: {0}")]
    NoRowsFound(String),

    #[error("API调用错误: {0}")]
    ApiCall(String),

    #[error("API响应解析失败: {0}")]
    ApiParse(String),

    #[error("JSON解析错误: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成错误: {0}")]
    ExcelGeneration(String),
}

pub type Result<T> = std::result::Result<T, ConsistencyError>;
