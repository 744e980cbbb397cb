//! 批量核验引擎模块
//!
//! - types: 工作项与判定结果的数据模型
//! - store: 单写者工作项存储
//! - engine: 串行驱动循环（重试/冷却/暂停）
//! - client: AI网关客户端
//! - parser: 网关响应解析

pub mod client;
pub mod engine;
pub mod parser;
pub mod store;
pub mod types;

pub use client::{ConsistencyClient, GatewayClient};
pub use engine::{BatchEngine, EngineEvent, EngineOptions, RetryMode, RunSummary, WaitKind};
pub use store::{ItemStore, StatusCounts};
pub use types::{
    AddressVerdict, AnalysisMode, AnalysisStatus, DishVerdict, ItemPayload, Verdict, WorkItem,
};
