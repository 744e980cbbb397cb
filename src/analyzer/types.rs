//! 批量核验的数据模型
//!
//! WorkItem（工作项）= 一行输入数据 + 处理状态 + 最终判定结果。
//! 状态机见 engine.rs。

use serde::{Deserialize, Serialize};

/// 核验模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// 实际地址 vs 推荐商圈
    #[default]
    Address,
    /// 实际菜品 vs 推荐菜品
    Dish,
}

impl std::str::FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "address" | "addr" | "地址" => Ok(AnalysisMode::Address),
            "dish" | "菜品" => Ok(AnalysisMode::Dish),
            _ => Err(format!("未知模式: {}。可选 address 或 dish", s)),
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisMode::Address => write!(f, "address"),
            AnalysisMode::Dish => write!(f, "dish"),
        }
    }
}

/// 工作项状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    Pending,
    Analyzing,
    Success,
    Error,
}

impl AnalysisStatus {
    /// SUCCESS/ERROR 为终态，除整批重置外不再变化
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Success | AnalysisStatus::Error)
    }
}

/// 工作项的载荷，按模式区分字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPayload {
    Address {
        poi_id: String,
        merchant_name: String,
        real_address: String,
        recommended_address: String,
    },
    Dish {
        spu_id: String,
        merchant_name: String,
        spu_name: String,
        recommend_dish_name: String,
    },
}

impl ItemPayload {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            ItemPayload::Address { .. } => AnalysisMode::Address,
            ItemPayload::Dish { .. } => AnalysisMode::Dish,
        }
    }
}

/// 地址一致性判定结果（网关返回的JSON结构）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressVerdict {
    pub is_match: bool,
    pub real_address_district: String,
    pub recommended_address_district: String,
    pub confidence_score: u8,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_note: Option<String>,
}

/// 菜品一致性判定结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishVerdict {
    pub is_match: bool,
    pub confidence_score: u8,
    pub reasoning: String,
}

/// 按模式区分的判定结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Verdict {
    Address(AddressVerdict),
    Dish(DishVerdict),
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        match self {
            Verdict::Address(v) => v.is_match,
            Verdict::Dish(v) => v.is_match,
        }
    }

    pub fn confidence_score(&self) -> u8 {
        match self {
            Verdict::Address(v) => v.confidence_score,
            Verdict::Dish(v) => v.confidence_score,
        }
    }

    pub fn reasoning(&self) -> &str {
        match self {
            Verdict::Address(v) => &v.reasoning,
            Verdict::Dish(v) => &v.reasoning,
        }
    }
}

/// 一行待核验的数据
///
/// 不变式: result/error 与 status 保持一致 ——
/// SUCCESS ⇒ 仅 result；ERROR ⇒ 仅 error；其余状态两者皆空。
/// 通过 mark_* 方法修改状态以维持该不变式。
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// 批次内唯一、生命周期内稳定的标识
    pub id: String,
    /// 数据行号（表头后从1开始）
    pub row_no: usize,
    pub payload: ItemPayload,
    pub status: AnalysisStatus,
    pub result: Option<Verdict>,
    pub error: Option<String>,
    /// 本条已发起的调用次数（失败时累加）
    pub attempts: u32,
}

impl WorkItem {
    pub fn new(row_no: usize, payload: ItemPayload) -> Self {
        Self {
            id: format!("row-{}", row_no),
            row_no,
            payload,
            status: AnalysisStatus::Pending,
            result: None,
            error: None,
            attempts: 0,
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        self.payload.mode()
    }

    pub fn mark_analyzing(&mut self) {
        self.status = AnalysisStatus::Analyzing;
        self.result = None;
        self.error = None;
    }

    pub fn mark_success(&mut self, verdict: Verdict) {
        self.status = AnalysisStatus::Success;
        self.result = Some(verdict);
        self.error = None;
    }

    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = AnalysisStatus::Error;
        self.error = Some(message.into());
        self.result = None;
    }

    /// 中断后重新排队，重试预算一并重置
    pub fn revert_pending(&mut self) {
        self.status = AnalysisStatus::Pending;
        self.result = None;
        self.error = None;
        self.attempts = 0;
    }
}
