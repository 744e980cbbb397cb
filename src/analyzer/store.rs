//! 工作项存储（单写者，多读者）
//!
//! 引擎是唯一写者；进度显示与导出随时读取快照。
//! 每次修改以单条为单位持锁完成，读者不会看到半更新的条目。

use super::types::{AnalysisStatus, ItemPayload, Verdict, WorkItem};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 各状态的条目数统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub analyzing: usize,
    pub success: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn of(items: &[WorkItem]) -> Self {
        let mut counts = Self {
            total: items.len(),
            ..Self::default()
        };
        for item in items {
            match item.status {
                AnalysisStatus::Pending => counts.pending += 1,
                AnalysisStatus::Analyzing => counts.analyzing += 1,
                AnalysisStatus::Success => counts.success += 1,
                AnalysisStatus::Error => counts.error += 1,
            }
        }
        counts
    }

    /// 已到终态的条目数
    pub fn completed(&self) -> usize {
        self.success + self.error
    }

    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed() == self.total
    }
}

#[derive(Clone)]
pub struct ItemStore {
    items: Arc<RwLock<Vec<WorkItem>>>,
}

impl ItemStore {
    pub fn new(items: Vec<WorkItem>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<WorkItem>> {
        self.items.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<WorkItem>> {
        self.items.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// 当前全量快照（导出与测试用）
    pub fn snapshot(&self) -> Vec<WorkItem> {
        self.read().clone()
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::of(&self.read())
    }

    /// 按列表顺序取第一条PENDING（克隆返回，锁外使用）
    pub fn next_pending(&self) -> Option<WorkItem> {
        self.read()
            .iter()
            .find(|item| item.status == AnalysisStatus::Pending)
            .cloned()
    }

    pub fn has_pending(&self) -> bool {
        self.read()
            .iter()
            .any(|item| item.status == AnalysisStatus::Pending)
    }

    /// 上次暂停时卡在ANALYZING的条目重新排队，返回处理条数
    pub fn requeue_interrupted(&self) -> usize {
        let mut items = self.write();
        let mut requeued = 0;
        for item in items.iter_mut() {
            if item.status == AnalysisStatus::Analyzing {
                item.revert_pending();
                requeued += 1;
            }
        }
        requeued
    }

    pub fn mark_analyzing(&self, id: &str) {
        self.with_item(id, WorkItem::mark_analyzing);
    }

    pub fn mark_success(&self, id: &str, verdict: Verdict) {
        self.with_item(id, |item| item.mark_success(verdict));
    }

    pub fn mark_error(&self, id: &str, message: &str) {
        self.with_item(id, |item| item.mark_error(message));
    }

    /// 失败一次，返回累计调用次数
    pub fn record_attempt(&self, id: &str) -> u32 {
        let mut items = self.write();
        match items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.attempts += 1;
                item.attempts
            }
            None => 0,
        }
    }

    pub fn payload(&self, id: &str) -> Option<ItemPayload> {
        self.read()
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.payload.clone())
    }

    fn with_item(&self, id: &str, f: impl FnOnce(&mut WorkItem)) {
        let mut items = self.write();
        if let Some(item) = items.iter_mut().find(|item| item.id == id) {
            f(item);
        }
    }
}
