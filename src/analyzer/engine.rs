//! 批量核验队列引擎
//!
//! 核心状态机: PENDING → ANALYZING → SUCCESS / ERROR
//!
//! ## 驱动规则
//! 1. 严格串行，同一时刻只有一条在途请求（刻意限速，远端按分钟限流）
//! 2. 成功后等待固定间隔再发下一条；最后一条不再等待
//! 3. 失败后冷却更长时间再重试同一条；超出重试上限则标记ERROR并继续下一条
//! 4. 所有等待按tick分片，取消令牌在每个tick边界生效（≤1秒）
//! 5. 单条失败永不中断整批；只有取消或队列耗尽才会结束循环
//!
//! 暂停语义: 取消不回滚任何已进入ANALYZING/终态的条目；
//! 下次运行开始时把遗留的ANALYZING重新排队为PENDING。

use super::client::ConsistencyClient;
use super::store::ItemStore;
use crate::config::Config;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// 重试策略
///
/// 两种策略互斥，不混用：默认有界重试；
/// fail-fast下任何失败立即终结该条目，无冷却无重试。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryMode {
    #[default]
    Bounded,
    FailFast,
}

/// 引擎时序与重试参数
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// 成功后的请求间隔
    pub normal_delay: Duration,
    /// 失败后的冷却时长（应长于normal_delay）
    pub error_cooldown: Duration,
    /// 首次调用之外的最大重试次数
    pub max_retries: u32,
    pub retry_mode: RetryMode,
    /// 等待分片粒度，取消在tick边界生效
    pub tick: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            normal_delay: Duration::from_secs(10),
            error_cooldown: Duration::from_secs(60),
            max_retries: 3,
            retry_mode: RetryMode::Bounded,
            tick: Duration::from_secs(1),
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &Config, fail_fast: bool) -> Self {
        Self {
            normal_delay: Duration::from_secs(config.normal_delay_secs),
            error_cooldown: Duration::from_secs(config.error_cooldown_secs),
            max_retries: config.max_retries,
            retry_mode: if fail_fast {
                RetryMode::FailFast
            } else {
                RetryMode::Bounded
            },
            tick: Duration::from_secs(1),
        }
    }
}

/// 等待类型（进度显示用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitKind {
    /// 成功后的限流间隔
    Pacing,
    /// 第attempt次失败后的冷却
    Cooldown { attempt: u32 },
}

/// 引擎对外事件，经可选channel通知观察者
#[derive(Debug, Clone)]
pub enum EngineEvent {
    ItemStarted {
        id: String,
        row_no: usize,
    },
    AttemptFailed {
        id: String,
        attempt: u32,
        message: String,
    },
    ItemSucceeded {
        id: String,
    },
    ItemErrored {
        id: String,
        message: String,
    },
    Waiting {
        kind: WaitKind,
        remaining_secs: u64,
    },
    RunFinished {
        summary: RunSummary,
    },
}

/// 单次运行的汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub success: usize,
    pub error: usize,
    pub pending: usize,
    /// 因取消而停止（而非队列耗尽）
    pub stopped: bool,
}

pub struct BatchEngine<C> {
    store: ItemStore,
    client: C,
    options: EngineOptions,
    events: Option<UnboundedSender<EngineEvent>>,
}

impl<C: ConsistencyClient> BatchEngine<C> {
    pub fn new(store: ItemStore, client: C, options: EngineOptions) -> Self {
        Self {
            store,
            client,
            options,
            events: None,
        }
    }

    pub fn with_events(mut self, events: UnboundedSender<EngineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// 驱动队列直到PENDING耗尽或取消
    ///
    /// 可重复调用：再次运行即为"继续"，只扫描PENDING，
    /// 上次中断时遗留的ANALYZING先降回PENDING。
    pub async fn run(&self, cancel: &CancellationToken) -> RunSummary {
        self.store.requeue_interrupted();

        while !cancel.is_cancelled() {
            let Some(item) = self.store.next_pending() else {
                break;
            };
            self.process_item(&item.id, item.row_no, cancel).await;
        }

        let counts = self.store.counts();
        let summary = RunSummary {
            total: counts.total,
            success: counts.success,
            error: counts.error,
            pending: counts.pending + counts.analyzing,
            stopped: cancel.is_cancelled(),
        };
        self.emit(EngineEvent::RunFinished { summary });
        summary
    }

    /// 处理单条：调用客户端，按策略重试，写回终态
    ///
    /// 任何分类错误都被转化为条目状态，不会向上传播。
    async fn process_item(&self, id: &str, row_no: usize, cancel: &CancellationToken) {
        let Some(payload) = self.store.payload(id) else {
            return;
        };

        self.store.mark_analyzing(id);
        self.emit(EngineEvent::ItemStarted {
            id: id.to_string(),
            row_no,
        });

        loop {
            match self.client.classify(&payload).await {
                Ok(verdict) => {
                    self.store.mark_success(id, verdict);
                    self.emit(EngineEvent::ItemSucceeded { id: id.to_string() });

                    // 最后一条不再做收尾等待
                    if self.store.has_pending() {
                        self.wait(self.options.normal_delay, WaitKind::Pacing, cancel)
                            .await;
                    }
                    return;
                }
                Err(err) => {
                    let attempt = self.store.record_attempt(id);
                    self.emit(EngineEvent::AttemptFailed {
                        id: id.to_string(),
                        attempt,
                        message: err.to_string(),
                    });

                    match self.options.retry_mode {
                        RetryMode::FailFast => {
                            let message = err.to_string();
                            self.store.mark_error(id, &message);
                            self.emit(EngineEvent::ItemErrored {
                                id: id.to_string(),
                                message,
                            });
                            return;
                        }
                        RetryMode::Bounded => {
                            if attempt > self.options.max_retries {
                                let message =
                                    format!("已达最大重试次数（共{}次调用）: {}", attempt, err);
                                self.store.mark_error(id, &message);
                                self.emit(EngineEvent::ItemErrored {
                                    id: id.to_string(),
                                    message,
                                });
                                return;
                            }

                            self.wait(
                                self.options.error_cooldown,
                                WaitKind::Cooldown { attempt },
                                cancel,
                            )
                            .await;

                            // 冷却中被取消：条目保持ANALYZING，下次运行重新排队
                            if cancel.is_cancelled() {
                                return;
                            }
                        }
                    }
                }
            }
        }
    }

    /// 可中断等待：按tick分片睡眠，每个tick检查取消并发倒计时事件
    async fn wait(&self, total: Duration, kind: WaitKind, cancel: &CancellationToken) {
        let mut remaining = total;
        while !remaining.is_zero() {
            if cancel.is_cancelled() {
                return;
            }

            self.emit(EngineEvent::Waiting {
                kind,
                remaining_secs: remaining.as_secs_f64().ceil() as u64,
            });

            let step = remaining.min(self.options.tick);
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(step) => {}
            }
            remaining = remaining.saturating_sub(step);
        }
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}
