//! 进度显示
//!
//! 消费引擎事件，用indicatif渲染进度条与等待倒计时。
//! 引擎释放事件发送端后任务自行结束。

use crate::analyzer::{EngineEvent, StatusCounts, WaitKind};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

pub fn spawn(counts: StatusCounts, mut events: UnboundedReceiver<EngineEvent>) -> JoinHandle<()> {
    let bar = ProgressBar::new(counts.total as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_position(counts.completed() as u64);

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                EngineEvent::ItemStarted { row_no, .. } => {
                    bar.set_message(format!("正在核验第{}行...", row_no));
                }
                EngineEvent::AttemptFailed {
                    attempt, message, ..
                } => {
                    bar.set_message(format!("第{}次调用失败: {}", attempt, message));
                }
                EngineEvent::ItemSucceeded { .. } => {
                    bar.inc(1);
                    bar.set_message("");
                }
                EngineEvent::ItemErrored { id, .. } => {
                    bar.inc(1);
                    bar.set_message(format!("{} 标记为失败", id));
                }
                EngineEvent::Waiting {
                    kind,
                    remaining_secs,
                } => match kind {
                    WaitKind::Pacing => {
                        bar.set_message(format!("限流保护，等待{}秒...", remaining_secs));
                    }
                    WaitKind::Cooldown { attempt } => {
                        bar.set_message(format!(
                            "接口冷却中（已失败{}次），等待{}秒后重试...",
                            attempt, remaining_secs
                        ));
                    }
                },
                EngineEvent::RunFinished { summary } => {
                    if summary.stopped {
                        bar.set_message("已暂停");
                    } else {
                        bar.set_message("本轮完成");
                    }
                }
            }
        }
        bar.finish_and_clear();
    })
}
