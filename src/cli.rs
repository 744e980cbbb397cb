use crate::analyzer::AnalysisMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "consistency-ai")]
#[command(about = "商家地址/菜品一致性AI批量核验工具", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 输出详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 批量核验Excel并导出结果
    Run {
        /// 输入Excel文件路径（只读第一个sheet）
        #[arg(required = true)]
        input: PathBuf,

        /// 核验模式 (address/dish)
        #[arg(short, long, default_value = "address")]
        mode: AnalysisMode,

        /// 输出目录（默认：输入文件所在目录）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 快速失败模式：单条失败立即标记ERROR，不重试不冷却
        #[arg(long)]
        fail_fast: bool,

        /// 成功后的请求间隔秒数（默认10）
        #[arg(long)]
        delay: Option<u64>,

        /// 失败后的冷却秒数（默认60）
        #[arg(long)]
        cooldown: Option<u64>,

        /// 单条最大重试次数（默认3）
        #[arg(long)]
        max_retries: Option<u32>,

        /// Ctrl+C暂停后不询问，直接导出当前进度并退出
        #[arg(long)]
        no_prompt: bool,
    },

    /// 核验单条数据（不读Excel）
    Check {
        /// 核验模式 (address/dish)
        #[arg(short, long, default_value = "address")]
        mode: AnalysisMode,

        /// 实际地址（address模式）
        #[arg(long)]
        real: Option<String>,

        /// 推荐商圈（address模式）
        #[arg(long)]
        recommended: Option<String>,

        /// 菜品名称（dish模式）
        #[arg(long)]
        spu: Option<String>,

        /// 推荐菜品（dish模式）
        #[arg(long)]
        recommend: Option<String>,

        /// 商家名称（dish模式的判定上下文）
        #[arg(long)]
        merchant: Option<String>,
    },

    /// 查看/修改配置
    Config {
        /// 设置App ID（网关鉴权凭证）
        #[arg(long)]
        set_app_id: Option<String>,

        /// 设置模型名称
        #[arg(long)]
        set_model: Option<String>,

        /// 设置网关地址
        #[arg(long)]
        set_endpoint: Option<String>,

        /// 显示当前配置
        #[arg(long)]
        show: bool,
    },
}
