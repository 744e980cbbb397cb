//! 结果导出
//!
//! 文件名编码批次完成度：全部到终态为 *_Results_Full.xlsx，
//! 否则为 *_Partial_{已完成}_of_{总数}.xlsx。可在任意完成度触发。

pub mod excel;

pub use excel::{generate_excel, project_rows};

use crate::analyzer::{AnalysisMode, StatusCounts, WorkItem};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// 按模式与完成度生成导出文件名
pub fn export_file_name(mode: AnalysisMode, counts: &StatusCounts) -> String {
    let prefix = match mode {
        AnalysisMode::Address => "Address_Consistency",
        AnalysisMode::Dish => "Dish_Consistency",
    };

    if counts.is_finished() {
        format!("{}_Results_Full.xlsx", prefix)
    } else {
        format!(
            "{}_Partial_{}_of_{}.xlsx",
            prefix,
            counts.completed(),
            counts.total
        )
    }
}

/// 把当前条目列表导出到目录，返回生成的文件路径
pub fn export_results(
    items: &[WorkItem],
    mode: AnalysisMode,
    output_dir: &Path,
) -> Result<PathBuf> {
    let counts = StatusCounts::of(items);
    let path = output_dir.join(export_file_name(mode, &counts));
    excel::generate_excel(items, mode, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name_full() {
        let counts = StatusCounts {
            total: 5,
            success: 4,
            error: 1,
            ..StatusCounts::default()
        };
        assert_eq!(
            export_file_name(AnalysisMode::Address, &counts),
            "Address_Consistency_Results_Full.xlsx"
        );
    }

    #[test]
    fn test_export_file_name_partial() {
        let counts = StatusCounts {
            total: 5,
            success: 2,
            pending: 3,
            ..StatusCounts::default()
        };
        assert_eq!(
            export_file_name(AnalysisMode::Address, &counts),
            "Address_Consistency_Partial_2_of_5.xlsx"
        );
        assert_eq!(
            export_file_name(AnalysisMode::Dish, &counts),
            "Dish_Consistency_Partial_2_of_5.xlsx"
        );
    }
}
