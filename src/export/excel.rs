//! Excel生成
//!
//! 把工作项列表投影成平面表格写入xlsx。
//! 未完成的行渲染"Pending"占位，随时可导出部分结果。

use crate::analyzer::{AnalysisMode, AnalysisStatus, ItemPayload, Verdict, WorkItem};
use crate::error::{ConsistencyError, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// 导出sheet名
pub const SHEET_NAME: &str = "Analysis Results";

/// address模式的列头
pub const ADDRESS_HEADERS: &[&str] = &[
    "商家ID (wm_poi_id)",
    "商家名称 (wm_poi_name)",
    "实际地址 (poi_address)",
    "推荐地址 (address_region_name)",
    "是否一致 (Match)",
    "置信度 (Confidence)",
    "实际地址识别商圈",
    "推荐地址识别商圈",
    "分析原因 (Reasoning)",
];

/// dish模式的列头
pub const DISH_HEADERS: &[&str] = &[
    "菜品ID (spu_id)",
    "商家名称 (wm_poi_name)",
    "菜品名称 (spu_name)",
    "推荐菜品 (recommend_dish_name)",
    "是否一致 (Match)",
    "置信度 (Confidence)",
    "分析原因 (Reasoning)",
];

/// 工作项列表 → (列头, 数据行) 的纯投影
///
/// 状态无变化时重复调用产出完全相同的内容。
pub fn project_rows(items: &[WorkItem], mode: AnalysisMode) -> (&'static [&'static str], Vec<Vec<String>>) {
    let headers = match mode {
        AnalysisMode::Address => ADDRESS_HEADERS,
        AnalysisMode::Dish => DISH_HEADERS,
    };

    let rows = items.iter().map(|item| project_item(item, mode)).collect();
    (headers, rows)
}

fn project_item(item: &WorkItem, mode: AnalysisMode) -> Vec<String> {
    let match_cell = match item.status {
        AnalysisStatus::Success => match &item.result {
            Some(verdict) if verdict.is_match() => "是".to_string(),
            _ => "否".to_string(),
        },
        AnalysisStatus::Error => "Error".to_string(),
        _ => "Pending".to_string(),
    };

    let confidence_cell = match &item.result {
        Some(verdict) => format!("{}%", verdict.confidence_score()),
        None => "0%".to_string(),
    };

    let reasoning_cell = match item.status {
        AnalysisStatus::Success => item
            .result
            .as_ref()
            .map(|v| v.reasoning().to_string())
            .unwrap_or_default(),
        AnalysisStatus::Error => item.error.clone().unwrap_or_default(),
        _ => String::new(),
    };

    match (mode, &item.payload) {
        (
            AnalysisMode::Address,
            ItemPayload::Address {
                poi_id,
                merchant_name,
                real_address,
                recommended_address,
            },
        ) => {
            let (real_district, recommended_district) = match &item.result {
                Some(Verdict::Address(v)) => (
                    v.real_address_district.clone(),
                    v.recommended_address_district.clone(),
                ),
                _ => (String::new(), String::new()),
            };

            vec![
                poi_id.clone(),
                merchant_name.clone(),
                real_address.clone(),
                recommended_address.clone(),
                match_cell,
                confidence_cell,
                real_district,
                recommended_district,
                reasoning_cell,
            ]
        }
        (
            AnalysisMode::Dish,
            ItemPayload::Dish {
                spu_id,
                merchant_name,
                spu_name,
                recommend_dish_name,
            },
        ) => vec![
            spu_id.clone(),
            merchant_name.clone(),
            spu_name.clone(),
            recommend_dish_name.clone(),
            match_cell,
            confidence_cell,
            reasoning_cell,
        ],
        // 模式与载荷不符的条目不应出现；按空行兜底而不是崩溃
        _ => vec![String::new(); if mode == AnalysisMode::Address { 9 } else { 7 }],
    }
}

/// 写出xlsx文件
pub fn generate_excel(items: &[WorkItem], mode: AnalysisMode, output_path: &Path) -> Result<()> {
    let (headers, rows) = project_rows(items, mode);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| ConsistencyError::ExcelGeneration(format!("sheet名设置错误: {}", e)))?;

    let header_format = Format::new().set_bold();

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| ConsistencyError::ExcelGeneration(format!("表头写入错误: {}", e)))?;
        worksheet
            .set_column_width(col as u16, 22.0)
            .map_err(|e| ConsistencyError::ExcelGeneration(format!("列宽设置错误: {}", e)))?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write_string((row_idx + 1) as u32, col as u16, value)
                .map_err(|e| ConsistencyError::ExcelGeneration(format!("单元格写入错误: {}", e)))?;
        }
    }

    workbook
        .save(output_path)
        .map_err(|e| ConsistencyError::ExcelGeneration(format!("保存失败: {}", e)))?;

    Ok(())
}
