//! Excel导入（记录归一化）
//!
//! 只读第一个工作表，表头行驱动列识别（别名见 alias.rs）。
//! 活动模式下两个载荷字段均为空的行静默丢弃；
//! 单个字段缺失补"N/A"哨兵值，避免下游出现歧义的空单元格。

pub mod alias;

use crate::analyzer::{AnalysisMode, ItemPayload, WorkItem};
use crate::error::{ConsistencyError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// 缺失字段的可见哨兵值
pub const NA: &str = "N/A";

/// 读取Excel并归一化为工作项列表
///
/// 文件不可解析立即报错，不会启动批次；
/// 一条可用数据都没有时报 NoRowsFound。
pub fn import_work_items(path: &Path, mode: AnalysisMode) -> Result<Vec<WorkItem>> {
    if !path.exists() {
        return Err(ConsistencyError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ConsistencyError::ExcelRead(format!("{}: {}", path.display(), e)))?;

    // 只读第一个sheet
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConsistencyError::ExcelRead("工作簿中没有工作表".into()))?
        .map_err(|e| ConsistencyError::ExcelRead(format!("{}", e)))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    let items = items_from_rows(&rows, mode);
    if items.is_empty() {
        return Err(ConsistencyError::NoRowsFound(path.display().to_string()));
    }

    Ok(items)
}

/// 表头 + 数据行 → 工作项（纯函数，便于测试）
///
/// 第一行视为表头；数据行号从1开始，与工作项id对应。
pub fn items_from_rows(rows: &[Vec<String>], mode: AnalysisMode) -> Vec<WorkItem> {
    let Some((headers, data_rows)) = rows.split_first() else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for (idx, row) in data_rows.iter().enumerate() {
        let row_no = idx + 1;
        if let Some(payload) = payload_from_row(headers, row, mode, row_no) {
            items.push(WorkItem::new(row_no, payload));
        }
    }
    items
}

fn payload_from_row(
    headers: &[String],
    row: &[String],
    mode: AnalysisMode,
    row_no: usize,
) -> Option<ItemPayload> {
    match mode {
        AnalysisMode::Address => {
            let real = alias::find_value(headers, row, alias::REAL_ADDRESS_ALIASES);
            let recommended = alias::find_value(headers, row, alias::RECOMMENDED_ADDRESS_ALIASES);

            // 两个载荷字段都为空：整行丢弃
            if real.is_none() && recommended.is_none() {
                return None;
            }

            Some(ItemPayload::Address {
                poi_id: alias::find_value(headers, row, alias::POI_ID_ALIASES)
                    .unwrap_or_else(|| format!("ID-{}", row_no)),
                merchant_name: alias::find_value(headers, row, alias::MERCHANT_NAME_ALIASES)
                    .unwrap_or_else(|| format!("Shop {}", row_no)),
                real_address: real.unwrap_or_else(|| NA.into()),
                recommended_address: recommended.unwrap_or_else(|| NA.into()),
            })
        }
        AnalysisMode::Dish => {
            let spu_name = alias::find_value(headers, row, alias::SPU_NAME_ALIASES);
            let recommend = alias::find_value(headers, row, alias::RECOMMEND_DISH_ALIASES);

            if spu_name.is_none() && recommend.is_none() {
                return None;
            }

            Some(ItemPayload::Dish {
                spu_id: alias::find_value(headers, row, alias::SPU_ID_ALIASES)
                    .unwrap_or_else(|| format!("SPU-{}", row_no)),
                merchant_name: alias::find_value(headers, row, alias::MERCHANT_NAME_ALIASES)
                    .unwrap_or_else(|| format!("Shop {}", row_no)),
                spu_name: spu_name.unwrap_or_else(|| NA.into()),
                recommend_dish_name: recommend.unwrap_or_else(|| NA.into()),
            })
        }
    }
}

/// 单元格转字符串；整数型浮点去掉小数点（商家ID常被Excel存成数字）
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisStatus;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_items_from_rows_address_mode() {
        let rows = rows(&[
            &["wm_poi_id", "wm_poi_name", "poi_address", "address_region_name"],
            &["1001", "老王烧烤", "朝阳区望京SOHO T1", "望京"],
            &["1002", "小李米线", "海淀区中关村大街1号", "中关村"],
        ]);

        let items = items_from_rows(&rows, AnalysisMode::Address);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "row-1");
        assert_eq!(items[0].status, AnalysisStatus::Pending);

        match &items[0].payload {
            ItemPayload::Address {
                poi_id,
                merchant_name,
                real_address,
                recommended_address,
            } => {
                assert_eq!(poi_id, "1001");
                assert_eq!(merchant_name, "老王烧烤");
                assert_eq!(real_address, "朝阳区望京SOHO T1");
                assert_eq!(recommended_address, "望京");
            }
            _ => panic!("期望address载荷"),
        }
    }

    #[test]
    fn test_items_from_rows_drops_blank_payload_rows() {
        let rows = rows(&[
            &["poi_address", "address_region_name", "wm_poi_name"],
            &["", "", "只有名字没有地址"],
            &["北京路1号", "", "有地址"],
        ]);

        let items = items_from_rows(&rows, AnalysisMode::Address);
        // 第一行两个载荷字段均空，静默丢弃
        assert_eq!(items.len(), 1);
        match &items[0].payload {
            ItemPayload::Address {
                real_address,
                recommended_address,
                ..
            } => {
                assert_eq!(real_address, "北京路1号");
                assert_eq!(recommended_address, NA);
            }
            _ => panic!("期望address载荷"),
        }
    }

    #[test]
    fn test_items_from_rows_fills_na_sentinel() {
        let rows = rows(&[
            &["address_region_name"],
            &["望京"],
        ]);

        let items = items_from_rows(&rows, AnalysisMode::Address);
        assert_eq!(items.len(), 1);
        match &items[0].payload {
            ItemPayload::Address {
                poi_id,
                merchant_name,
                real_address,
                ..
            } => {
                assert_eq!(real_address, NA);
                // 缺失的ID和名称生成可读的占位值
                assert_eq!(poi_id, "ID-1");
                assert_eq!(merchant_name, "Shop 1");
            }
            _ => panic!("期望address载荷"),
        }
    }

    #[test]
    fn test_items_from_rows_dish_mode() {
        let rows = rows(&[
            &["spu_id", "商家名称", "spu_name", "recommend_dish_name"],
            &["8001", "茶百道", "杨枝甘露", "芒果捞"],
            &["8002", "瑞幸", "", ""],
        ]);

        let items = items_from_rows(&rows, AnalysisMode::Dish);
        assert_eq!(items.len(), 1);
        match &items[0].payload {
            ItemPayload::Dish {
                spu_id,
                merchant_name,
                spu_name,
                recommend_dish_name,
            } => {
                assert_eq!(spu_id, "8001");
                assert_eq!(merchant_name, "茶百道");
                assert_eq!(spu_name, "杨枝甘露");
                assert_eq!(recommend_dish_name, "芒果捞");
            }
            _ => panic!("期望dish载荷"),
        }
    }

    #[test]
    fn test_items_from_rows_empty_input() {
        assert!(items_from_rows(&[], AnalysisMode::Address).is_empty());
        // 只有表头没有数据
        let rows = rows(&[&["poi_address"]]);
        assert!(items_from_rows(&rows, AnalysisMode::Address).is_empty());
    }

    #[test]
    fn test_cell_to_string_numeric_id() {
        assert_eq!(cell_to_string(&Data::Float(1001.0)), "1001");
        assert_eq!(cell_to_string(&Data::Float(3.5)), "3.5");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("  望京  ".into())), "望京");
    }
}
