//! 列名别名匹配
//!
//! 每个逻辑字段维护一组按优先级排列的候选列名，
//! 大小写敏感的精确匹配；按行取值时先命中的非空值生效。

/// 商家ID
pub const POI_ID_ALIASES: &[&str] = &["wm_poi_id", "poi_id", "id", "shop_id", "商家ID"];

/// 商家名称
pub const MERCHANT_NAME_ALIASES: &[&str] = &[
    "wm_poi_name",
    "poi_name",
    "shop_name",
    "name",
    "商家名称",
    "店铺名称",
];

/// 实际地址（address模式）
pub const REAL_ADDRESS_ALIASES: &[&str] = &["poi_address", "real_address", "address", "实际地址"];

/// 推荐商圈（address模式）
pub const RECOMMENDED_ADDRESS_ALIASES: &[&str] = &[
    "address_region_name",
    "recommended_address",
    "region",
    "推荐地址",
];

/// 菜品ID（dish模式）
pub const SPU_ID_ALIASES: &[&str] = &["spu_id", "dish_id", "菜品ID"];

/// 菜品名称（dish模式）
pub const SPU_NAME_ALIASES: &[&str] = &["spu_name", "dish_name", "菜品名称", "上新菜品"];

/// 推荐菜品（dish模式）
pub const RECOMMEND_DISH_ALIASES: &[&str] = &["recommend_dish_name", "rec_dish", "推荐菜品", "灵感来源"];

/// 在一行内按别名优先级取第一个非空值
pub fn find_value(headers: &[String], row: &[String], aliases: &[&str]) -> Option<String> {
    for alias in aliases {
        if let Some(idx) = headers.iter().position(|h| h == alias) {
            if let Some(value) = row.get(idx) {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}
