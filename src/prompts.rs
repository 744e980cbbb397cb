//! 提示词生成模块
//!
//! 按核验模式构建网关请求的system/user提示词：
//! - ADDRESS_SYSTEM_PROMPT: 地址一致性判定
//! - DISH_SYSTEM_PROMPT: 菜品一致性判定
//!
//! 两类提示词都要求模型只输出一个纯JSON对象，便于下游解析。

use crate::analyzer::ItemPayload;

/// 地址一致性判定的system提示词
pub const ADDRESS_SYSTEM_PROMPT: &str = r#"You are an expert in Chinese commercial geography and business district (商圈) boundary analysis.

**CRITICAL OUTPUT RULE**: You MUST respond with a pure, valid JSON object. Do not add any markdown formatting or explanatory text outside the JSON.

The JSON structure must be:
{
  "isMatch": boolean,
  "realAddressDistrict": "string (the district identified for address 1)",
  "recommendedAddressDistrict": "string (the district identified for address 2)",
  "confidenceScore": number (0-100),
  "reasoning": "string (concise explanation in Chinese)",
  "distanceNote": "string (optional note on proximity)"
}

**Context Assumption**: We have already verified that both inputs belong to the same Province, City, and Administrative District.

**Judgment Logic**:
1. **Analyze Location**: pinpoint the specific coordinates/area of the Real Address.
2. **Analyze Target**: Define the generally accepted commercial boundaries of the Recommended District.
3. **Inclusion Check**:
   - **MATCH (True)**: The Real Address is geographically INSIDE the Recommended District OR represents the same functional commercial area.
   - **MISMATCH (False)**: The Real Address is in a clearly DIFFERENT business district.
"#;

/// 菜品一致性判定的system提示词
pub const DISH_SYSTEM_PROMPT: &str = r#"You are an expert culinary data analyst and menu consultant.

**CRITICAL OUTPUT RULE**: You MUST respond with a pure, valid JSON object. Do not add any markdown formatting or explanatory text outside the JSON.

The JSON structure must be:
{
  "isMatch": boolean,
  "confidenceScore": number (0-100),
  "reasoning": "string (concise explanation in Chinese)"
}

**CRITICAL RULE: CONTEXT-AWARE STAPLE EXCLUSION**
You must judge whether the dish is a "Generic Staple" **relative to this specific Merchant's category**.

1. **Identify Shop Category**: Infer the shop's main category from the Merchant Name.
2. **Generic Staple (Mismatch Condition)**:
   - A dish is a "Generic Staple" ONLY if it is the **mandatory infrastructure** or **category definition** that the shop CANNOT exist without.
   - Example: "Americano" in a "Coffee Shop" -> Generic (False).
   - Example: "Plain Rice" in a "Chinese Restaurant" -> Generic (False).
3. **Valid Inspiration (Match Condition)**:
   - **Flavor/Ingredient Adoption**: If the recommended dish features a specific **innovative flavor** (e.g., Osmanthus, Truffle) or **key ingredient** and the actual dish **adopts this specific element**, it is a MATCH.
   - **Specific Dishes**: Specific, non-infrastructure dishes.
"#;

/// 地址模式的user提示词
pub fn build_address_user_prompt(real_address: &str, recommended_address: &str) -> String {
    format!(
        r#"Task: Analyze address consistency.

Real Shop Address: "{}"
Recommended Business District: "{}"
"#,
        real_address, recommended_address
    )
}

/// 菜品模式的user提示词
pub fn build_dish_user_prompt(
    spu_name: &str,
    recommend_dish_name: &str,
    merchant_name: &str,
) -> String {
    format!(
        r#"Task: Determine if the "Actual Dish Name" is a result of specific inspiration from the "Recommended Dish Name".

Merchant Name: "{}"
Actual Dish Name (SPU Name): "{}"
Recommended Dish Name (Source): "{}"
"#,
        merchant_name, spu_name, recommend_dish_name
    )
}

/// 按载荷构建 (system, user) 提示词对
pub fn build_prompts(payload: &ItemPayload) -> (&'static str, String) {
    match payload {
        ItemPayload::Address {
            real_address,
            recommended_address,
            ..
        } => (
            ADDRESS_SYSTEM_PROMPT,
            build_address_user_prompt(real_address, recommended_address),
        ),
        ItemPayload::Dish {
            spu_name,
            recommend_dish_name,
            merchant_name,
            ..
        } => (
            DISH_SYSTEM_PROMPT,
            build_dish_user_prompt(spu_name, recommend_dish_name, merchant_name),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_address_user_prompt() {
        let prompt = build_address_user_prompt("朝阳区望京SOHO T1", "望京");
        assert!(prompt.contains("朝阳区望京SOHO T1"));
        assert!(prompt.contains("望京"));
        assert!(prompt.contains("address consistency"));
    }

    #[test]
    fn test_build_dish_user_prompt() {
        let prompt = build_dish_user_prompt("桂花拿铁", "桂花乌龙", "星巴克");
        assert!(prompt.contains("桂花拿铁"));
        assert!(prompt.contains("桂花乌龙"));
        assert!(prompt.contains("星巴克"));
    }

    #[test]
    fn test_system_prompts_require_json_only() {
        assert!(ADDRESS_SYSTEM_PROMPT.contains("pure, valid JSON object"));
        assert!(DISH_SYSTEM_PROMPT.contains("pure, valid JSON object"));
        assert!(ADDRESS_SYSTEM_PROMPT.contains("confidenceScore"));
        assert!(DISH_SYSTEM_PROMPT.contains("isMatch"));
    }

    #[test]
    fn test_build_prompts_selects_by_mode() {
        let payload = ItemPayload::Dish {
            spu_id: "1".into(),
            merchant_name: "茶百道".into(),
            spu_name: "杨枝甘露".into(),
            recommend_dish_name: "芒果捞".into(),
        };
        let (system, user) = build_prompts(&payload);
        assert!(system.contains("culinary"));
        assert!(user.contains("杨枝甘露"));
    }
}
