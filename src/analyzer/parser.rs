//! 网关响应解析器
//!
//! 从模型返回的文本中提取JSON对象，并按模式解析为判定结果。
//! 缺少必填字段、置信度越界、非JSON响应均视为解析失败，
//! 由引擎按"本次尝试失败"统一处理。

use super::types::{AddressVerdict, AnalysisMode, DishVerdict, Verdict};
use crate::error::{ConsistencyError, Result};

/// 从响应文本中提取JSON对象部分
///
/// 提取优先级:
/// 1. ```json ... ``` 代码块
/// 2. 裸的 {...} 对象
/// 3. 解析失败
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` 代码块优先
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" 的长度
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 裸的 {...}
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(ConsistencyError::ApiParse("响应中未找到JSON对象".into()))
}

/// 按模式解析判定结果
pub fn parse_verdict(mode: AnalysisMode, response: &str) -> Result<Verdict> {
    let json_str = extract_json(response)?;

    let verdict = match mode {
        AnalysisMode::Address => {
            let verdict: AddressVerdict = serde_json::from_str(json_str.trim())
                .map_err(|e| ConsistencyError::ApiParse(format!("地址判定JSON解析错误: {}", e)))?;
            Verdict::Address(verdict)
        }
        AnalysisMode::Dish => {
            let verdict: DishVerdict = serde_json::from_str(json_str.trim())
                .map_err(|e| ConsistencyError::ApiParse(format!("菜品判定JSON解析错误: {}", e)))?;
            Verdict::Dish(verdict)
        }
    };

    if verdict.confidence_score() > 100 {
        return Err(ConsistencyError::ApiParse(format!(
            "置信度越界: {}",
            verdict.confidence_score()
        )));
    }

    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_with_block() {
        let response = r#"Here is my analysis:
```json
{"isMatch": true, "confidenceScore": 90, "reasoning": "一致"}
```
Some trailing text."#;

        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.contains("isMatch"));
    }

    #[test]
    fn test_extract_json_raw_object() {
        let response = r#"{"isMatch": false, "confidenceScore": 70, "reasoning": "不一致"}"#;
        let json = extract_json(response).unwrap();
        assert_eq!(json, response);
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = r#"结论如下: {"isMatch": true, "confidenceScore": 80, "reasoning": "x"} 以上。"#;
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{') && json.ends_with('}'));
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("No JSON here, just plain text.");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_address_verdict() {
        let response = r#"```json
{
  "isMatch": true,
  "realAddressDistrict": "望京",
  "recommendedAddressDistrict": "望京",
  "confidenceScore": 92,
  "reasoning": "实际地址位于望京商圈内",
  "distanceNote": "距商圈中心约500米"
}
```"#;

        let verdict = parse_verdict(AnalysisMode::Address, response).unwrap();
        match verdict {
            Verdict::Address(v) => {
                assert!(v.is_match);
                assert_eq!(v.real_address_district, "望京");
                assert_eq!(v.confidence_score, 92);
                assert_eq!(v.distance_note.as_deref(), Some("距商圈中心约500米"));
            }
            Verdict::Dish(_) => panic!("期望地址判定结果"),
        }
    }

    #[test]
    fn test_parse_dish_verdict() {
        let response = r#"{"isMatch": false, "confidenceScore": 88, "reasoning": "美式咖啡是咖啡店的基础款"}"#;

        let verdict = parse_verdict(AnalysisMode::Dish, response).unwrap();
        match verdict {
            Verdict::Dish(v) => {
                assert!(!v.is_match);
                assert_eq!(v.confidence_score, 88);
            }
            Verdict::Address(_) => panic!("期望菜品判定结果"),
        }
    }

    #[test]
    fn test_parse_verdict_missing_field() {
        // 地址模式缺少 realAddressDistrict
        let response = r#"{"isMatch": true, "confidenceScore": 90, "reasoning": "x"}"#;
        let result = parse_verdict(AnalysisMode::Address, response);
        assert!(matches!(result, Err(ConsistencyError::ApiParse(_))));
    }

    #[test]
    fn test_parse_verdict_confidence_out_of_range() {
        let response = r#"{"isMatch": true, "confidenceScore": 150, "reasoning": "x"}"#;
        let result = parse_verdict(AnalysisMode::Dish, response);
        assert!(matches!(result, Err(ConsistencyError::ApiParse(_))));
    }

    #[test]
    fn test_parse_verdict_non_json() {
        let result = parse_verdict(AnalysisMode::Dish, "抱歉，我无法判断。");
        assert!(result.is_err());
    }
}
