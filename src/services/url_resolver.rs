//! PDF 地址查找
//!
//! 在任意 JSON 结构中深度优先查找键名为 `urlpdf`（不区分大小写）的非空字符串

use serde_json::Value;

/// 键名（小写）
const URL_PDF_KEY: &str = "urlpdf";

/// 递归深度上限。解析出来的 JSON 不会有环，这里只防止异常深的嵌套
const MAX_DEPTH: usize = 128;

/// 查找 PDF 地址
///
/// 对象按成员原始顺序遍历：键名匹配且值为非空字符串时直接返回，
/// 否则继续深入该成员的值；数组按下标顺序遍历。
///
/// # 返回
/// 任何深度都找不到时返回 `None`，标量输入同样返回 `None`
pub fn find_pdf_url(value: &Value) -> Option<&str> {
    search(value, 0)
}

fn search(value: &Value, depth: usize) -> Option<&str> {
    if depth > MAX_DEPTH {
        return None;
    }

    match value {
        Value::Object(map) => map.iter().find_map(|(key, member)| {
            if key.to_lowercase() == URL_PDF_KEY {
                if let Some(url) = member.as_str().filter(|s| !s.is_empty()) {
                    return Some(url);
                }
            }
            search(member, depth + 1)
        }),
        Value::Array(items) => items.iter().find_map(|item| search(item, depth + 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_key_any_case() {
        assert_eq!(find_pdf_url(&json!({"UrlPdf": "https://x/y.pdf"})), Some("https://x/y.pdf"));
        assert_eq!(find_pdf_url(&json!({"URLPDF": "a"})), Some("a"));
        assert_eq!(find_pdf_url(&json!({"urlpdf": "b"})), Some("b"));
    }

    #[test]
    fn test_nested_in_arrays_and_objects() {
        let doc = json!({
            "ResultadoOperacion": {
                "Documentos": [
                    {"Id": 1},
                    {"Detalle": {"urlPdf": "https://x/nested.pdf"}}
                ]
            }
        });
        assert_eq!(find_pdf_url(&doc), Some("https://x/nested.pdf"));
    }

    #[test]
    fn test_empty_value_is_skipped() {
        let doc = json!({"UrlPdf": "", "Otro": {"urlpdf": "https://x/second.pdf"}});
        assert_eq!(find_pdf_url(&doc), Some("https://x/second.pdf"));

        assert_eq!(find_pdf_url(&json!({"UrlPdf": null})), None);
    }

    #[test]
    fn test_member_order_is_respected() {
        let doc: Value = serde_json::from_str(
            r#"{"b": {"UrlPdf": "first"}, "a": {"UrlPdf": "second"}}"#,
        )
        .unwrap();
        assert_eq!(find_pdf_url(&doc), Some("first"));
    }

    #[test]
    fn test_missing_key_and_scalars() {
        assert_eq!(find_pdf_url(&json!({"UrlXml": "https://x/y.xml"})), None);
        assert_eq!(find_pdf_url(&json!("urlpdf")), None);
        assert_eq!(find_pdf_url(&json!(42)), None);
        assert_eq!(find_pdf_url(&json!([])), None);
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut doc = json!({"UrlPdf": "too-deep"});
        for _ in 0..(MAX_DEPTH + 10) {
            doc = json!([doc]);
        }
        assert_eq!(find_pdf_url(&doc), None);
    }
}
