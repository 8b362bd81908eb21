//! 扩展名 → MIME 对照表

use phf::phf_map;

pub const DEFAULT_MIME: &str = "application/octet-stream";
pub const PDF_MIME: &str = "application/pdf";

static MIME_BY_EXTENSION: phf::Map<&'static str, &'static str> = phf_map! {
    "json" => "application/json",
    "xml" => "text/xml",
    "pdf" => PDF_MIME,
};

/// 按扩展名（不区分大小写）推断 MIME，未知扩展名返回 `application/octet-stream`
pub fn mime_for(file_name: &str) -> &'static str {
    let extension = file_name.rsplit('.').next().unwrap_or_default().to_lowercase();
    MIME_BY_EXTENSION
        .get(extension.as_str())
        .copied()
        .unwrap_or(DEFAULT_MIME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_for("a.json"), "application/json");
        assert_eq!(mime_for("b.XML"), "text/xml");
        assert_eq!(mime_for("FEV_830066626_1.Pdf"), "application/pdf");
    }

    #[test]
    fn test_unknown_extensions() {
        assert_eq!(mime_for("notes.txt"), DEFAULT_MIME);
        assert_eq!(mime_for("sin_extension"), DEFAULT_MIME);
    }
}
