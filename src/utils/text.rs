//! 文本处理工具
//!
//! 页面上的文本不是调用方能控制的契约，这里的函数都尽力解析，失败时返回默认值

use regex::Regex;
use std::sync::LazyLock;

/// 站点根地址，用于补全相对链接
pub const ZHIHU_HOST: &str = "https://www.zhihu.com";

static QUESTION_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://www\.zhihu\.com/question/(\d+)/?$").expect("问题链接正则无效")
});

/// 去掉首尾空白
pub fn strip(text: &str) -> String {
    text.trim().to_string()
}

/// 从问题链接中取出数字 id，链接不合法时为 `None`，例如 `https://www.zhihu.com/question/23759686` → 23759686
pub fn question_token(link: &str) -> Option<u64> {
    QUESTION_URL
        .captures(link)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// 把站内相对链接补全为绝对链接，空链接保持为空
pub fn make_zhihu_link(href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        String::new()
    } else if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else if href.starts_with('/') {
        format!("{}{}", ZHIHU_HOST, href)
    } else {
        format!("{}/{}", ZHIHU_HOST, href)
    }
}

/// 解析整数，失败或缺失时返回 0
pub fn parse_int(text: Option<&str>) -> u32 {
    text.and_then(|t| t.trim().parse().ok()).unwrap_or(0)
}

/// 解析赞同数
///
/// 支持 `k`（×1000）与 `w` / `万`（×10000）后缀，无法解析时返回 0
pub fn parse_vote_count(text: &str) -> u64 {
    let text = text.trim().replace(',', "");
    if text.is_empty() {
        return 0;
    }

    let (number, multiplier) = if let Some(n) = text.strip_suffix(|c: char| c == 'k' || c == 'K') {
        (n.trim(), 1_000u64)
    } else if let Some(n) = text.strip_suffix(|c: char| c == 'w' || c == 'W' || c == '万') {
        (n.trim(), 10_000u64)
    } else {
        (text.as_str(), 1u64)
    };

    if let Ok(n) = number.parse::<u64>() {
        return n.saturating_mul(multiplier);
    }
    if multiplier > 1 {
        if let Ok(f) = number.parse::<f64>() {
            if f.is_finite() && f >= 0.0 {
                return (f * multiplier as f64).round() as u64;
            }
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_count_plain_and_suffixed() {
        assert_eq!(parse_vote_count("42"), 42);
        assert_eq!(parse_vote_count(" 12K "), 12_000);
        assert_eq!(parse_vote_count("1.5k"), 1_500);
        assert_eq!(parse_vote_count("3万"), 30_000);
        assert_eq!(parse_vote_count("1,024"), 1_024);
    }

    #[test]
    fn vote_count_garbage_is_zero() {
        assert_eq!(parse_vote_count(""), 0);
        assert_eq!(parse_vote_count("赞同"), 0);
        assert_eq!(parse_vote_count("k"), 0);
        assert_eq!(parse_vote_count("-5"), 0);
        assert_eq!(parse_vote_count("1.5"), 0);
    }

    #[test]
    fn question_url_validation() {
        assert_eq!(question_token("http://www.zhihu.com/question/23759686/"), Some(23759686));
        assert_eq!(question_token("https://www.zhihu.com/people/someone"), None);
        assert_eq!(question_token("https://www.zhihu.com/question/abc"), None);
        assert_eq!(question_token("https://www.zhihu.com/question/23759686"), Some(23759686));
        assert_eq!(question_token("nonsense"), None);
    }

    #[test]
    fn zhihu_links() {
        assert_eq!(make_zhihu_link(""), "");
        assert_eq!(make_zhihu_link("/people/abc"), "https://www.zhihu.com/people/abc");
        assert_eq!(make_zhihu_link("https://zhuanlan.zhihu.com/p/1"), "https://zhuanlan.zhihu.com/p/1");
        assert_eq!(make_zhihu_link("//pic1.zhimg.com/a.jpg"), "https://pic1.zhimg.com/a.jpg");
    }

    #[test]
    fn int_defaults_to_zero() {
        assert_eq!(parse_int(Some(" 17 ")), 17);
        assert_eq!(parse_int(Some("many")), 0);
        assert_eq!(parse_int(None), 0);
    }
}
