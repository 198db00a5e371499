//! 已解析的页面文档 - 基础设施层
//!
//! 页面在首次获取后只读，所有查询都通过这里进行

use scraper::{ElementRef, Html, Selector};
use url::Url;

static_selector!(BASE_HREF, "base[href]");

/// 已解析、可查询的页面
pub struct Document {
    url: Url,
    html: Html,
}

impl Document {
    /// 解析完整页面
    pub fn parse(url: Url, source: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(source),
        }
    }

    /// 页面地址
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// 相对链接的解析基准：有 `<base href>` 时以它为准，否则为页面地址
    pub fn base_url(&self) -> Url {
        self.html
            .select(&BASE_HREF)
            .next()
            .and_then(|base| base.value().attr("href"))
            .and_then(|href| self.url.join(href.trim()).ok())
            .unwrap_or_else(|| self.url.clone())
    }

    /// 第一个匹配节点
    pub fn first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// 第一个匹配节点的文本（去掉首尾空白），没有匹配时为空串
    pub fn first_text(&self, selector: &Selector) -> String {
        self.first(selector)
            .map(|el| element_text(&el))
            .unwrap_or_default()
    }

    /// 第一个匹配节点的属性值
    pub fn first_attr(&self, selector: &Selector, attr: &str) -> Option<&str> {
        self.first(selector).and_then(|el| el.value().attr(attr))
    }

    /// 所有匹配节点的文本
    pub fn all_texts(&self, selector: &Selector) -> Vec<String> {
        self.html
            .select(selector)
            .map(|el| element_text(&el))
            .collect()
    }
}

/// 节点下全部文本拼接后去掉首尾空白
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://www.zhihu.com/question/23759686").unwrap()
    }

    #[test]
    fn base_url_defaults_to_page_url() {
        let doc = Document::parse(url(), "<html><body><p>hi</p></body></html>");
        assert_eq!(doc.base_url(), url());
    }

    #[test]
    fn base_url_honours_base_tag() {
        let doc = Document::parse(
            url(),
            r#"<html><head><base href="/static/"></head><body></body></html>"#,
        );
        assert_eq!(doc.base_url().as_str(), "https://www.zhihu.com/static/");
    }

    #[test]
    fn queries_trim_text() {
        let doc = Document::parse(
            url(),
            r#"<html><body><a class="tag"> Rust </a><a class="tag">
            编程 </a></body></html>"#,
        );
        let selector = Selector::parse("a.tag").unwrap();
        assert_eq!(doc.first_text(&selector), "Rust");
        assert_eq!(doc.all_texts(&selector), vec!["Rust", "编程"]);
        assert_eq!(doc.first_attr(&selector, "class"), Some("tag"));
    }
}
