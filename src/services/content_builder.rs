//! 回答内容重建 - 业务能力层
//!
//! 回答片段脱离原页面后，其中的相对链接、图片地址只能相对原页面解析。
//! 这里基于页面的只读快照（`PageContext`）把片段重新序列化为一份独立的 HTML，
//! 所有相对地址都改写为原页面会解析到的绝对地址。
//!
//! 问题页面在首次获取后只读：抽取过程中从不修改 `Document`，只读取快照。

use crate::infrastructure::Document;
use scraper::{ElementRef, Html, Node};
use url::Url;

static_selector!(STYLESHEETS, r#"link[rel="stylesheet"][href]"#);
static_selector!(EDITABLE_CONTENT, "div.zm-editable-content");

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// 解析器把内容保存为一个原始文本节点的元素，序列化时不能再转义
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// 需要改写为绝对地址的属性
const URL_ATTRIBUTES: &[&str] = &["href", "src", "data-actualsrc", "data-original"];

/// 问题页面的只读快照
///
/// 每次抽取调用只取一次，之后所有片段（页面内嵌的和"更多"接口返回的）共用
#[derive(Debug, Clone)]
pub struct PageContext {
    base: Url,
    stylesheets: Vec<String>,
}

impl PageContext {
    pub fn snapshot(doc: &Document) -> Self {
        let base = doc.base_url();
        let stylesheets = doc
            .html()
            .select(&STYLESHEETS)
            .filter_map(|link| link.value().attr("href"))
            .filter_map(|href| base.join(href.trim()).ok())
            .map(|url| url.to_string())
            .collect();
        Self { base, stylesheets }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// 按原页面的规则解析引用；锚点、脚本等非资源引用返回 `None`
    pub fn resolve(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty()
            || reference.starts_with('#')
            || reference.starts_with("javascript:")
            || reference.starts_with("mailto:")
            || reference.starts_with("data:")
        {
            return None;
        }
        self.base.join(reference).ok().map(|url| url.to_string())
    }
}

/// 把回答片段重建为独立 HTML
pub fn rebuild_content(fragment: ElementRef<'_>, ctx: &PageContext) -> String {
    let root = fragment.select(&EDITABLE_CONTENT).next().unwrap_or(fragment);

    let mut out = String::from("<html><head><meta charset=\"utf-8\">");
    out.push_str("<base href=\"");
    out.push_str(&escape_attr(ctx.base.as_str()));
    out.push_str("\">");
    for href in &ctx.stylesheets {
        out.push_str("<link rel=\"stylesheet\" href=\"");
        out.push_str(&escape_attr(href));
        out.push_str("\">");
    }
    out.push_str("</head><body>");
    write_children(root, ctx, &mut out);
    out.push_str("</body></html>");
    out
}

fn write_children(element: ElementRef<'_>, ctx: &PageContext, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            write_element(child_element, ctx, out);
        } else if let Node::Text(text) = child.value() {
            out.push_str(&escape_text(&text.text));
        }
    }
}

fn write_element(element: ElementRef<'_>, ctx: &PageContext, out: &mut String) {
    let name = element.value().name();
    if name == "script" {
        return;
    }

    out.push('<');
    out.push_str(name);
    for (attr, value) in element.value().attrs() {
        let value = if URL_ATTRIBUTES.contains(&attr) {
            ctx.resolve(value).unwrap_or_else(|| value.to_string())
        } else {
            value.to_string()
        };
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&escape_attr(&value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }
    let has_elements = element.children().any(|child| child.value().is_element());
    if name == "noscript" && !has_elements {
        // 懒加载图片的原图放在 noscript 里，重新解析后同样改写地址
        let inner = Html::parse_fragment(&element.text().collect::<String>());
        write_children(inner.root_element(), ctx, out);
    } else if RAW_TEXT_ELEMENTS.contains(&name) && !has_elements {
        out.push_str(&element.text().collect::<String>());
    } else {
        write_children(element, ctx, out);
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    const PAGE: &str = r##"<html><head>
        <link rel="stylesheet" href="/css/main.css">
        </head><body>
        <div class="zm-item-answer">
          <div class="zm-editable-content">
            看<a href="../topic/19550517">这个话题</a>和<a href="#ref">注释</a>
            <img src="//pic1.zhimg.com/abc.jpg" data-actualsrc="img/full.jpg">
            <script>alert(1)</script>
            <p>1 &lt; 2 &amp; 3</p>
            <noscript><img src="/a.png"></noscript>
            <style>p > a { color: red; }</style>
          </div>
        </div>
        </body></html>"##;

    fn page() -> Document {
        Document::parse(
            Url::parse("https://www.zhihu.com/question/23759686").unwrap(),
            PAGE,
        )
    }

    fn rebuilt() -> String {
        let doc = page();
        let ctx = PageContext::snapshot(&doc);
        let selector = Selector::parse("div.zm-item-answer").unwrap();
        let fragment = doc.html().select(&selector).next().unwrap();
        rebuild_content(fragment, &ctx)
    }

    #[test]
    fn relative_references_resolve_like_the_page() {
        let doc = page();
        let content = rebuilt();
        let reparsed = Html::parse_document(&content);
        let anchors = Selector::parse("a[href]").unwrap();
        let hrefs: Vec<&str> = reparsed
            .select(&anchors)
            .filter_map(|a| a.value().attr("href"))
            .collect();
        let expected = doc.base_url().join("../topic/19550517").unwrap();
        assert_eq!(hrefs[0], expected.as_str());
        assert_eq!(hrefs[1], "#ref");

        let images = Selector::parse("img").unwrap();
        let img = reparsed.select(&images).next().unwrap();
        assert_eq!(img.value().attr("src"), Some("https://pic1.zhimg.com/abc.jpg"));
        assert_eq!(
            img.value().attr("data-actualsrc"),
            Some("https://www.zhihu.com/question/img/full.jpg")
        );
    }

    #[test]
    fn content_is_standalone_document() {
        let content = rebuilt();
        assert!(content.starts_with("<html><head>"));
        assert!(content.contains(r#"<base href="https://www.zhihu.com/question/23759686">"#));
        assert!(content.contains(r#"href="https://www.zhihu.com/css/main.css""#));
        assert!(!content.contains("<script"));
        assert!(content.contains("1 &lt; 2 &amp; 3"));
        assert!(!content.contains("zm-editable-content"));
    }

    #[test]
    fn noscript_images_survive_rebuild() {
        let content = rebuilt();
        assert!(!content.contains("&lt;img"));
        assert!(content.contains("p > a { color: red; }"));

        let reparsed = Html::parse_document(&content);
        let noscript = Selector::parse("noscript").unwrap();
        let inner: String = reparsed
            .select(&noscript)
            .next()
            .unwrap()
            .text()
            .collect();
        assert_eq!(
            inner,
            r#"<img src="https://www.zhihu.com/a.png">"#
        );
    }
}
