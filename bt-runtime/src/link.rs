//! # Link 模块
//!
//! 书籍链接的快照类型与拦截资格判定。
//!
//! ## 设计说明
//!
//! - `LinkSnapshot` 是 Host 在点击（或扫描）时刻对锚点元素的只读捕获
//! - 资格规则与 Host 环境无关：只看 `href` 字符串本身
//! - 不符合资格不是错误，而是"放行"：Host 让浏览器执行默认导航

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// 可被拦截的文档后缀
pub const DOC_SUFFIX: &str = ".html";

/// 书籍链接快照
///
/// Host 捕获的字段：
/// - `href`：锚点的原始 `href` 属性
/// - `rect`：点击时刻的包围盒（克隆元素的初始几何）
/// - `color`：`--book-color` 自定义属性的原始值（可能缺失）
/// - `spine_label`：书脊文字内容（可能缺失）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    /// 锚点 `href` 属性
    pub href: String,
    /// 点击时刻的包围盒
    pub rect: Rect,
    /// `--book-color` 自定义属性原始值
    pub color: Option<String>,
    /// 书脊文字
    pub spine_label: Option<String>,
}

impl LinkSnapshot {
    /// 创建链接快照
    pub fn new(href: impl Into<String>, rect: Rect) -> Self {
        Self {
            href: href.into(),
            rect,
            color: None,
            spine_label: None,
        }
    }

    /// 设置显示颜色
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// 设置书脊文字
    pub fn with_spine_label(mut self, label: impl Into<String>) -> Self {
        self.spine_label = Some(label.into());
        self
    }
}

/// 链接不符合拦截资格的原因
///
/// 这些都不是错误：点击处理按默认导航放行，诊断工具用它们生成报告。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disqualification {
    /// `href` 为空
    EmptyHref,
    /// 绝对 URL（`http`/`https` 开头）
    AbsoluteUrl,
    /// `mailto:` 链接
    MailtoScheme,
    /// 页内锚点（`#` 开头）
    FragmentOnly,
    /// 不以识别的文档后缀结尾
    WrongSuffix,
}

impl std::fmt::Display for Disqualification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyHref => write!(f, "href 为空"),
            Self::AbsoluteUrl => write!(f, "绝对 URL（外部链接）"),
            Self::MailtoScheme => write!(f, "mailto: 链接"),
            Self::FragmentOnly => write!(f, "页内锚点"),
            Self::WrongSuffix => write!(f, "不以 {} 结尾", DOC_SUFFIX),
        }
    }
}

/// 判定 `href` 是否符合拦截资格
///
/// 检查顺序与原始实现保持一致：空值、绝对 URL、`mailto:`、
/// 页内锚点、文档后缀。协议相对链接（`//host/x.html`）不在
/// 排除之列，会被拦截；`shelf-check` 对这种写法给出警告。
pub fn qualify(href: &str) -> Result<(), Disqualification> {
    if href.is_empty() {
        return Err(Disqualification::EmptyHref);
    }
    if href.starts_with("http") {
        return Err(Disqualification::AbsoluteUrl);
    }
    if href.starts_with("mailto:") {
        return Err(Disqualification::MailtoScheme);
    }
    if href.starts_with('#') {
        return Err(Disqualification::FragmentOnly);
    }
    if !href.ends_with(DOC_SUFFIX) {
        return Err(Disqualification::WrongSuffix);
    }
    Ok(())
}

/// 判定 `href` 是否符合拦截资格（布尔便捷方法）
///
/// Host 在初始化扫描时用它决定是否给锚点挂接点击拦截。
pub fn is_qualifying(href: &str) -> bool {
    qualify(href).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_relative_html() {
        assert_eq!(qualify("chapter2.html"), Ok(()));
        assert_eq!(qualify("books/intro.html"), Ok(()));
        assert_eq!(qualify("../index.html"), Ok(()));
    }

    #[test]
    fn test_qualify_rejections() {
        assert_eq!(qualify(""), Err(Disqualification::EmptyHref));
        assert_eq!(
            qualify("https://example.com"),
            Err(Disqualification::AbsoluteUrl)
        );
        assert_eq!(
            qualify("http://example.com/page.html"),
            Err(Disqualification::AbsoluteUrl)
        );
        assert_eq!(
            qualify("mailto:reader@example.com"),
            Err(Disqualification::MailtoScheme)
        );
        assert_eq!(qualify("#top"), Err(Disqualification::FragmentOnly));
        assert_eq!(qualify("notes.pdf"), Err(Disqualification::WrongSuffix));
        assert_eq!(qualify("chapter2"), Err(Disqualification::WrongSuffix));
    }

    #[test]
    fn test_qualify_protocol_relative() {
        // 原始规则只排除 http* 前缀，协议相对链接会被拦截
        assert_eq!(qualify("//example.com/page.html"), Ok(()));
    }

    #[test]
    fn test_is_qualifying() {
        assert!(is_qualifying("chapter2.html"));
        assert!(!is_qualifying("https://example.com"));
        assert!(!is_qualifying("#chapter2"));
    }

    #[test]
    fn test_snapshot_builders() {
        let link = LinkSnapshot::new("chapter2.html", Rect::new(40.0, 120.0, 38.0, 220.0))
            .with_color("#8b4513")
            .with_spine_label("第二章");

        assert_eq!(link.href, "chapter2.html");
        assert_eq!(link.color.as_deref(), Some("#8b4513"));
        assert_eq!(link.spine_label.as_deref(), Some("第二章"));
    }

    #[test]
    fn test_snapshot_serialization() {
        let link = LinkSnapshot::new("chapter2.html", Rect::new(0.0, 0.0, 38.0, 220.0));
        let json = serde_json::to_string(&link).unwrap();
        let deserialized: LinkSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(link, deserialized);
    }
}
