//! # 诊断模块
//!
//! 提供书架页面的静态检查和诊断 API，不依赖 IO 或 DOM 环境。
//!
//! ## 设计原则
//!
//! - 纯函数 API，可在无 IO 环境下运行
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 复用 [`crate::link`] 的资格判定，不重复规则逻辑

use crate::link::{self, Disqualification};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 页面 ID / 文件路径
    pub page_id: String,
    /// 行号（如果可定位，从 1 开始）
    pub line: Option<usize>,
    /// 诊断消息
    pub message: String,
    /// 诊断详情（可选，如原始 href）
    pub detail: Option<String>,
}

impl Diagnostic {
    /// 创建错误诊断
    pub fn error(page_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            page_id: page_id.into(),
            line: None,
            message: message.into(),
            detail: None,
        }
    }

    /// 创建警告诊断
    pub fn warn(page_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warn,
            page_id: page_id.into(),
            line: None,
            message: message.into(),
            detail: None,
        }
    }

    /// 创建信息诊断
    pub fn info(page_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            page_id: page_id.into(),
            line: None,
            message: message.into(),
            detail: None,
        }
    }

    /// 设置行号
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// 设置详情
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.page_id)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n  | {}", detail)?;
        }
        Ok(())
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
            .count()
    }

    /// 获取警告数量
    pub fn warn_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warn)
            .count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

/// 书架锚点（扫描工具提供的输入）
///
/// 只包含诊断所需的字段；扫描方式（真实 DOM、静态 HTML）由工具决定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfAnchor {
    /// `href` 属性（缺失时为 None）
    pub href: Option<String>,
    /// 是否声明了 `--book-color`
    pub has_color: bool,
    /// 源文件行号（如果可定位）
    pub line: Option<usize>,
}

impl ShelfAnchor {
    /// 创建锚点记录
    pub fn new(href: Option<String>) -> Self {
        Self {
            href,
            has_color: false,
            line: None,
        }
    }

    /// 标记声明了显示颜色
    pub fn with_color(mut self) -> Self {
        self.has_color = true;
        self
    }

    /// 设置行号
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// 合格的导航目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    /// 目标 `href`（相对路径）
    pub href: String,
    /// 源文件行号（如果可定位）
    pub line: Option<usize>,
}

//=============================================================================
// 书架审计 API
//=============================================================================

/// 审计书架页面的书籍锚点，返回诊断结果
///
/// 执行以下检查：
/// - 缺失/为空的 `href`（Error：书籍链接必须可导航）
/// - 后缀不符（Warn：点击不会触发过渡）
/// - 协议相对链接（Warn：会被拦截，通常不是本意）
/// - 缺失 `--book-color`（Warn：将使用默认颜色）
/// - 外部/邮件/页内链接（Info：按默认导航放行，符合预期）
pub fn audit_shelf(page_id: &str, anchors: &[ShelfAnchor]) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();

    for anchor in anchors {
        let mut push = |diag: Diagnostic| {
            result.push(match anchor.line {
                Some(line) => diag.with_line(line),
                None => diag,
            });
        };

        let Some(href) = anchor.href.as_deref() else {
            push(Diagnostic::error(page_id, "书籍链接缺少 href"));
            continue;
        };

        match link::qualify(href) {
            Ok(()) => {
                if href.starts_with("//") {
                    push(
                        Diagnostic::warn(page_id, "协议相对链接会被拦截")
                            .with_detail(href.to_string()),
                    );
                }
                if !anchor.has_color {
                    push(
                        Diagnostic::warn(page_id, "缺少 --book-color，将使用默认颜色")
                            .with_detail(href.to_string()),
                    );
                }
            }
            Err(Disqualification::EmptyHref) => {
                push(Diagnostic::error(page_id, "书籍链接缺少 href"));
            }
            Err(Disqualification::WrongSuffix) => {
                push(
                    Diagnostic::warn(
                        page_id,
                        format!("href 不以 {} 结尾，点击不会触发过渡", link::DOC_SUFFIX),
                    )
                    .with_detail(href.to_string()),
                );
            }
            Err(reason) => {
                push(
                    Diagnostic::info(page_id, format!("按默认导航放行：{}", reason))
                        .with_detail(href.to_string()),
                );
            }
        }
    }

    result
}

/// 提取页面中所有合格的导航目标（保序去重）
///
/// 工具用它检查目标文档是否存在。
pub fn extract_navigation_targets(anchors: &[ShelfAnchor]) -> Vec<NavigationTarget> {
    let mut seen = std::collections::HashSet::new();
    let mut targets = Vec::new();

    for anchor in anchors {
        let Some(href) = anchor.href.as_deref() else {
            continue;
        };
        if link::is_qualifying(href) && seen.insert(href.to_string()) {
            targets.push(NavigationTarget {
                href: href.to_string(),
                line: anchor.line,
            });
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("shelf.html", "书籍链接缺少 href")
            .with_line(10)
            .with_detail("<a class=\"book\">");

        let display = format!("{}", diag);
        assert!(display.contains("[ERROR]"));
        assert!(display.contains("shelf.html:10"));
        assert!(display.contains("书籍链接缺少 href"));
    }

    #[test]
    fn test_audit_qualifying_anchor_clean() {
        let anchors = vec![
            ShelfAnchor::new(Some("chapter1.html".to_string())).with_color(),
        ];
        let result = audit_shelf("shelf.html", &anchors);

        assert!(result.is_empty());
    }

    #[test]
    fn test_audit_missing_href() {
        let anchors = vec![ShelfAnchor::new(None).with_line(7)];
        let result = audit_shelf("shelf.html", &anchors);

        assert!(result.has_errors());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.diagnostics[0].line, Some(7));
    }

    #[test]
    fn test_audit_empty_href() {
        let anchors = vec![ShelfAnchor::new(Some(String::new()))];
        let result = audit_shelf("shelf.html", &anchors);

        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn test_audit_wrong_suffix_warns() {
        let anchors = vec![
            ShelfAnchor::new(Some("notes.pdf".to_string())).with_color(),
        ];
        let result = audit_shelf("shelf.html", &anchors);

        assert!(!result.has_errors());
        assert_eq!(result.warn_count(), 1);
        assert!(result.diagnostics[0].message.contains(".html"));
    }

    #[test]
    fn test_audit_external_is_info() {
        let anchors = vec![
            ShelfAnchor::new(Some("https://example.com".to_string())).with_color(),
            ShelfAnchor::new(Some("mailto:a@b.c".to_string())).with_color(),
            ShelfAnchor::new(Some("#top".to_string())).with_color(),
        ];
        let result = audit_shelf("shelf.html", &anchors);

        assert!(!result.has_errors());
        assert_eq!(result.warn_count(), 0);
        assert_eq!(result.filter_by_level(DiagnosticLevel::Info).len(), 3);
    }

    #[test]
    fn test_audit_missing_color_warns() {
        let anchors = vec![ShelfAnchor::new(Some("chapter1.html".to_string()))];
        let result = audit_shelf("shelf.html", &anchors);

        assert_eq!(result.warn_count(), 1);
        assert!(result.diagnostics[0].message.contains("--book-color"));
    }

    #[test]
    fn test_audit_protocol_relative_warns() {
        let anchors = vec![
            ShelfAnchor::new(Some("//cdn.example.com/x.html".to_string())).with_color(),
        ];
        let result = audit_shelf("shelf.html", &anchors);

        assert_eq!(result.warn_count(), 1);
        assert!(result.diagnostics[0].message.contains("协议相对"));
    }

    #[test]
    fn test_extract_navigation_targets() {
        let anchors = vec![
            ShelfAnchor::new(Some("chapter1.html".to_string())).with_line(3),
            ShelfAnchor::new(Some("https://example.com".to_string())),
            ShelfAnchor::new(Some("chapter2.html".to_string())).with_line(9),
            // 重复目标只保留第一次出现
            ShelfAnchor::new(Some("chapter1.html".to_string())).with_line(20),
        ];

        let targets = extract_navigation_targets(&anchors);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].href, "chapter1.html");
        assert_eq!(targets[0].line, Some(3));
        assert_eq!(targets[1].href, "chapter2.html");
    }

    #[test]
    fn test_diagnostic_result_filter() {
        let mut result = DiagnosticResult::new();
        result.push(Diagnostic::error("shelf", "错误1"));
        result.push(Diagnostic::warn("shelf", "警告1"));
        result.push(Diagnostic::info("shelf", "信息1"));

        assert_eq!(result.filter_by_level(DiagnosticLevel::Error).len(), 1);
        assert_eq!(result.filter_by_level(DiagnosticLevel::Warn).len(), 2);
        assert_eq!(result.filter_by_level(DiagnosticLevel::Info).len(), 3);
    }
}
