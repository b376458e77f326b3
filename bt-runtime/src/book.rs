//! # Book 模块
//!
//! 动画书克隆的数据模型：几何、派生颜色、渐变与类型化结构树。
//!
//! ## 设计原则
//!
//! - 结构是**数据**，不是标记文本：Host 遍历 [`BookNode`] 树创建元素，
//!   书脊文字作为文本节点写入，从根上杜绝标记注入
//! - 类名是与外部样式规则的契约，集中在 [`class`] 模块
//! - 渐变只描述颜色停靠点，具体绘制由样式层完成

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::Rect;
use crate::link::LinkSnapshot;

/// 与外部样式规则约定的类名
///
/// 结构类描述克隆的固定节点结构，标记类由 Runtime 在时间线上追加。
pub mod class {
    /// 过渡容器
    pub const OVERLAY: &str = "book-transition-overlay";
    /// 白闪节点
    pub const FLASH: &str = "page-flash";
    /// 动画书克隆根节点
    pub const BOOK: &str = "animated-book";
    /// 书体
    pub const BODY: &str = "book-body";
    /// 书脊面
    pub const SPINE: &str = "book-face-spine";
    /// 书脊文字
    pub const SPINE_TEXT: &str = "spine-text";
    /// 封面（翻开的面）
    pub const FRONT: &str = "book-face-front";
    /// 封面外侧
    pub const FRONT_OUTER: &str = "book-face-front-outer";
    /// 封面内侧
    pub const FRONT_INNER: &str = "book-face-front-inner";
    /// 封底
    pub const BACK: &str = "book-face-back";
    /// 书页块
    pub const PAGES: &str = "book-pages";

    /// 过渡容器/白闪的激活标记
    pub const ACTIVE: &str = "active";
    /// 原始链接的开书标记
    pub const OPENING: &str = "opening";
}

/// 书籍配色：基色及其派生变体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPalette {
    /// 基色（来自 `--book-color`，缺失时为默认色）
    pub base: Color,
    /// 深色变体
    pub darker: Color,
    /// 浅色变体
    pub lighter: Color,
}

impl BookPalette {
    /// 从基色派生配色
    pub fn from_base(base: Color) -> Self {
        Self {
            base,
            darker: base.darkened(),
            lighter: base.lightened(),
        }
    }
}

/// 渐变方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientAxis {
    /// 水平（书脊面）
    ToRight,
    /// 135 度对角（封面/封底）
    Diagonal,
}

impl GradientAxis {
    /// CSS 方向表达式
    pub fn to_css(self) -> &'static str {
        match self {
            Self::ToRight => "to right",
            Self::Diagonal => "135deg",
        }
    }
}

/// 渐变停靠点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientStop {
    /// 停靠点颜色
    pub color: Color,
    /// 停靠位置（百分比，None 表示均匀分布）
    pub position: Option<u8>,
}

impl GradientStop {
    /// 均匀分布的停靠点
    pub fn color(color: Color) -> Self {
        Self {
            color,
            position: None,
        }
    }

    /// 指定位置的停靠点
    pub fn at(color: Color, position: u8) -> Self {
        Self {
            color,
            position: Some(position),
        }
    }
}

/// 线性渐变描述
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    /// 渐变方向
    pub axis: GradientAxis,
    /// 停靠点序列
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// 水平渐变
    pub fn to_right(stops: Vec<GradientStop>) -> Self {
        Self {
            axis: GradientAxis::ToRight,
            stops,
        }
    }

    /// 135 度对角渐变
    pub fn diagonal(stops: Vec<GradientStop>) -> Self {
        Self {
            axis: GradientAxis::Diagonal,
            stops,
        }
    }

    /// 渲染为 CSS `linear-gradient()` 表达式
    pub fn to_css(&self) -> String {
        let stops = self
            .stops
            .iter()
            .map(|stop| match stop.position {
                Some(p) => format!("{} {}%", stop.color, p),
                None => stop.color.to_css(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("linear-gradient({}, {})", self.axis.to_css(), stops)
    }
}

/// 克隆结构树的节点
///
/// Host 按节点创建元素：`class` 设为类名，`style` 作为内联样式，
/// `text` 作为**文本节点**写入（不解析为标记）。
#[derive(Debug, Clone, PartialEq)]
pub struct BookNode {
    /// 结构类名
    pub class: &'static str,
    /// 内联样式（背景渐变、初始几何）
    pub style: Option<String>,
    /// 文本内容
    pub text: Option<String>,
    /// 子节点
    pub children: Vec<BookNode>,
}

impl BookNode {
    /// 创建空节点
    pub fn new(class: &'static str) -> Self {
        Self {
            class,
            style: None,
            text: None,
            children: Vec::new(),
        }
    }

    /// 设置内联样式
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// 设置文本内容
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// 设置子节点
    pub fn with_children(mut self, children: Vec<BookNode>) -> Self {
        self.children = children;
        self
    }

    /// 按类名查找后代节点（含自身）
    pub fn find(&self, class: &str) -> Option<&BookNode> {
        if self.class == class {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(class))
    }
}

/// 动画书克隆
///
/// 点击拦截时从 [`LinkSnapshot`] 构造一次，随 `MountBook` 指令交给 Host。
/// 生命周期以随后的页面卸载为界，Runtime 不做显式回收。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedBook {
    /// 初始几何（与被点击元素的包围盒一致）
    pub rect: Rect,
    /// 书脊深度（等于元素宽度，供 3D 变换使用）
    pub spine_depth: f64,
    /// 配色
    pub palette: BookPalette,
    /// 书脊文字（缺失时为空串）
    pub spine_label: String,
}

impl AnimatedBook {
    /// 从链接快照构造克隆数据
    ///
    /// 颜色缺失或无法解析时回退到默认色，书脊文字缺失时为空。
    pub fn from_link(link: &LinkSnapshot) -> Self {
        let base = Color::parse_or_default(link.color.as_deref());
        Self {
            rect: link.rect,
            spine_depth: link.rect.width,
            palette: BookPalette::from_base(base),
            spine_label: link.spine_label.clone().unwrap_or_default(),
        }
    }

    /// 书脊渐变：暗-基-亮-基-暗（水平）
    pub fn spine_gradient(&self) -> Gradient {
        let p = &self.palette;
        Gradient::to_right(vec![
            GradientStop::color(p.darker),
            GradientStop::color(p.base),
            GradientStop::color(p.lighter),
            GradientStop::color(p.base),
            GradientStop::color(p.darker),
        ])
    }

    /// 封面渐变：暗、基色 30%、亮色 70%、基色（对角）
    pub fn cover_gradient(&self) -> Gradient {
        let p = &self.palette;
        Gradient::diagonal(vec![
            GradientStop::color(p.darker),
            GradientStop::at(p.base, 30),
            GradientStop::at(p.lighter, 70),
            GradientStop::color(p.base),
        ])
    }

    /// 封底渐变：暗-基（对角）
    pub fn back_gradient(&self) -> Gradient {
        let p = &self.palette;
        Gradient::diagonal(vec![
            GradientStop::color(p.darker),
            GradientStop::color(p.base),
        ])
    }

    /// 克隆根节点的初始定位样式
    pub fn placement_css(&self) -> String {
        format!(
            "left: {}px; top: {}px; width: {}px; height: {}px; --spine-depth: {}px;",
            self.rect.left, self.rect.top, self.rect.width, self.rect.height, self.spine_depth
        )
    }

    /// 构建类型化结构树
    ///
    /// 与样式契约的结构一一对应：
    /// 书体 → 书脊面（含书脊文字）、封面（外侧/内侧）、封底、书页块。
    pub fn structure(&self) -> BookNode {
        let spine = BookNode::new(class::SPINE)
            .with_style(format!("background: {};", self.spine_gradient().to_css()))
            .with_children(vec![
                BookNode::new(class::SPINE_TEXT).with_text(self.spine_label.clone()),
            ]);

        let front = BookNode::new(class::FRONT).with_children(vec![
            BookNode::new(class::FRONT_OUTER)
                .with_style(format!("background: {};", self.cover_gradient().to_css())),
            BookNode::new(class::FRONT_INNER),
        ]);

        let back = BookNode::new(class::BACK)
            .with_style(format!("background: {};", self.back_gradient().to_css()));

        let pages = BookNode::new(class::PAGES);

        let body = BookNode::new(class::BODY).with_children(vec![spine, front, back, pages]);

        BookNode::new(class::BOOK)
            .with_style(self.placement_css())
            .with_children(vec![body])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_BOOK_COLOR;

    fn sample_link() -> LinkSnapshot {
        LinkSnapshot::new("chapter2.html", Rect::new(40.0, 120.0, 38.0, 220.0))
            .with_color("#5b6a82")
            .with_spine_label("第二章")
    }

    #[test]
    fn test_palette_from_base() {
        let palette = BookPalette::from_base(DEFAULT_BOOK_COLOR);
        assert_eq!(palette.base, DEFAULT_BOOK_COLOR);
        assert_eq!(palette.darker, DEFAULT_BOOK_COLOR.darkened());
        assert_eq!(palette.lighter, DEFAULT_BOOK_COLOR.lightened());
    }

    #[test]
    fn test_from_link_geometry() {
        let book = AnimatedBook::from_link(&sample_link());
        assert_eq!(book.rect, Rect::new(40.0, 120.0, 38.0, 220.0));
        assert_eq!(book.spine_depth, 38.0);
        assert_eq!(book.spine_label, "第二章");
    }

    #[test]
    fn test_from_link_color_fallback() {
        // 颜色缺失
        let book = AnimatedBook::from_link(&LinkSnapshot::new("a.html", Rect::zero()));
        assert_eq!(book.palette.base, DEFAULT_BOOK_COLOR);

        // 颜色无法解析
        let link = LinkSnapshot::new("a.html", Rect::zero()).with_color("var(--oops)");
        let book = AnimatedBook::from_link(&link);
        assert_eq!(book.palette.base, DEFAULT_BOOK_COLOR);

        // 书脊文字缺失时为空串
        assert_eq!(book.spine_label, "");
    }

    #[test]
    fn test_gradient_css() {
        let g = Gradient::diagonal(vec![
            GradientStop::color(Color::new(0, 0, 0)),
            GradientStop::at(Color::new(0xff, 0xff, 0xff), 70),
        ]);
        assert_eq!(
            g.to_css(),
            "linear-gradient(135deg, #000000, #ffffff 70%)"
        );
    }

    #[test]
    fn test_spine_gradient_symmetry() {
        let book = AnimatedBook::from_link(&sample_link());
        let g = book.spine_gradient();

        assert_eq!(g.axis, GradientAxis::ToRight);
        assert_eq!(g.stops.len(), 5);
        // 两端与中心对称：暗-基-亮-基-暗
        assert_eq!(g.stops[0].color, book.palette.darker);
        assert_eq!(g.stops[2].color, book.palette.lighter);
        assert_eq!(g.stops[0], g.stops[4]);
        assert_eq!(g.stops[1], g.stops[3]);
    }

    #[test]
    fn test_cover_gradient_positions() {
        let book = AnimatedBook::from_link(&sample_link());
        let g = book.cover_gradient();

        assert_eq!(g.axis, GradientAxis::Diagonal);
        assert_eq!(g.stops[1].position, Some(30));
        assert_eq!(g.stops[2].position, Some(70));
    }

    #[test]
    fn test_placement_css() {
        let book = AnimatedBook::from_link(&sample_link());
        assert_eq!(
            book.placement_css(),
            "left: 40px; top: 120px; width: 38px; height: 220px; --spine-depth: 38px;"
        );
    }

    #[test]
    fn test_structure_shape() {
        let book = AnimatedBook::from_link(&sample_link());
        let root = book.structure();

        assert_eq!(root.class, class::BOOK);
        assert_eq!(root.children.len(), 1);

        let body = &root.children[0];
        assert_eq!(body.class, class::BODY);
        let child_classes: Vec<&str> = body.children.iter().map(|c| c.class).collect();
        assert_eq!(
            child_classes,
            vec![class::SPINE, class::FRONT, class::BACK, class::PAGES]
        );

        // 书脊文字作为文本节点存在，不经过标记解析
        let spine_text = root.find(class::SPINE_TEXT).unwrap();
        assert_eq!(spine_text.text.as_deref(), Some("第二章"));

        // 封面分外侧/内侧两层
        let front = root.find(class::FRONT).unwrap();
        assert_eq!(front.children.len(), 2);
        assert_eq!(front.children[0].class, class::FRONT_OUTER);
        assert!(front.children[0].style.is_some());
        assert!(front.children[1].style.is_none());
    }

    #[test]
    fn test_structure_label_is_plain_data() {
        // 标签里的标记字符原样保留为数据，由 Host 以文本节点写入
        let link = LinkSnapshot::new("a.html", Rect::zero())
            .with_spine_label("<img src=x onerror=alert(1)>");
        let root = AnimatedBook::from_link(&link).structure();

        let spine_text = root.find(class::SPINE_TEXT).unwrap();
        assert_eq!(
            spine_text.text.as_deref(),
            Some("<img src=x onerror=alert(1)>")
        );
    }

    #[test]
    fn test_book_serialization() {
        let book = AnimatedBook::from_link(&sample_link());
        let json = serde_json::to_string(&book).unwrap();
        let deserialized: AnimatedBook = serde_json::from_str(&json).unwrap();
        assert_eq!(book, deserialized);
    }
}
