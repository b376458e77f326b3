//! # Page 模块
//!
//! 无头宿主的内存页面模型。
//!
//! ## 设计说明
//!
//! - 只建模过渡契约涉及的节点：过渡容器、白闪、克隆、原始链接标记
//! - `Element` 区分结构类（固定）与标记类（Runtime 按时间线追加）
//! - 不模拟布局与绘制，样式串只存不解释

use serde::Deserialize;

use bt_runtime::{BookNode, LinkSnapshot, book::class};

/// 书架描述文件（JSON）
#[derive(Debug, Clone, Deserialize)]
pub struct Shelf {
    /// 页面标识（用于输出）
    pub page: String,
    /// 书架上的链接
    pub links: Vec<LinkSnapshot>,
}

/// 页面元素
#[derive(Debug, Clone)]
pub struct Element {
    /// 结构类名
    pub class: String,
    /// 追加的标记类
    pub markers: Vec<String>,
    /// 内联样式
    pub style: Option<String>,
    /// 文本内容（作为数据存放，不解析）
    pub text: Option<String>,
    /// 子元素
    pub children: Vec<Element>,
}

impl Element {
    /// 创建空元素
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            markers: Vec::new(),
            style: None,
            text: None,
            children: Vec::new(),
        }
    }

    /// 从类型化结构树渲染元素
    ///
    /// `BookNode` 的文本作为文本内容原样写入：无头模型里
    /// 同样不存在标记解析路径。
    pub fn from_node(node: &BookNode) -> Self {
        Self {
            class: node.class.to_string(),
            markers: Vec::new(),
            style: node.style.clone(),
            text: node.text.clone(),
            children: node.children.iter().map(Self::from_node).collect(),
        }
    }

    /// 追加标记类（幂等）
    pub fn add_marker(&mut self, marker: &str) {
        if !self.markers.iter().any(|m| m == marker) {
            self.markers.push(marker.to_string());
        }
    }

    /// 移除标记类
    pub fn remove_marker(&mut self, marker: &str) {
        self.markers.retain(|m| m != marker);
    }

    /// 是否带有标记类
    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m == marker)
    }

    /// 完整类名列表（结构类 + 标记类）
    pub fn class_list(&self) -> String {
        let mut classes = vec![self.class.clone()];
        classes.extend(self.markers.iter().cloned());
        classes.join(" ")
    }
}

/// 页面模型
///
/// 宿主侧的全部可变状态：过渡层两个节点、克隆、原始链接的
/// `opening` 标记、以及最终的导航结果。
#[derive(Debug, Default)]
pub struct PageModel {
    /// 过渡容器（初始化后存在）
    pub overlay: Option<Element>,
    /// 白闪节点（初始化后存在）
    pub flash: Option<Element>,
    /// 原始链接是否带 `opening` 标记
    pub link_opening: bool,
    /// 导航结果（`Navigate` 之后为目标 `href`）
    pub location: Option<String>,
}

impl PageModel {
    /// 创建空页面
    pub fn new() -> Self {
        Self::default()
    }

    /// 挂载过渡容器
    pub fn mount_overlay(&mut self) {
        self.overlay = Some(Element::new(class::OVERLAY));
    }

    /// 挂载白闪节点
    pub fn mount_flash(&mut self) {
        self.flash = Some(Element::new(class::FLASH));
    }

    /// 当前挂载的克隆（如果有）
    pub fn mounted_book(&self) -> Option<&Element> {
        self.overlay
            .as_ref()
            .and_then(|overlay| overlay.children.last())
    }

    /// 当前挂载的克隆（可变）
    pub fn mounted_book_mut(&mut self) -> Option<&mut Element> {
        self.overlay
            .as_mut()
            .and_then(|overlay| overlay.children.last_mut())
    }
}
