//! # Geometry 模块
//!
//! 定义页面几何类型。
//!
//! ## 设计说明
//!
//! - `Rect` 是 Host 在点击时刻捕获的链接元素包围盒（视口坐标）
//! - Runtime 只透传几何数据，不做任何布局计算

use serde::{Deserialize, Serialize};

/// 元素包围盒（视口坐标，单位 px）
///
/// 对应 Host 侧 `getBoundingClientRect()` 的结果。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// 左边缘
    pub left: f64,
    /// 上边缘
    pub top: f64,
    /// 宽度
    pub width: f64,
    /// 高度
    pub height: f64,
}

impl Rect {
    /// 创建新的包围盒
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// 零尺寸包围盒
    pub fn zero() -> Self {
        Self::default()
    }

    /// 是否为空（无可见面积）
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_basic() {
        let rect = Rect::new(40.0, 120.0, 38.0, 220.0);
        assert_eq!(rect.left, 40.0);
        assert_eq!(rect.width, 38.0);
        assert!(!rect.is_empty());
    }

    #[test]
    fn test_rect_empty() {
        assert!(Rect::zero().is_empty());
        assert!(Rect::new(10.0, 10.0, 0.0, 50.0).is_empty());
        assert!(Rect::new(10.0, 10.0, 50.0, -1.0).is_empty());
    }

    #[test]
    fn test_rect_serialization() {
        let rect = Rect::new(1.5, 2.5, 3.0, 4.0);
        let json = serde_json::to_string(&rect).unwrap();
        let deserialized: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(rect, deserialized);
    }
}
