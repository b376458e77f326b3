//! # Input 模块
//!
//! 定义 Host 向 Runtime 传递的输入事件。
//!
//! ## 设计说明
//!
//! - `ControllerInput` 是 Host 采集页面事件后传递给 Runtime 的语义化输入
//! - Runtime 不直接处理 DOM 事件，只处理语义化的输入
//! - `WaitForTime` 的时长由 Host 计时，到点后回送 `Elapsed`

use serde::{Deserialize, Serialize};

use crate::link::LinkSnapshot;

/// Host 向 Runtime 传递的输入
///
/// Runtime 通过 `tick(input)` 接收这些输入，并根据当前状态决定如何处理。
///
/// # 设计说明
///
/// - `DocumentReady`：页面就绪，触发一次性初始化
/// - `Click`：书籍链接被点击，携带点击时刻的快照
/// - `Elapsed`：Host 等待 `WaitForTime` 到点后的回送
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControllerInput {
    /// 页面就绪（触发过渡层挂载）
    DocumentReady,

    /// 书籍链接被点击
    ///
    /// Host 在初始化扫描时只给合格链接挂接拦截，
    /// Runtime 收到后仍会重新判定资格。
    Click {
        /// 点击时刻的链接快照
        link: LinkSnapshot,
    },

    /// `WaitForTime` 计时到点
    Elapsed,
}

impl ControllerInput {
    /// 创建页面就绪输入
    pub fn document_ready() -> Self {
        Self::DocumentReady
    }

    /// 创建点击输入
    pub fn click(link: LinkSnapshot) -> Self {
        Self::Click { link }
    }

    /// 创建计时到点输入
    pub fn elapsed() -> Self {
        Self::Elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_input_creation() {
        assert_eq!(
            ControllerInput::document_ready(),
            ControllerInput::DocumentReady
        );
        assert_eq!(ControllerInput::elapsed(), ControllerInput::Elapsed);

        let link = LinkSnapshot::new("chapter2.html", Rect::zero());
        let click = ControllerInput::click(link.clone());
        assert_eq!(click, ControllerInput::Click { link });
    }

    #[test]
    fn test_input_serialization() {
        let input = ControllerInput::click(LinkSnapshot::new("chapter2.html", Rect::zero()));
        let json = serde_json::to_string(&input).unwrap();
        let deserialized: ControllerInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, deserialized);
    }
}
