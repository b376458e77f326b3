//! # Command 模块
//!
//! 定义 Runtime 向 Host 发出的所有指令。
//! Command 是 Runtime 与 Host 之间的**唯一通信方式**。
//!
//! ## 设计原则
//!
//! - **声明式**：Command 描述"做什么"，不描述"怎么做"
//! - **无副作用**：Command 本身不执行任何操作
//! - **引擎无关**：不包含任何 DOM 或渲染框架的类型
//!
//! 所有视觉运动（缓动、变换、透明度）都由外部样式规则定义，
//! Runtime 只负责在正确的时刻发出正确的标记类。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::book::AnimatedBook;

/// 开书序列的四个阶段
///
/// 每个阶段对应一个标记类和一个相对拦截时刻的固定偏移。
/// 阶段顺序严格为 1→2→3→4，由执行引擎保证。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// 阶段 1：从书架滑出（t=100ms）
    SlideOut,
    /// 阶段 2：移到屏幕中央并转向读者（t=600ms）
    MoveToCenter,
    /// 阶段 3：翻开封面（t=1800ms）
    OpenCover,
    /// 阶段 4：放大铺满视口，同时触发白闪（t=2500ms）
    Expand,
}

impl Stage {
    /// 全部阶段，按时间顺序
    pub const ALL: [Stage; 4] = [
        Stage::SlideOut,
        Stage::MoveToCenter,
        Stage::OpenCover,
        Stage::Expand,
    ];

    /// 第一个阶段
    pub fn first() -> Stage {
        Stage::SlideOut
    }

    /// 阶段序号（1 起）
    pub fn index(self) -> u8 {
        match self {
            Stage::SlideOut => 1,
            Stage::MoveToCenter => 2,
            Stage::OpenCover => 3,
            Stage::Expand => 4,
        }
    }

    /// 按序号查找阶段
    pub fn from_index(index: u8) -> Option<Stage> {
        match index {
            1 => Some(Stage::SlideOut),
            2 => Some(Stage::MoveToCenter),
            3 => Some(Stage::OpenCover),
            4 => Some(Stage::Expand),
            _ => None,
        }
    }

    /// 外部样式规则依赖的标记类名
    pub fn marker_class(self) -> &'static str {
        match self {
            Stage::SlideOut => "stage-1",
            Stage::MoveToCenter => "stage-2",
            Stage::OpenCover => "stage-3",
            Stage::Expand => "stage-4",
        }
    }

    /// 相对拦截时刻的偏移（毫秒）
    ///
    /// 这些偏移是与外部样式规则的契约，不可配置。
    pub fn offset_ms(self) -> u64 {
        match self {
            Stage::SlideOut => 100,
            Stage::MoveToCenter => 600,
            Stage::OpenCover => 1800,
            Stage::Expand => 2500,
        }
    }

    /// 相对拦截时刻的偏移
    pub fn offset(self) -> Duration {
        Duration::from_millis(self.offset_ms())
    }

    /// 下一个阶段（最后一个阶段返回 None）
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::SlideOut => Some(Stage::MoveToCenter),
            Stage::MoveToCenter => Some(Stage::OpenCover),
            Stage::OpenCover => Some(Stage::Expand),
            Stage::Expand => None,
        }
    }
}

/// Runtime 向 Host 发出的指令
///
/// Host 接收 Command 后，将其转换为实际的 DOM 操作。
/// 全部指令都是幂等的类名/节点变更。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// 挂载过渡容器（`book-transition-overlay`），追加到页面 body
    MountOverlay,

    /// 挂载白闪节点（`page-flash`），追加到页面 body
    MountFlash,

    /// 把动画书克隆挂载进过渡容器
    ///
    /// `book` 携带初始几何、派生颜色与书脊文字，
    /// Host 通过 [`AnimatedBook::structure`] 取得类型化节点树渲染。
    MountBook {
        /// 动画书数据
        book: AnimatedBook,
    },

    /// 给过渡容器加 `active` 标记
    ActivateOverlay,

    /// 给被点击的原始链接加 `opening` 标记
    MarkOpening,

    /// 给克隆加阶段标记类（`stage-1`…`stage-4`）
    EnterStage {
        /// 进入的阶段
        stage: Stage,
    },

    /// 给白闪节点加 `active` 标记（全屏变白）
    ActivateFlash,

    /// 导航到目标页面，替换当前页
    Navigate {
        /// 目标 `href`
        href: String,
    },

    /// 清理过渡容器：移除克隆、撤销 `active`/`opening` 标记
    ///
    /// 仅在新的激活取消在途序列时发出。
    ResetOverlay,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_and_offsets() {
        // 阶段偏移严格递增
        let offsets: Vec<u64> = Stage::ALL.iter().map(|s| s.offset_ms()).collect();
        assert_eq!(offsets, vec![100, 600, 1800, 2500]);

        let mut sorted = offsets.clone();
        sorted.sort_unstable();
        assert_eq!(offsets, sorted);
    }

    #[test]
    fn test_stage_marker_classes() {
        assert_eq!(Stage::SlideOut.marker_class(), "stage-1");
        assert_eq!(Stage::MoveToCenter.marker_class(), "stage-2");
        assert_eq!(Stage::OpenCover.marker_class(), "stage-3");
        assert_eq!(Stage::Expand.marker_class(), "stage-4");
    }

    #[test]
    fn test_stage_chain() {
        assert_eq!(Stage::first(), Stage::SlideOut);
        assert_eq!(Stage::SlideOut.next(), Some(Stage::MoveToCenter));
        assert_eq!(Stage::MoveToCenter.next(), Some(Stage::OpenCover));
        assert_eq!(Stage::OpenCover.next(), Some(Stage::Expand));
        assert_eq!(Stage::Expand.next(), None);
    }

    #[test]
    fn test_stage_index_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_index(stage.index()), Some(stage));
        }
        assert_eq!(Stage::from_index(0), None);
        assert_eq!(Stage::from_index(5), None);
    }

    #[test]
    fn test_command_serialization() {
        let cmd = Command::Navigate {
            href: "chapter2.html".to_string(),
        };

        let json = serde_json::to_string(&cmd).unwrap();
        let deserialized: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, deserialized);
    }

    #[test]
    fn test_enter_stage_serialization() {
        let cmd = Command::EnterStage {
            stage: Stage::OpenCover,
        };

        let json = serde_json::to_string(&cmd).unwrap();
        let deserialized: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, deserialized);
    }
}
