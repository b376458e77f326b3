//! # BT Runtime
//!
//! 开书页面过渡（Book Transition）的核心运行时库。
//!
//! ## 架构概述
//!
//! `bt-runtime` 是纯逻辑核心，不依赖任何 IO、DOM 或渲染引擎。
//! 它通过 **命令驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                          Runtime
//!   │                              │
//!   │──── ControllerInput ───────►│
//!   │                              │ tick()
//!   │◄─── (Vec<Command>, WaitingReason) ──│
//!   │                              │
//! ```
//!
//! Host 负责真实页面：挂载过渡层、渲染克隆、在 `WaitForTime`
//! 到点后回送 `Elapsed`、在最后执行导航。Runtime 负责序列本身：
//! 点击资格判定、克隆数据构造、阶段时间线与取消语义。
//! 所有视觉运动由外部样式规则按标记类名定义。
//!
//! ## 核心类型
//!
//! - [`Command`]：Runtime 向 Host 发出的指令
//! - [`ControllerInput`]：Host 向 Runtime 传递的输入
//! - [`WaitingReason`]：Runtime 的等待状态
//! - [`TransitionController`]：执行引擎
//! - [`TransitionConfig`]：注入式配置（启停/调试/总时长）
//!
//! ## 使用示例
//!
//! ```ignore
//! use bt_runtime::{ControllerInput, TransitionController, WaitingReason};
//!
//! let mut controller = TransitionController::with_defaults();
//!
//! // 页面就绪
//! let (commands, _) = controller.tick(Some(ControllerInput::document_ready()))?;
//!
//! // 主循环
//! loop {
//!     let (commands, waiting) = controller.tick(input)?;
//!
//!     // Host 执行 commands
//!     for cmd in commands {
//!         host.execute(cmd);
//!     }
//!
//!     // 根据 waiting 状态采集输入
//!     input = match waiting {
//!         WaitingReason::WaitForClick => wait_for_click(),
//!         WaitingReason::WaitForTime(duration) => {
//!             sleep(duration);
//!             Some(ControllerInput::elapsed())
//!         }
//!         WaitingReason::None => break,
//!     };
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`command`]：Command 与阶段时间线定义
//! - [`input`]：ControllerInput 定义
//! - [`state`]：ControllerState 和 WaitingReason 定义
//! - [`config`]：注入式配置
//! - [`link`]：链接快照与拦截资格判定
//! - [`book`]：动画书克隆的数据模型
//! - [`color`] / [`geometry`]：颜色派生与几何类型
//! - [`trace`]：序列事件记录（调试表面）
//! - [`diagnostic`]：书架页面静态审计
//! - [`runtime`]：执行引擎
//! - [`error`]：错误类型定义

pub mod book;
pub mod color;
pub mod command;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod geometry;
pub mod input;
pub mod link;
pub mod runtime;
pub mod state;
pub mod trace;

// 重导出核心类型
pub use book::{AnimatedBook, BookNode, BookPalette, Gradient, GradientAxis, GradientStop};
pub use color::{Color, DEFAULT_BOOK_COLOR};
pub use command::{Command, Stage};
pub use config::{DEFAULT_ANIMATION_DURATION_MS, TransitionConfig};
pub use diagnostic::{
    Diagnostic, DiagnosticLevel, DiagnosticResult, NavigationTarget, ShelfAnchor, audit_shelf,
    extract_navigation_targets,
};
pub use error::{ConfigError, SequenceError, TransitionError, TransitionResult};
pub use geometry::Rect;
pub use input::ControllerInput;
pub use link::{DOC_SUFFIX, Disqualification, LinkSnapshot, is_qualifying, qualify};
pub use runtime::TransitionController;
pub use state::{ControllerState, SequencePhase, WaitingReason};
pub use trace::{TraceEvent, TraceLog};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        // 验证所有公共类型都可以正常使用
        let _cmd = Command::Navigate {
            href: "chapter2.html".to_string(),
        };

        let _input = ControllerInput::DocumentReady;

        let _waiting = WaitingReason::WaitForClick;

        let _state = ControllerState::new();

        let _config = TransitionConfig::default();
    }
}
