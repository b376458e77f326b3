//! # State 模块
//!
//! 定义 Runtime 的运行时状态和等待模型。
//!
//! ## 设计原则
//!
//! - 所有状态必须**显式建模**
//! - 所有状态必须**可序列化**（便于观测与宿主调试）
//! - 不允许隐式全局状态

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::Stage;

/// 等待原因
///
/// Runtime 在执行过程中进入等待状态，需要特定输入才能继续。
/// Host 根据此状态决定下一步做什么。
///
/// # 状态转换
///
/// ```text
/// None          -> 没有后续工作（启动前 / 导航后）
/// WaitForClick  -> 等待书籍链接被点击
/// WaitForTime   -> Host 等待指定时长后回送 Elapsed
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WaitingReason {
    /// 没有后续工作
    None,

    /// 等待书籍链接被点击
    WaitForClick,

    /// 等待指定时长
    ///
    /// Host 获取此状态后，等待指定时长再回送 `Elapsed`。
    /// Runtime 不需要知道真实时间流逝。
    WaitForTime(Duration),
}

impl WaitingReason {
    /// 是否处于等待状态
    pub fn is_waiting(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// 创建等待点击状态
    pub fn click() -> Self {
        Self::WaitForClick
    }

    /// 创建等待时间状态
    pub fn time(duration: Duration) -> Self {
        Self::WaitForTime(duration)
    }
}

impl Default for WaitingReason {
    fn default() -> Self {
        Self::None
    }
}

/// 开书序列的执行阶段
///
/// ```text
/// Boot ──DocumentReady──► Idle ──合格点击──► Mounted ──计时──► Staged(1..4) ──计时──► Navigated
///                          ▲                                     │
///                          └───────── 新的合格点击取消在途序列 ───┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequencePhase {
    /// 初始化尚未执行（过渡层不存在）
    Boot,
    /// 过渡层已挂载，等待点击
    Idle,
    /// 克隆已挂载，尚未进入阶段 1
    Mounted,
    /// 处于某个标记阶段
    Staged(Stage),
    /// 已发出导航指令，序列结束
    Navigated,
}

impl SequencePhase {
    /// 是否有在途序列（克隆已挂载但尚未导航）
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Mounted | Self::Staged(_))
    }

    /// 序列是否已终结
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Navigated)
    }
}

/// Runtime 状态
///
/// 这是 Runtime 的**唯一可变状态**。
///
/// # 设计说明
///
/// - `phase`：序列执行阶段
/// - `waiting`：当前等待状态
/// - `pending_href`：拦截后待导航的目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    /// 序列执行阶段
    pub phase: SequencePhase,

    /// 当前等待状态
    pub waiting: WaitingReason,

    /// 待导航的目标 `href`
    pub pending_href: Option<String>,
}

impl ControllerState {
    /// 创建初始状态（初始化尚未执行）
    pub fn new() -> Self {
        Self {
            phase: SequencePhase::Boot,
            waiting: WaitingReason::None,
            pending_href: None,
        }
    }

    /// 进入等待状态
    pub fn wait(&mut self, reason: WaitingReason) {
        self.waiting = reason;
    }

    /// 清除等待状态
    pub fn clear_wait(&mut self) {
        self.waiting = WaitingReason::None;
    }

    /// 初始化完成，转入待命
    pub fn arm(&mut self) {
        self.phase = SequencePhase::Idle;
        self.waiting = WaitingReason::WaitForClick;
        self.pending_href = None;
    }

    /// 开始新的开书序列
    pub fn begin_sequence(&mut self, href: impl Into<String>) {
        self.phase = SequencePhase::Mounted;
        self.pending_href = Some(href.into());
    }

    /// 序列终结（导航指令已发出）
    pub fn finish(&mut self) {
        self.phase = SequencePhase::Navigated;
        self.waiting = WaitingReason::None;
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}
