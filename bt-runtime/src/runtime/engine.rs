//! # Engine 模块
//!
//! 过渡控制器核心执行引擎。
//!
//! ## 执行模型
//!
//! ```text
//! tick(input) -> (Vec<Command>, WaitingReason)
//! ```
//!
//! 1. 处理输入（就绪 / 点击 / 计时到点）
//! 2. 若仍在等待，直接返回
//! 3. 否则推进序列直到下一个阻塞点
//! 4. 返回执行过程中产生的 Command 和新的等待状态

use crate::book::AnimatedBook;
use crate::command::{Command, Stage};
use crate::config::TransitionConfig;
use crate::error::SequenceError;
use crate::input::ControllerInput;
use crate::link::{self, LinkSnapshot};
use crate::runtime::sequence;
use crate::state::{ControllerState, SequencePhase, WaitingReason};
use crate::trace::{TraceEvent, TraceLog};

/// 过渡控制器
///
/// 这是 bt-runtime 的核心类型，负责驱动开书序列。
///
/// # 使用示例
///
/// ```ignore
/// let mut controller = TransitionController::with_defaults();
///
/// // 页面就绪：挂载过渡层
/// let (commands, _) = controller.tick(Some(ControllerInput::document_ready()))?;
///
/// loop {
///     let (commands, waiting) = controller.tick(input)?;
///
///     // Host 执行 commands...
///
///     input = match waiting {
///         WaitingReason::WaitForClick => wait_for_click(),
///         WaitingReason::WaitForTime(duration) => {
///             sleep(duration);
///             Some(ControllerInput::elapsed())
///         }
///         WaitingReason::None => break,
///     };
/// }
/// ```
pub struct TransitionController {
    /// 注入的配置
    config: TransitionConfig,
    /// 运行时状态
    state: ControllerState,
    /// 序列事件记录
    trace: TraceLog,
}

impl TransitionController {
    /// 创建新的控制器实例
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            state: ControllerState::new(),
            trace: TraceLog::new(),
        }
    }

    /// 用默认配置创建控制器
    pub fn with_defaults() -> Self {
        Self::new(TransitionConfig::default())
    }

    /// 核心驱动函数
    ///
    /// 根据输入推进序列，返回产生的 Command 和新的等待状态。
    ///
    /// # 约定
    ///
    /// - 点击输入返回**空命令列表**意味着放行：Host 不阻止默认导航
    /// - 返回 `WaitForTime` 后，Host 等待指定时长再回送 `Elapsed`
    pub fn tick(
        &mut self,
        input: Option<ControllerInput>,
    ) -> Result<(Vec<Command>, WaitingReason), SequenceError> {
        let mut commands = Vec::new();

        // 1. 处理输入
        if let Some(input) = input {
            self.handle_input(input, &mut commands)?;
        }

        // 2. 如果仍在等待，直接返回
        if self.state.waiting.is_waiting() {
            return Ok((commands, self.state.waiting.clone()));
        }

        // 3. 推进序列直到阻塞或终结
        loop {
            let step = sequence::advance(
                self.state.phase,
                &self.config,
                self.state.pending_href.as_deref(),
            )?;
            let Some(step) = step else {
                // 当前阶段没有可推进的工作
                return Ok((commands, self.state.waiting.clone()));
            };

            self.state.phase = step.next_phase;

            for cmd in &step.commands {
                self.record_trace(cmd);
            }
            commands.extend(step.commands);

            if step.waiting.is_waiting() {
                self.state.wait(step.waiting.clone());
                return Ok((commands, step.waiting));
            }

            if self.state.phase.is_terminal() {
                self.state.finish();
                return Ok((commands, WaitingReason::None));
            }
        }
    }

    /// 处理单个输入
    fn handle_input(
        &mut self,
        input: ControllerInput,
        commands: &mut Vec<Command>,
    ) -> Result<(), SequenceError> {
        match input {
            ControllerInput::DocumentReady => {
                // 初始化只执行一次
                if self.state.phase != SequencePhase::Boot {
                    return Err(SequenceError::StateMismatch {
                        expected: "Boot".to_string(),
                        actual: format!("{:?}", self.state.phase),
                    });
                }

                for cmd in [Command::MountOverlay, Command::MountFlash] {
                    self.record_trace(&cmd);
                    commands.push(cmd);
                }
                self.state.arm();
                Ok(())
            }

            ControllerInput::Click { link } => {
                self.handle_click(link, commands);
                Ok(())
            }

            ControllerInput::Elapsed => {
                // 只解除时间等待；序列取消后滞留的计时回送直接忽略
                if matches!(self.state.waiting, WaitingReason::WaitForTime(_)) {
                    self.state.clear_wait();
                }
                Ok(())
            }
        }
    }

    /// 处理书籍链接点击
    ///
    /// 点击从不报错：不符合条件就放行（不产生命令），
    /// Host 据此让浏览器执行默认导航。
    fn handle_click(&mut self, link: LinkSnapshot, commands: &mut Vec<Command>) {
        // 初始化未执行：过渡层不存在，静默不动作
        if self.state.phase == SequencePhase::Boot {
            return;
        }

        // 导航指令已发出，页面即将卸载
        if self.state.phase.is_terminal() {
            self.trace_pass_through(&link.href, "导航已发出");
            return;
        }

        if !self.config.is_enabled() {
            self.trace_pass_through(&link.href, "过渡已禁用");
            return;
        }

        if let Err(reason) = link::qualify(&link.href) {
            self.trace_pass_through(&link.href, reason.to_string());
            return;
        }

        // 新的激活取消在途序列
        if self.state.phase.is_in_flight() {
            let cmd = Command::ResetOverlay;
            self.record_trace(&cmd);
            commands.push(cmd);
        }

        let book = AnimatedBook::from_link(&link);
        self.state.begin_sequence(link.href);

        for cmd in [
            Command::MountBook { book },
            Command::ActivateOverlay,
            Command::MarkOpening,
        ] {
            self.record_trace(&cmd);
            commands.push(cmd);
        }

        // 拦截时刻 → 阶段 1
        self.state.wait(WaitingReason::time(Stage::first().offset()));
    }

    /// 获取当前状态
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// 获取当前等待状态
    pub fn waiting(&self) -> &WaitingReason {
        &self.state.waiting
    }

    /// 获取配置
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// 启用过渡（下一次点击生效）
    pub fn enable(&mut self) {
        self.config.enable();
    }

    /// 禁用过渡（下一次点击起全部放行）
    pub fn disable(&mut self) {
        self.config.disable();
    }

    /// 设置 debug 开关（对后续记录立即生效）
    pub fn set_debug(&mut self, debug: bool) {
        self.config.set_debug(debug);
    }

    /// 获取序列事件记录
    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    /// 序列是否已终结（导航指令已发出）
    pub fn is_finished(&self) -> bool {
        self.state.phase.is_terminal()
    }

    /// 根据 Command 记录序列事件
    fn record_trace(&mut self, cmd: &Command) {
        match cmd {
            Command::MountOverlay => {
                self.trace.push(TraceEvent::Initialized);
            }
            Command::MountBook { .. } => {
                let href = self.state.pending_href.clone().unwrap_or_default();
                self.trace.push(TraceEvent::sequence_started(href));
            }
            Command::EnterStage { stage } => {
                self.trace.push(TraceEvent::stage_entered(*stage));
            }
            Command::ActivateFlash => {
                self.trace.push(TraceEvent::flash_activated());
            }
            Command::Navigate { href } => {
                self.trace.push(TraceEvent::navigated(
                    href.clone(),
                    self.config.animation_duration_ms(),
                ));
            }
            Command::ResetOverlay => {
                let href = self.state.pending_href.clone().unwrap_or_default();
                self.trace.push(TraceEvent::sequence_cancelled(href));
            }
            // 其余指令不记录（MountFlash、ActivateOverlay、MarkOpening）
            _ => {}
        }
    }

    /// 记录放行决策（仅 debug 开关打开时）
    fn trace_pass_through(&mut self, href: &str, reason: impl Into<String>) {
        if self.config.is_debug() {
            self.trace.push(TraceEvent::pass_through(href, reason));
        }
    }
}
