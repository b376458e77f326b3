//! # Sequence 模块
//!
//! 把序列阶段转换为 Command。
//!
//! ## 职责
//!
//! - 读取当前 [`SequencePhase`]
//! - 产生对应的 Command
//! - 决定下一个等待时长
//!
//! 阶段偏移的换算规则：Host 在每个阻塞点等待"相邻检查点的偏移差"，
//! 因此各阶段相对拦截时刻的绝对偏移与原时间线严格一致。

use std::time::Duration;

use crate::command::{Command, Stage};
use crate::config::TransitionConfig;
use crate::error::SequenceError;
use crate::state::{SequencePhase, WaitingReason};

/// 单步执行结果
pub struct StepResult {
    /// 产生的命令
    pub commands: Vec<Command>,
    /// 下一个等待状态
    pub waiting: WaitingReason,
    /// 下一个阶段
    pub next_phase: SequencePhase,
}

/// 推进序列一步
///
/// # 返回
///
/// - `Ok(Some(step))`: 本阶段有后续工作
/// - `Ok(None)`: 当前阶段没有可推进的工作（Boot / Idle / Navigated）
/// - `Err(_)`: 状态缺失（如待导航目标丢失）
pub fn advance(
    phase: SequencePhase,
    config: &TransitionConfig,
    pending_href: Option<&str>,
) -> Result<Option<StepResult>, SequenceError> {
    match phase {
        SequencePhase::Boot | SequencePhase::Idle | SequencePhase::Navigated => Ok(None),

        // 克隆挂载完成，进入阶段 1
        SequencePhase::Mounted => Ok(Some(enter_stage(Stage::first(), config))),

        SequencePhase::Staged(stage) => match stage.next() {
            Some(next) => Ok(Some(enter_stage(next, config))),

            // 最后一个阶段之后只剩导航
            None => {
                let href = pending_href.ok_or_else(|| SequenceError::InvalidState {
                    message: "待导航目标缺失".to_string(),
                })?;
                Ok(Some(StepResult {
                    commands: vec![Command::Navigate {
                        href: href.to_string(),
                    }],
                    waiting: WaitingReason::None,
                    next_phase: SequencePhase::Navigated,
                }))
            }
        },
    }
}

/// 进入指定阶段
fn enter_stage(stage: Stage, config: &TransitionConfig) -> StepResult {
    let mut commands = Vec::new();

    // 白闪与阶段 4 同刻触发，白闪在前
    if stage == Stage::Expand {
        commands.push(Command::ActivateFlash);
    }
    commands.push(Command::EnterStage { stage });

    StepResult {
        commands,
        waiting: WaitingReason::time(wait_after(stage, config)),
        next_phase: SequencePhase::Staged(stage),
    }
}

/// 进入阶段后到下一个检查点的等待时长
///
/// 中间阶段等相邻偏移差；最后一个阶段等到配置的总时长。
/// 总时长短于最后阶段偏移时饱和为零，导航不会先于任何阶段标记。
fn wait_after(stage: Stage, config: &TransitionConfig) -> Duration {
    match stage.next() {
        Some(next) => next.offset() - stage.offset(),
        None => config.animation_duration().saturating_sub(stage.offset()),
    }
}
