//! # Config 模块
//!
//! 过渡行为的注入式配置。
//!
//! ## 设计说明
//!
//! - 配置在构造 Controller 时注入，外部只能通过访问器方法修改
//! - `enable`/`disable`/`set_debug` 保持原有开关契约：
//!   开关在下一次点击生效，debug 对后续记录立即生效
//! - 阶段偏移**不在**配置之列：它们是与外部样式规则的契约
//!   （见 [`crate::command::Stage`]），可配置的只有导航总时长

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 默认动画总时长（毫秒），即点击到导航的间隔
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 3000;

/// 过渡配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// 动画总时长（毫秒）
    animation_duration_ms: u64,
    /// 是否启用过渡
    enable_transition: bool,
    /// 是否记录放行决策
    debug: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            enable_transition: true,
            debug: false,
        }
    }
}

impl TransitionConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置动画总时长（构造用）
    pub fn with_animation_duration(mut self, duration: Duration) -> Self {
        self.set_animation_duration(duration);
        self
    }

    /// 动画总时长
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// 动画总时长（毫秒）
    pub fn animation_duration_ms(&self) -> u64 {
        self.animation_duration_ms
    }

    /// 设置动画总时长
    pub fn set_animation_duration(&mut self, duration: Duration) {
        self.animation_duration_ms = duration.as_millis() as u64;
    }

    /// 启用过渡
    pub fn enable(&mut self) {
        self.enable_transition = true;
    }

    /// 禁用过渡（点击全部放行）
    pub fn disable(&mut self) {
        self.enable_transition = false;
    }

    /// 过渡是否启用
    pub fn is_enabled(&self) -> bool {
        self.enable_transition
    }

    /// 设置 debug 开关
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// debug 开关是否打开
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.animation_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(())
    }
}
