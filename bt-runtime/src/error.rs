//! # Error 模块
//!
//! 定义 bt-runtime 中使用的错误类型。
//!
//! 内容性输入（颜色、书脊文字）的缺失不走错误通道，
//! 统一按默认值降级。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 动画总时长为零
    #[error("动画总时长不能为 0")]
    ZeroDuration,
}

/// 序列执行错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// 状态不匹配
    #[error("当前状态不允许此操作：期望 {expected}，实际 {actual}")]
    StateMismatch { expected: String, actual: String },

    /// 无效的状态操作
    #[error("无效的状态操作: {message}")]
    InvalidState { message: String },
}

/// bt-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 序列执行错误
    #[error("序列执行错误: {0}")]
    Sequence(#[from] SequenceError),
}

/// Result 类型别名
pub type TransitionResult<T> = Result<T, TransitionError>;
