//! # Trace 模块
//!
//! 序列事件记录，承接原调试日志的职责。
//!
//! ## 设计原则
//!
//! - 序列里程碑（开始、阶段、白闪、导航、取消）始终记录
//! - 放行决策只在 debug 开关打开时记录
//! - 事件携带计划偏移而非墙钟时间，保证可确定性断言
//! - 有界存储，防止长驻页面上的内存增长

use serde::{Deserialize, Serialize};

use crate::command::Stage;

/// 序列事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TraceEvent {
    /// 过渡层挂载完成
    Initialized,

    /// 开书序列开始（克隆已挂载）
    SequenceStarted {
        /// 拦截的目标 `href`
        href: String,
    },

    /// 进入标记阶段
    StageEntered {
        /// 进入的阶段
        stage: Stage,
        /// 相对拦截时刻的计划偏移（毫秒）
        offset_ms: u64,
    },

    /// 白闪激活
    FlashActivated {
        /// 相对拦截时刻的计划偏移（毫秒）
        offset_ms: u64,
    },

    /// 导航指令已发出
    Navigated {
        /// 目标 `href`
        href: String,
        /// 相对拦截时刻的计划偏移（毫秒）
        offset_ms: u64,
    },

    /// 在途序列被新的激活取消
    SequenceCancelled {
        /// 被取消序列的目标 `href`
        href: String,
    },

    /// 点击被放行（仅 debug 开关打开时记录）
    PassThrough {
        /// 点击链接的 `href`
        href: String,
        /// 放行原因
        reason: String,
    },
}

impl TraceEvent {
    /// 创建序列开始事件
    pub fn sequence_started(href: impl Into<String>) -> Self {
        Self::SequenceStarted { href: href.into() }
    }

    /// 创建阶段进入事件
    pub fn stage_entered(stage: Stage) -> Self {
        Self::StageEntered {
            stage,
            offset_ms: stage.offset_ms(),
        }
    }

    /// 创建白闪事件
    pub fn flash_activated() -> Self {
        Self::FlashActivated {
            offset_ms: Stage::Expand.offset_ms(),
        }
    }

    /// 创建导航事件
    pub fn navigated(href: impl Into<String>, offset_ms: u64) -> Self {
        Self::Navigated {
            href: href.into(),
            offset_ms,
        }
    }

    /// 创建取消事件
    pub fn sequence_cancelled(href: impl Into<String>) -> Self {
        Self::SequenceCancelled { href: href.into() }
    }

    /// 创建放行事件
    pub fn pass_through(href: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PassThrough {
            href: href.into(),
            reason: reason.into(),
        }
    }
}

/// 序列事件记录容器
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceLog {
    /// 事件列表（按发生顺序）
    events: Vec<TraceEvent>,
    /// 最大记录数
    max_events: usize,
}

impl TraceLog {
    /// 创建新的记录容器
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            max_events: 256,
        }
    }

    /// 设置最大记录数
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// 添加事件
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);

        // 超过上限时移除最早的事件
        while self.events.len() > self.max_events {
            self.events.remove(0);
        }
    }

    /// 获取所有事件
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// 最近一个事件
    pub fn last(&self) -> Option<&TraceEvent> {
        self.events.last()
    }

    /// 已记录的阶段进入次数
    pub fn stage_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::StageEntered { .. }))
            .count()
    }

    /// 清空记录
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// 事件总数
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for TraceLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_basic() {
        let mut trace = TraceLog::new();
        assert!(trace.is_empty());

        trace.push(TraceEvent::sequence_started("chapter2.html"));
        trace.push(TraceEvent::stage_entered(Stage::SlideOut));
        trace.push(TraceEvent::stage_entered(Stage::MoveToCenter));

        assert_eq!(trace.len(), 3);
        assert_eq!(trace.stage_count(), 2);
        assert_eq!(
            trace.last(),
            Some(&TraceEvent::StageEntered {
                stage: Stage::MoveToCenter,
                offset_ms: 600,
            })
        );
    }

    #[test]
    fn test_stage_event_offsets() {
        assert_eq!(
            TraceEvent::stage_entered(Stage::Expand),
            TraceEvent::StageEntered {
                stage: Stage::Expand,
                offset_ms: 2500,
            }
        );
        assert_eq!(
            TraceEvent::flash_activated(),
            TraceEvent::FlashActivated { offset_ms: 2500 }
        );
    }

    #[test]
    fn test_trace_max_events() {
        let mut trace = TraceLog::new().with_max_events(3);

        for i in 0..5 {
            trace.push(TraceEvent::sequence_started(format!("page{}.html", i)));
        }

        assert_eq!(trace.len(), 3);
        // 保留最后 3 条
        assert_eq!(
            trace.events()[0],
            TraceEvent::sequence_started("page2.html")
        );
    }

    #[test]
    fn test_trace_serialization() {
        let mut trace = TraceLog::new();
        trace.push(TraceEvent::sequence_started("chapter2.html"));
        trace.push(TraceEvent::pass_through("https://example.com", "绝对 URL"));

        let json = serde_json::to_string(&trace).unwrap();
        let loaded: TraceLog = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.len(), 2);
    }
}
