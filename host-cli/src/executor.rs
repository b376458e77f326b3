//! # Command Executor 模块
//!
//! Command 执行器，负责将 Runtime 发出的 Command 转换为页面模型变更。
//!
//! ## 设计说明
//!
//! - 执行器不做时序决策，只按指令更新 [`PageModel`]
//! - 过渡层缺失时按原始语义静默跳过（不报错、不导航）
//! - 每条指令都是幂等的类名/节点变更

use tracing::{debug, warn};

use bt_runtime::{Command, book::class};

use crate::page::{Element, PageModel};

/// Command 执行器
pub struct CommandExecutor;

impl CommandExecutor {
    /// 创建新的 Command 执行器
    pub fn new() -> Self {
        Self
    }

    /// 执行单个 Command
    pub fn execute(&mut self, command: &Command, page: &mut PageModel) {
        match command {
            Command::MountOverlay => {
                page.mount_overlay();
                debug!("过渡容器已挂载");
            }

            Command::MountFlash => {
                page.mount_flash();
                debug!("白闪节点已挂载");
            }

            Command::MountBook { book } => {
                let Some(overlay) = page.overlay.as_mut() else {
                    // 过渡层缺失：静默不动作
                    warn!("过渡容器缺失，跳过克隆挂载");
                    return;
                };
                overlay
                    .children
                    .push(Element::from_node(&book.structure()));
                debug!(
                    label = %book.spine_label,
                    color = %book.palette.base,
                    "克隆已挂载"
                );
            }

            Command::ActivateOverlay => {
                if let Some(overlay) = page.overlay.as_mut() {
                    overlay.add_marker(class::ACTIVE);
                }
            }

            Command::MarkOpening => {
                page.link_opening = true;
            }

            Command::EnterStage { stage } => {
                if let Some(book) = page.mounted_book_mut() {
                    book.add_marker(stage.marker_class());
                    debug!(stage = stage.index(), class = stage.marker_class(), "进入阶段");
                }
            }

            Command::ActivateFlash => {
                if let Some(flash) = page.flash.as_mut() {
                    flash.add_marker(class::ACTIVE);
                    debug!("白闪激活");
                }
            }

            Command::Navigate { href } => {
                page.location = Some(href.clone());
            }

            Command::ResetOverlay => {
                if let Some(overlay) = page.overlay.as_mut() {
                    overlay.children.clear();
                    overlay.remove_marker(class::ACTIVE);
                }
                if let Some(flash) = page.flash.as_mut() {
                    flash.remove_marker(class::ACTIVE);
                }
                page.link_opening = false;
                debug!("过渡层已清理");
            }
        }
    }

    /// 批量执行 Commands
    pub fn execute_batch(&mut self, commands: &[Command], page: &mut PageModel) {
        for command in commands {
            self.execute(command, page);
        }
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}
