//! # host-cli - 无头宿主
//!
//! 在终端里完整走一遍开书过渡契约：挂载过渡层、扫描书架、
//! 拦截点击、按 `WaitForTime` 真实计时推进阶段、最后"导航"。
//!
//! ## 用法
//!
//! ```text
//! host-cli [shelf.json] [href] [--instant] [--debug]
//! ```
//!
//! - 不带参数：使用内置演示书架，点击第一本合格书籍
//! - `shelf.json`：书架描述文件（`{ "page": ..., "links": [...] }`）
//! - `href`：指定点击哪本书
//! - `--instant`：跳过真实等待（阶段仍按顺序推进）
//! - `--debug`：打开 Runtime 的放行记录

mod executor;
mod page;

use std::path::Path;

use tracing::info;

use bt_runtime::{
    ControllerInput, LinkSnapshot, Rect, TransitionController, WaitingReason, is_qualifying,
};

use crate::executor::CommandExecutor;
use crate::page::{PageModel, Shelf};

/// 命令行选项
struct Options {
    shelf_path: Option<String>,
    href: Option<String>,
    instant: bool,
    debug: bool,
}

fn parse_args() -> anyhow::Result<Options> {
    let mut options = Options {
        shelf_path: None,
        href: None,
        instant: false,
        debug: false,
    };

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--instant" => options.instant = true,
            "--debug" => options.debug = true,
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                anyhow::bail!("未知选项: {other}");
            }
            // 第一个位置参数是书架文件，第二个是 href
            other if options.shelf_path.is_none() && other.ends_with(".json") => {
                options.shelf_path = Some(other.to_string());
            }
            other => options.href = Some(other.to_string()),
        }
    }

    Ok(options)
}

fn print_help() {
    eprintln!(
        r#"host-cli - 开书过渡无头宿主

USAGE:
  host-cli [shelf.json] [href] [--instant] [--debug]

  shelf.json   书架描述文件；缺省使用内置演示书架
  href         点击的目标；缺省点击第一本合格书籍
  --instant    跳过真实等待
  --debug      打开 Runtime 的放行记录
"#
    );
}

/// 内置演示书架
fn demo_shelf() -> Shelf {
    Shelf {
        page: "demo-shelf".to_string(),
        links: vec![
            LinkSnapshot::new("chapter1.html", Rect::new(40.0, 120.0, 38.0, 220.0))
                .with_color("#8b4513")
                .with_spine_label("第一章"),
            LinkSnapshot::new("chapter2.html", Rect::new(86.0, 120.0, 42.0, 220.0))
                .with_color("#5b6a82")
                .with_spine_label("第二章"),
            LinkSnapshot::new("https://example.com", Rect::new(136.0, 120.0, 38.0, 220.0))
                .with_spine_label("外部站点"),
            LinkSnapshot::new("notes.pdf", Rect::new(182.0, 120.0, 38.0, 220.0))
                .with_spine_label("笔记"),
        ],
    }
}

fn load_shelf(path: &str) -> anyhow::Result<Shelf> {
    let content = std::fs::read_to_string(Path::new(path))
        .map_err(|e| anyhow::anyhow!("无法读取书架文件 {path}: {e}"))?;
    let shelf: Shelf = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("书架文件格式错误 {path}: {e}"))?;
    Ok(shelf)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let options = parse_args()?;

    let shelf = match options.shelf_path.as_deref() {
        Some(path) => load_shelf(path)?,
        None => demo_shelf(),
    };

    let mut controller = TransitionController::with_defaults();
    controller.config().validate()?;
    controller.set_debug(options.debug);

    let mut executor = CommandExecutor::new();
    let mut page = PageModel::new();

    // 页面就绪：挂载过渡层
    let (commands, _) = controller.tick(Some(ControllerInput::document_ready()))?;
    executor.execute_batch(&commands, &mut page);

    // 初始化扫描：只有合格链接会被挂接拦截
    let armed: Vec<&LinkSnapshot> = shelf
        .links
        .iter()
        .filter(|link| is_qualifying(&link.href))
        .collect();
    info!(
        page = %shelf.page,
        total = shelf.links.len(),
        armed = armed.len(),
        "书架扫描完成"
    );

    // 选择点击目标
    let clicked = match options.href.as_deref() {
        Some(href) => shelf
            .links
            .iter()
            .find(|link| link.href == href)
            .ok_or_else(|| anyhow::anyhow!("书架上没有 href 为 {href} 的链接"))?,
        None => *armed
            .first()
            .ok_or_else(|| anyhow::anyhow!("书架上没有合格链接"))?,
    };
    info!(href = %clicked.href, "点击");

    // 点击拦截
    let (commands, mut waiting) =
        controller.tick(Some(ControllerInput::click(clicked.clone())))?;
    if commands.is_empty() {
        println!("放行：{}（按默认导航处理）", clicked.href);
        return Ok(());
    }
    executor.execute_batch(&commands, &mut page);

    // 驱动时间线直到导航
    while let WaitingReason::WaitForTime(duration) = waiting {
        if !options.instant {
            tokio::time::sleep(duration).await;
        }
        let (commands, next) = controller.tick(Some(ControllerInput::elapsed()))?;
        executor.execute_batch(&commands, &mut page);
        waiting = next;
    }

    // 汇总
    println!("─────────────────────────────────────────────────────");
    if let Some(overlay) = &page.overlay {
        println!("过渡容器: {}", overlay.class_list());
    }
    if let Some(book) = page.mounted_book() {
        println!("克隆: {}", book.class_list());
    }
    match &page.location {
        Some(href) => println!("已导航到: {href}"),
        None => println!("未发生导航"),
    }

    println!();
    println!("序列事件:");
    for event in controller.trace().events() {
        println!("  {:?}", event);
    }

    Ok(())
}
