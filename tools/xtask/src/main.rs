//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 bt-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `shelf-check`: 检查书架页面（书籍锚点资格、目标文档是否存在）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use walkdir::WalkDir;

use bt_runtime::{DiagnosticResult, ShelfAnchor, audit_shelf, extract_navigation_targets};

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    let status = cmd.status();
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-runtime" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "bt-runtime", "--all-features", "--html"]);
            run(
                "cargo llvm-cov -p bt-runtime --all-features --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "cov-workspace" => {
            ensure_cargo_llvm_cov_available()?;

            // 说明：
            // - workspace 覆盖率不作为主目标，主要用于"趋势观察"
            // - 在口径上排除 tool crate（xtask）以免稀释信号
            let mut cov = Command::new("cargo");
            cov.args([
                "llvm-cov",
                "--workspace",
                "--exclude",
                "xtask",
                "--all-features",
                "--html",
            ]);
            run(
                "cargo llvm-cov --workspace --exclude xtask --all-features --html",
                &mut cov,
            )?;
        }
        "shelf-check" => {
            let mut path = None;
            let mut json = false;
            for arg in args {
                match arg.as_str() {
                    "--json" => json = true,
                    other => path = Some(other.to_string()),
                }
            }
            shelf_check(path.as_deref(), json)?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 bt-runtime 覆盖率报告
  cov-workspace   运行 workspace 覆盖率报告
  shelf-check     检查书架页面

SHELF-CHECK:
  cargo xtask shelf-check [path] [--json]

  不带参数：检查 site/ 下所有 .html 文件
  带路径参数：检查指定文件或目录
  --json：以 JSON 输出检查摘要

  检查内容：
    - 书籍锚点的拦截资格（href 缺失/后缀不符/外部链接）
    - 缺少 --book-color 声明
    - 合格目标文档是否存在

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo cov-runtime   -> cargo xtask cov-runtime
  cargo cov-workspace -> cargo xtask cov-workspace
  cargo shelf-check   -> cargo xtask shelf-check
"#
    );
}

//=============================================================================
// shelf-check 命令实现
//=============================================================================

/// 书架检查配置
struct ShelfCheckConfig {
    /// 页面目录（相对于 workspace root）
    site_dir: PathBuf,
}

impl Default for ShelfCheckConfig {
    fn default() -> Self {
        Self {
            site_dir: PathBuf::from("site"),
        }
    }
}

/// 书架检查结果
struct ShelfCheckResult {
    /// 检查的页面数量
    pages_checked: usize,
    /// 诊断结果
    diagnostics: DiagnosticResult,
    /// 缺失的目标文档
    missing_targets: Vec<MissingTarget>,
}

/// 缺失的目标文档信息
struct MissingTarget {
    page_id: String,
    href: String,
}

/// 执行书架检查
fn shelf_check(path: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = ShelfCheckConfig::default();

    // 确定要检查的文件
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_shelf_files(&path)
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            if !config.site_dir.exists() {
                anyhow::bail!(
                    "默认页面目录不存在: {}\n请在 workspace 根目录运行，或指定页面路径",
                    config.site_dir.display()
                );
            }
            collect_shelf_files(&config.site_dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到页面文件（.html）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个页面文件...\n", files.len());

    let mut result = ShelfCheckResult {
        pages_checked: 0,
        diagnostics: DiagnosticResult::new(),
        missing_targets: Vec::new(),
    };

    // 检查每个页面
    for file in &files {
        check_shelf_file(file, &mut result)?;
    }

    // 输出结果
    if json {
        print_check_result_json(&result)?;
    } else {
        print_check_result(&result);
    }

    // 如果有错误则返回失败
    if result.diagnostics.has_errors() {
        anyhow::bail!("书架检查发现错误");
    }

    Ok(())
}

/// 收集目录下的所有页面文件
fn collect_shelf_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "html"))
        .collect();
    files.sort();
    files
}

/// 检查单个页面文件
fn check_shelf_file(file: &Path, result: &mut ShelfCheckResult) -> anyhow::Result<()> {
    let page_id = file.display().to_string();
    result.pages_checked += 1;

    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("无法读取文件 {page_id}: {e}"))?;

    // 提取书籍锚点并审计
    let anchors = extract_book_anchors(&content);
    result.diagnostics.merge(audit_shelf(&page_id, &anchors));

    // 检查合格目标文档是否存在（相对于页面所在目录）
    let base = file.parent().unwrap_or_else(|| Path::new("."));
    for target in extract_navigation_targets(&anchors) {
        if !base.join(&target.href).exists() {
            result.missing_targets.push(MissingTarget {
                page_id: page_id.clone(),
                href: target.href,
            });
        }
    }

    Ok(())
}

/// 输出检查结果
fn print_check_result(result: &ShelfCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个页面", result.pages_checked);
    eprintln!();

    // 输出诊断
    for diag in &result.diagnostics.diagnostics {
        eprintln!("{}", diag);
    }

    // 输出缺失目标
    for mt in &result.missing_targets {
        eprintln!("[WARN] {}: 目标文档不存在 {}", mt.page_id, mt.href);
    }

    // 汇总
    let error_count = result.diagnostics.error_count();
    let warn_count = result.diagnostics.warn_count() + result.missing_targets.len();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}

/// 以 JSON 输出检查摘要
fn print_check_result_json(result: &ShelfCheckResult) -> anyhow::Result<()> {
    let diagnostics: Vec<serde_json::Value> = result
        .diagnostics
        .diagnostics
        .iter()
        .map(|d| {
            serde_json::json!({
                "level": d.level.to_string(),
                "page": d.page_id,
                "line": d.line,
                "message": d.message,
                "detail": d.detail,
            })
        })
        .collect();

    let missing: Vec<serde_json::Value> = result
        .missing_targets
        .iter()
        .map(|mt| serde_json::json!({ "page": mt.page_id, "href": mt.href }))
        .collect();

    let report = serde_json::json!({
        "pages_checked": result.pages_checked,
        "errors": result.diagnostics.error_count(),
        "warnings": result.diagnostics.warn_count() + result.missing_targets.len(),
        "diagnostics": diagnostics,
        "missing_targets": missing,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

//=============================================================================
// 书籍锚点提取
//=============================================================================

/// 从页面内容提取所有书籍锚点（class 含 `book` 的 `<a>` 标签）
///
/// 轻量扫描器：按引号感知的方式找标签边界并解析属性，
/// 不构建完整 DOM。行号从 1 开始。
fn extract_book_anchors(html: &str) -> Vec<ShelfAnchor> {
    let mut anchors = Vec::new();
    let bytes = html.as_bytes();
    let mut pos = 0;

    while let Some(start) = find_anchor_open(html, pos) {
        let Some(end) = find_tag_end(bytes, start) else {
            break;
        };

        // "<a" 之后、">" 之前是属性区
        let attrs = parse_attributes(&html[start + 2..end]);
        let line = html[..start].matches('\n').count() + 1;

        let classes = attr_value(&attrs, "class").unwrap_or_default();
        if classes.split_whitespace().any(|c| c == "book") {
            let style = attr_value(&attrs, "style").unwrap_or_default();
            let mut anchor = ShelfAnchor::new(attr_value(&attrs, "href")).with_line(line);
            if style.contains("--book-color") {
                anchor = anchor.with_color();
            }
            anchors.push(anchor);
        }

        pos = end + 1;
    }

    anchors
}

/// 找下一个 `<a` 标签起点（后随空白或标签结束）
fn find_anchor_open(html: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(found) = html[pos..].find("<a") {
        let start = pos + found;
        let after = html.as_bytes().get(start + 2);
        if matches!(after, Some(b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/')) {
            return Some(start);
        }
        pos = start + 2;
    }
    None
}

/// 找标签的结束 `>`（跳过引号内的内容）
fn find_tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (offset, &b) in bytes[start..].iter().enumerate() {
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(start + offset),
                _ => {}
            },
        }
    }
    None
}

/// 解析属性区为 (名, 值) 列表
///
/// 属性名小写化；无值属性的值为 None。
fn parse_attributes(raw: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    let mut chars = raw.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() || c == '/' {
            chars.next();
            continue;
        }

        // 属性名
        let mut name_end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() || c == '=' {
                break;
            }
            name_end = i + c.len_utf8();
            chars.next();
        }
        let name = raw[start..name_end].to_ascii_lowercase();

        // 跳过名后空白
        while let Some(&(_, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
            } else {
                break;
            }
        }

        // 值（可选）
        let value = if let Some(&(_, '=')) = chars.peek() {
            chars.next();
            // 跳过等号后空白
            while let Some(&(_, c)) = chars.peek() {
                if c.is_whitespace() {
                    chars.next();
                } else {
                    break;
                }
            }
            match chars.peek().copied() {
                Some((_, q)) if q == '"' || q == '\'' => {
                    chars.next();
                    let value_start = chars.peek().map(|&(i, _)| i).unwrap_or(raw.len());
                    let mut value_end = value_start;
                    for (i, c) in chars.by_ref() {
                        if c == q {
                            break;
                        }
                        value_end = i + c.len_utf8();
                    }
                    Some(raw[value_start..value_end].to_string())
                }
                Some((value_start, _)) => {
                    let mut value_end = value_start;
                    while let Some(&(i, c)) = chars.peek() {
                        if c.is_whitespace() {
                            break;
                        }
                        value_end = i + c.len_utf8();
                        chars.next();
                    }
                    Some(raw[value_start..value_end].to_string())
                }
                None => Some(String::new()),
            }
        } else {
            None
        };

        if !name.is_empty() {
            attrs.push((name, value));
        }
    }

    attrs
}

/// 按名取属性值
fn attr_value(attrs: &[(String, Option<String>)], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|(n, _)| n == name)
        .and_then(|(_, v)| v.clone())
}
