//! # Color 模块
//!
//! 书籍显示颜色的解析与派生计算。
//!
//! ## 设计说明
//!
//! - 颜色来自链接元素的 `--book-color` 自定义属性，Host 以字符串形式捕获
//! - 解析失败不报错，回退到 [`DEFAULT_BOOK_COLOR`]（与原始行为一致）
//! - 深色/浅色变体按 srgb 线性混合计算，对应 CSS 的
//!   `color-mix(in srgb, C 70%, black)` 和 `color-mix(in srgb, C 85%, white)`

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 书籍颜色的默认值（未声明 `--book-color` 时使用）
pub const DEFAULT_BOOK_COLOR: Color = Color {
    r: 0x5b,
    g: 0x6a,
    b: 0x82,
};

/// 深色变体中基色所占的混合比例
const DARKEN_BASE_SHARE: f64 = 0.70;

/// 浅色变体中基色所占的混合比例
const LIGHTEN_BASE_SHARE: f64 = 0.85;

/// srgb 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// 红色通道
    pub r: u8,
    /// 绿色通道
    pub g: u8,
    /// 蓝色通道
    pub b: u8,
}

impl Color {
    /// 纯黑
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// 纯白
    pub const WHITE: Color = Color {
        r: 0xff,
        g: 0xff,
        b: 0xff,
    };

    /// 创建颜色
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 从字符串解析颜色（便捷方法）
    ///
    /// 支持 `#rrggbb` 和 `#rgb` 两种十六进制写法，忽略首尾空白。
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_str(s).ok()
    }

    /// 解析可选的颜色字符串，失败时回退到默认颜色
    ///
    /// 这是 Host 捕获 `--book-color` 后的标准入口：
    /// 属性缺失或值无法解析都静默降级。
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or(DEFAULT_BOOK_COLOR)
    }

    /// 按 srgb 线性混合两种颜色
    ///
    /// `self_share` 是本颜色所占比例（0.0..=1.0，越界会被截断），
    /// 等价于 `color-mix(in srgb, self <share*100>%, other)`。
    pub fn mix(self, other: Color, self_share: f64) -> Color {
        let share = self_share.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| -> u8 {
            (f64::from(a) * share + f64::from(b) * (1.0 - share)).round() as u8
        };
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }

    /// 深色变体（书脊/封面渐变的暗端）
    pub fn darkened(self) -> Color {
        self.mix(Color::BLACK, DARKEN_BASE_SHARE)
    }

    /// 浅色变体（书脊/封面渐变的亮端）
    pub fn lightened(self) -> Color {
        self.mix(Color::WHITE, LIGHTEN_BASE_SHARE)
    }

    /// CSS 十六进制表示（小写 `#rrggbb`）
    pub fn to_css(self) -> String {
        format!("{}", self)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hex = s.strip_prefix('#').ok_or(())?;
        if !hex.is_ascii() {
            return Err(());
        }

        let parse_channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| ());

        match hex.len() {
            6 => Ok(Color {
                r: parse_channel(&hex[0..2])?,
                g: parse_channel(&hex[2..4])?,
                b: parse_channel(&hex[4..6])?,
            }),
            // #rgb 展开为 #rrggbb
            3 => {
                let expand = |digit: &str| -> Result<u8, ()> {
                    let v = parse_channel(digit)?;
                    Ok(v * 16 + v)
                };
                Ok(Color {
                    r: expand(&hex[0..1])?,
                    g: expand(&hex[1..2])?,
                    b: expand(&hex[2..3])?,
                })
            }
            _ => Err(()),
        }
    }
}
