//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::medium::Medium;
use clap::Parser;
use std::path::PathBuf;

/// 一款多载体 LSB 隐写命令行工具，可在无损图像、WAV 音频、Y4M 视频与文档中隐藏或恢复文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款多载体 LSB 隐写命令行工具，可在无损图像 (PNG, BMP 等)、WAV 音频、Y4M 视频与文档 (txt, docx, pdf) 中隐藏或恢复文本，并支持口令加密。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏) 和 recover (恢复)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 把一段文本隐藏进载体文件。
    Hide(HideArgs),

    /// 从经过隐写的载体文件中恢复隐藏的文本。
    Recover(RecoverArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的载体文件路径（图像 / WAV / Y4M / txt / docx / pdf）。
    #[arg(short, long)]
    pub file: PathBuf,

    /// 要隐藏的文本内容。
    #[arg(short, long)]
    pub secret: String,

    /// 隐写完成后保存结果的输出路径。缺省时在输入文件旁生成
    /// 带随机后缀、保留原扩展名的文件名。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 可选口令。提供时文本会先经对称加密再嵌入。
    #[arg(short, long)]
    pub password: Option<String>,

    /// 显式声明载体媒介，必须与文件扩展名一致。
    #[arg(short, long, value_enum)]
    pub medium: Option<Medium>,

    /// 允许覆盖已存在的输出文件。
    #[arg(long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的载体文件路径。
    #[arg(short, long)]
    pub file: PathBuf,

    /// 恢复文本后保存内容的文件路径。缺省时直接打印到标准输出。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 可选口令。提供时提取结果会先解密再返回。
    #[arg(short, long)]
    pub password: Option<String>,

    /// 显式声明载体媒介，必须与文件扩展名一致。
    #[arg(short, long, value_enum)]
    pub medium: Option<Medium>,

    /// 允许覆盖已存在的输出文件。
    #[arg(long)]
    pub force: bool,
}
