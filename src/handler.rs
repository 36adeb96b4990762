//! # 命令处理逻辑模块
//!
//! 包含处理 `hide` 和 `recover` 子命令的高级业务逻辑。
//! 本模块负责解析载体媒介、调用可选的加密层与核心隐写算法，
//! 以及向用户报告结果。核心产生的错误分类在此转换为可读消息。

use crate::cli::{HideArgs, RecoverArgs};
use crate::crypto;
use crate::medium::{self, Medium};
use anyhow::{Context, Result};
use colored::Colorize;
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责推断并校验载体媒介、按需加密载荷、调用核心嵌入算法，
/// 最后报告输出文件位置。
///
/// # Arguments
///
/// * `args` - 包含载体路径、明文与可选口令的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体文件的扩展名不受支持，或与显式声明的媒介矛盾。
/// * 输出文件已存在且未指定 `--force`。
/// * 载体容量不足以容纳载荷。
/// * 核心嵌入算法或底层编解码在执行过程中失败。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let medium = Medium::resolve(&args.file, args.medium).with_context(|| {
        format!(
            "Unable to determine the carrier medium of: {}",
            args.file.to_string_lossy().red().bold()
        )
    })?;

    let dest = args
        .dest
        .unwrap_or_else(|| collision_resistant_output(&args.file));
    ensure_writable(&dest, args.force)?;

    let payload = match &args.password {
        Some(password) => crypto::encrypt(&args.secret, password)
            .context("Failed to encrypt the secret before embedding.")?,
        None => args.secret,
    };

    medium::embed(medium, &args.file, &payload, &dest).with_context(|| {
        format!(
            "Failed to hide the secret in the {} carrier: {}",
            medium,
            args.file.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The secret has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责推断并校验载体媒介、调用核心提取算法、按需解密，
/// 最后打印恢复的文本或将其写入输出文件。
///
/// # Arguments
///
/// * `args` - 包含载体路径与可选口令的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体文件的扩展名不受支持，或与显式声明的媒介矛盾。
/// * 载体中没有隐藏数据（结束标记缺失）。
/// * 提供的口令错误或数据已被篡改。
/// * 无法写入到指定的输出文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let medium = Medium::resolve(&args.file, args.medium).with_context(|| {
        format!(
            "Unable to determine the carrier medium of: {}",
            args.file.to_string_lossy().red().bold()
        )
    })?;

    let recovered = medium::extract(medium, &args.file).with_context(|| {
        format!(
            "Failed to recover a secret from the {} carrier: {}",
            medium,
            args.file.to_string_lossy().red().bold()
        )
    })?;

    let recovered = match &args.password {
        Some(password) => crypto::decrypt(&recovered, password)
            .context("Failed to decrypt the recovered data.")?,
        None => recovered,
    };

    match &args.output {
        Some(path) => {
            ensure_writable(path, args.force)?;
            fs::write(path, &recovered).with_context(|| {
                format!(
                    "Unable to write to target text file: {}",
                    path.to_string_lossy().red().bold()
                )
            })?;
            println!(
                "The secret has been successfully recovered and saved: {}",
                path.to_string_lossy().green().bold()
            );
        }
        None => {
            println!("Recovered secret: {}", recovered.green().bold());
        }
    }

    Ok(())
}

/// 在输入文件旁生成抗冲突的输出文件名，保留原扩展名，
/// 以便后续 recover 时仍能按扩展名推断载体媒介。
fn collision_resistant_output(input: &Path) -> PathBuf {
    let mut tag = [0u8; 6];
    rand::rng().fill_bytes(&mut tag);
    let hex: String = tag.iter().map(|b| format!("{b:02x}")).collect();

    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    input.with_file_name(format!("processed_{hex}{ext}"))
}

/// 覆盖保护：目标已存在且未指定 `--force` 时拒绝写入。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {} \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_name_preserves_the_extension() {
        let out = collision_resistant_output(Path::new("/tmp/some/clip.y4m"));
        let name = out.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("processed_"));
        assert!(name.ends_with(".y4m"));
        assert_eq!(out.parent(), Some(Path::new("/tmp/some")));
    }

    #[test]
    fn default_output_names_do_not_collide() {
        let a = collision_resistant_output(Path::new("x.png"));
        let b = collision_resistant_output(Path::new("x.png"));
        assert_ne!(a, b);
    }
}
