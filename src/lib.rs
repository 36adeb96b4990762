//! # lsb_stash 库
//!
//! 本库包含多载体 LSB 隐写工具的核心逻辑。

// 声明库包含的所有模块。

pub mod bits;
pub mod carrier;
pub mod cli;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod handler;
pub mod medium;
