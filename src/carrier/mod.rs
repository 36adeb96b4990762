//! # 载体实现模块
//!
//! 每种媒介一个子模块，共享 `bits` 模块定义的位流协议。

pub mod audio;
pub mod document;
pub mod image;
pub mod video;
