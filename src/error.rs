//! # 错误类型模块
//!
//! 定义隐写核心使用的错误分类。核心内部只产生这些分类，
//! 由外层处理逻辑（`handler`）负责转换为面向用户的消息。

use thiserror::Error;

/// 隐写核心的全部失败类别。
#[derive(Error, Debug)]
pub enum StegoError {
    /// 载荷比特数（含结束标记）超过了载体容量。在任何修改发生前抛出。
    #[error("Payload is too large for this carrier. Required: {needed} bits, capacity: {capacity} bits")]
    CapacityExceeded { needed: usize, capacity: usize },

    /// 扫描完整个载体也没有找到结束标记，说明其中没有隐藏数据。
    #[error("No hidden data found: the end-of-data marker never appears in the carrier")]
    MarkerNotFound,

    /// 载体文件的实际内容与声明的媒体类型不符。
    #[error("Carrier format mismatch: {0}")]
    FormatMismatch(String),

    /// 解密失败：密码错误或密文已被篡改。
    #[error("Decryption failed: wrong password or corrupt data")]
    WrongPasswordOrCorruptData,

    /// 载荷中包含无法用单字节表示的字符。
    #[error("Payload contains a character outside the 8-bit range: {0:?}")]
    PayloadNotEightBit(char),

    /// 底层文件读写失败。
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// 载体编解码库报告的失败（损坏的容器、不支持的编码等）。
    #[error("Carrier codec failure: {0}")]
    Codec(String),
}

impl From<image::ImageError> for StegoError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => StegoError::Io(io),
            image::ImageError::Unsupported(e) => StegoError::FormatMismatch(e.to_string()),
            other => StegoError::Codec(other.to_string()),
        }
    }
}

impl From<hound::Error> for StegoError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => StegoError::Io(io),
            hound::Error::FormatError(msg) => StegoError::FormatMismatch(msg.to_string()),
            other => StegoError::Codec(other.to_string()),
        }
    }
}

impl From<lopdf::Error> for StegoError {
    fn from(err: lopdf::Error) -> Self {
        StegoError::Codec(err.to_string())
    }
}

impl From<zip::result::ZipError> for StegoError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => StegoError::Io(io),
            other => StegoError::FormatMismatch(other.to_string()),
        }
    }
}

impl From<y4m::Error> for StegoError {
    fn from(err: y4m::Error) -> Self {
        match err {
            y4m::Error::IoError(io) => StegoError::Io(io),
            other => StegoError::Codec(other.to_string()),
        }
    }
}
