//! # 媒体类型与分发模块
//!
//! 用封闭的枚举表示四种载体媒介，根据文件扩展名推断类型，
//! 并把嵌入/提取请求分发到对应的载体实现。
//! 显式声明的媒介与扩展名不符时直接拒绝，避免对错误格式的静默破坏。

use crate::bits;
use crate::carrier::{audio, document, image as image_carrier, video};
use crate::error::StegoError;
use clap::ValueEnum;
use std::fmt;
use std::path::Path;

/// 支持的载体媒介。
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Medium {
    /// 无损光栅图像（png、bmp、tiff、webp、qoi）。
    Image,
    /// 16 位整型 PCM 的 WAV 音频。
    Audio,
    /// 纯文本、docx 或 pdf 文档。
    Document,
    /// YUV4MPEG2 原始帧视频。
    Video,
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Medium::Image => "image",
            Medium::Audio => "audio",
            Medium::Document => "document",
            Medium::Video => "video",
        };
        f.write_str(name)
    }
}

impl Medium {
    /// 根据扩展名推断载体媒介。未知扩展名返回 [`StegoError::FormatMismatch`]。
    pub fn from_path(path: &Path) -> Result<Self, StegoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| {
                StegoError::FormatMismatch(format!(
                    "carrier file has no extension: {}",
                    path.display()
                ))
            })?;

        match ext.as_str() {
            "png" | "bmp" | "tif" | "tiff" | "webp" | "qoi" => Ok(Medium::Image),
            "wav" => Ok(Medium::Audio),
            "txt" | "docx" | "pdf" => Ok(Medium::Document),
            "y4m" => Ok(Medium::Video),
            other => Err(StegoError::FormatMismatch(format!(
                "unsupported carrier extension: {other:?}"
            ))),
        }
    }

    /// 结合推断结果校验显式声明的媒介，两者矛盾即拒绝。
    pub fn resolve(path: &Path, declared: Option<Medium>) -> Result<Self, StegoError> {
        let inferred = Medium::from_path(path)?;
        if let Some(declared) = declared
            && declared != inferred
        {
            return Err(StegoError::FormatMismatch(format!(
                "declared medium {declared} does not match the {inferred} carrier {}",
                path.display()
            )));
        }
        Ok(inferred)
    }
}

/// 把载荷字符串隐藏进载体文件，结果写入新的输出文件。
/// 输入文件永远不会被就地修改。
pub fn embed(
    medium: Medium,
    input: &Path,
    payload: &str,
    output: &Path,
) -> Result<(), StegoError> {
    match medium {
        Medium::Image => {
            let decoded = image::open(input)?;
            let payload_bits = bits::with_marker(bits::to_bits(payload)?);
            // 无 alpha 的输入保持三通道输出，不改变源文件的颜色类型。
            if decoded.color().has_alpha() {
                let mut img = decoded.into_rgba8();
                image_carrier::embed(&mut img, &payload_bits)?;
                img.save(output)?;
            } else {
                let mut img = decoded.into_rgb8();
                image_carrier::embed(&mut img, &payload_bits)?;
                img.save(output)?;
            }
            Ok(())
        }
        Medium::Audio => {
            let mut wav = audio::WavCarrier::load(input)?;
            let payload_bits = bits::with_marker(bits::to_bits(payload)?);
            wav.embed(&payload_bits)?;
            wav.save(output)
        }
        Medium::Document => document::embed(input, payload, output),
        Medium::Video => {
            let payload_bits = bits::with_marker(bits::to_bits(payload)?);
            video::embed(input, &payload_bits, output)
        }
    }
}

/// 从载体文件中恢复隐藏的载荷字符串。
pub fn extract(medium: Medium, input: &Path) -> Result<String, StegoError> {
    match medium {
        Medium::Image => {
            let decoded = image::open(input)?;
            // 与嵌入保持同一通道布局，保证遍历顺序一致。
            let payload_bits = if decoded.color().has_alpha() {
                image_carrier::extract(&decoded.into_rgba8())?
            } else {
                image_carrier::extract(&decoded.into_rgb8())?
            };
            Ok(bits::from_bits(&payload_bits))
        }
        Medium::Audio => {
            let wav = audio::WavCarrier::load(input)?;
            Ok(bits::from_bits(&wav.extract()?))
        }
        Medium::Document => document::extract(input),
        Medium::Video => Ok(bits::from_bits(&video::extract(input)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn infers_medium_from_extension() {
        let cases = [
            ("photo.png", Medium::Image),
            ("photo.BMP", Medium::Image),
            ("sound.wav", Medium::Audio),
            ("notes.txt", Medium::Document),
            ("report.docx", Medium::Document),
            ("paper.pdf", Medium::Document),
            ("clip.y4m", Medium::Video),
        ];
        for (name, expected) in cases {
            assert_eq!(Medium::from_path(&PathBuf::from(name)).unwrap(), expected);
        }
    }

    #[test]
    fn unknown_extension_is_a_format_mismatch() {
        assert!(matches!(
            Medium::from_path(&PathBuf::from("archive.tar")),
            Err(StegoError::FormatMismatch(_))
        ));
        assert!(matches!(
            Medium::from_path(&PathBuf::from("noext")),
            Err(StegoError::FormatMismatch(_))
        ));
    }

    #[test]
    fn declared_medium_must_match_the_extension() {
        let path = PathBuf::from("photo.png");
        assert_eq!(
            Medium::resolve(&path, Some(Medium::Image)).unwrap(),
            Medium::Image
        );
        assert_eq!(Medium::resolve(&path, None).unwrap(), Medium::Image);
        assert!(matches!(
            Medium::resolve(&path, Some(Medium::Audio)),
            Err(StegoError::FormatMismatch(_))
        ));
    }
}
