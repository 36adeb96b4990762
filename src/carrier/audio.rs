//! # 音频载体
//!
//! 在 WAV 文件的原始 PCM 字节序列上做 LSB 嵌入：每个字节承载一个
//! 载荷比特，16 位采样按小端序提供两个载体单元。仅支持 16 位整型
//! PCM；输出文件原样保留输入的声道数、采样率与位宽。

use crate::bits;
use crate::error::StegoError;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// 解码后的 WAV 载体：参数与 PCM 字节缓冲一次性读入内存。
pub struct WavCarrier {
    spec: WavSpec,
    /// 小端序排列的原始 PCM 字节。
    frames: Vec<u8>,
}

impl WavCarrier {
    /// 从文件加载 WAV 载体。非 16 位整型 PCM 一律拒绝。
    pub fn load(path: &Path) -> Result<Self, StegoError> {
        let reader = WavReader::open(path)?;
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(StegoError::FormatMismatch(format!(
                "only 16-bit integer PCM WAV is supported, got {} bits {:?}",
                spec.bits_per_sample, spec.sample_format
            )));
        }

        let mut frames = Vec::new();
        for sample in reader.into_samples::<i16>() {
            frames.extend_from_slice(&sample?.to_le_bytes());
        }

        Ok(Self { spec, frames })
    }

    /// 最大可嵌入位数：每个 PCM 字节一位。
    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    /// 音频参数（声道数、采样率、位宽）。
    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    /// 把带结束标记的位序列写入 PCM 字节的最低有效位。
    pub fn embed(&mut self, payload_bits: &[u8]) -> Result<(), StegoError> {
        let capacity = self.capacity();
        if payload_bits.len() > capacity {
            return Err(StegoError::CapacityExceeded {
                needed: payload_bits.len(),
                capacity,
            });
        }

        for (byte, &bit) in self.frames.iter_mut().zip(payload_bits) {
            *byte = (*byte & !1) | bit;
        }

        Ok(())
    }

    /// 按原始顺序收集每个 PCM 字节的 LSB 并定位结束标记。
    pub fn extract(&self) -> Result<Vec<u8>, StegoError> {
        let mut acc = Vec::with_capacity(self.frames.len());
        for &byte in &self.frames {
            acc.push(byte & 1);
        }

        let end = bits::find_marker(&acc).ok_or(StegoError::MarkerNotFound)?;
        acc.truncate(end);
        Ok(acc)
    }

    /// 用与输入完全相同的参数把 PCM 字节写回 WAV 文件。
    pub fn save(&self, path: &Path) -> Result<(), StegoError> {
        let mut writer = WavWriter::create(path, self.spec)?;
        for pair in self.frames.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
        }
        writer.finalize()?;
        Ok(())
    }
}
