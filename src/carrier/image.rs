//! # 图像载体
//!
//! 按光栅顺序把载荷比特写入每个像素前三个颜色通道的最低有效位，
//! alpha 通道（若存在）保持不变。嵌入与提取的遍历顺序必须完全一致。

use crate::bits;
use crate::error::StegoError;
use image::{ImageBuffer, Pixel};

/// 图像的最大可嵌入位数：宽 × 高 × 3 个颜色通道。
pub fn capacity<P>(img: &ImageBuffer<P, Vec<u8>>) -> usize
where
    P: Pixel<Subpixel = u8>,
{
    img.width() as usize * img.height() as usize * 3
}

/// 把带结束标记的位序列写入图像的颜色通道 LSB。
///
/// 容量不足时在任何像素被修改前返回 [`StegoError::CapacityExceeded`]；
/// 载荷耗尽后剩余像素保持原样。
pub fn embed<P>(img: &mut ImageBuffer<P, Vec<u8>>, payload_bits: &[u8]) -> Result<(), StegoError>
where
    P: Pixel<Subpixel = u8>,
{
    let capacity = capacity(img);
    if payload_bits.len() > capacity {
        return Err(StegoError::CapacityExceeded {
            needed: payload_bits.len(),
            capacity,
        });
    }

    let mut remaining = payload_bits.iter();
    'pixels: for pixel in img.pixels_mut() {
        for channel in pixel.channels_mut().iter_mut().take(3) {
            match remaining.next() {
                Some(&bit) => *channel = (*channel & !1) | bit,
                None => break 'pixels,
            }
        }
    }

    Ok(())
}

/// 按与嵌入相同的顺序收集所有颜色通道的 LSB，定位结束标记，
/// 返回标记之前的载荷位序列。
pub fn extract<P>(img: &ImageBuffer<P, Vec<u8>>) -> Result<Vec<u8>, StegoError>
where
    P: Pixel<Subpixel = u8>,
{
    let mut acc = Vec::with_capacity(capacity(img));
    for pixel in img.pixels() {
        for &channel in pixel.channels().iter().take(3) {
            acc.push(channel & 1);
        }
    }

    let end = bits::find_marker(&acc).ok_or(StegoError::MarkerNotFound)?;
    acc.truncate(end);
    Ok(acc)
}
