//! # 视频载体
//!
//! 在 YUV4MPEG2 原始帧序列上做 LSB 嵌入。只有帧序号为
//! [`FRAME_STRIDE`] 整数倍的采样帧参与读写，其余帧原样透传；
//! 采样帧内按 Y、U、V 平面顺序逐字节承载一个载荷比特。
//! 嵌入分两遍：第一遍只数帧做容量预检，第二遍解码、改写、重编码，
//! 因此容量不足时不会留下任何输出文件。

use crate::bits;
use crate::constants::{EOF_MARKER, FRAME_STRIDE};
use crate::error::StegoError;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// 统计帧数与单帧平面字节数，给出载体容量的真实上界。
fn probe(input: &Path) -> Result<(usize, usize), StegoError> {
    let mut decoder = y4m::decode(BufReader::new(File::open(input)?))?;
    let mut frame_count = 0usize;
    let mut frame_bits = 0usize;
    loop {
        match decoder.read_frame() {
            Ok(frame) => {
                if frame_count == 0 {
                    frame_bits = frame.get_y_plane().len()
                        + frame.get_u_plane().len()
                        + frame.get_v_plane().len();
                }
                frame_count += 1;
            }
            Err(y4m::Error::EOF) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok((frame_count, frame_bits))
}

/// 把带结束标记的位序列写入采样帧的平面字节 LSB。
/// 输出序列与输入逐帧对应，几何参数、帧率与色彩空间不变。
///
/// 第二遍先写入同目录的临时文件，成功后才重命名为目标路径，
/// 编码中途失败不会留下不完整的输出。
pub fn embed(input: &Path, payload_bits: &[u8], output: &Path) -> Result<(), StegoError> {
    let (frame_count, frame_bits) = probe(input)?;
    let capacity = frame_count.div_ceil(FRAME_STRIDE) * frame_bits;
    if payload_bits.len() > capacity {
        return Err(StegoError::CapacityExceeded {
            needed: payload_bits.len(),
            capacity,
        });
    }

    let scratch = scratch_path(output);
    match write_embedded(input, payload_bits, &scratch) {
        Ok(()) => {
            fs::rename(&scratch, output)?;
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(&scratch);
            Err(err)
        }
    }
}

/// 目标路径旁的临时文件名，重命名发生在同一目录内。
fn scratch_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output.with_file_name(format!("{name}.partial"))
}

fn write_embedded(input: &Path, payload_bits: &[u8], output: &Path) -> Result<(), StegoError> {
    let mut decoder = y4m::decode(BufReader::new(File::open(input)?))?;
    let mut encoder = y4m::encode(
        decoder.get_width(),
        decoder.get_height(),
        decoder.get_framerate(),
    )
    .with_colorspace(decoder.get_colorspace())
    .write_header(File::create(output)?)?;

    let mut cursor = 0usize;
    let mut index = 0usize;
    loop {
        match decoder.read_frame() {
            Ok(frame) => {
                if index % FRAME_STRIDE == 0 && cursor < payload_bits.len() {
                    let mut y = frame.get_y_plane().to_vec();
                    let mut u = frame.get_u_plane().to_vec();
                    let mut v = frame.get_v_plane().to_vec();
                    for plane in [&mut y, &mut u, &mut v] {
                        for byte in plane.iter_mut() {
                            if cursor >= payload_bits.len() {
                                break;
                            }
                            *byte = (*byte & !1) | payload_bits[cursor];
                            cursor += 1;
                        }
                    }
                    encoder.write_frame(&y4m::Frame::new([&y, &u, &v], None))?;
                } else {
                    encoder.write_frame(&frame)?;
                }
                index += 1;
            }
            Err(y4m::Error::EOF) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// 按解码顺序累积采样帧的平面字节 LSB，每处理完一帧就检查一次
/// 结束标记并尽早返回。累积缓冲在帧之间绝不清空，
/// 因此跨越帧边界的标记也能被命中。
pub fn extract(input: &Path) -> Result<Vec<u8>, StegoError> {
    let mut decoder = y4m::decode(BufReader::new(File::open(input)?))?;
    let mut acc: Vec<u8> = Vec::new();
    // 已排除标记的前缀长度，避免重复扫描整个缓冲。
    let mut scanned = 0usize;
    let mut index = 0usize;
    loop {
        match decoder.read_frame() {
            Ok(frame) => {
                if index % FRAME_STRIDE == 0 {
                    for plane in [frame.get_y_plane(), frame.get_u_plane(), frame.get_v_plane()] {
                        for &byte in plane {
                            acc.push(byte & 1);
                        }
                    }
                    if let Some(at) = bits::find_marker(&acc[scanned..]) {
                        acc.truncate(scanned + at);
                        return Ok(acc);
                    }
                    scanned = acc.len().saturating_sub(EOF_MARKER.len() - 1);
                }
                index += 1;
            }
            Err(y4m::Error::EOF) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Err(StegoError::MarkerNotFound)
}
