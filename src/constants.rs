/// 附加在载荷比特流末尾的 16 位结束标记。
/// 提取时只需扫描该模式即可确定隐藏数据的边界，无需预先知道长度。
pub const EOF_MARKER: [u8; 16] = [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0];

/// 视频载体的采样步长。
/// 只有帧序号为该值整数倍的帧参与嵌入/提取，其余帧原样透传，
/// 以降低处理成本为代价换取较小的容量。
pub const FRAME_STRIDE: usize = 5;

/// 纯文本载体中包裹载荷的注释定界符（起始）。
pub const COMMENT_OPEN: &str = "<!--";

/// 纯文本载体中包裹载荷的注释定界符（结束）。
pub const COMMENT_CLOSE: &str = "-->";

/// docx 载体中承载载荷段落所使用的保留样式名。
pub const DOCX_PAYLOAD_STYLE: &str = "CommentText";

/// pdf 载体中承载载荷的 Info 字典保留键名。
pub const PDF_PAYLOAD_KEY: &str = "HiddenData";
