//! # 文档载体
//!
//! 文档不做位级嵌入，而是把载荷整体存入一个格式相关的附属字段：
//! 纯文本追加注释行，docx 追加保留样式的段落，pdf 写入保留的元数据键。
//! 三种子协议都是嵌入/提取对称的，且没有容量上限；
//! 从未嵌入过数据的文档中提取返回空字符串而不是错误。

use crate::constants::{COMMENT_CLOSE, COMMENT_OPEN, DOCX_PAYLOAD_STYLE, PDF_PAYLOAD_KEY};
use crate::error::StegoError;
use lopdf::{Dictionary, Document, Object};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const DOCX_DOCUMENT_ENTRY: &str = "word/document.xml";

/// 文档容器的三种子协议。
enum DocKind {
    PlainText,
    WordXml,
    Portable,
}

fn kind_of(path: &Path) -> Result<DocKind, StegoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "txt" => Ok(DocKind::PlainText),
        "docx" => Ok(DocKind::WordXml),
        "pdf" => Ok(DocKind::Portable),
        other => Err(StegoError::FormatMismatch(format!(
            "unsupported document extension: {other:?}"
        ))),
    }
}

/// 把载荷写入文档的附属字段，结果保存为新文件，输入保持原样。
pub fn embed(input: &Path, payload: &str, output: &Path) -> Result<(), StegoError> {
    match kind_of(input)? {
        DocKind::PlainText => embed_txt(input, payload, output),
        DocKind::WordXml => embed_docx(input, payload, output),
        DocKind::Portable => embed_pdf(input, payload, output),
    }
}

/// 读取文档的附属字段。字段不存在时返回空字符串。
pub fn extract(input: &Path) -> Result<String, StegoError> {
    match kind_of(input)? {
        DocKind::PlainText => extract_txt(input),
        DocKind::WordXml => extract_docx(input),
        DocKind::Portable => extract_pdf(input),
    }
}

fn embed_txt(input: &Path, payload: &str, output: &Path) -> Result<(), StegoError> {
    let content = fs::read_to_string(input)?;
    fs::write(
        output,
        format!("{content}\n{COMMENT_OPEN}{payload}{COMMENT_CLOSE}"),
    )?;
    Ok(())
}

fn extract_txt(input: &Path) -> Result<String, StegoError> {
    let content = fs::read_to_string(input)?;
    let Some(open) = content.find(COMMENT_OPEN) else {
        return Ok(String::new());
    };
    let interior = &content[open + COMMENT_OPEN.len()..];
    match interior.find(COMMENT_CLOSE) {
        Some(close) => Ok(interior[..close].to_string()),
        None => Ok(String::new()),
    }
}

fn embed_docx(input: &Path, payload: &str, output: &Path) -> Result<(), StegoError> {
    let mut archive = ZipArchive::new(fs::File::open(input)?)?;
    let mut writer = ZipWriter::new(fs::File::create(output)?);

    for index in 0..archive.len() {
        let name = archive.by_index_raw(index)?.name().to_owned();
        if name == DOCX_DOCUMENT_ENTRY {
            let mut xml = String::new();
            archive.by_index(index)?.read_to_string(&mut xml)?;

            if !xml.contains("</w:body>") {
                return Err(StegoError::FormatMismatch(
                    "docx document body element not found".to_string(),
                ));
            }
            let paragraph = format!(
                "<w:p><w:pPr><w:pStyle w:val=\"{DOCX_PAYLOAD_STYLE}\"/></w:pPr>\
                 <w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
                escape_xml(payload)
            );
            let patched = xml.replacen("</w:body>", &format!("{paragraph}</w:body>"), 1);

            writer.start_file(name, SimpleFileOptions::default())?;
            writer.write_all(patched.as_bytes())?;
        } else {
            // 其余条目不解压，按原始字节拷贝。
            let entry = archive.by_index_raw(index)?;
            writer.raw_copy_file(entry)?;
        }
    }

    writer.finish()?;
    Ok(())
}

fn extract_docx(input: &Path) -> Result<String, StegoError> {
    let mut archive = ZipArchive::new(fs::File::open(input)?)?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_DOCUMENT_ENTRY)?
        .read_to_string(&mut xml)?;

    // 定位第一个使用保留样式的段落，取其文本内容。
    let style_tag = format!("w:pStyle w:val=\"{DOCX_PAYLOAD_STYLE}\"");
    let Some(style_at) = xml.find(&style_tag) else {
        return Ok(String::new());
    };
    let after_style = &xml[style_at..];
    let Some(text_open) = after_style.find("<w:t") else {
        return Ok(String::new());
    };
    let after_tag = &after_style[text_open..];
    let Some(tag_end) = after_tag.find('>') else {
        return Ok(String::new());
    };
    let body = &after_tag[tag_end + 1..];
    match body.find("</w:t>") {
        Some(close) => Ok(unescape_xml(&body[..close])),
        None => Ok(String::new()),
    }
}

fn embed_pdf(input: &Path, payload: &str, output: &Path) -> Result<(), StegoError> {
    let mut doc = Document::load(input)?;
    let value = Object::string_literal(payload);

    let info_ref = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };
    match info_ref {
        Some(id) => match doc.get_object_mut(id) {
            Ok(Object::Dictionary(info)) => info.set(PDF_PAYLOAD_KEY, value),
            _ => {
                return Err(StegoError::FormatMismatch(
                    "pdf Info entry is not a dictionary".to_string(),
                ));
            }
        },
        None => {
            let mut info = Dictionary::new();
            info.set(PDF_PAYLOAD_KEY, value);
            let id = doc.add_object(Object::Dictionary(info));
            doc.trailer.set("Info", Object::Reference(id));
        }
    }

    doc.save(output)?;
    Ok(())
}

fn extract_pdf(input: &Path) -> Result<String, StegoError> {
    let doc = Document::load(input)?;
    let info = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Dictionary(info)) => Some(info),
            _ => None,
        },
        Ok(Object::Dictionary(info)) => Some(info),
        _ => None,
    };
    let Some(info) = info else {
        return Ok(String::new());
    };
    match info.get(PDF_PAYLOAD_KEY.as_bytes()) {
        Ok(Object::String(bytes, _)) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        _ => Ok(String::new()),
    }
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_xml(escaped: &str) -> String {
    escaped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use tempfile::tempdir;

    /// 构造一个只含正文结构的最小 docx 容器。
    fn minimal_docx(path: &Path) {
        let mut writer = ZipWriter::new(fs::File::create(path).unwrap());
        let options = SimpleFileOptions::default();

        writer
            .start_file("[Content_Types].xml", options)
            .unwrap();
        writer
            .write_all(
                br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#,
            )
            .unwrap();

        writer.start_file("_rels/.rels", options).unwrap();
        writer
            .write_all(
                br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#,
            )
            .unwrap();

        writer.start_file("word/document.xml", options).unwrap();
        writer
            .write_all(
                br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body><w:p><w:r><w:t>Visible document text.</w:t></w:r></w:p></w:body>
</w:document>"#,
            )
            .unwrap();

        writer.finish().unwrap();
    }

    /// 构造一个单空白页的最小 pdf。
    fn minimal_pdf(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn txt_roundtrip_preserves_original_content() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("note.txt");
        let output = dir.path().join("stego.txt");
        fs::write(&input, "ordinary notes\nsecond line").unwrap();

        embed(&input, "the secret", &output).unwrap();
        assert_eq!(extract(&output).unwrap(), "the secret");

        let stego = fs::read_to_string(&output).unwrap();
        assert!(stego.starts_with("ordinary notes\nsecond line"));
    }

    #[test]
    fn txt_extract_takes_the_first_delimiter_pair() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("twice.txt");
        fs::write(&input, "a <!--first--> b <!--second-->").unwrap();
        assert_eq!(extract(&input).unwrap(), "first");
    }

    #[test]
    fn txt_without_comment_extracts_empty() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("plain.txt");
        fs::write(&input, "nothing hidden here").unwrap();
        assert_eq!(extract(&input).unwrap(), "");
    }

    #[test]
    fn docx_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("report.docx");
        let output = dir.path().join("stego.docx");
        minimal_docx(&input);

        embed(&input, "docx secret & <friends>", &output).unwrap();
        assert_eq!(extract(&output).unwrap(), "docx secret & <friends>");
    }

    #[test]
    fn docx_keeps_other_entries_and_visible_text() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("report.docx");
        let output = dir.path().join("stego.docx");
        minimal_docx(&input);

        embed(&input, "s", &output).unwrap();

        let mut archive = ZipArchive::new(fs::File::open(&output).unwrap()).unwrap();
        assert!(archive.by_name("_rels/.rels").is_ok());
        let mut xml = String::new();
        archive
            .by_name(DOCX_DOCUMENT_ENTRY)
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains("Visible document text."));
    }

    #[test]
    fn docx_without_payload_extracts_empty() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pristine.docx");
        minimal_docx(&input);
        assert_eq!(extract(&input).unwrap(), "");
    }

    #[test]
    fn pdf_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("paper.pdf");
        let output = dir.path().join("stego.pdf");
        minimal_pdf(&input);

        embed(&input, "pdf secret", &output).unwrap();
        assert_eq!(extract(&output).unwrap(), "pdf secret");
    }

    #[test]
    fn pdf_without_payload_extracts_empty() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pristine.pdf");
        minimal_pdf(&input);
        assert_eq!(extract(&input).unwrap(), "");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("data.csv");
        fs::write(&input, "a,b,c").unwrap();
        assert!(matches!(
            extract(&input),
            Err(StegoError::FormatMismatch(_))
        ));
    }

    #[test]
    fn xml_escaping_roundtrips() {
        let raw = r#"<tag attr="v">&'text'</tag>"#;
        assert_eq!(unescape_xml(&escape_xml(raw)), raw);
    }
}
