use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};

/// Text extracted from one source file (or one page of it).
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub text: String,
    pub metadata: DocumentMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// File name without directory, used as the retrieval filter key.
    pub source: String,
    pub page: Option<usize>,
}

/// Parse a `.docx` or `.pdf` file into documents.
pub fn load_document(path: &Path) -> Result<Vec<Document>> {
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "docx" => {
            let file = fs::File::open(path)?;
            let text = extract_docx_text(file).map_err(|message| Error::Load {
                path: path.to_path_buf(),
                message,
            })?;
            Ok(vec![Document {
                text,
                metadata: DocumentMetadata { source, page: None },
            }])
        }
        "pdf" => {
            let bytes = fs::read(path)?;
            let pages =
                pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| Error::Load {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
            Ok(pdf_pages(&source, pages))
        }
        _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}

/// One document per non-blank page, numbered from zero.
fn pdf_pages(source: &str, pages: Vec<String>) -> Vec<Document> {
    pages
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(page, text)| Document {
            text,
            metadata: DocumentMetadata {
                source: source.to_string(),
                page: Some(page),
            },
        })
        .collect()
}

fn extract_docx_text<R: Read + Seek>(reader: R) -> std::result::Result<String, String> {
    let mut archive =
        zip::ZipArchive::new(reader).map_err(|e| format!("not a docx archive: {}", e))?;
    let file = archive
        .by_name("word/document.xml")
        .map_err(|e| format!("word/document.xml not found: {}", e))?;
    let xml = std::io::read_to_string(file).map_err(|e| e.to_string())?;
    docx_xml_to_text(&xml)
}

fn docx_xml_to_text(xml: &str) -> std::result::Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = true;
                }
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML parsing error: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_become_lines() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Hola</w:t></w:r><w:r><w:t xml:space="preserve"> mundo</w:t></w:r></w:p>
            <w:p><w:r><w:t>A</w:t><w:tab/><w:t>B &amp; C</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(docx_xml_to_text(xml).unwrap(), "Hola mundo\nA\tB & C\n");
    }

    #[test]
    fn blank_pdf_pages_are_skipped_but_keep_numbering() {
        let pages = vec!["first".to_string(), " \n".to_string(), "third".to_string()];
        let docs = pdf_pages("a.pdf", pages);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].metadata.page, Some(0));
        assert_eq!(docs[1].metadata.page, Some(2));
        assert_eq!(docs[1].text, "third");
    }
}
