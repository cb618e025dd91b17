use lopdf::Document;
use tracing::{debug, warn};

use crate::types::{AppError, AppResult};

/// Extract the text of every page, in page order, one `\n` between pages.
///
/// The result is trimmed. A PDF without any extractable text gives an empty
/// string; bytes that do not parse as a PDF give `AppError::Extraction`.
pub fn extract_text(bytes: &[u8]) -> AppResult<String> {
    let doc = Document::load_mem(bytes).map_err(|e| AppError::Extraction(e.to_string()))?;

    let pages = doc.get_pages();
    debug!(page_count = pages.len(), "Loaded PDF");

    let page_texts: Vec<String> = pages
        .keys()
        .map(|page_num| match doc.extract_text(&[*page_num]) {
            // lopdf ends every page with its own newline
            Ok(page_text) => page_text
                .strip_suffix('\n')
                .map(str::to_string)
                .unwrap_or(page_text),
            Err(e) => {
                warn!(page = page_num, error = %e, "No text extracted from page");
                String::new()
            }
        })
        .collect();

    Ok(page_texts.join("\n").trim().to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a PDF with one page per entry in `pages`; `None` gives a blank page.
    pub fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let operations = match page {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode page content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("serialize pdf");
        buffer
    }
}
