use files_preview::{
    Docx2Html, Docx2HtmlOptions, EmbeddedImage, HostDocument, ImageEmbedding, ImageHandler,
    MarkupConverter, MarkupOptions, MarkupResult,
};
use pretty_assertions::assert_eq;
use rs_docx::document::{
    BodyContent, Break, BreakType, FootNote, FootNotes, FootnoteReference, Paragraph, Run,
    RunContent, Table, TableCell, TableRow,
};
use rs_docx::formatting::{ParagraphProperty, ParagraphStyleId};
use rs_docx::Docx;
use std::borrow::Cow;
use std::sync::Arc;

fn docx_bytes<'a>(docx: &'a mut Docx<'a>) -> Vec<u8> {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("fixture.docx");
    docx.write_file(&path)
        .expect("failed to write generated docx");
    std::fs::read(&path).expect("failed to read generated docx")
}

fn page_break_run() -> Run<'static> {
    Run::default().push(RunContent::Break(Break {
        ty: Some(BreakType::Page),
        ..Default::default()
    }))
}

fn isolated(options: Docx2HtmlOptions) -> (Docx2Html, HostDocument) {
    let host = HostDocument::new();
    (Docx2Html::new(options).with_host(host.clone()), host)
}

#[test]
fn generated_docx_without_breaks_is_one_page() {
    let mut docx = Docx::default();
    docx.document.push(Paragraph::default().push_text("First"));
    docx.document.push(Paragraph::default().push_text("Second"));

    let (converter, _) = isolated(Docx2HtmlOptions::default());
    let html = converter
        .convert(&docx_bytes(&mut docx))
        .expect("conversion failed");

    assert_eq!(
        html,
        "<div class=\"docx2html-root\"><p>First</p><p>Second</p></div>"
    );
}

#[test]
fn generated_docx_page_break_starts_new_page() {
    let mut docx = Docx::default();
    docx.document.push(
        Paragraph::default()
            .push_text("Page one")
            .push(page_break_run())
            .push(Run::default().push_text("Page two")),
    );

    let (converter, _) = isolated(Docx2HtmlOptions::default());
    let html = converter
        .convert(&docx_bytes(&mut docx))
        .expect("conversion failed");

    assert_eq!(html.matches("<div class=\"docx2html-root\">").count(), 2);
    assert!(html.starts_with("<div class=\"docx2html-root\"><p>Page one</p></div>"));
    assert!(html.ends_with("<hr class=\"page-break\" /><p>Page two</p></div>"));
}

#[test]
fn generated_docx_page_break_style_is_paginated() {
    let mut docx = Docx::default();
    docx.document.push(Paragraph::default().push_text("Intro"));
    docx.document.push(
        Paragraph::default()
            .property(ParagraphProperty {
                style_id: Some(ParagraphStyleId {
                    value: Cow::Borrowed("page-break"),
                }),
                ..Default::default()
            })
            .push_text("Chapter"),
    );

    let (converter, _) = isolated(Docx2HtmlOptions::default());
    let html = converter
        .convert(&docx_bytes(&mut docx))
        .expect("conversion failed");

    assert_eq!(
        html,
        "<div class=\"docx2html-root\"><p>Intro</p></div>\
         <div class=\"docx2html-root\">\
         <p style=\"page-break-before: always;\" class=\"page-break\">Chapter</p></div>"
    );
}

#[test]
fn generated_docx_page_break_inside_table_keeps_one_page() {
    let cell = TableCell::paragraph(
        Paragraph::default()
            .push_text("before")
            .push(page_break_run())
            .push(Run::default().push_text("after")),
    );
    let table = Table::default().push_row(TableRow::default().push_cell(cell));

    let mut docx = Docx::default();
    docx.document.body.content.push(BodyContent::Table(table));

    let (converter, _) = isolated(Docx2HtmlOptions::default());
    let html = converter
        .convert(&docx_bytes(&mut docx))
        .expect("conversion failed");

    assert_eq!(html.matches("<div class=\"docx2html-root\">").count(), 1);
    assert_eq!(html.matches("<table>").count(), 1);
    assert_eq!(html.matches("</table>").count(), 1);
    assert!(!html.contains("page-break"));
    assert!(html.contains("<table><tr><td><p>before</p><p>after</p></td></tr></table>"));
}

#[test]
fn generated_docx_footnotes_are_listed_once() {
    let mut docx = Docx {
        footnotes: Some(FootNotes {
            content: vec![FootNote {
                id: Some(5),
                content: vec![BodyContent::Paragraph(
                    Paragraph::default().push_text("Same footnote text"),
                )],
                ..Default::default()
            }],
        }),
        ..Default::default()
    };

    let reference = || {
        Run::default().push(RunContent::FootnoteReference(FootnoteReference {
            id: Some(Cow::Borrowed("5")),
            ..Default::default()
        }))
    };
    docx.document
        .push(Paragraph::default().push(reference()).push(reference()));

    let (converter, _) = isolated(Docx2HtmlOptions::default());
    let html = converter
        .convert(&docx_bytes(&mut docx))
        .expect("conversion failed");

    assert_eq!(html.matches("href=\"#footnote-1\"").count(), 2);
    assert_eq!(html.matches("<li id=\"footnote-1\">").count(), 1);
    assert!(html.contains("Same footnote text"));
}

#[test]
fn stylesheet_is_injected_once_across_conversions() {
    let mut docx = Docx::default();
    docx.document.push(Paragraph::default().push_text("x"));
    let bytes = docx_bytes(&mut docx);

    let (converter, host) = isolated(Docx2HtmlOptions::default());
    converter.convert(&bytes).expect("first conversion failed");
    converter.convert(&bytes).expect("second conversion failed");

    assert_eq!(host.style_count("docx2html-styles"), 1);
    assert!(host
        .style("docx2html-styles")
        .expect("stylesheet registered")
        .contains(".docx2html-root"));
}

#[test]
fn invalid_bytes_are_a_parse_error() {
    let (converter, host) = isolated(Docx2HtmlOptions::default());
    let err = converter.convert(b"plain text").unwrap_err();
    assert!(matches!(err, files_preview::Error::DocxParse(_)));
    assert_eq!(host.style_count("docx2html-styles"), 0);
}

/// Emits one image per conversion so embedding can be checked end to end.
struct SingleImage;

impl MarkupConverter for SingleImage {
    fn convert_to_html(
        &self,
        _: &[u8],
        _: &MarkupOptions,
        images: &mut dyn ImageHandler,
    ) -> files_preview::Result<MarkupResult> {
        let image = EmbeddedImage::new(Some("image/jpeg".to_string()), vec![1, 2, 3]);
        let attrs = images.convert_image(&image)?;
        Ok(MarkupResult {
            value: format!("<p><img src=\"{}\" /></p>", attrs.src),
            messages: Vec::new(),
        })
    }
}

#[test]
fn data_uri_embedding() {
    let (converter, _) = isolated(Docx2HtmlOptions::default());
    let html = converter
        .with_converter(Arc::new(SingleImage))
        .convert(b"")
        .expect("conversion failed");
    assert!(html.contains("src=\"data:image/jpeg;base64,AQID\""));
}

#[test]
fn blob_embedding_resolves_in_host() {
    let (converter, host) = isolated(Docx2HtmlOptions {
        image_embedding: ImageEmbedding::Blob,
        ..Default::default()
    });
    let html = converter
        .with_converter(Arc::new(SingleImage))
        .convert(b"")
        .expect("conversion failed");

    let start = html.find("src=\"blob:").expect("blob src") + "src=\"".len();
    let end = start + html[start..].find('"').expect("closing quote");
    let blob = host.blob(&html[start..end]).expect("blob registered");
    assert_eq!(blob.content_type, "image/jpeg");
    assert_eq!(blob.data, vec![1, 2, 3]);
}

#[tokio::test]
async fn render_into_writes_converted_file() {
    let mut docx = Docx::default();
    docx.document.push(Paragraph::default().push_text("Hello"));
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("hello.docx");
    docx.write_file(&path)
        .expect("failed to write generated docx");

    let (converter, host) = isolated(Docx2HtmlOptions::default());
    let element = host.create_element("viewer");
    converter
        .render_into("#viewer", path.as_path())
        .await
        .expect("render failed");

    assert_eq!(
        element.inner_html(),
        "<div class=\"docx2html-root\"><p>Hello</p></div>"
    );
}

#[tokio::test]
async fn render_into_unknown_selector_touches_nothing() {
    let (converter, host) = isolated(Docx2HtmlOptions::default());
    let element = host.create_element("viewer");
    element.set_inner_html("untouched");

    let err = converter
        .render_into("#other", b"ignored".as_slice())
        .await
        .unwrap_err();

    assert!(matches!(err, files_preview::Error::InvalidInput(_)));
    assert_eq!(element.inner_html(), "untouched");
    assert_eq!(host.style_count("docx2html-styles"), 0);
}

#[test]
fn sanitize_removes_only_scripts() {
    let converter = Docx2Html::default().with_host(HostDocument::new());
    let html =
        "<div class=\"docx2html-root\"><p>a</p><script>alert(1)</script><img src=\"x\"></div>";
    assert_eq!(
        converter.sanitize(html),
        "<div class=\"docx2html-root\"><p>a</p><img src=\"x\"></div>"
    );
}
