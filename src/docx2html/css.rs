/// Element id of the injected stylesheet.
pub const DEFAULT_CSS_ID: &str = "docx2html-styles";

/// A4 page stylesheet for `.docx2html-root` containers.
pub const DEFAULT_CSS: &str = r#"
.docx2html-root {
  box-sizing: border-box;
  width: 100%;
  max-width: 794px;
  min-height: 1123px;
  margin: 0 auto 40px;
  padding: 40px 60px;
  background: #fff;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue',
    Arial, sans-serif;
  line-height: 1.6;
  color: #333;
  font-size: 16px;
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
}
.docx2html-root img {
  max-width: 100%;
  height: auto;
  display: block;
  margin: 0.5em auto;
}
.docx2html-root figure {
  margin: 1em 0;
}
.docx2html-root svg,
.docx2html-root canvas,
.docx2html-root object,
.docx2html-root embed {
  max-width: 100%;
  height: auto;
  display: block;
  margin: 0.5em auto;
}
.docx2html-root table {
  width: 100%;
  border-collapse: collapse;
  overflow-x: auto;
  display: block;
  margin: 1em 0;
}
.docx2html-root table td,
.docx2html-root table th {
  padding: 0.5em;
  border: 1px solid #ddd;
  text-align: left;
}
.docx2html-root p {
  margin: 0.5em 0;
}
.docx2html-root h1,
.docx2html-root h2,
.docx2html-root h3,
.docx2html-root h4,
.docx2html-root h5,
.docx2html-root h6 {
  margin: 1em 0 0.5em;
  font-weight: 600;
  page-break-after: avoid;
}
.docx2html-root ul,
.docx2html-root ol {
  margin: 0.5em 0;
  padding-left: 2em;
}
.docx2html-root p,
.docx2html-root div,
.docx2html-root section {
  page-break-inside: avoid;
}
@media (max-width: 850px) {
  .docx2html-root {
    width: 100%;
    max-width: 100%;
    min-height: auto;
    padding: 30px 20px;
    font-size: 15px;
    margin-bottom: 30px;
  }
}
@media (max-width: 600px) {
  .docx2html-root {
    width: 100%;
    max-width: 100%;
    min-height: auto;
    padding: 20px 15px;
    font-size: 14px;
    margin-bottom: 20px;
  }
  .docx2html-root h1 { font-size: 1.8em; }
  .docx2html-root h2 { font-size: 1.5em; }
  .docx2html-root h3 { font-size: 1.3em; }
  .docx2html-root h4 { font-size: 1.1em; }
  .docx2html-root table {
    font-size: 0.9em;
  }
}
"#;
