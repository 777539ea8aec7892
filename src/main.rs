//! CLI for files-preview - preview dispatch and DOCX to HTML conversion

use clap::{Parser, Subcommand};
use files_preview::docx2html::is_http_url;
use files_preview::preview::extension_of;
use files_preview::{
    rule_by_file_type, Docx2Html, Docx2HtmlOptions, HostDocument, ImageEmbedding, PreviewProps,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the preview type and read mode for file names or extensions
    Detect {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Convert a DOCX file or http(s) URL to paginated HTML
    Docx {
        /// Input DOCX path or URL
        input: String,

        /// Output HTML file path (optional, prints to stdout if not specified)
        output: Option<PathBuf>,

        /// Reference images through blob: URLs instead of data URIs.
        /// These URLs resolve only inside this process, not in the printed or written HTML
        #[arg(long)]
        blob: bool,

        /// Do not inject the page stylesheet
        #[arg(long)]
        no_css: bool,

        /// Wrap the fragment in a complete HTML document
        #[arg(long)]
        standalone: bool,
    },
    /// Render a file or URL with the renderer its extension selects
    Render {
        /// Input path or URL
        input: String,

        /// Display name used to pick the preview type
        #[arg(long)]
        name: Option<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();

    let result = match args.command {
        Command::Detect { names } => {
            detect(&names);
            Ok(())
        }
        Command::Docx {
            input,
            output,
            blob,
            no_css,
            standalone,
        } => convert_docx(&input, output, blob, no_css, standalone).await,
        Command::Render { input, name } => render(&input, name).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn detect(names: &[String]) {
    for name in names {
        let ext = extension_of(name).unwrap_or_else(|| name.clone());
        let kind = rule_by_file_type(&ext).kind;
        let read_as = kind.read_as().map(|mode| mode.as_str()).unwrap_or("-");
        println!("{}\t{}\t{}", name, kind, read_as);
    }
}

async fn convert_docx(
    input: &str,
    output: Option<PathBuf>,
    blob: bool,
    no_css: bool,
    standalone: bool,
) -> files_preview::Result<()> {
    let options = Docx2HtmlOptions {
        inject_css: !no_css,
        image_embedding: if blob {
            ImageEmbedding::Blob
        } else {
            ImageEmbedding::DataUri
        },
        ..Default::default()
    };
    let host = HostDocument::new();
    let converter = Docx2Html::new(options).with_host(host.clone());

    let html = if is_http_url(input) {
        converter.convert_url(input).await?
    } else {
        converter.convert_file(input).await?
    };

    let html = if standalone {
        let css = host.style(&converter.options().css_id).unwrap_or_default();
        format!(
            concat!(
                "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
                "<style id=\"{}\">{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n"
            ),
            converter.options().css_id,
            css,
            html
        )
    } else {
        html
    };

    match output {
        Some(output) => {
            std::fs::write(&output, &html)?;
            println!("Successfully converted to {:?}", output);
        }
        None => println!("{}", html),
    }
    Ok(())
}

async fn render(input: &str, name: Option<String>) -> files_preview::Result<()> {
    let mut props = if is_http_url(input) {
        PreviewProps::from_url(input)
    } else {
        PreviewProps::from_file(input)
    };
    if let Some(name) = name {
        props = props.with_name(name);
    }

    let rule = props.rule();
    let Some(renderer) = rule.load_renderer() else {
        eprintln!("No renderer for preview type {}", rule.kind);
        return Ok(());
    };

    if let Some(html) = renderer.render(&props).await? {
        println!("{}", html);
    }
    Ok(())
}
