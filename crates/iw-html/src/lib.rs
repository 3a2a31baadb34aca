//! Interactive Widgets HTML
//!
//! HTML5 parsing built on html5ever, plus serialization back to markup.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;

use iw_dom::Document;

/// Parse an HTML string into a [`Document`]
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Parse an HTML string published under `url`
pub fn parse_with_url(html: &str, url: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse_with_url(html, url)
}

/// Serialize a whole document back to markup
pub fn serialize(document: &Document) -> String {
    HtmlSerializer::new().serialize_document(document.tree())
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input for {url}")]
    Read {
        url: String,
        #[source]
        source: std::io::Error,
    },
}
