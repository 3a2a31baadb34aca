//! Widget identity
//!
//! A widget's name links its client-side element to its backend executor.
//! Names are either derived from the page URL and an author-chosen token,
//! or a SHA-256 digest over the widget's defining inputs.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::{CompileError, Result};
use crate::markup::WidgetMarkup;
use crate::page::PageUrl;

static NAME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-z\-]+$").expect("name token pattern compiles"));

/// Hex SHA-256 digest over the `-`-joined hex encodings of `inputs`
pub fn hash_inputs<I, S>(inputs: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = inputs
        .into_iter()
        .map(|input| hex::encode(input.as_ref()))
        .collect::<Vec<_>>()
        .join("-");
    hex::encode(Sha256::digest(joined.as_bytes()))
}

/// Whether `token` is acceptable as an explicit widget name
pub fn is_valid_token(token: &str) -> bool {
    NAME_TOKEN.is_match(token)
}

/// Final name for an explicit token on `page_url`
pub fn explicit_name(page_url: &PageUrl, token: &str) -> String {
    format!("{}-{}", page_url.hex(), token)
}

/// Assign the name of one widget.
///
/// `defining` lists the variant's defining attribute values in their fixed
/// order; it is only used when the markup has no explicit name.
pub fn assign(markup: &WidgetMarkup, defining: &[&str]) -> Result<String> {
    if let Some(token) = &markup.explicit_name {
        if !is_valid_token(token) {
            return Err(CompileError::InvalidWidgetName {
                kind: markup.kind,
                page: markup.page_url.to_string(),
                position: markup.position,
                name: token.clone(),
            });
        }
        return Ok(explicit_name(&markup.page_url, token));
    }

    let page = markup.page_url.to_string();
    let position = markup.position.to_string();
    let inputs = [markup.kind.name(), page.as_str(), position.as_str()]
        .into_iter()
        .chain(defining.iter().copied());
    Ok(hash_inputs(inputs))
}
