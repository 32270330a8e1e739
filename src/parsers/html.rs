use crate::parsers::tree::{self, TreeNode};
use scraper::Html;

/// Parses a fetched page into a navigable tree.
///
/// The html5ever tokenizer recovers from malformed markup, so parsing itself
/// never fails; recovered errors are only reported at debug level.
pub fn parse(markup: &str) -> Html {
    let doc = Html::parse_document(markup);

    if !doc.errors.is_empty() {
        ::log::debug!("Parser recovered from {} markup errors", doc.errors.len());
    }

    doc
}

/// Root node of a parsed document
pub fn root(doc: &Html) -> TreeNode<'_> {
    doc.tree.root()
}

/// Checks whether the node is an element with the given tag name
pub fn is_element(node: TreeNode<'_>, tag: &str) -> bool {
    node.value()
        .as_element()
        .is_some_and(|element| element.name() == tag)
}

/// Reads an attribute from an element node
pub fn attribute<'a>(node: TreeNode<'a>, key: &str) -> Option<&'a str> {
    node.value().as_element()?.attr(key)
}

/// Text content of a text node
pub fn text_of<'a>(node: TreeNode<'a>) -> Option<&'a str> {
    node.value().as_text().map(|text| &**text)
}

/// Concatenates every descendant text node in document order
pub fn inner_text(node: TreeNode<'_>) -> String {
    let mut text = String::new();
    tree::walk(node, &mut |current| {
        if let Some(data) = text_of(current) {
            text.push_str(data);
        }
        false
    });
    text
}
