//! Flat token stream over a parsed directory page.
//!
//! Pages go through `scraper` (html5ever), so entities are decoded and broken
//! markup is repaired the way a browser would. The scanners still want to walk
//! labels and values in document order, so the tree is flattened back into
//! start tags, end tags, text and comments.

use ego_tree::iter::Edge;
use scraper::{Html, Node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    StartTag(Tag),
    EndTag(String),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
}

impl Token {
    /// Trimmed text content; empty for anything but text.
    pub fn text(&self) -> &str {
        match &self.kind {
            TokenKind::Text(text) => text.trim(),
            _ => "",
        }
    }

    pub fn is_start_tag(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::StartTag(tag) if tag.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.kind {
            TokenKind::StartTag(tag) => tag
                .attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Whether this start tag carries `class` among its space-separated classes.
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|classes| classes.split_whitespace().any(|candidate| candidate == class))
            .unwrap_or(false)
    }

    /// Whether `needle` occurs anywhere in the token: tag and attribute names,
    /// attribute values, text or comment content.
    pub fn mentions(&self, needle: &str) -> bool {
        match &self.kind {
            TokenKind::StartTag(tag) => {
                tag.name.contains(needle)
                    || tag
                        .attributes
                        .iter()
                        .any(|(key, value)| key.contains(needle) || value.contains(needle))
            }
            TokenKind::EndTag(name) => name.contains(needle),
            TokenKind::Text(content) | TokenKind::Comment(content) => content.contains(needle),
        }
    }
}

pub struct Tokenizer {
    tokens: std::vec::IntoIter<Token>,
}

impl Tokenizer {
    pub fn new(page: &str) -> Self {
        let document = Html::parse_document(page);
        let tokens: Vec<Token> = document
            .tree
            .root()
            .traverse()
            .filter_map(|edge| match edge {
                Edge::Open(node) => open_token(node.value()),
                Edge::Close(node) => close_token(node.value()),
            })
            .map(|kind| Token { kind })
            .collect();
        Self {
            tokens: tokens.into_iter(),
        }
    }

    /// Advance `n` tokens. Returns the last one, or `None` if the page ran out.
    pub fn advance(&mut self, n: usize) -> Option<Token> {
        let mut last = None;
        for _ in 0..n {
            last = Some(self.next()?);
        }
        last
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.tokens.next()
    }
}

fn open_token(node: &Node) -> Option<TokenKind> {
    match node {
        Node::Element(element) => Some(TokenKind::StartTag(Tag {
            name: element.name().to_string(),
            attributes: element
                .attrs()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        })),
        Node::Text(text) => Some(TokenKind::Text(text.to_string())),
        Node::Comment(comment) => Some(TokenKind::Comment(comment.to_string())),
        _ => None,
    }
}

// Text and comments are leaves; only elements close.
fn close_token(node: &Node) -> Option<TokenKind> {
    match node {
        Node::Element(element) => Some(TokenKind::EndTag(element.name().to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_kinds(page: &str) -> Vec<TokenKind> {
        Tokenizer::new(page)
            .map(|token| token.kind)
            .skip_while(|kind| !matches!(kind, TokenKind::StartTag(tag) if tag.name == "body"))
            .skip(1)
            .take_while(|kind| !matches!(kind, TokenKind::EndTag(name) if name == "body"))
            .collect()
    }

    fn text(content: &str) -> TokenKind {
        TokenKind::Text(content.to_string())
    }

    #[test]
    fn splits_tags_and_text() {
        let tokens = body_kinds("<p><b>Name:</b>\n<i>Jane</i></p>");
        assert_eq!(tokens.len(), 9);
        assert!(matches!(&tokens[0], TokenKind::StartTag(tag) if tag.name == "p"));
        assert!(matches!(&tokens[1], TokenKind::StartTag(tag) if tag.name == "b"));
        assert_eq!(tokens[2], text("Name:"));
        assert_eq!(tokens[3], TokenKind::EndTag("b".to_string()));
        assert_eq!(tokens[4], text("\n"));
        assert_eq!(tokens[6], text("Jane"));
        assert_eq!(tokens[8], TokenKind::EndTag("p".to_string()));
    }

    #[test]
    fn table_rows_keep_whitespace_between_cells() {
        let tokens = body_kinds("<table><tr><th>Name:</th>\n<td>Jane</td></tr></table>");
        let label = tokens
            .iter()
            .position(|kind| *kind == text("Name:"))
            .unwrap();
        assert_eq!(tokens[label + 1], TokenKind::EndTag("th".to_string()));
        assert_eq!(tokens[label + 2], text("\n"));
        assert!(matches!(&tokens[label + 3], TokenKind::StartTag(tag) if tag.name == "td"));
        assert_eq!(tokens[label + 4], text("Jane"));
    }

    #[test]
    fn reads_attributes() {
        let token = Tokenizer::new(r#"<OPTION Value="jdoe" class='a b' data-x=1 selected>"#)
            .find(|token| token.is_start_tag("option"))
            .unwrap();
        assert_eq!(token.attribute("value"), Some("jdoe"));
        assert_eq!(token.attribute("data-x"), Some("1"));
        assert_eq!(token.attribute("selected"), Some(""));
        assert!(token.has_class("b"));
        assert!(!token.has_class("c"));
    }

    #[test]
    fn decodes_named_and_numeric_entities() {
        let tokens = body_kinds("<p>R&oslash;dseth &amp; M&uuml;ller &#248; &#x41;</p>");
        assert_eq!(tokens[1], text("Rødseth & Müller ø A"));

        let token = Tokenizer::new(r#"<a title="x &gt; y &eacute;">link</a>"#)
            .find(|token| token.is_start_tag("a"))
            .unwrap();
        assert_eq!(token.attribute("title"), Some("x > y é"));
    }

    #[test]
    fn comments_are_single_tokens() {
        let tokens = body_kinds("<p><!-- <b>hidden</b> -->x</p>");
        assert_eq!(tokens[1], TokenKind::Comment(" <b>hidden</b> ".to_string()));
        assert_eq!(tokens[2], text("x"));
    }

    #[test]
    fn malformed_markup_still_tokenizes() {
        let tokens = body_kinds("a < b <td");
        assert_eq!(tokens, vec![text("a < b ")]);
    }

    #[test]
    fn advance_reports_exhaustion() {
        let mut tokenizer = Tokenizer::new("<p>b</p>");
        tokenizer.find(|token| token.is_start_tag("p")).unwrap();
        assert_eq!(tokenizer.advance(1).unwrap().text(), "b");
        assert!(tokenizer.advance(10).is_none());
    }

    #[test]
    fn mentions_covers_attributes_and_text() {
        let mut tokenizer = Tokenizer::new(r#"<a href="/people/jdoe/">profile</a>"#);
        let link = tokenizer.find(|token| token.is_start_tag("a")).unwrap();
        assert!(link.mentions("jdoe"));
        assert!(!link.mentions("ola"));
        assert!(tokenizer.next().unwrap().mentions("prof"));
    }
}
