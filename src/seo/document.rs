//! Queryable HTML document model
//!
//! A thin layer over `scraper` exposing only what the scoring rules need:
//! lookup by tag name, attribute access and text extraction. Parsing is
//! best-effort and never fails; malformed markup yields a partial tree.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document
pub struct Document {
    html: Html,
}

/// A single element inside a [`Document`]
#[derive(Clone, Copy)]
pub struct Element<'a> {
    inner: ElementRef<'a>,
}

impl Document {
    /// Parses markup into a document tree
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Returns the first element with the given tag name, in document order
    pub fn find_first(&self, tag: &str) -> Option<Element<'_>> {
        let selector = tag_selector(tag)?;
        self.html
            .select(&selector)
            .next()
            .map(|inner| Element { inner })
    }

    /// Returns every element with the given tag name, in document order
    pub fn find_all(&self, tag: &str) -> Vec<Element<'_>> {
        match tag_selector(tag) {
            Some(selector) => self
                .html
                .select(&selector)
                .map(|inner| Element { inner })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns the first `tag` element whose `attr` equals `value` exactly
    pub fn find_first_with_attr(&self, tag: &str, attr: &str, value: &str) -> Option<Element<'_>> {
        self.find_all(tag)
            .into_iter()
            .find(|element| element.attr(attr) == Some(value))
    }

    /// Counts elements with the given tag name
    pub fn count(&self, tag: &str) -> usize {
        self.find_all(tag).len()
    }
}

impl<'a> Element<'a> {
    /// Looks up an attribute value
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.inner.value().attr(name)
    }

    /// Concatenated text content of the element and its descendants
    pub fn text(&self) -> String {
        self.inner.text().collect()
    }
}

fn tag_selector(tag: &str) -> Option<Selector> {
    Selector::parse(tag).ok()
}
