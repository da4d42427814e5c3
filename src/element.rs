//! Page elements the extractors read from
//!
//! An element is whatever the page scan believes to be one lot: its visible
//! text, one line per text node, plus a few structured lookups. The lookups
//! are fallible (a bad selector is a programming error worth reporting), but
//! "nothing there" is `Ok(None)` / an empty list.
use anyhow::{format_err, Result};
use scraper::{ElementRef, Selector};

pub trait LotElement {
    /// Newline separated, trimmed, non-empty text lines
    fn text(&self) -> String;

    fn attr(&self, name: &str) -> Result<Option<String>>;

    /// Text of every descendant matching `css`, one entry per match
    fn select_text(&self, css: &str) -> Result<Vec<String>>;

    /// `href` of every anchor in the element, the element itself included
    fn hrefs(&self) -> Result<Vec<String>>;
}

/// An element known only by its text
#[derive(Debug, Clone, Copy)]
pub struct TextElement<'a>(pub &'a str);

impl<'a> LotElement for TextElement<'a> {
    fn text(&self) -> String {
        self.0
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn attr(&self, _name: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn select_text(&self, _css: &str) -> Result<Vec<String>> {
        Ok(vec![])
    }

    fn hrefs(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}

/// An element of a parsed HTML page
#[derive(Clone, Copy)]
pub struct HtmlElement<'a> {
    element: ElementRef<'a>,
}

impl<'a> HtmlElement<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }
}

pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| format_err!("invalid selector {css:?}: {e:?}"))
}

fn joined_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

impl<'a> LotElement for HtmlElement<'a> {
    fn text(&self) -> String {
        joined_text(self.element, "\n")
    }

    fn attr(&self, name: &str) -> Result<Option<String>> {
        Ok(self.element.value().attr(name).map(str::to_owned))
    }

    fn select_text(&self, css: &str) -> Result<Vec<String>> {
        let selector = parse_selector(css)?;
        Ok(self
            .element
            .select(&selector)
            .map(|e| joined_text(e, " "))
            .filter(|t| !t.is_empty())
            .collect())
    }

    fn hrefs(&self) -> Result<Vec<String>> {
        let selector = parse_selector("a[href]")?;
        let own = (self.element.value().name() == "a")
            .then(|| self.element.value().attr("href"))
            .flatten();

        Ok(own
            .into_iter()
            .chain(
                self.element
                    .select(&selector)
                    .filter_map(|a| a.value().attr("href")),
            )
            .map(str::to_owned)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn html_element_lookups() -> Result<()> {
        let html = Html::parse_fragment(
            r#"<div class="lot" data-lot-number="77">
                 <h3>Lot 77 - Kettle</h3>
                 <span class="time">2 Hours</span>
                 <a href="/Event/LotDetails/1/kettle">view</a>
               </div>"#,
        );
        let div = html
            .select(&parse_selector("div.lot")?)
            .next()
            .ok_or_else(|| format_err!("no div"))?;
        let element = HtmlElement::new(div);

        assert_eq!(element.text(), "Lot 77 - Kettle\n2 Hours\nview");
        assert_eq!(element.attr("data-lot-number")?, Some("77".to_owned()));
        assert_eq!(element.select_text(".time")?, vec!["2 Hours".to_owned()]);
        assert_eq!(element.hrefs()?, vec!["/Event/LotDetails/1/kettle".to_owned()]);
        assert!(element.select_text("h3[").is_err());
        Ok(())
    }
}
