use super::or_nothing;
use crate::element::LotElement;

/// Path fragment of lot detail pages
pub const LOT_DETAILS: &str = "LotDetails";

pub fn url(element: &dyn LotElement, page_url: &str, base_url: &str) -> String {
    or_nothing("a[href]", element.hrefs())
        .into_iter()
        .find(|href| href.contains(LOT_DETAILS))
        .map(|href| absolute(&href, base_url))
        .unwrap_or_else(|| page_url.to_owned())
}

fn absolute(href: &str, base_url: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_owned()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_relative_links() {
        assert_eq!(
            absolute("/Event/LotDetails/1/x", "https://auction.example/"),
            "https://auction.example/Event/LotDetails/1/x"
        );
        assert_eq!(
            absolute("https://other.example/LotDetails/2", "https://auction.example"),
            "https://other.example/LotDetails/2"
        );
    }
}
