use super::or_nothing;
use crate::auction::Price;
use crate::element::LotElement;
use regex::Regex;
use std::sync::LazyLock;

/// At most this many `£` amounts take part in positional assignment.
const MAX_POSITIONAL: usize = 3;

const AMOUNT: &str = r"£\s*([\d,]*\d(?:\.\d+)?)";

static ANY_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AMOUNT).expect("valid amount pattern"));

fn labelled(label: &str) -> Regex {
    Regex::new(&format!(r"(?is){label}[^£]*{AMOUNT}")).expect("valid labelled amount pattern")
}

static CURRENT_LABEL: LazyLock<Regex> = LazyLock::new(|| labelled(r"current\s+bid"));
static MY_LABEL: LazyLock<Regex> = LazyLock::new(|| labelled(r"\b(?:my|your)\s+bid"));
static MAX_LABEL: LazyLock<Regex> = LazyLock::new(|| labelled(r"\bmax(?:imum)?\s+bid"));

/// Sub-elements some page layouts use for each role
const CURRENT_SELECTOR: &str = ".current-bid";
const MY_SELECTOR: &str = ".my-bid";
const MAX_SELECTOR: &str = ".max-bid";

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Amounts {
    pub current: Price,
    /// Only set when the page says which amount is ours
    pub my: Option<Price>,
    pub max: Price,
    /// At least one amount was on the page
    pub found: bool,
}

pub fn amounts(element: &dyn LotElement, text: &str) -> Amounts {
    let structured = |css: &str| {
        or_nothing(css, element.select_text(css))
            .iter()
            .find_map(|t| first_amount(t))
    };

    let in_text = from_text(text);
    let current = structured(CURRENT_SELECTOR);
    let my = structured(MY_SELECTOR);
    let max = structured(MAX_SELECTOR);

    Amounts {
        current: current.unwrap_or(in_text.current),
        my: my.or(in_text.my),
        max: max.unwrap_or(in_text.max),
        found: in_text.found || current.is_some() || max.is_some(),
    }
}

pub fn from_text(text: &str) -> Amounts {
    let positional: Vec<Price> = ANY_AMOUNT
        .captures_iter(text)
        .filter_map(|c| c[1].parse().ok())
        .take(MAX_POSITIONAL)
        .collect();

    let label = |re: &Regex| re.captures(text).and_then(|c| c[1].parse::<Price>().ok());

    let (pos_current, pos_my, pos_max) = match positional.as_slice() {
        [] => return Amounts::default(),
        [only] => (*only, None, *only),
        [current, max] => (*current, None, *max),
        [current, my, max, ..] => (*current, Some(*my), *max),
    };

    let current = label(&CURRENT_LABEL);
    let max = label(&MAX_LABEL);
    // Once labels name the roles, a leftover amount isn't ours.
    let my = match (current, max) {
        (None, None) => label(&MY_LABEL).or(pos_my),
        _ => label(&MY_LABEL),
    };

    Amounts {
        current: current.unwrap_or(pos_current),
        my,
        max: max.unwrap_or(pos_max),
        found: true,
    }
}

pub fn first_amount(text: &str) -> Option<Price> {
    ANY_AMOUNT
        .captures_iter(text)
        .find_map(|c| c[1].parse().ok())
}
