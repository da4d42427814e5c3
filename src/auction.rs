use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;
use thiserror::Error;

pub type LotNumber = String;
pub type LotNumberRef<'s> = &'s str;

/// Number of title characters that go into a [`LotKey`]
pub const KEY_TITLE_CHARS: usize = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    #[error("not a price: {0:?}")]
    Invalid(String),
    #[error("price too large: {0:?}")]
    Overflow(String),
}

/// A sterling amount, kept in pence
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_pence(pence: u64) -> Self {
        Self(pence)
    }

    pub const fn from_pounds(pounds: u64) -> Self {
        Self(pounds.saturating_mul(100))
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_sub(self, other: Price) -> Price {
        Price(self.0.saturating_sub(other.0))
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, other: Price) -> Price {
        Price(self.0.saturating_add(other.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "£{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Accepts `£1,234.5`, `1234.50`, `£ 7` and similar. Commas are dropped,
/// fractions beyond pence are truncated.
impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .trim()
            .trim_start_matches('£')
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();

        let (whole, fraction) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));

        if (whole.is_empty() && fraction.is_empty())
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PriceParseError::Invalid(s.to_owned()));
        }

        let pounds: u64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| PriceParseError::Overflow(s.to_owned()))?
        };

        let mut pence_digits = fraction.chars().take(2).collect::<String>();
        while pence_digits.len() < 2 {
            pence_digits.push('0');
        }
        let pence: u64 = pence_digits
            .parse()
            .map_err(|_| PriceParseError::Invalid(s.to_owned()))?;

        pounds
            .checked_mul(100)
            .and_then(|p| p.checked_add(pence))
            .map(Price)
            .ok_or_else(|| PriceParseError::Overflow(s.to_owned()))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidStatus {
    Winning,
    Outbid,
    Active,
    Ended,
    #[default]
    Unknown,
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BidStatus::Winning => "Winning",
            BidStatus::Outbid => "Outbid",
            BidStatus::Active => "Active",
            BidStatus::Ended => "Ended",
            BidStatus::Unknown => "Unknown",
        })
    }
}

/// Which account page a record was scraped from
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    ActiveBids,
    Watchlist,
}

impl ListKind {
    pub const ALL: [ListKind; 2] = [ListKind::ActiveBids, ListKind::Watchlist];

    /// Path of the listing page on the auction site
    pub fn path(self) -> &'static str {
        match self {
            ListKind::ActiveBids => "/Account/Bidding/Active",
            ListKind::Watchlist => "/Account/Bidding/Watching",
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            ListKind::ActiveBids => "active",
            ListKind::Watchlist => "watchlist",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ListKind::ActiveBids => "active bids",
            ListKind::Watchlist => "watchlist",
        })
    }
}

/// One observed state of one lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub lot_number: LotNumber,
    pub title: String,
    pub current_bid: Price,
    pub my_bid: Price,
    pub my_max_bid: Price,
    pub status: BidStatus,
    pub end_time: String,
    pub url: String,
}

impl BidRecord {
    pub fn key(&self) -> LotKey {
        LotKey::new(&self.lot_number, &self.title)
    }

    /// Lot number and title are present and are not extraction placeholders
    pub fn is_valid(&self) -> bool {
        !is_placeholder(&self.lot_number) && !is_placeholder(&self.title)
    }
}

impl fmt::Display for BidRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lot {}: {} - {}", self.lot_number, self.title, self.current_bid)
    }
}

/// Values older scrapers wrote in place of a missing lot number or title.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || value.eq_ignore_ascii_case("unknown")
        || value.eq_ignore_ascii_case("unknown item")
        || value.starts_with("UNKNOWN_")
}

/// Identity of a lot across scrapes
///
/// Lot numbers get reused between auctions, so the key carries the start of
/// the title as well.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LotKey(String);

impl LotKey {
    pub fn new(lot_number: LotNumberRef, title: &str) -> Self {
        let title: String = title.chars().take(KEY_TITLE_CHARS).collect();
        Self(format!("{lot_number}-{title}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
