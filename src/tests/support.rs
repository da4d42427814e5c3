use crate::auction::{BidRecord, BidStatus, Price};
use crate::notify::{Notification, Notifier, Template};
use anyhow::{bail, Result};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    pub fn templates(&self) -> Vec<Template> {
        self.sent.lock().iter().map(|n| n.template).collect()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().push(notification.clone());
        Ok(())
    }
}

pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _notification: &Notification) -> Result<()> {
        bail!("gateway down")
    }
}

pub fn record(lot: &str, current_pounds: u64, status: BidStatus) -> BidRecord {
    BidRecord {
        lot_number: lot.to_owned(),
        title: format!("Test item number {lot}"),
        current_bid: Price::from_pounds(current_pounds),
        my_bid: Price::from_pounds(current_pounds),
        my_max_bid: Price::from_pounds(current_pounds),
        status,
        end_time: "2d 4h".to_owned(),
        url: format!("https://auction.test/Event/LotDetails/{lot}"),
    }
}

pub const ACTIVE_PAGE: &str = r#"<html><body>
<div class="auction-list">
  <div class="auction-item">
    <h3>Lot 101 - Makita Impact Driver [JPT101]</h3>
    <div>CURRENT BID</div><div class="current-bid">£45.00</div>
    <div>MY MAX BID</div><div class="max-bid">£60.00</div>
    <div class="status">Winning</div>
    <div class="time">ENDS IN: 2 Hours, 15 Minutes</div>
    <a href="/Event/LotDetails/555/makita">View</a>
  </div>
  <div class="auction-item">
    <h3>Lot 101 - Makita Impact Driver [JPT101]</h3>
    <div>CURRENT BID</div><div class="current-bid">£45.00</div>
    <div>MY MAX BID</div><div class="max-bid">£60.00</div>
  </div>
  <div class="auction-item">
    <h3>Lot 102 - Dewalt Circular Saw</h3>
    <div>CURRENT BID £80.00 MY MAX BID £70.00</div>
    <span class="time">45 Minutes</span>
  </div>
</div>
</body></html>"#;

/// [`ACTIVE_PAGE`] a while later: lot 101 was outbid, lot 102 is gone
pub const ACTIVE_PAGE_LATER: &str = r#"<html><body>
<div class="auction-list">
  <div class="auction-item">
    <h3>Lot 101 - Makita Impact Driver [JPT101]</h3>
    <div>CURRENT BID</div><div class="current-bid">£65.00</div>
    <div>MY MAX BID</div><div class="max-bid">£60.00</div>
    <div class="status">Outbid</div>
    <div class="time">ENDS IN: 1 Hours, 50 Minutes</div>
    <a href="/Event/LotDetails/555/makita">View</a>
  </div>
</div>
</body></html>"#;

pub const WATCHLIST_PAGE: &str = r#"<html><body>
<table>
  <thead><tr><th>Lot</th><th>Bid</th><th>Ends</th><th></th></tr></thead>
  <tbody>
    <tr>
      <td>Lot 201 - Vintage Oak Sideboard</td>
      <td>£120.00</td>
      <td>3 Days, 4 Hours</td>
      <td><a href="/Event/LotDetails/201/sideboard">View Item</a></td>
    </tr>
    <tr>
      <td>Lot 202 - View Item</td>
      <td>£5.00</td>
      <td>2 Hours</td>
    </tr>
  </tbody>
</table>
</body></html>"#;
