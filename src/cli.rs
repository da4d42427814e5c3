use clap::Parser;
use std::path::PathBuf;

/// Watch auction bids and watchlist pages and notify on changes
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "bidwatch")]
#[command(version)]
pub struct Args {
    /// Directory holding the saved `active.html` and `watchlist.html`
    #[arg(long)]
    pub pages_dir: Option<PathBuf>,

    /// Where to write the JSON status snapshot
    #[arg(long)]
    pub status_file: Option<PathBuf>,

    /// Seconds between checks
    #[arg(long)]
    pub interval: Option<u64>,

    /// Run a single check and exit
    #[arg(long)]
    pub once: bool,

    /// Program that receives each notification on stdin
    #[arg(long)]
    pub notify_command: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::parse_from([
            "bidwatch",
            "--pages-dir",
            "pages",
            "--interval",
            "30",
            "--once",
            "--notify-command",
            "notify-send -u critical",
        ]);
        assert_eq!(args.pages_dir, Some(PathBuf::from("pages")));
        assert_eq!(args.interval, Some(30));
        assert!(args.once);
        assert_eq!(args.notify_command.as_deref(), Some("notify-send -u critical"));
        assert_eq!(args.status_file, None);
    }
}
