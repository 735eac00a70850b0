//! # Operator CLI
//!
//! `waitlist-admin` works directly on the snapshot file named by the
//! environment. These are the trusted paths that may tell "new" from
//! "existing" entries.

use crate::container::{WaitlistConfig, WaitlistContainer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use wl_01_waitlist_ledger::WaitlistLedgerApi;
use wl_02_rate_limiter::{RateLimitApi, RateLimitPreset};

/// Waitlist operator tool
#[derive(Parser, Debug)]
#[command(name = "waitlist-admin")]
#[command(about = "Inspect and maintain the waitlist ledger")]
pub struct Cli {
    /// Snapshot file (overrides WAITLIST_DATA_PATH)
    #[arg(short, long, global = true)]
    pub data_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print ledger counters as JSON
    Stats,
    /// List entries by position
    List {
        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print one entry as JSON
    Show { email: String },
    /// Permanently remove an entry
    Erase { email: String },
    /// Add tags to an entry
    Tag {
        email: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Record the mailing-list subscriber id of an entry
    SetSubscriber { email: String, subscriber_id: String },
    /// Generate a fresh base64 encryption key
    GenKey,
    /// Run one rate limit check and print the decision and headers
    RateCheck {
        identifier: String,
        #[arg(short, long, default_value = "strict")]
        preset: RateLimitPreset,
    },
}

impl Command {
    /// Commands that do not touch the ledger.
    pub fn needs_container(&self) -> bool {
        !matches!(self, Command::GenKey)
    }
}

/// Load configuration, build the container if needed and run `cli.command`.
pub async fn execute(cli: Cli) -> Result<String> {
    if !cli.command.needs_container() {
        return run_standalone(&cli.command);
    }

    let mut config = WaitlistConfig::from_env().context("Invalid waitlist configuration")?;
    if let Some(path) = cli.data_path {
        config.data_path = path;
    }
    let container = WaitlistContainer::build(config).context("Failed to start waitlist subsystems")?;
    run(&container, cli.command).await
}

fn run_standalone(command: &Command) -> Result<String> {
    match command {
        Command::GenKey => Ok(shared_crypto::generate_key_base64()),
        other => anyhow::bail!("{other:?} needs the ledger"),
    }
}

/// Run one command against a built container.
pub async fn run(container: &WaitlistContainer, command: Command) -> Result<String> {
    match command {
        Command::Stats => {
            let stats = container.ledger.read().stats();
            Ok(serde_json::to_string_pretty(&stats)?)
        }
        Command::List { limit } => {
            let entries = container.ledger.read().all_entries();
            let mut out = String::new();
            for entry in entries.iter().take(limit.unwrap_or(usize::MAX)) {
                writeln!(
                    out,
                    "{:>6}  {:<40}  {:>3}  {}",
                    entry.position, entry.email, entry.referral_count, entry.referral_code
                )?;
            }
            writeln!(out, "{} of {} entries", entries.len().min(limit.unwrap_or(usize::MAX)), entries.len())?;
            Ok(out)
        }
        Command::Show { email } => {
            let entry = container
                .ledger
                .read()
                .get_by_email(&email)
                .context("No entry for that email")?;
            Ok(serde_json::to_string_pretty(&entry)?)
        }
        Command::Erase { email } => {
            let removed = container.ledger.write().delete_by_email(&email)?;
            Ok(if removed { "erased" } else { "not found" }.to_string())
        }
        Command::Tag { email, tags } => {
            let entry = container
                .ledger
                .write()
                .add_tags(&email, &tags)?
                .context("No entry for that email")?;
            Ok(entry.tags.join(","))
        }
        Command::SetSubscriber {
            email,
            subscriber_id,
        } => {
            container
                .ledger
                .write()
                .set_external_subscriber_id(&email, subscriber_id)?
                .context("No entry for that email")?;
            Ok("updated".to_string())
        }
        Command::GenKey => run_standalone(&Command::GenKey),
        Command::RateCheck { identifier, preset } => {
            let limiter = &container.rate_limiter;
            let decision = limiter.check_preset(&identifier, preset).await;
            let mut out = serde_json::to_string_pretty(&decision)?;
            for (name, value) in decision.headers(limiter.now_epoch_seconds()) {
                write!(out, "\n{name}: {value}")?;
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::SecretKey;

    fn make_container(dir: &tempfile::TempDir) -> WaitlistContainer {
        WaitlistContainer::build(WaitlistConfig {
            data_path: dir.path().join("waitlist.json"),
            ..Default::default()
        })
        .unwrap()
    }

    fn seed(container: &WaitlistContainer, emails: &[&str]) {
        let mut ledger = container.ledger.write();
        for email in emails {
            let code = ledger.generate_unique_referral_code().unwrap();
            ledger
                .add_entry(wl_01_waitlist_ledger::NewEntry::new(*email, code, "en"))
                .unwrap();
        }
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["waitlist-admin", "rate-check", "signup:1.2.3.4", "-p", "lenient"])
            .unwrap();
        assert_eq!(
            cli.command,
            Command::RateCheck {
                identifier: "signup:1.2.3.4".into(),
                preset: RateLimitPreset::Lenient
            }
        );

        let cli = Cli::try_parse_from(["waitlist-admin", "--data-path", "/tmp/w.json", "stats"]).unwrap();
        assert_eq!(cli.data_path, Some(PathBuf::from("/tmp/w.json")));

        assert!(Cli::try_parse_from(["waitlist-admin", "tag", "a@x.com"]).is_err());
        assert!(Cli::try_parse_from(["waitlist-admin", "rate-check", "x", "-p", "extreme"]).is_err());
    }

    #[tokio::test]
    async fn test_gen_key_needs_no_ledger() {
        let cli = Cli::try_parse_from(["waitlist-admin", "gen-key"]).unwrap();
        assert!(!cli.command.needs_container());

        let key = execute(cli).await.unwrap();
        assert!(SecretKey::from_base64(&key).is_ok());
    }

    #[tokio::test]
    async fn test_list_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let container = make_container(&dir);
        seed(&container, &["a@x.com", "b@x.com", "c@x.com"]);

        let listing = run(&container, Command::List { limit: Some(2) }).await.unwrap();
        assert!(listing.contains("a@x.com"));
        assert!(listing.contains("b@x.com"));
        assert!(!listing.contains("c@x.com"));
        assert!(listing.contains("2 of 3 entries"));

        let stats = run(&container, Command::Stats).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&stats).unwrap();
        assert_eq!(json["totalEntries"], 3);
        assert_eq!(json["positionCounter"], 850);
    }

    #[tokio::test]
    async fn test_tag_subscriber_and_erase() {
        let dir = tempfile::tempdir().unwrap();
        let container = make_container(&dir);
        seed(&container, &["a@x.com"]);

        let tags = run(
            &container,
            Command::Tag {
                email: "a@x.com".into(),
                tags: vec!["beta".into(), "vip".into()],
            },
        )
        .await
        .unwrap();
        assert_eq!(tags, "beta,vip");

        run(
            &container,
            Command::SetSubscriber {
                email: "A@x.com".into(),
                subscriber_id: "sub_42".into(),
            },
        )
        .await
        .unwrap();
        let shown = run(&container, Command::Show { email: "a@x.com".into() })
            .await
            .unwrap();
        assert!(shown.contains("sub_42"));

        let erased = run(&container, Command::Erase { email: "a@x.com".into() })
            .await
            .unwrap();
        assert_eq!(erased, "erased");
        let again = run(&container, Command::Erase { email: "a@x.com".into() })
            .await
            .unwrap();
        assert_eq!(again, "not found");
        assert!(run(&container, Command::Show { email: "a@x.com".into() })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_rate_check_prints_headers() {
        let dir = tempfile::tempdir().unwrap();
        let container = make_container(&dir);

        let out = run(
            &container,
            Command::RateCheck {
                identifier: "ops".into(),
                preset: RateLimitPreset::Strict,
            },
        )
        .await
        .unwrap();

        assert!(out.contains("X-RateLimit-Limit: 5"));
        assert!(out.contains("X-RateLimit-Remaining: 4"));
        assert!(!out.contains("Retry-After"));
    }
}
