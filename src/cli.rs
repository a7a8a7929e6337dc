// src/cli.rs
use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, bail, eyre};

use crate::{
    cancel::CancelToken,
    config::Config,
    file,
    scrape::Orchestrator,
    specs,
    telegram::{self, BotClient},
    trigger::{ConsoleDelivery, Trigger, TriggerOutcome},
};

#[derive(Parser, Debug)]
#[command(name = "racecard", version, about = "Fetch race cards and save one CSV per venue/date")]
pub struct Cli {
    /// TOML config file (venues, days_ahead, out_dir, …).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the configured window once and print the saved files.
    Fetch(FetchArgs),
    /// Run the chat bot (/start, /fetch).
    Bot(BotArgs),
    /// Parse a saved race-card page into a CSV (no network).
    Parse(ParseArgs),
}

#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// Venue ids, comma separated (e.g. 1,2,4).
    #[arg(long, value_delimiter = ',')]
    pub venues: Vec<u32>,
    /// Number of days including today.
    #[arg(long)]
    pub days: Option<u32>,
    /// Output directory.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Concurrent page fetches.
    #[arg(long)]
    pub workers: Option<usize>,
    /// Stop starting new pages after this many seconds.
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct BotArgs {
    /// Bot token (else config `bot_token`, else $RACECARD_BOT_TOKEN).
    #[arg(long)]
    pub token: Option<String>,
    /// Only this user id may use /fetch.
    #[arg(long)]
    pub allowed_user: Option<i64>,
    #[command(flatten)]
    pub fetch: FetchArgs,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Saved HTML page.
    pub page: PathBuf,
    /// Date shown when the page header has none.
    #[arg(long, default_value = "Unknown Date")]
    pub date_label: String,
    /// Output directory.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl FetchArgs {
    fn apply(&self, cfg: &mut Config) {
        if !self.venues.is_empty() { cfg.venues = self.venues.clone(); }
        if let Some(d) = self.days { cfg.days_ahead = d; }
        if let Some(o) = &self.out { cfg.out_dir = o.clone(); }
        if let Some(w) = self.workers { cfg.workers = w; }
        if let Some(t) = self.timeout { cfg.run_timeout_secs = Some(t); }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    crate::log::init(cli.verbose);
    let mut cfg = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Fetch(args) => {
            args.apply(&mut cfg);
            cfg.validate()?;
            let trigger = Trigger::new(Orchestrator::from_config(cfg)?);
            let mut console = ConsoleDelivery::stdout();
            // Local runs act as the allowed identity.
            let me = trigger_identity(&trigger);
            match trigger.handle_fetch(me, &mut console) {
                TriggerOutcome::Failed => bail!("fetch failed"),
                _ => Ok(()),
            }
        }
        Command::Bot(args) => {
            args.fetch.apply(&mut cfg);
            if let Some(t) = args.token { cfg.bot_token = Some(t); }
            if let Some(u) = args.allowed_user { cfg.allowed_user_id = Some(u); }
            cfg.validate()?;

            let token = cfg
                .resolve_bot_token()
                .ok_or_else(|| eyre!("no bot token (use --token, config bot_token or $RACECARD_BOT_TOKEN)"))?;
            let bot = BotClient::new(&token)?;
            let trigger = Trigger::new(Orchestrator::from_config(cfg)?);
            telegram::serve(&bot, &trigger, &CancelToken::new());
            Ok(())
        }
        Command::Parse(args) => {
            let html = fs::read_to_string(&args.page)
                .wrap_err_with(|| format!("reading {}", args.page.display()))?;
            let doc = specs::read_page(&html, &args.date_label)
                .map_err(|cause| eyre!("{}: {cause}", args.page.display()))?;
            let out = args.out.unwrap_or(cfg.out_dir);
            let path = file::write_artifact(&out, &doc)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn trigger_identity(trigger: &Trigger) -> i64 {
    trigger.allowed_user().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fetch_flags() {
        let cli = Cli::try_parse_from([
            "racecard", "-v", "fetch", "--venues", "1,4", "--days", "2", "-o", "out", "--workers", "1",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Fetch(args) = cli.command else { panic!("expected fetch") };
        let mut cfg = Config::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.venues, vec![1, 4]);
        assert_eq!(cfg.days_ahead, 2);
        assert_eq!(cfg.out_dir, PathBuf::from("out"));
        assert_eq!(cfg.workers, 1);
    }

    #[test]
    fn parses_bot_and_parse() {
        let cli = Cli::try_parse_from(["racecard", "bot", "--token", "t", "--allowed-user", "9"]).unwrap();
        let Command::Bot(args) = cli.command else { panic!("expected bot") };
        assert_eq!(args.token.as_deref(), Some("t"));
        assert_eq!(args.allowed_user, Some(9));

        let cli = Cli::try_parse_from(["racecard", "parse", "page.html", "--date-label", "05 Jan 2025"]).unwrap();
        let Command::Parse(args) = cli.command else { panic!("expected parse") };
        assert_eq!(args.page, PathBuf::from("page.html"));
        assert_eq!(args.date_label, "05 Jan 2025");
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
