//! Shell command - interactive session with adjustable filters
//!
//! Searches run in the background so filters can be changed while one is in
//! flight. Each search gets a session ticket; results for anything but the
//! latest ticket are dropped.

use std::io::Write;

use beacon_core::{
    Config, Credential, FilterState, IssueStateFilter, QueryTicket, Session, SortField,
    SortOrder,
};
use beacon_github::{ClientConfig, IssueQueryClient, QueryResult};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::render;

const HELP: &str = "\
Commands:
  org <name>          set the organization
  label <name>        set the label
  language <lang|->   set or clear the language
  repo <name|->       set or clear the repository
  state <open|closed|all>
  sort <created|updated|comments>
  order <asc|desc>
  per-page <1-100>
  token <token>       remember a GitHub token for later searches
  forget-token        stop sending a token
  reset               restore the filters the shell started with
  clear               clear language, repository, state, sort and page size
  show                print the current filters
  search              run a search with the current filters
  abort               cancel the running search
  help                show this help
  quit                leave the shell";

/// Arguments for the shell command
#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Initial organization
    #[arg(short, long)]
    pub org: Option<String>,

    /// Initial label
    #[arg(short, long)]
    pub label: Option<String>,

    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Org(String),
    Label(String),
    Language(Option<String>),
    Repo(Option<String>),
    State(IssueStateFilter),
    Sort(SortField),
    Order(SortOrder),
    PerPage(u8),
    Token(String),
    ForgetToken,
    Reset,
    Clear,
    Show,
    Search,
    Abort,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    /// Parse a line of input
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let required = |what: &str| {
            if rest.is_empty() {
                Err(format!("'{}' needs a {}", word, what))
            } else {
                Ok(rest.to_string())
            }
        };
        let optional = || match rest {
            "" | "-" => None,
            value => Some(value.to_string()),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Ok(ShellCommand::Empty),
            "org" => required("name").map(ShellCommand::Org),
            "label" => required("name").map(ShellCommand::Label),
            "language" | "lang" => Ok(ShellCommand::Language(optional())),
            "repo" => Ok(ShellCommand::Repo(optional())),
            "state" => rest
                .parse()
                .map(ShellCommand::State)
                .map_err(|e: beacon_core::Error| e.to_string()),
            "sort" => rest
                .parse()
                .map(ShellCommand::Sort)
                .map_err(|e: beacon_core::Error| e.to_string()),
            "order" => rest
                .parse()
                .map(ShellCommand::Order)
                .map_err(|e: beacon_core::Error| e.to_string()),
            "per-page" | "per_page" => {
                let value: u8 = rest
                    .parse()
                    .map_err(|_| format!("'{}' is not a page size", rest))?;
                beacon_core::FilterState::validate_per_page(value)
                    .map(ShellCommand::PerPage)
                    .map_err(|e| e.to_string())
            }
            "token" => required("token").map(ShellCommand::Token),
            "forget-token" => Ok(ShellCommand::ForgetToken),
            "reset" => Ok(ShellCommand::Reset),
            "clear" => Ok(ShellCommand::Clear),
            "show" => Ok(ShellCommand::Show),
            "search" | "go" => Ok(ShellCommand::Search),
            "abort" => Ok(ShellCommand::Abort),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" => Ok(ShellCommand::Quit),
            other => Err(format!("Unknown command '{}'. Type 'help' for commands.", other)),
        }
    }

    /// Apply a settings command to the session
    ///
    /// Returns `false` for commands that do not change settings.
    pub fn apply(&self, session: &mut Session) -> bool {
        match self {
            ShellCommand::Token(token) => {
                session.remember_credential(Credential::new(token));
                return true;
            }
            ShellCommand::ForgetToken => {
                session.forget_credential();
                return true;
            }
            ShellCommand::Reset => {
                session.reset_filters();
                return true;
            }
            _ => {}
        }

        let filters = session.filters_mut();
        match self {
            ShellCommand::Org(org) => filters.organization = org.clone(),
            ShellCommand::Label(label) => filters.label = label.clone(),
            ShellCommand::Language(language) => filters.language = language.clone(),
            ShellCommand::Repo(repo) => filters.repository = repo.clone(),
            ShellCommand::State(state) => filters.state = *state,
            ShellCommand::Sort(sort) => filters.sort = *sort,
            ShellCommand::Order(order) => filters.order = *order,
            ShellCommand::PerPage(per_page) => filters.per_page = *per_page,
            ShellCommand::Clear => filters.reset_refinements(),
            _ => return false,
        }
        true
    }
}

/// A finished background search and the filters it ran with
#[derive(Debug)]
struct Completed {
    ticket: QueryTicket,
    filters: FilterState,
    result: QueryResult,
}

impl Completed {
    /// Filters and result to show, or `None` once a newer search has started
    fn into_current(self, session: &Session) -> Option<(FilterState, QueryResult)> {
        if session.is_current(self.ticket) {
            Some((self.filters, self.result))
        } else {
            None
        }
    }
}

fn describe(session: &Session) -> String {
    let filters = session.filters();
    format!(
        "org={} label={:?} language={} repo={} state={} sort={} order={} per-page={} token={}",
        if filters.organization.is_empty() { "(none)" } else { filters.organization.as_str() },
        filters.label,
        filters.language().unwrap_or("-"),
        filters.repository().unwrap_or("-"),
        filters.state,
        filters.sort,
        filters.order,
        filters.per_page,
        if session.credential().is_some() { "set" } else { "none" },
    )
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "beacon> ")?;
    stdout.flush()
}

impl ShellArgs {
    /// Execute the shell command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let client = IssueQueryClient::new(ClientConfig::from(&config.github))?;

        let mut filters = config.initial_filters();
        if let Some(org) = &self.org {
            filters.organization = org.clone();
        }
        if let Some(label) = &self.label {
            filters.label = label.clone();
        }

        let mut session = Session::new(filters);
        if let Some(credential) = Credential::from_input(self.token.clone()) {
            session.remember_credential(credential);
        }

        if verbose {
            tracing::info!(
                api_url = %client.api_base(),
                timeout = ?client.timeout(),
                "Starting interactive session"
            );
        }

        println!("Issue Beacon shell. Type 'help' for commands.");
        println!("{}", describe(&session));
        prompt()?;

        let (tx, mut rx) = mpsc::unbounded_channel::<Completed>();
        let mut in_flight: Option<CancellationToken> = None;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };

                    match ShellCommand::parse(&line) {
                        Ok(ShellCommand::Quit) => break,
                        Ok(ShellCommand::Empty) => {}
                        Ok(ShellCommand::Help) => println!("{}", HELP),
                        Ok(ShellCommand::Show) => println!("{}", describe(&session)),
                        Ok(ShellCommand::Search) => {
                            let ticket = session.begin_query();
                            let filters = session.filters().clone();
                            let handle = client.spawn_query(
                                filters.clone(),
                                session.credential().cloned(),
                            );
                            in_flight = Some(handle.cancellation_token());

                            let tx = tx.clone();
                            tokio::spawn(async move {
                                let result = handle.result().await;
                                // Receiver is gone only when the shell has exited
                                let _ = tx.send(Completed { ticket, filters, result });
                            });
                            println!("Searching...");
                        }
                        Ok(ShellCommand::Abort) => match in_flight.take() {
                            Some(token) => token.cancel(),
                            None => println!("No search is running."),
                        },
                        Ok(command) => {
                            command.apply(&mut session);
                            println!("{}", describe(&session));
                        }
                        Err(message) => eprintln!("{}", message),
                    }
                    prompt()?;
                }
                Some(done) = rx.recv() => {
                    let ticket = done.ticket;
                    let Some((filters, result)) = done.into_current(&session) else {
                        debug!(ticket = ticket.sequence(), "Discarding stale search result");
                        continue;
                    };
                    in_flight = None;

                    println!();
                    match result {
                        Ok(issues) => render::print_issues(&filters, &issues, false),
                        Err(e) => eprintln!("Error: {}", e),
                    }
                    prompt()?;
                }
            }
        }

        if let Some(token) = in_flight {
            token.cancel();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        assert_eq!(
            ShellCommand::parse("org rust-lang"),
            Ok(ShellCommand::Org("rust-lang".to_string()))
        );
        assert_eq!(
            ShellCommand::parse("  label good first issue "),
            Ok(ShellCommand::Label("good first issue".to_string()))
        );
        assert_eq!(
            ShellCommand::parse("state all"),
            Ok(ShellCommand::State(IssueStateFilter::All))
        );
        assert_eq!(
            ShellCommand::parse("sort comments"),
            Ok(ShellCommand::Sort(SortField::Comments))
        );
        assert_eq!(ShellCommand::parse("per-page 50"), Ok(ShellCommand::PerPage(50)));
    }

    #[test]
    fn test_parse_clearing_values() {
        assert_eq!(ShellCommand::parse("language -"), Ok(ShellCommand::Language(None)));
        assert_eq!(ShellCommand::parse("repo"), Ok(ShellCommand::Repo(None)));
        assert_eq!(
            ShellCommand::parse("repo api"),
            Ok(ShellCommand::Repo(Some("api".to_string())))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(ShellCommand::parse("org").is_err());
        assert!(ShellCommand::parse("state sideways").is_err());
        assert!(ShellCommand::parse("per-page 0").is_err());
        assert!(ShellCommand::parse("per-page many").is_err());
        assert!(ShellCommand::parse("frobnicate").is_err());
        assert_eq!(ShellCommand::parse("   "), Ok(ShellCommand::Empty));
    }

    #[test]
    fn test_apply_changes_session() {
        let mut session = Session::new(FilterState::new("acme", "bug"));

        assert!(ShellCommand::Language(Some("rust".to_string())).apply(&mut session));
        assert!(ShellCommand::Token("ghp_abc".to_string()).apply(&mut session));
        assert_eq!(session.filters().language(), Some("rust"));
        assert_eq!(session.credential().unwrap().expose(), "ghp_abc");

        assert!(ShellCommand::Org("other".to_string()).apply(&mut session));
        assert!(ShellCommand::Clear.apply(&mut session));
        assert!(session.filters().language().is_none());
        assert_eq!(session.filters().organization, "other");

        assert!(ShellCommand::Label("docs".to_string()).apply(&mut session));
        assert!(ShellCommand::Reset.apply(&mut session));
        assert_eq!(session.filters(), &FilterState::new("acme", "bug"));
        // reset keeps the remembered token
        assert!(session.credential().is_some());

        assert!(ShellCommand::ForgetToken.apply(&mut session));
        assert!(session.credential().is_none());

        assert!(!ShellCommand::Search.apply(&mut session));
    }

    #[test]
    fn test_result_keeps_filters_it_ran_with() {
        let mut session = Session::new(FilterState::new("acme", "bug"));
        let ticket = session.begin_query();
        let done = Completed {
            ticket,
            filters: session.filters().clone(),
            result: Ok(vec![]),
        };

        // Filters edited while the search is still running
        ShellCommand::Org("x".to_string()).apply(&mut session);
        ShellCommand::Label("other".to_string()).apply(&mut session);

        let (filters, result) = done.into_current(&session).unwrap();
        assert_eq!(filters.organization, "acme");
        assert_eq!(filters.label, "bug");
        assert_eq!(result, Ok(vec![]));
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut session = Session::new(FilterState::new("acme", "bug"));
        let first = session.begin_query();
        session.begin_query();

        let done = Completed {
            ticket: first,
            filters: session.filters().clone(),
            result: Ok(vec![]),
        };
        assert!(done.into_current(&session).is_none());
    }

    #[test]
    fn test_describe_hides_token() {
        let mut session = Session::new(FilterState::new("acme", "bug"));
        session.remember_credential(Credential::new("ghp_secret"));
        let text = describe(&session);
        assert!(text.contains("token=set"));
        assert!(!text.contains("ghp_secret"));
    }
}
