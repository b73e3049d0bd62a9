use clap::Parser;
use console::Style;
use std::{path::PathBuf, process::ExitCode};
use todome_lib::{
    config::ScanConfig,
    parser::{langs, todo::UNASSIGNED},
    ListMode, Outcome, OutputSink, ReportMode, SortDirection, TodoRecord, VerifyMode,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Sort {
    /// Earliest due date first
    Asc,
    /// Latest due date first
    #[default]
    Desc,
}

impl From<Sort> for SortDirection {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Asc => SortDirection::Ascending,
            Sort::Desc => SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// List TODOs that have a due date
    List {
        #[clap(short, long)]
        /// Only list TODOs assigned to this name.
        assignee: Option<String>,

        #[clap(short, long, value_enum, default_value_t = Sort::Desc)]
        /// Order by due date.
        sort: Sort,

        #[clap(long)]
        /// Only list TODOs that are past due, and fail if there are any.
        overdue: bool,
    },
    /// Fail if any TODO is missing a valid due date
    Verify,
}

#[derive(clap::Parser, Debug)]
#[command(
    version,
    about,
    author,
    help_template(
        "\
{before-help}{name} {version} by {author-with-newline}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"
    )
)]
struct Cli {
    #[clap(short, long, default_value = ".")]
    /// The directory to scan.
    root: PathBuf,

    #[clap(short, long)]
    /// A JSON config file. Defaults to `todome.json` in the root directory,
    /// if there is one.
    config: Option<PathBuf>,

    #[clap(short, long)]
    /// File name suffix to scan, eg. ".java". May be supplied multiple times.
    /// Replaces the configured extensions.
    ext: Vec<String>,

    #[clap(short, long)]
    /// Scan files of this language, eg. "kotlin". May be supplied multiple
    /// times. Replaces the configured extensions.
    lang: Vec<String>,

    #[clap(long)]
    /// A phrase that introduces a due date. May be supplied multiple times,
    /// earlier phrases win.
    due_date_prefix: Vec<String>,

    #[clap(long)]
    /// The due date pattern, eg. "dd.MM.yyyy".
    date_format: Option<String>,

    #[clap(long)]
    /// The symbol in front of an assignee's name, eg. "@".
    mention_symbol: Option<String>,

    #[clap(long)]
    /// Print the reported TODOs as JSON instead of text.
    json: bool,

    #[clap(subcommand)]
    command: Command,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    fn scan_config(&self) -> Result<ScanConfig, todome_lib::Error> {
        let mut config = match self.config.as_ref() {
            Some(path) => ScanConfig::from_file(path)?,
            None => ScanConfig::from_root(&self.root)?,
        };

        if !self.ext.is_empty() || !self.lang.is_empty() {
            let mut extensions = self.ext.clone();
            for ext in langs::extensions_for_languages(&self.lang)?.into_iter() {
                if !extensions.contains(&ext) {
                    extensions.push(ext);
                }
            }
            config.extensions = extensions;
        }
        if !self.due_date_prefix.is_empty() {
            config.extraction.due_date_prefixes = self.due_date_prefix.clone();
        }
        if let Some(date_format) = self.date_format.as_ref() {
            config.extraction.date_format = date_format.clone();
        }
        if let Some(mention_symbol) = self.mention_symbol.as_ref() {
            config.extraction.mention_symbol = mention_symbol.clone();
        }

        config.validate()?;
        log::debug!("Using {config:#?}");
        Ok(config)
    }

    fn report_mode(&self) -> ReportMode {
        match &self.command {
            Command::List {
                assignee,
                sort,
                overdue,
            } => ReportMode::List(ListMode {
                assignee: assignee.clone(),
                sort: (*sort).into(),
                overdue_only: *overdue,
                ..Default::default()
            }),
            Command::Verify => ReportMode::Verify(VerifyMode),
        }
    }
}

struct Printer {
    red: Style,
    yellow: Style,
    blue: Style,
    json: bool,
    reported: Vec<TodoRecord>,
}

impl Printer {
    fn new(json: bool) -> Self {
        Self {
            red: Style::new().red(),
            yellow: Style::new().yellow().bright(),
            blue: Style::new().blue(),
            json,
            reported: vec![],
        }
    }

    /// Color a report line, picking out the assignee.
    fn styled(&self, todo: &TodoRecord, line: &str) -> String {
        let assignee = if todo.assignee == UNASSIGNED {
            &self.red
        } else {
            &self.blue
        };
        match line
            .strip_prefix("Found ")
            .and_then(|rest| rest.strip_prefix(todo.assignee.as_str()))
        {
            Some(rest) => format!(
                "{}{}{}",
                self.yellow.apply_to("Found "),
                assignee.apply_to(&todo.assignee),
                self.yellow.apply_to(rest)
            ),
            None => self.yellow.apply_to(line).to_string(),
        }
    }

    /// Print everything that was held back for the JSON output.
    fn finish(&mut self) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&self.reported)?);
        }
        Ok(())
    }
}

impl OutputSink for Printer {
    fn append_line(&mut self, todo: &TodoRecord, line: &str) {
        if self.json {
            self.reported.push(todo.clone());
        } else {
            println!("{}", self.styled(todo, line));
        }
    }
}

fn main() -> ExitCode {
    env_logger::builder().init();

    let cli = Cli::parse();
    let mut printer = Printer::new(cli.json);
    log::info!("Scanning {:?}", cli.root);

    let result = cli
        .scan_config()
        .and_then(|config| cli.report_mode().run(&cli.root, &config, &mut printer));

    match result {
        Ok(outcome) => {
            if let Err(e) = printer.finish() {
                eprintln!("{}", printer.red.apply_to(e));
                return ExitCode::from(2);
            }
            match outcome {
                Outcome::Success => ExitCode::SUCCESS,
                Outcome::Failure { reason, .. } => {
                    eprintln!("{}", printer.red.apply_to(reason));
                    ExitCode::from(1)
                }
            }
        }
        Err(e) => {
            eprintln!("{}", printer.red.apply_to(e));
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("todome").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_defaults() {
        let cli = parse(&["list"]);
        match cli.report_mode() {
            ReportMode::List(mode) => {
                assert_eq!(mode.assignee, None);
                assert_eq!(mode.sort, SortDirection::Descending);
                assert!(!mode.overdue_only);
            }
            other => panic!("expected list mode, got {other:?}"),
        }
    }

    #[test]
    fn list_flags() {
        let cli = parse(&["list", "--assignee", "yahor", "--sort", "asc", "--overdue"]);
        match cli.report_mode() {
            ReportMode::List(mode) => {
                assert_eq!(mode.assignee.as_deref(), Some("yahor"));
                assert_eq!(mode.sort, SortDirection::Ascending);
                assert!(mode.overdue_only);
            }
            other => panic!("expected list mode, got {other:?}"),
        }
        assert!(Cli::try_parse_from(["todome", "list", "--sort", "sideways"]).is_err());
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("todome.json"),
            r#"{ "dueDatePrefixes": ["by"], "mentionSymbol": "+", "extensions": [".rs"] }"#,
        )
        .unwrap();
        let root = dir.path().to_str().unwrap();

        let config = parse(&["--root", root, "verify"]).scan_config().unwrap();
        assert_eq!(config.extraction.due_date_prefixes, vec!["by"]);
        assert_eq!(config.extraction.mention_symbol, "+");
        assert_eq!(config.extensions, vec![".rs"]);

        let config = parse(&[
            "--root",
            root,
            "--ext",
            ".java",
            "--lang",
            "kotlin",
            "--due-date-prefix",
            "due to",
            "--date-format",
            "yyyy-MM-dd",
            "verify",
        ])
        .scan_config()
        .unwrap();
        assert_eq!(config.extensions, vec![".java", ".kt", ".kts"]);
        assert_eq!(config.extraction.due_date_prefixes, vec!["due to"]);
        assert_eq!(config.extraction.date_format, "yyyy-MM-dd");
        assert_eq!(config.extraction.mention_symbol, "+");
    }

    #[test]
    fn bad_flags_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        assert!(parse(&["--root", root, "--lang", "cobol", "verify"])
            .scan_config()
            .is_err());
        assert!(parse(&["--root", root, "--date-format", "HH:mm", "verify"])
            .scan_config()
            .is_err());
        assert!(parse(&["--root", root, "--mention-symbol", "", "verify"])
            .scan_config()
            .is_err());
    }

    #[test]
    fn styled_lines_keep_their_text() {
        console::set_colors_enabled(false);
        let printer = Printer::new(false);
        let todo = TodoRecord {
            assignee: "yahor".into(),
            due_date: None,
            file_path: "src/Test.java".into(),
            line: 1,
            column: 1,
        };
        let line = VerifyMode.format(&todo);
        assert_eq!(printer.styled(&todo, &line), line);
    }
}
