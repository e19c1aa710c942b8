use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use quiz_core::QuestionCatalog;
use quiz_core::model::{Facet, FacetChoice, SessionSettings};
use quiz_core::runner::Advance;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::celebration::PARTICLES_PER_BURST;
use services::{
    AnonymousIdentity, Celebration, CelebrationSettings, ConfettiBurst, IdentityProvider,
    ProgressReporter, QuizConfig, QuizError, QuizResults, QuizService, TokenIdentity,
    resolve_identity,
};
use tracing_subscriber::EnvFilter;

const CONFETTI_WIDTH: usize = 60;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSize { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSize { raw } => write!(f, "invalid --size value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [--catalog <file.json>] [--size <n>] [--name <name>]");
    eprintln!("       [--category <value>] [--grade <value>] [--subject <value>]");
    eprintln!();
    eprintln!("Facet values default to \"all\".");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_SESSION_SIZE, QUIZ_PROGRESS_URL, QUIZ_USER_NAME, QUIZ_AUTH_TOKEN, RUST_LOG");
}

#[derive(Debug, Default)]
struct Args {
    catalog: Option<PathBuf>,
    size: Option<usize>,
    name: Option<String>,
    filters: Vec<(Facet, FacetChoice)>,
    help: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => {
                    parsed.catalog = Some(require_value(args, "--catalog")?.into());
                }
                "--size" => {
                    let value = require_value(args, "--size")?;
                    let size: usize = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSize { raw: value.clone() })?;
                    parsed.size = Some(size);
                }
                "--name" => parsed.name = Some(require_value(args, "--name")?),
                "--category" => parsed.push_filter(Facet::Category, args, "--category")?,
                "--grade" => parsed.push_filter(Facet::Grade, args, "--grade")?,
                "--subject" => parsed.push_filter(Facet::Subject, args, "--subject")?,
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn push_filter(
        &mut self,
        facet: Facet,
        args: &mut impl Iterator<Item = String>,
        flag: &'static str,
    ) -> Result<(), ArgsError> {
        let value = require_value(args, flag)?;
        let choice = value.parse::<FacetChoice>().unwrap_or_default();
        self.filters.push((facet, choice));
        Ok(())
    }
}

/// Read one trimmed line; `None` on end of input.
fn prompt(message: &str) -> io::Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

fn print_facets(quiz: &QuizService) {
    for facet in Facet::ALL {
        let values: Vec<String> = quiz
            .facet_values(facet)
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("  {facet}: {}", values.join(", "));
    }
}

fn print_results(results: &QuizResults) {
    println!();
    println!(
        "Score: {}/{} ({}%) [{}]",
        results.correct, results.answered, results.summary.accuracy_percent, results.summary.tier
    );
    println!("{}", results.remark);
    if !results.mistakes.is_empty() {
        println!();
        println!("Review:");
        for mistake in &results.mistakes {
            println!("  [{}] {}", mistake.question_id, mistake.prompt);
            println!("      your answer:    {}", mistake.submitted);
            println!("      correct answer: {}", mistake.correct);
        }
    }
}

fn render_burst(burst: &ConfettiBurst) -> String {
    let mut row = vec![' '; CONFETTI_WIDTH];
    for particle in &burst.particles {
        let col = ((particle.left_pct / 100.0) * CONFETTI_WIDTH as f32) as usize;
        if let Some(cell) = row.get_mut(col.min(CONFETTI_WIDTH - 1)) {
            *cell = if particle.round { 'o' } else { '*' };
        }
    }
    row.into_iter().collect()
}

async fn celebrate() {
    let settings = CelebrationSettings {
        duration: Duration::from_secs(3),
        ..CelebrationSettings::default()
    };
    let mut rng = StdRng::from_os_rng();
    let handle = Celebration::start(settings, move |_| {
        let burst = ConfettiBurst::generate(&mut rng, PARTICLES_PER_BURST);
        print!("\r{}", render_burst(&burst));
        let _ = io::stdout().flush();
    });
    if let Some(handle) = handle {
        handle.wait().await;
        println!();
    }
}

/// Returns `false` when input ends.
fn play_session(quiz: &mut QuizService) -> Result<bool, Box<dyn std::error::Error>> {
    loop {
        let Some(runner) = quiz.runner() else {
            return Ok(true);
        };
        let Some(question) = runner.current() else {
            return Ok(true);
        };

        let record = question.record();
        println!();
        println!("Question {}/{}", runner.position() + 1, runner.len());
        println!("{}", record.prompt());
        if let Some(supplement) = record.supplement() {
            println!("({supplement})");
        }
        if let Some(image) = record.image() {
            println!("[image: {image}]");
        }
        let options = question.display_options().to_vec();
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }

        let Some(input) = prompt("> ")? else {
            return Ok(false);
        };
        let Some(index) = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|i| *i < options.len())
        else {
            println!("Enter a number between 1 and {}.", options.len());
            continue;
        };

        let outcome = quiz.submit_choice(index)?;
        if outcome.is_correct {
            println!("Correct!");
        } else {
            println!("Incorrect. The answer is: {}", outcome.correct_answer);
        }

        if prompt("Press Enter to continue...")?.is_none() {
            return Ok(false);
        }
        if quiz.advance()? == Advance::Completed {
            return Ok(true);
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(&mut std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let mut config = QuizConfig::from_env()?;
    if let Some(size) = args.size {
        config.session = SessionSettings::new(size)?;
    }
    if let Some(name) = args.name {
        config.user_name = Some(name);
    }

    let catalog = match &args.catalog {
        Some(path) => QuestionCatalog::from_json(&std::fs::read_to_string(path)?)?,
        None => QuestionCatalog::builtin()?,
    };
    tracing::info!(questions = catalog.len(), "catalog loaded");

    let provider: Box<dyn IdentityProvider> = match &config.auth_token {
        Some(token) => Box::new(TokenIdentity::new(token.clone())),
        None => Box::new(AnonymousIdentity),
    };
    let identity = resolve_identity(provider.as_ref()).await;
    println!("User ID: {}", identity.user_id);

    let reporter = ProgressReporter::from_url(config.progress_url.as_deref());
    let mut quiz = QuizService::new(catalog, reporter).with_settings(config.session);
    quiz.set_identity(identity);
    if let Some(name) = &config.user_name {
        quiz.set_display_name(name.clone());
    }
    for (facet, choice) in args.filters {
        quiz.select(facet, choice);
    }

    loop {
        match quiz.start().map(|_| ()) {
            Ok(()) => {}
            Err(QuizError::NoQuestions) => {
                println!("No questions match the selected filters. Available values:");
                print_facets(&quiz);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }

        if !play_session(&mut quiz)? {
            return Ok(());
        }

        if let Some(results) = quiz.results() {
            print_results(results);
            if results.celebrates() {
                celebrate().await;
            }
        }

        match prompt("Try again? [y/N] ")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => quiz.reset(),
            _ => return Ok(()),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(&mut args.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn parses_filters_and_size() {
        let args = parse(&["--size", "3", "--category", "History", "--grade", "all"]).unwrap();
        assert_eq!(args.size, Some(3));
        assert_eq!(
            args.filters,
            vec![
                (Facet::Category, FacetChoice::value("History")),
                (Facet::Grade, FacetChoice::All),
            ]
        );
    }

    #[test]
    fn rejects_missing_value_and_unknown_flag() {
        assert!(matches!(
            parse(&["--name"]),
            Err(ArgsError::MissingValue { flag: "--name" })
        ));
        assert!(matches!(parse(&["--verbose"]), Err(ArgsError::UnknownArg(_))));
        assert!(matches!(
            parse(&["--size", "many"]),
            Err(ArgsError::InvalidSize { .. })
        ));
    }

    #[test]
    fn burst_renders_fixed_width_row() {
        let mut rng = StdRng::seed_from_u64(1);
        let row = render_burst(&ConfettiBurst::generate(&mut rng, PARTICLES_PER_BURST));
        assert_eq!(row.chars().count(), CONFETTI_WIDTH);
        assert!(row.chars().any(|c| c == 'o' || c == '*'));
    }
}
