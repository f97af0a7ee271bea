use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use votematch_app::catalog::CatalogStore;
use votematch_app::i18n::{Locale, Translator};
use votematch_app::logging;
use votematch_app::prefs::{FileKeyValueStore, Preferences};
use votematch_core::model::answer::AnswerValue;
use votematch_core::model::axis::Axis;
use votematch_core::model::result::QuizResult;
use votematch_core::session::QuizSession;
use votematch_core::survey::{self, SurveyMode, Translate};

/// Party alignment quiz over weighted ideological axes.
#[derive(Debug, Parser)]
#[command(
    name = "votematch",
    author,
    version,
    about = "Score your answers against party positions on ideological axes"
)]
struct Cli {
    /// Directory holding the static catalogs and translations.
    #[arg(long, value_name = "DIR", default_value = "crates/votematch-app/data")]
    data_dir: PathBuf,

    /// Preference file storing the chosen locale and survey mode.
    #[arg(long, value_name = "FILE", default_value = ".votematch-prefs.json")]
    prefs: PathBuf,

    /// Override the interface locale for this invocation (en, af).
    #[arg(long, value_name = "CODE")]
    locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer a survey interactively and print the ranked result.
    Run {
        /// Survey mode (quick, balanced, full); defaults to the stored preference.
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,
        /// Resume from a previously shared answer token.
        #[arg(long, value_name = "TOKEN")]
        answers: Option<String>,
    },
    /// Print the resolved question list for a survey mode.
    Questions {
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,
    },
    /// Score a shared answer token without prompting.
    Score {
        #[arg(long, value_name = "TOKEN")]
        answers: String,
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,
        /// Explicit comma-separated question ids the token was produced for.
        #[arg(long, value_name = "ID,ID,...")]
        questions: Option<String>,
        /// Emit the full result as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// List survey modes with their question counts.
    Modes,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let store = CatalogStore::new(&cli.data_dir);
    store.validate().with_context(|| {
        format!(
            "static catalogs in {} are missing or malformed",
            cli.data_dir.display()
        )
    })?;

    let mut prefs = Preferences::load(FileKeyValueStore::open(&cli.prefs));
    if let Some(raw) = cli.locale.as_deref() {
        let Some(locale) = Locale::from_str(raw) else {
            bail!("unknown locale '{raw}'; supported: en, af");
        };
        prefs.set_locale(locale);
    }

    let translator = Translator::load(&cli.data_dir.join("translations"), prefs.locale())
        .context("translation tables could not be loaded")?;

    match cli.command {
        Command::Run { mode, answers } => {
            let mode = resolve_mode(mode.as_deref(), &mut prefs)?;
            run_quiz(&store, &translator, mode, answers.as_deref())
        }
        Command::Questions { mode } => {
            let mode = resolve_mode(mode.as_deref(), &mut prefs)?;
            print_questions(&store, &translator, mode)
        }
        Command::Score {
            answers,
            mode,
            questions,
            json,
        } => {
            let mode = resolve_mode(mode.as_deref(), &mut prefs)?;
            score_token(
                &store,
                &translator,
                mode,
                &answers,
                questions.as_deref(),
                json,
            )
        }
        Command::Modes => print_modes(&store, &translator),
    }
}

/// An explicit `--mode` becomes the stored preference, mirroring a user
/// picking a mode in the interface.
fn resolve_mode(
    flag: Option<&str>,
    prefs: &mut Preferences<FileKeyValueStore>,
) -> Result<SurveyMode> {
    match flag {
        Some(raw) => {
            let Some(mode) = SurveyMode::from_str(raw) else {
                bail!("unknown survey mode '{raw}'; supported: quick, balanced, full");
            };
            prefs.set_mode(mode);
            Ok(mode)
        }
        None => Ok(prefs.mode()),
    }
}

fn build_session(
    store: &CatalogStore,
    translator: &Translator,
    mode: SurveyMode,
    explicit_ids: Option<&[String]>,
) -> Result<QuizSession> {
    let metadata = store.questions()?;
    let plan = store.survey_plan()?;
    let questions = survey::select_questions(mode, explicit_ids, &plan, &metadata, translator);
    if questions.is_empty() {
        bail!("survey mode '{}' resolved to no questions", mode.as_str());
    }
    Ok(QuizSession::new(mode, questions))
}

fn run_quiz(
    store: &CatalogStore,
    translator: &Translator,
    mode: SurveyMode,
    token: Option<&str>,
) -> Result<()> {
    let mut session = build_session(store, translator, mode, None)?;
    if let Some(token) = token {
        session
            .load_encoded_answers(token)
            .context("the share token was rejected; answers were not applied")?;
        info!(
            answered = session.answered_count(),
            "resumed from share token"
        );
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let total = session.questions().len();

    while !session.is_completed() {
        let Some(question) = session.current_question() else {
            break;
        };
        let number = session.current_index() + 1;
        println!();
        println!("[{number}/{total}] {}", question.text);
        for (index, option) in question.options.iter().enumerate() {
            println!("  {}. {}", index + 1, option.label);
        }
        if let Some(current) = session.answers().get(&question.id) {
            println!("  (currently: {})", current.label());
        }
        print!("answer [1-5, s skip, b back, q score now] > ");
        io::stdout().flush().ok();

        let Some(line) = lines.next() else {
            break;
        };
        let input = line.context("could not read from stdin")?;
        match input.trim() {
            "s" => session.skip_question(),
            "b" => session.previous_question(),
            "q" => break,
            other => match other.parse::<usize>().ok().and_then(|n| {
                (1..=AnswerValue::ORDERED.len())
                    .contains(&n)
                    .then(|| AnswerValue::ORDERED[n - 1])
            }) {
                Some(value) => {
                    let id = question.id.clone();
                    session.answer(&id, value);
                    session.next_question();
                }
                None => println!("unrecognised input '{other}'"),
            },
        }
    }

    let parties = store.parties()?;
    let positions = store.party_positions()?;
    let axes = store.axes()?;
    let result = session.compute_scores(&parties, &positions);
    println!();
    print_result(&result, &axes, translator);

    let token = session.encode_answers();
    println!();
    println!("Share or resume with:");
    println!(
        "  votematch score --answers {token} --mode {}",
        session.mode().as_str()
    );
    Ok(())
}

fn print_questions(store: &CatalogStore, translator: &Translator, mode: SurveyMode) -> Result<()> {
    let session = build_session(store, translator, mode, None)?;
    println!(
        "{} survey, {} questions:",
        mode.as_str(),
        session.questions().len()
    );
    for (index, question) in session.questions().iter().enumerate() {
        println!(
            "{:>3}. [{}  w={:.1}] {}",
            index + 1,
            question.axis,
            question.weight,
            question.text
        );
    }
    Ok(())
}

fn score_token(
    store: &CatalogStore,
    translator: &Translator,
    mode: SurveyMode,
    token: &str,
    explicit_ids: Option<&str>,
    json: bool,
) -> Result<()> {
    let ids: Option<Vec<String>> = explicit_ids.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    });
    let mut session = build_session(store, translator, mode, ids.as_deref())?;
    session
        .load_encoded_answers(token)
        .context("the share token was rejected; nothing was scored")?;

    let parties = store.parties()?;
    let positions = store.party_positions()?;
    let axes = store.axes()?;
    let result = session.compute_scores(&parties, &positions);

    if json {
        println!("{}", result.to_json()?);
    } else {
        print_result(&result, &axes, translator);
    }
    Ok(())
}

fn print_modes(store: &CatalogStore, translator: &Translator) -> Result<()> {
    for mode in SurveyMode::ALL {
        let session = build_session(store, translator, mode, None)?;
        println!("{:<10} {} questions", mode.as_str(), session.questions().len());
    }
    Ok(())
}

fn print_result(result: &QuizResult, axes: &[Axis], translator: &Translator) {
    println!(
        "Best match: {} ({:+.2}), confidence {}",
        result.primary.party.name,
        result.primary.alignment_score,
        result.confidence.as_str()
    );
    println!();
    for (rank, score) in result.all_scores.iter().enumerate() {
        println!(
            "{:>3}. {:<32} {:+.2}",
            rank + 1,
            score.party.name,
            score.alignment_score
        );
    }

    if !result.top_axes.is_empty() {
        println!();
        println!("Strongest axes for {}:", result.primary.party.short);
        for contribution in &result.top_axes {
            println!(
                "  {:<16} {:+.2}",
                axis_label(axes, translator, &contribution.axis_id),
                contribution.score
            );
        }
    }

    println!();
    println!("Coverage:");
    for coverage in &result.answered_axes {
        println!(
            "  {:<16} {}/{} answered",
            axis_label(axes, translator, &coverage.axis_id),
            coverage.questions_answered,
            coverage.total_questions
        );
    }
}

fn axis_label(axes: &[Axis], translator: &Translator, axis_id: &str) -> String {
    axes.iter()
        .find(|axis| axis.id == axis_id)
        .map(|axis| translator.translate(&axis.short_name_key))
        .unwrap_or_else(|| axis_id.to_string())
}
