//! `edumentor chat` — interactive study session, plus single-question mode.

use std::sync::Arc;

use edumentor_agent::{EduAgent, SummaryStyle};
use edumentor_config::AppConfig;
use edumentor_core::extract::Attachment;
use edumentor_core::reply::{AnswerFeedback, Reply, ReplyBody};
use edumentor_core::search::SearchProvider;
use edumentor_core::session::SessionId;
use edumentor_providers::{GeminiGenerator, GoogleSearch, TikaExtractor};
use edumentor_store::FileStore;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Wire the live backends described by the config into an agent.
pub(crate) fn build_agent(config: &AppConfig) -> Result<EduAgent, Box<dyn std::error::Error>> {
    let Some(api_key) = config.api_key.clone() else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GEMINI_API_KEY = 'AIza...'   (recommended)");
        eprintln!("    GOOGLE_API_KEY = 'AIza...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    };

    let store = Arc::new(FileStore::new(config.memory_path()));
    let generator = Arc::new(GeminiGenerator::new(&config.model, api_key));

    // Search is optional: without credentials the agent answers from
    // conversation context alone.
    let search = config
        .search
        .credentials()
        .map(|(key, engine_id)| Arc::new(GoogleSearch::new(key, engine_id)) as Arc<dyn SearchProvider>);

    let extractor = Arc::new(TikaExtractor::new(&config.extractor.url));

    Ok(EduAgent::new(config, store, generator, search, extractor))
}

pub async fn run(session: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let agent = build_agent(&config)?;

    let session_id = match session {
        Some(name) => SessionId::from(&name),
        None => SessionId::new(),
    };

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        EduMentor — Interactive Session       ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:    {}", config.model);
    println!("  Session:  {session_id}");
    println!(
        "  Search:   {}",
        if config.search.credentials().is_some() { "on" } else { "off" }
    );
    println!();
    println!("  Ask anything, or try:");
    println!("    quiz me on <topic> with 5 questions");
    println!("    /pdf <path> [general|detailed|bullet]");
    println!("    /abandon  — drop the current quiz");
    println!("    /reset    — wipe this session");
    println!("    /quit     — exit");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let input = line.trim().to_string();
        if input.is_empty() {
            prompt()?;
            continue;
        }

        match input.as_str() {
            "/quit" | "/exit" => break,
            "/reset" => {
                agent.reset(&session_id).await?;
                println!("  Session wiped.");
            }
            "/abandon" => {
                if agent.abandon_quiz(&session_id).await? {
                    println!("  Quiz abandoned.");
                } else {
                    println!("  No quiz to abandon.");
                }
            }
            _ => {
                let (text, attachment) = match parse_input(&input) {
                    Ok(parsed) => parsed,
                    Err(message) => {
                        println!("  {message}");
                        prompt()?;
                        continue;
                    }
                };

                eprint!("  ...");
                let reply = agent.handle_message(&session_id, &text, attachment).await;
                eprint!("\r     \r");
                print_reply(&reply);
            }
        }

        prompt()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

pub async fn run_single(
    question: &str,
    session: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let agent = build_agent(&config)?;
    let session_id = SessionId::from(session.as_deref().unwrap_or("default"));

    eprint!("  Thinking...");
    let reply = agent.handle_message(&session_id, question, None).await;
    eprint!("\r              \r");

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        print_reply(&reply);
    }

    // An error reply should fail the command.
    if let ReplyBody::Error { message, .. } = &reply.body {
        return Err(message.clone().into());
    }

    Ok(())
}

/// Split an input line into message text plus an optional attachment.
///
/// `/pdf <path> [style]` reads the file and turns the style word into the
/// message the agent sees; everything else passes through unchanged.
fn parse_input(input: &str) -> Result<(String, Option<Attachment>), String> {
    let Some(rest) = input.strip_prefix("/pdf") else {
        return Ok((input.to_string(), None));
    };

    let mut parts = rest.split_whitespace();
    let Some(path) = parts.next() else {
        return Err("usage: /pdf <path> [general|detailed|bullet]".to_string());
    };
    let style_word = parts.next().unwrap_or("general");
    if SummaryStyle::parse(style_word).is_none() {
        return Err(format!(
            "unknown style {style_word:?} (expected general, detailed, or bullet)"
        ));
    }

    let bytes = std::fs::read(path).map_err(|e| format!("couldn't read {path}: {e}"))?;
    let filename = std::path::Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    Ok((
        format!("Summarize this document ({style_word} style)"),
        Some(Attachment::new(filename, bytes)),
    ))
}

fn prompt() -> std::io::Result<()> {
    use std::io::Write;
    print!("  You > ");
    std::io::stdout().flush()
}

fn option_letter(index: usize) -> char {
    (b'a' + index as u8) as char
}

fn print_feedback(feedback: &AnswerFeedback) {
    if feedback.was_correct {
        println!("  Correct!");
    } else {
        println!("  Not quite.");
    }
    if let Some(explanation) = &feedback.explanation {
        println!("  {explanation}");
    }
}

fn print_reply(reply: &Reply) {
    println!();
    match &reply.body {
        ReplyBody::Answer { text } => {
            for line in text.lines() {
                println!("  Mentor > {line}");
            }
        }
        ReplyBody::QuizQuestion { question, feedback } => {
            if let Some(feedback) = feedback {
                print_feedback(feedback);
                println!();
            }
            println!(
                "  Question {}/{}: {}",
                question.number, question.total, question.question
            );
            for (i, option) in question.options.iter().enumerate() {
                println!("    {}. {option}", option_letter(i));
            }
            println!("  Answer with a letter (a-d) or a number (1-4).");
        }
        ReplyBody::QuizSummary { summary, feedback } => {
            print_feedback(feedback);
            println!();
            println!(
                "  Quiz complete: {} — {}/{} correct ({:.1}%)",
                summary.topic, summary.score, summary.total, summary.percentage
            );
            for (i, result) in summary.breakdown.iter().enumerate() {
                let mark = if result.correct { "✓" } else { "✗" };
                println!("    {mark} Q{}: {}", i + 1, result.question);
            }
        }
        ReplyBody::PdfSummary {
            summary,
            original_chars,
        } => {
            println!("  Document summary ({original_chars} characters read):");
            println!();
            for line in summary.lines() {
                println!("  {line}");
            }
        }
        ReplyBody::Error { message, retryable } => {
            println!("  [Error] {message}");
            if *retryable {
                println!("  (Worth trying again.)");
            }
        }
    }
    println!();
}
