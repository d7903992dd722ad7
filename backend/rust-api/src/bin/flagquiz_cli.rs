use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use flagquiz_api::{
    config::ClientConfig,
    models::{OptionState, Phase},
    services::{flag_client::HttpFlagSource, quiz_session::QuizSession},
};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flagquiz_api=warn".into()),
        )
        .init();

    let config = ClientConfig::load()?;
    let source = HttpFlagSource::new(config.api_base_url.clone());
    let mut session = QuizSession::new();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("Guess the Country Flag");

    loop {
        match session.phase() {
            Phase::Idle => {
                if let Some(error) = session.error() {
                    println!("{} (is the server running at {}?)", error, config.api_base_url);
                }
                let Some(line) = prompt(&mut input, "Press Enter to load flags, q to quit: ").await?
                else {
                    break;
                };
                if line.eq_ignore_ascii_case("q") {
                    break;
                }
                println!("Loading flags...");
                session.load_flags(&source).await;
            }
            // load_flags runs to completion, so the loop never observes this
            Phase::Loading => continue,
            Phase::Ready => {
                let (min, max) = session.question_bounds();
                let text = format!(
                    "Number of questions ({}-{}) [{}]: ",
                    min,
                    max,
                    session.num_questions()
                );
                let Some(line) = prompt(&mut input, &text).await? else {
                    break;
                };
                if !line.is_empty() {
                    match line.parse::<usize>() {
                        Ok(n) => session.set_num_questions(n),
                        Err(_) => {
                            println!("Please enter a number");
                            continue;
                        }
                    }
                }
                if let Err(e) = session.start_game() {
                    println!("{}", e);
                }
            }
            Phase::Playing => {
                if !play_question(&mut session, &mut input).await? {
                    break;
                }
            }
            Phase::Finished => {
                println!("Game over! You scored {} / {}", session.score(), session.total());
                let Some(line) = prompt(&mut input, "Play again? [y/N]: ").await? else {
                    break;
                };
                if !line.eq_ignore_ascii_case("y") {
                    break;
                }
                if let Err(e) = session.play_again() {
                    println!("{}", e);
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Shows the current question, takes one answer and advances. Returns
/// `false` when input ends.
async fn play_question(session: &mut QuizSession, input: &mut Input) -> anyhow::Result<bool> {
    let Some(question) = session.current_question().cloned() else {
        return Ok(false);
    };

    println!();
    println!(
        "Question {} of {}",
        session.current_index() + 1,
        session.total()
    );
    println!("Flag: {}", question.image);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}) {}", i + 1, option);
    }

    while session.selected_option().is_none() {
        let Some(line) = prompt(input, "Your answer: ").await? else {
            return Ok(false);
        };
        let picked = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| question.options.get(i));
        match picked {
            Some(option) => {
                session.select_option(option);
            }
            None => println!("Pick a number between 1 and {}", question.options.len()),
        }
    }

    for option in &question.options {
        let marker = match session.option_state(option) {
            OptionState::Correct => "correct",
            OptionState::Wrong => "wrong",
            OptionState::Neutral => continue,
        };
        println!("  {}: {}", marker, option);
    }

    let next = if session.is_last_question() {
        "Finish"
    } else {
        "Next"
    };
    if prompt(input, &format!("[Enter] {} ", next)).await?.is_none() {
        return Ok(false);
    }
    session.advance();
    Ok(true)
}

async fn prompt(input: &mut Input, text: &str) -> anyhow::Result<Option<String>> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|line| line.trim().to_string()))
}
