//! Heads Up entry point
//!
//! Natively this is a terminal front end: list categories, play a round
//! from stdin, adjust settings and review past rounds. On the web the page
//! drives the library through `heads_up::web`.

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use anyhow::{Context, Result, bail};
    use clap::{Parser, Subcommand};

    use heads_up::bank::{DEFAULT_BANK_FILE, RANDOM_CHALLENGE};
    use heads_up::history::{RoundHistory, format_age, now_ms};
    use heads_up::round::RoundSummary;
    use heads_up::sensor::NoSensor;
    use heads_up::{GameMode, GameSession, QuestionBank, SessionEvent, Settings};

    /// Frame length while waiting out the lead-in
    const FRAME: Duration = Duration::from_millis(100);

    #[derive(Parser, Debug)]
    #[command(name = "heads-up", about = "Tilt-to-answer charades in the terminal")]
    struct Cli {
        /// Question bank (JSON object of category -> list of prompts)
        #[arg(long, default_value = DEFAULT_BANK_FILE)]
        words: PathBuf,
        /// Where settings and history are kept
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        /// Shuffle seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand, Debug)]
    enum Command {
        /// List question bank categories
        Categories,
        /// Play a round
        Play {
            /// Category to play (first category if omitted)
            category: Option<String>,
            /// Mix every category together
            #[arg(long, conflicts_with = "category")]
            random: bool,
            /// Override the saved mode for this round (countdown | score)
            #[arg(long)]
            mode: Option<String>,
            /// Override the saved target for this round
            #[arg(long)]
            target: Option<u32>,
        },
        /// Show or change the saved mode and target
        Settings {
            #[arg(long)]
            mode: Option<String>,
            #[arg(long)]
            target: Option<u32>,
        },
        /// Show past rounds
        History {
            /// Forget all past rounds
            #[arg(long)]
            clear: bool,
        },
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let settings_path = cli.data_dir.join(Settings::file_name());
        let history_path = cli.data_dir.join(RoundHistory::file_name());

        match cli.command {
            Command::Categories => {
                let bank = QuestionBank::load(&cli.words);
                println!("{} (all categories)", RANDOM_CHALLENGE);
                for category in bank.categories() {
                    println!("{} ({} questions)", category.name, category.questions.len());
                }
            }
            Command::Play {
                category,
                random,
                mode,
                target,
            } => {
                let bank = QuestionBank::load(&cli.words);
                let mut settings = Settings::load_from(&settings_path);
                apply_overrides(&mut settings, mode.as_deref(), target)?;

                let (name, questions) = if random {
                    (RANDOM_CHALLENGE.to_string(), bank.random_challenge())
                } else {
                    let name = match category {
                        Some(name) => name,
                        None => bank
                            .names()
                            .next()
                            .context("question bank has no categories")?
                            .to_string(),
                    };
                    let questions = bank
                        .get(&name)
                        .with_context(|| format!("no category named '{}'", name))?
                        .to_vec();
                    (name, questions)
                };

                let seed = cli.seed.unwrap_or_else(rand::random);
                if let Some(summary) = play(&name, &questions, &settings, seed)? {
                    let mut history = RoundHistory::load_from(&history_path);
                    if history.record(summary, now_ms()) {
                        println!("New best!");
                    }
                    history
                        .save_to(&history_path)
                        .with_context(|| format!("saving {}", history_path.display()))?;
                }
            }
            Command::Settings { mode, target } => {
                let mut settings = Settings::load_from(&settings_path);
                if mode.is_some() || target.is_some() {
                    apply_overrides(&mut settings, mode.as_deref(), target)?;
                    settings
                        .save_to(&settings_path)
                        .with_context(|| format!("saving {}", settings_path.display()))?;
                }
                print_settings(&settings);
            }
            Command::History { clear } => {
                let mut history = RoundHistory::load_from(&history_path);
                if clear {
                    history.clear();
                    history.save_to(&history_path)?;
                    println!("History cleared");
                } else {
                    print_history(&history);
                }
            }
        }
        Ok(())
    }

    fn apply_overrides(settings: &mut Settings, mode: Option<&str>, target: Option<u32>) -> Result<()> {
        if let Some(mode) = mode {
            match GameMode::from_str(mode) {
                Some(mode) => settings.switch_mode(mode),
                None => bail!("unknown mode '{}' (use countdown or score)", mode),
            }
        }
        if let Some(target) = target {
            settings.set_target(target)?;
        }
        Ok(())
    }

    fn print_settings(settings: &Settings) {
        println!("Mode:   {}", settings.mode.as_str());
        println!("        {}", settings.mode.description());
        println!("Target: {}", settings.target_label());
        let options: Vec<String> = settings
            .mode
            .presets()
            .iter()
            .map(|v| format!("{}{}", v, settings.mode.unit()))
            .collect();
        println!("Options: {}", options.join(", "));
    }

    fn print_history(history: &RoundHistory) {
        if history.is_empty() {
            println!("No rounds played yet");
            return;
        }
        let now = now_ms();
        for entry in &history.entries {
            let s = &entry.summary;
            println!(
                "{:>12}  {:<20} score {:>3}  {:.1}s",
                format_age(entry.timestamp, now),
                s.category,
                s.score,
                s.elapsed
            );
        }
    }

    fn render(events: &[SessionEvent]) {
        for event in events {
            match event {
                SessionEvent::Prompt(text) => println!("\n{}\n", text.replace('\n', " ")),
                SessionEvent::Countdown(n) => println!("{}...", n),
                SessionEvent::Go => println!("GO!"),
                SessionEvent::Question(q) => {
                    println!(">> {}", q);
                    print!("[y/enter = correct, n = skip, q = quit] ");
                    let _ = io::stdout().flush();
                }
                SessionEvent::Answered { correct } => {
                    println!("{}", if *correct { "Correct!" } else { "Skipped" })
                }
                SessionEvent::Status(_) | SessionEvent::RoundOver(_) | SessionEvent::ReturnToBank => {}
            }
        }
    }

    fn play(
        category: &str,
        questions: &[String],
        settings: &Settings,
        seed: u64,
    ) -> Result<Option<RoundSummary>> {
        let config = settings.round_config()?;
        let mut session = GameSession::new(NoSensor, seed);
        render(&session.enter(category, questions, config)?);

        // Lead-in runs on the wall clock
        while !session.is_playing() {
            std::thread::sleep(FRAME);
            render(&session.advance(FRAME.as_secs_f64()));
        }

        // Each answer advances the session by the time spent thinking
        let stdin = io::stdin();
        let mut last = Instant::now();
        let mut status = session.round().status_line();
        for line in stdin.lock().lines() {
            let line = line.context("reading answer")?;
            let now = Instant::now();
            let events = session.advance(now.duration_since(last).as_secs_f64());
            last = now;
            if let Some(summary) = finished(&events) {
                render(&events);
                return Ok(Some(summary));
            }
            status = latest_status(&events).unwrap_or(status);

            let events = match line.trim().to_lowercase().as_str() {
                "" | "y" => session.press_correct()?,
                "n" | "s" => session.press_skip()?,
                "q" => {
                    session.leave();
                    println!("Round abandoned");
                    return Ok(None);
                }
                other => {
                    println!("Unknown answer '{}'", other);
                    continue;
                }
            };
            status = latest_status(&events).unwrap_or(status);
            println!("[{}]", status);
            render(&events);
            if let Some(summary) = finished(&events) {
                return Ok(Some(summary));
            }
        }

        session.leave();
        Ok(None)
    }

    fn finished(events: &[SessionEvent]) -> Option<RoundSummary> {
        events.iter().find_map(|e| match e {
            SessionEvent::RoundOver(summary) => Some(summary.clone()),
            _ => None,
        })
    }

    fn latest_status(events: &[SessionEvent]) -> Option<String> {
        events.iter().rev().find_map(|e| match e {
            SessionEvent::Status(s) => Some(s.clone()),
            _ => None,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Heads Up (native) starting...");
    terminal::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is heads_up::web::start, this is just to satisfy the compiler
}
