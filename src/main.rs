use anyhow::{Context, Result, bail};
use bomb_party::cli::{
    CliInterface, Command, GenerateArgs, PlayArgs, format_pool_hint, parse_cli,
};
use bomb_party::corpus::{self, DEFAULT_PROMPT_LENGTHS, DictionarySource};
use bomb_party::logging::init_logging;
use bomb_party::tui::TuiInterface;
use bomb_party::{RoundEngine, game_loop};

fn main() -> Result<()> {
    let cli = parse_cli();
    init_logging(cli.log_file.as_deref()).context("failed to open log file")?;

    match &cli.command {
        Some(Command::Generate(args)) => generate(args),
        None => play(&cli.play),
    }
}

fn play(args: &PlayArgs) -> Result<()> {
    let config = args.to_config().context("invalid game settings")?;

    let corpus_dir = corpus::default_corpus_dir();
    let source = corpus::resolve_dictionary(args.dictionary_path.as_deref(), corpus_dir.as_deref());
    let words = source
        .load()
        .with_context(|| format!("failed to load dictionary from {source}"))?;
    let word_count = words.len();

    let prompts_path = corpus::resolve_prompts(args.prompts_path.as_deref(), corpus_dir.as_deref());
    let prompts = match prompts_path {
        Some(path) => corpus::load_prompts_from_file(&path)
            .with_context(|| format!("failed to load prompts from {}", path.display()))?,
        None => corpus::build_prompts(&words, DEFAULT_PROMPT_LENGTHS, 1),
    };

    let mut engine = RoundEngine::new(words, prompts, &config);
    println!(
        "Loaded {word_count} words from {source}. {} prompts with wpp >= {}.",
        engine.prompts_remaining(),
        config.wpp
    );
    let embedded = source == DictionarySource::Embedded;
    if let Some(hint) = format_pool_hint(engine.prompts_remaining(), config.wpp, embedded) {
        log::warn!("{hint}");
        println!("{hint}");
    }
    if engine.prompts_remaining() == 0 {
        return Ok(());
    }

    // Each interface restores the terminal when dropped, before anything below prints.
    let summary = if args.tui {
        let mut interface = TuiInterface::new(config.round_timeout)?;
        game_loop(&mut engine, &mut interface, config.round_timeout)?
    } else {
        println!("Type a word containing the prompt and press ENTER. ESC quits.");
        let mut interface = CliInterface::new()?;
        game_loop(&mut engine, &mut interface, config.round_timeout)?
    };
    log::info!("Game finished: {summary}");

    if args.tui {
        println!("{summary}");
    }
    Ok(())
}

fn generate(args: &GenerateArgs) -> Result<()> {
    if args.min_len == 0 || args.min_len > args.max_len {
        bail!("--min-len must be between 1 and --max-len ({})", args.max_len);
    }

    let corpus_dir = corpus::default_corpus_dir();
    let source = corpus::resolve_dictionary(args.dictionary_path.as_deref(), corpus_dir.as_deref());
    let words = source
        .load()
        .with_context(|| format!("failed to load dictionary from {source}"))?;

    let prompts = corpus::build_prompts(&words, args.min_len..=args.max_len, args.min_words);
    corpus::write_prompts_to_file(&args.output, &prompts)
        .with_context(|| format!("failed to write prompts to {}", args.output.display()))?;

    println!(
        "Wrote {} prompts from {} words ({source}) to {}",
        prompts.len(),
        words.len(),
        args.output.display()
    );
    Ok(())
}
