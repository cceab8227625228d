// Integration tests for the bomb-party application
// These tests verify that corpus loading, the engine and the round loop work together

use bomb_party::corpus::{DEFAULT_PROMPT_LENGTHS, EMBEDDED_DICTIONARY};
use bomb_party::*;
use std::collections::HashSet;
use std::io;
use std::thread;
use std::time::Duration;

/// Player that answers every prompt instantly with a dictionary word, or
/// never answers at all when `silent`.
struct BotPlayer {
    dictionary: Vec<String>,
    seen_prompts: HashSet<String>,
    pending: Option<String>,
    silent: bool,
    rejections: usize,
    timeouts: Vec<TimeoutReport>,
    game_over: Option<GameSummary>,
}

impl BotPlayer {
    fn new(dictionary: &[String], silent: bool) -> Self {
        Self {
            dictionary: dictionary.to_vec(),
            seen_prompts: HashSet::new(),
            pending: None,
            silent,
            rejections: 0,
            timeouts: Vec::new(),
            game_over: None,
        }
    }
}

impl GameInterface for BotPlayer {
    fn display_round_start(&mut self, info: &RoundInfo) {
        self.seen_prompts.insert(info.prompt.clone());
        self.pending = if self.silent {
            None
        } else {
            self.dictionary
                .iter()
                .find(|w| w.contains(&info.prompt) && !self.seen_prompts.contains(*w))
                .cloned()
        };
    }

    fn poll_action(&mut self, timeout: Duration) -> io::Result<Option<UserAction>> {
        if let Some(word) = self.pending.take() {
            return Ok(Some(UserAction::Submit(word)));
        }
        thread::sleep(timeout);
        Ok(None)
    }

    fn display_verdict(&mut self, _submission: &str, outcome: ValidationOutcome, _lives: u32) {
        if outcome == ValidationOutcome::Rejected {
            self.rejections += 1;
        }
    }

    fn display_timeout(&mut self, report: &TimeoutReport) {
        self.timeouts.push(report.clone());
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        self.game_over = Some(summary.clone());
    }
}

fn config(wpp: u32, round_timeout: Duration) -> GameConfig {
    GameConfig {
        wpp,
        round_timeout,
        seed: Some(2024),
        ..GameConfig::default()
    }
}

#[test]
fn test_end_to_end_perfect_player_exhausts_prompts() {
    // embedded dictionary -> generated prompts -> engine -> round loop
    let dictionary = load_dictionary_from_str(EMBEDDED_DICTIONARY);
    let prompts = build_prompts(&dictionary, DEFAULT_PROMPT_LENGTHS, 1);
    let config = config(20, Duration::from_secs(2));
    let mut engine = RoundEngine::new(dictionary.clone(), prompts, &config);
    let eligible = engine.prompts_remaining();
    assert!(eligible > 50, "Expected a playable pool, got {eligible}");

    let mut player = BotPlayer::new(&dictionary, false);
    let summary = game_loop(&mut engine, &mut player, config.round_timeout).unwrap();

    assert_eq!(summary.outcome, GameOutcome::OutOfPrompts);
    assert_eq!(summary.rounds, eligible);
    assert_eq!(summary.accepted, eligible);
    assert_eq!(player.rejections, 0);
    assert!(player.timeouts.is_empty());
    assert!(summary.lives_gained <= 1);
    assert_eq!(engine.lives(), config.initial_lives + summary.lives_gained);
    assert_eq!(engine.used_prompts().len(), eligible);
    assert_eq!(player.game_over, Some(summary));
}

#[test]
fn test_end_to_end_silent_player_runs_out_of_lives() {
    let dictionary = load_dictionary_from_str(EMBEDDED_DICTIONARY);
    let prompts = build_prompts(&dictionary, DEFAULT_PROMPT_LENGTHS, 1);
    let config = config(50, Duration::from_millis(20));
    let mut engine = RoundEngine::new(dictionary.clone(), prompts, &config);

    let mut player = BotPlayer::new(&dictionary, true);
    let summary = game_loop(&mut engine, &mut player, config.round_timeout).unwrap();

    assert_eq!(summary.outcome, GameOutcome::OutOfLives);
    assert_eq!(summary.rounds, config.initial_lives as usize);
    assert_eq!(summary.accepted, 0);
    assert_eq!(engine.lives(), 0);

    assert_eq!(player.timeouts.len(), 2);
    for report in &player.timeouts {
        assert!(report.frequency >= 50);
        assert_eq!(report.examples.len(), 5);
        assert!(report.examples.iter().all(|w| w.contains(&report.prompt)));
        assert!(report.examples.iter().all(|w| dictionary.contains(w)));
    }
}

#[test]
fn test_generated_prompts_satisfy_corpus_contract() {
    let dictionary = load_dictionary_from_str(EMBEDDED_DICTIONARY);
    let words: HashSet<&String> = dictionary.iter().collect();
    let prompts = build_prompts(&dictionary, 2..=3, 10);

    assert!(!prompts.is_empty());
    for prompt in &prompts {
        assert!(prompt.frequency() >= 10);
        assert_eq!(prompt.frequency() as usize, prompt.examples().len());
        assert!((2..=3).contains(&prompt.text().len()));
        for example in prompt.examples() {
            assert!(example.contains(prompt.text()));
            assert!(words.contains(example));
        }
    }
}

#[test]
fn test_pool_threshold_scenario() {
    // 3 prompts below the threshold and 2 above
    let prompts = vec![
        Prompt::new("ab", 5, vec!["cab".to_string()]),
        Prompt::new("cd", 99, vec!["abcd".to_string()]),
        Prompt::new("ef", 150, vec!["beef".to_string()]),
        Prompt::new("gh", 0, vec!["sigh".to_string()]),
        Prompt::new("ij", 100, vec!["fijian".to_string()]),
    ];
    let mut engine = RoundEngine::new(Vec::new(), prompts, &config(100, Duration::from_secs(5)));

    let first = engine.next_prompt().unwrap();
    let second = engine.next_prompt().unwrap();
    let drawn: HashSet<&str> = [first.text(), second.text()].into_iter().collect();
    assert_eq!(drawn, ["ef", "ij"].into_iter().collect());

    assert_eq!(engine.next_prompt(), Err(GameError::OutOfPrompts));
    assert_eq!(engine.next_prompt(), Err(GameError::OutOfPrompts));
}

#[test]
fn test_custom_corpus_files_to_game() {
    // Integration test: dictionary file -> generated corpus file -> game
    use std::fs::{self, File};
    use std::io::Write;

    let temp_dir = std::env::temp_dir();
    let dictionary_path = temp_dir.join("bomb_party_test_dictionary.txt");
    let prompts_path = temp_dir.join("bomb_party_test_prompts.json");

    {
        let mut file = File::create(&dictionary_path).unwrap();
        for word in ["Planet", "plant", "plane", "explain", "planner"] {
            writeln!(file, "{word}").unwrap();
        }
    }

    let dictionary = load_dictionary_from_file(&dictionary_path).unwrap();
    assert_eq!(dictionary.len(), 5);
    assert!(dictionary.contains(&"planet".to_string()));

    let generated = build_prompts(&dictionary, 3..=3, 4);
    let texts: Vec<&str> = generated.iter().map(Prompt::text).collect();
    assert_eq!(texts, vec!["lan", "pla"]);

    write_prompts_to_file(&prompts_path, &generated).unwrap();
    let prompts = load_prompts_from_file(&prompts_path).unwrap();
    assert_eq!(prompts, generated);

    let config = config(4, Duration::from_secs(2));
    let mut engine = RoundEngine::new(dictionary.clone(), prompts, &config);
    let mut player = BotPlayer::new(&dictionary, false);
    let summary = game_loop(&mut engine, &mut player, config.round_timeout).unwrap();

    assert_eq!(summary.outcome, GameOutcome::OutOfPrompts);
    assert_eq!(summary.rounds, 2);
    assert_eq!(summary.accepted, 2);

    // Cleanup
    fs::remove_file(&dictionary_path).unwrap();
    fs::remove_file(&prompts_path).unwrap();
}

#[test]
fn test_validation_scenarios() {
    let dictionary = vec!["planet".to_string(), "plant".to_string()];
    let mut engine = RoundEngine::new(dictionary, Vec::new(), &config(0, Duration::from_secs(5)));

    assert_eq!(engine.validate("planet", "plan"), ValidationOutcome::Accepted);
    assert_eq!(engine.validate("PLANET", "plan"), ValidationOutcome::Accepted);
    assert_eq!(engine.validate("plant", "plan"), ValidationOutcome::Accepted);
    assert_eq!(engine.validate("plane", "plan"), ValidationOutcome::Rejected);

    let remaining = engine.remaining_letters();
    for letter in "planet".chars() {
        assert!(!remaining.contains(letter));
    }
    assert!(remaining.iter().all(|c| c.is_ascii_lowercase()));
}

#[test]
fn test_invalid_config_detected() {
    let config = GameConfig {
        initial_lives: 5,
        max_lives: 3,
        ..GameConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MaxBelowInitial { .. })
    ));
}
