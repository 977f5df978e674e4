use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use quizdr::engine::lifeline::Lifeline;
use quizdr::event::{Clock, InputSource, Key, ManualClock, ScriptedInput};
use quizdr::session::question::{Category, Difficulty, DisplayedQuestion};
use quizdr::session::quiz::{QuestionFrame, Quiz, QuizScreen, QuizSettings, SlotOutcome, SlotReport};
use quizdr::store::question_store::QuestionBank;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

/// What the simulated player does once the question is on screen.
#[derive(Clone, Copy, Debug)]
enum Move {
    Correct,
    Wrong,
    /// Pick an option that 50/50 took away.
    Removed,
    Press(u8),
}

/// Answers relative to what was last drawn. Each move fires a delay after
/// the previous move or the last input flush.
struct Player {
    clock: Rc<ManualClock>,
    shown: Rc<RefCell<Option<DisplayedQuestion>>>,
    moves: VecDeque<(Duration, Move)>,
    armed_at: Duration,
}

impl Player {
    fn resolve(&self, mv: Move) -> Key {
        let shown = self.shown.borrow();
        let question = shown.as_ref().expect("a question is drawn before any answer");
        let slot = match mv {
            Move::Correct => question.correct,
            Move::Wrong => (0..4)
                .find(|&s| s != question.correct && !question.is_removed(s))
                .unwrap(),
            Move::Removed => (0..4).find(|&s| question.is_removed(s)).unwrap(),
            Move::Press(digit) => return Key::Char(char::from(b'0' + digit)),
        };
        Key::Char(char::from(b'1' + slot as u8))
    }
}

impl InputSource for Player {
    fn poll(&mut self) -> Option<Key> {
        let (delay, mv) = *self.moves.front()?;
        if self.clock.now() < self.armed_at + delay {
            return None;
        }
        self.moves.pop_front();
        self.armed_at = self.clock.now();
        Some(self.resolve(mv))
    }

    fn flush(&mut self) -> usize {
        self.armed_at = self.clock.now();
        0
    }
}

#[derive(Clone, Debug)]
struct Shot {
    text: String,
    remaining_secs: u64,
    budget_secs: u64,
    notice: Option<String>,
    removed: [bool; 4],
}

struct Recorder {
    shown: Rc<RefCell<Option<DisplayedQuestion>>>,
    shots: Vec<Shot>,
}

impl QuizScreen for Recorder {
    fn draw_question(&mut self, frame: &QuestionFrame<'_>) -> anyhow::Result<()> {
        *self.shown.borrow_mut() = Some(frame.question.clone());
        self.shots.push(Shot {
            text: frame.question.text.clone(),
            remaining_secs: frame.remaining_secs,
            budget_secs: frame.budget_secs,
            notice: frame.notice.map(str::to_string),
            removed: frame.question.removed,
        });
        Ok(())
    }
}

fn settings(band_size: usize, session_questions: usize) -> QuizSettings {
    QuizSettings {
        session_questions,
        band_size,
        time_limit: secs(15),
        extra_time: secs(10),
        poll_interval: Duration::from_millis(100),
    }
}

fn full_bank(band_size: usize) -> QuestionBank {
    QuestionBank::from_lines(
        (0..band_size * 3).map(|i| format!("Question {i}?|right {i}|wrong a|wrong b|wrong c|1")),
    )
}

struct Harness {
    clock: Rc<ManualClock>,
    player: Player,
    screen: Recorder,
    rng: SmallRng,
    quiz: Quiz,
}

impl Harness {
    fn new(bank: QuestionBank, difficulty: Difficulty, settings: QuizSettings) -> Self {
        let clock = Rc::new(ManualClock::new());
        let shown = Rc::new(RefCell::new(None));
        let mut rng = SmallRng::seed_from_u64(42);
        let quiz = Quiz::new(bank, Category::Science, difficulty, settings, &mut rng);
        Self {
            player: Player {
                clock: Rc::clone(&clock),
                shown: Rc::clone(&shown),
                moves: VecDeque::new(),
                armed_at: Duration::ZERO,
            },
            screen: Recorder {
                shown,
                shots: Vec::new(),
            },
            clock,
            rng,
            quiz,
        }
    }

    /// Each move one second after the previous one.
    fn moves(mut self, moves: &[Move]) -> Self {
        self.player
            .moves
            .extend(moves.iter().map(|&mv| (secs(1), mv)));
        self
    }

    fn move_after(mut self, delay: Duration, mv: Move) -> Self {
        self.player.moves.push_back((delay, mv));
        self
    }

    fn play(&mut self) -> Option<SlotReport> {
        self.quiz
            .play_next(
                &mut self.player,
                self.clock.as_ref(),
                &mut self.screen,
                &mut self.rng,
            )
            .unwrap()
    }

    fn play_all(&mut self) -> Vec<SlotReport> {
        std::iter::from_fn(|| self.play()).collect()
    }

    fn notices(&self) -> Vec<String> {
        self.screen
            .shots
            .iter()
            .filter_map(|s| s.notice.clone())
            .collect()
    }
}

#[test]
fn session_stops_at_configured_length_without_repeats() {
    let mut h = Harness::new(full_bank(6), Difficulty::Easy, settings(6, 4)).moves(&[Move::Correct; 4]);

    let reports = h.play_all();

    assert_eq!(reports.len(), 4);
    assert_eq!(h.quiz.completed(), 4);
    let mut indices: Vec<usize> = reports.iter().map(|r| r.question_index).collect();
    indices.sort_unstable();
    indices.dedup();
    assert_eq!(indices.len(), 4);
    assert!(indices.iter().all(|i| (0..6).contains(i)));
    assert_eq!(h.quiz.state().used_question_indices.len(), 4);
    // 1 + 1 + (1 + 5) + 1
    assert_eq!(h.quiz.state().score, 9);
    assert_eq!(h.quiz.state().correct_count, 4);
}

#[test]
fn timeout_charges_penalty_and_counts_down_every_second() {
    let mut h = Harness::new(full_bank(10), Difficulty::Medium, settings(10, 1));

    let report = h.play().unwrap();

    assert_eq!(report.outcome, SlotOutcome::TimedOut { penalty: 3 });
    assert!((10..20).contains(&report.question_index));
    assert_eq!(h.clock.now(), secs(15));
    let ticks: Vec<u64> = h.screen.shots.iter().map(|s| s.remaining_secs).collect();
    assert_eq!(ticks, (1..=15).rev().collect::<Vec<_>>());

    let state = h.quiz.state();
    assert_eq!(state.score, -3);
    assert_eq!(state.wrong_count, 1);
    assert_eq!(state.review.len(), 1);
    assert_eq!(state.review[0].question_text, report.question.text);
    assert!(h.play().is_none());
}

#[test]
fn wrong_answer_keeps_displayed_options_for_review() {
    let mut h = Harness::new(full_bank(5), Difficulty::Hard, settings(5, 1)).moves(&[Move::Wrong]);

    let report = h.play().unwrap();

    match report.outcome {
        SlotOutcome::Wrong { chosen, penalty } => {
            assert_eq!(penalty, 5);
            assert_ne!(chosen, report.question.correct);
        }
        other => panic!("expected a wrong answer, got {other:?}"),
    }
    assert!((10..15).contains(&report.question_index));
    let attempt = &h.quiz.state().review[0];
    assert_eq!(attempt.displayed_options, report.question.options);
    assert_eq!(attempt.correct_display_index, report.question.correct);
    assert_eq!(h.quiz.state().score, -5);
}

#[test]
fn fifty_fifty_hides_two_wrong_options_then_answer_counts() {
    let mut h = Harness::new(full_bank(5), Difficulty::Easy, settings(5, 1))
        .moves(&[Move::Press(5), Move::Correct]);

    let report = h.play().unwrap();

    assert!(matches!(report.outcome, SlotOutcome::Correct(_)));
    let after: Vec<&Shot> = h.screen.shots.iter().filter(|s| s.notice.is_some()).collect();
    assert!(!after.is_empty());
    assert!(after[0].notice.as_deref().unwrap().starts_with("50/50 used: removed options"));
    assert_eq!(after[0].remaining_secs, 14);
    assert_eq!(after[0].budget_secs, 15);
    assert_eq!(after[0].removed.iter().filter(|&&r| r).count(), 2);
    assert!(!report.question.is_removed(report.question.correct));
    assert!(!h.quiz.state().lifelines.is_available(Lifeline::FiftyFifty));
}

#[test]
fn choosing_a_removed_option_is_wrong() {
    let mut h = Harness::new(full_bank(5), Difficulty::Easy, settings(5, 1))
        .moves(&[Move::Press(5), Move::Removed]);

    let report = h.play().unwrap();

    match report.outcome {
        SlotOutcome::Wrong { chosen, penalty } => {
            assert!(report.question.is_removed(chosen));
            assert_eq!(penalty, 2);
        }
        other => panic!("expected a wrong answer, got {other:?}"),
    }
}

#[test]
fn used_lifeline_shows_notice_and_keeps_waiting() {
    let mut h = Harness::new(full_bank(5), Difficulty::Easy, settings(5, 2)).moves(&[
        Move::Press(5),
        Move::Correct,
        Move::Press(5),
        Move::Correct,
    ]);

    let reports = h.play_all();

    assert_eq!(reports.len(), 2);
    assert!(matches!(reports[1].outcome, SlotOutcome::Correct(_)));
    assert!(h.notices().contains(&"50/50 already used!".to_string()));
    assert_eq!(reports[1].question.removed, [false; 4]);
}

#[test]
fn skip_consumes_slot_without_touching_score_or_streak() {
    let mut h = Harness::new(full_bank(6), Difficulty::Easy, settings(6, 4)).moves(&[
        Move::Correct,
        Move::Press(6),
        Move::Correct,
        Move::Correct,
    ]);

    let reports = h.play_all();

    assert_eq!(reports[1].outcome, SlotOutcome::Skipped);
    assert_eq!(reports[1].score, 1);
    match &reports[3].outcome {
        SlotOutcome::Correct(award) => assert_eq!(award.bonus, Some(5)),
        other => panic!("expected a correct answer, got {other:?}"),
    }
    let state = h.quiz.state();
    assert_eq!(state.score, 8);
    assert_eq!(state.used_question_indices.len(), 4);
    assert_eq!(state.wrong_count, 0);
    assert!(state.review.is_empty());
}

#[test]
fn replace_swaps_question_and_restarts_countdown() {
    let mut h = Harness::new(full_bank(6), Difficulty::Easy, settings(6, 1))
        .moves(&[Move::Press(7), Move::Correct]);

    let report = h.play().unwrap();

    let first = h.screen.shots[0].text.clone();
    assert_ne!(report.question.text, first);
    assert!(matches!(report.outcome, SlotOutcome::Correct(_)));

    let replaced = h
        .screen
        .shots
        .iter()
        .find(|s| s.notice.as_deref() == Some("Question replaced"))
        .unwrap();
    assert_eq!(replaced.text, report.question.text);
    assert_eq!(replaced.remaining_secs, 15);
    assert_eq!(replaced.budget_secs, 15);

    assert_eq!(h.quiz.state().used_question_indices, vec![report.question_index]);
    assert!(!h.quiz.state().lifelines.is_available(Lifeline::Replace));
}

#[test]
fn replace_with_exhausted_band_keeps_lifeline() {
    let mut h = Harness::new(full_bank(1), Difficulty::Easy, settings(1, 1))
        .moves(&[Move::Press(7), Move::Correct]);

    let report = h.play().unwrap();

    assert!(matches!(report.outcome, SlotOutcome::Correct(_)));
    assert!(
        h.notices()
            .contains(&"no unused question left in this difficulty".to_string())
    );
    assert!(h.quiz.state().lifelines.is_available(Lifeline::Replace));
}

#[test]
fn extra_time_extends_the_deadline() {
    let mut h = Harness::new(full_bank(5), Difficulty::Easy, settings(5, 1))
        .move_after(secs(10), Move::Press(8));

    let report = h.play().unwrap();

    assert_eq!(report.outcome, SlotOutcome::TimedOut { penalty: 2 });
    assert_eq!(h.clock.now(), secs(25));
    let extended = h
        .screen
        .shots
        .iter()
        .find(|s| s.notice.as_deref() == Some("+10 seconds added"))
        .unwrap();
    assert_eq!(extended.remaining_secs, 15);
    assert_eq!(extended.budget_secs, 25);
}

#[test]
fn malformed_records_are_skipped_and_session_ends_early() {
    let bank = QuestionBank::from_lines([
        "First?|a|b|c|d|1",
        "not a question",
        "Bad index?|a|b|c|d|9",
        "Fourth?|a|b|c|d|2",
    ]);
    let mut h = Harness::new(bank, Difficulty::Easy, settings(4, 4)).moves(&[Move::Correct; 4]);

    let reports = h.play_all();

    assert_eq!(reports.len(), 2);
    let mut used = h.quiz.state().used_question_indices.clone();
    used.sort_unstable();
    assert_eq!(used, vec![0, 3]);
    assert_eq!(h.quiz.completed(), 2);
}

#[test]
fn restart_rearms_lifelines_and_clears_state() {
    let mut h = Harness::new(full_bank(5), Difficulty::Easy, settings(5, 1)).moves(&[Move::Press(6)]);
    assert_eq!(h.play().unwrap().outcome, SlotOutcome::Skipped);
    assert!(h.play().is_none());

    h.quiz.restart(&mut h.rng);

    let state = h.quiz.state();
    assert!(Lifeline::ALL.iter().all(|&l| state.lifelines.is_available(l)));
    assert!(state.used_question_indices.is_empty());
    assert_eq!(state.score, 0);
    assert_eq!(state.timer_seconds, 15);
    assert_eq!(h.quiz.completed(), 0);
}

#[test]
fn keys_typed_before_the_question_are_discarded() {
    let clock = Rc::new(ManualClock::new());
    let mut input = ScriptedInput::new(Rc::clone(&clock))
        .key_at(Duration::ZERO, Key::Char('1'))
        .key_at(secs(3), Key::Char('x'))
        .key_at(secs(4), Key::Char('9'))
        .key_at(secs(5), Key::Char('2'));
    let mut screen = Recorder {
        shown: Rc::new(RefCell::new(None)),
        shots: Vec::new(),
    };
    let mut rng = SmallRng::seed_from_u64(1);
    let mut quiz = Quiz::new(full_bank(5), Category::History, Difficulty::Easy, settings(5, 1), &mut rng);

    let report = quiz
        .play_next(&mut input, clock.as_ref(), &mut screen, &mut rng)
        .unwrap()
        .unwrap();

    assert!(!matches!(report.outcome, SlotOutcome::TimedOut { .. }));
    assert_eq!(clock.now(), secs(5));
    assert_eq!(input.pending(), 0);
}
