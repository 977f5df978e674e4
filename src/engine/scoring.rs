use crate::session::question::Difficulty;
use crate::session::state::{IncorrectAttempt, SessionState};

pub const POINTS_PER_CORRECT: i32 = 1;
pub const FIRST_BONUS_STREAK: u32 = 3;
pub const FIRST_BONUS: i32 = 5;
pub const SECOND_BONUS_STREAK: u32 = 5;
pub const SECOND_BONUS: i32 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Award {
    pub points: i32,
    pub bonus: Option<i32>,
    /// Streak after the award, 0 if the second bonus reset it.
    pub streak: u32,
}

impl Award {
    pub fn total(&self) -> i32 {
        self.points + self.bonus.unwrap_or(0)
    }
}

/// Credit a correct answer. Reaching the second bonus resets the streak, so
/// each run pays +5 once at 3 and +15 once at 5.
pub fn record_correct(state: &mut SessionState) -> Award {
    state.score += POINTS_PER_CORRECT;
    state.streak += 1;
    state.correct_count += 1;

    let bonus = match state.streak {
        FIRST_BONUS_STREAK => Some(FIRST_BONUS),
        SECOND_BONUS_STREAK => {
            state.streak = 0;
            Some(SECOND_BONUS)
        }
        _ => None,
    };
    if let Some(bonus) = bonus {
        state.score += bonus;
    }

    Award {
        points: POINTS_PER_CORRECT,
        bonus,
        streak: state.streak,
    }
}

/// Charge a wrong answer or timeout and keep it for review. Returns the
/// penalty applied. Score is not floored.
pub fn record_miss(state: &mut SessionState, difficulty: Difficulty, attempt: IncorrectAttempt) -> i32 {
    let penalty = difficulty.penalty();
    state.score -= penalty;
    state.streak = 0;
    state.wrong_count += 1;
    state.review.push(attempt);
    penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::question::{DisplayedQuestion, parse_record};

    fn attempt() -> IncorrectAttempt {
        let record = parse_record("Q?|a|b|c|d|1").unwrap();
        IncorrectAttempt::from(&DisplayedQuestion::with_order(&record, [0, 1, 2, 3]))
    }

    #[test]
    fn easy_wrong_answer_from_ten() {
        let mut state = SessionState::new(15);
        state.score = 10;
        state.streak = 2;

        let penalty = record_miss(&mut state, Difficulty::Easy, attempt());

        assert_eq!(penalty, 2);
        assert_eq!(state.score, 8);
        assert_eq!(state.wrong_count, 1);
        assert_eq!(state.streak, 0);
        assert_eq!(state.review.len(), 1);
    }

    #[test]
    fn score_goes_negative() {
        let mut state = SessionState::new(15);
        record_miss(&mut state, Difficulty::Hard, attempt());
        record_miss(&mut state, Difficulty::Hard, attempt());
        assert_eq!(state.score, -10);
    }

    #[test]
    fn streak_bonuses_fire_once_per_run() {
        let mut state = SessionState::new(15);
        let bonuses: Vec<Option<i32>> = (0..10).map(|_| record_correct(&mut state).bonus).collect();

        assert_eq!(
            bonuses,
            vec![
                None,
                None,
                Some(5),
                None,
                Some(15),
                None,
                None,
                Some(5),
                None,
                Some(15),
            ]
        );
        assert_eq!(state.streak, 0);
        assert_eq!(state.correct_count, 10);
        assert_eq!(state.score, 10 + 2 * (5 + 15));
    }

    #[test]
    fn miss_breaks_the_run_before_bonus() {
        let mut state = SessionState::new(15);
        record_correct(&mut state);
        record_correct(&mut state);
        record_miss(&mut state, Difficulty::Medium, attempt());
        let awards: Vec<Award> = (0..3).map(|_| record_correct(&mut state)).collect();

        assert_eq!(awards[2].bonus, Some(5));
        assert_eq!(awards[2].streak, 3);
        assert_eq!(state.score, 2 - 3 + 3 + 5);
    }

    #[test]
    fn second_bonus_resets_streak() {
        let mut state = SessionState::new(15);
        let last = (0..5).map(|_| record_correct(&mut state)).last().unwrap();
        assert_eq!(last.bonus, Some(15));
        assert_eq!(last.streak, 0);
        assert_eq!(last.total(), 16);
    }
}
