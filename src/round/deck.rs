//! Cyclic shuffled question deck

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Questions in play order. When the last one has been shown the deck is
/// reshuffled and play restarts at index 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionDeck {
    questions: Vec<String>,
    index: usize,
    /// Completed passes through the deck
    cycles: u32,
}

impl QuestionDeck {
    /// Build a deck and shuffle it. Callers check for emptiness first.
    pub fn new<R: Rng + ?Sized>(questions: &[String], rng: &mut R) -> Self {
        let mut questions = questions.to_vec();
        questions.shuffle(rng);
        Self {
            questions,
            index: 0,
            cycles: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Current play order
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn current(&self) -> Option<&str> {
        self.questions.get(self.index).map(String::as_str)
    }

    /// Move to the next question. Returns true when the deck wrapped and was
    /// reshuffled.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.index += 1;
        if self.index >= self.questions.len() {
            self.questions.shuffle(rng);
            self.index = 0;
            self.cycles += 1;
            log::debug!(
                "Deck exhausted, reshuffled {} questions (cycle {})",
                self.questions.len(),
                self.cycles
            );
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("word-{i}")).collect()
    }

    #[test]
    fn test_new_deck_keeps_all_questions() {
        let mut rng = Pcg32::seed_from_u64(7);
        let source = words(12);
        let deck = QuestionDeck::new(&source, &mut rng);

        let mut shuffled = deck.questions().to_vec();
        shuffled.sort();
        let mut expected = source.clone();
        expected.sort();
        assert_eq!(shuffled, expected);
        assert_eq!(deck.index(), 0);
    }

    #[test]
    fn test_wraps_after_len_advances() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut deck = QuestionDeck::new(&words(3), &mut rng);

        assert!(!deck.advance(&mut rng));
        assert!(!deck.advance(&mut rng));
        assert!(deck.advance(&mut rng));
        assert_eq!(deck.index(), 0);
        assert_eq!(deck.cycles(), 1);
        assert!(deck.current().is_some());
    }

    #[test]
    fn test_wrap_reshuffles_play_order() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut deck = QuestionDeck::new(&words(10), &mut rng);
        let before = deck.questions().to_vec();

        for _ in 0..deck.len() {
            deck.advance(&mut rng);
        }
        assert_eq!(deck.cycles(), 1);
        let after = deck.questions().to_vec();
        assert_ne!(after, before);

        let mut sorted_before = before;
        sorted_before.sort();
        let mut sorted_after = after;
        sorted_after.sort();
        assert_eq!(sorted_after, sorted_before);
    }

    #[test]
    fn test_single_question_deck_always_wraps() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut deck = QuestionDeck::new(&words(1), &mut rng);
        for _ in 0..5 {
            assert!(deck.advance(&mut rng));
            assert_eq!(deck.current(), Some("word-0"));
        }
        assert_eq!(deck.cycles(), 5);
    }

    #[test]
    fn test_same_seed_same_order() {
        let source = words(20);
        let a = QuestionDeck::new(&source, &mut Pcg32::seed_from_u64(42));
        let b = QuestionDeck::new(&source, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a.questions(), b.questions());
    }
}
