//! Draw piles, hands and the per-turn draw.

use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::cards::card_kind::CardKind;
use crate::game_state::errors::{ChessError, ChessResult};

pub const HAND_LIMIT: usize = 5;
pub const OPENING_DRAW: usize = 2;
pub const TURN_DRAW: usize = 1;

/// Shuffled draw pile; cards are drawn from the top (the end of the vector).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    draw_pile: Vec<CardKind>,
}

impl Deck {
    pub fn shuffled<R: Rng + ?Sized>(cards: impl IntoIterator<Item = CardKind>, rng: &mut R) -> Self {
        let mut draw_pile: Vec<CardKind> = cards.into_iter().collect();
        draw_pile.shuffle(rng);
        Self { draw_pile }
    }

    /// Two each of the cards the engine knows how to play.
    pub fn engine_deck<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let cards = [
            CardKind::StrategicJump,
            CardKind::QuickStep,
            CardKind::MagicStorm,
        ];
        Self::shuffled(cards.into_iter().flat_map(|c| [c, c]), rng)
    }

    /// Two of every card.
    pub fn standard_deck<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::shuffled(CardKind::ALL.into_iter().flat_map(|c| [c, c]), rng)
    }

    pub fn draw(&mut self) -> Option<CardKind> {
        self.draw_pile.pop()
    }

    pub fn len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw_pile.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<CardKind>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refused (returns `false`) once the hand holds [`HAND_LIMIT`] cards.
    pub fn add(&mut self, card: CardKind) -> bool {
        if self.is_full() {
            return false;
        }
        self.cards.push(card);
        true
    }

    pub fn take(&mut self, card: CardKind) -> ChessResult<()> {
        let idx = self
            .cards
            .iter()
            .position(|c| *c == card)
            .ok_or(ChessError::CardNotInHand(card))?;
        self.cards.remove(idx);
        Ok(())
    }

    /// Put back a card whose effect was cancelled.
    pub fn refund(&mut self, card: CardKind) {
        self.cards.push(card);
    }

    pub fn contains(&self, card: CardKind) -> bool {
        self.cards.contains(&card)
    }

    pub fn cards(&self) -> &[CardKind] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cards.len() >= HAND_LIMIT
    }
}

/// One player's deck and hand.
#[derive(Debug, Clone, Default)]
pub struct PlayerCards {
    pub deck: Deck,
    pub hand: Hand,
    opening_draw_done: bool,
}

impl PlayerCards {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            hand: Hand::new(),
            opening_draw_done: false,
        }
    }

    /// Draw for the start of this player's turn: the opening draw the first
    /// time, then one card. Returns the cards drawn.
    pub fn on_turn_started(&mut self) -> Vec<CardKind> {
        let mut wanted = TURN_DRAW;
        if !self.opening_draw_done {
            wanted += OPENING_DRAW;
            self.opening_draw_done = true;
        }

        let mut drawn = Vec::with_capacity(wanted);
        for _ in 0..wanted {
            if self.hand.is_full() {
                break;
            }
            if let Some(card) = self.deck.draw() {
                self.hand.add(card);
                drawn.push(card);
            }
        }
        debug!(?drawn, hand = self.hand.len(), left = self.deck.len(), "cards drawn");
        drawn
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{Deck, Hand, PlayerCards, HAND_LIMIT};
    use crate::cards::card_kind::CardKind;
    use crate::game_state::errors::ChessError;

    #[test]
    fn engine_deck_holds_two_of_each_engine_card() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut deck = Deck::engine_deck(&mut rng);
        assert_eq!(deck.len(), 6);
        let mut drawn = Vec::new();
        while let Some(card) = deck.draw() {
            drawn.push(card);
        }
        for card in [CardKind::StrategicJump, CardKind::QuickStep, CardKind::MagicStorm] {
            assert_eq!(drawn.iter().filter(|c| **c == card).count(), 2);
        }
        assert!(deck.is_empty());
    }

    #[test]
    fn opening_draw_then_one_per_turn() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut player = PlayerCards::new(Deck::standard_deck(&mut rng));
        assert_eq!(player.on_turn_started().len(), 3);
        assert_eq!(player.on_turn_started().len(), 1);
        assert_eq!(player.hand.len(), 4);
    }

    #[test]
    fn hand_limit_stops_drawing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut player = PlayerCards::new(Deck::standard_deck(&mut rng));
        for _ in 0..6 {
            player.on_turn_started();
        }
        assert_eq!(player.hand.len(), HAND_LIMIT);
        assert!(!player.hand.add(CardKind::Chaos));
    }

    #[test]
    fn taking_a_missing_card_fails_and_refund_returns_it() {
        let mut hand = Hand::new();
        hand.add(CardKind::Arise);
        assert!(matches!(
            hand.take(CardKind::Chaos),
            Err(ChessError::CardNotInHand(CardKind::Chaos))
        ));
        hand.take(CardKind::Arise).expect("arise should be in hand");
        assert!(hand.is_empty());
        hand.refund(CardKind::Arise);
        assert!(hand.contains(CardKind::Arise));
    }

    #[test]
    fn empty_deck_draws_nothing() {
        let mut player = PlayerCards::new(Deck::default());
        assert!(player.on_turn_started().is_empty());
        assert!(player.hand.is_empty());
    }
}
