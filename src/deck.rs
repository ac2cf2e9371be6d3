/// A Set or mini-Set deck, and the rules for what makes a Set.
use crate::card::*;
use crate::property::*;
use crate::shuffle::*;
use crate::testing;

use itertools::Itertools;
use speculate::speculate;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    variant: Variant,
    cards: Vec<Card>,
}

impl Deck {
    /// Creates an unshuffled deck holding every card of the variant once.
    ///
    /// Count varies slowest and shading fastest, so the first three cards of
    /// a full deck differ only in shading.
    pub fn new(variant: Variant) -> Self {
        let cards = iproduct!(
            Count::known().iter(),
            Color::known().iter(),
            Shape::known().iter(),
            variant.shadings().into_iter()
        )
        .map(|(&count, &color, &shape, shading)| Card::new(count, color, shape, shading))
        .collect::<Vec<Card>>();
        debug!("Built a {} deck of {} cards", variant, cards.len());
        Self { variant, cards }
    }

    /// A deck holding exactly the given cards, in the given order.
    pub fn from_cards(variant: Variant, cards: Vec<Card>) -> Self {
        Self { variant, cards }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Number of cards remaining in the deck.
    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The card at the given position, valid over [0, size).
    pub fn at(&self, index: usize) -> Option<Card> {
        self.cards.get(index).cloned()
    }

    /// A new deck with the same cards in the same order, minus the one at
    /// the given position.
    pub fn remove_at(&self, index: usize) -> Option<Deck> {
        if index >= self.cards.len() {
            return None;
        }
        let mut cards = self.cards.clone();
        cards.remove(index);
        Some(Self {
            variant: self.variant,
            cards,
        })
    }

    /// Draws the top card, returning it along with the rest of the deck.
    pub fn draw_next(&self) -> Option<(Card, Deck)> {
        Some((self.at(0)?, self.remove_at(0)?))
    }

    /// A new deck without the first occurrence of the given card.
    pub fn remove_card(&self, card: &Card) -> Option<Deck> {
        let index = self.cards.iter().position(|c| c == card)?;
        self.remove_at(index)
    }

    /// Shuffles the deck in place.
    pub fn shuffle<R: BoundedRandom + ?Sized>(&mut self, rng: &mut R) {
        shuffle_in_place(&mut self.cards, rng);
    }

    /// Whether the three cards form a Set.
    ///
    /// For every property the three values are either all the same or all
    /// different, which is the same as `c` being the card that completes the
    /// pair `a`, `b`.
    pub fn is_valid_set(&self, a: &Card, b: &Card, c: &Card) -> bool {
        match self.completes_set(a, b) {
            Some(third) => &third == c,
            None => false,
        }
    }

    /// The one card that completes a Set with the given pair.
    ///
    /// None if the pair is the same card, or if any property cannot be
    /// determined from the pair.
    pub fn completes_set(&self, a: &Card, b: &Card) -> Option<Card> {
        if a == b {
            return None;
        }
        let count = known(complete(a.count(), b.count()))?;
        let color = known(complete(a.color(), b.color()))?;
        let shape = known(complete(a.shape(), b.shape()))?;
        let shading = match self.variant {
            // Shading plays no part in mini-Set.
            Variant::Mini => Shading::Unknown,
            Variant::Full => known(complete(a.shading(), b.shading()))?,
        };
        Some(Card::new(count, color, shape, shading))
    }

    /// Number of unique Sets among the first `dealt` cards, will be >= 0.
    pub fn count_sets(&self, dealt: usize) -> usize {
        let dealt = dealt.min(self.cards.len());
        (0..dealt)
            .tuple_combinations::<(_, _, _)>()
            .filter(|&(i, j, k)| self.is_valid_set(&self.cards[i], &self.cards[j], &self.cards[k]))
            .count()
    }

    /// Whether every card is distinct and fully specified for the variant.
    pub fn is_well_formed(&self) -> bool {
        let distinct = self.cards.iter().collect::<HashSet<&Card>>().len() == self.cards.len();
        distinct && self.cards.iter().all(|c| c.is_known_for(self.variant))
    }
}

fn known<P: Property>(value: P) -> Option<P> {
    if value.is_known() {
        Some(value)
    } else {
        None
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            self.cards
                .iter()
                .map(|c| format!("[{}]", c))
                .collect::<Vec<String>>()
                .join(" ")
        )
    }
}

speculate! {
    before {
        testing::set_up();
    }

    describe "building decks" {
        it "builds 81 distinct full cards" {
            let deck = Deck::new(Variant::Full);
            assert_eq!(81, deck.size());
            assert!(deck.is_well_formed());
        }

        it "builds 27 distinct mini cards without shading" {
            let deck = Deck::new(Variant::Mini);
            assert_eq!(27, deck.size());
            assert!(deck.is_well_formed());
            assert!(deck.cards().iter().all(|c| c.shading() == Shading::Unknown));
        }

        it "starts in canonical order" {
            let deck = Deck::new(Variant::Full);
            assert_eq!(Some(Card::full(Count::One, Color::Red, Shape::Round, Shading::Hollow)), deck.at(0));
            assert_eq!(Some(Card::full(Count::One, Color::Red, Shape::Round, Shading::Partial)), deck.at(1));
            assert_eq!(Some(Card::full(Count::Three, Color::Purple, Shape::Wiggle, Shading::Solid)), deck.at(80));
        }
    }

    describe "positional access" {
        it "treats size as out of range" {
            let deck = Deck::new(Variant::Mini);
            assert!(deck.at(26).is_some());
            assert_eq!(None, deck.at(27));
            assert_eq!(None, deck.remove_at(27));
        }

        it "removes without disturbing order" {
            let deck = Deck::new(Variant::Mini);
            let removed = deck.remove_at(5).unwrap();
            assert_eq!(26, removed.size());
            assert_eq!(27, deck.size());
            let mut expected = deck.cards().to_vec();
            expected.remove(5);
            assert_eq!(expected, removed.cards().to_vec());
        }

        it "empties when removing every index from the back" {
            let mut deck = Deck::new(Variant::Full);
            for index in (0..81).rev() {
                deck = deck.remove_at(index).unwrap();
            }
            assert!(deck.is_empty());
            assert_eq!(None, deck.at(0));
            assert_eq!(None, deck.remove_at(0));
            assert_eq!(None, deck.draw_next());
        }

        it "draws the top card" {
            let deck = Deck::new(Variant::Full);
            let (card, rest) = deck.draw_next().unwrap();
            assert_eq!(deck.at(0).unwrap(), card);
            assert_eq!(80, rest.size());
            assert_eq!(deck.at(1), rest.at(0));
        }

        it "removes a card by value" {
            let deck = Deck::new(Variant::Mini);
            let card = Card::mini(Count::Two, Color::Green, Shape::Pointy);
            let rest = deck.remove_card(&card).unwrap();
            assert_eq!(26, rest.size());
            assert!(!rest.cards().contains(&card));
            assert_eq!(None, rest.remove_card(&card));
        }
    }

    describe "sets" {
        it "never completes a card with itself" {
            let deck = Deck::new(Variant::Full);
            for card in deck.cards() {
                assert_eq!(None, deck.completes_set(card, card));
            }
        }

        it "completes a pair with the missing card" {
            let deck = Deck::new(Variant::Full);
            let a = Card::full(Count::One, Color::Red, Shape::Round, Shading::Hollow);
            let b = Card::full(Count::Two, Color::Red, Shape::Pointy, Shading::Hollow);
            assert_eq!(
                Some(Card::full(Count::Three, Color::Red, Shape::Wiggle, Shading::Hollow)),
                deck.completes_set(&a, &b)
            );
        }

        it "does not complete full pairs with unknown properties" {
            let deck = Deck::new(Variant::Full);
            let a = Card::mini(Count::One, Color::Red, Shape::Round);
            let b = Card::mini(Count::Two, Color::Red, Shape::Round);
            assert_eq!(None, deck.completes_set(&a, &b));
        }

        it "completes mini pairs" {
            let deck = Deck::new(Variant::Mini);
            let a = Card::mini(Count::One, Color::Red, Shape::Round);
            let b = Card::mini(Count::Two, Color::Green, Shape::Round);
            let c = Card::mini(Count::Three, Color::Purple, Shape::Round);
            assert_eq!(Some(c), deck.completes_set(&a, &b));
            assert!(deck.is_valid_set(&a, &b, &c));
        }

        it "is symmetric in its three cards" {
            let deck = Deck::new(Variant::Full);
            let cards = deck.cards();
            for (a, b, c) in cards.iter().take(12).tuple_combinations::<(_, _, _)>() {
                let valid = deck.is_valid_set(a, b, c);
                assert_eq!(valid, deck.is_valid_set(a, c, b));
                assert_eq!(valid, deck.is_valid_set(b, a, c));
                assert_eq!(valid, deck.is_valid_set(b, c, a));
                assert_eq!(valid, deck.is_valid_set(c, a, b));
                assert_eq!(valid, deck.is_valid_set(c, b, a));
            }
        }

        it "has exactly one completing card for every pair" {
            let deck = Deck::new(Variant::Full);
            for (a, b) in deck.cards().iter().tuple_combinations::<(_, _)>() {
                let matches = deck
                    .cards()
                    .iter()
                    .filter(|c| deck.is_valid_set(a, b, c))
                    .collect::<Vec<&Card>>();
                assert_eq!(1, matches.len());
                assert_eq!(deck.completes_set(a, b).as_ref(), Some(matches[0]));
            }
        }

        it "agrees with the all same or all different rule" {
            fn rule<P: Property>(a: P, b: P, c: P) -> bool {
                (a == b && b == c) || (a != b && b != c && a != c)
            }
            let deck = Deck::new(Variant::Mini);
            for (a, b, c) in deck.cards().iter().tuple_combinations::<(_, _, _)>() {
                let expected = rule(a.count(), b.count(), c.count())
                    && rule(a.color(), b.color(), c.color())
                    && rule(a.shape(), b.shape(), c.shape());
                assert_eq!(expected, deck.is_valid_set(a, b, c));
            }
        }
    }

    describe "counting sets" {
        it "finds the set in the first three canonical cards" {
            let deck = Deck::new(Variant::Full);
            assert_eq!(1, deck.count_sets(3));
        }

        it "finds nothing in fewer than three cards" {
            let deck = Deck::new(Variant::Full);
            assert_eq!(0, deck.count_sets(0));
            assert_eq!(0, deck.count_sets(2));
        }

        it "counts every set in a whole deck" {
            // Every pair completes exactly once, and each Set holds three pairs.
            assert_eq!(81 * 80 / 6, Deck::new(Variant::Full).count_sets(81));
            assert_eq!(27 * 26 / 6, Deck::new(Variant::Mini).count_sets(100));
        }

        it "finds nothing when every property takes two values" {
            let cards = vec![
                Card::mini(Count::One, Color::Red, Shape::Round),
                Card::mini(Count::One, Color::Red, Shape::Pointy),
                Card::mini(Count::One, Color::Green, Shape::Round),
                Card::mini(Count::One, Color::Green, Shape::Pointy),
                Card::mini(Count::Two, Color::Red, Shape::Round),
                Card::mini(Count::Two, Color::Red, Shape::Pointy),
                Card::mini(Count::Two, Color::Green, Shape::Round),
                Card::mini(Count::Two, Color::Green, Shape::Pointy),
            ];
            let deck = Deck::from_cards(Variant::Mini, cards);
            assert_eq!(Variant::Mini, deck.variant());
            assert!(deck.is_well_formed());
            assert_eq!(0, deck.count_sets(deck.size()));
        }

        it "displays every card in order" {
            let deck = Deck::new(Variant::Mini).remove_at(3).unwrap();
            let shown = format!("{}", deck);
            assert!(shown.starts_with("[one red round] [one red pointy] [one red wiggle] [one green pointy]"));
        }

        it "is unchanged by a shuffle over the whole deck" {
            let mut deck = Deck::new(Variant::Mini);
            deck.shuffle(&mut ScriptedDraws::new(vec![3, 1, 4, 1, 5, 9, 2, 6]));
            assert!(deck.is_well_formed());
            assert_eq!(117, deck.count_sets(27));
        }
    }
}
