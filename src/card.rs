/// Definition of a single Set card and the two deck variants.
use crate::property::*;
use crate::testing;

use speculate::speculate;
use std::fmt;
use std::str::FromStr;

/// Which flavour of Set is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Three properties, shading is never known.
    Mini,
    /// All four properties.
    Full,
}

impl Variant {
    /// Number of distinct cards in a deck of this variant.
    pub fn deck_size(&self) -> usize {
        match self {
            Variant::Mini => 3 * 3 * 3,
            Variant::Full => 3 * 3 * 3 * 3,
        }
    }

    /// The shading values a deck of this variant is built from.
    pub fn shadings(&self) -> Vec<Shading> {
        match self {
            Variant::Mini => vec![Shading::Unknown],
            Variant::Full => Shading::known().to_vec(),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mini" => Ok(Variant::Mini),
            "full" => Ok(Variant::Full),
            other => Err(format!("unknown variant '{}'", other)),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Variant::Mini => write!(f, "mini"),
            Variant::Full => write!(f, "full"),
        }
    }
}

/// A single card. Cards are plain values and never change once made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    count: Count,
    color: Color,
    shape: Shape,
    shading: Shading,
}

impl Card {
    pub fn new(count: Count, color: Color, shape: Shape, shading: Shading) -> Self {
        Self {
            count,
            color,
            shape,
            shading,
        }
    }

    /// A mini-Set card, whose shading is always unknown.
    pub fn mini(count: Count, color: Color, shape: Shape) -> Self {
        Self::new(count, color, shape, Shading::Unknown)
    }

    pub fn full(count: Count, color: Color, shape: Shape, shading: Shading) -> Self {
        Self::new(count, color, shape, shading)
    }

    /// The number of symbols on the card.
    pub fn count(&self) -> Count {
        self.count
    }

    /// The symbol's color on the card.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The symbol's shape on the card.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The amount of shading in the symbols.
    pub fn shading(&self) -> Shading {
        self.shading
    }

    /// Whether every property the variant plays with has a known value.
    pub fn is_known_for(&self, variant: Variant) -> bool {
        let common = self.count.is_known() && self.color.is_known() && self.shape.is_known();
        match variant {
            Variant::Mini => common && !self.shading.is_known(),
            Variant::Full => common && self.shading.is_known(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.count, self.color, self.shape)?;
        if self.shading.is_known() {
            write!(f, " {}", self.shading)?;
        }
        Ok(())
    }
}

speculate! {
    before {
        testing::set_up();
    }

    describe "variants" {
        it "knows its deck size" {
            assert_eq!(27, Variant::Mini.deck_size());
            assert_eq!(81, Variant::Full.deck_size());
        }

        it "parses from strings" {
            assert_eq!(Ok(Variant::Mini), "mini".parse::<Variant>());
            assert_eq!(Ok(Variant::Full), "FULL".parse::<Variant>());
            assert!("half".parse::<Variant>().is_err());
        }
    }

    describe "cards" {
        it "fixes mini shading to unknown" {
            let card = Card::mini(Count::Two, Color::Green, Shape::Wiggle);
            assert_eq!(Shading::Unknown, card.shading());
            assert!(card.is_known_for(Variant::Mini));
            assert!(!card.is_known_for(Variant::Full));
        }

        it "compares every property" {
            let a = Card::full(Count::One, Color::Red, Shape::Round, Shading::Hollow);
            let b = Card::full(Count::One, Color::Red, Shape::Round, Shading::Solid);
            assert_eq!(a, a.clone());
            assert!(a != b);
            assert_eq!(
                Card::mini(Count::One, Color::Red, Shape::Round),
                Card::mini(Count::One, Color::Red, Shape::Round)
            );
            assert!(Card::mini(Count::One, Color::Red, Shape::Round) != a);
        }

        it "displays its known properties" {
            let card = Card::full(Count::Three, Color::Purple, Shape::Pointy, Shading::Partial);
            assert_eq!("three purple pointy partial", format!("{}", card));
            assert_eq!("one red round", format!("{}", Card::mini(Count::One, Color::Red, Shape::Round)));
        }
    }
}
