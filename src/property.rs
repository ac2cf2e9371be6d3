/// Card properties and the rule for completing a Set on a single property.
use crate::testing;

use speculate::speculate;
use std::fmt;

/// Behaviour shared by every card property.
///
/// Each property has exactly three known values, encoded 1, 2 and 3, plus an
/// unknown sentinel encoded 0.
pub trait Property: Copy + Eq + fmt::Debug {
    const UNKNOWN: Self;

    fn code(self) -> u8;
    fn from_code(code: u8) -> Self;

    /// The three known values in canonical order.
    fn known() -> [Self; 3] {
        [Self::from_code(1), Self::from_code(2), Self::from_code(3)]
    }

    fn is_known(self) -> bool {
        self != Self::UNKNOWN
    }
}

/// Determine what the third value has to be for a pair of values.
///
/// Equal values complete with themselves, distinct values with the one that
/// is missing. Anything involving the unknown sentinel stays unknown.
pub fn complete<P: Property>(i: P, j: P) -> P {
    if !i.is_known() || !j.is_known() {
        return P::UNKNOWN;
    }
    if i == j {
        return i;
    }
    P::from_code(6 - i.code() - j.code())
}

macro_rules! property {
    ($name:ident, $unknown:ident, [$($val:ident = $code:literal => $label:literal),*]) => {
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Ord, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $unknown = 0,
            $($val = $code),*
        }

        impl Property for $name {
            const UNKNOWN: Self = $name::$unknown;

            fn code(self) -> u8 {
                self as u8
            }

            fn from_code(code: u8) -> Self {
                match code {
                    $($code => $name::$val,)*
                    _ => $name::$unknown,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                match self {
                    $name::$unknown => f.write_str("?"),
                    $($name::$val => f.write_str($label),)*
                }
            }
        }
    };
}

property!(Count, Unknown, [One = 1 => "one", Two = 2 => "two", Three = 3 => "three"]);
property!(Color, Unknown, [Red = 1 => "red", Green = 2 => "green", Purple = 3 => "purple"]);
property!(Shape, Unknown, [Round = 1 => "round", Pointy = 2 => "pointy", Wiggle = 3 => "wiggle"]);
property!(Shading, Unknown, [Hollow = 1 => "hollow", Partial = 2 => "partial", Solid = 3 => "solid"]);

speculate! {
    before {
        testing::set_up();
    }

    describe "property codes" {
        it "round trips known values and the sentinel" {
            for &count in Count::known().iter() {
                assert_eq!(count, Count::from_code(count.code()));
            }
            assert_eq!(Shading::Unknown, Shading::from_code(0));
            assert_eq!(Shading::Unknown, Shading::from_code(7));
        }

        it "lists known values in canonical order" {
            assert_eq!([Color::Red, Color::Green, Color::Purple], Color::known());
        }
    }

    describe "completing a property" {
        it "completes equal values with themselves" {
            assert_eq!(Shape::Pointy, complete(Shape::Pointy, Shape::Pointy));
        }

        it "completes distinct values with the missing one" {
            assert_eq!(Count::Three, complete(Count::One, Count::Two));
            assert_eq!(Count::Two, complete(Count::Three, Count::One));
            assert_eq!(Count::One, complete(Count::Two, Count::Three));
        }

        it "propagates the unknown sentinel" {
            assert_eq!(Shading::Unknown, complete(Shading::Unknown, Shading::Solid));
            assert_eq!(Shading::Unknown, complete(Shading::Hollow, Shading::Unknown));
            assert_eq!(Shading::Unknown, complete(Shading::Unknown, Shading::Unknown));
        }

        it "is closed over known values" {
            for &i in Color::known().iter() {
                for &j in Color::known().iter() {
                    let k = complete(i, j);
                    assert!(k.is_known());
                    if i == j {
                        assert_eq!(i, k);
                    } else {
                        assert!(k != i && k != j);
                        assert_eq!(i, complete(j, k));
                    }
                }
            }
        }
    }
}
