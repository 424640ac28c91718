// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The capability trait values implement to take part in comparisons.

use std::{any::Any, borrow::Cow};

/// A value that can be compared and reported on.
///
/// Every capability except [`label`](Self::label) is an optional probe with a
/// `None` default; types opt in by overriding the probes that apply to them.
/// The comparator consults probes in a fixed order (text, `equals`, native
/// equality, rendering) and the first applicable one decides.
///
/// Implementations exist for the primitive types, strings, and `Vec`, array
/// and `Option` compositions of them. For your own `Display + PartialEq`
/// types, [`impl_value_via_display!`](crate::impl_value_via_display) writes
/// the impl for you.
pub trait Value: Any {
    /// The type name shown in reports, e.g. `"i32"` or `"Vec<String>"`.
    fn label() -> Cow<'static, str>
    where
        Self: Sized;

    /// Borrowed text form, if this value is string-like.
    ///
    /// Two values that both return text are compared as strings, before any
    /// other capability.
    fn as_text(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Boolean form, if this value is a boolean.
    fn as_bool(&self) -> Option<bool> {
        None
    }

    /// Numeric form, if this value is numeric.
    ///
    /// Lets values of different numeric types compare equal after promotion.
    fn as_number(&self) -> Option<Number> {
        None
    }

    /// Display rendering, if this type has one.
    fn display(&self) -> Option<String> {
        None
    }

    /// Fallback description, consulted after `display` and `as_bool` when
    /// rendering.
    fn describe(&self) -> Option<String> {
        None
    }

    /// Caller-supplied equality, consulted before native equality. May
    /// inspect `other` across types.
    fn equals(&self, _other: &dyn Any) -> Option<bool> {
        None
    }

    /// Native equality against a value of the same type.
    fn eq_native(&self, _other: &dyn Any) -> Option<bool> {
        None
    }
}

/// Numeric form of a value, used for cross-type numeric equality.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Int(i128),
    UInt(u128),
    Float(f64),
}

impl Number {
    /// Equality after promotion to a common representation.
    ///
    /// Integer/float mixes compare as `f64`. NaN is unequal to everything,
    /// itself included.
    pub fn eq_promoted(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::UInt(a), Number::UInt(b)) => a == b,
            (Number::Int(a), Number::UInt(b)) | (Number::UInt(b), Number::Int(a)) => {
                a >= 0 && a as u128 == b
            }
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Int(a), Number::Float(b)) | (Number::Float(b), Number::Int(a)) => {
                a as f64 == b
            }
            (Number::UInt(a), Number::Float(b)) | (Number::Float(b), Number::UInt(a)) => {
                a as f64 == b
            }
        }
    }
}

/// Implements [`Value`] for a type in terms of its `Display` and `PartialEq`
/// impls.
///
/// ```
/// use std::fmt;
///
/// #[derive(PartialEq)]
/// struct Celsius(f64);
///
/// impl fmt::Display for Celsius {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}°C", self.0)
///     }
/// }
///
/// verdict::impl_value_via_display!(Celsius);
/// ```
#[macro_export]
macro_rules! impl_value_via_display {
    ($ty:ty) => {
        impl $crate::Value for $ty {
            fn label() -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(stringify!($ty))
            }

            fn display(&self) -> ::std::option::Option<::std::string::String> {
                ::std::option::Option::Some(::std::string::ToString::to_string(self))
            }

            fn eq_native(
                &self,
                other: &dyn ::std::any::Any,
            ) -> ::std::option::Option<bool> {
                other.downcast_ref::<$ty>().map(|other| self == other)
            }
        }
    };
}

macro_rules! impl_value_int {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Value for $ty {
                fn label() -> Cow<'static, str> {
                    Cow::Borrowed(stringify!($ty))
                }

                fn as_number(&self) -> Option<Number> {
                    Some(Number::Int(*self as i128))
                }

                fn display(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn eq_native(&self, other: &dyn Any) -> Option<bool> {
                    other.downcast_ref::<$ty>().map(|other| self == other)
                }
            }
        )*
    };
}

macro_rules! impl_value_uint {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Value for $ty {
                fn label() -> Cow<'static, str> {
                    Cow::Borrowed(stringify!($ty))
                }

                fn as_number(&self) -> Option<Number> {
                    Some(Number::UInt(*self as u128))
                }

                fn display(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn eq_native(&self, other: &dyn Any) -> Option<bool> {
                    other.downcast_ref::<$ty>().map(|other| self == other)
                }
            }
        )*
    };
}

macro_rules! impl_value_float {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Value for $ty {
                fn label() -> Cow<'static, str> {
                    Cow::Borrowed(stringify!($ty))
                }

                fn as_number(&self) -> Option<Number> {
                    Some(Number::Float(*self as f64))
                }

                fn display(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn eq_native(&self, other: &dyn Any) -> Option<bool> {
                    other.downcast_ref::<$ty>().map(|other| self == other)
                }
            }
        )*
    };
}

impl_value_int!(i8, i16, i32, i64, i128, isize);
impl_value_uint!(u8, u16, u32, u64, u128, usize);
impl_value_float!(f32, f64);

impl Value for bool {
    fn label() -> Cow<'static, str> {
        Cow::Borrowed("bool")
    }

    // No display impl: booleans render through the literal slot.
    fn as_bool(&self) -> Option<bool> {
        Some(*self)
    }

    fn eq_native(&self, other: &dyn Any) -> Option<bool> {
        other.downcast_ref::<bool>().map(|other| self == other)
    }
}

impl Value for char {
    fn label() -> Cow<'static, str> {
        Cow::Borrowed("char")
    }

    fn display(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn eq_native(&self, other: &dyn Any) -> Option<bool> {
        other.downcast_ref::<char>().map(|other| self == other)
    }
}

impl Value for String {
    fn label() -> Cow<'static, str> {
        Cow::Borrowed("String")
    }

    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }

    fn display(&self) -> Option<String> {
        Some(self.clone())
    }

    fn eq_native(&self, other: &dyn Any) -> Option<bool> {
        other.downcast_ref::<String>().map(|other| self == other)
    }
}

impl Value for &'static str {
    fn label() -> Cow<'static, str> {
        Cow::Borrowed("&str")
    }

    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(*self))
    }

    fn display(&self) -> Option<String> {
        Some((*self).to_owned())
    }

    fn eq_native(&self, other: &dyn Any) -> Option<bool> {
        other.downcast_ref::<&'static str>().map(|other| self == other)
    }
}

impl Value for () {
    fn label() -> Cow<'static, str> {
        Cow::Borrowed("()")
    }

    fn display(&self) -> Option<String> {
        Some("()".to_owned())
    }

    fn eq_native(&self, other: &dyn Any) -> Option<bool> {
        other.downcast_ref::<()>().map(|_| true)
    }
}

impl<T> Value for Vec<T>
where
    T: Value + PartialEq,
{
    fn label() -> Cow<'static, str> {
        Cow::Owned(format!("Vec<{}>", T::label()))
    }

    fn display(&self) -> Option<String> {
        Some(display_sequence(self.iter()))
    }

    fn eq_native(&self, other: &dyn Any) -> Option<bool> {
        other.downcast_ref::<Vec<T>>().map(|other| self == other)
    }
}

impl<T, const N: usize> Value for [T; N]
where
    T: Value + PartialEq,
{
    fn label() -> Cow<'static, str> {
        Cow::Owned(format!("[{}; {N}]", T::label()))
    }

    fn display(&self) -> Option<String> {
        Some(display_sequence(self.iter()))
    }

    fn eq_native(&self, other: &dyn Any) -> Option<bool> {
        other.downcast_ref::<[T; N]>().map(|other| self == other)
    }
}

impl<T> Value for Option<T>
where
    T: Value + PartialEq,
{
    fn label() -> Cow<'static, str> {
        Cow::Owned(format!("Option<{}>", T::label()))
    }

    fn display(&self) -> Option<String> {
        Some(match self {
            Some(value) => format!("Some({})", crate::stringify::show(value)),
            None => "None".to_owned(),
        })
    }

    fn eq_native(&self, other: &dyn Any) -> Option<bool> {
        other.downcast_ref::<Option<T>>().map(|other| self == other)
    }
}

/// Renders a sequence as `[a, b, c]`, going through the stringifier so
/// elements without a display form still render.
pub(crate) fn display_sequence<'a, T: Value + 'a>(items: impl Iterator<Item = &'a T>) -> String {
    let mut out = String::from("[");
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&crate::stringify::show(item));
    }
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn labels_compose() {
        assert_eq!(i32::label(), "i32");
        assert_eq!(<&'static str>::label(), "&str");
        assert_eq!(Vec::<String>::label(), "Vec<String>");
        assert_eq!(<[u8; 4]>::label(), "[u8; 4]");
        assert_eq!(Option::<Vec<i64>>::label(), "Option<Vec<i64>>");
    }

    #[test_case(Number::Int(1), Number::Int(1), true; "int int equal")]
    #[test_case(Number::Int(1), Number::Int(2), false; "int int unequal")]
    #[test_case(Number::Int(1), Number::UInt(1), true; "int uint equal")]
    #[test_case(Number::Int(-1), Number::UInt(u128::MAX), false; "negative int never equals uint")]
    #[test_case(Number::Int(2), Number::Float(2.0), true; "int float equal")]
    #[test_case(Number::Float(2.5), Number::Int(2), false; "float int unequal")]
    #[test_case(Number::UInt(7), Number::Float(7.0), true; "uint float equal")]
    fn number_promotion(a: Number, b: Number, expected: bool) {
        assert_eq!(a.eq_promoted(b), expected);
        assert_eq!(b.eq_promoted(a), expected);
    }

    #[test]
    fn nan_is_unequal_to_itself() {
        assert!(!Number::Float(f64::NAN).eq_promoted(Number::Float(f64::NAN)));
    }

    #[test]
    fn text_probe_covers_both_string_types() {
        let owned = String::from("hello");
        assert_eq!(owned.as_text().as_deref(), Some("hello"));
        assert_eq!("hello".as_text().as_deref(), Some("hello"));
        assert_eq!(3_i32.as_text(), None);
    }

    #[test]
    fn bool_renders_through_literal_slot() {
        assert_eq!(true.as_bool(), Some(true));
        assert_eq!(true.display(), None);
    }

    #[test]
    fn sequences_render_elementwise() {
        assert_eq!(vec![1, 2, 3].display().as_deref(), Some("[1, 2, 3]"));
        assert_eq!([0_u8; 0].display().as_deref(), Some("[]"));
        assert_eq!(Some(5_u8).display().as_deref(), Some("Some(5)"));
        assert_eq!(Option::<u8>::None.display().as_deref(), Some("None"));
    }

    #[test]
    fn eq_native_requires_the_same_type() {
        assert_eq!(3_i32.eq_native(&3_i32), Some(true));
        assert_eq!(3_i32.eq_native(&4_i32), Some(false));
        // A different concrete type does not downcast.
        assert_eq!(3_i32.eq_native(&3_i64), None);
    }
}
