//! Value encoding.
//!
//! [`Encode`] turns a value into the bytes that end up inside a free-text
//! segment or a field value. The built-in adapters cover integers, floats,
//! booleans, text, characters and pre-encoded bytes; implement the trait for
//! your own types to log them directly.

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::rc::Rc;
use std::sync::Arc;

/// Initial capacity for a standalone value encoding.
pub(crate) const VALUE_CAPACITY: usize = 32;

/// Conversion of a value into its logged byte representation.
///
/// Encoding is total: every value of an implementing type has a byte form.
pub trait Encode {
    /// Appends the encoding of `self` to `buf`.
    fn encode_to(&self, buf: &mut Vec<u8>);

    /// Expected encoded length, used only to size buffers.
    fn encoded_len_hint(&self) -> usize {
        0
    }

    /// Returns the encoding of `self` as a fresh byte vector.
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len_hint().max(VALUE_CAPACITY));
        self.encode_to(&mut buf);
        buf
    }
}

/// Writes an unsigned value as decimal ASCII.
macro_rules! write_decimal {
    ($name:ident, $ty:ty, $digits:expr) => {
        #[inline]
        pub(crate) fn $name(buf: &mut Vec<u8>, mut value: $ty) {
            let mut digits = [0u8; $digits];
            let mut i = digits.len();
            loop {
                i -= 1;
                digits[i] = b'0' + (value % 10) as u8;
                value /= 10;
                if value == 0 {
                    break;
                }
            }
            buf.extend_from_slice(&digits[i..]);
        }
    };
}

write_decimal!(write_u64, u64, 20);
write_decimal!(write_u128, u128, 39);

macro_rules! impl_unsigned {
    ($writer:ident: $($ty:ty),*) => {
        $(
            impl Encode for $ty {
                #[inline]
                fn encode_to(&self, buf: &mut Vec<u8>) {
                    $writer(buf, *self as _);
                }
            }
        )*
    };
}

macro_rules! impl_signed {
    ($writer:ident: $($ty:ty),*) => {
        $(
            impl Encode for $ty {
                #[inline]
                fn encode_to(&self, buf: &mut Vec<u8>) {
                    if *self < 0 {
                        buf.push(b'-');
                    }
                    $writer(buf, self.unsigned_abs() as _);
                }
            }
        )*
    };
}

impl_unsigned!(write_u64: u8, u16, u32, u64, usize);
impl_unsigned!(write_u128: u128);
impl_signed!(write_u64: i8, i16, i32, i64, isize);
impl_signed!(write_u128: i128);

/// `fmt::Write` sink over a byte vector.
struct FmtSink<'a>(&'a mut Vec<u8>);

impl fmt::Write for FmtSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Appends the `Display` form of `value` to `buf`.
///
/// The sink never fails. A `Display` impl that reports an error keeps
/// whatever it wrote before failing.
fn write_display<T: Display + ?Sized>(buf: &mut Vec<u8>, value: &T) {
    let _ = fmt::Write::write_fmt(&mut FmtSink(buf), format_args!("{value}"));
}

impl Encode for f32 {
    fn encode_to(&self, buf: &mut Vec<u8>) {
        write_display(buf, self);
    }
}

impl Encode for f64 {
    fn encode_to(&self, buf: &mut Vec<u8>) {
        write_display(buf, self);
    }
}

/// Booleans are capitalized on the wire: `True` and `False`.
impl Encode for bool {
    #[inline]
    fn encode_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(if *self { b"True" } else { b"False" });
    }

    fn encoded_len_hint(&self) -> usize {
        5
    }
}

impl Encode for char {
    #[inline]
    fn encode_to(&self, buf: &mut Vec<u8>) {
        let mut utf8 = [0u8; 4];
        buf.extend_from_slice(self.encode_utf8(&mut utf8).as_bytes());
    }

    fn encoded_len_hint(&self) -> usize {
        self.len_utf8()
    }
}

impl Encode for str {
    #[inline]
    fn encode_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }

    fn encoded_len_hint(&self) -> usize {
        self.len()
    }
}

impl Encode for String {
    #[inline]
    fn encode_to(&self, buf: &mut Vec<u8>) {
        self.as_str().encode_to(buf);
    }

    fn encoded_len_hint(&self) -> usize {
        self.len()
    }
}

impl Encode for [u8] {
    #[inline]
    fn encode_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self);
    }

    fn encoded_len_hint(&self) -> usize {
        self.len()
    }
}

impl<const N: usize> Encode for [u8; N] {
    #[inline]
    fn encode_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self);
    }

    fn encoded_len_hint(&self) -> usize {
        N
    }
}

impl Encode for Vec<u8> {
    #[inline]
    fn encode_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self);
    }

    fn encoded_len_hint(&self) -> usize {
        self.len()
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn encode_to(&self, buf: &mut Vec<u8>) {
        (**self).encode_to(buf);
    }

    fn encoded_len_hint(&self) -> usize {
        (**self).encoded_len_hint()
    }
}

macro_rules! impl_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Encode + ?Sized> Encode for $ptr<T> {
                #[inline]
                fn encode_to(&self, buf: &mut Vec<u8>) {
                    (**self).encode_to(buf);
                }

                fn encoded_len_hint(&self) -> usize {
                    (**self).encoded_len_hint()
                }
            }
        )*
    };
}

impl_pointer!(Box, Rc, Arc);

impl<B> Encode for Cow<'_, B>
where
    B: Encode + ToOwned + ?Sized,
{
    #[inline]
    fn encode_to(&self, buf: &mut Vec<u8>) {
        (**self).encode_to(buf);
    }

    fn encoded_len_hint(&self) -> usize {
        (**self).encoded_len_hint()
    }
}

/// `None` contributes no bytes.
impl<T: Encode> Encode for Option<T> {
    #[inline]
    fn encode_to(&self, buf: &mut Vec<u8>) {
        if let Some(value) = self {
            value.encode_to(buf);
        }
    }

    fn encoded_len_hint(&self) -> usize {
        self.as_ref().map_or(0, |value| value.encoded_len_hint())
    }
}

/// Two values encoded back to back as one value.
///
/// Produced by [`concat`] or [`EncodeExt::concat`]. It inlines both encodings
/// into whichever segment it is placed in and never introduces a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Concat<A, B> {
    first: A,
    second: B,
}

impl<A: Encode, B: Encode> Encode for Concat<A, B> {
    #[inline]
    fn encode_to(&self, buf: &mut Vec<u8>) {
        self.first.encode_to(buf);
        self.second.encode_to(buf);
    }

    fn encoded_len_hint(&self) -> usize {
        self.first.encoded_len_hint() + self.second.encoded_len_hint()
    }
}

/// Combines two values into one whose encoding is `first` followed by `second`.
pub fn concat<A: Encode, B: Encode>(first: A, second: B) -> Concat<A, B> {
    Concat { first, second }
}

/// Method form of [`concat`].
pub trait EncodeExt: Encode + Sized {
    /// Appends `other` to `self` inside the same value.
    fn concat<B: Encode>(self, other: B) -> Concat<Self, B> {
        concat(self, other)
    }
}

impl<T: Encode> EncodeExt for T {}

/// Encodes any `Display` type through its textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shown<T>(pub T);

impl<T: Display> Encode for Shown<T> {
    fn encode_to(&self, buf: &mut Vec<u8>) {
        write_display(buf, &self.0);
    }
}

/// Wraps a `Display` value so it can be logged.
pub fn shown<T: Display>(value: T) -> Shown<T> {
    Shown(value)
}
