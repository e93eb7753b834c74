//! Message combinators.
//!
//! A [`Combinator`] turns one [`Message`] into another. Chains are written
//! left to right with [`Combinator::then`], and elements come out in the
//! same order they were written:
//!
//! ```rust
//! use linelog::{field, text, Combinator};
//!
//! let message = text("listening")
//!     .then(field("port", 8080))
//!     .then(field("tls", false))
//!     .build();
//! assert_eq!(message.len(), 3);
//! ```
//!
//! `field(key, value)` is a complete combinator on its own, so a chain of
//! fields always composes whole fields; a field value is never a partial chain.

use crate::encode::Encode;
use crate::message::{Element, Message};

/// A message transformation step.
pub trait Combinator {
    /// Applies this step to `message`, returning the extended message.
    fn apply(self, message: Message) -> Message;

    /// Runs `self` and then `next`, so elements from `self` come first.
    fn then<C: Combinator>(self, next: C) -> Then<Self, C>
    where
        Self: Sized,
    {
        Then { first: self, next }
    }

    /// Applies the chain to an empty message.
    fn build(self) -> Message
    where
        Self: Sized,
    {
        self.apply(Message::new())
    }
}

/// Any `FnOnce(Message) -> Message` is a combinator.
impl<F> Combinator for F
where
    F: FnOnce(Message) -> Message,
{
    fn apply(self, message: Message) -> Message {
        self(message)
    }
}

/// Combinator produced by [`text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text<V> {
    value: V,
}

impl<V: Encode> Combinator for Text<V> {
    fn apply(self, message: Message) -> Message {
        message.with_text(self.value)
    }
}

/// Appends a free-text element holding the encoding of `value`.
pub fn text<V: Encode>(value: V) -> Text<V> {
    Text { value }
}

/// Combinator produced by [`field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<K, V> {
    key: K,
    value: V,
}

impl<K: AsRef<[u8]>, V: Encode> Combinator for Field<K, V> {
    fn apply(self, message: Message) -> Message {
        message.with_field(self.key, self.value)
    }
}

/// Appends a field element. The key bytes are used verbatim.
pub fn field<K: AsRef<[u8]>, V: Encode>(key: K, value: V) -> Field<K, V> {
    Field { key, value }
}

/// Combinator produced by [`Combinator::then`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Then<A, B> {
    first: A,
    next: B,
}

impl<A: Combinator, B: Combinator> Combinator for Then<A, B> {
    fn apply(self, message: Message) -> Message {
        self.next.apply(self.first.apply(message))
    }
}

/// Combinator that leaves the message unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Empty;

impl Combinator for Empty {
    fn apply(self, message: Message) -> Message {
        message
    }
}

/// Returns the identity combinator, the unit of [`Combinator::then`].
pub fn empty() -> Empty {
    Empty
}

/// A message is a combinator that appends its own elements.
impl Combinator for Message {
    fn apply(self, message: Message) -> Message {
        if message.is_empty() {
            return self;
        }
        self.into_iter().fold(message, Message::with_element)
    }
}

/// A prebuilt element appends itself.
impl Combinator for Element {
    fn apply(self, message: Message) -> Message {
        message.with_element(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(message: &Message) -> Vec<&[u8]> {
        message.iter().map(|e| e.key().unwrap_or(e.value())).collect()
    }

    #[test]
    fn test_left_to_right_order() {
        let message = text("a").then(field("b", 1)).then(field("c", 2)).build();
        assert_eq!(keys(&message), vec![&b"a"[..], b"b", b"c"]);
    }

    #[test]
    fn test_then_is_associative() {
        let left = text("a").then(text("b")).then(text("c")).build();
        let right = text("a").then(text("b").then(text("c"))).build();
        assert_eq!(left, right);
    }

    #[test]
    fn test_nested_chains_keep_order() {
        let inner = field("x", 1).then(field("y", 2).then(field("z", 3)));
        let message = text("start").then(inner.then(text("end"))).build();
        assert_eq!(
            keys(&message),
            vec![&b"start"[..], b"x", b"y", b"z", b"end"]
        );
    }

    #[test]
    fn test_empty_is_identity() {
        assert!(empty().build().is_empty());
        let message = empty().then(text("a")).then(empty()).build();
        assert_eq!(message, text("a").build());
    }

    #[test]
    fn test_closure_combinator() {
        let request_id = |m: Message| m.with_field("request_id", 99u64);
        let message = text("handled").then(request_id).build();
        assert_eq!(message.elements()[1], Element::field("request_id", "99"));
    }

    #[test]
    fn test_message_and_element_as_combinators() {
        let context = field("host", "db1").then(field("shard", 4)).build();
        let message = text("query").then(context).then(Element::text("done")).build();
        assert_eq!(keys(&message), vec![&b"query"[..], b"host", b"shard", b"done"]);
    }
}
