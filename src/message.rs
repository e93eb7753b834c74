//! Message data model.

use std::slice;

use crate::encode::Encode;

/// One atomic unit of a log message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    /// Free text, emitted as-is.
    FreeText(Vec<u8>),
    /// A key/value pair. The key is raw bytes; the value is already encoded.
    Field { key: Vec<u8>, value: Vec<u8> },
}

impl Element {
    /// Creates a free-text element from any encodable value.
    pub fn text<V: Encode>(value: V) -> Self {
        Element::FreeText(value.encode())
    }

    /// Creates a field element. The key is taken verbatim.
    pub fn field<K, V>(key: K, value: V) -> Self
    where
        K: AsRef<[u8]>,
        V: Encode,
    {
        Element::Field {
            key: key.as_ref().to_vec(),
            value: value.encode(),
        }
    }

    /// Returns the key of a field, or `None` for free text.
    pub fn key(&self) -> Option<&[u8]> {
        match self {
            Element::FreeText(_) => None,
            Element::Field { key, .. } => Some(key),
        }
    }

    /// Returns the free-text content or the field value.
    pub fn value(&self) -> &[u8] {
        match self {
            Element::FreeText(content) => content,
            Element::Field { value, .. } => value,
        }
    }

    /// Returns true for free text.
    pub fn is_text(&self) -> bool {
        matches!(self, Element::FreeText(_))
    }
}

/// An ordered sequence of elements in output order.
///
/// A message is never modified in place: every `with_*` call consumes the
/// message and returns a new one with the element appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Message {
    elements: Vec<Element>,
}

impl Message {
    /// Creates an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the message has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the elements in output order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Iterates over the elements in output order.
    pub fn iter(&self) -> slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Returns this message followed by `element`.
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Returns this message followed by a free-text element.
    pub fn with_text<V: Encode>(self, value: V) -> Self {
        self.with_element(Element::text(value))
    }

    /// Returns this message followed by a field element.
    pub fn with_field<K, V>(self, key: K, value: V) -> Self
    where
        K: AsRef<[u8]>,
        V: Encode,
    {
        self.with_element(Element::field(key, value))
    }
}

impl FromIterator<Element> for Message {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Message {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Message {
    type Item = &'a Element;
    type IntoIter = slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::concat;

    #[test]
    fn test_element_accessors() {
        let text = Element::text("hello");
        assert!(text.is_text());
        assert_eq!(text.key(), None);
        assert_eq!(text.value(), b"hello");

        let field = Element::field("count", 3u32);
        assert!(!field.is_text());
        assert_eq!(field.key(), Some(&b"count"[..]));
        assert_eq!(field.value(), b"3");
    }

    #[test]
    fn test_with_appends_in_order() {
        let message = Message::new()
            .with_text("start")
            .with_field("a", 1)
            .with_field(b"b", concat("x", 'y'));

        assert_eq!(
            message.elements(),
            &[
                Element::FreeText(b"start".to_vec()),
                Element::Field {
                    key: b"a".to_vec(),
                    value: b"1".to_vec()
                },
                Element::Field {
                    key: b"b".to_vec(),
                    value: b"xy".to_vec()
                },
            ]
        );
    }

    #[test]
    fn test_concat_does_not_add_elements() {
        let message = Message::new().with_text(concat("a", concat("b", "c")));
        assert_eq!(message.len(), 1);
    }

    #[test]
    fn test_earlier_message_unchanged() {
        let base = Message::new().with_text("base");
        let extended = base.clone().with_field("k", "v");
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
    }

    #[test]
    fn test_from_iterator() {
        let message: Message = vec![Element::text("a"), Element::field("k", true)]
            .into_iter()
            .collect();
        let values: Vec<&[u8]> = message.iter().map(Element::value).collect();
        assert_eq!(values, vec![&b"a"[..], &b"True"[..]]);
    }
}
