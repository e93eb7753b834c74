//! Message rendering.
//!
//! Two wire encodings are supported:
//!
//! - **Delimited**: `text` and `key=value` segments joined by a separator.
//!   Nothing is escaped, so pick a separator that cannot appear in the
//!   content, or use netstrings.
//! - **Netstring**: every segment is written as `<len>:<bytes>,` with no
//!   separator. A field is its key netstring, `1:=,`, then its value netstring.
//!
//! Both encodings end the line with a single `\n`.

use tracing::trace;

use crate::builder::Combinator;
use crate::encode::write_u64;
use crate::message::{Element, Message};

/// Initial capacity for a rendered message.
const MESSAGE_CAPACITY: usize = 256;

/// Default delimited-mode separator.
const DEFAULT_SEPARATOR: &[u8] = b" ";

/// The key/value marker as a netstring.
pub(crate) const FIELD_MARKER: &[u8] = b"1:=,";

/// Wire encoding of a rendered message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Segments joined by a separator.
    #[default]
    Delimited,
    /// Length-prefixed segments.
    Netstring,
}

impl Encoding {
    /// Maps a "use netstring encoding" flag to an encoding.
    pub fn from_netstring_flag(netstring: bool) -> Self {
        if netstring {
            Encoding::Netstring
        } else {
            Encoding::Delimited
        }
    }

    /// Returns the encoding name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Delimited => "delimited",
            Encoding::Netstring => "netstring",
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Placed between elements in delimited mode. Ignored for netstrings.
    pub separator: Vec<u8>,
    /// Selected wire encoding.
    pub encoding: Encoding,
    /// Initial output buffer size.
    pub capacity: usize,
}

impl RenderOptions {
    /// Options for delimited output with the given separator.
    pub fn delimited(separator: impl AsRef<[u8]>) -> Self {
        Self::default().with_separator(separator)
    }

    /// Options for netstring output.
    pub fn netstring() -> Self {
        Self::default().with_encoding(Encoding::Netstring)
    }

    /// Sets the delimited-mode separator.
    pub fn with_separator(mut self, separator: impl AsRef<[u8]>) -> Self {
        self.separator = separator.as_ref().to_vec();
        self
    }

    /// Sets the wire encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the initial output buffer size.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_vec(),
            encoding: Encoding::default(),
            capacity: MESSAGE_CAPACITY,
        }
    }
}

/// Renderer serializes messages under a fixed set of options.
///
/// Holds no mutable state and can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Creates a renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Returns the renderer's options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders a message into a new buffer.
    pub fn render(&self, message: &Message) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.options.capacity);
        self.render_into(message, &mut out);
        out
    }

    /// Applies `chain` to an empty message and renders the result.
    pub fn render_chain<C: Combinator>(&self, chain: C) -> Vec<u8> {
        self.render(&chain.build())
    }

    /// Appends the rendered message to `out`.
    ///
    /// Existing contents of `out` are kept, so a cleared buffer can be
    /// reused across messages.
    pub fn render_into(&self, message: &Message, out: &mut Vec<u8>) {
        let start = out.len();
        match self.options.encoding {
            Encoding::Delimited => write_delimited(out, &self.options.separator, message),
            Encoding::Netstring => write_netstrings(out, message),
        }
        out.push(b'\n');

        trace!(
            elements = message.len(),
            bytes = out.len() - start,
            encoding = self.options.encoding.as_str(),
            "rendered message"
        );
    }
}

fn write_delimited(out: &mut Vec<u8>, separator: &[u8], message: &Message) {
    for (i, element) in message.iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(separator);
        }
        match element {
            Element::FreeText(content) => out.extend_from_slice(content),
            Element::Field { key, value } => {
                out.extend_from_slice(key);
                out.push(b'=');
                out.extend_from_slice(value);
            }
        }
    }
}

fn write_netstrings(out: &mut Vec<u8>, message: &Message) {
    for element in message {
        match element {
            Element::FreeText(content) => write_netstring(out, content),
            Element::Field { key, value } => {
                write_netstring(out, key);
                out.extend_from_slice(FIELD_MARKER);
                write_netstring(out, value);
            }
        }
    }
}

/// Appends `bytes` to `out` as `<len>:<bytes>,`.
pub fn write_netstring(out: &mut Vec<u8>, bytes: &[u8]) {
    write_u64(out, bytes.len() as u64);
    out.push(b':');
    out.extend_from_slice(bytes);
    out.push(b',');
}

/// Applies `chain` to an empty message and renders it.
///
/// `separator` is used only when `netstring` is false.
pub fn render<C: Combinator>(separator: &[u8], netstring: bool, chain: C) -> Vec<u8> {
    let options = RenderOptions::delimited(separator)
        .with_encoding(Encoding::from_netstring_flag(netstring));
    Renderer::new(options).render_chain(chain)
}
