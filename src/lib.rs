//! Linelog - Single-line structured log messages for Rust
//!
//! A message is an ordered list of free-text segments and `key=value`
//! fields, built from chainable combinators and rendered either as
//! separator-delimited text or as netstrings.
//!
//! # Example
//!
//! ```rust
//! use linelog::{field, render, text, Combinator};
//!
//! let chain = text("some text")
//!     .then(field("key", "value"))
//!     .then(field("okay", true));
//!
//! assert_eq!(render(b", ", false, chain), b"some text, key=value, okay=True\n");
//!
//! let chain = text("some text")
//!     .then(field("key", "value"))
//!     .then(field("okay", true));
//!
//! assert_eq!(
//!     render(b", ", true, chain),
//!     b"9:some text,3:key,1:=,5:value,4:okay,1:=,4:True,\n"
//! );
//! ```
//!
//! Delimited output is not escaped. Keys, values or text containing the
//! separator or `=` make the line ambiguous to a parser; netstring output
//! never is.

mod builder;
mod encode;
mod error;
mod message;
pub mod reader;
mod render;

pub use builder::{empty, field, text, Combinator, Empty, Field, Text, Then};
pub use encode::{concat, shown, Concat, Encode, EncodeExt, Shown};
pub use error::{Error, Result};
pub use message::{Element, Message};
pub use reader::{parse_netstring, Reader};
pub use render::{render, write_netstring, Encoding, RenderOptions, Renderer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
