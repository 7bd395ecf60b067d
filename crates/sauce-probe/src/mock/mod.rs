//! In-memory browser for hermetic tests.
//!
//! A [`MockSite`] plays the server: it renders the current page as a
//! [`MockDocument`] and reacts to clicks, typing and option selection on
//! keyed elements. [`MockDriver`] resolves locators against that document
//! the same way the CDP driver's compiled JavaScript does.

mod document;
mod driver;

pub use document::{MockDocument, MockElement};
pub use driver::{MockDriver, MockSessionFactory, MockSite, StaticSite};
