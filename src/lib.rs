//! capdex – the capture indexing substrate of a text pattern templating engine.
//!
//! A templating engine expands named placeholders into regular-expression
//! fragments. For every capture group a match produces it must locate and
//! post-process the matched text: rename it, validate it via a predicate,
//! or hand back caller-supplied opaque data. capdex centers on the
//! *capture* concept and the views needed to resolve one quickly:
//! * A [`capture::Capture`] describes one named group of an expanded
//!   pattern: its per-pattern id, the slot number the regex engine
//!   assigned, an `outer:inner` qualified name with its derived subname,
//!   the source pattern text, an optional [`capture::Predicate`]
//!   reference and an opaque caller payload.
//! * A [`store::Index`] is a small embedded ordered key-value store, and
//!   a [`store::BucketList`] an index-addressable sequence used as the
//!   value type of one-to-many index entries.
//! * A [`capture::Registry`] owns the captures of one compiled pattern
//!   and keeps four index views over them mutually consistent: by id
//!   (primary), by capture number, by name and by subname.
//!
//! ## Modules
//! * [`store`] – the embedded ordered store underneath the registry.
//! * [`capture`] – captures, predicates and the registry of views.
//! * [`error`] – the error type produced by the consistency diagnostics.
//!
//! ## Quick Start
//! ```
//! use capdex::capture::{Capture, Registry};
//!
//! let mut registry = Registry::new();
//! let mut capture = Capture::new();
//! capture.set_id(0);
//! capture.set_name("WORD:verb");
//! capture.set_pattern(r"\b\w+\b");
//! // registered provisionally while the pattern is still being compiled
//! registry.add(&capture, false);
//! // and again once the regex engine has assigned the real slot
//! capture.set_capture_number(1);
//! registry.add(&capture, false);
//! assert_eq!(registry.get_by_subname("verb").unwrap().capture_number(), 1);
//! ```
//!
//! ## Concurrency
//! The registry is built single-threaded (`add` takes `&mut self`) and
//! has no internal locking. Once a pattern is compiled the registry can
//! be shared immutably across any number of matching threads; all
//! lookups and walks take `&self`.
//!
//! ## Diagnostics
//! Trace points (capture added, qualified-only skip, extra attached,
//! walk step) are emitted through `tracing`; no subscriber is installed
//! by the library itself.

pub mod capture;
pub mod error;
pub mod store;
