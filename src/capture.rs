//! Captures and the [`Registry`] of views over them.
//!
//! The pattern compiler creates one [`Capture`] per named group it
//! discovers and registers it as ids and engine slots become known,
//! possibly twice per capture: once provisionally and once after the
//! regex engine has assigned a real capture number. After a match, the
//! engine binding resolves slot numbers back through the registry to
//! obtain names, subnames, predicates and caller payloads.

// used to print out readable forms of a capture
use std::fmt;

use tracing::{debug, trace};

use crate::error::{RegistryError, Result};
use crate::store::{BucketList, Index};

/// Sentinel for ids and capture numbers that have not been assigned yet.
pub const UNSET: i32 = -1;

/// The character splitting an "outer:inner" capture name into its name
/// and subname parts.
pub const QUALIFIER: char = ':';

// ------------- Predicate -------------

/// A reference to a validation hook for matched text: the namespace that
/// registered the function, plus the function name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    namespace: String,
    function: String,
}
impl Predicate {
    pub fn new(namespace: &str, function: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            function: function.to_owned(),
        }
    }
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
    pub fn function(&self) -> &str {
        &self.function
    }
}
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace, QUALIFIER, self.function)
    }
}

// ------------- Capture -------------

/// Metadata describing one named group from an expanded text pattern.
///
/// A capture owns every buffer it holds. Unassigned numeric fields carry
/// the [`UNSET`] sentinel; unassigned text fields are simply `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    id: i32,
    capture_number: i32,
    name: Option<String>,
    subname: Option<String>,
    pattern: Option<String>,
    predicate: Option<Predicate>,
    extra: Option<Vec<u8>>,
}

impl Capture {
    /// A capture with every field unset. Nothing is indexed until the
    /// compiler hands it to [`Registry::add`].
    pub fn new() -> Self {
        Self {
            id: UNSET,
            capture_number: UNSET,
            name: None,
            subname: None,
            pattern: None,
            predicate: None,
            extra: None,
        }
    }
    /// The per-pattern id, the primary key of the registry.
    pub fn id(&self) -> i32 {
        self.id
    }
    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    /// The slot the regex engine assigned to this group, or [`UNSET`]
    /// until compilation has finished.
    pub fn capture_number(&self) -> i32 {
        self.capture_number
    }
    pub fn set_capture_number(&mut self, number: i32) {
        self.capture_number = number;
    }
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    /// Set the group name. A name of the form "outer:inner" also sets the
    /// subname to everything after the first qualifier separator.
    pub fn set_name(&mut self, name: &str) {
        self.subname = name
            .split_once(QUALIFIER)
            .map(|(_, subname)| subname.to_owned());
        self.name = Some(name.to_owned());
    }
    pub fn subname(&self) -> Option<&str> {
        self.subname.as_deref()
    }
    /// The source pattern text this group was expanded from.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }
    pub fn set_pattern(&mut self, pattern: &str) {
        self.pattern = Some(pattern.to_owned());
    }
    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }
    pub fn set_predicate(&mut self, predicate: Predicate) {
        self.predicate = Some(predicate);
    }
    pub fn extra(&self) -> Option<&[u8]> {
        self.extra.as_deref()
    }
    /// Attach an opaque caller payload. The bytes are copied into the
    /// capture, not borrowed.
    pub fn set_extra(&mut self, payload: &[u8]) {
        debug!(id = self.id, len = payload.len(), "attaching extra");
        self.extra = Some(payload.to_vec());
    }
    /// Whether the name carries an "outer:inner" qualifier.
    pub fn is_qualified(&self) -> bool {
        self.name.as_deref().is_some_and(|name| name.contains(QUALIFIER))
    }
}
impl fmt::Display for Capture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (slot {}) {} -> {}",
            self.id,
            self.capture_number,
            self.name.as_deref().unwrap_or("?"),
            self.pattern.as_deref().unwrap_or("?")
        )
    }
}

// ------------- Registry -------------

/// Four simultaneous views over the captures of one compiled pattern.
///
/// The by-id index is the primary one and holds the authoritative record
/// of every capture; the by-capture-number, by-name and by-subname views
/// are derived from it and updated together with it on every [`add`].
/// Each view holds its own copy of a capture, never an alias into
/// another view.
///
/// [`add`]: Registry::add
#[derive(Debug)]
pub struct Registry {
    by_id: Index<i32, Capture>,
    by_capture_number: Index<i32, Capture>,
    by_name: Index<String, BucketList<Capture>>,
    by_subname: Index<String, BucketList<Capture>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            by_id: Index::new(),
            by_capture_number: Index::new(),
            by_name: Index::new(),
            by_subname: Index::new(),
        }
    }

    /// Register a capture, or re-register it once the regex engine has
    /// assigned its real capture number. Re-registration with an id
    /// already present replaces the earlier record in every view.
    ///
    /// With `only_qualified` set, captures whose name carries no
    /// "outer:inner" qualifier are skipped entirely.
    pub fn add(&mut self, capture: &Capture, only_qualified: bool) {
        if only_qualified && !capture.is_qualified() {
            trace!(id = capture.id, name = capture.name(), "skipping unqualified capture");
            return;
        }
        debug!(
            id = capture.id,
            number = capture.capture_number,
            name = capture.name(),
            "adding capture"
        );
        // primary key is the id
        self.by_id.put(capture.id, capture.clone());
        // UNSET is a legitimate key here: captures without an assigned
        // slot collect under -1, and the most recently added one wins
        self.by_capture_number
            .put(capture.capture_number, capture.clone());
        if let Some(name) = capture.name() {
            Self::put_bucket(&mut self.by_name, name, capture);
        }
        if let Some(subname) = capture.subname() {
            Self::put_bucket(&mut self.by_subname, subname, capture);
        }
    }

    // One-to-many upsert: captures sharing a key collect in a bucket
    // list, but no key ever holds two captures with the same id.
    fn put_bucket(
        index: &mut Index<String, BucketList<Capture>>,
        key: &str,
        capture: &Capture,
    ) {
        match index.get_mut(key) {
            Some(bucket) => {
                if let Some(at) = bucket.iter().position(|kept| kept.id == capture.id) {
                    bucket.remove_at(at);
                }
                bucket.push_back(capture.clone());
            }
            None => {
                let mut bucket = BucketList::new();
                bucket.push_back(capture.clone());
                index.put(key.to_owned(), bucket);
            }
        }
    }

    pub fn get_by_id(&self, id: i32) -> Option<&Capture> {
        self.by_id.get(&id)
    }
    /// The first capture registered under `name` that is still present.
    /// Further captures sharing the name are not reachable through this
    /// accessor.
    pub fn get_by_name(&self, name: &str) -> Option<&Capture> {
        self.by_name.get(name).and_then(|bucket| bucket.value_at(0))
    }
    pub fn get_by_subname(&self, subname: &str) -> Option<&Capture> {
        self.by_subname
            .get(subname)
            .and_then(|bucket| bucket.value_at(0))
    }
    pub fn get_by_capture_number(&self, number: i32) -> Option<&Capture> {
        self.by_capture_number.get(&number)
    }

    /// Walk all captures in ascending id order. Walks are independent of
    /// each other and every call starts over from the lowest id.
    pub fn walk(&self) -> impl Iterator<Item = &Capture> {
        self.by_id.iter().map(|(id, capture)| {
            trace!(id = *id, "walk step");
            capture
        })
    }

    /// The number of captures in the primary index.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Verify that the secondary views are consistent with the primary
    /// index: every record keyed where it claims to belong, every
    /// primary record reflected in each view its fields select, and no
    /// bucket holding two captures with the same id. Returns the first
    /// violation found.
    pub fn check_consistency(&self) -> Result<()> {
        for (id, capture) in self.by_id.iter() {
            if *id != capture.id {
                return Err(invariant(format!(
                    "capture {} stored under id key {}",
                    capture.id, id
                )));
            }
            // last-write-wins on slot keys: the entry under this number
            // may belong to a later capture, but the key must exist
            if self.by_capture_number.get(&capture.capture_number).is_none() {
                return Err(invariant(format!(
                    "capture {} missing from the by-capture-number view",
                    capture.id
                )));
            }
            if let Some(name) = capture.name() {
                Self::check_bucket(&self.by_name, name, capture, "by-name")?;
            }
            if let Some(subname) = capture.subname() {
                Self::check_bucket(&self.by_subname, subname, capture, "by-subname")?;
            }
        }
        for (number, capture) in self.by_capture_number.iter() {
            if *number != capture.capture_number {
                return Err(invariant(format!(
                    "capture {} stored under capture number key {}",
                    capture.id, number
                )));
            }
            if self.by_id.get(&capture.id).is_none() {
                return Err(invariant(format!(
                    "by-capture-number entry {} has no primary record",
                    capture.id
                )));
            }
        }
        Self::check_keys(&self.by_name, |capture| capture.name(), "by-name")?;
        Self::check_keys(&self.by_subname, |capture| capture.subname(), "by-subname")?;
        Ok(())
    }

    // The record for `capture` must appear exactly once in the bucket
    // under `key`, and must match the primary record field for field.
    fn check_bucket(
        index: &Index<String, BucketList<Capture>>,
        key: &str,
        capture: &Capture,
        view: &str,
    ) -> Result<()> {
        let Some(bucket) = index.get(key) else {
            return Err(invariant(format!(
                "capture {} missing from the {} view under {:?}",
                capture.id, view, key
            )));
        };
        let same_id: Vec<&Capture> = bucket.iter().filter(|kept| kept.id == capture.id).collect();
        match same_id.as_slice() {
            [kept] if *kept == capture => Ok(()),
            [_] => Err(invariant(format!(
                "{} entry for capture {} under {:?} diverges from the primary record",
                view, capture.id, key
            ))),
            [] => Err(invariant(format!(
                "capture {} missing from the {} bucket under {:?}",
                capture.id, view, key
            ))),
            _ => Err(invariant(format!(
                "{} bucket under {:?} holds {} entries for capture {}",
                view,
                key,
                same_id.len(),
                capture.id
            ))),
        }
    }

    // Every bucket entry must carry the key it is stored under and refer
    // back to a primary record.
    fn check_keys(
        index: &Index<String, BucketList<Capture>>,
        field: impl Fn(&Capture) -> Option<&str>,
        view: &str,
    ) -> Result<()> {
        for (key, bucket) in index.iter() {
            if bucket.is_empty() {
                return Err(invariant(format!("empty {} bucket under {:?}", view, key)));
            }
            for kept in bucket.iter() {
                if field(kept) != Some(key.as_str()) {
                    return Err(invariant(format!(
                        "{} entry for capture {} stored under foreign key {:?}",
                        view, kept.id, key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn invariant(message: String) -> RegistryError {
    RegistryError::Invariant(message)
}
