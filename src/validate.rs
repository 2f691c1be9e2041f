//! Line validator.
//!
//! [`check_line`] makes one streaming pass over a line with `serde_json`'s
//! pull deserializer. Keys are observed one at a time through a [`MapAccess`]
//! walk and each value is captured as a [`RawValue`] so its exact token text
//! can be checked before anything is decoded:
//!
//! ```text
//!   {  "ts" : 1700000000 , "si" : "…" , … }
//!   │   │     │
//!   │   │     └─ value token → typed by the key before it
//!   │   └─ key → counted, must be in the schema, at most once
//!   └─ object-begin → only at top level
//! ```
//!
//! After the walk the object must be closed, nothing may trail it, and all
//! nine schema keys must have been seen.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, Visitor};
use serde_json::value::RawValue;
use tracing::debug;
use uuid::Uuid;

use crate::error::ShapeError;
use crate::filename::{is_blank, is_valid_file_name};
use crate::models::Disposition;
use crate::schema::{self, DISPOSITION, FILE_NAME, KEYS};

/// Length of the hyphenated 8-4-4-4-12 UUID form.
const CANONICAL_UUID_LEN: usize = 36;

/// `true` iff `s` is a hyphenated 8-4-4-4-12 UUID (hex digits in any case).
pub fn is_uuid(s: &str) -> bool {
    s.len() == CANONICAL_UUID_LEN && Uuid::try_parse(s).is_ok()
}

/// `true` iff the numeric literal has no fractional part.
pub fn is_whole_number(s: &str) -> bool {
    !s.contains('.')
}

/// `true` iff `s` is the integer label of a [`Disposition`].
pub fn is_disposition_code(s: &str) -> bool {
    s.parse::<i64>()
        .ok()
        .and_then(Disposition::from_label)
        .is_some()
}

/// Returns `true` when `line` is a well-formed file record.
pub fn validate_line(line: &str) -> bool {
    check_line(line).is_ok()
}

/// Validate `line`, reporting the first rule it breaks.
pub fn check_line(line: &str) -> Result<(), ShapeError> {
    let mut walk = LineWalk::default();
    let mut de = serde_json::Deserializer::from_str(line);

    let outcome = (&mut walk).deserialize(&mut de).and_then(|()| de.end());

    if let Some(rejection) = walk.rejection.take() {
        return Err(rejection);
    }
    if let Err(e) = outcome {
        debug!(error = %e, "tokenizer rejected line");
        return Err(ShapeError::Malformed(e.to_string()));
    }
    walk.finish()
}

/// Kind of a value token, decided by its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Number,
    String,
    Null,
    Boolean,
    ArrayBegin,
    ObjectBegin,
}

impl Token {
    fn classify(text: &str) -> Option<Self> {
        match text.as_bytes().first().copied()? {
            b'"' => Some(Self::String),
            b'-' | b'0'..=b'9' => Some(Self::Number),
            b'n' => Some(Self::Null),
            b't' | b'f' => Some(Self::Boolean),
            b'[' => Some(Self::ArrayBegin),
            b'{' => Some(Self::ObjectBegin),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::ArrayBegin => "array",
            Self::ObjectBegin => "nested object",
        }
    }
}

/// Scratch state for one line.
#[derive(Default)]
struct LineWalk {
    key_counts: HashMap<&'static str, usize>,
    prev_key: Option<&'static str>,
    rejection: Option<ShapeError>,
}

impl LineWalk {
    /// Record `rejection` and turn it into a deserializer error so the walk
    /// stops at the offending token.
    fn reject<E: de::Error>(&mut self, rejection: ShapeError) -> E {
        let err = E::custom(&rejection);
        self.rejection = Some(rejection);
        err
    }

    fn on_key(&mut self, key: String) -> Result<(), ShapeError> {
        let Some(known) = schema::known_key(&key) else {
            return Err(ShapeError::UnknownKey(key));
        };

        let count = self.key_counts.entry(known).or_insert(0);
        *count += 1;
        if *count > 1 {
            return Err(ShapeError::DuplicateKey(key));
        }

        self.prev_key = Some(known);
        Ok(())
    }

    fn on_value(&self, raw: &RawValue) -> Result<(), ShapeError> {
        let key = self.prev_key.unwrap_or_default();
        let text = raw.get().trim();

        match Token::classify(text) {
            Some(Token::Number) => check_number(key, text),
            Some(Token::String) => {
                // The tokenizer skips escapes without decoding them; a lone
                // surrogate only fails here.
                let value: String = serde_json::from_str(text)
                    .map_err(|_| ShapeError::BadEscape { key: key.to_string() })?;
                check_string(key, &value)
            }
            Some(token) => Err(ShapeError::UnexpectedToken {
                key: key.to_string(),
                token: token.name(),
            }),
            None => Err(ShapeError::Malformed(format!("unrecognized token `{}`", text))),
        }
    }

    fn finish(self) -> Result<(), ShapeError> {
        if self.key_counts.len() != KEYS.len() {
            let missing = KEYS
                .iter()
                .copied()
                .filter(|k| !self.key_counts.contains_key(k))
                .collect();
            return Err(ShapeError::MissingKeys(missing));
        }
        Ok(())
    }
}

fn check_number(key: &str, literal: &str) -> Result<(), ShapeError> {
    if !schema::is_number_key(key) {
        return Err(ShapeError::UnexpectedNumber { key: key.to_string() });
    }
    // Read with the decoder's own parser: `-0` and `1e9` are floats to it.
    if !is_whole_number(literal) || serde_json::from_str::<i64>(literal).is_err() {
        return Err(ShapeError::NotWholeNumber {
            key: key.to_string(),
            literal: literal.to_string(),
        });
    }
    if key == DISPOSITION && !is_disposition_code(literal) {
        return Err(ShapeError::InvalidDisposition(literal.to_string()));
    }
    Ok(())
}

fn check_string(key: &str, value: &str) -> Result<(), ShapeError> {
    if schema::is_number_key(key) {
        return Err(ShapeError::UnexpectedString { key: key.to_string() });
    }
    if is_blank(value) {
        return Err(ShapeError::BlankValue { key: key.to_string() });
    }
    if schema::is_uuid_key(key) && !is_uuid(value) {
        return Err(ShapeError::InvalidUuid {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    if key == FILE_NAME && !is_valid_file_name(value) {
        return Err(ShapeError::InvalidFileName(value.to_string()));
    }
    Ok(())
}

impl<'de> DeserializeSeed<'de> for &mut LineWalk {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for &mut LineWalk {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(key) = map.next_key::<String>()? {
            if let Err(rejection) = self.on_key(key) {
                return Err(self.reject(rejection));
            }
            let raw: &RawValue = map.next_value()?;
            if let Err(rejection) = self.on_value(raw) {
                return Err(self.reject(rejection));
            }
        }

        Ok(())
    }
}
