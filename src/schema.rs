//! Wire schema of a file-observation line.
//!
//! Every line is a flat JSON object carrying exactly the keys in [`KEYS`].
//! Number keys take integer literals, UUID keys take canonical UUID strings,
//! the filename key takes a `<head>.<tail>` name, and every other key takes a
//! non-blank string.

pub const TIMESTAMP: &str = "ts";
pub const PROCESSING_TIME: &str = "pt";
pub const SESSION_ID: &str = "si";
pub const USER_ID: &str = "uu";
pub const BUSINESS_ID: &str = "bg";
pub const SHA: &str = "sha";
pub const FILE_NAME: &str = "nm";
pub const FILE_PATH: &str = "ph";
pub const DISPOSITION: &str = "dp";

/// The full key set, in wire order.
pub const KEYS: [&str; 9] = [
    TIMESTAMP,
    PROCESSING_TIME,
    SESSION_ID,
    USER_ID,
    BUSINESS_ID,
    SHA,
    FILE_NAME,
    FILE_PATH,
    DISPOSITION,
];

pub const NUMBER_KEYS: [&str; 3] = [TIMESTAMP, PROCESSING_TIME, DISPOSITION];

pub const UUID_KEYS: [&str; 3] = [SESSION_ID, USER_ID, BUSINESS_ID];

/// Look up `key` in the schema, returning its `'static` spelling.
pub fn known_key(key: &str) -> Option<&'static str> {
    KEYS.iter().copied().find(|k| *k == key)
}

pub fn is_number_key(key: &str) -> bool {
    NUMBER_KEYS.contains(&key)
}

pub fn is_uuid_key(key: &str) -> bool {
    UUID_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_subsets_are_within_key_set() {
        for key in NUMBER_KEYS.iter().chain(UUID_KEYS.iter()) {
            assert!(known_key(key).is_some(), "{} not in KEYS", key);
        }
        assert!(known_key(FILE_NAME).is_some());
        assert!(known_key(DISPOSITION).is_some());
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(known_key("extra"), None);
        assert_eq!(known_key("SHA"), None);
        assert_eq!(known_key(""), None);
    }

    #[test]
    fn test_disposition_is_a_number_key() {
        assert!(is_number_key(DISPOSITION));
        assert!(!is_uuid_key(DISPOSITION));
        assert!(!is_number_key(SHA));
    }
}
