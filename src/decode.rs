//! Record decoder.
//!
//! Binds the nine wire keys of an accepted line to a [`FileRecord`]. Callers
//! are expected to run [`validate_line`](crate::validate::validate_line)
//! first; a line the validator would reject comes back as
//! [`ContractError::Undecodable`].

use crate::error::ContractError;
use crate::models::FileRecord;

/// Decode an already-validated line into a [`FileRecord`].
pub fn decode_line(line: &str) -> Result<FileRecord, ContractError> {
    Ok(serde_json::from_str(line)?)
}

/// Serialize a record back to a single wire line.
pub fn encode_record(record: &FileRecord) -> String {
    // Only strings, integers and UUIDs; serialization cannot fail.
    serde_json::to_string(record).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Disposition;
    use crate::validate::validate_line;
    use uuid::Uuid;

    fn sample_line() -> String {
        format!(
            r#"{{"ts":1591362000,"pt":27,"si":"{}","uu":"{}","bg":"{}","sha":"9f86d081884c","nm":"report.final.docx","ph":"C:\\Users\\alice\\report.final.docx","dp":1}}"#,
            "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            "3e8a1c3a-5c7e-4b77-9d0c-52c0a4a8f1d2",
            "0b3f5c2e-9a41-4d7b-8b0e-7e6d5c4b3a21",
        )
    }

    #[test]
    fn test_decode_fields() {
        let line = sample_line();
        assert!(validate_line(&line));

        let record = decode_line(&line).unwrap();
        assert_eq!(record.timestamp, 1_591_362_000);
        assert_eq!(record.processing_time, 27);
        assert_eq!(
            record.session_id,
            Uuid::parse_str("6f9619ff-8b86-d011-b42d-00cf4fc964ff").unwrap()
        );
        assert_eq!(record.sha, "9f86d081884c");
        assert_eq!(record.file_name, "report.final.docx");
        assert_eq!(record.file_path, r"C:\Users\alice\report.final.docx");
        assert_eq!(record.disposition, Disposition::Malicious);
    }

    #[test]
    fn test_round_trip_through_validator() {
        let record = decode_line(&sample_line()).unwrap();
        let reencoded = encode_record(&record);
        assert!(validate_line(&reencoded), "{}", reencoded);
        assert_eq!(decode_line(&reencoded).unwrap(), record);
    }

    #[test]
    fn test_round_trip_random_ids() {
        for label in 1..=3 {
            let record = FileRecord {
                timestamp: -86_400 * label,
                processing_time: i64::MAX,
                session_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                business_id: Uuid::new_v4(),
                sha: "random-sha".to_string(),
                file_name: "filename.ext".to_string(),
                file_path: "a/nice/path/to/the/file".to_string(),
                disposition: Disposition::from_label(label).unwrap(),
            };
            let line = encode_record(&record);
            assert!(validate_line(&line), "{}", line);
            assert_eq!(decode_line(&line).unwrap(), record);
        }
    }

    #[test]
    fn test_decode_unvalidated_line_is_contract_error() {
        assert!(matches!(
            decode_line("{invalid}"),
            Err(ContractError::Undecodable(_))
        ));
        let missing = sample_line().replace(r#","dp":1"#, "");
        assert!(decode_line(&missing).is_err());
    }
}
