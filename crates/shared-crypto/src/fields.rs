//! # Record Field Helpers
//!
//! Apply the codec to a named subset of fields of a JSON record.
//!
//! Absent, non-string and empty fields are skipped. A field the codec cannot
//! process keeps its current value: a failed round trip never destroys data.

use crate::codec::EncryptionCodec;
use serde_json::Value;
use tracing::warn;

/// Encrypt `fields` of `record` in place. Returns the number of fields changed.
pub fn encrypt_fields(codec: &EncryptionCodec, record: &mut Value, fields: &[&str]) -> usize {
    transform_fields(record, fields, |value| codec.encrypt(value), "encrypt")
}

/// Decrypt `fields` of `record` in place. Returns the number of fields changed.
pub fn decrypt_fields(codec: &EncryptionCodec, record: &mut Value, fields: &[&str]) -> usize {
    transform_fields(record, fields, |value| codec.decrypt(value), "decrypt")
}

fn transform_fields<F>(record: &mut Value, fields: &[&str], op: F, op_name: &'static str) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let Some(object) = record.as_object_mut() else {
        return 0;
    };

    let mut changed = 0;
    for &field in fields {
        let Some(Value::String(current)) = object.get_mut(field) else {
            continue;
        };
        if current.is_empty() {
            continue;
        }
        match op(current.as_str()) {
            Some(next) => {
                if *current != next {
                    *current = next;
                    changed += 1;
                }
            }
            None => warn!(field, op = op_name, "Field left unchanged after codec failure"),
        }
    }
    changed
}
