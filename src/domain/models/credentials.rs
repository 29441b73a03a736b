use crate::domain::errors::{StoreError, StoreResult};

/// Record layout version written as the first byte of an encoded record.
const RECORD_VERSION: u8 = 1;

/// Authenticated-user credentials persisted through the credential store.
///
/// Serialized with an explicit fixed layout (version byte, then two
/// length-prefixed UTF-8 fields) so the stored bytes are stable across
/// releases and never depend on reflection or derived encodings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub account: String,
    pub token: String,
}

impl UserCredentials {
    pub fn new(account: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            token: token.into(),
        }
    }

    /// Encode: `[version u8][account len u16 be][account][token len u16 be][token]`.
    pub fn encode(&self) -> StoreResult<Vec<u8>> {
        let account = self.account.as_bytes();
        let token = self.token.as_bytes();
        if account.len() > u16::MAX as usize || token.len() > u16::MAX as usize {
            return Err(StoreError::Decode {
                message: "credential field exceeds record limit".to_string(),
            });
        }

        let mut record = Vec::with_capacity(1 + 4 + account.len() + token.len());
        record.push(RECORD_VERSION);
        record.extend_from_slice(&(account.len() as u16).to_be_bytes());
        record.extend_from_slice(account);
        record.extend_from_slice(&(token.len() as u16).to_be_bytes());
        record.extend_from_slice(token);
        Ok(record)
    }

    /// Decode a record produced by [`UserCredentials::encode`].
    pub fn decode(record: &[u8]) -> StoreResult<Self> {
        let mut cursor = record;

        let version = take(&mut cursor, 1)?[0];
        if version != RECORD_VERSION {
            return Err(StoreError::Decode {
                message: format!("unsupported credential record version {}", version),
            });
        }

        let account = take_field(&mut cursor)?;
        let token = take_field(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(StoreError::Decode {
                message: "trailing bytes in credential record".to_string(),
            });
        }

        Ok(Self { account, token })
    }
}

fn take<'a>(cursor: &mut &'a [u8], n: usize) -> StoreResult<&'a [u8]> {
    if cursor.len() < n {
        return Err(StoreError::Decode {
            message: "credential record truncated".to_string(),
        });
    }
    let (head, tail) = cursor.split_at(n);
    *cursor = tail;
    Ok(head)
}

fn take_field(cursor: &mut &[u8]) -> StoreResult<String> {
    let len_bytes = take(cursor, 2)?;
    let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
    let raw = take(cursor, len)?;
    String::from_utf8(raw.to_vec()).map_err(|_| StoreError::Decode {
        message: "credential field is not valid UTF-8".to_string(),
    })
}
