//! Address family detection
//!
//! This is a syntactic check on resolver output, not address validation.

use crate::error::{Error, Result};
use crate::traits::RecordFamily;

/// Pick the record family for an address literal
///
/// A `.` means IPv4 and is checked first, then a `:` means IPv6.
pub fn classify(address: &str) -> Result<RecordFamily> {
    if address.contains('.') {
        return Ok(RecordFamily::A);
    }
    if address.contains(':') {
        return Ok(RecordFamily::Aaaa);
    }
    Err(Error::classification(address))
}
