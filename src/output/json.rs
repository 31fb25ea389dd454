//
//  bitbucket-context
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # JSON Output Formatting
//!
//! Pretty-printed JSON for scripts, e.g. piping `bbctx resolve --json`
//! into `jq`. Field names follow the workspace-provisioning format
//! (`cloneUrl`, `refType`, `isFile`).

use std::io::Write;

use serde::Serialize;

/// Writes `value` as pretty-printed JSON followed by a newline.
///
/// ```rust
/// use bitbucket_context::output::write_json_to;
///
/// let mut out = Vec::new();
/// write_json_to(&mut out, &serde_json::json!({"ref": "master"})).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"ref\": \"master\"\n}\n");
/// ```
pub fn write_json_to<W: Write + ?Sized, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_to_is_pretty_and_terminated() {
        let mut out = Vec::new();
        write_json_to(&mut out, &vec![1, 2]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[\n  1,\n  2\n]\n");
    }
}
