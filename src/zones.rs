//! Reading zone identifier lists.

use std::io::{self, BufRead};

/// Reads one zone identifier per line.
///
/// Lines are trimmed. Blank lines and lines starting with `#` are skipped.
pub fn read_zone_identifiers<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut zones = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        zones.push(line.to_owned());
    }
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::read_zone_identifiers;

    #[test]
    fn comments_and_blank_lines() {
        let input = "# zones to generate\n\nAmerica/New_York\n  Europe/Berlin \t\n   # indented comment\n\r\nAsia/Tokyo";
        let zones = read_zone_identifiers(input.as_bytes()).unwrap();
        assert_eq!(zones, ["America/New_York", "Europe/Berlin", "Asia/Tokyo"]);
    }

    #[test]
    fn only_comments() {
        let zones = read_zone_identifiers("# nothing\n\n#\n".as_bytes()).unwrap();
        assert!(zones.is_empty());
    }
}
