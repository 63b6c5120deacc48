use anyhow::bail;

use crate::board::RosterRow;

/// Roster table codec. The board core never touches files or CSV; it only
/// sees the `RosterRow` sequence this module produces.
///
/// Recognized headers: a "번호"/"Number" column and an "이름"/"Name" column.
/// Column order is free; the name column is required, the number column is
/// optional (the board fills numbers positionally when it is absent).

fn parse_csv_record(line: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '"' {
            if in_quotes && i + 1 < chars.len() && chars[i + 1] == '"' {
                buf.push('"');
                i += 2;
                continue;
            }
            in_quotes = !in_quotes;
            i += 1;
            continue;
        }
        if ch == ',' && !in_quotes {
            out.push(buf);
            buf = String::new();
            i += 1;
            continue;
        }
        buf.push(ch);
        i += 1;
    }
    out.push(buf);
    out
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn is_number_header(field: &str) -> bool {
    let t = field.trim();
    t == "번호" || t.eq_ignore_ascii_case("number")
}

fn is_name_header(field: &str) -> bool {
    let t = field.trim();
    t == "이름" || t.eq_ignore_ascii_case("name")
}

/// Parse roster CSV text into ordered rows. Blank lines after the header are
/// kept as empty-name rows so the positional row-to-seat mapping survives
/// gaps in the source table.
pub fn parse_roster(text: &str) -> anyhow::Result<Vec<RosterRow>> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        bail!("empty roster file");
    }

    let header = parse_csv_record(lines[0]);
    let number_col = header.iter().position(|f| is_number_header(f));
    let Some(name_col) = header.iter().position(|f| is_name_header(f)) else {
        bail!("no 이름/Name column in header");
    };

    let mut rows = Vec::new();
    for raw_line in lines.iter().skip(1) {
        let fields = parse_csv_record(raw_line);
        let name = fields
            .get(name_col)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let number = number_col
            .and_then(|c| fields.get(c))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        rows.push(RosterRow { number, name });
    }
    Ok(rows)
}

/// The fill-in template offered for download before an import: header row
/// plus three illustrative sample rows.
pub fn template_csv() -> String {
    let mut out = String::new();
    for row in [
        ["번호", "이름"],
        ["1", "홍길동"],
        ["2", "이순신"],
        ["3", "강감찬"],
    ] {
        out.push_str(&format!("{},{}\n", csv_quote(row[0]), csv_quote(row[1])));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_korean_headers_in_any_column_order() {
        let rows = parse_roster("이름,번호\n홍길동,1\n이순신,2\n").expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "홍길동");
        assert_eq!(rows[0].number.as_deref(), Some("1"));
        assert_eq!(rows[1].name, "이순신");
    }

    #[test]
    fn accepts_english_header_synonyms_case_insensitively() {
        let rows = parse_roster("NUMBER,name\n7,Ada\n").expect("parse");
        assert_eq!(rows[0].number.as_deref(), Some("7"));
        assert_eq!(rows[0].name, "Ada");
    }

    #[test]
    fn missing_name_column_is_an_error() {
        let err = parse_roster("번호,별명\n1,X\n").expect_err("no name column");
        assert!(err.to_string().contains("Name column"));
    }

    #[test]
    fn missing_number_column_is_tolerated() {
        let rows = parse_roster("이름\nAda\n").expect("parse");
        assert_eq!(rows[0].number, None);
        assert_eq!(rows[0].name, "Ada");
    }

    #[test]
    fn blank_rows_become_empty_name_rows_and_keep_position() {
        let rows = parse_roster("번호,이름\n1,A\n,\n3,C\n").expect("parse");
        assert_eq!(rows.len(), 3);
        assert!(rows[1].name.is_empty());
        assert_eq!(rows[2].name, "C");
    }

    #[test]
    fn quoted_fields_with_commas_survive() {
        let rows = parse_roster("번호,이름\n1,\"Kim, Minsoo\"\n").expect("parse");
        assert_eq!(rows[0].name, "Kim, Minsoo");
    }

    #[test]
    fn template_has_header_and_three_sample_rows() {
        let text = template_csv();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "번호,이름");
        assert_eq!(lines[1], "1,홍길동");

        // The template round-trips through the importer.
        let rows = parse_roster(&text).expect("parse template");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].name, "강감찬");
    }
}
