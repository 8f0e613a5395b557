use chrono::NaiveDate;

use cymol_db::header::extract_header;

fn header_text() -> String {
    [
        format!(
            "HEADER    {:<40}{}   1EHZ",
            "TRANSFER RIBONUCLEIC ACID", "11-MAR-99"
        ),
        "TITLE     THE CRYSTAL STRUCTURE OF YEAST PHENYLALANINE TRNA AT 1.93 A".to_string(),
        "TITLE    2 RESOLUTION".to_string(),
        "COMPND    MOL_ID: 1;".to_string(),
        "AUTHOR    H.SHI,P.B.MOORE".to_string(),
        "REVDAT   1   29-JUL-99 1EHZ    0".to_string(),
        String::new(),
    ]
    .join("\n")
}

#[test]
fn date_comes_from_fixed_columns() {
    let record = extract_header("1EHZ", &header_text());
    assert_eq!(record.date, "11-MAR-99");
    assert_eq!(
        record.deposition_date(),
        NaiveDate::from_ymd_opt(1999, 3, 11)
    );
}

#[test]
fn title_continuations_are_joined() {
    let record = extract_header("1EHZ", &header_text());
    assert_eq!(
        record.title,
        "THE CRYSTAL STRUCTURE OF YEAST PHENYLALANINE TRNA AT 1.93 A RESOLUTION"
    );
    assert_eq!(record.authors, "H.SHI,P.B.MOORE");
    assert_eq!(record.id, "1EHZ");
}

#[test]
fn extraction_is_idempotent() {
    let text = header_text();
    assert_eq!(extract_header("1EHZ", &text), extract_header("1EHZ", &text));
}

#[test]
fn first_header_line_wins() {
    let text = format!(
        "{}\n{}\n",
        format!("HEADER    {:<40}{}", "RNA", "01-JAN-01"),
        format!("HEADER    {:<40}{}", "RNA", "02-FEB-02")
    );
    assert_eq!(extract_header("1ABC", &text).date, "01-JAN-01");
}

#[test]
fn text_past_column_seventy_is_dropped() {
    let text = format!("TITLE     {}OVERFLOW", "A".repeat(60));
    assert_eq!(extract_header("1ABC", &text).title, "A".repeat(60));
}

#[test]
fn windows_line_endings_are_trimmed() {
    let text = "AUTHOR    A.SMITH\r\nAUTHOR   2 B.JONES\r\n";
    assert_eq!(extract_header("1ABC", text).authors, "A.SMITH B.JONES");
}
