//! Builders for synthetic FAA source files and archives.
#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

use aerodata::Parsers;
use aerodata::faa::{DEFAULT_MIN_AGL_FT, FrequencyRules, Schemas};

pub fn parsers() -> Parsers {
    Parsers::new(Schemas::default(), &FrequencyRules::default(), DEFAULT_MIN_AGL_FT)
        .expect("default parsers compile")
}

/// A blank line of `width` columns with each text placed at its column.
pub fn place(fields: &[(usize, &str)], width: usize) -> String {
    let mut line = vec![b' '; width];
    for (start, text) in fields {
        line[*start..*start + text.len()].copy_from_slice(text.as_bytes());
    }
    String::from_utf8(line).expect("ascii fields")
}

pub fn apt_line(id: &str, name: &str, lat: &str, lon: &str, center: &str) -> String {
    place(
        &[(0, "APT"), (27, id), (133, name), (523, lat), (550, lon), (637, center)],
        700,
    )
}

pub fn dof_line(id: &str, state: &str, city: &str, agl: &str, msl: &str) -> String {
    place(
        &[
            (0, id),
            (10, "O"),
            (12, "US"),
            (15, state),
            (18, city),
            (35, "35 57 19.00N"),
            (48, "077 48 02.00W"),
            (62, "TOWER"),
            (81, "1"),
            (83, agl),
            (89, msl),
        ],
        130,
    )
}

pub fn dof_file(rows: &[String]) -> String {
    let mut text = String::from("  CURRENCY DATE = 02/22/26\n");
    text.push_str("OAS#      V CO ST CITY             LATITUDE     LONGITUDE\n");
    text.push_str("------------------------------------------------------------\n");
    for row in rows {
        text.push_str(row);
        text.push_str("\r\n");
    }
    text
}

pub fn build_zip(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in members {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start member");
        writer.write_all(body).expect("write member");
    }
    writer.finish().expect("finish archive").into_inner()
}
